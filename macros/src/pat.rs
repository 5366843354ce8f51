use std::iter;

use const_random::const_random;
use convert_case::{Case, Casing};
use either::Either::{Left, Right};
use proc_macro2::{Span, TokenStream};
use quote::{ToTokens, format_ident, quote};
use syn::{parse::Parse, spanned::Spanned, visit::Visit, *};

/// The alternatives named by the pattern of one match arm.
#[derive(Default)]
struct AltPat {
    binding: Option<PatIdent>,
    is_wildcard: bool,
    alternatives: Vec<Type>,
    alternative_pats: Vec<Pat>,
    is_refutable: bool,

    is_in_subpat: bool,
    err: Option<Error>,
}

impl AltPat {
    fn check_ty(&mut self, ty: &Type) -> bool {
        if self.alternatives.iter().any(|d| d == ty) {
            self.err = Some(Error::new_spanned(
                ty,
                "splitting one alternative into several patterns of the same arm is not supported",
            ));
            return false;
        }
        true
    }

    fn check_ty_with_other(&self, other: &Self) -> Option<Error> {
        if self.is_refutable || other.is_refutable {
            return None;
        }
        self.alternatives.iter().find_map(|d| {
            other.alternatives.iter().any(|e| d == e).then(|| {
                Error::new_spanned(d, "this alternative is already matched by a previous arm")
            })
        })
    }

    fn push_ty(&mut self, ty: Type, binding: Option<PatIdent>, i: &Pat) {
        self.alternatives.push(ty);
        self.alternative_pats.push(match binding {
            Some(mut pi) => {
                pi.subpat = Some((<Token![@]>::default(), Box::new(i.clone())));
                Pat::Ident(pi)
            }
            None => i.clone(),
        });
    }

    fn unsupported(&mut self, i: &Pat) {
        self.err = Some(Error::new_spanned(
            i,
            format_args!("pattern `{}` is not supported", i.to_token_stream()),
        ));
    }
}

/// The type a top-level literal pattern matches against.
fn literal_ty(i: &Pat, lit: &Lit) -> Result<Type> {
    match lit {
        Lit::Str(_) => Ok(parse_quote!(&str)),
        Lit::ByteStr(_) => Ok(parse_quote!(&[u8])),
        Lit::CStr(_) => Ok(parse_quote!(&::core::ffi::CStr)),
        Lit::Byte(_) => Ok(parse_quote!(u8)),
        Lit::Char(_) => Ok(parse_quote!(char)),
        Lit::Bool(_) => Ok(parse_quote!(bool)),
        Lit::Int(int) => parse_str(int.suffix()).map_err(|_| {
            Error::new_spanned(i, "integer literals need a suffix naming the alternative")
        }),
        Lit::Float(float) => parse_str(float.suffix()).map_err(|_| {
            Error::new_spanned(i, "float literals need a suffix naming the alternative")
        }),
        _ => Err(Error::new_spanned(
            i,
            format_args!("pattern `{}` is not supported", i.to_token_stream()),
        )),
    }
}

impl Visit<'_> for AltPat {
    fn visit_pat(&mut self, i: &'_ Pat) {
        if self.err.is_some() {
            return;
        }
        match i {
            Pat::Ident(pi) if !self.is_in_subpat => {
                let s = pi.ident.to_string();
                if pi.subpat.is_none() && s.is_case(Case::Pascal) {
                    let ty = Type::Path(TypePath {
                        qself: None,
                        path: Path::from(pi.ident.clone()),
                    });
                    if self.check_ty(&ty) {
                        let binding = self.binding.take();
                        self.push_ty(ty, binding, i);
                    }
                    return;
                }

                let mut binding = pi.clone();
                binding.subpat = None;
                self.binding = Some(binding);
                visit::visit_pat(self, i);
            }

            Pat::Struct(PatStruct { qself, path, .. })
            | Pat::TupleStruct(PatTupleStruct { qself, path, .. })
            | Pat::Path(PatPath { qself, path, .. })
                if !self.is_in_subpat =>
            {
                let ty = Type::Path(TypePath {
                    qself: qself.clone(),
                    path: path.clone(),
                });
                if self.check_ty(&ty) {
                    let binding = self.binding.take();

                    self.is_in_subpat = true;
                    visit::visit_pat(self, i);
                    self.is_in_subpat = false;

                    self.push_ty(ty, binding, i);
                }
            }

            Pat::Paren(_) => visit::visit_pat(self, i),
            Pat::Or(_) if !self.is_in_subpat => match self.binding.take() {
                Some(pi) => {
                    self.err = Some(Error::new_spanned(
                        pi,
                        "a binding over several alternatives is not supported",
                    ))
                }
                None => visit::visit_pat(self, i),
            },

            Pat::Lit(lit) if !self.is_in_subpat => {
                self.is_refutable = true;
                match literal_ty(i, &lit.lit) {
                    Ok(ty) => {
                        if self.check_ty(&ty) {
                            let binding = self.binding.take();
                            self.push_ty(ty, binding, i);
                        }
                    }
                    Err(err) => self.err = Some(err),
                }
            }

            Pat::Wild(_) | Pat::Range(ExprRange { start: None, end: None, .. }) | Pat::Rest(_)
                if !self.is_in_subpat =>
            {
                self.is_wildcard = true
            }

            Pat::Const(_)
            | Pat::Range(_)
            | Pat::Macro(_)
            | Pat::Reference(_)
            | Pat::Slice(_)
            | Pat::Type(_)
            | Pat::Verbatim(_)
            | Pat::Tuple(_)
                if !self.is_in_subpat =>
            {
                self.unsupported(i)
            }

            Pat::Const(_)
            | Pat::Lit(_)
            | Pat::Range(_)
            | Pat::Or(_)
            | Pat::Slice(_)
            | Pat::Path(_)
            | Pat::Struct(_)
            | Pat::TupleStruct(_) => {
                self.is_refutable = true;
                visit::visit_pat(self, i)
            }

            _ => visit::visit_pat(self, i),
        }
    }
}

pub struct MatchArm {
    pat: AltPat,
    guard: Option<Box<Expr>>,
    body: Box<Expr>,
}

impl Parse for MatchArm {
    fn parse(input: parse::ParseStream<'_>) -> Result<Self> {
        let Arm {
            attrs, pat, guard, body, ..
        } = input.parse()?;

        if let (Some(first), Some(last)) = (attrs.first(), attrs.last()) {
            return Err(Error::new(
                first.span().join(last.span()).unwrap_or_else(|| first.span()),
                "attributes are not supported on match arms",
            ));
        }

        let mut alt = AltPat::default();
        alt.visit_pat(&pat);

        if let Some(err) = alt.err.take() {
            return Err(err);
        }

        if alt.alternatives.is_empty() && !alt.is_wildcard {
            return Err(Error::new(
                pat.span(),
                "cannot infer the alternative; name its type in the pattern",
            ));
        }

        if guard.is_some() {
            alt.is_refutable = true;
        }

        Ok(MatchArm {
            pat: alt,
            guard: guard.map(|g| g.1),
            body,
        })
    }
}

pub struct VariantMatch {
    expr: Box<Expr>,
    attrs: Vec<Attribute>,
    arms: Vec<MatchArm>,
}

impl Parse for VariantMatch {
    fn parse(input: parse::ParseStream<'_>) -> Result<Self> {
        let expr = Box::new(Expr::parse_without_eager_brace(input)?);

        let content;
        braced!(content in input);

        let attrs = Attribute::parse_inner(&content)?;

        let mut arms = Vec::new();
        while !content.is_empty() {
            arms.push(content.parse()?);
        }

        Ok(VariantMatch { expr, attrs, arms })
    }
}

/// Lowers the arms into a chain of `try_unwrap`s, each peeling one
/// alternative off the scrutinee until a `Variant<()>` remains.
fn expand_body(attrs: &[Attribute], arms: &[MatchArm], base: &Ident) -> TokenStream {
    let label = Lifetime::new(
        &format!("'__variant_match_body{}", const_random!(u32)),
        Span::call_site(),
    );
    let label = &label;

    let steps = arms.iter().flat_map(|arm| {
        let MatchArm { pat, guard, body } = arm;
        let AltPat {
            is_wildcard,
            alternatives,
            alternative_pats,
            is_refutable,
            ..
        } = pat;

        if *is_wildcard {
            return Left(iter::once(quote! {
                let #base = match #base.narrow::<(), _>() {
                    #[allow(unreachable_code)]
                    Err(_) => {
                        #[warn(unreachable_code)]
                        let ret = { #body };
                        break #label ret;
                    }
                    Ok(unreachable) => unreachable,
                };
            }));
        }

        let steps = alternatives.iter().zip(alternative_pats).map(move |(ty, pat)| {
            let success = quote! {{
                #[warn(unreachable_code, clippy::diverging_sub_expression)]
                let ret = { #body };
                break #label ret;
            }};
            match guard {
                Some(guard) => quote! {
                    let mut #base = #base;
                    #base = match #base.try_unwrap::<#ty, _>() {
                        #[allow(unreachable_code, clippy::diverging_sub_expression)]
                        Ok(#pat) if #guard => #success,
                        #[allow(unreachable_patterns)]
                        Ok(res) => ::tunion::Variant::new(res),
                        Err(rem) => rem.broaden(),
                    };
                },
                None if *is_refutable => quote! {
                    let mut #base = #base;
                    #base = match #base.try_unwrap::<#ty, _>() {
                        #[allow(unreachable_code, clippy::diverging_sub_expression)]
                        Ok(#pat) => #success,
                        #[allow(unreachable_patterns)]
                        Ok(res) => ::tunion::Variant::new(res),
                        Err(rem) => rem.broaden(),
                    };
                },
                None => quote! {
                    let #base = match #base.try_unwrap::<#ty, _>() {
                        #[allow(unreachable_code, clippy::diverging_sub_expression)]
                        Ok(#pat) => #success,
                        Err(rem) => rem,
                    };
                },
            }
        });
        Right(steps)
    });

    quote! {#label: {
        #(#attrs)*
        #(#steps)*
        let #base: ::tunion::Variant<()> = #base;
        #base.unreachable()
    }}
}

pub fn expand_match(data: VariantMatch) -> TokenStream {
    let VariantMatch { expr, attrs, arms } = data;
    let base = format_ident!("__variant_match_base{}", const_random!(u32));

    if let Some(err) = (arms.iter().enumerate())
        .flat_map(|(index, a)| arms.iter().take(index).map(move |b| (a, b)))
        .find_map(|(a, b)| a.pat.check_ty_with_other(&b.pat))
    {
        return err.to_compile_error();
    }

    let body = expand_body(&attrs, &arms, &base);
    quote! {{
        let #base = #expr;
        #body
    }}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arm(src: &str) -> Result<MatchArm> {
        parse_str(src)
    }

    #[test]
    fn alternatives_from_patterns() {
        let point: Type = parse_quote!(Point);
        let a = arm("Point { x, y } => x + y").unwrap();
        assert_eq!(a.pat.alternatives, [point]);
        assert!(!a.pat.is_refutable);

        let a = arm("Empty | Point { .. } => 0").unwrap();
        assert_eq!(a.pat.alternatives.len(), 2);

        let int: Type = parse_quote!(u32);
        let a = arm("0u32 => 0").unwrap();
        assert_eq!(a.pat.alternatives, [int]);
        assert!(a.pat.is_refutable);

        let a = arm("Point { x: 0, .. } => 0").unwrap();
        assert!(a.pat.is_refutable);

        let a = arm("p @ Point { .. } if p.x > 0 => 0").unwrap();
        assert!(a.pat.is_refutable);
        assert!(matches!(&a.pat.alternative_pats[0], Pat::Ident(pi) if pi.ident == "p"));

        assert!(arm("_ => 0").unwrap().pat.is_wildcard);
        assert!(arm(".. => 0").unwrap().pat.is_wildcard);
    }

    #[test]
    fn rejected_patterns() {
        assert!(arm("x => 0").is_err());
        assert!(arm("0 => 0").is_err());
        assert!(arm("(a, b) => 0").is_err());
        assert!(arm("Point { .. } | Point { .. } => 0").is_err());
        assert!(arm("p @ (Point { .. } | Empty) => 0").is_err());
    }

    #[test]
    fn expansion_peels_every_arm() {
        let m: VariantMatch = parse_str(
            "v { Point { x: 0, .. } => 0, Point { x, .. } => x, Label(_) | Empty => 1, _ => 2 }",
        )
        .unwrap();
        let out = expand_match(m).to_string();
        assert_eq!(out.matches("try_unwrap").count(), 4);
        assert_eq!(out.matches("narrow").count(), 1);
        assert!(out.contains("__variant_match_body"));
        assert!(out.contains(". unreachable"));
    }

    #[test]
    fn duplicate_exhaustive_arms() {
        let m: VariantMatch = parse_str("v { Point { .. } => 0, Point { .. } => 1 }").unwrap();
        assert!(m.arms[1].pat.check_ty_with_other(&m.arms[0].pat).is_some());

        let m: VariantMatch =
            parse_str("v { Point { x: 0, .. } => 0, Point { .. } => 1 }").unwrap();
        assert!(m.arms[1].pat.check_ty_with_other(&m.arms[0].pat).is_none());
    }
}
