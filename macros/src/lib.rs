use proc_macro::TokenStream;

mod pat;

/// Matches a `tunion::Variant` by the types of its alternatives.
///
/// Each arm names an alternative through its pattern: a struct, tuple-struct
/// or unit pattern names that type, and a suffixed literal names its literal
/// type. Arms are tried in order; arms without a guard or a refutable
/// sub-pattern consume their alternative, and the whole match must consume
/// every alternative unless a `_` arm ends it. Matching a valueless variant is
/// a bad access.
///
/// See the `tunion` crate documentation for examples.
#[proc_macro]
pub fn match_variant(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as pat::VariantMatch);
    pat::expand_match(input).into()
}
