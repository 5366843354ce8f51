//! Converting construction and assignment.
//!
//! A value of type `T` is accepted by the alternative `A` when `A: From<T>`.
//! [`Accept`] is implemented at every index whose alternative accepts `T`, and
//! the index parameter is left to inference, so:
//!
//! - exactly one accepting alternative selects it;
//! - no accepting alternative is a compile error;
//! - several accepting alternatives are ambiguous, also a compile error.
//!
//! `From` is reflexive, so an alternative of the exact type competes with the
//! converting ones. Use [`Variant::new`] or [`Variant::set`] to pick an
//! alternative by exact type alone.
//!
//! ```rust
//! use tunion::Variant;
//!
//! type V<'a> = Variant![i32, &'a Vec<i32>, String];
//!
//! assert_eq!(V::convert("text").index(), 2);
//! assert_eq!(V::convert(3i16).index(), 0);
//! assert_eq!(V::accepted_index::<i8, _>(), 0);
//! ```
//!
//! Rust has no implicit float-to-integer conversion, so nothing accepts an
//! `f32` here:
//!
//! ```rust,compile_fail
//! use tunion::Variant;
//!
//! let v: Variant![i32, String] = Variant::convert(3.14f32);
//! ```
//!
//! Both `i64` and `f64` accept an `i32`, which is ambiguous:
//!
//! ```rust,compile_fail
//! use tunion::Variant;
//!
//! let v: Variant![i64, f64] = Variant::convert(3i32);
//! ```
//!
//! An exact-type alternative gets no preference: `u32` and `u64` both accept
//! a `u32`, so this is ambiguous too. `Variant::new(5u32)` picks `u32`.
//!
//! ```rust,compile_fail
//! use tunion::Variant;
//!
//! let v: Variant![u64, u32] = Variant::convert(5u32);
//! ```
//!
//! [`Variant::new`]: crate::Variant::new
//! [`Variant::set`]: crate::Variant::set

use crate::{
    Variant,
    index::{Index, UInt, UTerm},
    repr::VariantList,
};

/// Type lists with an alternative at index `U` accepting values of type `T`.
pub trait Accept<T, U: Index>: VariantList {
    /// The accepting alternative.
    type Target;

    #[doc(hidden)]
    fn accept(value: T) -> Self::Target;
}

impl<Head, Tail, T> Accept<T, UTerm> for (Head, Tail)
where
    Head: From<T>,
    Tail: VariantList,
{
    type Target = Head;

    fn accept(value: T) -> Head {
        Head::from(value)
    }
}

impl<Head, Tail, T, U: Index> Accept<T, UInt<U>> for (Head, Tail)
where
    Tail: Accept<T, U>,
{
    type Target = Tail::Target;

    fn accept(value: T) -> Self::Target {
        Tail::accept(value)
    }
}

impl<S: VariantList> Variant<S> {
    /// The index of the alternative a value of type `T` converts into.
    pub fn accepted_index<T, U>() -> usize
    where
        S: Accept<T, U>,
        U: Index,
    {
        U::TAG as usize
    }
}

#[cfg(test)]
mod tests {
    use std::{boxed::Box, string::String, vec, vec::Vec};

    use crate::{BadAccess, Variant};

    #[test]
    fn selects_the_accepting_alternative() {
        type V = Variant![u64, String, char];

        // `char` itself would be ambiguous: `u64` and `String` accept it too.

        assert_eq!(V::accepted_index::<u32, _>(), 0);
        assert_eq!(V::accepted_index::<&str, _>(), 1);
        assert_eq!(V::accepted_index::<Box<str>, _>(), 1);
        assert_eq!(V::accepted_index::<bool, _>(), 0);
    }

    #[test]
    fn converts_by_reference() {
        let numbers = vec![42];
        let v: Variant![i32, &Vec<i32>, String] = Variant::convert(&numbers);
        assert_eq!(v.index(), 1);
        assert_eq!(v.get::<&Vec<i32>, _>().map(|r| r[0]), Ok(42));
        assert_eq!(v.get::<i32, _>(), Err(BadAccess::WrongAlternative));
    }
}
