//! Type-level indices locating an alternative inside a type list.
//!
//! An index is a Peano number: [`UTerm`] is zero and [`UInt<U>`] is the
//! successor of `U`. Most APIs take the index as an inferred type parameter,
//! so callers rarely name it; when they do, the aliases [`U0`] to [`U15`]
//! keep it short.
//!
//! ```rust
//! use tunion::{Variant, index::U1};
//!
//! let v: Variant![i32, String] = Variant::new::<_, U1>("hi".to_string());
//! assert_eq!(v.index(), 1);
//! ```
#![allow(missing_docs)]

use core::marker::PhantomData;

pub struct UTerm;

pub struct UInt<U>(PhantomData<U>);

pub trait Index {
    const TAG: u8;
}

impl Index for UTerm {
    const TAG: u8 = 0;
}

impl<U: Index> Index for UInt<U> {
    const TAG: u8 = 1 + U::TAG;
}

/// Projects the alternative type stored at index `U` of a type list.
pub trait Select<U: Index> {
    type Output;
}

impl<Head, Tail> Select<UTerm> for (Head, Tail) {
    type Output = Head;
}

impl<Head, Tail, U: Index> Select<UInt<U>> for (Head, Tail)
where
    Tail: Select<U>,
{
    type Output = Tail::Output;
}

pub type U0 = UTerm;
pub type U1 = UInt<U0>;
pub type U2 = UInt<U1>;
pub type U3 = UInt<U2>;
pub type U4 = UInt<U3>;
pub type U5 = UInt<U4>;
pub type U6 = UInt<U5>;
pub type U7 = UInt<U6>;
pub type U8 = UInt<U7>;
pub type U9 = UInt<U8>;

pub type U10 = UInt<U9>;
pub type U11 = UInt<U10>;
pub type U12 = UInt<U11>;
pub type U13 = UInt<U12>;
pub type U14 = UInt<U13>;
pub type U15 = UInt<U14>;
