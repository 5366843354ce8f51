//! The module dealing with the underlying representation of the [`Variant`]
//! type.
//!
//! # Implementation details
//!
//! A variant is a hand-written tagged union. Its storage is a chain of
//! `#[repr(C)]` unions, so every alternative starts at offset 0, the buffer is
//! as large as the largest alternative and as aligned as the strictest one:
//!
//! ```rust,no_run
//! # use core::convert::Infallible;
//! # use core::mem::{ManuallyDrop, MaybeUninit};
//!
//! struct Nil(Infallible);
//! #[repr(C)]
//! union Cons<T, Next> {
//!     data: ManuallyDrop<T>,
//!     next: ManuallyDrop<Next>,
//! }
//!
//! // For example only. Not actually defined.
//! struct RawVariant2<T1, T2> {
//!     tag: u8,
//!     data: MaybeUninit<Cons<T1, Cons<T2, Nil>>>,
//! }
//! ```
//!
//! The buffer may be uninitialized: a tag of `u8::MAX` marks the valueless
//! state. Every operation that needs the concrete type of the live
//! alternative walks the type list with the tag, one `Cons` per step, and the
//! recursion bottoms out in a single typed call.
//!
//! [`Variant`]: crate::Variant

use core::{convert::Infallible, mem, mem::ManuallyDrop, ptr};

use super::{
    NarrowRem, Rem,
    index::{Index, UInt, UTerm},
};

/// The terminator type of the underlying union of the [`Variant`] type.
///
/// [`Variant`]: crate::Variant
pub struct Nil(#[allow(dead_code)] pub(crate) Infallible);

/// The accumulator type of the underlying union of the [`Variant`] type.
///
/// [`Variant`]: crate::Variant
#[repr(C)]
pub union Cons<T, U> {
    pub(crate) data: ManuallyDrop<T>,
    pub(crate) next: ManuallyDrop<U>,
}

impl<T, U> Cons<T, U> {
    /// # Safety
    ///
    /// `this` must point into a live (possibly uninitialized) buffer.
    pub(crate) unsafe fn head(this: *const Self) -> *const T {
        unsafe { ptr::addr_of!((*this).data) }.cast()
    }

    /// # Safety
    ///
    /// See [`Cons::head`].
    pub(crate) unsafe fn head_mut(this: *mut Self) -> *mut T {
        unsafe { ptr::addr_of_mut!((*this).data) }.cast()
    }

    /// # Safety
    ///
    /// See [`Cons::head`].
    pub(crate) unsafe fn next(this: *const Self) -> *const U {
        unsafe { ptr::addr_of!((*this).next) }.cast()
    }

    /// # Safety
    ///
    /// See [`Cons::head`].
    pub(crate) unsafe fn next_mut(this: *mut Self) -> *mut U {
        unsafe { ptr::addr_of_mut!((*this).next) }.cast()
    }
}

/// The trait that type lists implement to support its corresponding tagged
/// union representation for the [`Variant`] type.
///
/// [`Variant`]: crate::Variant
pub trait VariantList {
    /// The underlying representation of the `Variant` type.
    type Repr;

    /// The number of alternatives in the list.
    const LEN: usize;

    /// Whether any alternative has drop glue.
    const NEEDS_DROP: bool;

    #[doc(hidden)]
    unsafe fn drop(this: *mut Self::Repr, tag: u8);
}

impl VariantList for () {
    type Repr = Nil;

    const LEN: usize = 0;
    const NEEDS_DROP: bool = false;

    unsafe fn drop(_: *mut Nil, _: u8) {}
}

impl<Head, Tail> VariantList for (Head, Tail)
where
    Tail: VariantList,
{
    type Repr = Cons<Head, Tail::Repr>;

    const LEN: usize = 1 + Tail::LEN;
    const NEEDS_DROP: bool = mem::needs_drop::<Head>() || Tail::NEEDS_DROP;

    unsafe fn drop(this: *mut Self::Repr, tag: u8) {
        if tag == 0 {
            unsafe { ptr::drop_in_place(Cons::head_mut(this)) };
        } else {
            unsafe { Tail::drop(Cons::next_mut(this), tag - 1) }
        }
    }
}

/// The trait that type lists implement to support manipulating a specified
/// alternative marked by a specified index in the [`Variant`] type.
///
/// The index `U` is usually inferred from `T`; a list that names `T` twice
/// leaves it ambiguous, which rejects the access at compile time.
///
/// [`Variant`]: crate::Variant
pub trait Split<T, U: Index>: VariantList {
    #[doc(hidden)]
    unsafe fn as_ptr(this: *const Self::Repr) -> *const T;

    #[doc(hidden)]
    unsafe fn as_mut_ptr(this: *mut Self::Repr) -> *mut T;

    /// The remainder type list from splitting type list `Self` with type `T`
    /// and its index `U`.
    type Remainder: VariantList;

    #[doc(hidden)]
    fn from_remainder(tag: u8) -> u8;

    #[doc(hidden)]
    fn try_unwrap(tag: u8) -> Result<(), u8>;
}

impl<Head, Tail> Split<Head, UTerm> for (Head, Tail)
where
    Tail: VariantList,
{
    unsafe fn as_ptr(this: *const Self::Repr) -> *const Head {
        unsafe { Cons::head(this) }
    }

    unsafe fn as_mut_ptr(this: *mut Self::Repr) -> *mut Head {
        unsafe { Cons::head_mut(this) }
    }

    type Remainder = Tail;

    fn from_remainder(tag: u8) -> u8 {
        tag + 1
    }

    fn try_unwrap(tag: u8) -> Result<(), u8> {
        match tag.checked_sub(1) {
            None => Ok(()),
            Some(tag) => Err(tag),
        }
    }
}

impl<Head, Tail, T, U: Index> Split<T, UInt<U>> for (Head, Tail)
where
    Tail: Split<T, U>,
{
    unsafe fn as_ptr(this: *const Self::Repr) -> *const T {
        let ptr = unsafe { Tail::as_ptr(Cons::next(this)) };
        debug_assert_eq!(ptr.cast(), this);
        ptr
    }

    unsafe fn as_mut_ptr(this: *mut Self::Repr) -> *mut T {
        let ptr = unsafe { Tail::as_mut_ptr(Cons::next_mut(this)) };
        debug_assert_eq!(ptr.cast(), this);
        ptr
    }

    type Remainder = (Head, <Tail as Split<T, U>>::Remainder);

    fn from_remainder(tag: u8) -> u8 {
        if tag < UInt::<U>::TAG { tag } else { tag + 1 }
    }

    fn try_unwrap(tag: u8) -> Result<(), u8> {
        let cur = UInt::<U>::TAG;
        match tag.cmp(&cur) {
            core::cmp::Ordering::Equal => Ok(()),
            core::cmp::Ordering::Less => Err(tag),
            core::cmp::Ordering::Greater => Err(tag - 1),
        }
    }
}

/// The trait that type lists implement to be able to be split from another
/// type list.
///
/// Tags handled here always name a live alternative; the valueless tag is
/// mapped by the caller.
pub trait SplitList<TList: VariantList, UList>: VariantList {
    /// The remainder type list from splitting type list `Self` with type list
    /// `TList` and its index map `UList`.
    type Remainder: VariantList;

    #[doc(hidden)]
    fn broaden_tag(tag: u8) -> u8;

    #[doc(hidden)]
    fn narrow_tag(tag: u8) -> Result<u8, u8>;
}

impl<T: VariantList> SplitList<(), ()> for T {
    type Remainder = Self;

    fn broaden_tag(tag: u8) -> u8 {
        unreachable!("mapping tag {tag} from an empty set")
    }

    fn narrow_tag(tag: u8) -> Result<u8, u8> {
        Err(tag)
    }
}

impl<SubHead, SubTail, SuperHead, SuperTail, HeadIndex: Index, TailIndex>
    SplitList<(SubHead, SubTail), (HeadIndex, TailIndex)> for (SuperHead, SuperTail)
where
    SubTail: VariantList,
    SuperTail: VariantList,
    Self: Split<SubHead, HeadIndex>,
    Rem<Self, SubHead, HeadIndex>: SplitList<SubTail, TailIndex>,
{
    type Remainder = NarrowRem<Rem<Self, SubHead, HeadIndex>, SubTail, TailIndex>;

    fn broaden_tag(tag: u8) -> u8 {
        match <(SubHead, SubTail) as Split<SubHead, UTerm>>::try_unwrap(tag) {
            Ok(()) => HeadIndex::TAG,
            Err(remainder) => {
                let ret = Rem::<Self, SubHead, HeadIndex>::broaden_tag(remainder);
                Self::from_remainder(ret)
            }
        }
    }

    fn narrow_tag(tag: u8) -> Result<u8, u8> {
        Ok(match Self::try_unwrap(tag) {
            Ok(()) => 0,
            Err(remainder) => {
                let ret = Rem::<Self, SubHead, HeadIndex>::narrow_tag(remainder)?;
                <(SubHead, SubTail) as Split<SubHead, UTerm>>::from_remainder(ret)
            }
        })
    }
}
