#![doc = include_str!("../README.md")]
#![no_std]
#![deny(future_incompatible)]
#![deny(rust_2018_idioms)]

#[cfg(any(test, feature = "std"))]
extern crate std;

use core::{
    mem::{self, ManuallyDrop, MaybeUninit},
    ptr,
};

#[macro_use]
mod macros;

pub mod convert;
mod derive;
mod error;
pub mod index;
pub mod repr;
pub mod visit;

pub use self::error::BadAccess;
use self::{
    convert::Accept,
    index::{Index, Select},
    repr::{Split, SplitList, VariantList},
};
#[cfg(feature = "macros")]
pub use tunion_macros::match_variant;

pub type Repr<S> = <S as VariantList>::Repr;
pub type Alternative<S, U> = <S as Select<U>>::Output;
pub type Rem<S, T, U> = <S as Split<T, U>>::Remainder;
pub type NarrowRem<S, S2, UMap> = <S as SplitList<S2, UMap>>::Remainder;
pub type Accepted<S, T, U> = <S as Accept<T, U>>::Target;

/// The index reported by a valueless variant.
pub const NPOS: usize = usize::MAX;

const VALUELESS: u8 = u8::MAX;

/// A tagged union holding at most one value out of the type list `S`.
///
/// Spell the type with the [`Variant!`] macro: `Variant![i32, String]` is
/// `Variant<(i32, (String, ()))>`.
pub struct Variant<S: VariantList> {
    tag: u8,
    data: MaybeUninit<Repr<S>>,
}

impl<T> From<T> for Variant![T] {
    /// Construct a `Variant` of one type from a value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tunion::Variant;
    ///
    /// let v: Variant![i32] = 42.into();
    /// assert_eq!(v.get(), Ok(&42));
    /// ```
    fn from(value: T) -> Self {
        Variant::new(value)
    }
}

impl Variant![] {
    /// Consumes a union over no alternatives.
    ///
    /// Such a union can only be valueless, so this is always a bad access. It
    /// is what an exhaustive [`match_variant!`] bottoms out in.
    #[track_caller]
    pub fn unreachable(self) -> ! {
        debug_assert!(self.is_valueless());
        BadAccess::Valueless.fail()
    }
}

impl<S: VariantList> Variant<S> {
    const CHECK: () = assert!(
        S::LEN > 0 && S::LEN < VALUELESS as usize,
        "a variant needs between 1 and 254 alternatives"
    );

    /// The number of alternatives in `S`.
    pub const ALTERNATIVES: usize = S::LEN;

    const fn empty() -> Self {
        Variant {
            tag: VALUELESS,
            data: MaybeUninit::uninit(),
        }
    }

    /// Creates a variant holding no value.
    pub const fn valueless() -> Self {
        let () = Self::CHECK;
        Self::empty()
    }

    /// Creates a variant holding `value`.
    ///
    /// The alternative is chosen by the exact type of `value`, or by the index
    /// `U` when it is spelled out.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tunion::{Variant, index::U2};
    ///
    /// let v: Variant![i32, String, u8] = Variant::new(7u8);
    /// assert_eq!(v.index(), 2);
    ///
    /// let w: Variant![i32, String, u8] = Variant::new::<_, U2>(7);
    /// assert_eq!(v, w);
    /// ```
    pub fn new<T, U>(value: T) -> Self
    where
        S: Split<T, U>,
        U: Index,
    {
        let mut this = Self::valueless();
        unsafe { this.construct::<T, U>(value) };
        this
    }

    pub fn new_with<T, U>(f: impl FnOnce() -> T) -> Self
    where
        S: Split<T, U>,
        U: Index,
    {
        Self::new::<T, U>(f())
    }

    pub fn try_new_with<T, U, E>(f: impl FnOnce() -> Result<T, E>) -> Result<Self, E>
    where
        S: Split<T, U>,
        U: Index,
    {
        f().map(Self::new::<T, U>)
    }

    /// Creates a variant from a value converted into the only alternative
    /// accepting it.
    ///
    /// See [`convert`](crate::convert) for how the alternative is selected.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tunion::Variant;
    ///
    /// let v: Variant![i32, String] = Variant::convert("test");
    /// assert_eq!(v.get::<String, _>().map(String::as_str), Ok("test"));
    /// ```
    pub fn convert<T, U>(value: T) -> Self
    where
        S: Accept<T, U> + Split<Accepted<S, T, U>, U>,
        U: Index,
    {
        Self::new::<_, U>(S::accept(value))
    }

    /// Writes `value` into the empty buffer and commits its tag.
    ///
    /// # Safety
    ///
    /// No alternative may be live.
    unsafe fn construct<T, U>(&mut self, value: T) -> &mut T
    where
        S: Split<T, U>,
        U: Index,
    {
        debug_assert_eq!(self.tag, VALUELESS);
        unsafe {
            let slot = S::as_mut_ptr(self.data.as_mut_ptr());
            slot.write(value);
            self.tag = U::TAG;
            &mut *slot
        }
    }

    /// Destroys the live alternative, if any.
    ///
    /// The tag is cleared before the destructor runs.
    fn reset(&mut self) {
        let tag = mem::replace(&mut self.tag, VALUELESS);
        if S::NEEDS_DROP && tag != VALUELESS {
            unsafe { S::drop(self.data.as_mut_ptr(), tag) }
        }
    }

    fn check(&self, tag: u8) -> Result<(), BadAccess> {
        match self.tag {
            t if t == tag => Ok(()),
            VALUELESS => Err(BadAccess::Valueless),
            _ => Err(BadAccess::WrongAlternative),
        }
    }
}

impl<S: VariantList> Variant<S> {
    /// The index of the live alternative, or [`NPOS`] when valueless.
    pub fn index(&self) -> usize {
        match self.tag {
            VALUELESS => NPOS,
            tag => tag as usize,
        }
    }

    pub fn is_valueless(&self) -> bool {
        self.tag == VALUELESS
    }

    /// Returns `true` if the live alternative is `T` (or the one at `U`).
    pub fn holds<T, U>(&self) -> bool
    where
        S: Split<T, U>,
        U: Index,
    {
        self.tag == U::TAG
    }

    /// The position of `T` in `S`.
    ///
    /// ```rust
    /// use tunion::Variant;
    ///
    /// assert_eq!(<Variant![u8, i64, char]>::index_of::<char, _>(), 2);
    /// ```
    ///
    /// Naming a type that is not an alternative does not compile:
    ///
    /// ```rust,compile_fail
    /// use tunion::Variant;
    ///
    /// <Variant![u8, i64]>::index_of::<char, _>();
    /// ```
    pub fn index_of<T, U>() -> usize
    where
        S: Split<T, U>,
        U: Index,
    {
        U::TAG as usize
    }

    pub fn get<T, U>(&self) -> Result<&T, BadAccess>
    where
        S: Split<T, U>,
        U: Index,
    {
        self.check(U::TAG)?;
        Ok(unsafe { self.get_unchecked::<T, U>() })
    }

    pub fn get_mut<T, U>(&mut self) -> Result<&mut T, BadAccess>
    where
        S: Split<T, U>,
        U: Index,
    {
        self.check(U::TAG)?;
        Ok(unsafe { self.get_unchecked_mut::<T, U>() })
    }

    /// Like [`get`](Self::get), without saying why the access failed.
    pub fn get_if<T, U>(&self) -> Option<&T>
    where
        S: Split<T, U>,
        U: Index,
    {
        self.get::<T, U>().ok()
    }

    pub fn get_if_mut<T, U>(&mut self) -> Option<&mut T>
    where
        S: Split<T, U>,
        U: Index,
    {
        self.get_mut::<T, U>().ok()
    }

    /// # Safety
    ///
    /// The live alternative must be `T`.
    pub unsafe fn get_unchecked<T, U>(&self) -> &T
    where
        S: Split<T, U>,
        U: Index,
    {
        debug_assert_eq!(self.tag, U::TAG);
        unsafe { &*S::as_ptr(self.data.as_ptr()) }
    }

    /// # Safety
    ///
    /// The live alternative must be `T`.
    pub unsafe fn get_unchecked_mut<T, U>(&mut self) -> &mut T
    where
        S: Split<T, U>,
        U: Index,
    {
        debug_assert_eq!(self.tag, U::TAG);
        unsafe { &mut *S::as_mut_ptr(self.data.as_mut_ptr()) }
    }

    /// Moves the live alternative out. On a mismatch the variant is dropped.
    pub fn into_inner<T, U>(self) -> Result<T, BadAccess>
    where
        S: Split<T, U>,
        U: Index,
    {
        self.check(U::TAG)?;
        let this = ManuallyDrop::new(self);
        Ok(unsafe { ptr::read(S::as_ptr(this.data.as_ptr())) })
    }

    /// Moves the live alternative out, failing fatally on a mismatch.
    ///
    /// See [`BadAccess::fail`].
    #[track_caller]
    pub fn unwrap<T, U>(self) -> T
    where
        S: Split<T, U>,
        U: Index,
    {
        match self.into_inner::<T, U>() {
            Ok(value) => value,
            Err(err) => err.fail(),
        }
    }
}

impl<S: VariantList> Variant<S> {
    /// Destroys the live alternative and constructs `value` in its place.
    pub fn emplace<T, U>(&mut self, value: T) -> &mut T
    where
        S: Split<T, U>,
        U: Index,
    {
        self.reset();
        unsafe { self.construct::<T, U>(value) }
    }

    /// Destroys the live alternative, then constructs a new one from `f`.
    ///
    /// If `f` panics the variant is left valueless.
    pub fn emplace_with<T, U>(&mut self, f: impl FnOnce() -> T) -> &mut T
    where
        S: Split<T, U>,
        U: Index,
    {
        self.reset();
        let value = f();
        unsafe { self.construct::<T, U>(value) }
    }

    /// Destroys the live alternative, then constructs a new one from `f`.
    ///
    /// If `f` fails the variant is left valueless and the error is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tunion::Variant;
    ///
    /// let mut v: Variant![i32, u8] = Variant::new(1);
    /// let res = v.try_emplace_with(|| u8::try_from(300));
    /// assert!(res.is_err());
    /// assert!(v.is_valueless());
    /// ```
    pub fn try_emplace_with<T, U, E>(
        &mut self,
        f: impl FnOnce() -> Result<T, E>,
    ) -> Result<&mut T, E>
    where
        S: Split<T, U>,
        U: Index,
    {
        self.reset();
        let value = f()?;
        Ok(unsafe { self.construct::<T, U>(value) })
    }

    /// Assigns `value` to the alternative of its exact type.
    ///
    /// If that alternative is live the value is assigned in place; otherwise
    /// the live alternative is destroyed and `value` is constructed.
    pub fn set<T, U>(&mut self, value: T) -> &mut T
    where
        S: Split<T, U>,
        U: Index,
    {
        if self.tag == U::TAG {
            let slot = unsafe { self.get_unchecked_mut::<T, U>() };
            *slot = value;
            slot
        } else {
            self.emplace::<T, U>(value)
        }
    }

    /// Like [`set`](Self::set), building the value first.
    ///
    /// If `f` fails the variant is left untouched.
    pub fn try_set_with<T, U, E>(&mut self, f: impl FnOnce() -> Result<T, E>) -> Result<&mut T, E>
    where
        S: Split<T, U>,
        U: Index,
    {
        let value = f()?;
        Ok(self.set::<T, U>(value))
    }

    /// Converting assignment: `value` goes to the only alternative accepting
    /// it, following the same in-place rule as [`set`](Self::set).
    ///
    /// The conversion runs before anything is destroyed.
    pub fn assign<T, U>(&mut self, value: T) -> &mut Accepted<S, T, U>
    where
        S: Accept<T, U> + Split<Accepted<S, T, U>, U>,
        U: Index,
    {
        let value = S::accept(value);
        self.set::<_, U>(value)
    }

    /// Exchanges the values of two variants.
    ///
    /// The value of `self` moves into a temporary, the value of `other` moves
    /// into `self`, then the temporary moves into `other`.
    pub fn swap(&mut self, other: &mut Self) {
        let temp = mem::replace(self, Self::empty());
        *self = mem::replace(other, temp);
    }
}

impl<S: VariantList> Variant<S> {
    /// Takes out the alternative `T`, or re-types the variant over the
    /// remaining alternatives.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tunion::Variant;
    ///
    /// let v: Variant![u32, char, bool] = Variant::new('x');
    /// let rest: Variant![char, bool] = v.try_unwrap::<u32, _>().unwrap_err();
    /// assert_eq!(rest.try_unwrap::<char, _>().ok(), Some('x'));
    /// ```
    pub fn try_unwrap<T, U>(self) -> Result<T, Variant<Rem<S, T, U>>>
    where
        S: Split<T, U>,
        U: Index,
    {
        match self.tag {
            VALUELESS => Err(unsafe { self.relist(VALUELESS) }),
            tag => match S::try_unwrap(tag) {
                Ok(()) => {
                    let this = ManuallyDrop::new(self);
                    Ok(unsafe { ptr::read(S::as_ptr(this.data.as_ptr())) })
                }
                Err(tag) => Err(unsafe { self.relist(tag) }),
            },
        }
    }

    /// Splits the variant into one over the sub-list `S2` if its live
    /// alternative belongs there, or over the remaining alternatives otherwise.
    ///
    /// A valueless variant narrows into a valueless `Variant<S2>`.
    pub fn narrow<S2, UMap>(self) -> Result<Variant<S2>, Variant<NarrowRem<S, S2, UMap>>>
    where
        S: SplitList<S2, UMap>,
        S2: VariantList,
    {
        match self.tag {
            VALUELESS => Ok(unsafe { self.relist(VALUELESS) }),
            tag => match S::narrow_tag(tag) {
                Ok(tag) => Ok(unsafe { self.relist(tag) }),
                Err(tag) => Err(unsafe { self.relist(tag) }),
            },
        }
    }

    /// Re-embeds the variant into one over the super-list `S2`.
    pub fn broaden<S2, UMap>(self) -> Variant<S2>
    where
        S2: SplitList<S, UMap>,
    {
        let tag = match self.tag {
            VALUELESS => VALUELESS,
            tag => S2::broaden_tag(tag),
        };
        unsafe { self.relist(tag) }
    }

    /// Moves the live alternative, untouched, into a variant over `S2`.
    ///
    /// # Safety
    ///
    /// `tag` must name in `S2` the alternative live in `self`, or be the
    /// valueless tag if `self` is valueless.
    unsafe fn relist<S2: VariantList>(self, tag: u8) -> Variant<S2> {
        let this = ManuallyDrop::new(self);
        let mut data = MaybeUninit::<Repr<S2>>::uninit();
        let len = mem::size_of::<Repr<S>>().min(mem::size_of::<Repr<S2>>());
        unsafe {
            ptr::copy_nonoverlapping(
                this.data.as_ptr().cast::<u8>(),
                data.as_mut_ptr().cast::<u8>(),
                len,
            )
        };
        Variant { tag, data }
    }
}

impl<S: VariantList> Default for Variant<S> {
    fn default() -> Self {
        Self::valueless()
    }
}

impl<S: VariantList> Drop for Variant<S> {
    fn drop(&mut self) {
        self.reset()
    }
}
