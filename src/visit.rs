//! Visitation: one operation dispatched to whichever alternative is live.
//!
//! A visitor names its result once, in [`Visitor::Output`], and implements
//! [`Visit`] for every argument it can receive. The argument is the
//! alternative itself for [`Variant::visit`], a shared reference for
//! [`Variant::visit_ref`] and a mutable reference for [`Variant::visit_mut`].
//! Since every arm shares `Output`, the result type is unified up front; a
//! visitor missing an alternative does not compile.
//!
//! ```rust
//! use tunion::{Variant, visit::{Visit, Visitor}};
//!
//! struct Describe;
//!
//! impl Visitor for Describe {
//!     type Output = String;
//! }
//!
//! impl<'a> Visit<&'a i32> for Describe {
//!     fn visit(self, value: &'a i32) -> String {
//!         format!("int {value}")
//!     }
//! }
//!
//! impl<'a> Visit<&'a f32> for Describe {
//!     fn visit(self, value: &'a f32) -> String {
//!         format!("float {value}")
//!     }
//! }
//!
//! impl<'a> Visit<&'a String> for Describe {
//!     fn visit(self, value: &'a String) -> String {
//!         format!("string {value:?}")
//!     }
//! }
//!
//! let v: Variant![i32, f32, String] = Variant::new(1.5f32);
//! assert_eq!(v.visit_ref(Describe), "float 1.5");
//! ```
//!
//! [`Variant::visit`]: crate::Variant::visit
//! [`Variant::visit_ref`]: crate::Variant::visit_ref
//! [`Variant::visit_mut`]: crate::Variant::visit_mut

use core::{mem::ManuallyDrop, ptr};

use crate::{
    BadAccess, VALUELESS, Variant,
    repr::{Cons, VariantList},
};

/// An operation applicable to every alternative of a variant.
pub trait Visitor {
    /// The result of the operation, shared by every alternative.
    type Output;
}

/// Applies the visitor to one alternative shape `T`.
pub trait Visit<T>: Visitor {
    fn visit(self, value: T) -> Self::Output;
}

/// Type lists whose alternatives can all be visited by value with `V`.
pub trait VisitOnce<V: Visitor>: VariantList {
    #[doc(hidden)]
    unsafe fn visit(this: *mut Self::Repr, tag: u8, visitor: V) -> V::Output;
}

impl<V: Visitor> VisitOnce<V> for () {
    unsafe fn visit(_: *mut Self::Repr, tag: u8, _: V) -> V::Output {
        unreachable!("visiting tag {tag} past the last alternative")
    }
}

impl<V, Head, Tail> VisitOnce<V> for (Head, Tail)
where
    V: Visit<Head>,
    Tail: VisitOnce<V>,
{
    unsafe fn visit(this: *mut Self::Repr, tag: u8, visitor: V) -> V::Output {
        if tag == 0 {
            visitor.visit(unsafe { ptr::read(Cons::head_mut(this)) })
        } else {
            unsafe { Tail::visit(Cons::next_mut(this), tag - 1, visitor) }
        }
    }
}

/// Type lists whose alternatives can all be visited by shared reference.
pub trait VisitRef<'a, V: Visitor>: VariantList {
    #[doc(hidden)]
    unsafe fn visit_ref(this: *const Self::Repr, tag: u8, visitor: V) -> V::Output;
}

impl<V: Visitor> VisitRef<'_, V> for () {
    unsafe fn visit_ref(_: *const Self::Repr, tag: u8, _: V) -> V::Output {
        unreachable!("visiting tag {tag} past the last alternative")
    }
}

impl<'a, V, Head, Tail> VisitRef<'a, V> for (Head, Tail)
where
    Head: 'a,
    V: Visit<&'a Head>,
    Tail: VisitRef<'a, V>,
{
    unsafe fn visit_ref(this: *const Self::Repr, tag: u8, visitor: V) -> V::Output {
        if tag == 0 {
            visitor.visit(unsafe { &*Cons::head(this) })
        } else {
            unsafe { Tail::visit_ref(Cons::next(this), tag - 1, visitor) }
        }
    }
}

/// Type lists whose alternatives can all be visited by mutable reference.
pub trait VisitMut<'a, V: Visitor>: VariantList {
    #[doc(hidden)]
    unsafe fn visit_mut(this: *mut Self::Repr, tag: u8, visitor: V) -> V::Output;
}

impl<V: Visitor> VisitMut<'_, V> for () {
    unsafe fn visit_mut(_: *mut Self::Repr, tag: u8, _: V) -> V::Output {
        unreachable!("visiting tag {tag} past the last alternative")
    }
}

impl<'a, V, Head, Tail> VisitMut<'a, V> for (Head, Tail)
where
    Head: 'a,
    V: Visit<&'a mut Head>,
    Tail: VisitMut<'a, V>,
{
    unsafe fn visit_mut(this: *mut Self::Repr, tag: u8, visitor: V) -> V::Output {
        if tag == 0 {
            visitor.visit(unsafe { &mut *Cons::head_mut(this) })
        } else {
            unsafe { Tail::visit_mut(Cons::next_mut(this), tag - 1, visitor) }
        }
    }
}

impl<S: VariantList> Variant<S> {
    /// Consumes the variant and hands its value to `visitor`.
    pub fn try_visit<V>(self, visitor: V) -> Result<V::Output, BadAccess>
    where
        V: Visitor,
        S: VisitOnce<V>,
    {
        if self.tag == VALUELESS {
            return Err(BadAccess::Valueless);
        }
        let mut this = ManuallyDrop::new(self);
        Ok(unsafe { S::visit(this.data.as_mut_ptr(), this.tag, visitor) })
    }

    pub fn try_visit_ref<'a, V>(&'a self, visitor: V) -> Result<V::Output, BadAccess>
    where
        V: Visitor,
        S: VisitRef<'a, V>,
    {
        match self.tag {
            VALUELESS => Err(BadAccess::Valueless),
            tag => Ok(unsafe { S::visit_ref(self.data.as_ptr(), tag, visitor) }),
        }
    }

    pub fn try_visit_mut<'a, V>(&'a mut self, visitor: V) -> Result<V::Output, BadAccess>
    where
        V: Visitor,
        S: VisitMut<'a, V>,
    {
        match self.tag {
            VALUELESS => Err(BadAccess::Valueless),
            tag => Ok(unsafe { S::visit_mut(self.data.as_mut_ptr(), tag, visitor) }),
        }
    }

    /// Like [`try_visit`](Self::try_visit); visiting a valueless variant is a
    /// fatal bad access.
    #[track_caller]
    pub fn visit<V>(self, visitor: V) -> V::Output
    where
        V: Visitor,
        S: VisitOnce<V>,
    {
        match self.try_visit(visitor) {
            Ok(output) => output,
            Err(err) => err.fail(),
        }
    }

    #[track_caller]
    pub fn visit_ref<'a, V>(&'a self, visitor: V) -> V::Output
    where
        V: Visitor,
        S: VisitRef<'a, V>,
    {
        match self.try_visit_ref(visitor) {
            Ok(output) => output,
            Err(err) => err.fail(),
        }
    }

    #[track_caller]
    pub fn visit_mut<'a, V>(&'a mut self, visitor: V) -> V::Output
    where
        V: Visitor,
        S: VisitMut<'a, V>,
    {
        match self.try_visit_mut(visitor) {
            Ok(output) => output,
            Err(err) => err.fail(),
        }
    }
}
