use core::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    mem::MaybeUninit,
};

use crate::{
    VALUELESS, Variant,
    repr::{Cons, VariantList},
};

pub trait VariantClone: VariantList {
    #[doc(hidden)]
    unsafe fn clone(this: *const Self::Repr, tag: u8, dst: *mut Self::Repr);

    #[doc(hidden)]
    unsafe fn clone_from(this: *mut Self::Repr, source: *const Self::Repr, tag: u8);
}

impl VariantClone for () {
    unsafe fn clone(_: *const Self::Repr, _: u8, _: *mut Self::Repr) {}

    unsafe fn clone_from(_: *mut Self::Repr, _: *const Self::Repr, _: u8) {}
}

impl<Head: Clone, Tail: VariantClone> VariantClone for (Head, Tail) {
    unsafe fn clone(this: *const Self::Repr, tag: u8, dst: *mut Self::Repr) {
        unsafe {
            if tag == 0 {
                Cons::head_mut(dst).write((*Cons::head(this)).clone());
            } else {
                Tail::clone(Cons::next(this), tag - 1, Cons::next_mut(dst));
            }
        }
    }

    unsafe fn clone_from(this: *mut Self::Repr, source: *const Self::Repr, tag: u8) {
        unsafe {
            if tag == 0 {
                (*Cons::head_mut(this)).clone_from(&*Cons::head(source));
            } else {
                Tail::clone_from(Cons::next_mut(this), Cons::next(source), tag - 1);
            }
        }
    }
}

pub trait VariantPartialEq: VariantList {
    #[doc(hidden)]
    unsafe fn eq(this: *const Self::Repr, other: *const Self::Repr, tag: u8) -> bool;
}

impl VariantPartialEq for () {
    unsafe fn eq(_: *const Self::Repr, _: *const Self::Repr, _: u8) -> bool {
        true
    }
}

impl<Head: PartialEq, Tail: VariantPartialEq> VariantPartialEq for (Head, Tail) {
    unsafe fn eq(this: *const Self::Repr, other: *const Self::Repr, tag: u8) -> bool {
        unsafe {
            if tag == 0 {
                *Cons::head(this) == *Cons::head(other)
            } else {
                Tail::eq(Cons::next(this), Cons::next(other), tag - 1)
            }
        }
    }
}

pub trait VariantPartialOrd: VariantPartialEq {
    #[doc(hidden)]
    unsafe fn partial_cmp(
        this: *const Self::Repr,
        other: *const Self::Repr,
        tag: u8,
    ) -> Option<Ordering>;
}

impl VariantPartialOrd for () {
    unsafe fn partial_cmp(_: *const Self::Repr, _: *const Self::Repr, _: u8) -> Option<Ordering> {
        Some(Ordering::Equal)
    }
}

impl<Head: PartialOrd, Tail: VariantPartialOrd> VariantPartialOrd for (Head, Tail) {
    unsafe fn partial_cmp(
        this: *const Self::Repr,
        other: *const Self::Repr,
        tag: u8,
    ) -> Option<Ordering> {
        unsafe {
            if tag == 0 {
                (*Cons::head(this)).partial_cmp(&*Cons::head(other))
            } else {
                Tail::partial_cmp(Cons::next(this), Cons::next(other), tag - 1)
            }
        }
    }
}

pub trait VariantOrd: VariantPartialOrd {
    #[doc(hidden)]
    unsafe fn cmp(this: *const Self::Repr, other: *const Self::Repr, tag: u8) -> Ordering;
}

impl VariantOrd for () {
    unsafe fn cmp(_: *const Self::Repr, _: *const Self::Repr, _: u8) -> Ordering {
        Ordering::Equal
    }
}

impl<Head: Ord, Tail: VariantOrd> VariantOrd for (Head, Tail) {
    unsafe fn cmp(this: *const Self::Repr, other: *const Self::Repr, tag: u8) -> Ordering {
        unsafe {
            if tag == 0 {
                (*Cons::head(this)).cmp(&*Cons::head(other))
            } else {
                Tail::cmp(Cons::next(this), Cons::next(other), tag - 1)
            }
        }
    }
}

pub trait VariantHash: VariantList {
    #[doc(hidden)]
    unsafe fn hash<H: Hasher>(this: *const Self::Repr, tag: u8, state: &mut H);
}

impl VariantHash for () {
    unsafe fn hash<H: Hasher>(_: *const Self::Repr, _: u8, _: &mut H) {}
}

impl<Head: Hash, Tail: VariantHash> VariantHash for (Head, Tail) {
    unsafe fn hash<H: Hasher>(this: *const Self::Repr, tag: u8, state: &mut H) {
        unsafe {
            if tag == 0 {
                (*Cons::head(this)).hash(state)
            } else {
                Tail::hash(Cons::next(this), tag - 1, state)
            }
        }
    }
}

pub trait VariantDebug: VariantList {
    #[doc(hidden)]
    unsafe fn fmt(this: *const Self::Repr, tag: u8, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl VariantDebug for () {
    unsafe fn fmt(_: *const Self::Repr, _: u8, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        Ok(())
    }
}

impl<Head: fmt::Debug, Tail: VariantDebug> VariantDebug for (Head, Tail) {
    unsafe fn fmt(this: *const Self::Repr, tag: u8, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        unsafe {
            if tag == 0 {
                fmt::Debug::fmt(&*Cons::head(this), f)
            } else {
                Tail::fmt(Cons::next(this), tag - 1, f)
            }
        }
    }
}

impl<S: VariantDebug> fmt::Debug for Variant<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tag {
            VALUELESS => f.write_str("Valueless"),
            tag => unsafe { S::fmt(self.data.as_ptr(), tag, f) },
        }
    }
}

impl<S: VariantClone> Clone for Variant<S> {
    fn clone(&self) -> Self {
        let mut data = MaybeUninit::uninit();
        if self.tag != VALUELESS {
            unsafe { S::clone(self.data.as_ptr(), self.tag, data.as_mut_ptr()) }
        }
        Variant {
            tag: self.tag,
            data,
        }
    }

    /// Copy-assignment.
    ///
    /// The same alternative is assigned in place with its own `clone_from`; a
    /// different one is cloned first, then replaces the live one.
    fn clone_from(&mut self, source: &Self) {
        if source.tag == VALUELESS {
            self.reset();
        } else if self.tag == source.tag {
            unsafe { S::clone_from(self.data.as_mut_ptr(), source.data.as_ptr(), self.tag) }
        } else {
            *self = source.clone();
        }
    }
}

impl<S: VariantPartialEq> PartialEq for Variant<S> {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag
            && (self.tag == VALUELESS
                || unsafe { S::eq(self.data.as_ptr(), other.data.as_ptr(), self.tag) })
    }
}

impl<S: VariantPartialEq + Eq> Eq for Variant<S> {}

/// Valueless orders before every value.
fn rank(tag: u8) -> u8 {
    tag.wrapping_add(1)
}

impl<S: VariantPartialOrd> PartialOrd for Variant<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match rank(self.tag).cmp(&rank(other.tag)) {
            Ordering::Equal if self.tag == VALUELESS => Some(Ordering::Equal),
            Ordering::Equal => unsafe {
                S::partial_cmp(self.data.as_ptr(), other.data.as_ptr(), self.tag)
            },
            other => Some(other),
        }
    }
}

impl<S: VariantOrd + Eq> Ord for Variant<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        rank(self.tag).cmp(&rank(other.tag)).then_with(|| match self.tag {
            VALUELESS => Ordering::Equal,
            tag => unsafe { S::cmp(self.data.as_ptr(), other.data.as_ptr(), tag) },
        })
    }
}

impl<S: VariantHash> Hash for Variant<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tag.hash(state);
        if self.tag != VALUELESS {
            unsafe { S::hash(self.data.as_ptr(), self.tag, state) }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::hash_map::DefaultHasher,
        hash::{Hash, Hasher},
        string::{String, ToString},
        vec::Vec,
    };

    use crate::Variant;

    type V = Variant![i32, String];

    fn hash_of(v: &V) -> u64 {
        let mut hasher = DefaultHasher::new();
        v.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn equality() {
        assert_eq!(V::new(1), V::new(1));
        assert_ne!(V::new(1), V::new(2));
        assert_ne!(V::new(1), V::new("1".to_string()));
        assert_ne!(V::new(1), V::valueless());
        assert_eq!(V::valueless(), V::valueless());
    }

    #[test]
    fn ordering() {
        let mut values = Vec::from([
            V::new("b".to_string()),
            V::new(7),
            V::valueless(),
            V::new("a".to_string()),
            V::new(-3),
        ]);
        values.sort();
        assert_eq!(
            values,
            [
                V::valueless(),
                V::new(-3),
                V::new(7),
                V::new("a".to_string()),
                V::new("b".to_string()),
            ]
        );
    }

    #[test]
    fn hashing_follows_equality() {
        assert_eq!(hash_of(&V::new(5)), hash_of(&V::new(5)));
        assert_eq!(hash_of(&V::valueless()), hash_of(&V::valueless()));
        assert_ne!(hash_of(&V::new(5)), hash_of(&V::valueless()));
    }

    #[test]
    fn clone_keeps_alternative() {
        let v = V::new("text".to_string());
        let w = v.clone();
        assert_eq!(v, w);
        assert_eq!(w.index(), 1);
        assert!(V::valueless().clone().is_valueless());
    }
}
