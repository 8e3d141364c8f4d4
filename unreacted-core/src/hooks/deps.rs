//! Effect Dependencies
//!
//! A dependency list is a short sequence of heterogeneous values compared
//! position by position. Each [`Dep`] erases its type but keeps `PartialEq`:
//! two deps are equal only if they hold the same type and compare equal.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

/// Object-safe equality over type-erased values.
pub trait DepValue: Any {
    fn dep_eq(&self, other: &dyn DepValue) -> bool;
    fn as_any(&self) -> &dyn Any;
    fn debug_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<T> DepValue for T
where
    T: PartialEq + fmt::Debug + 'static,
{
    fn dep_eq(&self, other: &dyn DepValue) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn debug_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One entry of a dependency list.
#[derive(Clone)]
pub struct Dep(Rc<dyn DepValue>);

impl Dep {
    /// Wrap a value; it compares equal only to a `Dep` of the same type and
    /// an equal value.
    pub fn new<T>(value: T) -> Self
    where
        T: PartialEq + fmt::Debug + 'static,
    {
        Self(Rc::new(value))
    }
}

impl PartialEq for Dep {
    fn eq(&self, other: &Self) -> bool {
        self.0.dep_eq(&*other.0)
    }
}

impl fmt::Debug for Dep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.debug_fmt(f)
    }
}

/// A dependency list.
pub type Deps = SmallVec<[Dep; 4]>;

/// True if two dependency lists differ in length or at any position.
pub(crate) fn deps_changed(new: &[Dep], old: &[Dep]) -> bool {
    new.len() != old.len() || new.iter().zip(old).any(|(a, b)| a != b)
}

/// Build a [`Deps`] list: `deps![count, name.clone()]`.
#[macro_export]
macro_rules! deps {
    () => {
        $crate::hooks::Deps::new()
    };
    ($($value:expr),+ $(,)?) => {
        <$crate::hooks::Deps as ::std::iter::FromIterator<$crate::hooks::Dep>>::from_iter(
            [$($crate::hooks::Dep::new($value)),*]
        )
    };
}
