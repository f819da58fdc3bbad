use std::fmt::{Debug, Display};
use std::{
    cell::{Ref, RefCell, RefMut},
    rc::Rc,
};

/// Shared, interior-mutable container handle.
///
/// Cloning the handle aliases the same storage, the way arrays and objects
/// alias in a scripting runtime. `shallow_copy` is the only way to detach.
pub struct Shared<T> {
    inner: Rc<RefCell<T>>,
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> Shared<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(value)),
        }
    }

    pub fn borrow(&self) -> Ref<'_, T> {
        self.inner.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.inner.borrow_mut()
    }

    /// Identity comparison: both handles alias the same storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: Clone> Shared<T> {
    /// New storage holding a clone of the current contents. Handles stored
    /// inside the contents are cloned as handles, so nested containers stay
    /// aliased.
    pub fn shallow_copy(&self) -> Self {
        Self::new(self.borrow().clone())
    }
}

/// Identity first, then contents. Contents that reach back into the same
/// handle recurse without bound.
impl<T: PartialEq> PartialEq for Shared<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.borrow() == *other.borrow()
    }
}

impl<T: Debug> Debug for Shared<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.borrow())
    }
}

impl<T> Display for Shared<T>
where
    T: Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.borrow())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_alias_and_copies_detach() {
        let a = Shared::new(vec![1, 2]);
        let alias = a.clone();
        let copy = a.shallow_copy();

        alias.borrow_mut().push(3);

        assert!(a.ptr_eq(&alias));
        assert!(!a.ptr_eq(&copy));
        assert_eq!(*a.borrow(), vec![1, 2, 3]);
        assert_eq!(*copy.borrow(), vec![1, 2]);
    }

    #[test]
    fn shallow_copy_keeps_nested_handles_shared() {
        let nested = Shared::new(vec![1]);
        let outer = Shared::new(vec![nested.clone()]);
        let copy = outer.shallow_copy();

        nested.borrow_mut().push(2);

        assert!(copy.borrow()[0].ptr_eq(&nested));
        assert_eq!(*copy.borrow()[0].borrow(), vec![1, 2]);
    }
}
