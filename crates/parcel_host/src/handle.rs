//! Opaque handles for host objects that cross the target-independent boundary.

use std::{any::Any, fmt, rc::Rc};

/// Cheaply clonable handle to a host-owned value such as a browser `File`.
///
/// Equality is identity: two handles are equal only when they share one allocation, so cloned
/// candidates compare equal while two drops of the same file name do not.
#[derive(Clone)]
pub struct OpaqueHandle(Rc<dyn Any>);

impl OpaqueHandle {
    /// Wraps a host value.
    pub fn new<T: 'static>(value: T) -> Self {
        Self(Rc::new(value))
    }

    /// Returns the wrapped value when it has type `T`.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Returns `true` when both handles point at the same host value.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl PartialEq for OpaqueHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for OpaqueHandle {}

impl fmt::Debug for OpaqueHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OpaqueHandle(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_are_equal_but_separate_values_are_not() {
        let a = OpaqueHandle::new("report.pdf".to_string());
        let b = OpaqueHandle::new("report.pdf".to_string());

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(a.downcast_ref::<String>().map(String::as_str), Some("report.pdf"));
        assert!(a.downcast_ref::<u32>().is_none());
    }
}
