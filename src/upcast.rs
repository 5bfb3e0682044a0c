use std::sync::Arc;

/// Converts a shared implementation into a shared interface.
///
/// Every sized type is its own interface. For trait objects use [`crate::implements`].
pub trait Upcast<I: ?Sized> {
    fn upcast(self: Arc<Self>) -> Arc<I>;
}

impl<T> Upcast<T> for T {
    #[inline]
    fn upcast(self: Arc<Self>) -> Arc<T> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::Upcast;

    use std::sync::Arc;

    trait Named: Send + Sync {
        fn name(&self) -> &'static str;
    }

    struct Service;

    impl Named for Service {
        fn name(&self) -> &'static str {
            "service"
        }
    }

    implements!(Service => dyn Named);

    #[test]
    fn test_identity() {
        let service = Arc::new(Service);
        let same: Arc<Service> = service.clone().upcast();

        assert!(Arc::ptr_eq(&service, &same));
    }

    #[test]
    fn test_trait_object() {
        let named: Arc<dyn Named> = Arc::new(Service).upcast();

        assert_eq!(named.name(), "service");
    }
}
