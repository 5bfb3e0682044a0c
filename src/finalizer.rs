use std::sync::Arc;
use tracing::warn;

use crate::{
    any::RcAny,
    service::{service_fn, BoxCloneService},
};

pub trait Finalizer<Dep: ?Sized>: Clone + 'static {
    fn finalize(&mut self, dependency: Arc<Dep>);
}

pub(crate) type BoxedCloneFinalizer = BoxCloneService<RcAny, (), ()>;

#[must_use]
pub(crate) fn boxed_finalizer_factory<Dep, Fin>(mut finalizer: Fin) -> BoxedCloneFinalizer
where
    Dep: ?Sized + Send + Sync + 'static,
    Fin: Finalizer<Dep> + Send + Sync,
{
    BoxCloneService(Box::new(service_fn(move |dependency: RcAny| {
        match dependency.downcast_ref::<Arc<Dep>>() {
            Some(dependency) => {
                finalizer.finalize(dependency.clone());
                Ok(())
            }
            None => {
                warn!("Finalizer skipped, value isn't an instance of the finalized type");
                Err(())
            }
        }
    })))
}

impl<F, Dep> Finalizer<Dep> for F
where
    F: FnMut(Arc<Dep>) + Clone + 'static,
    Dep: ?Sized,
{
    #[inline]
    fn finalize(&mut self, dependency: Arc<Dep>) {
        self(dependency);
    }
}

#[cfg(test)]
mod tests {
    use core::sync::atomic::{AtomicU8, Ordering};
    use std::sync::Arc;

    use super::boxed_finalizer_factory;
    use crate::{any::RcAny, service::Service as _};

    #[test]
    fn test_finalizer_called_with_value() {
        let sum = Arc::new(AtomicU8::new(0));
        let mut finalizer = boxed_finalizer_factory({
            let sum = sum.clone();
            move |val: Arc<u8>| {
                sum.fetch_add(*val, Ordering::SeqCst);
            }
        });

        let value: RcAny = Arc::new(Arc::new(3u8));
        assert!(finalizer.call(value).is_ok());

        let wrong: RcAny = Arc::new(Arc::new(3u16));
        assert!(finalizer.call(wrong).is_err());

        assert_eq!(sum.load(Ordering::SeqCst), 3);
    }
}
