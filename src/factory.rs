use core::fmt;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

use crate::errors::{FactoryErrorKind, ResolveErrorKind};

/// Zero-argument producer shared by the factory variants and registered alongside them.
pub type ProducerFn<T> = dyn Fn() -> Result<Arc<T>, ResolveErrorKind> + Send + Sync;

/// Which payload a [`Factory`] was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactoryKind {
    Instance,
    Producer,
}

enum Payload<T: ?Sized + 'static> {
    Instance(Arc<T>),
    Producer(Arc<ProducerFn<T>>),
}

impl<T: ?Sized + 'static> Clone for Payload<T> {
    fn clone(&self) -> Self {
        match self {
            Payload::Instance(instance) => Payload::Instance(instance.clone()),
            Payload::Producer(producer) => Payload::Producer(producer.clone()),
        }
    }
}

/// Produces `T` without exposing the container it comes from.
///
/// A factory either hands out one pre-resolved instance or runs a producer on every [`Factory::create`].
/// After [`Factory::dispose`] every `create` fails with [`FactoryErrorKind::InvalidState`].
pub struct Factory<T: ?Sized + 'static> {
    payload: Mutex<Option<Payload<T>>>,
}

impl<T: ?Sized + 'static> Factory<T> {
    #[inline]
    #[must_use]
    pub fn from_instance(instance: Arc<T>) -> Self {
        Self {
            payload: Mutex::new(Some(Payload::Instance(instance))),
        }
    }

    #[inline]
    #[must_use]
    pub fn from_producer(producer: Arc<ProducerFn<T>>) -> Self {
        Self {
            payload: Mutex::new(Some(Payload::Producer(producer))),
        }
    }

    #[inline]
    #[must_use]
    pub fn from_fn<F>(producer: F) -> Self
    where
        F: Fn() -> Result<Arc<T>, ResolveErrorKind> + Send + Sync + 'static,
    {
        Self::from_producer(Arc::new(producer))
    }

    /// Returns the held instance or the producer's result.
    ///
    /// # Errors
    /// - [`FactoryErrorKind::InvalidState`] if the factory was disposed
    /// - [`FactoryErrorKind::Produce`] if the producer fails
    pub fn create(&self) -> Result<Arc<T>, FactoryErrorKind> {
        // The producer may resolve through the container, so it runs without the lock
        let payload = self.payload.lock().clone();

        match payload {
            Some(Payload::Instance(instance)) => Ok(instance),
            Some(Payload::Producer(producer)) => producer().map_err(FactoryErrorKind::Produce),
            None => {
                debug!("Factory disposed, nothing to create");
                Err(FactoryErrorKind::InvalidState)
            }
        }
    }

    /// Releases the payload. Calling it again does nothing.
    pub fn dispose(&self) {
        let payload = self.payload.lock().take();

        if payload.is_some() {
            debug!("Factory disposed");
        }
    }

    #[inline]
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.payload.lock().is_none()
    }

    /// `None` once disposed.
    #[must_use]
    pub fn kind(&self) -> Option<FactoryKind> {
        self.payload.lock().as_ref().map(|payload| match payload {
            Payload::Instance(_) => FactoryKind::Instance,
            Payload::Producer(_) => FactoryKind::Producer,
        })
    }
}

impl<T: ?Sized + 'static> fmt::Debug for Factory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("type", &core::any::type_name::<T>())
            .field("kind", &self.kind())
            .finish()
    }
}
