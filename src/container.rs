use core::any::type_name;
use parking_lot::{Mutex, ReentrantMutex};
use std::{
    cell::RefCell,
    sync::{Arc, Weak},
};
use tracing::{debug, error, info_span};

use crate::{
    any::{RcAny, TypeInfo},
    cache::{Cache, Resolved, ServiceKey},
    config::Config,
    errors::{InstantiatorErrorKind, ResolveErrorKind},
    lifetime::Lifetime,
    registry::{InstantiatorData, Registry, ServiceCollection},
    service::Service as _,
};

/// Outcome of [`Container::try_get`], separating the recoverable missing-scope case from other failures.
pub enum Resolution<T: ?Sized> {
    Resolved(Arc<T>),
    /// A scoped service, or one of its dependencies, was requested outside any scope.
    NoActiveScope(ResolveErrorKind),
    Failed(ResolveErrorKind),
}

impl<T: ?Sized> Resolution<T> {
    /// # Errors
    /// The error of any unresolved outcome.
    pub fn into_result(self) -> Result<Arc<T>, ResolveErrorKind> {
        match self {
            Resolution::Resolved(dependency) => Ok(dependency),
            Resolution::NoActiveScope(err) | Resolution::Failed(err) => Err(err),
        }
    }
}

#[derive(Clone)]
pub struct Container {
    pub(crate) inner: Arc<ContainerInner>,
}

/// Non-owning handle to a container, for values that outlive a resolution but shouldn't keep the container alive.
#[derive(Clone)]
pub struct WeakContainer {
    inner: Weak<ContainerInner>,
}

impl WeakContainer {
    #[inline]
    #[must_use]
    pub fn upgrade(&self) -> Option<Container> {
        self.inner.upgrade().map(|inner| Container { inner })
    }
}

impl Container {
    /// Creates the root container from registrations with the default [`Config`]
    #[inline]
    #[must_use]
    pub fn new(services: ServiceCollection) -> Self {
        Self::new_with_config(services, Config::default())
    }

    #[inline]
    #[must_use]
    pub fn new_with_config(services: ServiceCollection, config: Config) -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                cache: Mutex::new(Cache::new()),
                creation_lock: ReentrantMutex::new(()),
                registry: Arc::new(services.into_registry()),
                config,
                root: None,
            }),
        }
    }

    /// Creates a scope. Scoped services are cached per scope, singletons are still shared with the root.
    ///
    /// # Notes
    /// Scopes are flat: creating a scope from a scope gives a sibling, not a child.
    /// The scope is closed when its last handle is dropped.
    #[inline]
    #[must_use]
    pub fn create_scope(&self) -> Container {
        let root = self.root().clone();

        debug!("Scope created");

        Container {
            inner: Arc::new(ContainerInner {
                cache: Mutex::new(Cache::new()),
                creation_lock: ReentrantMutex::new(()),
                registry: root.inner.registry.clone(),
                config: root.inner.config,
                root: Some(root),
            }),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_scope(&self) -> bool {
        self.inner.root.is_some()
    }

    #[inline]
    #[must_use]
    pub fn downgrade(&self) -> WeakContainer {
        WeakContainer {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Gets a service from the container with the lifetime of its last registration
    ///
    /// # Errors
    /// - [`ResolveErrorKind::NoInstantiator`] if the service isn't registered
    /// - [`ResolveErrorKind::NoActiveScope`] if the service is scoped and the container isn't a scope
    /// - [`ResolveErrorKind::CyclicDependency`] if the service depends on itself
    /// - [`ResolveErrorKind::Instantiator`] if the instantiator or one of its dependencies fails
    pub fn get<I: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<I>, ResolveErrorKind> {
        let span = info_span!("get", dependency = type_name::<I>(), container = self.kind());
        let _guard = span.enter();

        let type_info = TypeInfo::of::<I>();

        let Some((key, data)) = self.inner.registry.get(&type_info.id) else {
            let err = ResolveErrorKind::NoInstantiator { type_info };
            error!("{}", err);
            return Err(err);
        };

        self.resolve(key, data, type_info)
    }

    /// Same as [`Self::get`], but tells a missing scope apart from other failures.
    pub fn try_get<I: ?Sized + Send + Sync + 'static>(&self) -> Resolution<I> {
        match self.get() {
            Ok(dependency) => Resolution::Resolved(dependency),
            Err(err) if err.is_no_active_scope() => Resolution::NoActiveScope(err),
            Err(err) => Resolution::Failed(err),
        }
    }

    /// Gets a service from every registration of it, in registration order.
    /// A service without registrations gives an empty list.
    ///
    /// # Errors
    /// The first error of [`Self::get`] met while resolving the registrations.
    pub fn get_all<I: ?Sized + Send + Sync + 'static>(&self) -> Result<Vec<Arc<I>>, ResolveErrorKind> {
        let span = info_span!("get_all", dependency = type_name::<I>(), container = self.kind());
        let _guard = span.enter();

        let type_info = TypeInfo::of::<I>();

        self.inner
            .registry
            .get_all(&type_info.id)
            .map(|(key, data)| self.resolve(key, data, type_info))
            .collect()
    }

    /// Closes the container, calling finalizers for resolved dependencies in LIFO order.
    ///
    /// # Warning
    /// This method can be called multiple times, but it will only call finalizers for dependencies that were resolved since the last call
    pub fn close(&self) {
        self.inner.close();
    }
}

impl Container {
    #[inline]
    fn root(&self) -> &Container {
        self.inner.root.as_ref().unwrap_or(self)
    }

    #[inline]
    fn kind(&self) -> &'static str {
        if self.is_scope() {
            "scope"
        } else {
            "root"
        }
    }

    fn resolve<I: ?Sized + Send + Sync + 'static>(
        &self,
        key: ServiceKey,
        data: &InstantiatorData,
        type_info: TypeInfo,
    ) -> Result<Arc<I>, ResolveErrorKind> {
        let lifetime = data.descriptor.lifetime;
        if !lifetime.is_cached() {
            return self.instantiate(key, data, type_info).map(|(dependency, _)| dependency);
        }

        let owner = if lifetime == Lifetime::Singleton {
            self.root()
        } else if self.is_scope() || !self.inner.config.validate_scopes {
            self
        } else {
            let err = ResolveErrorKind::NoActiveScope { type_info };
            debug!("{}", err);
            return Err(err);
        };

        owner.get_cached(key, data, type_info)
    }

    fn get_cached<I: ?Sized + Send + Sync + 'static>(
        &self,
        key: ServiceKey,
        data: &InstantiatorData,
        type_info: TypeInfo,
    ) -> Result<Arc<I>, ResolveErrorKind> {
        if let Some(dependency) = self.inner.cache.lock().get(&key) {
            debug!("Found in cache");
            return Ok(dependency);
        }
        debug!("Not found in cache");

        let _creation_guard = self.inner.creation_lock.lock();
        // Another thread may have created it while we were waiting
        if let Some(dependency) = self.inner.cache.lock().get(&key) {
            debug!("Found in cache after creation lock");
            return Ok(dependency);
        }

        let (dependency, erased) = self.instantiate::<I>(key, data, type_info)?;

        let mut guard = self.inner.cache.lock();
        guard.insert(key, erased.clone());
        debug!("Cached");
        if data.finalizer.is_some() {
            guard.push_resolved(Resolved { key, dependency: erased });
            debug!("Pushed to resolved set");
        }

        Ok(dependency)
    }

    fn instantiate<I: ?Sized + Send + Sync + 'static>(
        &self,
        key: ServiceKey,
        data: &InstantiatorData,
        type_info: TypeInfo,
    ) -> Result<(Arc<I>, RcAny), ResolveErrorKind> {
        let _resolving = ResolvingGuard::enter(key, type_info).map_err(|err| {
            error!("{}", err);
            err
        })?;

        match data.instantiator.clone().call(self.clone()) {
            Ok(erased) => match erased.downcast_ref::<Arc<I>>().cloned() {
                Some(dependency) => Ok((dependency, erased)),
                None => {
                    let err = ResolveErrorKind::IncorrectType {
                        expected: type_info,
                        actual: (*erased).type_id(),
                    };
                    error!(index = key.index, "{}", err);
                    Err(err)
                }
            },
            Err(InstantiatorErrorKind::Deps(err)) => {
                error!("{}", err);
                Err(ResolveErrorKind::Instantiator(InstantiatorErrorKind::Deps(Box::new(err))))
            }
            Err(InstantiatorErrorKind::Factory(err)) => {
                error!("{}", err);
                Err(ResolveErrorKind::Instantiator(InstantiatorErrorKind::Factory(err)))
            }
        }
    }
}

pub(crate) struct ContainerInner {
    pub(crate) cache: Mutex<Cache>,
    pub(crate) creation_lock: ReentrantMutex<()>,
    pub(crate) registry: Arc<Registry>,
    pub(crate) config: Config,
    pub(crate) root: Option<Container>,
}

impl ContainerInner {
    fn close(&self) {
        // Cached values are dropped after the lock is released
        let mut cache = self.cache.lock().take();
        while let Some(Resolved { key, dependency }) = cache.pop_resolved() {
            let Some(InstantiatorData {
                descriptor,
                finalizer: Some(finalizer),
                ..
            }) = self.registry.get_by_key(&key)
            else {
                continue;
            };

            if finalizer.clone().call(dependency).is_ok() {
                debug!(service = descriptor.service.name, "Finalizer called");
            }
        }
    }
}

impl Drop for ContainerInner {
    fn drop(&mut self) {
        self.close();
        debug!("Container closed on drop");
    }
}

std::thread_local! {
    static RESOLVING: RefCell<Vec<(ServiceKey, TypeInfo)>> = const { RefCell::new(Vec::new()) };
}

/// Marks a binding as being instantiated on the current thread until dropped.
/// Other bindings of the same service may be resolved meanwhile.
struct ResolvingGuard;

impl ResolvingGuard {
    fn enter(key: ServiceKey, type_info: TypeInfo) -> Result<Self, ResolveErrorKind> {
        RESOLVING.with(|resolving| {
            let mut resolving = resolving.borrow_mut();
            if let Some(position) = resolving.iter().position(|(val, _)| *val == key) {
                let mut graph = resolving[position..].iter().map(|(_, type_info)| *type_info).collect::<Vec<_>>();
                graph.push(type_info);
                return Err(ResolveErrorKind::CyclicDependency {
                    graph: graph.into_boxed_slice(),
                });
            }

            resolving.push((key, type_info));
            Ok(Self)
        })
    }
}

impl Drop for ResolvingGuard {
    fn drop(&mut self) {
        RESOLVING.with(|resolving| {
            resolving.borrow_mut().pop();
        });
    }
}
