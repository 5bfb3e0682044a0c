use core::any::TypeId;
use std::{collections::BTreeMap, sync::Arc};
use tracing::debug;

use crate::{
    any::TypeInfo,
    cache::ServiceKey,
    config::Config,
    dependency_resolver::DependencyResolver,
    errors::InstantiateErrorKind,
    finalizer::{boxed_finalizer_factory, BoxedCloneFinalizer, Finalizer},
    instantiator::{boxed_instantiator, boxed_shared_instantiator, instance, BoxedCloneInstantiator, Instantiator},
    lifetime::Lifetime,
    upcast::Upcast,
    Container,
};

/// Registration entry: which implementation serves an interface and for how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceDescriptor {
    pub service: TypeInfo,
    pub implementation: TypeInfo,
    pub lifetime: Lifetime,
}

#[derive(Clone)]
pub(crate) struct InstantiatorData {
    pub(crate) descriptor: ServiceDescriptor,
    pub(crate) instantiator: BoxedCloneInstantiator,
    pub(crate) finalizer: Option<BoxedCloneFinalizer>,
}

/// Append-only collection of registrations, built once into a [`Container`].
///
/// Several registrations of the same service are kept in registration order.
/// [`Container::get`] resolves the last one, [`Container::get_all`] resolves all of them.
#[derive(Default)]
pub struct ServiceCollection {
    entries: Vec<(ServiceDescriptor, BoxedCloneInstantiator)>,
    finalizers: BTreeMap<TypeId, BoxedCloneFinalizer>,
}

impl ServiceCollection {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            finalizers: BTreeMap::new(),
        }
    }

    /// Registers `Impl` as the implementation of `I`.
    pub fn add<I, Impl, Inst, Deps>(&mut self, lifetime: Lifetime, instantiator: Inst) -> &mut Self
    where
        I: ?Sized + Send + Sync + 'static,
        Impl: Upcast<I> + 'static,
        Inst: Instantiator<Deps, Provides = Impl, Error = InstantiateErrorKind> + Send + Sync,
        Deps: DependencyResolver,
    {
        self.add_instantiator(
            ServiceDescriptor {
                service: TypeInfo::of::<I>(),
                implementation: TypeInfo::of::<Impl>(),
                lifetime,
            },
            boxed_instantiator::<I, Inst, Deps>(instantiator),
        )
    }

    /// Registers a concrete type as its own service.
    #[inline]
    pub fn add_self<T, Inst, Deps>(&mut self, lifetime: Lifetime, instantiator: Inst) -> &mut Self
    where
        T: Send + Sync + 'static,
        Inst: Instantiator<Deps, Provides = T, Error = InstantiateErrorKind> + Send + Sync,
        Deps: DependencyResolver,
    {
        self.add::<T, T, Inst, Deps>(lifetime, instantiator)
    }

    #[inline]
    pub fn add_transient<I, Impl, Inst, Deps>(&mut self, instantiator: Inst) -> &mut Self
    where
        I: ?Sized + Send + Sync + 'static,
        Impl: Upcast<I> + 'static,
        Inst: Instantiator<Deps, Provides = Impl, Error = InstantiateErrorKind> + Send + Sync,
        Deps: DependencyResolver,
    {
        self.add::<I, Impl, Inst, Deps>(Lifetime::Transient, instantiator)
    }

    #[inline]
    pub fn add_scoped<I, Impl, Inst, Deps>(&mut self, instantiator: Inst) -> &mut Self
    where
        I: ?Sized + Send + Sync + 'static,
        Impl: Upcast<I> + 'static,
        Inst: Instantiator<Deps, Provides = Impl, Error = InstantiateErrorKind> + Send + Sync,
        Deps: DependencyResolver,
    {
        self.add::<I, Impl, Inst, Deps>(Lifetime::Scoped, instantiator)
    }

    #[inline]
    pub fn add_singleton<I, Impl, Inst, Deps>(&mut self, instantiator: Inst) -> &mut Self
    where
        I: ?Sized + Send + Sync + 'static,
        Impl: Upcast<I> + 'static,
        Inst: Instantiator<Deps, Provides = Impl, Error = InstantiateErrorKind> + Send + Sync,
        Deps: DependencyResolver,
    {
        self.add::<I, Impl, Inst, Deps>(Lifetime::Singleton, instantiator)
    }

    /// Registers an instantiator that already shares its value as `Arc<I>`.
    /// The descriptor names `I` as its own implementation.
    pub fn add_shared<I, Inst, Deps>(&mut self, lifetime: Lifetime, instantiator: Inst) -> &mut Self
    where
        I: ?Sized + Send + Sync + 'static,
        Inst: Instantiator<Deps, Provides = Arc<I>, Error = InstantiateErrorKind> + Send + Sync,
        Deps: DependencyResolver,
    {
        self.add_instantiator(
            ServiceDescriptor {
                service: TypeInfo::of::<I>(),
                implementation: TypeInfo::of::<I>(),
                lifetime,
            },
            boxed_shared_instantiator::<I, Inst, Deps>(instantiator),
        )
    }

    /// Registers a value created outside the container as a singleton.
    pub fn add_instance<I>(&mut self, value: Arc<I>) -> &mut Self
    where
        I: ?Sized + Send + Sync + 'static,
    {
        self.add_shared::<I, _, ()>(Lifetime::Singleton, instance(value))
    }

    /// Adds a finalizer for the given non transient service type.
    /// The finalizer will be called when the owning container is being closed in LIFO order of their usage (not the order of registration).
    ///
    /// # Warning
    /// - The finalizer can only be used for non-transient services, because the transient isn't cached.
    /// - A second finalizer for the same type replaces the first one.
    pub fn add_finalizer<Dep>(&mut self, finalizer: impl Finalizer<Dep> + Send + Sync) -> &mut Self
    where
        Dep: ?Sized + Send + Sync + 'static,
    {
        self.finalizers.insert(TypeId::of::<Dep>(), boxed_finalizer_factory(finalizer));
        self
    }

    /// Registration entries in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &ServiceDescriptor> {
        self.entries.iter().map(|(descriptor, _)| descriptor)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn build(self) -> Container {
        Container::new(self)
    }

    #[inline]
    #[must_use]
    pub fn build_with_config(self, config: Config) -> Container {
        Container::new_with_config(self, config)
    }
}

impl ServiceCollection {
    pub(crate) fn add_instantiator(&mut self, descriptor: ServiceDescriptor, instantiator: BoxedCloneInstantiator) -> &mut Self {
        debug!(
            service = descriptor.service.name,
            implementation = descriptor.implementation.name,
            lifetime = descriptor.lifetime.name(),
            "Registered"
        );

        self.entries.push((descriptor, instantiator));
        self
    }

    pub(crate) fn into_registry(self) -> Registry {
        let mut instantiators: BTreeMap<TypeId, Vec<InstantiatorData>> = BTreeMap::new();
        for (descriptor, instantiator) in self.entries {
            let finalizer = self.finalizers.get(&descriptor.service.id).cloned();

            instantiators.entry(descriptor.service.id).or_default().push(InstantiatorData {
                descriptor,
                instantiator,
                finalizer,
            });
        }

        Registry { instantiators }
    }
}

pub(crate) struct Registry {
    instantiators: BTreeMap<TypeId, Vec<InstantiatorData>>,
}

impl Registry {
    /// The binding that wins a single resolution: the last registered one.
    #[inline]
    pub(crate) fn get(&self, type_id: &TypeId) -> Option<(ServiceKey, &InstantiatorData)> {
        let bindings = self.instantiators.get(type_id)?;
        let index = bindings.len().checked_sub(1)?;

        bindings.get(index).map(|data| (ServiceKey { type_id: *type_id, index }, data))
    }

    #[inline]
    pub(crate) fn get_all(&self, type_id: &TypeId) -> impl Iterator<Item = (ServiceKey, &InstantiatorData)> {
        let type_id = *type_id;

        self.instantiators
            .get(&type_id)
            .into_iter()
            .flat_map(|bindings| bindings.iter().enumerate())
            .map(move |(index, data)| (ServiceKey { type_id, index }, data))
    }

    #[inline]
    pub(crate) fn get_by_key(&self, key: &ServiceKey) -> Option<&InstantiatorData> {
        self.instantiators.get(&key.type_id).and_then(|bindings| bindings.get(key.index))
    }
}
