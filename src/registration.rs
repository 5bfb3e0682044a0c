use std::sync::Arc;
use tracing::debug;

use crate::{
    container::{Resolution, WeakContainer},
    dependency_resolver::DependencyResolver,
    errors::{InstantiateErrorKind, RegistrationErrorKind, ResolveErrorKind},
    factory::{Factory, ProducerFn},
    inject::Inject,
    instantiator::Instantiator,
    lifetime::Lifetime,
    registry::ServiceCollection,
    upcast::Upcast,
};

/// Registers `Impl` as `I` with the given lifetime, together with two `Factory<I>` singletons
/// (instance and producer variants) and the [`ProducerFn<I>`] singleton both of them use.
///
/// `Container::get::<Factory<I>>` returns the producer variant, `Container::get_all` returns both, instance variant first.
/// Both factories are disposed when the root container closes.
///
/// # Errors
/// [`RegistrationErrorKind::InvalidArgument`] if `services` is absent. Nothing is registered then.
pub fn add_factory<I, Impl, Inst, Deps>(
    services: Option<&mut ServiceCollection>,
    lifetime: Lifetime,
    instantiator: Inst,
) -> Result<&mut ServiceCollection, RegistrationErrorKind>
where
    I: ?Sized + Send + Sync + 'static,
    Impl: Upcast<I> + 'static,
    Inst: Instantiator<Deps, Provides = Impl, Error = InstantiateErrorKind> + Send + Sync,
    Deps: DependencyResolver,
{
    let services = services.ok_or(RegistrationErrorKind::InvalidArgument { argument: "services" })?;

    Ok(register::<I, Impl, Inst, Deps>(services, lifetime, instantiator))
}

/// Same as [`add_factory`] with `T` registered as its own service.
///
/// # Errors
/// [`RegistrationErrorKind::InvalidArgument`] if `services` is absent. Nothing is registered then.
#[inline]
pub fn add_factory_self<T, Inst, Deps>(
    services: Option<&mut ServiceCollection>,
    lifetime: Lifetime,
    instantiator: Inst,
) -> Result<&mut ServiceCollection, RegistrationErrorKind>
where
    T: Send + Sync + 'static,
    Inst: Instantiator<Deps, Provides = T, Error = InstantiateErrorKind> + Send + Sync,
    Deps: DependencyResolver,
{
    add_factory::<T, T, Inst, Deps>(services, lifetime, instantiator)
}

/// Factory registration as methods of [`ServiceCollection`].
pub trait ServiceCollectionExt {
    /// See [`add_factory`].
    fn add_factory<I, Impl, Inst, Deps>(&mut self, lifetime: Lifetime, instantiator: Inst) -> &mut Self
    where
        I: ?Sized + Send + Sync + 'static,
        Impl: Upcast<I> + 'static,
        Inst: Instantiator<Deps, Provides = Impl, Error = InstantiateErrorKind> + Send + Sync,
        Deps: DependencyResolver;

    /// See [`add_factory_self`].
    fn add_factory_self<T, Inst, Deps>(&mut self, lifetime: Lifetime, instantiator: Inst) -> &mut Self
    where
        T: Send + Sync + 'static,
        Inst: Instantiator<Deps, Provides = T, Error = InstantiateErrorKind> + Send + Sync,
        Deps: DependencyResolver;
}

impl ServiceCollectionExt for ServiceCollection {
    #[inline]
    fn add_factory<I, Impl, Inst, Deps>(&mut self, lifetime: Lifetime, instantiator: Inst) -> &mut Self
    where
        I: ?Sized + Send + Sync + 'static,
        Impl: Upcast<I> + 'static,
        Inst: Instantiator<Deps, Provides = Impl, Error = InstantiateErrorKind> + Send + Sync,
        Deps: DependencyResolver,
    {
        register::<I, Impl, Inst, Deps>(self, lifetime, instantiator)
    }

    #[inline]
    fn add_factory_self<T, Inst, Deps>(&mut self, lifetime: Lifetime, instantiator: Inst) -> &mut Self
    where
        T: Send + Sync + 'static,
        Inst: Instantiator<Deps, Provides = T, Error = InstantiateErrorKind> + Send + Sync,
        Deps: DependencyResolver,
    {
        register::<T, T, Inst, Deps>(self, lifetime, instantiator)
    }
}

fn register<I, Impl, Inst, Deps>(services: &mut ServiceCollection, lifetime: Lifetime, instantiator: Inst) -> &mut ServiceCollection
where
    I: ?Sized + Send + Sync + 'static,
    Impl: Upcast<I> + 'static,
    Inst: Instantiator<Deps, Provides = Impl, Error = InstantiateErrorKind> + Send + Sync,
    Deps: DependencyResolver,
{
    services
        .add::<I, Impl, Inst, Deps>(lifetime, instantiator)
        .add_self::<Factory<I>, _, _>(
            Lifetime::Singleton,
            |Inject(producer): Inject<ProducerFn<I>>| -> Result<Factory<I>, InstantiateErrorKind> {
                let instance = producer().map_err(anyhow::Error::new)?;
                Ok(Factory::from_instance(instance))
            },
        )
        .add_self::<Factory<I>, _, _>(
            Lifetime::Singleton,
            |Inject(producer): Inject<ProducerFn<I>>| -> Result<Factory<I>, InstantiateErrorKind> {
                Ok(Factory::from_producer(producer))
            },
        )
        .add_shared::<ProducerFn<I>, _, _>(
            Lifetime::Singleton,
            |container: WeakContainer| -> Result<Arc<ProducerFn<I>>, InstantiateErrorKind> { Ok(scope_fallback_producer::<I>(container)) },
        )
        .add_finalizer(|factory: Arc<Factory<I>>| factory.dispose())
}

/// Resolves `I` from the container, or from a new scope if `I` needs one.
fn scope_fallback_producer<I>(container: WeakContainer) -> Arc<ProducerFn<I>>
where
    I: ?Sized + Send + Sync + 'static,
{
    Arc::new(move || {
        let container = container.upgrade().ok_or(ResolveErrorKind::ContainerDropped)?;

        match container.try_get::<I>() {
            Resolution::Resolved(dependency) => Ok(dependency),
            Resolution::NoActiveScope(err) => {
                debug!(%err, "Resolving in a new scope");
                container.create_scope().get::<I>()
            }
            Resolution::Failed(err) => Err(err),
        }
    })
}
