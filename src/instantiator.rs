use core::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

use crate::{
    any::RcAny,
    dependency_resolver::DependencyResolver,
    errors::{InstantiateErrorKind, InstantiatorErrorKind, ResolveErrorKind},
    service::{service_fn, BoxCloneService},
    upcast::Upcast,
    Container,
};

pub trait Instantiator<Deps>: Clone + 'static
where
    Deps: DependencyResolver,
{
    type Provides: 'static;
    type Error: Into<InstantiateErrorKind>;

    fn instantiate(&mut self, dependencies: Deps) -> Result<Self::Provides, Self::Error>;
}

pub(crate) type BoxedCloneInstantiator = BoxCloneService<Container, RcAny, InstantiatorErrorKind<ResolveErrorKind, InstantiateErrorKind>>;

/// Boxes an instantiator whose value is shared behind the interface `I`.
#[must_use]
pub(crate) fn boxed_instantiator<I, Inst, Deps>(instantiator: Inst) -> BoxedCloneInstantiator
where
    I: ?Sized + Send + Sync + 'static,
    Inst: Instantiator<Deps> + Send + Sync,
    Inst::Provides: Upcast<I>,
    Deps: DependencyResolver,
{
    boxed_shared_instantiator::<I, _, Deps>(UpcastInstantiator::<I, Inst> {
        instantiator,
        _interface: PhantomData,
    })
}

/// Boxes an instantiator that already provides `Arc<I>`.
#[must_use]
pub(crate) fn boxed_shared_instantiator<I, Inst, Deps>(mut instantiator: Inst) -> BoxedCloneInstantiator
where
    I: ?Sized + Send + Sync + 'static,
    Inst: Instantiator<Deps, Provides = Arc<I>> + Send + Sync,
    Deps: DependencyResolver,
{
    BoxCloneService(Box::new(service_fn(
        move |container: Container| -> Result<RcAny, InstantiatorErrorKind<ResolveErrorKind, InstantiateErrorKind>> {
            let dependencies = match Deps::resolve(&container) {
                Ok(dependencies) => dependencies,
                Err(err) => return Err(InstantiatorErrorKind::Deps(err.into())),
            };
            let dependency = match instantiator.instantiate(dependencies) {
                Ok(dependency) => dependency,
                Err(err) => return Err(InstantiatorErrorKind::Factory(err.into())),
            };

            debug!("Resolved");

            Ok(Arc::new(dependency) as RcAny)
        },
    )))
}

struct UpcastInstantiator<I: ?Sized, Inst> {
    instantiator: Inst,
    _interface: PhantomData<fn() -> Arc<I>>,
}

impl<I: ?Sized, Inst: Clone> Clone for UpcastInstantiator<I, Inst> {
    fn clone(&self) -> Self {
        Self {
            instantiator: self.instantiator.clone(),
            _interface: PhantomData,
        }
    }
}

impl<I, Inst, Deps> Instantiator<Deps> for UpcastInstantiator<I, Inst>
where
    I: ?Sized + 'static,
    Inst: Instantiator<Deps>,
    Inst::Provides: Upcast<I>,
    Deps: DependencyResolver,
{
    type Provides = Arc<I>;
    type Error = Inst::Error;

    #[inline]
    fn instantiate(&mut self, dependencies: Deps) -> Result<Self::Provides, Self::Error> {
        self.instantiator
            .instantiate(dependencies)
            .map(|provided| <Inst::Provides as Upcast<I>>::upcast(Arc::new(provided)))
    }
}

macro_rules! impl_instantiator {
    (
        [$($ty:ident),*]
    ) => {
        #[allow(non_snake_case)]
        impl<F, Response, Err, $($ty,)*> Instantiator<($($ty,)*)> for F
        where
            F: FnMut($($ty,)*) -> Result<Response, Err> + Clone + 'static,
            Response: 'static,
            Err: Into<InstantiateErrorKind>,
            $( $ty: DependencyResolver + Send, )*
        {
            type Provides = Response;
            type Error = Err;

            fn instantiate(&mut self, ($($ty,)*): ($($ty,)*)) -> Result<Self::Provides, Self::Error> {
                self($($ty,)*)
            }
        }
    };
}

all_the_tuples!(impl_instantiator);

/// Wrapper to create an instantiator that just returns passed value.
/// It can be used when the value was created outside the container.
#[inline]
#[must_use]
pub fn instance<T: Clone + Send + Sync + 'static>(val: T) -> impl Instantiator<(), Provides = T, Error = InstantiateErrorKind> + Send + Sync {
    move || Ok::<_, InstantiateErrorKind>(val.clone())
}

#[cfg(test)]
mod tests {
    use core::sync::atomic::{AtomicU8, Ordering};
    use std::sync::Arc;
    use tracing::debug;
    use tracing_test::traced_test;

    use super::{boxed_instantiator, instance, DependencyResolver, InstantiateErrorKind, Instantiator};
    use crate::{inject::Inject, service::Service as _, Lifetime::*, ServiceCollection};

    struct Request(bool);
    struct Response(bool);

    trait Flag: Send + Sync {
        fn flag(&self) -> bool;
    }

    impl Flag for Response {
        fn flag(&self) -> bool {
            self.0
        }
    }

    implements!(Response => dyn Flag);

    #[test]
    #[allow(dead_code)]
    fn test_instantiator_helper() {
        fn resolver<Deps: DependencyResolver, F: Instantiator<Deps>>(_f: F) {}
        fn resolver_with_dep<Deps: DependencyResolver>() {
            resolver(|| Ok::<_, InstantiateErrorKind>(()));
            resolver(|Inject(_): Inject<()>| Ok::<_, InstantiateErrorKind>(()));
        }
    }

    #[test]
    #[traced_test]
    fn test_boxed_instantiator() {
        let instantiator_request_call_count = Arc::new(AtomicU8::new(0));
        let instantiator_response_call_count = Arc::new(AtomicU8::new(0));

        let mut services = ServiceCollection::new();
        services.add_self::<Request, _, _>(Transient, {
            let instantiator_request_call_count = instantiator_request_call_count.clone();
            move || {
                instantiator_request_call_count.fetch_add(1, Ordering::SeqCst);

                debug!("Call instantiator request");
                Ok(Request(true))
            }
        });
        let container = services.build();

        let mut instantiator_response = boxed_instantiator::<dyn Flag, _, _>({
            let instantiator_response_call_count = instantiator_response_call_count.clone();
            move |Inject(val_1): Inject<Request>, Inject(val_2): Inject<Request>| {
                assert_eq!(val_1.0, val_2.0);

                instantiator_response_call_count.fetch_add(1, Ordering::SeqCst);

                debug!("Call instantiator response");
                Ok::<_, InstantiateErrorKind>(Response(val_1.0))
            }
        });

        let response_1 = instantiator_response.call(container.clone()).unwrap();
        let response_2 = instantiator_response.call(container).unwrap();

        assert!(response_1.downcast_ref::<Arc<dyn Flag>>().unwrap().flag());
        assert!(response_2.downcast_ref::<Arc<dyn Flag>>().unwrap().flag());
        assert_eq!(instantiator_request_call_count.load(Ordering::SeqCst), 4);
        assert_eq!(instantiator_response_call_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_instance() {
        let mut instantiator = instance(7u8);

        assert_eq!(instantiator.instantiate(()).unwrap(), 7);
        assert_eq!(instantiator.instantiate(()).unwrap(), 7);
    }
}
