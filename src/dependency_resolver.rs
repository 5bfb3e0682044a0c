use crate::{any::TypeInfo, container::WeakContainer, errors::ResolveErrorKind, Container};

pub trait DependencyResolver: Sized {
    type Error: Into<ResolveErrorKind>;

    fn resolve(container: &Container) -> Result<Self, Self::Error>;

    #[inline]
    #[must_use]
    fn type_info() -> TypeInfo
    where
        Self: 'static,
    {
        TypeInfo::of::<Self>()
    }
}

macro_rules! impl_dependency_resolver {
    (
        [$($ty:ident),*]
    ) => {
        #[allow(non_snake_case, unused_mut)]
        impl<$($ty,)*> DependencyResolver for ($($ty,)*)
        where
            $( $ty: DependencyResolver + Send, )*
        {
            type Error = ResolveErrorKind;

            #[inline]
            #[allow(unused_variables)]
            fn resolve(container: &Container) -> Result<Self, Self::Error> {
                Ok(($($ty::resolve(container).map_err(Into::into)?,)*))
            }
        }
    };
}

all_the_tuples!(impl_dependency_resolver);

/// A handle back to the container the instantiator runs against.
///
/// Singletons receive the root container, so holding it weakly keeps the root droppable.
impl DependencyResolver for WeakContainer {
    type Error = ResolveErrorKind;

    #[inline]
    fn resolve(container: &Container) -> Result<Self, Self::Error> {
        Ok(container.downgrade())
    }
}

#[cfg(test)]
mod tests {
    use core::sync::atomic::{AtomicU8, Ordering};
    use std::sync::Arc;
    use tracing::debug;
    use tracing_test::traced_test;

    use super::DependencyResolver;
    use crate::{container::WeakContainer, inject::Inject, Lifetime::*, ServiceCollection};

    struct Request;
    struct Response;

    #[test]
    #[allow(dead_code)]
    fn test_dependency_resolver_impls() {
        fn resolver<T: DependencyResolver>() {}
        fn resolver_with_dep<Dep: ?Sized + Send + Sync + 'static>() {
            resolver::<Inject<Dep>>();
            resolver::<WeakContainer>();
            resolver::<(Inject<Dep>, WeakContainer)>();
        }
    }

    #[test]
    #[traced_test]
    fn test_tuple_resolve() {
        let instantiator_request_call_count = Arc::new(AtomicU8::new(0));

        let mut services = ServiceCollection::new();
        services
            .add_self::<Request, _, _>(Singleton, {
                let instantiator_request_call_count = instantiator_request_call_count.clone();
                move || {
                    instantiator_request_call_count.fetch_add(1, Ordering::SeqCst);

                    debug!("Call instantiator request");
                    Ok(Request)
                }
            })
            .add_self::<Response, _, _>(Transient, || Ok(Response));
        let container = services.build();

        let (Inject(request_1), Inject(_), Inject(request_2)) =
            <(Inject<Request>, Inject<Response>, Inject<Request>)>::resolve(&container).unwrap();

        assert!(Arc::ptr_eq(&request_1, &request_2));
        assert_eq!(instantiator_request_call_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    #[traced_test]
    fn test_weak_container_resolve() {
        let container = ServiceCollection::new().build();

        let weak = WeakContainer::resolve(&container).unwrap();

        assert!(weak.upgrade().is_some());
        drop(container);
        assert!(weak.upgrade().is_none());
    }
}
