use std::sync::Arc;

use crate::{any::TypeInfo, dependency_resolver::DependencyResolver, Container, ResolveErrorKind};

/// Dependency resolved through the container with the lifetime it was registered with.
pub struct Inject<Dep: ?Sized>(pub Arc<Dep>);

impl<Dep: ?Sized + Send + Sync + 'static> DependencyResolver for Inject<Dep> {
    type Error = ResolveErrorKind;

    fn resolve(container: &Container) -> Result<Self, Self::Error> {
        container.get().map(Self)
    }

    fn type_info() -> TypeInfo {
        TypeInfo::of::<Dep>()
    }
}
