use core::any::TypeId;

use super::{instantiate::InstantiateErrorKind, instantiator::InstantiatorErrorKind};
use crate::any::TypeInfo;

#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error("Instantiator for {} not found in registry", type_info.name)]
    NoInstantiator { type_info: TypeInfo },
    #[error(
        "\
        No active scope. \
        Scoped {} can't be resolved from the root container, create a scope first\
        ",
        type_info.name,
    )]
    NoActiveScope { type_info: TypeInfo },
    #[error("Incorrect instantiator provides type. Actual: {actual:?}, expected: {}", expected.name)]
    IncorrectType { expected: TypeInfo, actual: TypeId },
    #[error("Cyclic dependency detected: {}", display_graph(graph))]
    CyclicDependency { graph: Box<[TypeInfo]> },
    #[error("Container was dropped before the dependency was requested")]
    ContainerDropped,
    #[error(transparent)]
    Instantiator(InstantiatorErrorKind<Box<ResolveErrorKind>, InstantiateErrorKind>),
}

impl ResolveErrorKind {
    /// Whether the failure comes from a scoped service requested outside any scope,
    /// either directly or by one of the dependencies.
    #[must_use]
    pub fn is_no_active_scope(&self) -> bool {
        match self {
            ResolveErrorKind::NoActiveScope { .. } => true,
            ResolveErrorKind::Instantiator(InstantiatorErrorKind::Deps(err)) => err.is_no_active_scope(),
            _ => false,
        }
    }
}

fn display_graph(graph: &[TypeInfo]) -> String {
    graph.iter().map(TypeInfo::short_name).collect::<Vec<_>>().join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::ResolveErrorKind;
    use crate::{any::TypeInfo, errors::InstantiatorErrorKind};

    struct A;
    struct B;

    #[test]
    fn test_nested_no_active_scope() {
        let err = ResolveErrorKind::Instantiator(InstantiatorErrorKind::Deps(Box::new(ResolveErrorKind::NoActiveScope {
            type_info: TypeInfo::of::<A>(),
        })));

        assert!(err.is_no_active_scope());
        assert!(!ResolveErrorKind::ContainerDropped.is_no_active_scope());
    }

    #[test]
    fn test_cyclic_display() {
        let err = ResolveErrorKind::CyclicDependency {
            graph: Box::new([TypeInfo::of::<A>(), TypeInfo::of::<B>(), TypeInfo::of::<A>()]),
        };

        assert_eq!(err.to_string(), "Cyclic dependency detected: A -> B -> A");
    }
}
