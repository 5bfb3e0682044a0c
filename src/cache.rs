use core::{any::TypeId, mem};
use std::{
    collections::{BTreeMap, VecDeque},
    sync::Arc,
};

use crate::any::RcAny;

/// Position of a binding in the registry: the service type and the index of its registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct ServiceKey {
    pub(crate) type_id: TypeId,
    pub(crate) index: usize,
}

#[derive(Default)]
#[cfg_attr(feature = "debug", derive(Debug))]
pub(crate) struct Cache {
    map: BTreeMap<ServiceKey, RcAny>,
    resolved: ResolvedSet,
}

impl Cache {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            map: BTreeMap::new(),
            resolved: ResolvedSet::new(),
        }
    }

    #[inline]
    pub(crate) fn insert(&mut self, key: ServiceKey, value: RcAny) -> Option<RcAny> {
        self.map.insert(key, value)
    }

    #[must_use]
    pub(crate) fn get<I: ?Sized + Send + Sync + 'static>(&self, key: &ServiceKey) -> Option<Arc<I>> {
        self.map.get(key).and_then(|value| value.downcast_ref::<Arc<I>>()).cloned()
    }

    #[inline]
    #[must_use]
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub(crate) fn push_resolved(&mut self, resolved: Resolved) {
        self.resolved.push(resolved);
    }

    /// Leaves an empty cache in place and returns the previous one for finalization.
    #[inline]
    #[must_use]
    pub(crate) fn take(&mut self) -> Self {
        mem::take(self)
    }

    #[inline]
    pub(crate) fn pop_resolved(&mut self) -> Option<Resolved> {
        self.resolved.pop()
    }
}

#[derive(Clone)]
#[cfg_attr(feature = "debug", derive(Debug))]
pub(crate) struct Resolved {
    pub(crate) key: ServiceKey,
    pub(crate) dependency: RcAny,
}

#[derive(Default, Clone)]
#[cfg_attr(feature = "debug", derive(Debug))]
pub(crate) struct ResolvedSet(pub(crate) VecDeque<Resolved>);

impl ResolvedSet {
    pub(crate) fn new() -> Self {
        Self(VecDeque::new())
    }

    pub(crate) fn push(&mut self, resolved: Resolved) {
        self.0.push_back(resolved);
    }

    /// Pops in LIFO order of resolution.
    pub(crate) fn pop(&mut self) -> Option<Resolved> {
        self.0.pop_back()
    }
}
