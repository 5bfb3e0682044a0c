/// How long a resolved instance is reused before a new one is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Lifetime {
    /// New instance per request.
    Transient,
    /// One instance per scope.
    Scoped,
    /// One instance for the whole root container.
    Singleton,
}

impl Lifetime {
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Lifetime::Transient => "transient",
            Lifetime::Scoped => "scoped",
            Lifetime::Singleton => "singleton",
        }
    }

    /// Whether resolved instances are kept in a container cache.
    #[inline]
    #[must_use]
    pub const fn is_cached(self) -> bool {
        !matches!(self, Lifetime::Transient)
    }

    #[inline]
    #[must_use]
    pub const fn all() -> [Self; 3] {
        use Lifetime::{Scoped, Singleton, Transient};

        [Transient, Scoped, Singleton]
    }
}

#[cfg(test)]
mod tests {
    use super::Lifetime::{self, *};

    #[test]
    fn test_is_cached() {
        assert!(!Transient.is_cached());
        assert!(Scoped.is_cached());
        assert!(Singleton.is_cached());
    }

    #[test]
    fn test_names_unique() {
        let names = Lifetime::all().map(Lifetime::name);
        assert_eq!(names, ["transient", "scoped", "singleton"]);
    }
}
