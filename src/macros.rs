macro_rules! all_the_tuples {
    ($name:ident) => {
        $name!([]);
        $name!([T1]);
        $name!([T1, T2]);
        $name!([T1, T2, T3]);
        $name!([T1, T2, T3, T4]);
        $name!([T1, T2, T3, T4, T5]);
        $name!([T1, T2, T3, T4, T5, T6]);
        $name!([T1, T2, T3, T4, T5, T6, T7]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8]);
    };
}

/// Declares that an implementation can be shared behind one or more interface types.
///
/// # Syntax
/// ```text
/// implements!(Implementation => Interface [, Interface ...])
/// ```
///
/// # Examples
/// ```rust
/// use di_factory::{implements, Upcast as _};
/// use std::sync::Arc;
///
/// trait UserRepo: Send + Sync {}
/// trait Repo: Send + Sync {}
///
/// struct PostgresUserRepo;
///
/// impl UserRepo for PostgresUserRepo {}
/// impl Repo for PostgresUserRepo {}
///
/// implements!(PostgresUserRepo => dyn UserRepo, dyn Repo);
///
/// let repo: Arc<dyn UserRepo> = Arc::new(PostgresUserRepo).upcast();
/// ```
#[macro_export]
macro_rules! implements {
    ($implementation:ty => $($interface:ty),+ $(,)?) => {
        $(
            impl $crate::Upcast<$interface> for $implementation {
                #[inline]
                fn upcast(self: ::std::sync::Arc<Self>) -> ::std::sync::Arc<$interface> {
                    self
                }
            }
        )+
    };
}
