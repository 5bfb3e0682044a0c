/// Config for a built container
/// ## Fields
/// - `validate_scopes`:
///   If `true`, resolving a scoped service outside any scope fails with
///   [`crate::ResolveErrorKind::NoActiveScope`].
///
///   If `false`, the root container acts as a scope for scoped services,
///   so they effectively live as long as the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub validate_scopes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self { validate_scopes: true }
    }
}
