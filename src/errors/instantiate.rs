/// Failure raised by an instantiator itself, as opposed to a failure to resolve its dependencies.
#[derive(thiserror::Error, Debug)]
pub enum InstantiateErrorKind {
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}
