use super::resolve::ResolveErrorKind;

#[derive(thiserror::Error, Debug)]
pub enum FactoryErrorKind {
    #[error("Factory holds neither an instance nor a producer. It was disposed or never populated")]
    InvalidState,
    #[error(transparent)]
    Produce(ResolveErrorKind),
}
