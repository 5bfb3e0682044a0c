#[derive(thiserror::Error, Debug)]
pub enum RegistrationErrorKind {
    #[error("Required argument `{argument}` is absent")]
    InvalidArgument { argument: &'static str },
}
