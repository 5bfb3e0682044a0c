mod factory;
mod instantiate;
mod instantiator;
mod registration;
mod resolve;

pub use factory::FactoryErrorKind;
pub use instantiate::InstantiateErrorKind;
pub use instantiator::InstantiatorErrorKind;
pub use registration::RegistrationErrorKind;
pub use resolve::ResolveErrorKind;
