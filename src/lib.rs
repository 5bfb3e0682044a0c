//! Factory wrappers and one-call registration helpers over a lifetime-aware service container.
//!
//! ```rust
//! use di_factory::{implements, Factory, Lifetime, ServiceCollection, ServiceCollectionExt as _};
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> &'static str;
//! }
//!
//! struct English;
//!
//! impl Greeter for English {
//!     fn greet(&self) -> &'static str {
//!         "hello"
//!     }
//! }
//!
//! implements!(English => dyn Greeter);
//!
//! let mut services = ServiceCollection::new();
//! services.add_factory::<dyn Greeter, English, _, _>(Lifetime::Transient, || Ok(English));
//!
//! let container = services.build();
//! let factory = container.get::<Factory<dyn Greeter>>().unwrap();
//!
//! assert_eq!(factory.create().unwrap().greet(), "hello");
//! ```

#[macro_use]
pub(crate) mod macros;

pub(crate) mod any;
pub(crate) mod cache;
pub(crate) mod config;
pub(crate) mod container;
pub(crate) mod dependency_resolver;
pub(crate) mod errors;
pub(crate) mod factory;
pub(crate) mod finalizer;
pub(crate) mod inject;
pub(crate) mod instantiator;
pub(crate) mod lifetime;
pub(crate) mod registration;
pub(crate) mod registry;
pub(crate) mod service;
pub(crate) mod upcast;

pub use any::TypeInfo;
pub use config::Config;
pub use container::{Container, Resolution, WeakContainer};
pub use dependency_resolver::DependencyResolver;
pub use errors::{FactoryErrorKind, InstantiateErrorKind, InstantiatorErrorKind, RegistrationErrorKind, ResolveErrorKind};
pub use factory::{Factory, FactoryKind, ProducerFn};
pub use finalizer::Finalizer;
pub use inject::Inject;
pub use instantiator::{instance, Instantiator};
pub use lifetime::Lifetime;
pub use registration::{add_factory, add_factory_self, ServiceCollectionExt};
pub use registry::{ServiceCollection, ServiceDescriptor};
pub use upcast::Upcast;
