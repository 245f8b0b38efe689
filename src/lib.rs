//! Token based dependency injection.
//!
//! An [`Injector`] maps tokens ("a kind of value to produce") to injection
//! strategies, then resolves any token into a fully constructed instance,
//! building the transitive dependencies declared by constructors and
//! factories along the way. Resolution flattens the dependency tree into a
//! breadth-first delivery plan once, caches it per `(token, strict)` pair and
//! replays it in reverse on every delivery, so repeated deliveries of the
//! same token are cheap.
//!
//! ```
//! use std::sync::Arc;
//! use curare::{Construct, Injector};
//!
//! struct Engine;
//! impl Construct for Engine {
//!     type Deps = ();
//!     fn construct(_: ()) -> Self {
//!         Engine
//!     }
//! }
//!
//! struct Car {
//!     engine: Arc<Engine>,
//! }
//! impl Construct for Car {
//!     type Deps = (Arc<Engine>,);
//!     fn construct((engine,): Self::Deps) -> Self {
//!         Car { engine }
//!     }
//! }
//!
//! let mut injector = Injector::new();
//! injector.prepare::<Engine>();
//! injector.prepare::<Car>();
//!
//! let car = injector.deliver::<Car>().unwrap();
//! let another = injector.deliver::<Car>().unwrap();
//! // Each delivery constructs a fresh instance.
//! assert!(!Arc::ptr_eq(&car, &another));
//! assert!(!Arc::ptr_eq(&car.engine, &another.engine));
//! ```
//!
//! Tokens can also be parameterized container pseudo-types, delivering an
//! ordered collection of independently resolved elements:
//!
//! ```
//! use curare::{Injector, Token};
//!
//! struct GooglePay;
//! struct ApplePay;
//! struct PaymentApi;
//!
//! let mut injector = Injector::new();
//! injector.prepare_lambda(|| GooglePay);
//! injector.prepare_lambda(|| ApplePay);
//!
//! let token = Token::list_of(Token::of::<PaymentApi>());
//! injector
//!     .prepare_sequence(token.clone(), vec![Token::of::<GooglePay>(), Token::of::<ApplePay>()])
//!     .unwrap();
//!
//! let payments = injector.deliver_sequence(&token).unwrap();
//! assert_eq!(payments.len(), 2);
//! assert!(payments.get::<GooglePay>(0).is_some());
//! assert!(payments.get::<ApplePay>(1).is_some());
//! ```

pub mod bind;
pub mod errors;
pub mod injection;
pub mod injector;
pub mod resolve;
pub mod token;
pub mod types;

mod executor;
mod plan;
mod registry;

pub use bind::{BindTarget, Bound};
pub use errors::{DeliveryError, PreparationError};
pub use injection::{
    ClassInjection, FunctionInjection, Injection, LambdaInjection, Sequence, SequenceInjection,
    ValueInjection,
};
pub use injector::Injector;
pub use resolve::{Construct, Factory, Ingredients, Resolve};
pub use token::{SequenceKind, Token};
pub use types::{Delivered, Injectable, Instance, TypeInfo};
