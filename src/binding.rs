//! Value binding engine: how a configured field matches an incoming value and
//! how output fields borrow the position a trigger field matched at.

pub mod bound_value;
pub mod fulfillment;
pub mod index;
pub mod mode;
pub mod strategy;
pub mod tester;
pub mod value;

pub use bound_value::{BoundValue, InvalidStrategyError};
pub use fulfillment::{Fulfillment, FulfillmentObservers};
pub use index::{denormalize, normalize, NormalizedIndex, NO_INDEX};
pub use mode::BindingMode;
pub use strategy::BindingStrategy;
pub use tester::MatchTester;
pub use value::BindableValue;
