pub mod aggregate;
pub mod sanitize;
pub mod slice;

pub use aggregate::{AggregateError, LocalScore, ScoredItem, aggregate};
pub use sanitize::sanitize;
pub use slice::{OversizedDocument, Slice, SlicePlanner};
