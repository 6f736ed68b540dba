//! Access decision engine, query parsing, batch evaluation, reports, and data sinks.

pub mod batch;
pub mod evaluator;
pub mod query;
pub mod reporter;
pub mod sink;

pub use batch::{evaluate_batch, read_requests, DecisionRecord};
pub use evaluator::{apply_grant, AccessEvaluator};
pub use query::AccessQuery;
pub use reporter::Summary;
