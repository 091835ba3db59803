//! Tool system - schema and executor

mod executor;
mod schema;

pub use executor::{ToolCallReport, ToolExecutor};
pub use schema::{ToolKind, definitions};
