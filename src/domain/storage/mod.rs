//! Storage domain - hosted table abstraction

mod record;
mod store;

pub use record::{Record, RecordFilter};
pub use store::TableStore;
