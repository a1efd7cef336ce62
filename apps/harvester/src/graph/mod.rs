// Normalized page-cache graph: value model, snapshot store, query keys,
// reference resolution and concurrent enrichment.

pub mod fanout;
pub mod query_key;
pub mod resolver;
pub mod store;
pub mod value;
