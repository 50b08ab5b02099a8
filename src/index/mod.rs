//! Search index sinks
//!
//! This module defines the [`IndexSink`] trait the crawl pipeline publishes
//! documents through, along with its implementations:
//! - [`TypesenseSink`]: upserts into a Typesense collection over HTTP
//! - [`MemorySink`]: keeps documents in process (dry runs, tests)

mod memory;
mod schema;
mod traits;
mod typesense;

pub use memory::MemorySink;
pub use schema::{collection_schema, DEFAULT_SORTING_FIELD};
pub use traits::{IndexError, IndexResult, IndexSink};
pub use typesense::{TypesenseSink, API_KEY_HEADER};
