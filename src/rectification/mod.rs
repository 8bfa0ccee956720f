//! Batch rectification of fiscal-year filings

mod batch;
mod request;
mod store;

pub use batch::{rectified_file_name, rectify_filing, run_batch, write_outputs, RectifiedFiling};
pub use request::{FilingSource, RectificationRequest};
pub use store::{DirectoryStore, FilingStore, MemoryStore};
