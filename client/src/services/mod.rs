// Multi-request operations built on the API client.
pub mod batch;

pub use batch::{delete_many, upload_documents, BatchReport};
