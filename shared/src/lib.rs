// Shared library: row models, the resource catalog and the list-table utility
// used by both the API client and the desk front-end.
pub mod catalog;
pub mod models;
pub mod table;
pub mod utils;

pub use catalog::Resource;
pub use models::{ColumnDescriptor, Row, SortDirection, SortSpec};
