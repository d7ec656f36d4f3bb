pub mod prepare;
pub mod summary;

pub use prepare::{PrepareError, PrepareOptions, PrepareReport, prepare_file};
pub use summary::CatalogSummary;
