pub mod batch;
pub mod idx;
pub mod source;

pub use batch::Batch;
pub use source::{DataSource, InMemorySource};
