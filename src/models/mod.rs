pub mod batch;
pub mod category;
pub mod loaders;

pub use batch::{Batch, BatchResult, BatchStatus};
pub use category::{leading_segment, Category, CategoryCatalog};
pub use loaders::{load_catalog, parse_catalog};
