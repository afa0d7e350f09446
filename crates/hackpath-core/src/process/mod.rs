//! Step process layer.

pub mod catalog;
pub mod mock;
pub mod traits;

pub use catalog::CatalogRegistry;
pub use mock::{MockProcess, MockRegistry};
pub use traits::{HackingProcess, ProcessRegistry};
