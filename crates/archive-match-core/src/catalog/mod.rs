pub mod index;
pub mod key;
pub mod load;

pub use index::{CatalogIndex, IndexedEntry};
pub use key::{CatalogKey, ExactKey};
pub use load::load_catalog_csv;
