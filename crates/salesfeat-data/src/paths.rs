//! Input table locations.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File locations of the four input tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputPaths {
    /// Brand reference table (`id`, `name`)
    pub brand: PathBuf,
    /// Product reference table (`id`, attributes...)
    pub product: PathBuf,
    /// Store reference table (`id`, attributes...)
    pub store: PathBuf,
    /// Sales fact table (`product`, `store`, `brand`, `date`, `quantity`)
    pub sales: PathBuf,
}

impl InputPaths {
    /// Conventional file names inside a single data directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            brand: dir.join("brand.csv"),
            product: dir.join("product.csv"),
            store: dir.join("store.csv"),
            sales: dir.join("sales.csv"),
        }
    }

    /// Replace the brand table location.
    pub fn with_brand(mut self, path: impl Into<PathBuf>) -> Self {
        self.brand = path.into();
        self
    }

    /// Replace the product table location.
    pub fn with_product(mut self, path: impl Into<PathBuf>) -> Self {
        self.product = path.into();
        self
    }

    /// Replace the store table location.
    pub fn with_store(mut self, path: impl Into<PathBuf>) -> Self {
        self.store = path.into();
        self
    }

    /// Replace the sales table location.
    pub fn with_sales(mut self, path: impl Into<PathBuf>) -> Self {
        self.sales = path.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_dir_and_overrides() {
        let paths = InputPaths::in_dir("/data").with_sales("/other/sales_2021.csv");
        assert_eq!(paths.brand, PathBuf::from("/data/brand.csv"));
        assert_eq!(paths.product, PathBuf::from("/data/product.csv"));
        assert_eq!(paths.store, PathBuf::from("/data/store.csv"));
        assert_eq!(paths.sales, PathBuf::from("/other/sales_2021.csv"));
    }
}
