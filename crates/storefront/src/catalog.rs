//! Product catalog backed by a JSON file.
//!
//! The catalog is the JSON export produced by the catalog manager CLI, read
//! fresh on every request so edits land without a restart. Products are
//! identified by their position in the file; there is no product table.
//!
//! A missing or malformed file yields an empty catalog. The storefront keeps
//! serving (cart, account, orders all still work), it just has nothing to
//! sell until the file is fixed.

use std::path::PathBuf;

use fondant_core::types::{Product, ProductIndex};

/// Loader for the product catalog file.
#[derive(Debug, Clone)]
pub struct Catalog {
    path: PathBuf,
}

impl Catalog {
    /// Create a catalog loader for the given JSON file path.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the full product list.
    ///
    /// Returns an empty list when the file is missing or unparseable,
    /// logging the cause at error level.
    #[must_use]
    pub fn load(&self) -> Vec<Product> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) => {
                tracing::error!(
                    path = %self.path.display(),
                    error = %err,
                    "Failed to read products file, serving empty catalog"
                );
                return Vec::new();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(products) => products,
            Err(err) => {
                tracing::error!(
                    path = %self.path.display(),
                    error = %err,
                    "Failed to parse products file, serving empty catalog"
                );
                Vec::new()
            }
        }
    }

    /// Look up a single product by catalog position.
    #[must_use]
    pub fn get(&self, index: ProductIndex) -> Option<Product> {
        let mut products = self.load();
        let i = index.as_usize();
        if i < products.len() {
            Some(products.swap_remove(i))
        } else {
            None
        }
    }
}
