//! Catalog file operations: list, add, remove, CSV bulk import.
//!
//! Products are identified by their position in the file, so `remove`
//! shifts every later index down by one. Every save writes the previous
//! file contents to a `.backup` sibling first.

use std::path::{Path, PathBuf};

use fondant_core::types::{Price, Product};
use thiserror::Error;

/// Errors from catalog file operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("failed to write {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("invalid catalog JSON in {0}: {1}")]
    Json(PathBuf, serde_json::Error),

    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid price {0:?}: must be a non-negative decimal")]
    InvalidPrice(String),

    #[error("no product at index {index} (catalog has {len} products)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Load the catalog, treating a missing file as empty.
fn load(path: &Path) -> Result<Vec<Product>, CatalogError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(CatalogError::Read(path.to_path_buf(), err)),
    };

    serde_json::from_str(&contents).map_err(|e| CatalogError::Json(path.to_path_buf(), e))
}

/// Save the catalog, backing up the previous contents first.
fn save(path: &Path, products: &[Product]) -> Result<(), CatalogError> {
    if path.exists() {
        let backup = backup_path(path);
        std::fs::copy(path, &backup).map_err(|e| CatalogError::Write(backup.clone(), e))?;
        tracing::info!("Previous catalog backed up to {}", backup.display());
    }

    let json = serde_json::to_string_pretty(products)
        .map_err(|e| CatalogError::Json(path.to_path_buf(), e))?;
    std::fs::write(path, json).map_err(|e| CatalogError::Write(path.to_path_buf(), e))?;
    Ok(())
}

/// `.backup` sibling of the catalog file.
fn backup_path(path: &Path) -> PathBuf {
    let mut backup = path.as_os_str().to_owned();
    backup.push(".backup");
    PathBuf::from(backup)
}

/// `fondant-cli list`
pub fn list(path: &Path) -> Result<(), CatalogError> {
    let products = load(path)?;

    if products.is_empty() {
        tracing::info!("Catalog at {} is empty", path.display());
        return Ok(());
    }

    tracing::info!("{} products in {}", products.len(), path.display());
    for (index, product) in products.iter().enumerate() {
        tracing::info!("  [{index}] {} - ${}", product.title, product.price);
    }
    Ok(())
}

/// `fondant-cli add`
pub fn add(
    path: &Path,
    title: &str,
    price: &str,
    link: &str,
    image_url: &str,
) -> Result<(), CatalogError> {
    let price = Price::parse(price)
        .map_err(|_| CatalogError::InvalidPrice(price.to_owned()))?
        .to_string();

    let mut products = load(path)?;
    products.push(Product {
        title: title.to_owned(),
        price,
        link: link.to_owned(),
        image_url: image_url.to_owned(),
    });
    save(path, &products)?;

    tracing::info!("Added {title:?} at index {}", products.len() - 1);
    Ok(())
}

/// `fondant-cli remove`
pub fn remove(path: &Path, index: usize) -> Result<(), CatalogError> {
    let mut products = load(path)?;
    if index >= products.len() {
        return Err(CatalogError::IndexOutOfRange {
            index,
            len: products.len(),
        });
    }

    let removed = products.remove(index);
    save(path, &products)?;

    tracing::info!(
        "Removed {:?}; later indices shifted down by one",
        removed.title
    );
    Ok(())
}

/// `fondant-cli import`
///
/// Appends rows from a CSV with header `title,price,link,image_url`.
/// Rows with a missing field or an unparseable price are skipped and
/// counted, never imported half-filled.
pub fn import(path: &Path, csv_file: &Path) -> Result<(), CatalogError> {
    let mut reader = csv::Reader::from_path(csv_file)?;

    let mut products = load(path)?;
    let before = products.len();
    let mut skipped = 0usize;

    for record in reader.records() {
        let record = record?;
        match parse_row(&record) {
            Some(product) => products.push(product),
            None => skipped += 1,
        }
    }

    save(path, &products)?;

    tracing::info!(
        "Imported {} products from {} ({} rows skipped)",
        products.len() - before,
        csv_file.display(),
        skipped
    );
    Ok(())
}

/// Parse one CSV row; `None` when a field is missing/blank or the price
/// is invalid.
fn parse_row(record: &csv::StringRecord) -> Option<Product> {
    let title = record.get(0)?.trim();
    let price = record.get(1)?.trim();
    let link = record.get(2)?.trim();
    let image_url = record.get(3)?.trim();

    if title.is_empty() || price.is_empty() {
        return None;
    }
    let price = Price::parse(price).ok()?.to_string();

    Some(Product {
        title: title.to_owned(),
        price,
        link: link.to_owned(),
        image_url: image_url.to_owned(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;

    fn temp_catalog(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    const TWO_PRODUCTS: &str = r#"[
        {"title": "Unicorn Topper", "price": "24.99", "link": "", "image_url": ""},
        {"title": "Dino Topper", "price": "19.99", "link": "", "image_url": ""}
    ]"#;

    #[test]
    fn test_add_appends_and_writes_backup() {
        let (_dir, path) = temp_catalog(TWO_PRODUCTS);

        add(&path, "Mermaid Topper", "29.99", "", "").unwrap();

        let products = load(&path).unwrap();
        assert_eq!(products.len(), 3);
        assert_eq!(products[2].title, "Mermaid Topper");
        assert_eq!(products[2].price, "29.99");

        // Backup holds the pre-save contents
        let backup = backup_path(&path);
        let previous: Vec<Product> =
            serde_json::from_str(&std::fs::read_to_string(backup).unwrap()).unwrap();
        assert_eq!(previous.len(), 2);
    }

    #[test]
    fn test_add_rejects_bad_price() {
        let (_dir, path) = temp_catalog(TWO_PRODUCTS);
        assert!(matches!(
            add(&path, "Broken", "free", "", ""),
            Err(CatalogError::InvalidPrice(_))
        ));
        assert!(matches!(
            add(&path, "Broken", "-5", "", ""),
            Err(CatalogError::InvalidPrice(_))
        ));
    }

    #[test]
    fn test_remove_shifts_indices() {
        let (_dir, path) = temp_catalog(TWO_PRODUCTS);

        remove(&path, 0).unwrap();

        let products = load(&path).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].title, "Dino Topper");
    }

    #[test]
    fn test_remove_out_of_range() {
        let (_dir, path) = temp_catalog(TWO_PRODUCTS);
        assert!(matches!(
            remove(&path, 5),
            Err(CatalogError::IndexOutOfRange { index: 5, len: 2 })
        ));
    }

    #[test]
    fn test_import_skips_incomplete_rows() {
        let (_dir, path) = temp_catalog("[]");
        let csv_path = path.with_file_name("import.csv");
        let mut csv_file = std::fs::File::create(&csv_path).unwrap();
        writeln!(csv_file, "title,price,link,image_url").unwrap();
        writeln!(csv_file, "Good Topper,12.50,https://x.test,https://x.test/i.jpg").unwrap();
        writeln!(csv_file, ",9.99,,").unwrap();
        writeln!(csv_file, "Bad Price,notanumber,,").unwrap();
        writeln!(csv_file, "Another Good,5,,").unwrap();
        drop(csv_file);

        import(&path, &csv_path).unwrap();

        let products = load(&path).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].title, "Good Topper");
        assert_eq!(products[1].title, "Another Good");
        assert_eq!(products[1].price, "5.00");
    }

    #[test]
    fn test_missing_file_treated_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        add(&path, "First Topper", "10.00", "", "").unwrap();

        let products = load(&path).unwrap();
        assert_eq!(products.len(), 1);
        // No backup written on first save
        assert!(!backup_path(&path).exists());
    }
}
