//! Catalog validation.

use std::path::Path;

use cosmic_core::catalog::Catalog;

use crate::ToolError;

/// Load a catalog from RON and check it.
pub fn validate_catalog_file(path: &Path) -> Result<Catalog, ToolError> {
    let catalog = Catalog::load(path)?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

/// Check a catalog, collecting every problem.
pub fn validate_catalog(catalog: &Catalog) -> Result<(), ToolError> {
    let problems = catalog.validate();
    if problems.is_empty() {
        Ok(())
    } else {
        for problem in &problems {
            tracing::warn!("{problem}");
        }
        Err(ToolError::InvalidCatalog(problems))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmic_core::model::ShipType;

    #[test]
    fn test_standard_catalog_is_valid() {
        assert!(validate_catalog(Catalog::global()).is_ok());
    }

    #[test]
    fn test_dumped_catalog_reloads() {
        let ron = Catalog::global().to_ron_string().unwrap();
        let reloaded = Catalog::from_ron_str(&ron).unwrap();
        assert!(validate_catalog(&reloaded).is_ok());
    }

    #[test]
    fn test_missing_ship_is_reported() {
        let mut catalog = Catalog::standard();
        catalog.ships.remove(&ShipType::Recycler);
        let Err(ToolError::InvalidCatalog(problems)) = validate_catalog(&catalog) else {
            panic!("expected problems");
        };
        assert!(problems.iter().any(|p| p.contains("RECYCLER")));
    }
}
