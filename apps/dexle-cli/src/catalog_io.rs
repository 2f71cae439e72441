use anyhow::{Context, Result};
use dexle_engine::{Catalog, Entity};
use std::path::Path;

/// Load a catalog from CSV (`id,name,generation,trait1,trait2,height,weight`)
/// or, for `.json` files, from an array of entity objects.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let entities = if is_json {
        read_json(path)?
    } else {
        read_csv(path)?
    };
    let catalog =
        Catalog::new(entities).with_context(|| format!("invalid catalog {}", path.display()))?;
    tracing::debug!(path = %path.display(), entities = catalog.len(), "catalog loaded");
    Ok(catalog)
}

fn read_json(path: &Path) -> Result<Vec<Entity>> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
}

fn read_csv(path: &Path) -> Result<Vec<Entity>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let mut entities = Vec::new();
    for (idx, record) in reader.deserialize::<Entity>().enumerate() {
        // +2: one-based, after the header row
        let entity =
            record.with_context(|| format!("{} line {}", path.display(), idx + 2))?;
        entities.push(entity);
    }
    Ok(entities)
}
