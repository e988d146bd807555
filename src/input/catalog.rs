use std::path::Path;

use crate::input::InputError;
use crate::input::reader::read_maybe_gz;
use crate::model::label::{LabelCatalog, LabelEntry};

pub fn load_catalog(path: &Path) -> Result<LabelCatalog, InputError> {
    let raw = read_maybe_gz(path)?;
    let entries: Vec<LabelEntry> =
        serde_json::from_str(&raw).map_err(|e| InputError::json(path, e))?;
    let catalog = LabelCatalog::from_entries(entries)
        .map_err(|e| InputError::Parse(format!("{}: {e}", path.display())))?;
    tracing::info!(path = %path.display(), n_labels = catalog.len(), "loaded label catalog");
    Ok(catalog)
}
