use std::path::Path;

use crate::input::InputError;
use crate::input::reader::read_maybe_gz;
use crate::model::prediction::FusionRequest;

/// Loads a single request object or an array of requests.
pub fn load_requests(path: &Path) -> Result<Vec<FusionRequest>, InputError> {
    let raw = read_maybe_gz(path)?;
    let requests = parse_requests(&raw).map_err(|e| InputError::json(path, e))?;
    if requests.is_empty() {
        return Err(InputError::Parse(format!(
            "{} holds no requests",
            path.display()
        )));
    }
    tracing::info!(path = %path.display(), n_requests = requests.len(), "loaded requests");
    Ok(requests)
}

pub fn parse_requests(raw: &str) -> Result<Vec<FusionRequest>, serde_json::Error> {
    if raw.trim_start().starts_with('[') {
        serde_json::from_str(raw)
    } else {
        serde_json::from_str::<FusionRequest>(raw).map(|r| vec![r])
    }
}
