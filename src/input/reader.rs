use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::input::InputError;

/// Reads a whole file, decompressing it when the name ends in `.gz`.
pub fn read_maybe_gz(path: &Path) -> Result<String, InputError> {
    if !path.exists() {
        return Err(InputError::MissingInput(path.display().to_string()));
    }
    let mut reader = BufReader::new(File::open(path)?);
    let mut out = String::new();
    if path.extension().is_some_and(|ext| ext == "gz") {
        MultiGzDecoder::new(reader).read_to_string(&mut out)?;
    } else {
        reader.read_to_string(&mut out)?;
    }
    Ok(out)
}
