use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use flate2::Compression;
use flate2::write::GzEncoder;

use super::reader::read_maybe_gz;
use super::requests::parse_requests;
use super::{InputError, load_catalog, load_requests};
use crate::model::modality::Modality;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("diagfusion_input_test_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_file(path: &Path, contents: &str) {
    let mut f = BufWriter::new(File::create(path).unwrap());
    f.write_all(contents.as_bytes()).unwrap();
}

fn write_gz(path: &Path, contents: &str) {
    let mut enc = GzEncoder::new(File::create(path).unwrap(), Compression::default());
    enc.write_all(contents.as_bytes()).unwrap();
    enc.finish().unwrap();
}

const ONE_REQUEST: &str = r#"{
  "id": "case-1",
  "modalities": {
    "text": [
      {"model": "FastText", "predictions": [
        {"label": "COPD", "probability": 0.8},
        {"label": "Lao", "probability": 0.15},
        {"label": "Hen", "probability": 0.05}
      ]}
    ]
  }
}"#;

#[test]
fn test_parse_single_object() {
    let requests = parse_requests(ONE_REQUEST).unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].id.as_deref(), Some("case-1"));
    assert!(requests[0].preset.is_none());
    let text = &requests[0].modalities[&Modality::Text];
    assert_eq!(text[0].model, "FastText");
    assert_eq!(text[0].predictions[1].label, "Lao");
}

#[test]
fn test_parse_array_with_preset() {
    let raw = r#"[
      {"preset": "resnet_sbert", "modalities": {"image": [
        {"model": "ResNet", "predictions": [
          {"label": "Lao", "probability": 0.7},
          {"label": "Hen", "probability": 0.2},
          {"label": "COPD", "probability": 0.1}
        ]}
      ]}},
      {"modalities": {}}
    ]"#;
    let requests = parse_requests(raw).unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].preset.as_deref(), Some("resnet_sbert"));
    assert!(requests[0].modalities.contains_key(&Modality::Image));
    assert!(requests[1].modalities.is_empty());
}

#[test]
fn test_parse_rejects_unknown_modality() {
    let raw = r#"{"modalities": {"audio": []}}"#;
    assert!(parse_requests(raw).is_err());
}

#[test]
fn test_load_requests_plain_and_gz_match() {
    let dir = make_temp_dir();
    let plain = dir.join("requests.json");
    let gz = dir.join("requests.json.gz");
    write_file(&plain, ONE_REQUEST);
    write_gz(&gz, ONE_REQUEST);

    let a = load_requests(&plain).unwrap();
    let b = load_requests(&gz).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_load_requests_empty_array_is_error() {
    let dir = make_temp_dir();
    let path = dir.join("empty.json");
    write_file(&path, "[]");
    assert!(matches!(load_requests(&path), Err(InputError::Parse(_))));
}

#[test]
fn test_load_requests_bad_json_names_file() {
    let dir = make_temp_dir();
    let path = dir.join("broken.json");
    write_file(&path, "{\"modalities\": ");
    let err = load_requests(&path).unwrap_err();
    assert!(matches!(err, InputError::Json { .. }));
    assert!(err.to_string().contains("broken.json"));
}

#[test]
fn test_missing_file() {
    let dir = make_temp_dir();
    let err = read_maybe_gz(&dir.join("absent.json")).unwrap_err();
    assert!(matches!(err, InputError::MissingInput(_)));
}

#[test]
fn test_load_catalog() {
    let dir = make_temp_dir();
    let path = dir.join("labels.json");
    write_file(
        &path,
        r#"[{"id": "Flu", "name": "Influenza"}, {"id": "Cold", "name": ""}]"#,
    );
    let catalog = load_catalog(&path).unwrap();
    assert_eq!(catalog.len(), 2);
    let cold = catalog.resolve("1").unwrap();
    assert_eq!(cold.as_str(), "Cold");
    assert_eq!(catalog.display_name(&cold), "Cold");
}

#[test]
fn test_load_catalog_rejects_duplicates() {
    let dir = make_temp_dir();
    let path = dir.join("labels.json");
    write_file(&path, r#"[{"id": "Flu"}, {"id": "Flu"}]"#);
    assert!(matches!(load_catalog(&path), Err(InputError::Parse(_))));
}
