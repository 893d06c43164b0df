use std::path::Path;

use tracing::{info, warn};

use crate::domain::{
    common::entities::app_errors::CoreError,
    evidence::entities::{EvidenceStore, IngredientRecord},
};

/// Loads the reference table from a JSON array of `{ "name", "consensus" }`
/// objects. Any malformed entry rejects the whole file.
pub fn load_evidence_store(path: impl AsRef<Path>) -> Result<EvidenceStore, CoreError> {
    let path = path.as_ref();

    let raw = std::fs::read_to_string(path).map_err(|e| {
        CoreError::ConfigError(format!(
            "failed to read evidence file {}: {}",
            path.display(),
            e
        ))
    })?;

    let records = parse_records(&raw).map_err(|reason| {
        CoreError::ConfigError(format!(
            "malformed evidence file {}: {}",
            path.display(),
            reason
        ))
    })?;

    if records.is_empty() {
        warn!(path = %path.display(), "evidence file contains no records");
    }
    info!(path = %path.display(), records = records.len(), "evidence store loaded");

    Ok(EvidenceStore::new(records))
}

fn parse_records(raw: &str) -> Result<Vec<IngredientRecord>, String> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| format!("invalid JSON: {}", e))?;

    let entries = value
        .as_array()
        .ok_or_else(|| "expected a JSON array of ingredient records".to_string())?;

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            serde_json::from_value::<IngredientRecord>(entry.clone())
                .map_err(|e| format!("record {}: {}", index, e))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn file_with(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn assert_config_error(result: Result<EvidenceStore, CoreError>, needle: &str) {
        match result {
            Err(CoreError::ConfigError(message)) => {
                assert!(message.contains(needle), "unexpected message: {}", message)
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_load_preserves_order_and_duplicates() {
        let file = file_with(
            r#"[
                {"name": "sugar", "consensus": "limit intake"},
                {"name": "maltodextrin", "consensus": "thickener"},
                {"name": "sugar", "consensus": "second opinion", "source": "extra fields are ignored"}
            ]"#,
        );

        let store = load_evidence_store(file.path()).unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(store.records()[0], IngredientRecord::new("sugar", "limit intake"));
        assert_eq!(store.records()[2].consensus, "second opinion");
    }

    #[test]
    fn test_load_accepts_empty_array() {
        let file = file_with("[]");

        assert!(load_evidence_store(file.path()).unwrap().is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();

        assert_config_error(
            load_evidence_store(dir.path().join("missing.json")),
            "failed to read evidence file",
        );
    }

    #[test]
    fn test_load_invalid_json() {
        assert_config_error(
            load_evidence_store(file_with("[{\"name\": ").path()),
            "invalid JSON",
        );
    }

    #[test]
    fn test_load_rejects_non_array() {
        assert_config_error(
            load_evidence_store(file_with(r#"{"name": "sugar", "consensus": "x"}"#).path()),
            "expected a JSON array",
        );
    }

    #[test]
    fn test_load_rejects_missing_field() {
        assert_config_error(
            load_evidence_store(
                file_with(r#"[{"name": "sugar", "consensus": "x"}, {"name": "salt"}]"#).path(),
            ),
            "record 1",
        );
    }

    #[test]
    fn test_load_rejects_non_string_field() {
        assert_config_error(
            load_evidence_store(file_with(r#"[{"name": 42, "consensus": "x"}]"#).path()),
            "record 0",
        );
    }

    #[test]
    fn test_load_rejects_non_object_entry() {
        assert_config_error(
            load_evidence_store(file_with(r#"["sugar"]"#).path()),
            "record 0",
        );
    }
}
