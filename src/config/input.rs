use crate::domain::model::ValueSetDescriptor;
use crate::utils::error::{Result, VsacError};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Deserialize)]
#[serde(untagged)]
enum DescriptorFile {
    List(Vec<ValueSetDescriptor>),
    Keyed(BTreeMap<String, ValueSetDescriptor>),
}

fn read_input(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| VsacError::ConfigError {
        message: format!("Failed to read input file {}: {}", path.display(), e),
    })
}

/// Reads a JSON object mapping display names to OIDs.
pub fn load_mapping_file<P: AsRef<Path>>(path: P) -> Result<BTreeMap<String, String>> {
    let path = path.as_ref();
    let content = read_input(path)?;
    serde_json::from_str(&content).map_err(|e| VsacError::ConfigError {
        message: format!("{} is not a name to OID mapping: {}", path.display(), e),
    })
}

/// Reads value set descriptors, either as a JSON array of `{name, id}` or
/// as an object whose values are `{name, id}`.
pub fn load_descriptor_file<P: AsRef<Path>>(path: P) -> Result<Vec<ValueSetDescriptor>> {
    let path = path.as_ref();
    let content = read_input(path)?;
    let parsed: DescriptorFile =
        serde_json::from_str(&content).map_err(|e| VsacError::ConfigError {
            message: format!("{} does not contain value set descriptors: {}", path.display(), e),
        })?;

    Ok(match parsed {
        DescriptorFile::List(descriptors) => descriptors,
        DescriptorFile::Keyed(descriptors) => descriptors.into_values().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_mapping_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("valuesets.json");
        std::fs::write(
            &path,
            r#"{"Diabetes": "2.16.840.1.113883.3.464.1003.103.12.1001"}"#,
        )
        .unwrap();

        let mapping = load_mapping_file(&path).unwrap();
        assert_eq!(
            mapping.get("Diabetes").map(String::as_str),
            Some("2.16.840.1.113883.3.464.1003.103.12.1001")
        );
    }

    #[test]
    fn test_load_descriptor_list_and_keyed_forms() {
        let temp_dir = TempDir::new().unwrap();

        let list = temp_dir.path().join("list.json");
        std::fs::write(&list, r#"[{"name": "Diabetes", "id": "urn:oid:1.2.3"}]"#).unwrap();
        assert_eq!(
            load_descriptor_file(&list).unwrap(),
            vec![ValueSetDescriptor::new("Diabetes", "urn:oid:1.2.3")]
        );

        let keyed = temp_dir.path().join("keyed.json");
        std::fs::write(
            &keyed,
            r#"{"Diabetes": {"name": "Diabetes", "id": "urn:oid:1.2.3"}}"#,
        )
        .unwrap();
        assert_eq!(
            load_descriptor_file(&keyed).unwrap(),
            vec![ValueSetDescriptor::new("Diabetes", "urn:oid:1.2.3")]
        );
    }

    #[test]
    fn test_missing_and_malformed_inputs() {
        let temp_dir = TempDir::new().unwrap();
        assert!(load_mapping_file(temp_dir.path().join("missing.json")).is_err());

        let bad = temp_dir.path().join("bad.json");
        std::fs::write(&bad, "[1, 2, 3]").unwrap();
        assert!(matches!(
            load_mapping_file(&bad).unwrap_err(),
            VsacError::ConfigError { .. }
        ));
        assert!(load_descriptor_file(&bad).is_err());
    }
}
