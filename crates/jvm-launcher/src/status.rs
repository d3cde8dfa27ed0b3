//! Reads the final status of a finished run out of its result archive
//! store folder.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// The structure.json artifact written by the framework into a run's
/// result archive store folder. Only the fields the launcher reports on
/// are modelled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestStructure {
    /// The run name the framework allocated
    pub run_name: Option<String>,
    /// The bundle the test class was loaded from
    pub bundle: Option<String>,
    /// The fully-qualified test class name
    pub test_name: Option<String>,
    /// The short test class name
    pub test_short_name: Option<String>,
    /// The lifecycle status, for example "finished"
    pub status: Option<String>,
    /// The overall result, for example "Passed" or "Failed"
    pub result: Option<String>,
    /// When the run was queued
    pub queued: Option<String>,
    /// When the run started executing
    pub start_time: Option<String>,
    /// When the run finished
    pub end_time: Option<String>,
    /// The methods the test ran
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<TestMethod>,
}

/// One test method recorded in the test structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestMethod {
    /// The method name
    pub method_name: Option<String>,
    /// The method's lifecycle status
    pub status: Option<String>,
    /// The method's result
    pub result: Option<String>,
}

/// Read the test structure from a run's RAS folder.
///
/// A missing, unreadable, empty, or unparseable file each fail with a
/// distinct error so the caller can report exactly what went wrong.
pub fn read_test_structure(ras_run_folder: &Path) -> Result<TestStructure> {
    let path = ras_run_folder.join("structure.json");

    if !path.is_file() {
        return Err(Error::StatusFileMissing { path });
    }

    let text = fs::read_to_string(&path).map_err(|source| Error::StatusFileUnreadable {
        path: path.clone(),
        source,
    })?;

    if text.trim().is_empty() {
        return Err(Error::StatusFileEmpty { path });
    }

    let structure: TestStructure =
        serde_json::from_str(&text).map_err(|source| Error::StatusFileInvalid {
            path: path.clone(),
            source,
        })?;

    debug!(
        path = %path.display(),
        status = structure.status.as_deref().unwrap_or(""),
        result = structure.result.as_deref().unwrap_or(""),
        "read run status"
    );
    Ok(structure)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_a_finished_run() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("structure.json"),
            r#"{
                "runName": "U456",
                "bundle": "my.bundle",
                "testName": "my.bundle.TestPayee",
                "testShortName": "TestPayee",
                "status": "finished",
                "result": "Passed",
                "methods": [
                    {"methodName": "testPayeeWorks", "status": "finished", "result": "Passed"}
                ]
            }"#,
        )
        .unwrap();

        let structure = read_test_structure(dir.path()).unwrap();
        assert_eq!(structure.run_name.as_deref(), Some("U456"));
        assert_eq!(structure.status.as_deref(), Some("finished"));
        assert_eq!(structure.result.as_deref(), Some("Passed"));
        assert_eq!(structure.methods.len(), 1);
        assert_eq!(structure.methods[0].result.as_deref(), Some("Passed"));
    }

    #[test]
    fn missing_file_is_its_own_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_test_structure(dir.path()).unwrap_err();
        assert!(matches!(err, Error::StatusFileMissing { .. }));
    }

    #[test]
    fn empty_file_is_its_own_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("structure.json"), "   \n").unwrap();
        let err = read_test_structure(dir.path()).unwrap_err();
        assert!(matches!(err, Error::StatusFileEmpty { .. }));
    }

    #[test]
    fn invalid_json_is_its_own_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("structure.json"), "this is not json").unwrap();
        let err = read_test_structure(dir.path()).unwrap_err();
        assert!(matches!(err, Error::StatusFileInvalid { .. }));
    }

    #[test]
    fn unknown_fields_are_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("structure.json"),
            r#"{"runName": "L1", "status": "finished", "logRecordIds": ["abc"]}"#,
        )
        .unwrap();
        let structure = read_test_structure(dir.path()).unwrap();
        assert_eq!(structure.run_name.as_deref(), Some("L1"));
    }
}
