//! The slice of the platform's run model which local launches populate.

use serde::{Deserialize, Serialize};

use crate::status::TestStructure;

/// A run record as tracked by the local launcher.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestRun {
    /// The run name; starts as a placeholder until the framework
    /// allocates a real one
    pub name: String,
    /// The bundle the test was loaded from, absent for gherkin runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle_name: Option<String>,
    /// The test stream, when one was named
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<String>,
    /// The run group the submission belongs to
    pub group: String,
    /// Who asked for the run
    pub requestor: String,
    /// Whether the run was launched with tracing on
    pub trace: bool,
    /// The request type, for example "local"
    #[serde(rename = "type")]
    pub request_type: String,
    /// Always empty for local runs; the field exists for parity with
    /// server-side submissions
    pub submission_id: String,
}

/// The launcher's view of all runs in a group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestRuns {
    /// True once every tracked run in the group has finished
    pub complete: bool,
    /// The tracked runs, in submission order
    pub runs: Vec<TestRun>,
}

/// A single run with its status read back from the result archive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Run {
    /// The run name
    pub name: String,
    /// The run's recorded structure, from structure.json
    pub test_structure: TestStructure,
}
