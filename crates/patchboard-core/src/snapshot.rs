use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use tracing::warn;

/// Filename to file content, in document order.
pub type FileMap = IndexMap<String, String>;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed status document: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WorkflowStatus {
    Idle,
    Running,
    Completed,
    Error,
}

impl Default for WorkflowStatus {
    fn default() -> Self {
        Self::Idle
    }
}

impl WorkflowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStatus::Idle => "IDLE",
            WorkflowStatus::Running => "RUNNING",
            WorkflowStatus::Completed => "COMPLETED",
            WorkflowStatus::Error => "ERROR",
        }
    }

    /// COMPLETED and ERROR end a run; nothing follows them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowStatus::Completed | WorkflowStatus::Error)
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrDetails {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "status")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub files: FileMap,
}

/// One status document, as returned by a single status fetch.
///
/// Decoding goes through [`WireSnapshot`], so every `Snapshot` in the
/// process already satisfies the per-document invariants: absent or null
/// collections are empty and `fixed_code` only names files present in
/// `pr_details.files`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireSnapshot")]
pub struct Snapshot {
    pub status: WorkflowStatus,
    pub current_step: Option<String>,
    pub pr_details: Option<PrDetails>,
    pub fixed_code: FileMap,
    pub vulnerabilities: Vec<String>,
    pub generated_tests: Vec<String>,
    pub logs: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WireSnapshot {
    #[serde(default, deserialize_with = "null_as_default")]
    status: WorkflowStatus,
    #[serde(default)]
    current_step: Option<String>,
    #[serde(default)]
    pr_details: Option<PrDetails>,
    #[serde(default, deserialize_with = "null_as_default")]
    fixed_code: FileMap,
    #[serde(default, deserialize_with = "null_as_default")]
    vulnerabilities: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    generated_tests: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    logs: Vec<String>,
}

impl From<WireSnapshot> for Snapshot {
    fn from(wire: WireSnapshot) -> Self {
        let WireSnapshot {
            status,
            current_step,
            pr_details,
            mut fixed_code,
            vulnerabilities,
            generated_tests,
            logs,
        } = wire;

        fixed_code.retain(|filename, _| {
            let known = pr_details
                .as_ref()
                .map(|pr| pr.files.contains_key(filename))
                .unwrap_or(false);
            if !known {
                warn!(
                    event = "snapshot_orphan_fix",
                    filename = %filename,
                    "dropping patched content for a file the pull request does not contain"
                );
            }
            known
        });

        Snapshot {
            status,
            current_step,
            pr_details,
            fixed_code,
            vulnerabilities,
            generated_tests,
            logs,
        }
    }
}

impl Snapshot {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn file_count(&self) -> usize {
        self.pr_details
            .as_ref()
            .map(|pr| pr.files.len())
            .unwrap_or(0)
    }

    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.pr_details
            .iter()
            .flat_map(|pr| pr.files.keys())
            .map(String::as_str)
    }

    pub fn has_file(&self, filename: &str) -> bool {
        self.original_content(filename).is_some()
    }

    pub fn original_content(&self, filename: &str) -> Option<&str> {
        self.pr_details
            .as_ref()
            .and_then(|pr| pr.files.get(filename))
            .map(String::as_str)
    }

    pub fn patched_content(&self, filename: &str) -> Option<&str> {
        self.fixed_code.get(filename).map(String::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.pr_details
            .as_ref()
            .and_then(|pr| pr.title.as_deref())
            .filter(|title| !title.trim().is_empty())
    }

    pub fn pr_id(&self) -> Option<&str> {
        self.pr_details.as_ref().and_then(|pr| pr.id.as_deref())
    }

    pub fn current_step(&self) -> Option<&str> {
        self.current_step
            .as_deref()
            .filter(|step| !step.is_empty())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// PR ids arrive as numbers from some backends and strings from others.
fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(serde::de::Error::custom(
            "expected string or number for pull request id",
        )),
    }
}
