use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod color;
pub mod diff_view;
pub mod files;
pub mod graph;
pub mod logs;
pub mod run;
pub mod snapshot;
pub mod store;
pub mod surfaces;
pub mod timeline;

#[cfg(test)]
mod test_support;

pub use color::{color_for, HexColor};
pub use diff_view::{code_panes, CodePanes, PatchedPane};
pub use files::FileListReconciler;
pub use graph::{AnimationClass, GraphAnimator, GraphState, ProcessNode};
pub use logs::LogPane;
pub use run::{Run, SnapshotOutcome};
pub use snapshot::{FileMap, PrDetails, Snapshot, SnapshotError, WorkflowStatus};
pub use store::SnapshotStore;
pub use surfaces::StatusBadge;
pub use timeline::{build_timeline, Actor, TimelineEntry};

/// Source language the simulated pull request is generated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Javascript,
    Abap,
    Java,
    Go,
    Ruby,
}

impl Default for Language {
    fn default() -> Self {
        Self::Python
    }
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::Python,
        Language::Javascript,
        Language::Abap,
        Language::Java,
        Language::Go,
        Language::Ruby,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Javascript => "javascript",
            Language::Abap => "abap",
            Language::Java => "java",
            Language::Go => "go",
            Language::Ruby => "ruby",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL
            .iter()
            .position(|lang| *lang == self)
            .unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input.trim().to_lowercase();
        match normalized.as_str() {
            "python" | "py" => Ok(Language::Python),
            "javascript" | "js" => Ok(Language::Javascript),
            "abap" => Ok(Language::Abap),
            "java" => Ok(Language::Java),
            "go" | "golang" => Ok(Language::Go),
            "ruby" | "rb" => Ok(Language::Ruby),
            other => Err(format!("Unknown language: {other}")),
        }
    }
}
