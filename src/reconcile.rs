//! Retrieve-result reconciliation.
//!
//! The retrieval CLI reports outcomes in several shapes: it may fail to run
//! at all, report a top-level failure, succeed with per-file detail, or emit
//! a status code this crate does not recognize. Raw captured output is
//! decoded into a tagged [`ToolOutcome`] first, then mapped onto one status
//! per requested component.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::Component;

/// Known-benign failure signature.
///
/// On source-tracked orgs the CLI can report this git-reference failure even
/// when the retrieve itself completed. A batch error containing this text is
/// discarded and the whole batch reported as success; any other error text is
/// surfaced faithfully.
pub const BENIGN_TRACKING_REF_ERROR: &str = "Could not resolve reference";

const NO_OUTPUT_MESSAGE: &str = "Retrieve process failed and produced no error output";
const COMMAND_FAILED_MESSAGE: &str = "Retrieve command failed";
const UNKNOWN_PROBLEM: &str = "Unknown problem";

/// Captured output of a completed retrieval invocation.
#[derive(Debug, Clone, Default)]
pub struct RawToolOutput {
    /// Whether the process failed to run or exited abnormally.
    pub exit_failed: bool,
    pub stdout: String,
    pub stderr: String,
    /// Error text from the process launcher, when the process could not run.
    pub invocation_error: Option<String>,
}

/// Per-component retrieval status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetrieveItemStatus {
    Success,
    Failed,
}

/// Outcome for a single requested component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrieveItemResult {
    /// Position of the component in the requested list.
    pub index: usize,
    pub status: RetrieveItemStatus,
    pub error_message: Option<String>,
}

/// Batch-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchErrorType {
    /// The whole invocation failed; every component shares one message.
    Command,
    /// The invocation succeeded but individual components failed.
    Component,
}

/// Full reconciliation of one retrieval invocation.
///
/// Always carries exactly one result per requested component, in request
/// order. Produced fresh per invocation; never merged with a prior result
/// set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub results: Vec<RetrieveItemResult>,
    pub error_message: Option<String>,
    pub error_type: Option<BatchErrorType>,
}

/// Tagged decode of the tool's raw output.
#[derive(Debug)]
enum ToolOutcome {
    /// The process could not run, or exited abnormally before producing
    /// usable JSON.
    InvocationFailure(Option<String>),
    /// The process ran and reported a top-level failure.
    CommandFailure(String),
    /// The process reported success, with per-file detail.
    CommandSuccess(Vec<FileResponse>),
    /// The top-level status is neither the success nor the failure code.
    UnknownStatus,
}

impl ToolOutcome {
    fn label(&self) -> &'static str {
        match self {
            ToolOutcome::InvocationFailure(_) => "invocation_failure",
            ToolOutcome::CommandFailure(_) => "command_failure",
            ToolOutcome::CommandSuccess(_) => "command_success",
            ToolOutcome::UnknownStatus => "unknown_status",
        }
    }
}

/// Top-level JSON envelope the CLI writes to stdout.
#[derive(Debug, Deserialize)]
struct CliEnvelope {
    status: Option<i64>,
    message: Option<String>,
    result: Option<CliResult>,
}

#[derive(Debug, Default, Deserialize)]
struct CliResult {
    #[serde(default, rename = "inboundFiles")]
    inbound_files: Vec<FileResponse>,
}

/// One per-file entry in a successful retrieve response.
#[derive(Debug, Clone, Deserialize)]
struct FileResponse {
    #[serde(rename = "fullName")]
    full_name: String,
    #[serde(default, rename = "type")]
    member_type: String,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    problem: Option<String>,
}

impl FileResponse {
    fn failed(&self) -> bool {
        self.state.as_deref() == Some("Failed")
    }

    fn detail(&self) -> &str {
        self.error
            .as_deref()
            .or(self.problem.as_deref())
            .unwrap_or(UNKNOWN_PROBLEM)
    }
}

/// JSON shape some CLI versions write to stderr on launch failures.
#[derive(Debug, Deserialize)]
struct StderrEnvelope {
    message: Option<String>,
    error: Option<String>,
}

/// Map a retrieval invocation's raw output onto per-component statuses.
///
/// Every requested component receives exactly one result, indexed by its
/// position in `components`; order is never changed. A component absent from
/// the per-file detail of a successful response defaults to `Success`, as
/// does the whole batch when the top-level status code is unrecognized. The
/// fail-open default exists for forward compatibility with status codes this
/// crate does not know.
pub fn reconcile(raw: &RawToolOutput, components: &[Component]) -> Reconciliation {
    let outcome = classify(raw);
    debug!(
        shape = outcome.label(),
        components = components.len(),
        "classified retrieve output"
    );

    match outcome {
        ToolOutcome::InvocationFailure(message) => {
            let message = message.unwrap_or_else(|| NO_OUTPUT_MESSAGE.to_string());
            fail_all(components, message)
        }
        ToolOutcome::CommandFailure(message) => fail_all(components, message),
        ToolOutcome::CommandSuccess(files) => reconcile_files(components, &files),
        ToolOutcome::UnknownStatus => succeed_all(components),
    }
}

fn classify(raw: &RawToolOutput) -> ToolOutcome {
    if raw.exit_failed || raw.invocation_error.is_some() {
        return ToolOutcome::InvocationFailure(invocation_message(raw));
    }

    match serde_json::from_str::<CliEnvelope>(&raw.stdout) {
        Ok(envelope) => match envelope.status {
            Some(0) => ToolOutcome::CommandSuccess(
                envelope.result.unwrap_or_default().inbound_files,
            ),
            Some(1) => ToolOutcome::CommandFailure(
                envelope
                    .message
                    .unwrap_or_else(|| COMMAND_FAILED_MESSAGE.to_string()),
            ),
            _ => ToolOutcome::UnknownStatus,
        },
        Err(_) => ToolOutcome::UnknownStatus,
    }
}

/// Best available message for an invocation failure, in preference order:
/// stdout JSON failure message, stderr JSON message/error field, raw trimmed
/// stderr, launcher error text.
fn invocation_message(raw: &RawToolOutput) -> Option<String> {
    if let Ok(envelope) = serde_json::from_str::<CliEnvelope>(&raw.stdout) {
        if matches!(envelope.status, Some(status) if status != 0) {
            if let Some(message) = envelope.message {
                return Some(message);
            }
        }
    }

    if let Ok(envelope) = serde_json::from_str::<StderrEnvelope>(&raw.stderr) {
        if let Some(message) = envelope.message.or(envelope.error) {
            return Some(message);
        }
    }

    let stderr = raw.stderr.trim();
    if !stderr.is_empty() {
        return Some(stderr.to_string());
    }

    raw.invocation_error.clone()
}

fn fail_all(components: &[Component], message: String) -> Reconciliation {
    if message.contains(BENIGN_TRACKING_REF_ERROR) {
        return succeed_all(components);
    }

    let results = components
        .iter()
        .enumerate()
        .map(|(index, _)| RetrieveItemResult {
            index,
            status: RetrieveItemStatus::Failed,
            error_message: Some(message.clone()),
        })
        .collect();

    Reconciliation {
        results,
        error_message: Some(message),
        error_type: Some(BatchErrorType::Command),
    }
}

fn succeed_all(components: &[Component]) -> Reconciliation {
    let results = components
        .iter()
        .enumerate()
        .map(|(index, _)| RetrieveItemResult {
            index,
            status: RetrieveItemStatus::Success,
            error_message: None,
        })
        .collect();

    Reconciliation {
        results,
        error_message: None,
        error_type: None,
    }
}

fn reconcile_files(components: &[Component], files: &[FileResponse]) -> Reconciliation {
    let results = components
        .iter()
        .enumerate()
        .map(|(index, component)| {
            let entry = files.iter().find(|f| f.full_name == component.api_name);
            match entry {
                Some(file) if file.failed() => RetrieveItemResult {
                    index,
                    status: RetrieveItemStatus::Failed,
                    error_message: Some(file.detail().to_string()),
                },
                _ => RetrieveItemResult {
                    index,
                    status: RetrieveItemStatus::Success,
                    error_message: None,
                },
            }
        })
        .collect();

    let failed: Vec<&FileResponse> = files.iter().filter(|f| f.failed()).collect();
    if failed.is_empty() {
        return Reconciliation {
            results,
            error_message: None,
            error_type: None,
        };
    }

    let message = failed
        .iter()
        .map(|f| format!("• {} ({}) — {}", f.full_name, f.member_type, f.detail()))
        .collect::<Vec<_>>()
        .join("\n\n");

    if message.contains(BENIGN_TRACKING_REF_ERROR) {
        return succeed_all(components);
    }

    Reconciliation {
        results,
        error_message: Some(message),
        error_type: Some(BatchErrorType::Component),
    }
}
