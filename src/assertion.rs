//! Assertions: a `yq` query plus the exact result it must produce.

use std::{path::PathBuf, process::Command};

use serde::{Deserialize, Serialize};

use crate::{diagnostics::QueryError, process::pipe_through};

/// Checks the output of a query against rendered manifests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Assertion {
    /// Human-readable description of what the assertion tests.
    pub description: String,
    /// A [yq](https://mikefarah.gitbook.io/yq/) query run against the rendering output.
    ///
    /// The input holds every rendered manifest, separated by document markers.
    pub query: String,
    /// The value the trimmed query output must equal for the assertion to pass.
    pub expected_result: String,
}

/// Outcome of evaluating one [`Assertion`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssertionResult {
    pub assertion: Assertion,
    pub succeeded: bool,
    pub actual_result: String,
    #[serde(default)]
    pub error: Option<QueryError>,
}

/// Output of one query evaluation.
///
/// `output` holds whatever the engine printed, even when `error` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOutput {
    pub output: String,
    pub error: Option<QueryError>,
}

impl QueryOutput {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            error: None,
        }
    }

    pub fn failed(output: impl Into<String>, error: QueryError) -> Self {
        Self {
            output: output.into(),
            error: Some(error),
        }
    }
}

/// A structured-query engine that can evaluate an expression against YAML text.
pub trait QueryEngine {
    fn evaluate(&self, query: &str, document: &str) -> QueryOutput;
}

impl<T: QueryEngine + ?Sized> QueryEngine for &T {
    fn evaluate(&self, query: &str, document: &str) -> QueryOutput {
        (**self).evaluate(query, document)
    }
}

impl Assertion {
    /// Runs the query against `manifest` and compares the trimmed output to the expected result.
    ///
    /// Evaluation errors are recorded on the result; they never abort the caller.
    pub fn evaluate(&self, manifest: &str, engine: &dyn QueryEngine) -> AssertionResult {
        let QueryOutput { output, error } = engine.evaluate(&self.query, manifest);
        let actual_result = output.trim().to_string();
        let succeeded = error.is_none() && actual_result == self.expected_result;
        if !succeeded {
            tracing::debug!(
                query = %self.query,
                expected = %self.expected_result,
                actual = %actual_result,
                "assertion `{}` failed",
                self.description
            );
        }
        AssertionResult {
            assertion: self.clone(),
            succeeded,
            actual_result,
            error,
        }
    }
}

// ============================================================================
// YQ ADAPTER
// ============================================================================

/// How much of yq's own diagnostic output to forward into our logs.
///
/// yq writes warnings and debug chatter to stderr. By default it is dropped
/// so it does not interleave with the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum QueryLogLevel {
    #[default]
    Quiet,
    Warn,
    Debug,
}

/// Evaluates queries by piping the manifest into the `yq` binary.
#[derive(Debug, Clone)]
pub struct YqEngine {
    binary: PathBuf,
    log_level: QueryLogLevel,
}

impl Default for YqEngine {
    fn default() -> Self {
        Self::new("yq", QueryLogLevel::default())
    }
}

impl YqEngine {
    pub fn new(binary: impl Into<PathBuf>, log_level: QueryLogLevel) -> Self {
        Self {
            binary: binary.into(),
            log_level,
        }
    }

    fn program(&self) -> String {
        self.binary.display().to_string()
    }

    fn forward_stderr(&self, stderr: &str) {
        let stderr = stderr.trim();
        if stderr.is_empty() {
            return;
        }
        match self.log_level {
            QueryLogLevel::Quiet => {}
            QueryLogLevel::Warn => tracing::warn!(target: "yq", "{stderr}"),
            QueryLogLevel::Debug => tracing::debug!(target: "yq", "{stderr}"),
        }
    }
}

impl QueryEngine for YqEngine {
    fn evaluate(&self, query: &str, document: &str) -> QueryOutput {
        let spawn_error = |e: std::io::Error| QueryError::Spawn {
            program: self.program(),
            message: e.to_string(),
        };

        // `eval-all` so that a multi-document manifest is queried as a whole.
        let mut command = Command::new(&self.binary);
        command.args(["eval-all", query, "-"]);
        let output = match pipe_through(&mut command, document) {
            Ok(output) => output,
            Err(e) => return QueryOutput::failed("", spawn_error(e)),
        };
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if output.status.success() {
            self.forward_stderr(&stderr);
            return QueryOutput::ok(stdout);
        }
        QueryOutput::failed(
            stdout,
            QueryError::Evaluation {
                query: query.to_string(),
                status: output.status.code(),
                stderr,
            },
        )
    }
}
