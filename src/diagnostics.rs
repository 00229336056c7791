//! Error types for every failure mode of a helm-spec run.
//!
//! Errors fall into two groups:
//!
//! - [`HelmSpecError`] is fatal. It is returned through `Result` and ends the
//!   run: a spec that cannot be loaded, a spec directory that does not exist,
//!   an unsupported report format.
//! - [`RenderError`] and [`QueryError`] are recorded as values on the result
//!   tree. A failing render or query only affects the test case or assertion
//!   it belongs to, and both types serialize so they survive the YAML report.

use std::{io, path::PathBuf};

use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias for fallible helm-spec operations.
pub type Result<T, E = HelmSpecError> = std::result::Result<T, E>;

/// Fatal errors that abort a helm-spec run.
#[derive(Debug, Error, Diagnostic)]
pub enum HelmSpecError {
    #[error("failed to read spec file `{}`", path.display())]
    #[diagnostic(
        code(helm_spec::load),
        help("check that the spec file exists and is readable")
    )]
    ReadSpec {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse spec file `{}`: {message}", path.display())]
    #[diagnostic(code(helm_spec::load))]
    ParseSpec {
        path: PathBuf,
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
    },

    #[error("spec directory `{}` does not seem to exist", path.display())]
    #[diagnostic(code(helm_spec::discovery))]
    SpecDirMissing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("`{}` is not a directory", path.display())]
    #[diagnostic(
        code(helm_spec::discovery),
        help("pass the directory that contains your spec files")
    )]
    NotADirectory { path: PathBuf },

    #[error("no {pattern} files found in `{}`", path.display())]
    #[diagnostic(
        code(helm_spec::discovery),
        help("spec files must be named like `deployment_spec.yaml`")
    )]
    NoSpecFiles { pattern: String, path: PathBuf },

    #[error("failed to walk spec directory `{}`: {message}", path.display())]
    #[diagnostic(code(helm_spec::discovery))]
    Walk { path: PathBuf, message: String },

    #[error("unsupported output format `{format}`")]
    #[diagnostic(code(helm_spec::report), help("output format must be one of `pretty`, `yaml`"))]
    UnsupportedFormat { format: String },

    #[error("failed to serialize the test report")]
    #[diagnostic(code(helm_spec::report))]
    SerializeReport {
        #[source]
        source: serde_yaml::Error,
    },

    #[error("test suite failed")]
    #[diagnostic(code(helm_spec::suite))]
    SuiteFailed,
}

impl HelmSpecError {
    /// Builds a parse error that points miette at the offending location in the spec file.
    pub fn parse_spec(path: PathBuf, content: String, error: &serde_yaml::Error) -> Self {
        let span = error
            .location()
            .map(|loc| SourceSpan::from((loc.index(), 1)));
        let src = NamedSource::new(path.display().to_string(), content);
        HelmSpecError::ParseSpec {
            path,
            message: error.to_string(),
            src,
            span,
        }
    }
}

/// A render that did not produce a manifest.
///
/// Stored on the test case result. Whether it fails the test case depends on
/// `shouldFailToRender`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RenderError {
    /// The renderer binary could not be started at all.
    #[error("failed to run `{program}`: {message}")]
    Spawn { program: String, message: String },

    /// `helm dependency build` exited unsuccessfully.
    #[error("dependency build for `{chart_path}` failed{}", describe_exit(*status, stderr))]
    #[serde(rename_all = "camelCase")]
    DependencyBuild {
        chart_path: String,
        status: Option<i32>,
        stderr: String,
    },

    /// `helm template` exited unsuccessfully.
    #[error("rendering failed{}", describe_exit(*status, stderr))]
    Template { status: Option<i32>, stderr: String },
}

/// A query that could not be evaluated against a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum QueryError {
    #[error("failed to run `{program}`: {message}")]
    Spawn { program: String, message: String },

    #[error("query `{query}` failed{}", describe_exit(*status, stderr))]
    Evaluation {
        query: String,
        status: Option<i32>,
        stderr: String,
    },
}

fn describe_exit(status: Option<i32>, stderr: &str) -> String {
    let mut out = match status {
        Some(code) => format!(" with exit code {code}"),
        None => " (terminated by signal)".to_string(),
    };
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        out.push_str(": ");
        out.push_str(stderr);
    }
    out
}
