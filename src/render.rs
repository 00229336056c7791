//! Rendering a chart with `helm template`.

use std::{
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use serde::{Deserialize, Serialize};

use crate::{diagnostics::RenderError, process::pipe_through};

/// Inputs for rendering the chart with `helm template`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderInstructions {
    /// The release name to pass to `helm template`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_name: Option<String>,
    /// The release namespace to pass to `helm template`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// All user-supplied values in one inline yaml document.
    pub values: String,
    /// Extra arguments passed through to the helm CLI, i.e. `["--set-file", "foo=foo.txt"]`.
    pub extra_args: Vec<String>,
    /// Require rendering to fail for the test to pass.
    pub should_fail_to_render: bool,
}

/// Output of one render.
///
/// `manifest` is whatever the renderer wrote to stdout, even when `error` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOutput {
    pub manifest: String,
    pub error: Option<RenderError>,
}

/// The external templating tool.
///
/// Split into the two invocations helm-spec makes so that the argument
/// building in [`RenderInstructions::execute`] stays independent of how the
/// tool is actually run.
pub trait Renderer {
    /// Resolves the chart's dependencies. Output is discarded.
    fn dependency_build(&self, chart_path: &Path) -> Result<(), RenderError>;

    /// Renders with the given `template` arguments, piping `values` to stdin.
    fn template(&self, args: &[String], values: &str) -> RenderOutput;
}

impl<T: Renderer + ?Sized> Renderer for &T {
    fn dependency_build(&self, chart_path: &Path) -> Result<(), RenderError> {
        (**self).dependency_build(chart_path)
    }

    fn template(&self, args: &[String], values: &str) -> RenderOutput {
        (**self).template(args, values)
    }
}

impl RenderInstructions {
    /// Builds the argument list for `helm template`, without the subcommand itself.
    ///
    /// Values are always read from stdin, so `-f -` comes last and wins over
    /// any values file in `extra_args`.
    pub fn template_args(&self, chart_path: &Path) -> Vec<String> {
        let mut args = Vec::with_capacity(self.extra_args.len() + 5);
        if let Some(release_name) = non_empty(&self.release_name) {
            args.push(release_name.to_string());
        }
        args.push(chart_path.display().to_string());
        if let Some(namespace) = non_empty(&self.namespace) {
            args.push("-n".to_string());
            args.push(namespace.to_string());
        }
        args.extend(self.extra_args.iter().cloned());
        args.push("-f".to_string());
        args.push("-".to_string());
        args
    }

    /// Runs the dependency build and then renders the chart.
    ///
    /// No render is attempted if the dependency build fails. There are no retries.
    pub fn execute(&self, chart_path: &Path, renderer: &dyn Renderer) -> RenderOutput {
        if let Err(error) = renderer.dependency_build(chart_path) {
            return RenderOutput {
                manifest: String::new(),
                error: Some(error),
            };
        }
        renderer.template(&self.template_args(chart_path), &self.values)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

// ============================================================================
// HELM ADAPTER
// ============================================================================

/// Runs the real `helm` binary.
#[derive(Debug, Clone)]
pub struct HelmRenderer {
    binary: PathBuf,
}

impl Default for HelmRenderer {
    fn default() -> Self {
        Self::new("helm")
    }
}

impl HelmRenderer {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn spawn_error(&self, e: std::io::Error) -> RenderError {
        RenderError::Spawn {
            program: self.binary.display().to_string(),
            message: e.to_string(),
        }
    }
}

impl Renderer for HelmRenderer {
    fn dependency_build(&self, chart_path: &Path) -> Result<(), RenderError> {
        tracing::debug!(chart = %chart_path.display(), "helm dependency build");
        let output = Command::new(&self.binary)
            .arg("dependency")
            .arg("build")
            .arg(chart_path)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.spawn_error(e))?;
        if output.status.success() {
            return Ok(());
        }
        Err(RenderError::DependencyBuild {
            chart_path: chart_path.display().to_string(),
            status: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn template(&self, args: &[String], values: &str) -> RenderOutput {
        tracing::debug!(?args, "helm template");
        let mut command = Command::new(&self.binary);
        command.arg("template").args(args);
        let output = match pipe_through(&mut command, values) {
            Ok(output) => output,
            Err(e) => {
                return RenderOutput {
                    manifest: String::new(),
                    error: Some(self.spawn_error(e)),
                }
            }
        };
        let manifest = String::from_utf8_lossy(&output.stdout).into_owned();
        let error = (!output.status.success()).then(|| RenderError::Template {
            status: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
        RenderOutput { manifest, error }
    }
}
