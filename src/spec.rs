//! Spec files: loading them and executing their test cases.

use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    assertion::{Assertion, AssertionResult, QueryEngine},
    diagnostics::{HelmSpecError, RenderError, Result},
    render::{RenderInstructions, RenderOutput, Renderer},
};

/// Bundles rendering instructions with a list of assertions to perform
/// against the rendered output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestCase {
    pub title: String,
    /// Inputs for `helm template`.
    pub render: RenderInstructions,
    /// Assertions against the rendering output, evaluated in order.
    pub assertions: Vec<Assertion>,
}

/// A related group of test cases for the same helm chart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HelmSpec {
    pub title: String,
    /// Path to the helm chart. Absolute after [`HelmSpec::load`].
    pub chart_path: PathBuf,
    pub test_cases: Vec<TestCase>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseResult {
    pub title: String,
    pub render: RenderInstructions,
    pub succeeded: bool,
    pub manifest: String,
    #[serde(default)]
    pub assertion_results: Vec<AssertionResult>,
    #[serde(default)]
    pub error: Option<RenderError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecResult {
    pub title: String,
    pub chart_path: PathBuf,
    pub succeeded: bool,
    #[serde(default)]
    pub test_case_results: Vec<TestCaseResult>,
}

impl TestCase {
    /// Renders the chart and evaluates the assertions against the output.
    pub fn execute(
        &self,
        chart_path: &Path,
        renderer: &dyn Renderer,
        engine: &dyn QueryEngine,
    ) -> TestCaseResult {
        tracing::debug!(test_case = %self.title, "executing test case");
        let RenderOutput { manifest, error } = self.render.execute(chart_path, renderer);
        let mut result = TestCaseResult {
            title: self.title.clone(),
            render: self.render.clone(),
            succeeded: false,
            manifest,
            assertion_results: Vec::new(),
            error,
        };

        // Sometimes we want rendering to fail, i.e. to verify invalid values
        // are rejected by the chart. Assertions are not evaluated then.
        if self.render.should_fail_to_render {
            result.succeeded = result.error.is_some();
            if !result.succeeded {
                tracing::debug!(test_case = %self.title, "rendering succeeded but was expected to fail");
            }
            return result;
        }
        if let Some(error) = &result.error {
            tracing::warn!(test_case = %self.title, "{error}");
            return result;
        }

        result.succeeded = true;
        for assertion in &self.assertions {
            let r = assertion.evaluate(&result.manifest, engine);
            result.succeeded &= r.succeeded;
            result.assertion_results.push(r);
        }
        result
    }
}

impl HelmSpec {
    /// Reads and parses a spec file.
    ///
    /// A relative `chartPath` is resolved against the directory of the spec
    /// file, never the working directory.
    pub fn load(file_path: impl AsRef<Path>) -> Result<HelmSpec> {
        let file_path = absolute(file_path.as_ref());
        let content = fs::read_to_string(&file_path).map_err(|source| HelmSpecError::ReadSpec {
            path: file_path.clone(),
            source,
        })?;
        let mut spec: HelmSpec = serde_yaml::from_str(&content)
            .map_err(|e| HelmSpecError::parse_spec(file_path.clone(), content.clone(), &e))?;

        if !spec.chart_path.is_absolute() {
            let spec_dir = file_path.parent().unwrap_or_else(|| Path::new("/"));
            spec.chart_path = clean_join(spec_dir, &spec.chart_path);
        }
        tracing::debug!(
            spec = %spec.title,
            chart = %spec.chart_path.display(),
            test_cases = spec.test_cases.len(),
            "loaded spec {}",
            file_path.display()
        );
        Ok(spec)
    }

    /// Executes every test case in declaration order.
    pub fn execute(&self, renderer: &dyn Renderer, engine: &dyn QueryEngine) -> SpecResult {
        let mut result = SpecResult {
            title: self.title.clone(),
            chart_path: self.chart_path.clone(),
            succeeded: true,
            test_case_results: Vec::with_capacity(self.test_cases.len()),
        };
        for test_case in &self.test_cases {
            let r = test_case.execute(&self.chart_path, renderer, engine);
            result.succeeded &= r.succeeded;
            result.test_case_results.push(r);
        }
        result
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return clean_join(Path::new("/"), path);
    }
    match std::env::current_dir() {
        Ok(cwd) => clean_join(&cwd, path),
        Err(_) => path.to_path_buf(),
    }
}

/// Joins `relative` onto `base` and removes `.` and `..` components lexically.
fn clean_join(base: &Path, relative: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in base.join(relative).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !out.has_root() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
