//! Runs a suite of spec files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    assertion::{QueryEngine, QueryLogLevel, YqEngine},
    diagnostics::Result,
    render::{HelmRenderer, Renderer},
    spec::{HelmSpec, SpecResult},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSuiteResult {
    pub succeeded: bool,
    #[serde(default)]
    pub spec_results: Vec<SpecResult>,
}

impl TestSuiteResult {
    /// Number of test cases across all specs, and how many of them passed.
    pub fn test_case_counts(&self) -> (usize, usize) {
        self.spec_results
            .iter()
            .flat_map(|s| &s.test_case_results)
            .fold((0, 0), |(total, passed), t| {
                (total + 1, passed + usize::from(t.succeeded))
            })
    }
}

/// Tool settings for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    pub helm_binary: PathBuf,
    pub yq_binary: PathBuf,
    pub query_log: QueryLogLevel,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            helm_binary: PathBuf::from("helm"),
            yq_binary: PathBuf::from("yq"),
            query_log: QueryLogLevel::default(),
        }
    }
}

/// Loads spec files and executes them with a renderer and a query engine.
pub struct HelmTestRunner<R = HelmRenderer, Q = YqEngine> {
    renderer: R,
    engine: Q,
}

impl HelmTestRunner {
    pub fn from_config(config: &RunnerConfig) -> Self {
        Self::new(
            HelmRenderer::new(&config.helm_binary),
            YqEngine::new(&config.yq_binary, config.query_log),
        )
    }
}

impl Default for HelmTestRunner {
    fn default() -> Self {
        Self::from_config(&RunnerConfig::default())
    }
}

impl<R: Renderer, Q: QueryEngine> HelmTestRunner<R, Q> {
    pub fn new(renderer: R, engine: Q) -> Self {
        Self { renderer, engine }
    }

    /// Loads every spec file, then executes them in order.
    ///
    /// Loading happens up front: if any spec fails to load, nothing is
    /// executed and the error is returned. Test failures never abort the run.
    pub fn run<P: AsRef<Path>>(&self, spec_files: &[P]) -> Result<TestSuiteResult> {
        let specs = spec_files
            .iter()
            .map(HelmSpec::load)
            .collect::<Result<Vec<_>>>()?;

        let mut result = TestSuiteResult {
            succeeded: true,
            spec_results: Vec::with_capacity(specs.len()),
        };
        for spec in &specs {
            let r = spec.execute(&self.renderer, &self.engine);
            result.succeeded &= r.succeeded;
            result.spec_results.push(r);
        }

        let (total, passed) = result.test_case_counts();
        tracing::info!(
            specs = result.spec_results.len(),
            "{passed}/{total} test cases passed"
        );
        Ok(result)
    }
}
