//! Declarative tests for helm charts.
//!
//! A spec file names a chart, the values to render it with, and `yq` queries
//! whose output must match expected strings. [`HelmTestRunner`] loads spec
//! files, renders each test case with `helm template`, evaluates the
//! assertions and collects a [`TestSuiteResult`], which [`report::report`]
//! turns into YAML or a pretty tree.

pub use crate::diagnostics::{HelmSpecError, QueryError, RenderError};
pub use crate::runner::{HelmTestRunner, RunnerConfig, TestSuiteResult};

pub mod assertion;
pub mod cli;
pub mod diagnostics;
pub mod discovery;
pub mod logging;
pub mod process;
pub mod render;
pub mod report;
pub mod runner;
pub mod spec;
