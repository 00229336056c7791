//! In-process stand-ins for `helm` and `yq`.

#![allow(dead_code)]

use std::{
    cell::RefCell,
    fs,
    path::{Path, PathBuf},
};

use helm_spec::{
    assertion::{QueryEngine, QueryOutput},
    render::{RenderOutput, Renderer},
    QueryError, RenderError,
};
use serde::Deserialize;
use serde_yaml::Value;

pub fn fixture(path: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(path)
}

/// Renders a chart by returning its `manifest.yaml`.
///
/// Values containing `invalid: true` are rejected, like a chart with a
/// `values.schema.json` would.
#[derive(Default)]
pub struct FixtureRenderer {
    pub template_calls: RefCell<Vec<Vec<String>>>,
}

impl FixtureRenderer {
    pub fn calls(&self) -> usize {
        self.template_calls.borrow().len()
    }
}

impl Renderer for FixtureRenderer {
    fn dependency_build(&self, chart_path: &Path) -> Result<(), RenderError> {
        if chart_path.is_dir() {
            return Ok(());
        }
        Err(RenderError::DependencyBuild {
            chart_path: chart_path.display().to_string(),
            status: Some(1),
            stderr: format!("Error: could not find {}", chart_path.display()),
        })
    }

    fn template(&self, args: &[String], values: &str) -> RenderOutput {
        self.template_calls.borrow_mut().push(args.to_vec());
        if values.contains("invalid: true") {
            return RenderOutput {
                manifest: String::new(),
                error: Some(RenderError::Template {
                    status: Some(1),
                    stderr: "Error: values don't meet the specifications of the schema(s)"
                        .to_string(),
                }),
            };
        }
        // Spec loading makes the chart path absolute; the release name never is.
        let chart = args
            .iter()
            .map(PathBuf::from)
            .find(|p| p.is_absolute() && p.is_dir())
            .unwrap_or_default();
        RenderOutput {
            manifest: fs::read_to_string(chart.join("manifest.yaml")).unwrap_or_default(),
            error: None,
        }
    }
}

/// Resolves `.a.b.c` paths like `yq eval-all`: one result per document,
/// separated by `---`, with `null` where the path is missing.
///
/// `select(.kind == "Kind") | .a.b` first drops documents of other kinds.
pub struct PathQuery;

impl QueryEngine for PathQuery {
    fn evaluate(&self, query: &str, document: &str) -> QueryOutput {
        let (kind, path) = match query
            .strip_prefix("select(.kind == \"")
            .and_then(|rest| rest.split_once("\") | "))
        {
            Some((kind, path)) => (Some(kind), path),
            None => (None, query),
        };
        let Some(path) = path.strip_prefix('.') else {
            return QueryOutput::failed(
                "",
                QueryError::Evaluation {
                    query: query.to_string(),
                    status: Some(1),
                    stderr: format!("Error: invalid input text \"{query}\""),
                },
            );
        };
        let mut results = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(document) {
            let Ok(value) = Value::deserialize(doc) else {
                continue;
            };
            if kind.is_some_and(|kind| value.get("kind").and_then(Value::as_str) != Some(kind)) {
                continue;
            }
            let found = path
                .split('.')
                .filter(|key| !key.is_empty())
                .try_fold(&value, |v, key| v.get(key));
            results.push(found.map_or_else(|| "null".to_string(), scalar));
        }
        if results.is_empty() {
            return QueryOutput::ok("");
        }
        QueryOutput::ok(results.join("\n---\n") + "\n")
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .unwrap_or_default()
            .trim_end()
            .to_string(),
    }
}
