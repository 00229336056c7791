//! The `pretty` report: a header followed by a tree of specs, test cases and assertions.

use std::io::Write;

use termcolor::{Buffer, Color, ColorSpec, WriteColor};
use unicode_width::UnicodeWidthStr;

use super::{
    tree::{render_tree, TreeNode},
    ReportSettings,
};
use crate::{
    assertion::AssertionResult,
    runner::TestSuiteResult,
    spec::{SpecResult, TestCaseResult},
};

pub const PASSED: &str = "passed";
pub const FAILED: &str = "failed";

const SEPARATOR: char = '═';

/// Renders the whole suite.
pub fn render(result: &TestSuiteResult, settings: &ReportSettings) -> String {
    let (total, passed) = result.test_case_counts();
    let summary = format!(
        "{passed}/{total} test cases passed in {} specs",
        result.spec_results.len()
    );
    let status_word = if result.succeeded { PASSED } else { FAILED };
    let width = UnicodeWidthStr::width(format!("{status_word} - {summary}").as_str());

    let mut out = format!(
        "{} - {summary}\n{}\n",
        status(result.succeeded, settings.use_color),
        SEPARATOR.to_string().repeat(width)
    );
    let nodes: Vec<_> = result
        .spec_results
        .iter()
        .map(|spec| spec_node(spec, settings))
        .collect();
    if !nodes.is_empty() {
        out.push_str(&render_tree(&nodes));
        out.push('\n');
    }
    out
}

/// Returns `passed` or `failed`, coloured green or red when `use_color` is set.
pub fn status(succeeded: bool, use_color: bool) -> String {
    let (text, color) = if succeeded {
        (PASSED, Color::Green)
    } else {
        (FAILED, Color::Red)
    };
    if !use_color {
        return text.to_string();
    }
    let mut buffer = Buffer::ansi();
    let _ = buffer.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    let _ = write!(buffer, "{text}");
    let _ = buffer.reset();
    String::from_utf8_lossy(buffer.as_slice()).into_owned()
}

fn spec_node(result: &SpecResult, settings: &ReportSettings) -> TreeNode {
    let children = result
        .test_case_results
        .iter()
        .map(|t| test_case_node(t, settings))
        .collect();
    TreeNode::new(format!(
        "{} - {}",
        status(result.succeeded, settings.use_color),
        result.title
    ))
    .with_children(children)
}

fn test_case_node(result: &TestCaseResult, settings: &ReportSettings) -> TreeNode {
    let mut children: Vec<_> = result
        .assertion_results
        .iter()
        .map(|a| assertion_node(a, settings))
        .collect();

    if let Some(error) = &result.error {
        children.push(TreeNode::new(format!(
            "rendering error: {}",
            first_line(&error.to_string())
        )));
    }

    if !result.succeeded && settings.verbose {
        let manifest = result.manifest.trim_end_matches('\n');
        let manifest = if manifest.is_empty() { "(empty)" } else { manifest };
        children.push(TreeNode::new("manifest:").with_body(manifest));
        if let Some(error) = &result.error {
            children.push(TreeNode::new("error:").with_body(error.to_string().trim_end()));
        }
    }

    TreeNode::new(format!(
        "{} - {}",
        status(result.succeeded, settings.use_color),
        result.title
    ))
    .with_children(children)
}

fn assertion_node(result: &AssertionResult, settings: &ReportSettings) -> TreeNode {
    let node = TreeNode::new(format!(
        "{} - {}",
        status(result.succeeded, settings.use_color),
        result.assertion.description
    ));
    if result.succeeded {
        return node;
    }

    let mut details = vec![
        value_node("query", &result.assertion.query),
        value_node("expected", &result.assertion.expected_result),
        value_node("actual", &result.actual_result),
    ];
    if let Some(error) = &result.error {
        details.push(TreeNode::new(format!(
            "error: {}",
            first_line(&error.to_string())
        )));
    }
    node.with_children(details)
}

/// Single-line values go inline in backticks; multi-line values (lists, maps) become a body.
fn value_node(name: &str, value: &str) -> TreeNode {
    if value.contains('\n') {
        return TreeNode::new(format!("{name}:")).with_body(value);
    }
    TreeNode::new(format!("{name}: `{value}`"))
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}
