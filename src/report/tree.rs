//! Plain-text tree layout for the pretty report.

/// Columns per nesting level.
pub const INDENT_WIDTH: usize = 4;

/// Vertical guide drawn in the column of a level that still has siblings below.
pub const GUIDE: char = '│';

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";

/// One entry in the tree.
///
/// `label` is printed on the connector line. `body` is free-form, possibly
/// multi-line text printed right below the label, aligned with the label text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeNode {
    pub label: String,
    pub body: Option<String>,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }
}

/// Renders sibling nodes as a connected tree, one line per label or body line.
pub fn render_tree(nodes: &[TreeNode]) -> String {
    let mut lines = Vec::new();
    render_siblings(nodes, 0, &[], &mut lines);
    lines.join("\n")
}

fn render_siblings(
    nodes: &[TreeNode],
    level: usize,
    continuations: &[usize],
    lines: &mut Vec<String>,
) {
    for (index, node) in nodes.iter().enumerate() {
        let is_last = index + 1 == nodes.len();
        let branch = if is_last { LAST_BRANCH } else { BRANCH };
        lines.push(format!(
            "{}{}{}",
            indentation(level, continuations, GUIDE),
            branch,
            node.label
        ));

        // Everything below this node keeps a guide in its column while later
        // siblings remain.
        let mut below = continuations.to_vec();
        if !is_last {
            below.push(level);
        }
        if let Some(body) = &node.body {
            lines.push(tree_indent(body, level, &below, GUIDE));
        }
        render_siblings(&node.children, level + 1, &below, lines);
    }
}

/// Indents every line of `content` so it nests under a node at `tree_level`.
///
/// The prefix is `(tree_level + 1) * INDENT_WIDTH` columns wide. Columns of
/// the levels in `continuations` show `guide`; all others are blank.
pub fn tree_indent(content: &str, tree_level: usize, continuations: &[usize], guide: char) -> String {
    let prefix = indentation(tree_level + 1, continuations, guide);
    content
        .split('\n')
        .map(|line| format!("{prefix}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn indentation(levels: usize, continuations: &[usize], guide: char) -> String {
    let mut prefix = String::with_capacity(levels * INDENT_WIDTH);
    for level in 0..levels {
        prefix.push(if continuations.contains(&level) { guide } else { ' ' });
        prefix.push_str(&" ".repeat(INDENT_WIDTH - 1));
    }
    prefix
}
