//! Expansion request normalization.

use indexmap::IndexMap;

/// One level of the folded request: segment name to what follows it.
///
/// Insertion order is the order segments first appear in the request, which
/// makes plan entry order follow the caller's ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathTree(IndexMap<String, PathNode>);

/// What follows a segment in the folded request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathNode {
    /// The request ends here: resolve this segment and stop.
    Leaf,
    /// The request continues into nested segments.
    Branch(PathTree),
}

impl PathTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one path (already split into segments) into the tree.
    ///
    /// A longer path always wins over a shorter one that ends at the same
    /// node: `"a.b,a"` and `"a,a.b"` both fold to `{a: {b}}`, since
    /// expanding `a.b` expands `a` too.
    pub fn insert<'a>(&mut self, segments: impl IntoIterator<Item = &'a str>) {
        let mut iter = segments.into_iter().peekable();
        let mut level = self;
        while let Some(segment) = iter.next() {
            let is_last = iter.peek().is_none();
            let node = level
                .0
                .entry(segment.to_string())
                .or_insert(PathNode::Leaf);
            if is_last {
                return;
            }
            if matches!(node, PathNode::Leaf) {
                *node = PathNode::Branch(PathTree::new());
            }
            level = match node {
                PathNode::Branch(tree) => tree,
                PathNode::Leaf => return,
            };
        }
    }

    pub fn get(&self, segment: &str) -> Option<&PathNode> {
        self.0.get(segment)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PathNode)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every root-to-leaf path, dotted, in tree order.
    pub fn paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_paths("", &mut out);
        out
    }

    fn collect_paths(&self, prefix: &str, out: &mut Vec<String>) {
        for (segment, node) in &self.0 {
            let path = format!("{prefix}{segment}");
            match node {
                PathNode::Leaf => out.push(path),
                PathNode::Branch(tree) => tree.collect_paths(&format!("{path}."), out),
            }
        }
    }
}

/// A parsed expansion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionRequest {
    raw: String,
    tree: PathTree,
}

impl ExpansionRequest {
    /// Parses a raw request string.
    ///
    /// Whitespace anywhere is insignificant, `*` is an alias for `.`, and
    /// empty paths or segments (`"a,,b"`, `"a..b"`) are skipped.
    pub fn parse(raw: &str) -> Self {
        let mut tree = PathTree::new();
        for path in normalize(raw) {
            let segments: Vec<&str> = path.split('.').filter(|s| !s.is_empty()).collect();
            if !segments.is_empty() {
                tree.insert(segments);
            }
        }
        Self {
            raw: raw.to_string(),
            tree,
        }
    }

    /// The request exactly as received.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn tree(&self) -> &PathTree {
        &self.tree
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// The distinct leaf paths of the request.
    pub fn paths(&self) -> Vec<String> {
        self.tree.paths()
    }
}

/// Strips whitespace, maps `*` to `.` and splits on `,`.
fn normalize(raw: &str) -> Vec<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == '*' { '.' } else { c })
        .collect();
    cleaned
        .split(',')
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
