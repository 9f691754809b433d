use serde::{Deserialize, Serialize};

/// A compiled expansion plan for one document type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionPlan {
    entries: Vec<PlanEntry>,
    /// Request paths ignored because the field is unknown or not a reference.
    dropped: Vec<String>,
}

/// One reference to resolve.
///
/// `path` is dotted and relative to the document the entry applies to; it
/// has more than one segment only when it passes through embedded
/// documents (`"subDocArr.post"`). `children` apply to each document loaded
/// through this entry; an entry without children is a leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub path: String,
    pub target_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PlanEntry>,
}

impl PlanEntry {
    pub fn leaf(path: impl Into<String>, target_type: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            target_type: target_type.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(
        path: impl Into<String>,
        target_type: impl Into<String>,
        children: Vec<PlanEntry>,
    ) -> Self {
        Self {
            path: path.into(),
            target_type: target_type.into(),
            children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The path split into its segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('.')
    }

    /// Number of resolution levels below and including this entry.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(PlanEntry::depth).max().unwrap_or(0)
    }
}

impl ExpansionPlan {
    pub fn new(entries: Vec<PlanEntry>, dropped: Vec<String>) -> Self {
        Self { entries, dropped }
    }

    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    pub fn dropped(&self) -> &[String] {
        &self.dropped
    }

    /// True when there is nothing to resolve.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deepest resolution chain in the plan.
    pub fn depth(&self) -> usize {
        self.entries.iter().map(PlanEntry::depth).max().unwrap_or(0)
    }
}
