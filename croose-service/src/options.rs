use croose_model::{Document, MergePolicy, Sort};
use croose_mutation::ChangeLog;
use serde::Serialize;

/// Options for `create` and `read`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadOptions {
    /// Expansion request, e.g. `"createdBy,comments.createdBy"`.
    pub expand: Option<String>,
}

impl ReadOptions {
    pub fn with_expand(expand: impl Into<String>) -> Self {
        Self {
            expand: Some(expand.into()),
        }
    }
}

/// Options for `update`. The merge policy defaults to soft.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateOptions {
    pub expand: Option<String>,
    pub merge: MergePolicy,
}

impl UpdateOptions {
    pub fn merge(mut self, merge: MergePolicy) -> Self {
        self.merge = merge;
        self
    }

    pub fn expand(mut self, expand: impl Into<String>) -> Self {
        self.expand = Some(expand.into());
        self
    }
}

/// Options for `search`.
///
/// `page` is 1-based; zero or negative means the first page. A `limit` of
/// zero uses the configured default page size.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOptions {
    pub sort: Option<Sort>,
    pub page: i64,
    pub limit: u64,
    pub expand: Option<String>,
    /// Return the documents only and skip the count query.
    pub list_only: bool,
}

impl SearchOptions {
    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn page(mut self, page: i64) -> Self {
        self.page = page;
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    pub fn expand(mut self, expand: impl Into<String>) -> Self {
        self.expand = Some(expand.into());
        self
    }

    pub fn list_only(mut self) -> Self {
        self.list_only = true;
        self
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPage {
    pub page: u64,
    /// Total matches across all pages.
    pub count: u64,
    pub limit: u64,
    pub pages: u64,
    pub data: Vec<Document>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SearchResult {
    Page(SearchPage),
    /// Produced by `list_only` searches.
    List(Vec<Document>),
}

impl SearchResult {
    /// The documents on this page.
    pub fn data(&self) -> &[Document] {
        match self {
            Self::Page(page) => &page.data,
            Self::List(docs) => docs,
        }
    }

    pub fn into_data(self) -> Vec<Document> {
        match self {
            Self::Page(page) => page.data,
            Self::List(docs) => docs,
        }
    }

    pub fn as_page(&self) -> Option<&SearchPage> {
        match self {
            Self::Page(page) => Some(page),
            Self::List(_) => None,
        }
    }
}

/// The persisted document after an update, plus what changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateOutcome {
    pub document: Document,
    /// Fields whose value really changed, in update order.
    pub modified: Vec<String>,
    #[serde(rename = "changeLog")]
    pub change_log: ChangeLog,
}
