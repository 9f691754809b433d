use crate::error::StorageResult;
use crate::resolve;
use async_trait::async_trait;
use croose_expand::ExpansionPlan;
use croose_model::{Document, DocumentId, Filter, Sort};

/// Query shape for [`DocumentStore::find`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    pub filter: Filter,
    pub sort: Option<Sort>,
    pub skip: u64,
    /// `None` returns every match after `skip`.
    pub limit: Option<u64>,
}

impl FindOptions {
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Persistence backend for documents, partitioned by document type.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns the first document of `doc_type` matching `filter`.
    async fn find_one(&self, doc_type: &str, filter: &Filter) -> StorageResult<Option<Document>>;

    /// Returns matching documents, sorted with locale-aware collation when a
    /// sort is given, then skipped and limited.
    async fn find(&self, doc_type: &str, options: &FindOptions) -> StorageResult<Vec<Document>>;

    async fn count(&self, doc_type: &str, filter: &Filter) -> StorageResult<u64>;

    /// Ids of every matching document.
    async fn find_ids(&self, doc_type: &str, filter: &Filter) -> StorageResult<Vec<DocumentId>> {
        let docs = self.find(doc_type, &FindOptions::new(filter.clone())).await?;
        Ok(docs.into_iter().map(|doc| doc.id).collect())
    }

    /// Inserts or replaces a document and returns it as persisted, with
    /// `created_at`/`updated_at` stamped.
    async fn save(&self, doc: Document) -> StorageResult<Document>;

    /// Deletes the first match; returns whether one was deleted.
    async fn delete_one(&self, doc_type: &str, filter: &Filter) -> StorageResult<bool>;

    /// Deletes every match; returns how many were deleted.
    async fn delete_many(&self, doc_type: &str, filter: &Filter) -> StorageResult<u64>;

    /// Resolves the references named by `plan` inside `doc`.
    ///
    /// The provided implementation loads each referenced document with
    /// [`find_one`](Self::find_one). Ids that no longer resolve are dropped
    /// from arrays; a dangling single reference becomes `null`.
    async fn populate(&self, doc: Document, plan: &ExpansionPlan) -> StorageResult<Document> {
        resolve::populate_entries(self, doc, plan.entries()).await
    }
}
