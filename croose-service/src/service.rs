//! The document service: CRUD over a [`DocumentStore`] with an optional
//! cache-aside [`DocumentCache`].

use crate::config::ServiceConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::options::{ReadOptions, SearchOptions, SearchPage, SearchResult, UpdateOptions, UpdateOutcome};
use croose_expand::ExpansionPlanner;
use croose_model::{Document, DocumentId, Fields, Filter, SchemaRegistry};
use croose_mutation::apply_update;
use croose_storage::{DocumentCache, DocumentStore, FindOptions, cache_key};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Keys the service owns; callers cannot write them through field data.
const RESERVED_FIELDS: [&str; 4] = ["_id", "_type", "createdAt", "updatedAt"];

/// CRUD, search and change-tracked updates for every registered type.
pub struct DocumentService {
    registry: Arc<SchemaRegistry>,
    planner: ExpansionPlanner,
    store: Arc<dyn DocumentStore>,
    cache: Option<Arc<dyn DocumentCache>>,
    config: ServiceConfig,
}

impl DocumentService {
    /// Creates a service without a cache. The registry must already hold
    /// every type that will be read or expanded.
    pub fn new(registry: Arc<SchemaRegistry>, store: Arc<dyn DocumentStore>, config: ServiceConfig) -> Self {
        let planner = ExpansionPlanner::new(Arc::clone(&registry), config.plan_cache_capacity);
        Self {
            registry,
            planner,
            store,
            cache: None,
            config,
        }
    }

    /// Sets the cache collaborator. It is only used when
    /// [`ServiceConfig::cache_enabled`] is set.
    pub fn set_cache(&mut self, cache: Arc<dyn DocumentCache>) {
        if !self.config.cache_enabled {
            debug!("Cache attached but disabled by configuration");
        }
        self.cache = Some(cache);
    }

    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    /// The planner, for plan-cache statistics.
    pub fn planner(&self) -> &ExpansionPlanner {
        &self.planner
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Whether reads and writes go through the cache.
    pub fn cache_active(&self) -> bool {
        self.active_cache().is_some()
    }

    fn active_cache(&self) -> Option<&Arc<dyn DocumentCache>> {
        self.cache.as_ref().filter(|_| self.config.cache_enabled)
    }

    // ── Create / read ────────────────────────────────────────────

    /// Stores a new document built from `data`.
    ///
    /// A string `_id` in `data` becomes the document id; otherwise a fresh
    /// time-ordered id is generated. The other reserved keys are ignored.
    pub async fn create(&self, doc_type: &str, mut data: Fields, options: &ReadOptions) -> ServiceResult<Document> {
        self.registry.require(doc_type)?;

        let id = match data.remove("_id") {
            Some(Value::String(raw)) => {
                let id = DocumentId::parse(&raw)?;
                if self.store.find_one(doc_type, &Filter::by_id(&id)).await?.is_some() {
                    return Err(ServiceError::AlreadyExists(cache_key(doc_type, &id)));
                }
                id
            }
            Some(other) => return Err(croose_types::Error::InvalidId(other.to_string()).into()),
            None => DocumentId::new(),
        };
        strip_reserved(&mut data);

        let doc = self.store.save(Document::new(doc_type, id, data)).await?;
        debug!("Created {}:{}", doc_type, doc.id);

        self.cache_store(&doc).await?;
        self.expand(doc_type, doc, options.expand.as_deref()).await
    }

    /// Loads a document by id, through the cache when one is active.
    pub async fn read(&self, doc_type: &str, id: &DocumentId, options: &ReadOptions) -> ServiceResult<Option<Document>> {
        self.registry.require(doc_type)?;

        let doc = match self.active_cache() {
            Some(cache) => self.read_through(&**cache, doc_type, id).await?,
            None => self.store.find_one(doc_type, &Filter::by_id(id)).await?,
        };
        match doc {
            Some(doc) => Ok(Some(self.expand(doc_type, doc, options.expand.as_deref()).await?)),
            None => Ok(None),
        }
    }

    /// Cache-aside lookup. A miss or an entry that fails to deserialize
    /// falls back to the store and rewrites the entry.
    async fn read_through(
        &self,
        cache: &dyn DocumentCache,
        doc_type: &str,
        id: &DocumentId,
    ) -> ServiceResult<Option<Document>> {
        let key = cache_key(doc_type, id);
        match cache.get(&key).await? {
            Some(raw) => match serde_json::from_str::<Document>(&raw) {
                Ok(doc) => return Ok(Some(doc)),
                Err(e) => warn!("Repairing cache entry {}: {}", key, e),
            },
            None => debug!("Cache miss for {}", key),
        }

        let doc = self.store.find_one(doc_type, &Filter::by_id(id)).await?;
        if let Some(doc) = &doc {
            cache.set(&key, serde_json::to_string(doc)?).await?;
        }
        Ok(doc)
    }

    // ── Update ───────────────────────────────────────────────────

    /// Merges `update` into the first document matching `filter`.
    ///
    /// Returns `None` when nothing matches. The outcome lists the fields that
    /// really changed and how; see [`apply_update`] for the merge rules.
    /// The read, the write and the cache refresh are not atomic: a
    /// concurrent update between them is overwritten.
    pub async fn update(
        &self,
        doc_type: &str,
        filter: &Filter,
        mut update: Fields,
        options: &UpdateOptions,
    ) -> ServiceResult<Option<UpdateOutcome>> {
        self.registry.require(doc_type)?;

        let Some(mut doc) = self.store.find_one(doc_type, filter).await? else {
            debug!("Update on {} matched nothing", doc_type);
            return Ok(None);
        };
        strip_reserved(&mut update);

        let snapshot = doc.snapshot();
        let outcome = apply_update(&snapshot, &update, &options.merge);

        let saved = if outcome.merged == *snapshot.fields() {
            doc
        } else {
            doc.fields = outcome.merged;
            let saved = self.store.save(doc).await?;
            debug!("Updated {}:{} ({:?})", doc_type, saved.id, outcome.modified);
            self.cache_store(&saved).await?;
            saved
        };

        let document = self.expand(doc_type, saved, options.expand.as_deref()).await?;
        Ok(Some(UpdateOutcome {
            document,
            modified: outcome.modified,
            change_log: outcome.change_log,
        }))
    }

    // ── Delete ───────────────────────────────────────────────────

    /// Deletes the first document matching `filter`; returns whether one
    /// was found.
    pub async fn delete(&self, doc_type: &str, filter: &Filter) -> ServiceResult<bool> {
        self.registry.require(doc_type)?;

        let Some(doc) = self.store.find_one(doc_type, filter).await? else {
            return Ok(false);
        };
        let deleted = self.store.delete_one(doc_type, &Filter::by_id(&doc.id)).await?;
        if deleted {
            debug!("Deleted {}:{}", doc_type, doc.id);
            if let Some(cache) = self.active_cache() {
                cache.delete(&cache_key(doc_type, &doc.id)).await?;
            }
        }
        Ok(deleted)
    }

    /// Deletes every matching document and returns how many went.
    ///
    /// With an active cache the matching ids are collected first so their
    /// entries can be dropped in one call afterwards.
    pub async fn delete_many(&self, doc_type: &str, filter: &Filter) -> ServiceResult<u64> {
        self.registry.require(doc_type)?;

        let cache = self.active_cache();
        let ids = match cache {
            Some(_) => self.store.find_ids(doc_type, filter).await?,
            None => Vec::new(),
        };

        let deleted = self.store.delete_many(doc_type, filter).await?;
        debug!("Deleted {} {} documents", deleted, doc_type);

        if let Some(cache) = cache
            && deleted > 0
        {
            let keys: Vec<String> = ids.iter().map(|id| cache_key(doc_type, id)).collect();
            cache.delete_many(&keys).await?;
        }
        Ok(deleted)
    }

    // ── Queries ──────────────────────────────────────────────────

    pub async fn count(&self, doc_type: &str, filter: &Filter) -> ServiceResult<u64> {
        self.registry.require(doc_type)?;
        Ok(self.store.count(doc_type, filter).await?)
    }

    /// Returns one page of documents matching `filter`.
    ///
    /// Sorting uses locale-aware collation. `pages` is the total match count
    /// divided by the page size, rounded up.
    pub async fn search(&self, doc_type: &str, filter: &Filter, options: &SearchOptions) -> ServiceResult<SearchResult> {
        self.registry.require(doc_type)?;

        let page = options.page.max(1) as u64;
        let limit = if options.limit == 0 {
            self.config.page_size()
        } else {
            options.limit
        };
        let find = FindOptions {
            filter: filter.clone(),
            sort: options.sort.clone(),
            skip: limit.saturating_mul(page - 1),
            limit: Some(limit),
        };

        let mut docs = self.store.find(doc_type, &find).await?;
        if let Some(raw) = options.expand.as_deref() {
            let plan = self.planner.plan(doc_type, raw)?;
            if !plan.is_empty() {
                let mut expanded = Vec::with_capacity(docs.len());
                for doc in docs {
                    expanded.push(self.store.populate(doc, &plan).await?);
                }
                docs = expanded;
            }
        }

        if options.list_only {
            return Ok(SearchResult::List(docs));
        }

        let count = self.store.count(doc_type, filter).await?;
        Ok(SearchResult::Page(SearchPage {
            page,
            count,
            limit,
            pages: count.div_ceil(limit),
            data: docs,
        }))
    }

    // ── Helpers ──────────────────────────────────────────────────

    async fn expand(&self, doc_type: &str, doc: Document, raw: Option<&str>) -> ServiceResult<Document> {
        let Some(raw) = raw else {
            return Ok(doc);
        };
        let plan = self.planner.plan(doc_type, raw)?;
        if plan.is_empty() {
            return Ok(doc);
        }
        Ok(self.store.populate(doc, &plan).await?)
    }

    /// Writes the unexpanded document to the cache, if one is active.
    async fn cache_store(&self, doc: &Document) -> ServiceResult<()> {
        if let Some(cache) = self.active_cache() {
            let key = cache_key(&doc.doc_type, &doc.id);
            cache.set(&key, serde_json::to_string(doc)?).await?;
        }
        Ok(())
    }
}

fn strip_reserved(fields: &mut Fields) {
    for key in RESERVED_FIELDS {
        if fields.remove(key).is_some() {
            debug!("Ignoring reserved field {}", key);
        }
    }
}
