//! The expansion planner: a recursive walk of the request tree against the
//! schema graph.

use crate::cache::{PlanCache, PlanKey};
use crate::error::{ExpandError, ExpandResult};
use crate::plan::{ExpansionPlan, PlanEntry};
use crate::request::{ExpansionRequest, PathNode, PathTree};
use croose_model::{FieldMap, SchemaNode, SchemaRegistry};
use std::sync::Arc;
use tracing::debug;

/// Compiles expansion requests into plans, memoizing by request string.
#[derive(Debug)]
pub struct ExpansionPlanner {
    registry: Arc<SchemaRegistry>,
    cache: PlanCache,
}

/// Accumulator for one walk.
struct Walk<'r> {
    registry: &'r SchemaRegistry,
    dropped: Vec<String>,
}

impl ExpansionPlanner {
    /// Creates a planner with its own plan cache of `cache_capacity` entries.
    pub fn new(registry: Arc<SchemaRegistry>, cache_capacity: usize) -> Self {
        Self::with_cache(registry, PlanCache::new(cache_capacity))
    }

    /// Creates a planner around an existing cache.
    pub fn with_cache(registry: Arc<SchemaRegistry>, cache: PlanCache) -> Self {
        Self { registry, cache }
    }

    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    pub fn cache(&self) -> &PlanCache {
        &self.cache
    }

    /// Returns the plan for `raw_request` against `doc_type`, compiling and
    /// caching it on first use.
    ///
    /// Errors are never cached: a request that fails keeps failing until the
    /// registry is fixed, and is recompiled each time.
    pub fn plan(&self, doc_type: &str, raw_request: &str) -> ExpandResult<Arc<ExpansionPlan>> {
        let key = PlanKey::new(doc_type, raw_request);
        if let Some(plan) = self.cache.get(&key) {
            debug!("Plan cache hit for {}", key);
            return Ok(plan);
        }

        let plan = Arc::new(self.compile(doc_type, raw_request)?);
        debug!(
            "Plan cache miss for {}: compiled {} entries, dropped {:?}",
            key,
            plan.entries().len(),
            plan.dropped()
        );
        Ok(self.cache.insert_if_absent(key, plan))
    }

    /// Compiles a plan without consulting or filling the cache.
    pub fn compile(&self, doc_type: &str, raw_request: &str) -> ExpandResult<ExpansionPlan> {
        let root = self
            .registry
            .get(doc_type)
            .ok_or_else(|| ExpandError::UnknownType(doc_type.to_string()))?;
        let request = ExpansionRequest::parse(raw_request);

        let mut walk = Walk {
            registry: &self.registry,
            dropped: Vec::new(),
        };
        let mut entries = Vec::new();
        walk.level(request.tree(), &root.fields, "", "", &mut entries)?;
        Ok(ExpansionPlan::new(entries, walk.dropped))
    }
}

impl Walk<'_> {
    /// Plans one level of the request tree against `fields`.
    ///
    /// `prefix` qualifies entry paths while descending through embedded
    /// documents (it is reset at each reference hop); `origin` is the full
    /// request path so far, used only to report dropped branches.
    fn level(
        &mut self,
        tree: &PathTree,
        fields: &FieldMap,
        prefix: &str,
        origin: &str,
        entries: &mut Vec<PlanEntry>,
    ) -> ExpandResult<()> {
        let registry = self.registry;
        for (segment, next) in tree.iter() {
            let path = format!("{prefix}{segment}");
            let full = if origin.is_empty() {
                segment.to_string()
            } else {
                format!("{origin}.{segment}")
            };

            match fields.get(segment) {
                Some(SchemaNode::Reference { target } | SchemaNode::ArrayOfReference { target }) => {
                    let target_schema = registry.get(target).ok_or_else(|| {
                        ExpandError::UnknownTargetType {
                            path: full.clone(),
                            target: target.clone(),
                        }
                    })?;
                    let entry = match next {
                        PathNode::Leaf => PlanEntry::leaf(path, target.as_str()),
                        PathNode::Branch(sub) => {
                            let mut children = Vec::new();
                            self.level(sub, &target_schema.fields, "", &full, &mut children)?;
                            PlanEntry::with_children(path, target.as_str(), children)
                        }
                    };
                    entries.push(entry);
                }
                Some(SchemaNode::Embedded { schema } | SchemaNode::ArrayOfEmbedded { schema }) => {
                    match next {
                        PathNode::Branch(sub) => {
                            let prefix = format!("{path}.");
                            self.level(sub, schema, &prefix, &full, entries)?;
                        }
                        // Nothing to resolve on the embedded document itself.
                        PathNode::Leaf => self.dropped.push(full),
                    }
                }
                Some(SchemaNode::Scalar | SchemaNode::ArrayOfScalar) | None => {
                    self.dropped.push(full);
                }
            }
        }
        Ok(())
    }
}
