use crate::error::{ModelError, ModelResult};
use crate::schema::{DocumentSchema, SchemaNode};
use std::collections::HashMap;

/// Catalogue of document schemas, populated once at startup.
///
/// The registry is read-only after construction; share it behind an `Arc`.
/// Call [`SchemaRegistry::validate`] once all types are registered so that a
/// dangling reference target fails at startup instead of mid-request.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, DocumentSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds and validates a registry from a set of schemas.
    pub fn from_schemas(schemas: impl IntoIterator<Item = DocumentSchema>) -> ModelResult<Self> {
        let mut registry = Self::new();
        for schema in schemas {
            registry.register(schema)?;
        }
        registry.validate()?;
        Ok(registry)
    }

    /// Registers a schema. Each document type may be registered once.
    pub fn register(&mut self, schema: DocumentSchema) -> ModelResult<()> {
        if self.schemas.contains_key(&schema.doc_type) {
            return Err(ModelError::DuplicateType(schema.doc_type));
        }
        self.schemas.insert(schema.doc_type.clone(), schema);
        Ok(())
    }

    pub fn get(&self, doc_type: &str) -> Option<&DocumentSchema> {
        self.schemas.get(doc_type)
    }

    /// Like [`get`](Self::get), but an absent type is an error.
    pub fn require(&self, doc_type: &str) -> ModelResult<&DocumentSchema> {
        self.get(doc_type)
            .ok_or_else(|| ModelError::UnknownType(doc_type.to_string()))
    }

    pub fn contains(&self, doc_type: &str) -> bool {
        self.schemas.contains_key(doc_type)
    }

    /// Registered document type names, sorted.
    pub fn doc_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Checks that every reference (at any embedding depth) targets a
    /// registered type.
    pub fn validate(&self) -> ModelResult<()> {
        for schema in self.schemas.values() {
            for (field, target) in schema.references() {
                if !self.contains(&target) {
                    return Err(ModelError::UnresolvedReference {
                        doc_type: schema.doc_type.clone(),
                        field,
                        target,
                    });
                }
            }
        }
        Ok(())
    }

    /// Looks up the schema node for a field of a registered type.
    pub fn field(&self, doc_type: &str, field: &str) -> Option<&SchemaNode> {
        self.get(doc_type).and_then(|s| s.field(field))
    }
}
