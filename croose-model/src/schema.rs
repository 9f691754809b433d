use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The shape of a single field within a document type.
///
/// Reference variants name the target document type; embedded variants carry
/// the field map of the embedded document. Nodes are built once when the
/// schema is registered and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SchemaNode {
    Scalar,
    Reference { target: String },
    ArrayOfScalar,
    ArrayOfReference { target: String },
    Embedded { schema: FieldMap },
    ArrayOfEmbedded { schema: FieldMap },
}

impl SchemaNode {
    /// Shorthand for a plain value field.
    pub fn scalar() -> Self {
        Self::Scalar
    }

    /// Shorthand for a single reference to another document type.
    pub fn reference(target: &str) -> Self {
        Self::Reference {
            target: target.into(),
        }
    }

    /// Shorthand for an array of plain values.
    pub fn scalar_array() -> Self {
        Self::ArrayOfScalar
    }

    /// Shorthand for an array of references to another document type.
    pub fn reference_array(target: &str) -> Self {
        Self::ArrayOfReference {
            target: target.into(),
        }
    }

    /// Shorthand for a single embedded document.
    pub fn embedded(schema: FieldMap) -> Self {
        Self::Embedded { schema }
    }

    /// Shorthand for an array of embedded documents.
    pub fn embedded_array(schema: FieldMap) -> Self {
        Self::ArrayOfEmbedded { schema }
    }

    /// Returns the target document type for reference fields.
    pub fn reference_target(&self) -> Option<&str> {
        match self {
            Self::Reference { target } | Self::ArrayOfReference { target } => Some(target),
            _ => None,
        }
    }

    /// Returns the nested field map for embedded fields.
    pub fn embedded_schema(&self) -> Option<&FieldMap> {
        match self {
            Self::Embedded { schema } | Self::ArrayOfEmbedded { schema } => Some(schema),
            _ => None,
        }
    }

    /// Whether values of this field are stored as arrays.
    pub fn is_array(&self) -> bool {
        matches!(
            self,
            Self::ArrayOfScalar | Self::ArrayOfReference { .. } | Self::ArrayOfEmbedded { .. }
        )
    }
}

/// Field name to shape lookup for one level of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMap(HashMap<String, SchemaNode>);

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: &str, node: SchemaNode) -> Self {
        self.0.insert(name.into(), node);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, node: SchemaNode) {
        self.0.insert(name.into(), node);
    }

    pub fn get(&self, name: &str) -> Option<&SchemaNode> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaNode)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Describes a document type's fields and where its references point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSchema {
    pub doc_type: String,
    pub fields: FieldMap,
}

impl DocumentSchema {
    pub fn new(doc_type: &str) -> Self {
        Self {
            doc_type: doc_type.into(),
            fields: FieldMap::new(),
        }
    }

    /// Builder-style field declaration.
    pub fn with_field(mut self, name: &str, node: SchemaNode) -> Self {
        self.fields.insert(name, node);
        self
    }

    pub fn field(&self, name: &str) -> Option<&SchemaNode> {
        self.fields.get(name)
    }

    /// Every reference in the schema as `(dotted field path, target type)`,
    /// descending into embedded documents.
    pub fn references(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        collect_references(&self.fields, "", &mut out);
        out.sort();
        out
    }
}

fn collect_references(fields: &FieldMap, prefix: &str, out: &mut Vec<(String, String)>) {
    for (name, node) in fields.iter() {
        let path = format!("{prefix}{name}");
        if let Some(target) = node.reference_target() {
            out.push((path, target.to_string()));
        } else if let Some(sub) = node.embedded_schema() {
            collect_references(sub, &format!("{path}."), out);
        }
    }
}
