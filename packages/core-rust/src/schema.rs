//! Schema tagging and JSON Schema derivation for wire models.
//!
//! Every model that crosses the service boundary carries a stable schema
//! identifier (a URN). The identifier shows up in two places with different
//! shapes:
//!
//! - serialized **instances** carry it as a reserved `$schema` field, and
//! - the **derived schema** of the model carries it as `$id`, while the
//!   reserved field itself is stripped from `properties` (it describes the
//!   schema, not the payload).
//!
//! Derivation is delegated to `schemars`: field declarations, doc comments,
//! defaults, and examples map to schema fragments at compile time instead of
//! being discovered by reflection at run time.

use std::marker::PhantomData;

use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Meta-schema URI stamped onto every derived schema document.
pub const META_SCHEMA: &str = "https://json-schema.org/draft/2020-12/schema";

/// Reserved field carrying the schema identifier on serialized instances.
pub const TAG_FIELD: &str = "$schema";

/// Errors raised while deriving a schema document from a model type.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The model type declares a blank schema identifier.
    #[error("model `{model}` declares no schema identifier")]
    MissingSchemaIdentifier {
        /// Type name of the offending model.
        model: &'static str,
    },
    /// The generated schema could not be rendered as JSON.
    #[error("failed to render derived schema: {0}")]
    Render(#[from] serde_json::Error),
}

/// A data model with a declared, constant schema identifier.
///
/// Implementors pair this with `#[derive(JsonSchema)]` and embed a
/// [`SchemaTag`] field so serialized instances carry the identifier.
/// A blank `SCHEMA_ID` is a declaration error, caught when the schema is
/// derived (manifest generation), not at request time.
pub trait SchemaTagged {
    /// Stable identifier for the model's shape, e.g.
    /// `urn:sd.seqalign:schema.request.1`.
    const SCHEMA_ID: &'static str;

    /// Optional long-form description used when the model itself carries no
    /// doc comment.
    const DESCRIPTION: Option<&'static str> = None;
}

// ---------------------------------------------------------------------------
// SchemaTag
// ---------------------------------------------------------------------------

/// Zero-sized field that serializes as its model's schema identifier.
///
/// Embedding `SchemaTag<Self>` under `#[serde(rename = "$schema", default)]`
/// guarantees every serialized instance carries the declared identifier; the
/// tag is a type-level constant, so instance and declaration cannot diverge.
/// Inbound values are advisory and ignored on deserialization, matching the
/// tag-is-set-by-the-model contract.
pub struct SchemaTag<T>(PhantomData<fn() -> T>);

impl<T> SchemaTag<T> {
    /// Creates the tag. Equivalent to `SchemaTag::default()`.
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for SchemaTag<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for SchemaTag<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SchemaTag<T> {}

impl<T: SchemaTagged> std::fmt::Debug for SchemaTag<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(T::SCHEMA_ID)
    }
}

impl<T> PartialEq for SchemaTag<T> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<T> Eq for SchemaTag<T> {}

impl<T: SchemaTagged> Serialize for SchemaTag<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(T::SCHEMA_ID)
    }
}

impl<'de, T: SchemaTagged> Deserialize<'de> for SchemaTag<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Accept a string or null; the declared constant wins either way.
        let _ = Option::<String>::deserialize(deserializer)?;
        Ok(Self::new())
    }
}

impl<T: SchemaTagged> JsonSchema for SchemaTag<T> {
    fn schema_name() -> String {
        "SchemaTag".to_owned()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        gen.subschema_for::<String>()
    }

    fn is_referenceable() -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// Schema derivation
// ---------------------------------------------------------------------------

/// A derived JSON Schema document, ready for embedding in a manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaDocument(Value);

impl SchemaDocument {
    /// The `$id` of the document, i.e. the model's schema identifier.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.0.get("$id").and_then(Value::as_str)
    }

    /// The `properties` map of the document, if present.
    #[must_use]
    pub fn properties(&self) -> Option<&serde_json::Map<String, Value>> {
        self.0.get("properties").and_then(Value::as_object)
    }

    /// Borrows the raw JSON document.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consumes the document, yielding the raw JSON.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }
}

/// Derives the JSON Schema document for a tagged model type.
///
/// The generated schema is stamped with the draft 2020-12 meta-schema URI
/// and the model's identifier as `$id`. The reserved `$schema` tag field is
/// removed from `properties` and `required`: it is present on serialized
/// instances but is metadata about the schema, not a payload field.
///
/// # Errors
///
/// Returns [`SchemaError::MissingSchemaIdentifier`] when the model declares
/// a blank `SCHEMA_ID`.
pub fn derive_schema<T>() -> Result<SchemaDocument, SchemaError>
where
    T: SchemaTagged + JsonSchema,
{
    if T::SCHEMA_ID.trim().is_empty() {
        return Err(SchemaError::MissingSchemaIdentifier {
            model: std::any::type_name::<T>(),
        });
    }

    let mut root = SchemaGenerator::default().into_root_schema_for::<T>();
    root.meta_schema = Some(META_SCHEMA.to_owned());

    let metadata = root.schema.metadata();
    metadata.id = Some(T::SCHEMA_ID.to_owned());
    if metadata.description.is_none() {
        // The generator already takes doc comments; the declared constant is
        // the fallback for models without one.
        metadata.description = T::DESCRIPTION.map(str::to_owned);
    }

    let object = root.schema.object();
    object.properties.remove(TAG_FIELD);
    object.required.remove(TAG_FIELD);

    Ok(SchemaDocument(serde_json::to_value(root)?))
}
