//! Wire models for the alignment service.
//!
//! Requests and responses are schema-tagged: the reserved `$schema` field on
//! the wire always carries the model's declared identifier, and the derived
//! JSON Schema of each model is what the service manifest advertises.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::schema::{SchemaTag, SchemaTagged};

/// Alignment strategy selector. Lowercase on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AlignmentMode {
    Global,
    #[default]
    Local,
    Fogsaa,
}

/// Request for aligning two sequences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AlignmentRequest {
    #[serde(rename = "$schema", default)]
    pub schema: SchemaTag<AlignmentRequest>,
    /// The target sequence as a string.
    #[schemars(example = "example_target")]
    pub target: String,
    /// The query sequence to align against the target.
    #[schemars(example = "example_query")]
    pub query: String,
    /// Alignment strategy to apply over the two sequences.
    #[serde(default)]
    pub mode: AlignmentMode,
    /// Score contributed by every pair of matching residues.
    #[serde(default = "default_match_score")]
    pub match_score: f64,
    /// Score contributed by every pair of mismatching residues.
    #[serde(default)]
    pub mismatch_score: f64,
}

impl SchemaTagged for AlignmentRequest {
    const SCHEMA_ID: &'static str = "urn:sd.seqalign:schema.request.1";
}

fn default_match_score() -> f64 {
    1.0
}

fn example_target() -> &'static str {
    "GAACT"
}

fn example_query() -> &'static str {
    "GAT"
}

/// Coordinates of one pairwise alignment as `[target_blocks, query_blocks]`.
///
/// Each block is a half-open `[start, end)` run of residues that aligned
/// without gaps; the n-th target block pairs with the n-th query block.
pub type AlignedPath = [Vec<[u32; 2]>; 2];

/// Result of aligning two sequences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AlignmentResponse {
    #[serde(rename = "$schema", default)]
    pub schema: SchemaTag<AlignmentResponse>,
    /// The target sequence as a string.
    pub target: String,
    /// The query sequence that was aligned against the target.
    pub query: String,
    /// Aligned block coordinates, one entry per reported alignment.
    pub alignments: Vec<AlignedPath>,
    /// Score of the reported alignment.
    pub score: f64,
}

impl SchemaTagged for AlignmentResponse {
    const SCHEMA_ID: &'static str = "urn:sd.seqalign:schema.response.1";
}
