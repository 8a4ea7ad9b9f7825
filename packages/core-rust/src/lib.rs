//! `seqalign` Core — schema-tagged wire models, manifest composition, and the
//! pairwise alignment engine.

pub mod align;
pub mod manifest;
pub mod models;
pub mod schema;

pub use align::{Compute, ComputeError, PairwiseAligner, MAX_SEQUENCE_LEN};
pub use manifest::{RestControllerDescriptor, ServiceDescriptor};
pub use models::{AlignedPath, AlignmentMode, AlignmentRequest, AlignmentResponse};
pub use schema::{derive_schema, SchemaDocument, SchemaError, SchemaTag, SchemaTagged};
