//! Service manifest composition.
//!
//! A deployable service is described by a [`ServiceDescriptor`] wrapping a
//! [`RestControllerDescriptor`]. The controller embeds the full derived
//! JSON Schema of the request and response models, so the platform can
//! validate payloads without ever loading the service's code. Deploy-time
//! fields (package and service URNs) are emitted as placeholders and
//! substituted by the packaging pipeline.

use schemars::JsonSchema;
use serde::Serialize;

use crate::schema::{derive_schema, SchemaDocument, SchemaError, SchemaTag, SchemaTagged};

/// Policy URN applied to services that do not declare their own.
pub const DEFAULT_POLICY: &str = "urn:sd.platform:policy.base.service";

/// Placeholder for the package URN, substituted at deploy time.
pub const PACKAGE_URN_PLACEHOLDER: &str = "#PACKAGE_URN#";

/// Placeholder for the service URN, substituted at deploy time.
pub const SERVICE_URN_PLACEHOLDER: &str = "#SERVICE_URN#";

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Deployment descriptor for a service exposed as a REST controller.
#[derive(Debug, Clone, Serialize)]
pub struct RestControllerDescriptor {
    #[serde(rename = "$schema")]
    schema: SchemaTag<RestControllerDescriptor>,
    /// Package implementing the service.
    package_urn: String,
    /// Command line used to start the service inside its container.
    command: Vec<String>,
    /// Port the service listens on.
    port: u16,
    /// GET path probed to decide whether the service is up and ready.
    ready_path: String,
    /// Derived JSON Schema of the request model.
    request: SchemaDocument,
    /// Derived JSON Schema of the response model.
    response: SchemaDocument,
}

impl SchemaTagged for RestControllerDescriptor {
    const SCHEMA_ID: &'static str = "urn:sd.platform:schema.service.rest.1";
}

impl RestControllerDescriptor {
    /// Builds a controller descriptor around a request/response model pair,
    /// deriving both schema documents.
    ///
    /// # Errors
    ///
    /// Fails when either model declares a blank schema identifier.
    pub fn for_models<Req, Resp>(
        command: Vec<String>,
        port: u16,
        ready_path: impl Into<String>,
    ) -> Result<Self, SchemaError>
    where
        Req: SchemaTagged + JsonSchema,
        Resp: SchemaTagged + JsonSchema,
    {
        Ok(Self {
            schema: SchemaTag::new(),
            package_urn: PACKAGE_URN_PLACEHOLDER.to_owned(),
            command,
            port,
            ready_path: ready_path.into(),
            request: derive_schema::<Req>()?,
            response: derive_schema::<Resp>()?,
        })
    }

    /// Replaces the package URN placeholder, for callers that already know
    /// the published package.
    #[must_use]
    pub fn with_package_urn(mut self, urn: impl Into<String>) -> Self {
        self.package_urn = urn.into();
        self
    }

    /// Schema identifier of this controller variant.
    #[must_use]
    pub fn schema_id(&self) -> &'static str {
        Self::SCHEMA_ID
    }

    /// The advertised listen port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The advertised readiness probe path.
    #[must_use]
    pub fn ready_path(&self) -> &str {
        &self.ready_path
    }

    /// The embedded request schema document.
    #[must_use]
    pub fn request_schema(&self) -> &SchemaDocument {
        &self.request
    }

    /// The embedded response schema document.
    #[must_use]
    pub fn response_schema(&self) -> &SchemaDocument {
        &self.response
    }
}

// ---------------------------------------------------------------------------
// Service descriptor
// ---------------------------------------------------------------------------

/// Top-level manifest describing one deployable service.
///
/// `controller_schema` always names the schema of the embedded controller.
/// The field is derived from the controller during composition and cannot be
/// supplied by callers, so descriptor and controller cannot disagree.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceDescriptor {
    #[serde(rename = "$schema")]
    schema: SchemaTag<ServiceDescriptor>,
    /// Service URN, substituted at deploy time.
    #[serde(rename = "$id")]
    id: String,
    /// Human-friendly name of the service.
    name: String,
    /// More detailed description of the service.
    description: String,
    /// Access policy applied to the service.
    policy: String,
    /// Schema identifier of the controller variant in use.
    controller_schema: String,
    /// The controller itself.
    controller: RestControllerDescriptor,
}

impl SchemaTagged for ServiceDescriptor {
    const SCHEMA_ID: &'static str = "urn:sd.platform:schema.service.2";
}

impl ServiceDescriptor {
    /// Composes the manifest for one service around its controller.
    #[must_use]
    pub fn compose(
        name: impl Into<String>,
        description: impl Into<String>,
        controller: RestControllerDescriptor,
    ) -> Self {
        Self {
            schema: SchemaTag::new(),
            id: SERVICE_URN_PLACEHOLDER.to_owned(),
            name: name.into(),
            description: description.into(),
            policy: DEFAULT_POLICY.to_owned(),
            controller_schema: controller.schema_id().to_owned(),
            controller,
        }
    }

    /// Replaces the default access policy.
    #[must_use]
    pub fn with_policy(mut self, policy: impl Into<String>) -> Self {
        self.policy = policy.into();
        self
    }

    /// Schema identifier of the embedded controller.
    #[must_use]
    pub fn controller_schema(&self) -> &str {
        &self.controller_schema
    }

    /// The embedded controller descriptor.
    #[must_use]
    pub fn controller(&self) -> &RestControllerDescriptor {
        &self.controller
    }

    /// Renders the manifest as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Propagates JSON rendering failures.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
