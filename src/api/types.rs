//! Shared types for the API layer.

use std::sync::Arc;

use crate::artifacts::ModelArtifacts;

/// Shared context for all routes: the read-only model bundle.
#[derive(Clone)]
pub struct ApiContext {
    pub artifacts: Arc<ModelArtifacts>,
}

impl ApiContext {
    pub fn new(artifacts: Arc<ModelArtifacts>) -> Self {
        Self { artifacts }
    }
}

/// Per-request identifier, injected by the access-log middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(pub uuid::Uuid);
