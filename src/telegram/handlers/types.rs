//! Handler types and dependencies

use std::sync::Arc;

use crate::download::pipeline::RequestPipeline;
use crate::telegram::transport::ChatTransport;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub pipeline: Arc<RequestPipeline>,
    pub transport: Arc<dyn ChatTransport>,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(pipeline: Arc<RequestPipeline>, transport: Arc<dyn ChatTransport>) -> Self {
        Self { pipeline, transport }
    }
}
