// Document generation: the orchestrator shared by the CLI and the HTTP API,
// plus the Axum handlers that expose it.

pub mod generator;
pub mod handlers;

pub use generator::{BothDocumentsResponse, GenerationRequest, GenerationResponse, Generator};
