//! RagChat engine: backend HTTP client and effect execution.
mod client;
mod engine;
mod error;
mod persist;
mod types;

pub use client::{BackendClient, ClientSettings, ReqwestBackendClient};
pub use engine::EngineHandle;
pub use error::BackendError;
pub use persist::{AtomicFileWriter, PersistError};
pub use types::{Answer, BackendReply, BackendRequest, EngineEvent, UploadFile};
