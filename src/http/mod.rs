//! HTTP request pipeline subsystem.
//!
//! # Data Flow
//! ```text
//! RequestDescriptor
//!     → request.rs (resolve URL, build headers, request ID)
//!     → pipeline.rs (timeout, retry loop, 401 handling)
//!     → transport.rs (reqwest, or a test double)
//!     → response.rs (decode body / map error)
//!     → ResultEnvelope<T> | ApiError
//! ```

pub mod error;
pub mod pipeline;
pub mod request;
pub mod response;
pub mod transport;

pub use error::{ApiError, TransportError};
pub use pipeline::{PipelineConfig, RequestPipeline};
pub use request::{RequestDescriptor, RequestId, X_REQUEST_ID};
pub use response::ResultEnvelope;
pub use transport::{ReqwestTransport, Transport, TransportRequest, TransportResponse};
