//! Authentication state.
//!
//! # Data Flow
//! ```text
//! session.rs (OTP login) → storage.rs (token + profile)
//! RequestPipeline reads the token on every authenticated request
//! RequestPipeline on 401 → storage.rs cleared → events.rs Unauthorized
//! ```
//!
//! # Design Decisions
//! - Storage is a trait so tests use an in-memory store
//! - The unauthorized notification is an explicit channel handed to the
//!   pipeline, not ambient global dispatch

pub mod events;
pub mod session;
pub mod storage;

pub use events::{AuthEvent, AuthEvents};
pub use session::{LoginError, LoginFlow, LoginStep};
pub use storage::{CredentialStore, FileStore, MemoryStore, StorageError, UserProfile};
