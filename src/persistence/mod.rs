//! Persistence boundary for claims, annotations, estimates and tasks.
//!
//! The engine never reaches for ambient storage. Callers pass a
//! [`ClaimStore`] into the checkpoints that persist data, which makes an
//! in-memory store a drop-in replacement in tests.
//!
//! ## Backends
//!
//! - [`MemoryBackend`]: a `HashMap`, for tests and throwaway sessions
//! - [`FileBackend`]: one JSON file per key in a directory (native)
//! - `LocalStorageBackend`: browser localStorage (WASM)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use claimscope::persistence::{ClaimStore, JsonClaimStore, MemoryBackend};
//!
//! let mut store = JsonClaimStore::new(MemoryBackend::new());
//! let claims = store.load_claims(); // built-in claims on first run
//! ```

mod backend;
mod error;
#[cfg(target_arch = "wasm32")]
mod local_storage;
mod store;

#[cfg(not(target_arch = "wasm32"))]
pub use backend::FileBackend;
pub use backend::{KeyValueBackend, MemoryBackend};
pub use error::StoreError;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageBackend;
pub use store::{ClaimStore, JsonClaimStore};
