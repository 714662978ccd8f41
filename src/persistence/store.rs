//! The claim store port and its JSON implementation.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::estimate::Estimate;
use crate::model::{Claim, DamageAnnotation, ReviewTask, default_claims};
use crate::persistence::backend::KeyValueBackend;
use crate::persistence::error::StoreError;

/// Load/save contract between the engine and whatever keeps its records.
///
/// The engine only talks to storage through this trait, at its explicit
/// checkpoints (finishing an analysis, submitting an estimate). Loads
/// never fail: missing or unreadable data yields an empty sequence or the
/// documented default.
pub trait ClaimStore {
    /// All claims; the built-in claim list when none are stored.
    fn load_claims(&self) -> Vec<Claim>;

    fn save_claims(&mut self, claims: &[Claim]) -> Result<(), StoreError>;

    /// Annotations saved for a claim; empty when none are stored.
    fn load_annotations(&self, claim_id: &str) -> Vec<DamageAnnotation>;

    fn save_annotations(
        &mut self,
        claim_id: &str,
        annotations: &[DamageAnnotation],
    ) -> Result<(), StoreError>;

    /// The agent's task list; empty when none are stored.
    fn load_tasks(&self) -> Vec<ReviewTask>;

    fn save_tasks(&mut self, tasks: &[ReviewTask]) -> Result<(), StoreError>;

    /// The last submitted estimate for a claim.
    fn load_estimate(&self, claim_id: &str) -> Option<Estimate>;

    fn save_estimate(&mut self, claim_id: &str, estimate: &Estimate) -> Result<(), StoreError>;

    /// Append a task, giving it the next free id. Returns that id.
    fn append_task(&mut self, mut task: ReviewTask) -> Result<u64, StoreError> {
        let mut tasks = self.load_tasks();
        task.id = tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        let id = task.id;
        tasks.push(task);
        self.save_tasks(&tasks)?;
        Ok(id)
    }
}

const CLAIMS_KEY: &str = "claims";
const TASKS_KEY: &str = "tasks";

fn annotations_key(claim_id: &str) -> String {
    format!("annotations/{}", claim_id)
}

fn estimate_key(claim_id: &str) -> String {
    format!("estimate/{}", claim_id)
}

/// [`ClaimStore`] writing JSON documents to a key-value backend.
#[derive(Debug, Clone, Default)]
pub struct JsonClaimStore<B> {
    backend: B,
}

impl<B: KeyValueBackend> JsonClaimStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Read and parse a record. Missing, unreadable or corrupt records are
    /// logged and reported as `None`.
    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let json = match self.backend.get(key) {
            Ok(Some(json)) => json,
            Ok(None) => {
                log::debug!("No stored record for '{}'", key);
                return None;
            }
            Err(e) => {
                log::warn!("Failed to read '{}': {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Ignoring corrupt record '{}': {}", key, e);
                None
            }
        }
    }

    fn write<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value)?;
        self.backend.set(key, &json)?;
        log::debug!("Saved '{}' ({} bytes)", key, json.len());
        Ok(())
    }
}

impl<B: KeyValueBackend> ClaimStore for JsonClaimStore<B> {
    fn load_claims(&self) -> Vec<Claim> {
        self.read(CLAIMS_KEY).unwrap_or_else(default_claims)
    }

    fn save_claims(&mut self, claims: &[Claim]) -> Result<(), StoreError> {
        self.write(CLAIMS_KEY, claims)
    }

    fn load_annotations(&self, claim_id: &str) -> Vec<DamageAnnotation> {
        self.read(&annotations_key(claim_id)).unwrap_or_default()
    }

    fn save_annotations(
        &mut self,
        claim_id: &str,
        annotations: &[DamageAnnotation],
    ) -> Result<(), StoreError> {
        self.write(&annotations_key(claim_id), annotations)
    }

    fn load_tasks(&self) -> Vec<ReviewTask> {
        self.read(TASKS_KEY).unwrap_or_default()
    }

    fn save_tasks(&mut self, tasks: &[ReviewTask]) -> Result<(), StoreError> {
        self.write(TASKS_KEY, tasks)
    }

    fn load_estimate(&self, claim_id: &str) -> Option<Estimate> {
        self.read(&estimate_key(claim_id))
    }

    fn save_estimate(&mut self, claim_id: &str, estimate: &Estimate) -> Result<(), StoreError> {
        self.write(&estimate_key(claim_id), estimate)
    }
}
