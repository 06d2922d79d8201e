//! Append-only, hash-chained audit trail.
//!
//! Every mutating operation on cases, evidence, users and organizations
//! records an entry. Entries are JSON lines; each carries the SHA-256 hash
//! of the previous entry, so truncation or in-place edits of the file break
//! the chain and are caught by [`AuditTrail::verify_chain`].

pub mod error;

use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

pub use error::{AuditError, Result};

const GENESIS_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// Outcome of the audited operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    Success,
    Denied,
    Failed,
}

/// A single entry in the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// Acting user; `None` for system-initiated entries.
    pub actor_id: Option<Uuid>,
    /// Verb, e.g. "CREATE", "UPDATE", "DELETE", "ASSIGN", "UNASSIGN".
    pub action: String,
    /// Record kind, e.g. "Case", "Evidence", "User", "Organization".
    pub resource_type: String,
    pub resource_id: Option<Uuid>,
    pub details: Option<serde_json::Value>,
    pub outcome: AuditOutcome,
    pub previous_hash: String,
    pub entry_hash: String,
}

impl AuditEntry {
    fn new(
        actor_id: Option<Uuid>,
        action: &str,
        resource_type: &str,
        resource_id: Option<Uuid>,
        details: Option<serde_json::Value>,
        outcome: AuditOutcome,
        previous_hash: String,
    ) -> Self {
        let mut entry = Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            actor_id,
            action: action.to_string(),
            resource_type: resource_type.to_string(),
            resource_id,
            details,
            outcome,
            previous_hash,
            entry_hash: String::new(),
        };
        entry.entry_hash = entry.calculate_hash();
        entry
    }

    /// SHA-256 over every field except the entry hash itself.
    fn calculate_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.id.as_bytes());
        hasher.update(self.timestamp.to_rfc3339().as_bytes());
        if let Some(actor) = self.actor_id {
            hasher.update(actor.as_bytes());
        }
        hasher.update(self.action.as_bytes());
        hasher.update(self.resource_type.as_bytes());
        if let Some(resource) = self.resource_id {
            hasher.update(resource.as_bytes());
        }
        if let Some(ref details) = self.details {
            hasher.update(details.to_string().as_bytes());
        }
        hasher.update(format!("{:?}", self.outcome).as_bytes());
        hasher.update(self.previous_hash.as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn verify_hash(&self) -> bool {
        self.entry_hash == self.calculate_hash()
    }
}

/// Configuration for the audit trail file.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    pub trail_path: PathBuf,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            trail_path: PathBuf::from("data/audit/trail.jsonl"),
        }
    }
}

/// The audit trail writer.
///
/// A single mutex serializes appends so the previous-hash link and the file
/// write stay consistent with each other.
pub struct AuditTrail {
    config: AuditConfig,
    chain: Mutex<String>,
}

impl AuditTrail {
    pub fn new(config: AuditConfig) -> Result<Self> {
        if let Some(parent) = config.trail_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let last_hash = if config.trail_path.exists() {
            Self::last_hash_in(&config.trail_path)?
        } else {
            GENESIS_HASH.to_string()
        };
        Ok(Self {
            config,
            chain: Mutex::new(last_hash),
        })
    }

    /// Append an entry for a performed (or refused) operation.
    pub async fn record(
        &self,
        actor_id: Option<Uuid>,
        action: &str,
        resource_type: &str,
        resource_id: Option<Uuid>,
        details: Option<serde_json::Value>,
        outcome: AuditOutcome,
    ) -> Result<()> {
        let mut chain = self.chain.lock().await;
        let entry = AuditEntry::new(
            actor_id,
            action,
            resource_type,
            resource_id,
            details,
            outcome,
            chain.clone(),
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.config.trail_path)?;
        let json = serde_json::to_string(&entry)?;
        writeln!(file, "{}", json)?;
        file.flush()?;

        *chain = entry.entry_hash;
        info!(
            action,
            resource_type,
            outcome = ?outcome,
            "audit entry recorded"
        );
        Ok(())
    }

    /// Read every entry back from the trail file.
    pub fn read_entries(&self) -> Result<Vec<AuditEntry>> {
        if !self.config.trail_path.exists() {
            return Ok(Vec::new());
        }
        let file = std::fs::File::open(&self.config.trail_path)?;
        let mut entries = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            entries.push(serde_json::from_str(&line)?);
        }
        Ok(entries)
    }

    /// Walk the chain and verify every link and entry hash.
    pub fn verify_chain(&self) -> Result<bool> {
        let entries = self.read_entries()?;
        let mut expected_previous = GENESIS_HASH.to_string();
        for entry in &entries {
            if entry.previous_hash != expected_previous || !entry.verify_hash() {
                return Ok(false);
            }
            expected_previous = entry.entry_hash.clone();
        }
        Ok(true)
    }

    fn last_hash_in(path: &Path) -> Result<String> {
        let file = std::fs::File::open(path)?;
        let mut last = GENESIS_HASH.to_string();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let entry: AuditEntry = serde_json::from_str(&line)?;
            last = entry.entry_hash;
        }
        Ok(last)
    }
}
