use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tenant boundary.
///
/// Organizations are created by SUPER_ADMIN only. Deactivation is the normal
/// removal path (and cascades member deactivation); the hard delete that
/// exists alongside it is SUPER_ADMIN-only and cascades users, cases and
/// evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub plan: String,
    pub max_users: u32,
    pub max_cases: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            slug: slug.into(),
            description: None,
            plan: "free".to_string(),
            max_users: 10,
            max_cases: 50,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
