use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EntityError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvidenceKind {
    File,
    Url,
    IpAddress,
    Domain,
    Email,
    Phone,
    SocialMedia,
    Document,
    Image,
    Video,
    Audio,
    Text,
    Database,
    Ftp,
    Server,
    PiiAnalysis,
    NetworkAnalysis,
    Other,
}

impl EvidenceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EvidenceKind::File => "FILE",
            EvidenceKind::Url => "URL",
            EvidenceKind::IpAddress => "IP_ADDRESS",
            EvidenceKind::Domain => "DOMAIN",
            EvidenceKind::Email => "EMAIL",
            EvidenceKind::Phone => "PHONE",
            EvidenceKind::SocialMedia => "SOCIAL_MEDIA",
            EvidenceKind::Document => "DOCUMENT",
            EvidenceKind::Image => "IMAGE",
            EvidenceKind::Video => "VIDEO",
            EvidenceKind::Audio => "AUDIO",
            EvidenceKind::Text => "TEXT",
            EvidenceKind::Database => "DATABASE",
            EvidenceKind::Ftp => "FTP",
            EvidenceKind::Server => "SERVER",
            EvidenceKind::PiiAnalysis => "PII_ANALYSIS",
            EvidenceKind::NetworkAnalysis => "NETWORK_ANALYSIS",
            EvidenceKind::Other => "OTHER",
        }
    }
}

impl fmt::Display for EvidenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvidenceKind {
    type Err = EntityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FILE" => Ok(EvidenceKind::File),
            "URL" => Ok(EvidenceKind::Url),
            "IP_ADDRESS" => Ok(EvidenceKind::IpAddress),
            "DOMAIN" => Ok(EvidenceKind::Domain),
            "EMAIL" => Ok(EvidenceKind::Email),
            "PHONE" => Ok(EvidenceKind::Phone),
            "SOCIAL_MEDIA" => Ok(EvidenceKind::SocialMedia),
            "DOCUMENT" => Ok(EvidenceKind::Document),
            "IMAGE" => Ok(EvidenceKind::Image),
            "VIDEO" => Ok(EvidenceKind::Video),
            "AUDIO" => Ok(EvidenceKind::Audio),
            "TEXT" => Ok(EvidenceKind::Text),
            "DATABASE" => Ok(EvidenceKind::Database),
            "FTP" => Ok(EvidenceKind::Ftp),
            "SERVER" => Ok(EvidenceKind::Server),
            "PII_ANALYSIS" => Ok(EvidenceKind::PiiAnalysis),
            "NETWORK_ANALYSIS" => Ok(EvidenceKind::NetworkAnalysis),
            "OTHER" => Ok(EvidenceKind::Other),
            other => Err(EntityError::UnknownEvidenceKind(other.to_string())),
        }
    }
}

/// An evidence record attached to a case.
///
/// The uploader is recorded independently of the case's creator and
/// assignees, and uploader identity keeps granting delete rights even after
/// the uploader loses access to the case itself. File bytes live in external
/// storage; only the path, hash and size travel with the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub id: Uuid,
    pub case_id: Uuid,
    pub kind: EvidenceKind,
    pub name: String,
    pub description: Option<String>,
    pub file_path: Option<String>,
    pub file_hash: Option<String>,
    pub file_size: Option<u64>,
    pub tags: Option<String>,
    pub is_verified: bool,
    pub uploaded_by: Option<Uuid>,
    pub organization_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Evidence {
    pub fn new(
        case_id: Uuid,
        kind: EvidenceKind,
        name: impl Into<String>,
        uploaded_by: Uuid,
        organization_id: Option<Uuid>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            case_id,
            kind,
            name: name.into(),
            description: None,
            file_path: None,
            file_hash: None,
            file_size: None,
            tags: None,
            is_verified: false,
            uploaded_by: Some(uploaded_by),
            organization_id,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_wire_form() {
        for kind in [
            EvidenceKind::File,
            EvidenceKind::IpAddress,
            EvidenceKind::SocialMedia,
            EvidenceKind::PiiAnalysis,
            EvidenceKind::Other,
        ] {
            assert_eq!(kind.as_str().parse::<EvidenceKind>().unwrap(), kind);
        }
        assert!("BLOB".parse::<EvidenceKind>().is_err());
    }

    #[test]
    fn new_evidence_starts_unverified() {
        let ev = Evidence::new(
            Uuid::new_v4(),
            EvidenceKind::Domain,
            "suspicious-domain.example",
            Uuid::new_v4(),
            None,
        );
        assert!(!ev.is_verified);
        assert!(ev.uploaded_by.is_some());
    }
}
