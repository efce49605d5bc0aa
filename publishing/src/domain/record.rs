use chrono::{DateTime, Utc};
use common::ContentStatus;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub i64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

/// A content row as the workflow sees it: identity plus the workflow
/// columns. Whatever else the table carries stays out of view.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: RecordId,
    pub status: ContentStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub published_by: Option<UserId>,
}

impl ContentRecord {
    pub fn is_drafted(&self) -> bool {
        self.status == ContentStatus::Drafted
    }

    pub fn is_submitted(&self) -> bool {
        self.status == ContentStatus::Submitted
    }

    pub fn is_rejected(&self) -> bool {
        self.status == ContentStatus::Rejected
    }

    pub fn is_approved(&self) -> bool {
        self.status == ContentStatus::Approved
    }

    pub fn is_published(&self) -> bool {
        self.status == ContentStatus::Published
    }

    pub fn is_archived(&self) -> bool {
        self.status == ContentStatus::Archived
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_predicates_follow_the_status() {
        let record = ContentRecord {
            id: RecordId(1),
            status: ContentStatus::Submitted,
            published_at: None,
            published_by: None,
        };

        assert!(record.is_submitted());
        assert!(!record.is_drafted());
        assert!(!record.is_published());
    }

    #[test]
    fn archived_records_keep_their_publish_stamps() {
        // archiving moves the status; the stamps describe history
        let record = ContentRecord {
            id: RecordId(7),
            status: ContentStatus::Archived,
            published_at: Some(Utc::now()),
            published_by: Some(UserId(42)),
        };

        assert!(record.is_archived());
        assert!(record.published_at.is_some());
        assert_eq!(record.published_by, Some(UserId(42)));
    }
}
