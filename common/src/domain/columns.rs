use serde::Deserialize;

use crate::domain::ColumnName;
use crate::{PUBLISHED_AT_FIELD_NAME, PUBLISHED_BY_FIELD_NAME, STATUS_FIELD_NAME};

/// Names of the workflow columns on the content table.
///
/// Handed to the workflow explicitly at construction; there is no lookup
/// chain behind it. `Default` matches the conventional column names.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct PublishingColumns {
    #[serde(default = "default_status_column")]
    pub status: ColumnName,
    #[serde(default = "default_published_at_column")]
    pub published_at: ColumnName,
    #[serde(default = "default_published_by_column")]
    pub published_by: ColumnName,
    /// Carried in the configuration surface; no filter or transition
    /// consumes it.
    #[serde(default = "default_strict")]
    pub strict: bool,
}

impl Default for PublishingColumns {
    fn default() -> Self {
        Self {
            status: default_status_column(),
            published_at: default_published_at_column(),
            published_by: default_published_by_column(),
            strict: default_strict(),
        }
    }
}

fn default_status_column() -> ColumnName {
    ColumnName::try_new(STATUS_FIELD_NAME).expect("STATUS_FIELD_NAME must be a valid column name")
}

fn default_published_at_column() -> ColumnName {
    ColumnName::try_new(PUBLISHED_AT_FIELD_NAME)
        .expect("PUBLISHED_AT_FIELD_NAME must be a valid column name")
}

fn default_published_by_column() -> ColumnName {
    ColumnName::try_new(PUBLISHED_BY_FIELD_NAME)
        .expect("PUBLISHED_BY_FIELD_NAME must be a valid column name")
}

fn default_strict() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_conventional_names() {
        let columns = PublishingColumns::default();
        assert_eq!(columns.status.as_str(), "status");
        assert_eq!(columns.published_at.as_str(), "published_at");
        assert_eq!(columns.published_by.as_str(), "published_by");
        assert!(columns.strict);
    }

    #[test]
    fn deserializes_missing_fields_to_defaults() {
        let columns: PublishingColumns = serde_json::from_str("{}").unwrap();
        assert_eq!(columns, PublishingColumns::default());
    }

    #[test]
    fn deserializes_partial_overrides() {
        let columns: PublishingColumns =
            serde_json::from_str(r#"{"status": "moderation_state", "strict": false}"#).unwrap();
        assert_eq!(columns.status.as_str(), "moderation_state");
        assert_eq!(columns.published_at.as_str(), "published_at");
        assert!(!columns.strict);
    }
}
