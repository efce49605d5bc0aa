use std::sync::LazyLock;
use nutype::nutype;
use regex::Regex;

pub mod columns;
pub mod status;

pub use columns::PublishingColumns;
pub use status::ContentStatus;

// A regex for names that are quoted into generated SQL: ASCII letters,
// digits, and underscore, not starting with a digit.
// Example: "published_at" or "Status2" is valid; "my col" or "col;" are not.
pub const SQL_IDENTIFIER_REGEX: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";

static SQL_IDENTIFIER_REGEX_COMPILED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(SQL_IDENTIFIER_REGEX).expect("SQL_IDENTIFIER_REGEX must be a valid regex")
});

pub fn is_sql_identifier(name: &str) -> bool {
    SQL_IDENTIFIER_REGEX_COMPILED.is_match(name)
}

#[nutype(
    sanitize(trim, lowercase),
    validate(not_empty, len_char_max = 63, predicate = is_sql_identifier),
    derive(
        Clone,
        Debug,
        Display,
        FromStr,
        AsRef,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Serialize,
        Deserialize
    )
)]
pub struct ColumnName(String);

impl ColumnName {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }
}

#[nutype(
    sanitize(trim, lowercase),
    validate(not_empty, len_char_max = 63, predicate = is_sql_identifier),
    derive(
        Clone,
        Debug,
        Display,
        FromStr,
        AsRef,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Serialize,
        Deserialize
    )
)]
pub struct TableName(String);

impl TableName {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_identifiers() {
        assert!(ColumnName::try_new("published_at").is_ok());
        assert!(ColumnName::try_new("Status2").is_ok());
        assert!(TableName::try_new("articles").is_ok());
    }

    #[test]
    fn rejects_unquotable_names() {
        assert!(ColumnName::try_new("").is_err());
        assert!(ColumnName::try_new("my col").is_err());
        assert!(ColumnName::try_new("col\"; drop table x").is_err());
        assert!(ColumnName::try_new("2fast").is_err());
    }

    #[test]
    fn sanitizes_to_lowercase() {
        let name = ColumnName::try_new("  Published_At ").unwrap();
        assert_eq!(name.as_str(), "published_at");
    }
}
