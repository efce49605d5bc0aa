use std::borrow::Cow;

use common::TableName;

/// Alias every workflow query binds the content table to.
pub const MAIN_ALIAS: &'static str = "m";

// Represents a table in database
#[derive(Debug, Clone, PartialEq)]
pub struct Table<'a> {
    pub name: &'a str,
    pub alias: &'static str,
}

impl<'a> Table<'a> {
    /// Get qualified table name with alias
    pub fn qualified(&self) -> String {
        format!("\"{}\" AS \"{}\"", self.name, self.alias)
    }
}

impl<'a> From<&'a TableName> for Table<'a> {
    fn from(value: &'a TableName) -> Self {
        Table {
            name: value.as_str(),
            alias: MAIN_ALIAS,
        }
    }
}

/// Represents one column in the database table
#[derive(Debug, Clone, PartialEq)]
pub struct Column<'a> {
    pub qualifier: &'static str,
    pub name: &'a str,
}

impl<'a> Column<'a> {
    /// Column on the main table
    pub fn main(name: &'a str) -> Self {
        Column {
            qualifier: MAIN_ALIAS,
            name,
        }
    }

    /// Get qualified column name
    pub fn qualified(&self) -> String {
        format!("\"{}\".\"{}\"", self.qualifier, self.name)
    }
}

/// Column reference which can be either borrowed or owned
pub type ColumnRef<'a> = Cow<'a, Column<'a>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_names_are_quoted() {
        let table = Table {
            name: "articles",
            alias: MAIN_ALIAS,
        };
        assert_eq!(table.qualified(), "\"articles\" AS \"m\"");
        assert_eq!(Column::main("status").qualified(), "\"m\".\"status\"");
    }
}
