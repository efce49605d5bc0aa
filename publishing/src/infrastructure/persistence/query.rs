use chrono::{DateTime, Utc};

use crate::infrastructure::persistence::schema::{ColumnRef, Table};

/// High-level, composable query builder
/// Similar to jOOQ, but with Rust's type system
#[derive(Debug, Clone)]
pub struct QueryBuilder<'a> {
    from_table: Table<'a>,
    select: Vec<ColumnRef<'a>>,
    where_conditions: Vec<Condition<'a>>,
}

/// A where condition that will be AND'ed together.
///
/// Every node carries its own bound value, so removing a node can never
/// leave the remaining placeholders pointing at the wrong binding.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition<'a> {
    /// field = value
    Equals {
        column: ColumnRef<'a>,
        value: ConditionValue,
    },

    /// field IN (values)
    In {
        column: ColumnRef<'a>,
        values: Vec<ConditionValue>,
    },

    /// field IS NULL
    IsNull { column: ColumnRef<'a> },

    /// field IS NOT NULL
    IsNotNull { column: ColumnRef<'a> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConditionValue {
    Text(String),
    SmallInt(i16),
    BigInt(i64),
    Boolean(bool),
}

impl<'a> From<Table<'a>> for QueryBuilder<'a> {
    fn from(value: Table<'a>) -> Self {
        QueryBuilder {
            from_table: value,
            select: vec![],
            where_conditions: vec![],
        }
    }
}

impl<'a> QueryBuilder<'a> {
    /// Select specified columns
    pub fn select(mut self, columns: Vec<ColumnRef<'a>>) -> Self {
        self.select = columns;
        self
    }

    /// Add where condition
    pub fn where_condition(mut self, condition: Condition<'a>) -> Self {
        self.where_conditions.push(condition);
        self
    }

    /// Drop every condition constraining the named column. The other
    /// conditions keep their values, so their placeholders stay correct.
    pub fn remove_conditions_on(mut self, column_name: &str) -> Self {
        self.where_conditions
            .retain(|condition| condition.column_name() != column_name);
        self
    }

    /// Current where conditions, in installation order
    pub fn conditions(&self) -> &[Condition<'a>] {
        &self.where_conditions
    }

    /// Decompose into table, select list and conditions
    pub fn into_parts(self) -> (Table<'a>, Vec<ColumnRef<'a>>, Vec<Condition<'a>>) {
        (self.from_table, self.select, self.where_conditions)
    }

    /// Build the SQL query string
    pub fn build(self) -> (String, Vec<SqlParameter>) {
        let mut sql = String::new();
        let mut params = Vec::new();
        let mut param_counter = 1;

        // SELECT clause
        sql.push_str("SELECT ");
        let columns: Vec<String> = self.select.iter().map(|c| c.qualified()).collect();
        sql.push_str(&columns.join(", "));

        // FROM clause
        sql.push_str(&format!("\nFROM {}", self.from_table.qualified()));

        // WHERE clause
        if !self.where_conditions.is_empty() {
            sql.push_str("\nWHERE ");
            let (where_clause, where_params) =
                Self::generate_where_conditions(&self.where_conditions, &mut param_counter);
            sql.push_str(&where_clause);
            params.extend(where_params);
        }

        (sql, params)
    }

    /// Generate WHERE conditions
    fn generate_where_conditions(
        conditions: &[Condition],
        param_counter: &mut usize,
    ) -> (String, Vec<SqlParameter>) {
        let mut where_sql = Vec::new();
        let mut params = Vec::new();

        for condition in conditions {
            let (cond_sql, cond_params) = condition.to_sql(param_counter);
            where_sql.push(cond_sql);
            params.extend(cond_params);
        }

        (where_sql.join(" AND "), params)
    }
}

impl<'a> Condition<'a> {
    /// Name of the column this condition constrains
    pub fn column_name(&self) -> &str {
        match self {
            Condition::Equals { column, .. }
            | Condition::In { column, .. }
            | Condition::IsNull { column }
            | Condition::IsNotNull { column } => column.name,
        }
    }

    pub fn to_sql(&self, param_counter: &mut usize) -> (String, Vec<SqlParameter>) {
        match self {
            Condition::Equals { column, value } => {
                let sql = format!("{} = ${}", column.qualified(), param_counter);
                *param_counter += 1;
                (sql, vec![value.into()])
            }

            Condition::In { column, values } => {
                let placeholders: Vec<String> = values
                    .iter()
                    .map(|_| {
                        let placeholder = format!("${}", param_counter);
                        *param_counter += 1;
                        placeholder
                    })
                    .collect();

                let sql = format!("{} IN ({})", column.qualified(), placeholders.join(", "));
                let params: Vec<SqlParameter> = values.iter().map(|v| v.into()).collect();
                (sql, params)
            }

            Condition::IsNull { column } => {
                let sql = format!("{} IS NULL", column.qualified());
                (sql, vec![])
            }

            Condition::IsNotNull { column } => {
                let sql = format!("{} IS NOT NULL", column.qualified());
                (sql, vec![])
            }
        }
    }
}

/// Builder for transition updates. Placeholders are numbered across the
/// whole statement, SET assignments first, then the WHERE conditions.
#[derive(Debug, Clone)]
pub struct UpdateBuilder<'a> {
    table: Table<'a>,
    assignments: Vec<(String, SqlParameter)>,
    where_conditions: Vec<Condition<'a>>,
    returning: Vec<ColumnRef<'a>>,
}

impl<'a> UpdateBuilder<'a> {
    pub fn new(table: Table<'a>) -> Self {
        UpdateBuilder {
            table,
            assignments: vec![],
            where_conditions: vec![],
            returning: vec![],
        }
    }

    /// Add a SET assignment
    pub fn set(mut self, column: String, value: SqlParameter) -> Self {
        self.assignments.push((column, value));
        self
    }

    /// Add where condition
    pub fn where_condition(mut self, condition: Condition<'a>) -> Self {
        self.where_conditions.push(condition);
        self
    }

    /// Add several where conditions, keeping their order
    pub fn where_conditions(mut self, conditions: Vec<Condition<'a>>) -> Self {
        self.where_conditions.extend(conditions);
        self
    }

    /// Return the given columns from the updated rows
    pub fn returning(mut self, columns: Vec<ColumnRef<'a>>) -> Self {
        self.returning = columns;
        self
    }

    /// Build the SQL statement
    pub fn build(self) -> (String, Vec<SqlParameter>) {
        let mut sql = String::new();
        let mut params = Vec::new();
        let mut param_counter = 1;

        sql.push_str(&format!("UPDATE {}", self.table.qualified()));

        // SET clause; targets are bare column names, Postgres rejects
        // alias-qualified targets here
        let set_clauses: Vec<String> = self
            .assignments
            .iter()
            .map(|(column, _)| {
                let clause = format!("\"{}\" = ${}", column, param_counter);
                param_counter += 1;
                clause
            })
            .collect();
        sql.push_str(&format!("\nSET {}", set_clauses.join(", ")));
        params.extend(self.assignments.into_iter().map(|(_, value)| value));

        // WHERE clause
        if !self.where_conditions.is_empty() {
            sql.push_str("\nWHERE ");
            let mut where_sql = Vec::new();
            for condition in &self.where_conditions {
                let (cond_sql, cond_params) = condition.to_sql(&mut param_counter);
                where_sql.push(cond_sql);
                params.extend(cond_params);
            }
            sql.push_str(&where_sql.join(" AND "));
        }

        // RETURNING clause
        if !self.returning.is_empty() {
            let columns: Vec<String> = self.returning.iter().map(|c| c.qualified()).collect();
            sql.push_str(&format!("\nRETURNING {}", columns.join(", ")));
        }

        (sql, params)
    }
}

impl From<&ConditionValue> for SqlParameter {
    fn from(value: &ConditionValue) -> Self {
        match value {
            ConditionValue::Text(s) => SqlParameter::Text(s.clone()),
            ConditionValue::SmallInt(i) => SqlParameter::SmallInt(*i),
            ConditionValue::BigInt(i) => SqlParameter::BigInt(*i),
            ConditionValue::Boolean(b) => SqlParameter::Boolean(*b),
        }
    }
}

// SQL parameter that will be bound to query
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParameter {
    Text(String),
    SmallInt(i16),
    BigInt(i64),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
}

impl SqlParameter {
    /// Bind to sqlx query
    pub fn bind_to_query<'q>(
        self,
        query: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    ) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
        match self {
            SqlParameter::Text(s) => query.bind(s),
            SqlParameter::SmallInt(i) => query.bind(i),
            SqlParameter::BigInt(i) => query.bind(i),
            SqlParameter::Boolean(b) => query.bind(b),
            SqlParameter::Timestamp(t) => query.bind(t),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use crate::infrastructure::persistence::schema::Column;

    use super::*;

    fn articles() -> Table<'static> {
        Table {
            name: "articles",
            alias: "m",
        }
    }

    #[test]
    fn test_simple_select() {
        let builder = QueryBuilder::from(articles())
            .select(vec![Cow::Owned(Column::main("id"))])
            .where_condition(Condition::Equals {
                column: Cow::Owned(Column::main("status")),
                value: ConditionValue::SmallInt(1),
            });

        let (sql, params) = builder.build();

        assert!(sql.contains("SELECT \"m\".\"id\"\nFROM \"articles\" AS \"m\""));
        assert!(sql.contains("WHERE \"m\".\"status\" = $1"));
        assert_eq!(params, vec![SqlParameter::SmallInt(1)]);
    }

    #[test]
    fn removal_keeps_other_bindings_aligned() {
        let builder = QueryBuilder::from(articles())
            .select(vec![Cow::Owned(Column::main("id"))])
            .where_condition(Condition::Equals {
                column: Cow::Owned(Column::main("status")),
                value: ConditionValue::SmallInt(1),
            })
            .where_condition(Condition::Equals {
                column: Cow::Owned(Column::main("author_id")),
                value: ConditionValue::BigInt(7),
            })
            .remove_conditions_on("status");

        let (sql, params) = builder.build();

        assert!(!sql.contains("\"m\".\"status\""));
        assert!(sql.contains("WHERE \"m\".\"author_id\" = $1"));
        assert_eq!(params, vec![SqlParameter::BigInt(7)]);
    }

    #[test]
    fn null_checks_consume_no_placeholder() {
        let builder = QueryBuilder::from(articles())
            .select(vec![Cow::Owned(Column::main("id"))])
            .where_condition(Condition::IsNull {
                column: Cow::Owned(Column::main("deleted_at")),
            })
            .where_condition(Condition::Equals {
                column: Cow::Owned(Column::main("author_id")),
                value: ConditionValue::BigInt(7),
            });

        let (sql, params) = builder.build();

        assert!(sql.contains("\"m\".\"deleted_at\" IS NULL AND \"m\".\"author_id\" = $1"));
        assert_eq!(params, vec![SqlParameter::BigInt(7)]);
    }

    #[test]
    fn in_condition_numbers_every_value() {
        let builder = QueryBuilder::from(articles())
            .select(vec![Cow::Owned(Column::main("id"))])
            .where_condition(Condition::In {
                column: Cow::Owned(Column::main("status")),
                values: vec![ConditionValue::SmallInt(3), ConditionValue::SmallInt(1)],
            });

        let (sql, params) = builder.build();

        assert!(sql.contains("WHERE \"m\".\"status\" IN ($1, $2)"));
        assert_eq!(
            params,
            vec![SqlParameter::SmallInt(3), SqlParameter::SmallInt(1)]
        );
    }

    #[test]
    fn update_numbers_set_then_where() {
        let builder = UpdateBuilder::new(articles())
            .set("status".to_owned(), SqlParameter::SmallInt(4))
            .where_condition(Condition::Equals {
                column: Cow::Owned(Column::main("id")),
                value: ConditionValue::BigInt(9),
            });

        let (sql, params) = builder.build();

        assert!(sql.contains("UPDATE \"articles\" AS \"m\""));
        assert!(sql.contains("SET \"status\" = $1"));
        assert!(sql.contains("WHERE \"m\".\"id\" = $2"));
        assert_eq!(
            params,
            vec![SqlParameter::SmallInt(4), SqlParameter::BigInt(9)]
        );
    }

    #[test]
    fn update_returning_lists_requested_columns() {
        let builder = UpdateBuilder::new(articles())
            .set("status".to_owned(), SqlParameter::SmallInt(1))
            .returning(vec![
                Cow::Owned(Column::main("id")),
                Cow::Owned(Column::main("status")),
            ]);

        let (sql, _) = builder.build();

        assert!(sql.contains("RETURNING \"m\".\"id\", \"m\".\"status\""));
    }
}
