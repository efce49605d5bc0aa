use std::borrow::Cow;

use chrono::{DateTime, Utc};
use common::{ContentStatus, ID_FIELD_NAME, PublishingColumns, TableName};

use crate::domain::StatusFilter;
use crate::domain::record::RecordId;
use crate::domain::transition::{AssignmentValue, Transition};
use crate::infrastructure::persistence::query::{
    Condition, ConditionValue, QueryBuilder, SqlParameter, UpdateBuilder,
};
use crate::infrastructure::persistence::schema::{Column, ColumnRef, Table};

/// Query over the content table that always carries a status filter.
///
/// A fresh scope sees published rows only. Each filter method first
/// removes the active status predicate and then installs its own, so
/// filters replace each other instead of stacking. Caller conditions on
/// other columns are never touched by a filter swap.
#[derive(Debug, Clone)]
pub struct ScopedQuery<'a> {
    columns: &'a PublishingColumns,
    query: QueryBuilder<'a>,
}

impl<'a> ScopedQuery<'a> {
    pub fn new(table: &'a TableName, columns: &'a PublishingColumns) -> Self {
        let query = QueryBuilder::from(Table::from(table)).select(vec![
            Cow::Owned(Column::main(ID_FIELD_NAME)),
            Cow::Owned(Column::main(columns.status.as_str())),
            Cow::Owned(Column::main(columns.published_at.as_str())),
            Cow::Owned(Column::main(columns.published_by.as_str())),
        ]);

        Self { columns, query }.with_filter(StatusFilter::default())
    }

    fn status_column(&self) -> ColumnRef<'a> {
        Cow::Owned(Column::main(self.columns.status.as_str()))
    }

    fn id_column(&self) -> ColumnRef<'a> {
        Cow::Owned(Column::main(ID_FIELD_NAME))
    }

    /// Replace the active status predicate with the given filter
    pub fn with_filter(mut self, filter: StatusFilter) -> Self {
        self.query = self.query.remove_conditions_on(self.columns.status.as_str());

        let condition = match filter {
            StatusFilter::Only(status) => Some(Condition::Equals {
                column: self.status_column(),
                value: ConditionValue::SmallInt(status.code()),
            }),
            StatusFilter::WithPublished(status) => Some(Condition::In {
                column: self.status_column(),
                values: vec![
                    ConditionValue::SmallInt(status.code()),
                    ConditionValue::SmallInt(ContentStatus::Published.code()),
                ],
            }),
            StatusFilter::Any => None,
        };

        if let Some(condition) = condition {
            self.query = self.query.where_condition(condition);
        }
        self
    }

    pub fn drafted(self) -> Self {
        self.with_filter(StatusFilter::Only(ContentStatus::Drafted))
    }

    pub fn submitted(self) -> Self {
        self.with_filter(StatusFilter::Only(ContentStatus::Submitted))
    }

    pub fn rejected(self) -> Self {
        self.with_filter(StatusFilter::Only(ContentStatus::Rejected))
    }

    pub fn approved(self) -> Self {
        self.with_filter(StatusFilter::Only(ContentStatus::Approved))
    }

    pub fn published(self) -> Self {
        self.with_filter(StatusFilter::Only(ContentStatus::Published))
    }

    pub fn archived(self) -> Self {
        self.with_filter(StatusFilter::Only(ContentStatus::Archived))
    }

    pub fn with_drafted(self) -> Self {
        self.with_filter(StatusFilter::WithPublished(ContentStatus::Drafted))
    }

    pub fn with_submitted(self) -> Self {
        self.with_filter(StatusFilter::WithPublished(ContentStatus::Submitted))
    }

    pub fn with_rejected(self) -> Self {
        self.with_filter(StatusFilter::WithPublished(ContentStatus::Rejected))
    }

    pub fn with_approved(self) -> Self {
        self.with_filter(StatusFilter::WithPublished(ContentStatus::Approved))
    }

    pub fn with_archived(self) -> Self {
        self.with_filter(StatusFilter::WithPublished(ContentStatus::Archived))
    }

    pub fn with_any_status(self) -> Self {
        self.with_filter(StatusFilter::Any)
    }

    /// Add a caller condition; filter swaps leave it alone unless it
    /// constrains the status column itself
    pub fn where_condition(mut self, condition: Condition<'a>) -> Self {
        self.query = self.query.where_condition(condition);
        self
    }

    /// Current where conditions, in installation order
    pub fn conditions(&self) -> &[Condition<'a>] {
        self.query.conditions()
    }

    /// Re-scope to the rows the transition may act on
    pub fn narrow_for(self, transition: &Transition) -> Self {
        match transition.eligible_from() {
            None => self.with_any_status(),
            Some([single]) => self.with_filter(StatusFilter::Only(*single)),
            Some(several) => {
                let mut scope = self.with_any_status();
                let condition = Condition::In {
                    column: scope.status_column(),
                    values: several
                        .iter()
                        .map(|status| ConditionValue::SmallInt(status.code()))
                        .collect(),
                };
                scope.query = scope.query.where_condition(condition);
                scope
            }
        }
    }

    /// Build the SELECT under the active filter
    pub fn build(self) -> (String, Vec<SqlParameter>) {
        self.query.build()
    }

    /// Narrow to a single record id and build the SELECT
    pub fn build_for_id(self, id: RecordId) -> (String, Vec<SqlParameter>) {
        let id_column = self.id_column();
        self.where_condition(Condition::Equals {
            column: id_column,
            value: ConditionValue::BigInt(id.0),
        })
        .build()
    }

    /// Turn the scope into the atomic UPDATE for a transition.
    ///
    /// The scope is first narrowed to precondition-eligible rows, so
    /// ineligible rows simply fall out of the update set. Id-scoped
    /// callers pass the id and get a RETURNING list for decoding the
    /// updated row; set-based callers pass `None`.
    pub fn into_update(
        self,
        transition: &Transition,
        now: DateTime<Utc>,
        id: Option<RecordId>,
    ) -> UpdateBuilder<'a> {
        let scope = self.narrow_for(transition);
        let columns = scope.columns;
        let id_column = scope.id_column();
        let (table, select, conditions) = scope.query.into_parts();

        let mut update = UpdateBuilder::new(table);
        for assignment in transition.assignments(columns, now) {
            update = update.set(assignment.column, assignment.value.into());
        }
        update = update.where_conditions(conditions);

        if let Some(id) = id {
            update = update
                .where_condition(Condition::Equals {
                    column: id_column,
                    value: ConditionValue::BigInt(id.0),
                })
                .returning(select);
        }

        update
    }
}

impl From<AssignmentValue> for SqlParameter {
    fn from(value: AssignmentValue) -> Self {
        match value {
            AssignmentValue::Status(status) => SqlParameter::SmallInt(status.code()),
            AssignmentValue::Timestamp(at) => SqlParameter::Timestamp(at),
            AssignmentValue::Principal(user) => SqlParameter::BigInt(user.0),
        }
    }
}
