use chrono::{DateTime, Utc};
use common::database::Database;
use common::{ContentStatus, ID_FIELD_NAME, PublishingColumns, TableName};
use futures::TryStreamExt;
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::domain::record::{ContentRecord, RecordId, UserId};
use crate::domain::transition::Transition;
use crate::domain::{
    Clock, ContentRepository, PrincipalProvider, PublishingError, StatusFilter, SystemClock,
    TransitionOutcome,
};
use crate::infrastructure::persistence::scope::ScopedQuery;

/// Content repository backed by a single Postgres table.
///
/// Transitions are single UPDATE statements over the narrowed row set;
/// row-level concurrency is left to the database.
#[derive(Clone)]
pub struct PostgresContentRepository<P, C = SystemClock> {
    database: &'static Database,
    table: TableName,
    columns: PublishingColumns,
    principals: P,
    clock: C,
}

impl<P, C> PostgresContentRepository<P, C>
where
    P: PrincipalProvider,
    C: Clock,
{
    pub fn new(
        database: &'static Database,
        table: TableName,
        columns: PublishingColumns,
        principals: P,
        clock: C,
    ) -> Self {
        Self {
            database,
            table,
            columns,
            principals,
            clock,
        }
    }

    /// Fresh scope over the content table, published rows only
    pub fn scope(&self) -> ScopedQuery<'_> {
        ScopedQuery::new(&self.table, &self.columns)
    }

    /// Fetch every record the scope lets through
    pub async fn fetch_all(
        &self,
        scope: ScopedQuery<'_>,
    ) -> Result<Vec<ContentRecord>, PublishingError> {
        let (sql, params) = scope.build();
        tracing::debug!(sql = %sql, "generated select");

        let mut query = sqlx::query(&sql);
        for param in params {
            query = param.bind_to_query(query);
        }

        let mut db_rows = query.fetch(self.database.database_pool());
        let mut records = Vec::new();
        while let Some(row) = db_rows.try_next().await? {
            records.push(self.row_to_record(&row)?);
        }

        Ok(records)
    }

    /// Fetch one record by id under the scope's filter
    pub async fn fetch_one(
        &self,
        scope: ScopedQuery<'_>,
        id: RecordId,
    ) -> Result<Option<ContentRecord>, PublishingError> {
        let (sql, params) = scope.build_for_id(id);
        tracing::debug!(sql = %sql, "generated select");

        let mut query = sqlx::query(&sql);
        for param in params {
            query = param.bind_to_query(query);
        }

        let row = query.fetch_optional(self.database.database_pool()).await?;
        row.map(|row| self.row_to_record(&row)).transpose()
    }

    async fn apply(
        &self,
        transition: Transition,
        id: Option<RecordId>,
    ) -> Result<TransitionOutcome, PublishingError> {
        let update = self.scope().into_update(&transition, self.clock.now(), id);
        let (sql, params) = update.build();
        tracing::debug!(sql = %sql, "generated update");

        let mut query = sqlx::query(&sql);
        for param in params {
            query = param.bind_to_query(query);
        }

        match id {
            Some(_) => {
                let row = query
                    .fetch_optional(self.database.database_pool())
                    .await?
                    .ok_or(PublishingError::NotFound)?;
                Ok(TransitionOutcome::Record(self.row_to_record(&row)?))
            }
            None => {
                let result = query.execute(self.database.database_pool()).await?;
                Ok(TransitionOutcome::Affected(result.rows_affected()))
            }
        }
    }

    fn row_to_record(&self, row: &PgRow) -> Result<ContentRecord, PublishingError> {
        let id: i64 = row
            .try_get(ID_FIELD_NAME)
            .map_err(|e| PublishingError::Persistence(format!("Failed to parse id: {}", e)))?;

        let status_code: i16 = row.try_get(self.columns.status.as_str()).map_err(|e| {
            PublishingError::Persistence(format!("Failed to parse status: {}", e))
        })?;
        let status = ContentStatus::try_from(status_code)
            .map_err(|e| PublishingError::Persistence(e.to_string()))?;

        let published_at: Option<DateTime<Utc>> =
            row.try_get(self.columns.published_at.as_str()).map_err(|e| {
                PublishingError::Persistence(format!("Failed to parse published_at: {}", e))
            })?;

        let published_by: Option<i64> =
            row.try_get(self.columns.published_by.as_str()).map_err(|e| {
                PublishingError::Persistence(format!("Failed to parse published_by: {}", e))
            })?;

        Ok(ContentRecord {
            id: RecordId(id),
            status,
            published_at,
            published_by: published_by.map(UserId),
        })
    }
}

impl<P, C> ContentRepository for PostgresContentRepository<P, C>
where
    P: PrincipalProvider,
    C: Clock,
{
    async fn find(&self, filter: StatusFilter) -> Result<Vec<ContentRecord>, PublishingError> {
        self.fetch_all(self.scope().with_filter(filter)).await
    }

    async fn find_by_id(
        &self,
        filter: StatusFilter,
        id: RecordId,
    ) -> Result<Option<ContentRecord>, PublishingError> {
        self.fetch_one(self.scope().with_filter(filter), id).await
    }

    async fn submit(&self, id: Option<RecordId>) -> Result<TransitionOutcome, PublishingError> {
        self.apply(Transition::Submit, id).await
    }

    async fn reject(&self, id: Option<RecordId>) -> Result<TransitionOutcome, PublishingError> {
        self.apply(Transition::Reject, id).await
    }

    async fn approve(&self, id: Option<RecordId>) -> Result<TransitionOutcome, PublishingError> {
        self.apply(Transition::Approve, id).await
    }

    async fn publish(
        &self,
        id: Option<RecordId>,
        publish_at: Option<DateTime<Utc>>,
    ) -> Result<TransitionOutcome, PublishingError> {
        let transition = Transition::publish(publish_at, &self.principals)?;
        self.apply(transition, id).await
    }

    async fn archive(&self, id: Option<RecordId>) -> Result<TransitionOutcome, PublishingError> {
        self.apply(Transition::Archive, id).await
    }
}
