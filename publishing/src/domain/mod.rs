use std::future::Future;

use chrono::{DateTime, Utc};
use common::ContentStatus;

pub mod error;
pub mod record;
pub mod transition;

pub use error::PublishingError;
pub use record::{ContentRecord, RecordId, UserId};
pub use transition::Transition;

/// Source of the current time, swappable in tests.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Resolves the principal acting on the current call, if any.
pub trait PrincipalProvider: Send + Sync + 'static {
    fn current_user(&self) -> Option<UserId>;
}

/// Which statuses a query may see.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusFilter {
    /// rows in exactly one status
    Only(ContentStatus),
    /// rows in the given status, plus published rows
    WithPublished(ContentStatus),
    /// no status restriction
    Any,
}

impl Default for StatusFilter {
    fn default() -> Self {
        StatusFilter::Only(ContentStatus::Published)
    }
}

/// What a transition call produced.
#[derive(Clone, Debug, PartialEq)]
pub enum TransitionOutcome {
    /// the updated record, for id-scoped calls
    Record(ContentRecord),
    /// number of rows moved, for set-based calls
    Affected(u64),
}

pub trait ContentRepository: Send + Sync + 'static {
    /// Find records visible under the filter
    fn find(
        &self,
        filter: StatusFilter,
    ) -> impl Future<Output = Result<Vec<ContentRecord>, PublishingError>> + Send;

    /// Find a single record by id under the filter
    fn find_by_id(
        &self,
        filter: StatusFilter,
        id: RecordId,
    ) -> impl Future<Output = Result<Option<ContentRecord>, PublishingError>> + Send;

    /// Move records into review
    fn submit(
        &self,
        id: Option<RecordId>,
    ) -> impl Future<Output = Result<TransitionOutcome, PublishingError>> + Send;

    /// Send submitted records back to their author
    fn reject(
        &self,
        id: Option<RecordId>,
    ) -> impl Future<Output = Result<TransitionOutcome, PublishingError>> + Send;

    /// Clear submitted records for publication
    fn approve(
        &self,
        id: Option<RecordId>,
    ) -> impl Future<Output = Result<TransitionOutcome, PublishingError>> + Send;

    /// Make approved records live, stamping time and principal
    fn publish(
        &self,
        id: Option<RecordId>,
        publish_at: Option<DateTime<Utc>>,
    ) -> impl Future<Output = Result<TransitionOutcome, PublishingError>> + Send;

    /// Retire records from circulation
    fn archive(
        &self,
        id: Option<RecordId>,
    ) -> impl Future<Output = Result<TransitionOutcome, PublishingError>> + Send;
}
