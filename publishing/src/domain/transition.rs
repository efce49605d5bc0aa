use chrono::{DateTime, Utc};
use common::{ContentStatus, PublishingColumns};

use crate::domain::PrincipalProvider;
use crate::domain::error::PublishingError;
use crate::domain::record::UserId;

const SUBMITTED_ONLY: &[ContentStatus] = &[ContentStatus::Submitted];
const APPROVED_ONLY: &[ContentStatus] = &[ContentStatus::Approved];

/// One step of the moderation lifecycle.
///
/// A transition knows which statuses may take it, which status it lands
/// on, and which columns it writes. It does not check eligibility row by
/// row; callers narrow the row set to eligible statuses before updating.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Transition {
    Submit,
    Reject,
    Approve,
    Publish {
        publish_at: Option<DateTime<Utc>>,
        published_by: UserId,
    },
    Archive,
}

impl Transition {
    /// Build the publish step, resolving the acting principal first.
    /// Without a principal no statement is ever issued.
    pub fn publish<P: PrincipalProvider>(
        publish_at: Option<DateTime<Utc>>,
        principals: &P,
    ) -> Result<Self, PublishingError> {
        let published_by = principals
            .current_user()
            .ok_or(PublishingError::AuthenticationRequired)?;

        Ok(Transition::Publish {
            publish_at,
            published_by,
        })
    }

    /// Statuses a row must hold to take this transition.
    /// `None` means any status is eligible.
    pub fn eligible_from(&self) -> Option<&'static [ContentStatus]> {
        match self {
            Transition::Submit | Transition::Archive => None,
            Transition::Reject | Transition::Approve => Some(SUBMITTED_ONLY),
            Transition::Publish { .. } => Some(APPROVED_ONLY),
        }
    }

    pub fn target(&self) -> ContentStatus {
        match self {
            Transition::Submit => ContentStatus::Submitted,
            Transition::Reject => ContentStatus::Rejected,
            Transition::Approve => ContentStatus::Approved,
            Transition::Publish { .. } => ContentStatus::Published,
            Transition::Archive => ContentStatus::Archived,
        }
    }

    /// Column assignments this transition writes. The status stamp is
    /// always present; publish adds the time and principal stamps, from
    /// the explicit publish time when one was given, else from `now`.
    pub fn assignments(&self, columns: &PublishingColumns, now: DateTime<Utc>) -> Vec<Assignment> {
        let mut assignments = vec![Assignment {
            column: columns.status.as_str().to_owned(),
            value: AssignmentValue::Status(self.target()),
        }];

        if let Transition::Publish {
            publish_at,
            published_by,
        } = self
        {
            assignments.push(Assignment {
                column: columns.published_at.as_str().to_owned(),
                value: AssignmentValue::Timestamp(publish_at.unwrap_or(now)),
            });
            assignments.push(Assignment {
                column: columns.published_by.as_str().to_owned(),
                value: AssignmentValue::Principal(*published_by),
            });
        }

        assignments
    }
}

/// One SET entry of a transition update.
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    pub column: String,
    pub value: AssignmentValue,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AssignmentValue {
    Status(ContentStatus),
    Timestamp(DateTime<Utc>),
    Principal(UserId),
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    struct NoPrincipal;

    impl PrincipalProvider for NoPrincipal {
        fn current_user(&self) -> Option<UserId> {
            None
        }
    }

    struct FixedPrincipal(i64);

    impl PrincipalProvider for FixedPrincipal {
        fn current_user(&self) -> Option<UserId> {
            Some(UserId(self.0))
        }
    }

    fn moment() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn eligibility_follows_the_lifecycle() {
        assert_eq!(Transition::Submit.eligible_from(), None);
        assert_eq!(Transition::Archive.eligible_from(), None);
        assert_eq!(
            Transition::Reject.eligible_from(),
            Some(&[ContentStatus::Submitted][..])
        );
        assert_eq!(
            Transition::Approve.eligible_from(),
            Some(&[ContentStatus::Submitted][..])
        );

        let publish = Transition::publish(None, &FixedPrincipal(1)).unwrap();
        assert_eq!(
            publish.eligible_from(),
            Some(&[ContentStatus::Approved][..])
        );
    }

    #[test]
    fn targets_follow_the_lifecycle() {
        assert_eq!(Transition::Submit.target(), ContentStatus::Submitted);
        assert_eq!(Transition::Reject.target(), ContentStatus::Rejected);
        assert_eq!(Transition::Approve.target(), ContentStatus::Approved);
        assert_eq!(Transition::Archive.target(), ContentStatus::Archived);
    }

    #[test]
    fn non_publish_transitions_never_touch_publish_columns() {
        let columns = PublishingColumns::default();

        for transition in [
            Transition::Submit,
            Transition::Reject,
            Transition::Approve,
            Transition::Archive,
        ] {
            let assignments = transition.assignments(&columns, moment());
            assert_eq!(assignments.len(), 1);
            assert_eq!(assignments[0].column, "status");
            assert_eq!(
                assignments[0].value,
                AssignmentValue::Status(transition.target())
            );
        }
    }

    #[test]
    fn publish_stamps_time_and_principal() {
        let columns = PublishingColumns::default();
        let transition = Transition::publish(None, &FixedPrincipal(42)).unwrap();

        let assignments = transition.assignments(&columns, moment());

        assert_eq!(assignments.len(), 3);
        assert_eq!(assignments[0].column, "status");
        assert_eq!(
            assignments[0].value,
            AssignmentValue::Status(ContentStatus::Published)
        );
        assert_eq!(assignments[1].column, "published_at");
        assert_eq!(assignments[1].value, AssignmentValue::Timestamp(moment()));
        assert_eq!(assignments[2].column, "published_by");
        assert_eq!(assignments[2].value, AssignmentValue::Principal(UserId(42)));
    }

    #[test]
    fn publish_prefers_the_explicit_time() {
        let columns = PublishingColumns::default();
        let scheduled = Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap();
        let transition = Transition::publish(Some(scheduled), &FixedPrincipal(1)).unwrap();

        let assignments = transition.assignments(&columns, moment());

        assert_eq!(assignments[1].value, AssignmentValue::Timestamp(scheduled));
    }

    #[test]
    fn publish_requires_a_principal() {
        let result = Transition::publish(None, &NoPrincipal);
        assert!(matches!(result, Err(PublishingError::AuthenticationRequired)));
    }

    #[test]
    fn renamed_columns_flow_into_assignments() {
        let columns = common::test_utils::prefixed_columns("wf");
        let transition = Transition::publish(None, &FixedPrincipal(1)).unwrap();

        let assignments = transition.assignments(&columns, moment());

        assert_eq!(assignments[0].column, "wf_status");
        assert_eq!(assignments[1].column, "wf_published_at");
        assert_eq!(assignments[2].column, "wf_published_by");
    }
}
