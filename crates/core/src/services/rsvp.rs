//! RSVP token protocol.
//!
//! The token URL is the sole credential for the anonymous RSVP page.
//! Reading marks the guest as having viewed the page exactly once;
//! submitting overwrites the response fields in full and stamps the
//! submission time.

use banquet_common::{AppError, AppResult, is_rsvp_token};
use banquet_db::{entities::guest, repositories::GuestRepository};
use chrono::Utc;
use sea_orm::{IntoActiveModel, Set};
use serde::Deserialize;

/// Payload for an RSVP submission.
///
/// `rsvp_others_yes`/`rsvp_others_no` are full overwrites: an absent
/// field clears the stored value rather than leaving it unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct RsvpUpdateInput {
    /// Attending (`true`) or declining (`false`).
    pub rsvp: bool,
    /// Names of additional attendees.
    pub rsvp_others_yes: Option<String>,
    /// Names of additional non-attendees.
    pub rsvp_others_no: Option<String>,
    /// Free-text note from the guest; left unchanged when absent.
    pub notes: Option<String>,
}

/// RSVP read/update service.
#[derive(Clone)]
pub struct RsvpService {
    repo: GuestRepository,
}

impl RsvpService {
    /// Create a new RSVP service.
    #[must_use]
    pub const fn new(repo: GuestRepository) -> Self {
        Self { repo }
    }

    /// Fetch the guest behind a token, marking the first view.
    ///
    /// `rsvp_viewed_at` is set to now if and only if it is currently
    /// unset; subsequent calls return the stored value untouched.
    pub async fn view(&self, token: &str) -> AppResult<guest::Model> {
        check_token_format(token)?;

        let guest = self
            .repo
            .find_by_token(token)
            .await?
            .ok_or_else(|| AppError::GuestNotFound(token.to_string()))?;

        if guest.rsvp_viewed_at.is_some() {
            return Ok(guest);
        }

        let mut active = guest.into_active_model();
        active.rsvp_viewed_at = Set(Some(Utc::now()));
        self.repo.update(active).await
    }

    /// Record an RSVP submission for the guest behind a token.
    ///
    /// Overwrites the response fields, stamps `rsvp_date`, and counts
    /// the submission as a view when no view happened yet. Idempotent:
    /// the same payload twice yields the same final state (aside from
    /// `rsvp_date` advancing).
    pub async fn submit(&self, token: &str, input: RsvpUpdateInput) -> AppResult<guest::Model> {
        check_token_format(token)?;

        let guest = self
            .repo
            .find_by_token(token)
            .await?
            .ok_or_else(|| AppError::GuestNotFound(token.to_string()))?;

        let now = Utc::now();
        let viewed_at = guest.rsvp_viewed_at.unwrap_or(now);

        let mut active = guest.into_active_model();
        active.rsvp = Set(Some(input.rsvp));
        active.rsvp_others_yes = Set(input.rsvp_others_yes);
        active.rsvp_others_no = Set(input.rsvp_others_no);
        active.rsvp_date = Set(Some(now));
        active.rsvp_viewed_at = Set(Some(viewed_at));
        if let Some(notes) = input.notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(Some(now));

        self.repo.update(active).await
    }
}

/// Malformed tokens are rejected before touching the store.
fn check_token_format(token: &str) -> AppResult<()> {
    if is_rsvp_token(token) {
        Ok(())
    } else {
        Err(AppError::Validation(
            "token must be 24 lowercase hex characters".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    const TOKEN: &str = "0123456789abcdef01234567";

    fn mock_guest(viewed_at: Option<DateTime<Utc>>) -> guest::Model {
        guest::Model {
            id: 1,
            first_name: "An".to_string(),
            last_name: "Nguyen".to_string(),
            email: None,
            phone: None,
            bridal_party: false,
            nz_invite: false,
            my_invite: false,
            dinner: false,
            rsvp: None,
            rsvp_others_yes: None,
            rsvp_others_no: None,
            rsvp_date: None,
            rsvp_token: Some(TOKEN.to_string()),
            invited_at: Some(Utc::now()),
            rsvp_viewed_at: viewed_at,
            table_number: None,
            notes: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_view_unknown_token_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<guest::Model>::new()])
                .into_connection(),
        );

        let service = RsvpService::new(GuestRepository::new(db));
        let result = service.view("ffffffffffffffffffffffff").await;

        assert!(matches!(result, Err(AppError::GuestNotFound(_))));
    }

    #[tokio::test]
    async fn test_first_view_stamps_viewed_at() {
        let fresh = mock_guest(None);
        let mut stamped = fresh.clone();
        stamped.rsvp_viewed_at = Some(Utc::now());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![fresh], vec![stamped.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = RsvpService::new(GuestRepository::new(db));
        let guest = service.view(TOKEN).await.unwrap();

        assert!(guest.rsvp_viewed_at.is_some());
    }

    #[tokio::test]
    async fn test_second_view_leaves_viewed_at_unchanged() {
        let first_view = Utc::now() - Duration::hours(3);
        let guest = mock_guest(Some(first_view));

        // Only the lookup query: no update may be issued.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[guest]])
                .into_connection(),
        );

        let service = RsvpService::new(GuestRepository::new(db));
        let result = service.view(TOKEN).await.unwrap();

        assert_eq!(result.rsvp_viewed_at, Some(first_view));
    }

    #[tokio::test]
    async fn test_submit_overwrites_response_fields() {
        let stored = mock_guest(None);
        let mut updated = stored.clone();
        updated.rsvp = Some(true);
        updated.rsvp_others_yes = Some("Binh".to_string());
        updated.rsvp_others_no = None;
        updated.rsvp_date = Some(Utc::now());
        updated.rsvp_viewed_at = Some(Utc::now());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![stored], vec![updated.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = RsvpService::new(GuestRepository::new(db));
        let input = RsvpUpdateInput {
            rsvp: true,
            rsvp_others_yes: Some("Binh".to_string()),
            rsvp_others_no: None,
            notes: None,
        };

        let guest = service.submit(TOKEN, input).await.unwrap();

        assert_eq!(guest.rsvp, Some(true));
        assert_eq!(guest.rsvp_others_yes.as_deref(), Some("Binh"));
        assert!(guest.rsvp_others_no.is_none());
        assert!(guest.rsvp_date.is_some());
        // A PUT arriving before any GET still counts as a view.
        assert!(guest.rsvp_viewed_at.is_some());
    }

    #[tokio::test]
    async fn test_repeated_submit_yields_identical_response_fields() {
        let first_submit = Utc::now() - Duration::minutes(5);

        let stored = mock_guest(None);
        let mut after_first = stored.clone();
        after_first.rsvp = Some(true);
        after_first.rsvp_others_yes = Some("Binh".to_string());
        after_first.rsvp_others_no = None;
        after_first.rsvp_date = Some(first_submit);
        after_first.rsvp_viewed_at = Some(first_submit);

        // Same final state, only the submission stamp advances.
        let mut after_second = after_first.clone();
        after_second.rsvp_date = Some(Utc::now());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([
                    vec![stored],
                    vec![after_first.clone()],
                    vec![after_first.clone()],
                    vec![after_second.clone()],
                ])
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 1,
                    },
                ])
                .into_connection(),
        );

        let service = RsvpService::new(GuestRepository::new(db));
        let input = RsvpUpdateInput {
            rsvp: true,
            rsvp_others_yes: Some("Binh".to_string()),
            rsvp_others_no: None,
            notes: None,
        };

        let first = service.submit(TOKEN, input.clone()).await.unwrap();
        let second = service.submit(TOKEN, input).await.unwrap();

        assert_eq!(first.rsvp, second.rsvp);
        assert_eq!(first.rsvp_others_yes, second.rsvp_others_yes);
        assert_eq!(first.rsvp_others_no, second.rsvp_others_no);
        // The view stamp stays at its first value.
        assert_eq!(first.rsvp_viewed_at, second.rsvp_viewed_at);
        // Only rsvp_date may advance between submissions.
        assert!(second.rsvp_date >= first.rsvp_date);
    }

    #[tokio::test]
    async fn test_malformed_token_is_rejected_before_lookup() {
        // No query results appended: the store must not be touched.
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = RsvpService::new(GuestRepository::new(db));

        let result = service.view("not-a-token").await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let input = RsvpUpdateInput {
            rsvp: true,
            rsvp_others_yes: None,
            rsvp_others_no: None,
            notes: None,
        };
        let result = service.submit("UPPERCASE0123456789ABCDE", input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_submit_unknown_token_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<guest::Model>::new()])
                .into_connection(),
        );

        let service = RsvpService::new(GuestRepository::new(db));
        let input = RsvpUpdateInput {
            rsvp: false,
            rsvp_others_yes: None,
            rsvp_others_no: None,
            notes: None,
        };

        let result = service.submit("ffffffffffffffffffffffff", input).await;
        assert!(matches!(result, Err(AppError::GuestNotFound(_))));
    }
}
