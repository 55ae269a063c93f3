//! Guest management service.
//!
//! Admin-initiated single-guest lifecycle operations plus the guest site
//! login (unique name-pair lookup against a shared password) and the
//! token backfill for legacy rows.

use banquet_common::{AppError, AppResult, Config, password_matches, token::generate_rsvp_token};
use banquet_db::{entities::guest, repositories::GuestRepository};
use chrono::Utc;
use sea_orm::{IntoActiveModel, Set};
use serde::Deserialize;
use validator::Validate;

/// Attempts before giving up on token generation. With 96 bits of
/// entropy a single retry is already unheard of.
const MAX_TOKEN_ATTEMPTS: usize = 8;

/// Allocate an RSVP token that is verifiably unique in the store.
///
/// Collisions trigger silent regeneration rather than an error; the
/// unique index remains the final arbiter for concurrent writers.
pub(crate) async fn allocate_token(repo: &GuestRepository) -> AppResult<String> {
    for _ in 0..MAX_TOKEN_ATTEMPTS {
        let candidate = generate_rsvp_token();
        if repo.find_by_token(&candidate).await?.is_none() {
            return Ok(candidate);
        }
    }
    Err(AppError::DuplicateToken(
        "could not allocate a unique RSVP token".to_string(),
    ))
}

/// Input for creating or updating a guest.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GuestInput {
    #[validate(length(min = 1, message = "first name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, message = "last name is required"))]
    pub last_name: String,

    #[validate(email(message = "email must be a valid email address"))]
    pub email: Option<String>,

    pub phone: Option<String>,

    pub bridal_party: bool,

    /// Invitation-list provenance flags; `None` leaves the stored value
    /// untouched on update (the admin form does not carry them).
    pub nz_invite: Option<bool>,
    pub my_invite: Option<bool>,

    pub table_number: Option<i32>,

    pub notes: Option<String>,
}

impl GuestInput {
    /// Trim string fields and collapse empty optionals to `None`.
    #[must_use]
    pub fn normalized(self) -> Self {
        let clean = |value: Option<String>| {
            value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
        };

        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: clean(self.email),
            phone: clean(self.phone),
            notes: clean(self.notes),
            ..self
        }
    }
}

/// Guest management service.
#[derive(Clone)]
pub struct GuestService {
    repo: GuestRepository,
    base_url: String,
    guest_password: String,
}

impl GuestService {
    /// Create a new guest service.
    #[must_use]
    pub fn new(repo: GuestRepository, config: &Config) -> Self {
        Self {
            repo,
            base_url: config.server.url.trim_end_matches('/').to_string(),
            guest_password: config.site.guest_password.clone(),
        }
    }

    /// Build the guest-facing RSVP URL for a token.
    #[must_use]
    pub fn rsvp_url(&self, token: &str) -> String {
        format!("{}/rsvp/{token}", self.base_url)
    }

    /// Create a guest with `invited_at = now` and a fresh unique token.
    pub async fn create(&self, input: GuestInput) -> AppResult<guest::Model> {
        let input = input.normalized();
        input.validate()?;

        if self
            .repo
            .find_by_name(&input.first_name, &input.last_name)
            .await?
            .is_some()
        {
            return Err(AppError::DuplicateGuest(format!(
                "{} {}",
                input.first_name, input.last_name
            )));
        }

        let token = allocate_token(&self.repo).await?;
        let now = Utc::now();

        let model = guest::ActiveModel {
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            email: Set(input.email),
            phone: Set(input.phone),
            bridal_party: Set(input.bridal_party),
            nz_invite: Set(input.nz_invite.unwrap_or(false)),
            my_invite: Set(input.my_invite.unwrap_or(false)),
            dinner: Set(false),
            rsvp: Set(None),
            rsvp_others_yes: Set(None),
            rsvp_others_no: Set(None),
            rsvp_date: Set(None),
            rsvp_token: Set(Some(token)),
            invited_at: Set(Some(now)),
            rsvp_viewed_at: Set(None),
            table_number: Set(input.table_number),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(None),
            ..Default::default()
        };

        self.repo.create(model).await
    }

    /// Update a guest, re-checking name uniqueness when the name changed.
    pub async fn update(&self, id: i32, input: GuestInput) -> AppResult<guest::Model> {
        let input = input.normalized();
        input.validate()?;

        let current = self.repo.get_by_id(id).await?;

        let name_changed =
            input.first_name != current.first_name || input.last_name != current.last_name;
        if name_changed
            && let Some(other) = self
                .repo
                .find_by_name(&input.first_name, &input.last_name)
                .await?
            && other.id != id
        {
            return Err(AppError::DuplicateGuest(format!(
                "{} {}",
                input.first_name, input.last_name
            )));
        }

        let mut active = current.into_active_model();
        active.first_name = Set(input.first_name);
        active.last_name = Set(input.last_name);
        active.email = Set(input.email);
        active.phone = Set(input.phone);
        active.bridal_party = Set(input.bridal_party);
        if let Some(nz) = input.nz_invite {
            active.nz_invite = Set(nz);
        }
        if let Some(my) = input.my_invite {
            active.my_invite = Set(my);
        }
        active.table_number = Set(input.table_number);
        active.notes = Set(input.notes);
        active.updated_at = Set(Some(Utc::now()));

        self.repo.update(active).await
    }

    /// Hard-delete a guest.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repo.delete(id).await
    }

    /// Fetch a guest by ID.
    pub async fn get(&self, id: i32) -> AppResult<guest::Model> {
        self.repo.get_by_id(id).await
    }

    /// List all guests ordered by (last name, first name).
    pub async fn list(&self) -> AppResult<Vec<guest::Model>> {
        self.repo.list().await
    }

    /// Authenticate a guest by name pair and the shared site password.
    ///
    /// Names are case-normalized (first letter upper, rest lower) the
    /// way the invitation list stores them.
    pub async fn authenticate(
        &self,
        first_name: &str,
        last_name: &str,
        password: &str,
    ) -> AppResult<guest::Model> {
        let first = normalize_name_case(first_name);
        let last = normalize_name_case(last_name);

        let guest = self
            .repo
            .find_by_name(&first, &last)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !password_matches(password, &self.guest_password) {
            return Err(AppError::InvalidCredentials);
        }

        Ok(guest)
    }

    /// Assign fresh unique tokens to guests that have none.
    ///
    /// Returns the number of rows updated.
    pub async fn backfill_tokens(&self) -> AppResult<usize> {
        let missing = self.repo.list_without_token().await?;
        let mut updated = 0;

        for guest in missing {
            let token = allocate_token(&self.repo).await?;
            let mut active = guest.into_active_model();
            active.rsvp_token = Set(Some(token));
            active.invited_at = Set(Some(Utc::now()));
            self.repo.update(active).await?;
            updated += 1;
        }

        Ok(updated)
    }
}

/// First letter uppercase, rest lowercase.
fn normalize_name_case(name: &str) -> String {
    let trimmed = name.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use banquet_common::config::{
        AdminConfig, DatabaseConfig, ImportConfig, ServerConfig, SiteConfig,
    };
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn test_config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                url: "https://wedding.example.com".to_string(),
            },
            database: DatabaseConfig {
                url: "postgres://localhost/test".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            admin: AdminConfig {
                password: "admin-pass".to_string(),
                session_secret: "session-secret".to_string(),
                session_ttl_hours: 24,
                cookie_name: "admin_session".to_string(),
                cookie_secure: false,
            },
            site: SiteConfig {
                guest_password: "celebrate".to_string(),
            },
            import: ImportConfig::default(),
        }
    }

    fn mock_guest(id: i32, first: &str, last: &str) -> guest::Model {
        guest::Model {
            id,
            first_name: first.to_string(),
            last_name: last.to_string(),
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
            rsvp_token: Some("0123456789abcdef01234567".to_string()),
            invited_at: Some(Utc::now()),
            rsvp_viewed_at: None,
            table_number: None,
            notes: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn input(first: &str, last: &str) -> GuestInput {
        GuestInput {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: None,
            phone: None,
            bridal_party: false,
            nz_invite: None,
            my_invite: None,
            table_number: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_name_pair() {
        let existing = mock_guest(1, "An", "Nguyen");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );

        let service = GuestService::new(GuestRepository::new(db), &test_config());
        let result = service.create(input("An", "Nguyen")).await;

        assert!(matches!(result, Err(AppError::DuplicateGuest(_))));
    }

    #[tokio::test]
    async fn test_create_sets_token_and_invited_at() {
        let created = mock_guest(7, "An", "Nguyen");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // name check, token check, insert returning
                .append_query_results([
                    Vec::<guest::Model>::new(),
                    Vec::new(),
                    vec![created.clone()],
                ])
                .append_exec_results([MockExecResult {
                    last_insert_id: 7,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let service = GuestService::new(GuestRepository::new(db), &test_config());
        let guest = service.create(input("An", "Nguyen")).await.unwrap();

        assert_eq!(guest.id, 7);
        assert!(guest.rsvp.is_none());
        assert!(guest.invited_at.is_some());
        assert_eq!(guest.rsvp_token.as_deref().map(str::len), Some(24));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_first_name() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = GuestService::new(GuestRepository::new(db), &test_config());

        let result = service.create(input("   ", "Nguyen")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_malformed_email() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = GuestService::new(GuestRepository::new(db), &test_config());

        let mut bad = input("An", "Nguyen");
        bad.email = Some("not-an-email".to_string());

        let result = service.create(bad).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_rejects_name_collision_with_other_guest() {
        let current = mock_guest(1, "An", "Nguyen");
        let other = mock_guest(2, "Binh", "Tran");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![current], vec![other]])
                .into_connection(),
        );

        let service = GuestService::new(GuestRepository::new(db), &test_config());
        let result = service.update(1, input("Binh", "Tran")).await;

        assert!(matches!(result, Err(AppError::DuplicateGuest(_))));
    }

    #[tokio::test]
    async fn test_update_missing_guest_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<guest::Model>::new()])
                .into_connection(),
        );

        let service = GuestService::new(GuestRepository::new(db), &test_config());
        let result = service.update(99, input("An", "Nguyen")).await;

        assert!(matches!(result, Err(AppError::GuestNotFound(_))));
    }

    #[tokio::test]
    async fn test_authenticate_normalizes_name_case() {
        let guest = mock_guest(1, "An", "Nguyen");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[guest]])
                .into_connection(),
        );

        let service = GuestService::new(GuestRepository::new(db), &test_config());
        let found = service
            .authenticate("aN", "nGUYEN", "celebrate")
            .await
            .unwrap();

        assert_eq!(found.first_name, "An");
    }

    #[tokio::test]
    async fn test_authenticate_rejects_wrong_password() {
        let guest = mock_guest(1, "An", "Nguyen");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[guest]])
                .into_connection(),
        );

        let service = GuestService::new(GuestRepository::new(db), &test_config());
        let result = service.authenticate("An", "Nguyen", "wrong").await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_guest_is_invalid_credentials() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<guest::Model>::new()])
                .into_connection(),
        );

        let service = GuestService::new(GuestRepository::new(db), &test_config());
        let result = service.authenticate("Ghost", "Guest", "celebrate").await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[test]
    fn test_rsvp_url_derivation() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = GuestService::new(GuestRepository::new(db), &test_config());

        assert_eq!(
            service.rsvp_url("0123456789abcdef01234567"),
            "https://wedding.example.com/rsvp/0123456789abcdef01234567"
        );
    }

    #[test]
    fn test_normalize_name_case() {
        assert_eq!(normalize_name_case("aN"), "An");
        assert_eq!(normalize_name_case("  NGUYEN "), "Nguyen");
        assert_eq!(normalize_name_case(""), "");
    }
}
