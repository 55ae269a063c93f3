//! Admin session service.
//!
//! Wraps the stateless sign/verify primitives with the configured
//! password, signing secret, and cookie parameters. There is no
//! server-side session table; see the design notes on logout.

use banquet_common::{
    AdminClaims, AppError, AppResult, Config, issue_session_token, password_matches,
    verify_session_token,
};
use chrono::Utc;

/// Admin session service.
#[derive(Clone)]
pub struct SessionService {
    password: String,
    secret: String,
    ttl_hours: i64,
    cookie_name: String,
    cookie_secure: bool,
}

impl SessionService {
    /// Create a new session service from configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            password: config.admin.password.clone(),
            secret: config.admin.session_secret.clone(),
            ttl_hours: config.admin.session_ttl_hours,
            cookie_name: config.admin.cookie_name.clone(),
            cookie_secure: config.admin.cookie_secure,
        }
    }

    /// Check the shared admin password and issue a session token.
    pub fn login(&self, password: &str) -> AppResult<String> {
        if !password_matches(password, &self.password) {
            return Err(AppError::InvalidCredentials);
        }

        issue_session_token(&self.secret, Utc::now(), self.ttl_hours)
    }

    /// Verify a session token's signature and expiry.
    pub fn verify(&self, token: &str) -> AppResult<AdminClaims> {
        verify_session_token(token, &self.secret)
    }

    /// Name of the session cookie.
    #[must_use]
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Session lifetime in hours.
    #[must_use]
    pub const fn ttl_hours(&self) -> i64 {
        self.ttl_hours
    }

    /// Whether the session cookie carries the `Secure` attribute.
    #[must_use]
    pub const fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use banquet_common::config::{
        AdminConfig, DatabaseConfig, ImportConfig, ServerConfig, SiteConfig,
    };

    fn service() -> SessionService {
        SessionService::new(&Config {
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
        })
    }

    #[test]
    fn test_login_issues_verifiable_token() {
        let service = service();
        let token = service.login("admin-pass").unwrap();
        let claims = service.verify(&token).unwrap();
        assert!(claims.admin);
    }

    #[test]
    fn test_login_rejects_wrong_password() {
        let result = service().login("guessed");
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[test]
    fn test_verify_rejects_foreign_token() {
        let service = service();
        let foreign =
            issue_session_token("some-other-secret", Utc::now(), 24).unwrap();
        assert!(matches!(
            service.verify(&foreign),
            Err(AppError::Unauthorized)
        ));
    }
}
