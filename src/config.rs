//! Configuration types.

use std::time::Duration;

use uuid::Uuid;

/// Registration service configuration, built from environment variables.
#[derive(Debug, Clone)]
pub struct RegistrationConfig {
    /// Port the REST surface listens on.
    pub bind_port: u16,
    /// Path of the draft database file.
    pub db_path: String,
    /// Endpoint the finalized record is posted to.
    pub transport_endpoint: String,
    /// Request timeout for the submit call.
    pub submit_timeout: Duration,
    /// Session identifier for the active registration.
    pub session: String,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            bind_port: 8080,
            db_path: "./data/registration.db".to_string(),
            transport_endpoint: "http://localhost:9000/api/registrations".to_string(),
            submit_timeout: Duration::from_secs(30),
            session: Uuid::new_v4().to_string(),
        }
    }
}

impl RegistrationConfig {
    /// Build config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let bind_port: u16 = std::env::var("REGISTRATION_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.bind_port);

        let db_path =
            std::env::var("REGISTRATION_DB_PATH").unwrap_or(defaults.db_path);

        let transport_endpoint = std::env::var("REGISTRATION_SUBMIT_ENDPOINT")
            .unwrap_or(defaults.transport_endpoint);

        let submit_timeout = std::env::var("REGISTRATION_SUBMIT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.submit_timeout);

        // A stable session id lets a reload pick its draft back up.
        let session = std::env::var("REGISTRATION_SESSION").unwrap_or(defaults.session);

        Self {
            bind_port,
            db_path,
            transport_endpoint,
            submit_timeout,
            session,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = RegistrationConfig::default();
        assert_eq!(config.bind_port, 8080);
        assert_eq!(config.submit_timeout, Duration::from_secs(30));
        assert!(!config.session.is_empty());
    }

    #[test]
    fn fresh_defaults_get_distinct_sessions() {
        let a = RegistrationConfig::default();
        let b = RegistrationConfig::default();
        assert_ne!(a.session, b.session);
    }
}
