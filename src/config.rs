use std::sync::Arc;
use std::time::Duration;

use cqrs_es::mem_store::MemStore;
use cqrs_es::{CqrsFramework, Query};
use thiserror::Error;

use crate::SimpleLoggingQuery;
use crate::domain::wizard::{BookingServices, BookingWizard};
use crate::queries::BookingViewStore;
use crate::services::clock::SystemClock;
use crate::services::postal_lookup::{ViaCepClient, ViaCepError};
use crate::services::submission::LoggingSubmission;

pub type BookingCqrs = CqrsFramework<BookingWizard, MemStore<BookingWizard>>;

const DEFAULT_VIACEP_BASE_URL: &str = "https://viacep.com.br/ws/";
const DEFAULT_LOOKUP_DEBOUNCE_MS: u64 = 200;
const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub viacep_base_url: String,
    pub lookup_debounce: Duration,
    pub lookup_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            viacep_base_url: DEFAULT_VIACEP_BASE_URL.to_string(),
            lookup_debounce: Duration::from_millis(DEFAULT_LOOKUP_DEBOUNCE_MS),
            lookup_timeout: Duration::from_secs(DEFAULT_LOOKUP_TIMEOUT_SECS),
        }
    }
}

impl Settings {
    /// Read settings from the environment, after loading a `.env` file if
    /// there is one. Unset variables take their defaults.
    ///
    /// # Errors
    /// Returns an error if a numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let number = |name: &'static str| -> Result<Option<u64>, ConfigError> {
            var(name)
                .map(|raw| {
                    raw.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
                        name,
                        value: raw.clone(),
                    })
                })
                .transpose()
        };

        Ok(Self {
            viacep_base_url: var("VIACEP_BASE_URL").unwrap_or(defaults.viacep_base_url),
            lookup_debounce: number("POSTAL_LOOKUP_DEBOUNCE_MS")?
                .map_or(defaults.lookup_debounce, Duration::from_millis),
            lookup_timeout: number("POSTAL_LOOKUP_TIMEOUT_SECS")?
                .map_or(defaults.lookup_timeout, Duration::from_secs),
        })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {name}")]
    Invalid { name: &'static str, value: String },
    #[error("Cannot build postal code client: {0}")]
    PostalLookup(#[from] ViaCepError),
}

/// Production services: ViaCEP lookups, logged submissions and the system
/// clock.
///
/// # Errors
/// Returns an error if the HTTP client cannot be built.
pub fn booking_services(settings: &Settings) -> Result<BookingServices, ConfigError> {
    let postal_lookup = ViaCepClient::new(&settings.viacep_base_url, settings.lookup_timeout)?;
    Ok(BookingServices::new(
        Arc::new(postal_lookup),
        Arc::new(LoggingSubmission),
        Arc::new(SystemClock),
        settings.lookup_debounce,
    ))
}

/// # Errors
/// Returns an error if the services cannot be built.
pub fn booking_framework(
    settings: &Settings,
) -> Result<(Arc<BookingCqrs>, BookingViewStore), ConfigError> {
    Ok(booking_framework_with(booking_services(settings)?))
}

pub fn booking_framework_with(services: BookingServices) -> (Arc<BookingCqrs>, BookingViewStore) {
    // A very simple query that writes each event to the log.
    let simple_query = SimpleLoggingQuery;

    // A query that keeps the current state of each booking in memory.
    let view_store = BookingViewStore::new();

    let queries: Vec<Box<dyn Query<BookingWizard>>> =
        vec![Box::new(simple_query), Box::new(view_store.clone())];
    let store = MemStore::<BookingWizard>::default();
    (
        Arc::new(CqrsFramework::new(store, queries, services)),
        view_store,
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings_from(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Settings::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings_from(&[]).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.viacep_base_url, "https://viacep.com.br/ws/");
        assert_eq!(settings.lookup_debounce, Duration::from_millis(200));
        assert_eq!(settings.lookup_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_overrides() {
        let settings = settings_from(&[
            ("VIACEP_BASE_URL", "http://localhost:8080/ws"),
            ("POSTAL_LOOKUP_DEBOUNCE_MS", "500"),
            ("POSTAL_LOOKUP_TIMEOUT_SECS", " 2 "),
        ])
        .unwrap();

        assert_eq!(settings.viacep_base_url, "http://localhost:8080/ws");
        assert_eq!(settings.lookup_debounce, Duration::from_millis(500));
        assert_eq!(settings.lookup_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_invalid_number() {
        let err = settings_from(&[("POSTAL_LOOKUP_DEBOUNCE_MS", "soon")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                name: "POSTAL_LOOKUP_DEBOUNCE_MS",
                ..
            }
        ));
    }
}
