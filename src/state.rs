use std::sync::Arc;

use crate::config::{BookingCqrs, ConfigError, Settings, booking_framework};
use crate::queries::BookingViewStore;

#[derive(Clone)]
pub struct ApplicationState {
    pub cqrs: Arc<BookingCqrs>,
    pub booking_query: BookingViewStore,
}

/// Configure the CQRS framework, backed by an in-memory event store, along
/// with two queries:
/// - a simple query that logs events as they are published
/// - `booking_query` keeps the current view of each booking
///
/// # Errors
/// Returns an error if the settings or services are invalid.
pub fn new_application_state() -> Result<ApplicationState, ConfigError> {
    let settings = Settings::from_env()?;
    let (cqrs, booking_query) = booking_framework(&settings)?;
    Ok(ApplicationState {
        cqrs,
        booking_query,
    })
}
