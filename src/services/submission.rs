use async_trait::async_trait;

use crate::domain::model::FlightBooking;

/// Receives a booking once every step validates.
#[async_trait]
pub trait BookingSubmission: Send + Sync {
    async fn submit(
        &self,
        booking: &FlightBooking,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Stand-in for a booking backend: writes the booking to the log.
pub struct LoggingSubmission;

#[async_trait]
impl BookingSubmission for LoggingSubmission {
    async fn submit(
        &self,
        booking: &FlightBooking,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let payload = serde_json::to_string_pretty(booking)?;
        tracing::info!("Submitting booking:\n{payload}");
        Ok(())
    }
}
