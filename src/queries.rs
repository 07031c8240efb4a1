use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use cqrs_es::{DomainEvent, EventEnvelope, Query, View};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::events::BookingEvent;
use crate::domain::form::BookingForm;
use crate::domain::model::FlightBooking;
use crate::domain::step::{StepProgress, WizardStep, progress};
use crate::domain::wizard::{BookingWizard, WizardState};

// The read model of a booking session, shaped after what a form renderer
// needs: the current step, the values and flags, and what the last command
// did.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingView {
    pub id: Uuid,
    pub state: WizardState,
    pub current_step: WizardStep,
    pub form: BookingForm,
    pub submitted_booking: Option<FlightBooking>,
    pub last_outcome: Option<String>,
    pub version: usize,
}

impl BookingView {
    #[must_use]
    pub fn progress(&self) -> Vec<StepProgress> {
        progress(self.current_step)
    }
}

// This updates the view with events as they are committed. The form is
// replayed with the same operations the aggregate uses, so flags and
// values match.
impl View<BookingWizard> for BookingView {
    fn update(&mut self, event: &EventEnvelope<BookingWizard>) {
        match &event.payload {
            BookingEvent::Started { id } => {
                self.id = *id;
                self.state = WizardState::InProgress;
            }
            BookingEvent::FieldEdited { path, value } => self.form.edit(path, value),
            BookingEvent::FieldTouched { path } => self.form.touch(path),
            BookingEvent::PaymentMethodSelected { method } => self.form.switch_payment(*method),
            BookingEvent::PassengerListResized { .. } => self.form.sync_passengers(),
            BookingEvent::StepChanged { to_step, .. } => self.current_step = *to_step,
            BookingEvent::AdvanceBlocked { step } | BookingEvent::SubmissionBlocked { step } => {
                self.form.touch_step(*step);
            }
            BookingEvent::PostalCodeLookedUp { .. } => {}
            BookingEvent::AddressAutofilled { address } => {
                self.form.autofill_address(address);
            }
            BookingEvent::Submitted { booking } => {
                self.state = WizardState::Submitted;
                self.submitted_booking = Some(booking.clone());
            }
            BookingEvent::Reset => {
                self.state = WizardState::InProgress;
                self.current_step = WizardStep::default();
                self.form.reset();
                self.submitted_booking = None;
            }
        }
        self.last_outcome = Some(event.payload.event_type());
        self.version = event.sequence;
    }
}

/// In-memory store of booking views, kept current as events are committed.
#[derive(Clone, Default)]
pub struct BookingViewStore {
    views: Arc<RwLock<HashMap<String, BookingView>>>,
}

impl BookingViewStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a booking view by aggregate id.
    pub async fn load(&self, booking_id: &str) -> Option<BookingView> {
        self.views.read().await.get(booking_id).cloned()
    }

    /// All booking views, in no particular order.
    pub async fn load_all(&self) -> Vec<BookingView> {
        self.views.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl Query<BookingWizard> for BookingViewStore {
    async fn dispatch(&self, view_id: &str, events: &[EventEnvelope<BookingWizard>]) {
        let mut views = self.views.write().await;
        let view = views.entry(view_id.to_string()).or_default();
        for event in events {
            if event.sequence <= view.version {
                tracing::warn!(
                    "Skipping stale event {} for booking view {view_id}",
                    event.sequence
                );
                continue;
            }
            view.update(event);
        }
    }
}
