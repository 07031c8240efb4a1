use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cqrs_es::Aggregate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::commands::BookingCommand;
use crate::domain::events::BookingEvent;
use crate::domain::form::{BookingForm, FieldError, PAYMENT_METHOD_FIELD};
use crate::domain::payment::PaymentMethod;
use crate::domain::step::{StepProgress, WizardStep, progress};
use crate::domain::validation::ValidationContext;
use crate::services::clock::Clock;
use crate::services::postal_lookup::{PostalCodeLookup, normalize_postal_code};
use crate::services::submission::BookingSubmission;
use crate::utils::{FieldPathError, get_field};

/// One booking session: the form being filled in and the step it is on.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct BookingWizard {
    id: Uuid,
    state: WizardState,
    current_step: WizardStep,
    form: BookingForm,
    last_postal_lookup: Option<PostalLookupRecord>,
}

#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum WizardState {
    #[default]
    InProgress,
    Submitted,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostalLookupRecord {
    pub zip_code: String,
    pub at: DateTime<Utc>,
}

#[async_trait]
impl Aggregate for BookingWizard {
    type Command = BookingCommand;
    type Event = BookingEvent;
    type Error = BookingError;
    type Services = BookingServices;

    // This identifier should be unique to the system.
    fn aggregate_type() -> String {
        "BookingWizard".to_string()
    }

    async fn handle(
        &self,
        command: Self::Command,
        services: &Self::Services,
    ) -> Result<Vec<Self::Event>, Self::Error> {
        // One start per session, whatever id it carries.
        if let BookingCommand::Start { id } = command {
            return if self.id != Uuid::default() {
                Err(BookingError::AlreadyStarted)
            } else {
                Ok(vec![BookingEvent::Started { id }])
            };
        }

        if self.id == Uuid::default() {
            return Err(BookingError::NotFound);
        }
        if let BookingCommand::Reset = command {
            return Ok(vec![BookingEvent::Reset]);
        }
        if self.state == WizardState::Submitted {
            return Err(BookingError::AlreadySubmitted);
        }

        let context = services.validation_context();
        match command {
            BookingCommand::EditField { path, value } => {
                if path == PAYMENT_METHOD_FIELD {
                    let method: PaymentMethod =
                        serde_json::from_value(value).map_err(|e| FieldError::InvalidValue {
                            path,
                            reason: e.to_string(),
                        })?;
                    return Ok(vec![BookingEvent::PaymentMethodSelected { method }]);
                }
                self.form.check_edit(&path, &value)?;
                Ok(vec![BookingEvent::FieldEdited { path, value }])
            }
            BookingCommand::TouchField { path } => {
                if get_field(&self.form.to_value(), &path).is_none() {
                    return Err(FieldError::Path(FieldPathError::NotFound(path)).into());
                }
                Ok(vec![BookingEvent::FieldTouched { path }])
            }
            BookingCommand::SelectPaymentMethod { method } => {
                Ok(vec![BookingEvent::PaymentMethodSelected { method }])
            }
            BookingCommand::LookupPostalCode { zip_code } => {
                Ok(self.lookup_postal_code(&zip_code, services).await)
            }
            BookingCommand::Advance => {
                let step = self.current_step;
                if !self.form.step_valid(step, &context) {
                    return Ok(vec![BookingEvent::AdvanceBlocked { step }]);
                }

                let mut events = Vec::new();
                if step == WizardStep::FlightDetails {
                    let from_len = self.form.booking().passenger_details.len();
                    let to_len = self.form.booking().flight_details.passengers.seated();
                    if from_len != to_len {
                        events.push(BookingEvent::PassengerListResized { from_len, to_len });
                    }
                }
                let next = step.next();
                if next != step {
                    events.push(BookingEvent::StepChanged {
                        from_step: step,
                        to_step: next,
                    });
                }
                Ok(events)
            }
            BookingCommand::Retreat => {
                let step = self.current_step;
                let previous = step.previous();
                if previous == step {
                    Ok(vec![])
                } else {
                    Ok(vec![BookingEvent::StepChanged {
                        from_step: step,
                        to_step: previous,
                    }])
                }
            }
            BookingCommand::Submit => {
                if !self.form.is_valid(&context) {
                    return Ok(vec![BookingEvent::SubmissionBlocked {
                        step: self.current_step,
                    }]);
                }
                let booking = self.form.booking().clone();
                services
                    .submission()
                    .submit(&booking)
                    .await
                    .map_err(|e| BookingError::SubmissionFailed(e.to_string()))?;
                Ok(vec![BookingEvent::Submitted { booking }])
            }
            BookingCommand::Start { .. } | BookingCommand::Reset => Ok(vec![]),
        }
    }

    fn apply(&mut self, event: Self::Event) {
        match event {
            BookingEvent::Started { id } => {
                self.id = id;
                self.state = WizardState::InProgress;
            }
            BookingEvent::FieldEdited { path, value } => {
                self.form.edit(&path, &value);
            }
            BookingEvent::FieldTouched { path } => {
                self.form.touch(&path);
            }
            BookingEvent::PaymentMethodSelected { method } => {
                self.form.switch_payment(method);
            }
            BookingEvent::PassengerListResized { .. } => {
                self.form.sync_passengers();
            }
            BookingEvent::StepChanged { to_step, .. } => {
                self.current_step = to_step;
            }
            BookingEvent::AdvanceBlocked { step } | BookingEvent::SubmissionBlocked { step } => {
                self.form.touch_step(step);
            }
            BookingEvent::PostalCodeLookedUp { zip_code, at } => {
                self.last_postal_lookup = Some(PostalLookupRecord { zip_code, at });
            }
            BookingEvent::AddressAutofilled { address } => {
                self.form.autofill_address(&address);
            }
            BookingEvent::Submitted { .. } => {
                self.state = WizardState::Submitted;
            }
            BookingEvent::Reset => {
                self.state = WizardState::InProgress;
                self.current_step = WizardStep::default();
                self.form.reset();
                self.last_postal_lookup = None;
            }
        }
    }
}

impl BookingWizard {
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn state(&self) -> WizardState {
        self.state
    }

    #[must_use]
    pub fn current_step(&self) -> WizardStep {
        self.current_step
    }

    #[must_use]
    pub fn form(&self) -> &BookingForm {
        &self.form
    }

    #[must_use]
    pub fn progress(&self) -> Vec<StepProgress> {
        progress(self.current_step)
    }

    async fn lookup_postal_code(
        &self,
        zip_code: &str,
        services: &BookingServices,
    ) -> Vec<BookingEvent> {
        let Some(zip_code) = normalize_postal_code(zip_code) else {
            return vec![];
        };
        if self.form.booking().payment.method() != PaymentMethod::Boleto {
            tracing::debug!("Skipping postal code lookup, payment method is not boleto");
            return vec![];
        }

        let now = services.clock().now();
        if let Some(last) = &self.last_postal_lookup {
            let elapsed = (now - last.at).to_std().unwrap_or_default();
            if last.zip_code == zip_code && elapsed < services.lookup_debounce() {
                tracing::debug!("Suppressing repeated lookup of postal code {zip_code}");
                return vec![];
            }
        }

        let address = services.postal_lookup().lookup(&zip_code).await;
        let mut events = vec![BookingEvent::PostalCodeLookedUp { zip_code, at: now }];
        if let Some(address) = address {
            events.push(BookingEvent::AddressAutofilled { address });
        }
        events
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum BookingError {
    #[error("Booking not found")]
    NotFound,
    #[error("Booking already started")]
    AlreadyStarted,
    #[error("Booking already submitted")]
    AlreadySubmitted,
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error("Submission failed: {0}")]
    SubmissionFailed(String),
}

pub struct BookingServices {
    postal_lookup: Arc<dyn PostalCodeLookup>,
    submission: Arc<dyn BookingSubmission>,
    clock: Arc<dyn Clock>,
    lookup_debounce: Duration,
}

impl BookingServices {
    pub fn new(
        postal_lookup: Arc<dyn PostalCodeLookup>,
        submission: Arc<dyn BookingSubmission>,
        clock: Arc<dyn Clock>,
        lookup_debounce: Duration,
    ) -> Self {
        Self {
            postal_lookup,
            submission,
            clock,
            lookup_debounce,
        }
    }

    #[must_use]
    pub fn postal_lookup(&self) -> &Arc<dyn PostalCodeLookup> {
        &self.postal_lookup
    }

    #[must_use]
    pub fn submission(&self) -> &Arc<dyn BookingSubmission> {
        &self.submission
    }

    #[must_use]
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    #[must_use]
    pub fn lookup_debounce(&self) -> Duration {
        self.lookup_debounce
    }

    #[must_use]
    pub fn validation_context(&self) -> ValidationContext {
        ValidationContext {
            today: self.clock.today(),
        }
    }
}
