use chrono::{DateTime, Utc};
use cqrs_es::DomainEvent;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::model::FlightBooking;
use crate::domain::payment::PaymentMethod;
use crate::domain::step::WizardStep;
use crate::services::postal_lookup::PostalAddress;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum BookingEvent {
    Started {
        id: Uuid,
    },
    FieldEdited {
        path: String,
        value: Value,
    },
    FieldTouched {
        path: String,
    },
    PaymentMethodSelected {
        method: PaymentMethod,
    },
    PassengerListResized {
        from_len: usize,
        to_len: usize,
    },
    StepChanged {
        from_step: WizardStep,
        to_step: WizardStep,
    },
    AdvanceBlocked {
        step: WizardStep,
    },
    PostalCodeLookedUp {
        zip_code: String,
        at: DateTime<Utc>,
    },
    AddressAutofilled {
        address: PostalAddress,
    },
    Submitted {
        booking: FlightBooking,
    },
    SubmissionBlocked {
        step: WizardStep,
    },
    Reset,
}

impl DomainEvent for BookingEvent {
    fn event_type(&self) -> String {
        let event_type: &str = match self {
            BookingEvent::Started { .. } => "BookingStarted",
            BookingEvent::FieldEdited { .. } => "FieldEdited",
            BookingEvent::FieldTouched { .. } => "FieldTouched",
            BookingEvent::PaymentMethodSelected { .. } => "PaymentMethodSelected",
            BookingEvent::PassengerListResized { .. } => "PassengerListResized",
            BookingEvent::StepChanged { .. } => "StepChanged",
            BookingEvent::AdvanceBlocked { .. } => "AdvanceBlocked",
            BookingEvent::PostalCodeLookedUp { .. } => "PostalCodeLookedUp",
            BookingEvent::AddressAutofilled { .. } => "AddressAutofilled",
            BookingEvent::Submitted { .. } => "BookingSubmitted",
            BookingEvent::SubmissionBlocked { .. } => "SubmissionBlocked",
            BookingEvent::Reset => "BookingReset",
        };
        event_type.to_string()
    }

    fn event_version(&self) -> String {
        "1.0".to_string()
    }
}
