use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::booking_schema::booking_schema;
use crate::domain::model::FlightBooking;
use crate::domain::passengers::sync_passenger_list;
use crate::domain::payment::{Payment, PaymentMethod};
use crate::domain::step::WizardStep;
use crate::domain::validation::{Schema, ValidationContext, ValidationReport};
use crate::services::postal_lookup::PostalAddress;
use crate::utils::{FieldPathError, set_field};

pub const PAYMENT_METHOD_FIELD: &str = "payment.method";
/// Follows the card variant; credit and debit are chosen through the method.
pub const CARD_TYPE_FIELD: &str = "payment.cardType";
const PASSENGER_LIST_FIELD: &str = "passengerDetails";

/// Interaction flags of a single field.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldInteraction {
    /// The field lost focus at least once.
    pub touched: bool,
    /// The field was edited at least once.
    pub dirty: bool,
}

/// The booking being entered plus the interaction flags of its fields.
///
/// Validity is never stored; every query evaluates the schema for the current
/// booking shape, so it cannot go stale after a mutation.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingForm {
    booking: FlightBooking,
    interactions: BTreeMap<String, FieldInteraction>,
}

impl BookingForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn booking(&self) -> &FlightBooking {
        &self.booking
    }

    #[must_use]
    pub fn interaction(&self, field_path: &str) -> FieldInteraction {
        self.interactions
            .get(field_path)
            .copied()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn schema(&self) -> Schema {
        booking_schema(&self.booking)
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(&self.booking).unwrap_or_default()
    }

    #[must_use]
    pub fn validate(&self, context: &ValidationContext) -> ValidationReport {
        self.schema().evaluate(&self.to_value(), context)
    }

    /// The field currently fails one of its rules.
    #[must_use]
    pub fn invalid(&self, field_path: &str, context: &ValidationContext) -> bool {
        self.validate(context).invalid(field_path)
    }

    /// Message of the first failing rule, shown or not.
    #[must_use]
    pub fn field_error(&self, field_path: &str, context: &ValidationContext) -> Option<String> {
        self.validate(context).error(field_path).map(str::to_string)
    }

    /// The field fails a rule and the user has interacted with it.
    #[must_use]
    pub fn is_field_invalid(&self, field_path: &str, context: &ValidationContext) -> bool {
        let interaction = self.interaction(field_path);
        (interaction.touched || interaction.dirty) && self.invalid(field_path, context)
    }

    /// Error text to render next to the field, if any.
    #[must_use]
    pub fn visible_error(&self, field_path: &str, context: &ValidationContext) -> Option<String> {
        if self.is_field_invalid(field_path, context) {
            self.field_error(field_path, context)
        } else {
            None
        }
    }

    #[must_use]
    pub fn step_valid(&self, step: WizardStep, context: &ValidationContext) -> bool {
        let report = self.validate(context);
        step_valid_in(&report, step, &self.booking)
    }

    #[must_use]
    pub fn is_valid(&self, context: &ValidationContext) -> bool {
        let report = self.validate(context);
        WizardStep::ALL
            .into_iter()
            .all(|step| step_valid_in(&report, step, &self.booking))
    }

    /// Work out the booking that editing `field_path` would produce.
    ///
    /// # Errors
    /// Returns an error if the path does not address an editable value or the
    /// value does not fit the field.
    pub fn check_edit(&self, field_path: &str, value: &Value) -> Result<FlightBooking, FieldError> {
        if [PASSENGER_LIST_FIELD, PAYMENT_METHOD_FIELD, CARD_TYPE_FIELD].contains(&field_path) {
            return Err(FieldError::NotEditable(field_path.to_string()));
        }

        let mut data = self.to_value();
        set_field(&mut data, field_path, value.clone())?;
        serde_json::from_value(data).map_err(|e| FieldError::InvalidValue {
            path: field_path.to_string(),
            reason: e.to_string(),
        })
    }

    /// Store an edit and mark the field dirty. Edits that `check_edit` would
    /// reject leave the booking unchanged.
    pub fn edit(&mut self, field_path: &str, value: &Value) {
        match self.check_edit(field_path, value) {
            Ok(booking) => {
                self.booking = booking;
                self.mark_dirty(field_path);
            }
            Err(e) => tracing::warn!("Ignoring edit of '{field_path}': {e}"),
        }
    }

    pub fn touch(&mut self, field_path: &str) {
        self.interactions
            .entry(field_path.to_string())
            .or_default()
            .touched = true;
    }

    fn mark_dirty(&mut self, field_path: &str) {
        self.interactions
            .entry(field_path.to_string())
            .or_default()
            .dirty = true;
    }

    /// Touch every field of a step so that all of its errors become visible.
    pub fn touch_step(&mut self, step: WizardStep) {
        let schema = self.schema();
        for path in schema.paths_in(step.group()) {
            self.touch(path);
        }
    }

    /// Resize the passenger list to the current counts.
    ///
    /// Flags of dropped entries go with them.
    pub fn sync_passengers(&mut self) {
        let passengers = self.booking.flight_details.passengers;
        sync_passenger_list(&passengers, &mut self.booking.passenger_details);

        let kept = self.booking.passenger_details.len();
        self.interactions.retain(|path, _| {
            passenger_index(path).is_none_or(|index| index < kept)
        });
    }

    /// Replace the payment record with a fresh one for `method`.
    pub fn switch_payment(&mut self, method: PaymentMethod) {
        self.booking.payment = Payment::for_method(method);
        self.interactions
            .retain(|path, _| WizardStep::for_field(path) != Some(WizardStep::Payment));
        self.mark_dirty(PAYMENT_METHOD_FIELD);
    }

    /// Fill the looked-up parts of the boleto address. Number, complement and
    /// zip code stay as entered.
    ///
    /// Returns false when the active payment has no boleto address.
    pub fn autofill_address(&mut self, address: &PostalAddress) -> bool {
        let Some(boleto_address) = self.booking.payment.boleto_address_mut() else {
            return false;
        };
        boleto_address.street.clone_from(&address.street);
        boleto_address.neighborhood.clone_from(&address.neighborhood);
        boleto_address.city.clone_from(&address.city);
        boleto_address.state.clone_from(&address.state);
        true
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn step_valid_in(report: &ValidationReport, step: WizardStep, booking: &FlightBooking) -> bool {
    let group_valid = report.group_valid(step.group());
    match step {
        // The list must also match the counts; it is only resized when
        // leaving the first step.
        WizardStep::Passengers => {
            let seated = booking.flight_details.passengers.seated();
            group_valid && seated > 0 && booking.passenger_details.len() == seated
        }
        _ => group_valid,
    }
}

fn passenger_index(field_path: &str) -> Option<usize> {
    let mut parts = field_path.split('.');
    if parts.next() != Some(PASSENGER_LIST_FIELD) {
        return None;
    }
    parts.next()?.parse().ok()
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error(transparent)]
    Path(#[from] FieldPathError),

    #[error("Field cannot be edited directly: {0}")]
    NotEditable(String),

    #[error("Invalid value for {path}: {reason}")]
    InvalidValue { path: String, reason: String },
}
