use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::payment::PaymentMethod;

#[derive(Debug, Deserialize)]
pub enum BookingCommand {
    Start {
        id: Uuid,
    },
    /// Store a value typed into a field, e.g. `passengerDetails.0.passport`.
    EditField {
        path: String,
        value: Value,
    },
    /// The field lost focus.
    TouchField {
        path: String,
    },
    SelectPaymentMethod {
        method: PaymentMethod,
    },
    LookupPostalCode {
        zip_code: String,
    },
    Advance,
    Retreat,
    Submit,
    Reset,
}
