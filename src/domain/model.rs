use serde::{Deserialize, Serialize};

use crate::domain::payment::Payment;

/// Root record of a booking session.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlightBooking {
    pub flight_details: FlightDetails,
    pub passenger_details: Vec<PassengerDetail>,
    pub services: Services,
    pub payment: Payment,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlightDetails {
    pub flight_type: FlightType,
    pub origin: String,
    pub destination: String,
    pub departure_date: String, // ISO 8601 date format
    pub return_date: String,    // ISO 8601 date format
    pub passengers: Passengers,
    #[serde(rename = "class")]
    pub cabin_class: FlightClass,
}

impl Default for FlightDetails {
    fn default() -> Self {
        Self {
            flight_type: FlightType::RoundTrip,
            origin: String::new(),
            destination: String::new(),
            departure_date: String::new(),
            return_date: String::new(),
            passengers: Passengers::default(),
            cabin_class: FlightClass::Economy,
        }
    }
}

impl FlightDetails {
    #[must_use]
    pub fn is_round_trip(&self) -> bool {
        self.flight_type == FlightType::RoundTrip
    }
}

#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FlightType {
    #[default]
    #[serde(rename = "roundtrip")]
    RoundTrip,
    #[serde(rename = "oneway")]
    OneWay,
}

#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlightClass {
    #[default]
    Economy,
    Premium,
    Business,
    First,
}

/// Head counts entered on the first step.
///
/// Counts are signed so that out-of-range input stays representable and is
/// reported by validation rather than failing deserialization.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Passengers {
    pub adults: i32,
    pub children: i32,
    pub infants: i32,
}

impl Default for Passengers {
    fn default() -> Self {
        Self {
            adults: 1,
            children: 0,
            infants: 0,
        }
    }
}

impl Passengers {
    /// Number of passengers that need a detail record. Infants travel on an
    /// adult's lap and get none.
    #[must_use]
    pub fn seated(&self) -> usize {
        let adults = usize::try_from(self.adults).unwrap_or(0);
        let children = usize::try_from(self.children).unwrap_or(0);
        adults + children
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PassengerDetail {
    #[serde(rename = "type")]
    pub passenger_type: PassengerType,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String, // ISO 8601 date format
    pub passport: String,
    pub nationality: String,
    pub gender: Gender,
}

impl PassengerDetail {
    #[must_use]
    pub fn new(passenger_type: PassengerType) -> Self {
        Self {
            passenger_type,
            first_name: String::new(),
            last_name: String::new(),
            date_of_birth: String::new(),
            passport: String::new(),
            nationality: String::new(),
            gender: Gender::Unspecified,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PassengerType {
    Adult,
    Child,
}

#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
    #[default]
    #[serde(rename = "")]
    Unspecified,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Services {
    pub luggage: Luggage,
    pub seat_selection: Vec<String>,
    pub meals: Vec<String>,
    pub insurance: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Luggage {
    pub checked_bags: i32,
    pub carry_on: i32,
}

impl Default for Luggage {
    fn default() -> Self {
        Self {
            checked_bags: 0,
            carry_on: 1,
        }
    }
}
