use crate::domain::model::FlightBooking;
use crate::domain::payment::Payment;
use crate::domain::validation::{Pattern, Schema, parse_date};

/// Declare the rules for the booking in its current shape.
///
/// The shape decides which fields exist: one block of passenger rules per
/// passenger entry, the return date only on round trips and the fields of the
/// active payment method only.
#[must_use]
pub fn booking_schema(booking: &FlightBooking) -> Schema {
    let mut schema = Schema::new();
    flight_details_rules(&mut schema, booking);
    for index in 0..booking.passenger_details.len() {
        passenger_rules(&mut schema, &format!("passengerDetails.{index}"));
    }
    services_rules(&mut schema);
    payment_rules(&mut schema, &booking.payment);
    schema
}

fn flight_details_rules(schema: &mut Schema, booking: &FlightBooking) {
    let details = &booking.flight_details;

    schema
        .field("flightDetails.flightType")
        .required("Flight type is required");

    schema
        .field("flightDetails.origin")
        .required("Origin is required")
        .min_length(3, "Origin must be at least 3 characters")
        .max_length(3, "Origin must be at most 3 characters");

    schema
        .field("flightDetails.destination")
        .required("Destination is required")
        .min_length(3, "Destination must be at least 3 characters")
        .max_length(3, "Destination must be at most 3 characters");

    schema
        .field("flightDetails.departureDate")
        .required("Departure date is required")
        .date("Departure date must be a valid date")
        .not_in_past("Departure date cannot be in the past");

    // One-way trips leave the return date unconstrained.
    if details.is_round_trip() {
        schema
            .field("flightDetails.returnDate")
            .required("Return date is required for round trip flights")
            .date("Return date must be a valid date")
            .after(
                parse_date(&details.departure_date),
                "Return date must be after departure date",
            );
    }

    schema
        .field("flightDetails.passengers.adults")
        .required("At least one adult is required")
        .min(1, "At least one adult passenger is required")
        .max(9, "Maximum 9 adult passengers allowed");

    schema
        .field("flightDetails.passengers.children")
        .min(0, "Children count cannot be negative")
        .max(9, "Maximum 9 children passengers allowed");

    schema
        .field("flightDetails.passengers.infants")
        .min(0, "Infants count cannot be negative")
        .max(9, "Maximum 9 infant passengers allowed");

    schema
        .field("flightDetails.class")
        .required("Flight class is required");
}

fn passenger_rules(schema: &mut Schema, prefix: &str) {
    schema
        .field(format!("{prefix}.firstName"))
        .required("First name is required")
        .min_length(2, "First name must be at least 2 characters");

    schema
        .field(format!("{prefix}.lastName"))
        .required("Last name is required")
        .min_length(2, "Last name must be at least 2 characters");

    schema
        .field(format!("{prefix}.dateOfBirth"))
        .required("Date of birth is required")
        .date("Date of birth must be a valid date");

    schema
        .field(format!("{prefix}.passport"))
        .required("Passport number is required")
        .pattern(
            Pattern::Passport,
            "Passport must be 6-9 alphanumeric characters",
        );

    schema
        .field(format!("{prefix}.nationality"))
        .required("Nationality is required");

    schema
        .field(format!("{prefix}.gender"))
        .required("Gender is required");
}

fn services_rules(schema: &mut Schema) {
    schema
        .field("services.luggage.checkedBags")
        .min(0, "Checked bags cannot be negative")
        .max(5, "Maximum 5 checked bags allowed");

    schema
        .field("services.luggage.carryOn")
        .min(1, "At least one carry-on bag is required")
        .max(2, "Maximum 2 carry-on bags allowed");
}

fn payment_rules(schema: &mut Schema, payment: &Payment) {
    schema
        .field("payment.method")
        .required("Payment method is required");

    match payment {
        Payment::Unselected => {}
        Payment::Credit(_) | Payment::Debit(_) => card_rules(schema),
        Payment::Pix(_) => pix_rules(schema),
        Payment::Boleto(_) => boleto_rules(schema),
    }
}

fn card_rules(schema: &mut Schema) {
    schema
        .field("payment.cardType")
        .required("Card type is required");

    schema
        .field("payment.cardNumber")
        .required("Card number is required")
        .pattern(Pattern::CardNumber, "Card number must be 16 digits");

    schema
        .field("payment.cardHolder")
        .required("Card holder is required")
        .min_length(3, "Card holder must be at least 3 characters");

    schema
        .field("payment.expiryDate")
        .required("Expiry date is required")
        .pattern(Pattern::ExpiryDate, "Expiry date must be in MM/YY format");

    schema
        .field("payment.cvv")
        .required("CVV is required")
        .pattern(Pattern::Cvv, "CVV must be 3 or 4 digits");

    schema
        .field("payment.billingAddress.street")
        .required("Street is required");
    schema
        .field("payment.billingAddress.city")
        .required("City is required");
    schema
        .field("payment.billingAddress.country")
        .required("Country is required");
    schema
        .field("payment.billingAddress.zipCode")
        .required("ZIP code is required")
        .min_length(5, "ZIP code must be at least 5 characters");
}

fn pix_rules(schema: &mut Schema) {
    schema.field("payment.cpf").required("Pix key is required");

    schema
        .field("payment.pixName")
        .required("Name is required")
        .min_length(3, "Name must be at least 3 characters");

    schema
        .field("payment.pixEmail")
        .required("Email is required")
        .email("Invalid email format");
}

fn boleto_rules(schema: &mut Schema) {
    schema
        .field("payment.boletoDocument")
        .required("Document is required")
        .pattern(
            Pattern::BoletoDocument,
            "Document must be a CPF (11 digits) or CNPJ (14 digits)",
        );

    schema
        .field("payment.boletoName")
        .required("Name is required")
        .min_length(3, "Name must be at least 3 characters");

    // The complement is optional and carries no rules.
    for (field, message) in [
        ("street", "Street is required"),
        ("number", "Number is required"),
        ("neighborhood", "Neighborhood is required"),
        ("city", "City is required"),
        ("state", "State is required"),
    ] {
        schema
            .field(format!("payment.boletoAddress.{field}"))
            .required(message);
    }

    schema
        .field("payment.boletoAddress.zipCode")
        .required("ZIP code is required")
        .pattern(
            Pattern::BoletoZipCode,
            "ZIP code must be in 00000-000 format",
        );
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::Value;

    use super::*;
    use crate::domain::model::{FlightType, Gender, PassengerDetail, PassengerType};
    use crate::domain::payment::PaymentMethod;
    use crate::domain::validation::{ValidationContext, ValidationReport};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn report(booking: &FlightBooking) -> ValidationReport {
        let data: Value = serde_json::to_value(booking).unwrap();
        booking_schema(booking).evaluate(&data, &ValidationContext { today: today() })
    }

    fn valid_flight(flight_type: FlightType) -> FlightBooking {
        let mut booking = FlightBooking::default();
        let details = &mut booking.flight_details;
        details.flight_type = flight_type;
        details.origin = "GRU".to_string();
        details.destination = "LIS".to_string();
        details.departure_date = "2025-06-10".to_string();
        booking
    }

    fn valid_passenger() -> PassengerDetail {
        PassengerDetail {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            date_of_birth: "1990-12-10".to_string(),
            passport: "AB1234".to_string(),
            nationality: "GB".to_string(),
            gender: Gender::Female,
            ..PassengerDetail::new(PassengerType::Adult)
        }
    }

    #[test]
    fn test_default_booking_errors() {
        let report = report(&FlightBooking::default());

        assert_eq!(report.error("flightDetails.origin"), Some("Origin is required"));
        assert_eq!(
            report.error("flightDetails.returnDate"),
            Some("Return date is required for round trip flights")
        );
        assert_eq!(report.error("payment.method"), Some("Payment method is required"));
        assert!(report.group_valid("services"));
        assert!(report.group_valid("passengerDetails"));
    }

    #[test]
    fn test_one_way_never_requires_return_date() {
        let mut booking = valid_flight(FlightType::OneWay);
        assert!(report(&booking).group_valid("flightDetails"));

        booking.flight_details.return_date = "2025-06-01".to_string();
        assert!(report(&booking).group_valid("flightDetails"));
    }

    #[test]
    fn test_round_trip_return_must_follow_departure() {
        let mut booking = valid_flight(FlightType::RoundTrip);

        booking.flight_details.return_date = "2025-06-09".to_string();
        assert_eq!(
            report(&booking).error("flightDetails.returnDate"),
            Some("Return date must be after departure date")
        );

        booking.flight_details.return_date = "2025-06-10".to_string();
        assert!(report(&booking).invalid("flightDetails.returnDate"));

        booking.flight_details.return_date = "2025-06-11".to_string();
        assert!(report(&booking).group_valid("flightDetails"));
    }

    #[test]
    fn test_origin_must_be_three_characters() {
        let mut booking = valid_flight(FlightType::OneWay);

        booking.flight_details.origin = "GR".to_string();
        assert_eq!(
            report(&booking).error("flightDetails.origin"),
            Some("Origin must be at least 3 characters")
        );

        booking.flight_details.origin = "GRUX".to_string();
        assert_eq!(
            report(&booking).error("flightDetails.origin"),
            Some("Origin must be at most 3 characters")
        );
    }

    #[test]
    fn test_departure_in_the_past() {
        let mut booking = valid_flight(FlightType::OneWay);
        booking.flight_details.departure_date = "2025-05-31".to_string();

        assert_eq!(
            report(&booking).error("flightDetails.departureDate"),
            Some("Departure date cannot be in the past")
        );
    }

    #[test]
    fn test_passenger_counts() {
        let mut booking = valid_flight(FlightType::OneWay);
        booking.flight_details.passengers.adults = 0;
        booking.flight_details.passengers.children = 10;
        booking.flight_details.passengers.infants = -1;

        let report = report(&booking);
        assert_eq!(
            report.error("flightDetails.passengers.adults"),
            Some("At least one adult passenger is required")
        );
        assert_eq!(
            report.error("flightDetails.passengers.children"),
            Some("Maximum 9 children passengers allowed")
        );
        assert_eq!(
            report.error("flightDetails.passengers.infants"),
            Some("Infants count cannot be negative")
        );
    }

    #[test]
    fn test_passenger_rules_per_entry() {
        let mut booking = valid_flight(FlightType::OneWay);
        booking.passenger_details = vec![valid_passenger(), valid_passenger()];
        booking.passenger_details[1].passport = "AB123".to_string();
        booking.passenger_details[1].gender = Gender::Unspecified;

        let report = report(&booking);
        assert!(!report.invalid("passengerDetails.0.passport"));
        assert_eq!(
            report.error("passengerDetails.1.passport"),
            Some("Passport must be 6-9 alphanumeric characters")
        );
        assert_eq!(
            report.error("passengerDetails.1.gender"),
            Some("Gender is required")
        );
    }

    #[test]
    fn test_lowercase_passport_accepted() {
        let mut booking = valid_flight(FlightType::OneWay);
        let mut passenger = valid_passenger();
        passenger.passport = "ab123456".to_string();
        booking.passenger_details.push(passenger);

        assert!(report(&booking).group_valid("passengerDetails"));
    }

    #[test]
    fn test_luggage_limits() {
        let mut booking = valid_flight(FlightType::OneWay);
        booking.services.luggage.checked_bags = 6;
        booking.services.luggage.carry_on = 0;

        let report = report(&booking);
        assert_eq!(
            report.error("services.luggage.checkedBags"),
            Some("Maximum 5 checked bags allowed")
        );
        assert_eq!(
            report.error("services.luggage.carryOn"),
            Some("At least one carry-on bag is required")
        );
    }

    #[test]
    fn test_only_active_payment_fields_are_declared() {
        let mut booking = valid_flight(FlightType::OneWay);
        booking.payment = Payment::for_method(PaymentMethod::Pix);

        let schema = booking_schema(&booking);
        let paths: Vec<_> = schema.paths_in("payment").collect();
        assert_eq!(
            paths,
            vec![
                "payment.method",
                "payment.cpf",
                "payment.pixName",
                "payment.pixEmail"
            ]
        );
    }

    #[test]
    fn test_card_rules() {
        let mut booking = valid_flight(FlightType::OneWay);
        let mut payment = Payment::for_method(PaymentMethod::Credit);
        if let Payment::Credit(card) = &mut payment {
            card.card_number = "4111".to_string();
            card.card_holder = "Al".to_string();
            card.expiry_date = "13/30".to_string();
            card.cvv = "12345".to_string();
            card.billing_address.zip_code = "1234".to_string();
        }
        booking.payment = payment;

        let report = report(&booking);
        assert_eq!(
            report.error("payment.cardNumber"),
            Some("Card number must be 16 digits")
        );
        assert_eq!(
            report.error("payment.cardHolder"),
            Some("Card holder must be at least 3 characters")
        );
        assert_eq!(
            report.error("payment.expiryDate"),
            Some("Expiry date must be in MM/YY format")
        );
        assert_eq!(report.error("payment.cvv"), Some("CVV must be 3 or 4 digits"));
        assert_eq!(
            report.error("payment.billingAddress.zipCode"),
            Some("ZIP code must be at least 5 characters")
        );
        assert_eq!(
            report.error("payment.billingAddress.street"),
            Some("Street is required")
        );
    }

    #[test]
    fn test_boleto_rules() {
        let mut booking = valid_flight(FlightType::OneWay);
        let mut payment = Payment::for_method(PaymentMethod::Boleto);
        if let Payment::Boleto(boleto) = &mut payment {
            boleto.boleto_document = "123456789012".to_string();
            boleto.boleto_name = "Joana Silva".to_string();
            boleto.boleto_address.zip_code = "01001-0000".to_string();
        }
        booking.payment = payment;

        let report = report(&booking);
        assert_eq!(
            report.error("payment.boletoDocument"),
            Some("Document must be a CPF (11 digits) or CNPJ (14 digits)")
        );
        assert_eq!(
            report.error("payment.boletoAddress.zipCode"),
            Some("ZIP code must be in 00000-000 format")
        );
        assert!(!report.invalid("payment.boletoAddress.complement"));
        assert!(!report.invalid("payment.boletoName"));
    }
}
