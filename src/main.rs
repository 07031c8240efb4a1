use flight_booking_wizard::domain::commands::BookingCommand;
use flight_booking_wizard::domain::payment::PaymentMethod;
use flight_booking_wizard::state::{ApplicationState, new_application_state};
use serde_json::json;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let state = match new_application_state() {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to start: {e}");
            std::process::exit(1);
        }
    };

    let id = Uuid::new_v4();
    if let Err(e) = run_demo(&state, id).await {
        tracing::error!("Demo booking {id} failed: {e}");
        std::process::exit(1);
    }

    match state.booking_query.load(&id.to_string()).await {
        Some(view) => {
            for step in view.progress() {
                tracing::info!("{}", step.aria_label);
            }
            tracing::info!("Booking {id} is {:?}", view.state);
        }
        None => tracing::warn!("No view recorded for booking {id}"),
    }
}

// A scripted session: fill each step, advance, pay by boleto and submit.
async fn run_demo(
    state: &ApplicationState,
    id: Uuid,
) -> Result<(), cqrs_es::AggregateError<flight_booking_wizard::domain::wizard::BookingError>> {
    let booking_id = id.to_string();
    let departure = chrono::Utc::now().date_naive() + chrono::Days::new(30);

    let edit = |path: &str, value: serde_json::Value| BookingCommand::EditField {
        path: path.to_string(),
        value,
    };

    let commands = vec![
        BookingCommand::Start { id },
        edit("flightDetails.flightType", json!("oneway")),
        edit("flightDetails.origin", json!("GRU")),
        edit("flightDetails.destination", json!("LIS")),
        edit(
            "flightDetails.departureDate",
            json!(departure.format("%Y-%m-%d").to_string()),
        ),
        BookingCommand::Advance,
        edit("passengerDetails.0.firstName", json!("Maria")),
        edit("passengerDetails.0.lastName", json!("Souza")),
        edit("passengerDetails.0.dateOfBirth", json!("1985-03-14")),
        edit("passengerDetails.0.passport", json!("FX123456")),
        edit("passengerDetails.0.nationality", json!("BR")),
        edit("passengerDetails.0.gender", json!("female")),
        BookingCommand::Advance,
        edit("services.luggage.checkedBags", json!(1)),
        BookingCommand::Advance,
        BookingCommand::SelectPaymentMethod {
            method: PaymentMethod::Boleto,
        },
        edit("payment.boletoDocument", json!("12345678901")),
        edit("payment.boletoName", json!("Maria Souza")),
        edit("payment.boletoAddress.zipCode", json!("01001-000")),
        BookingCommand::LookupPostalCode {
            zip_code: "01001-000".to_string(),
        },
        edit("payment.boletoAddress.number", json!("100")),
        BookingCommand::Submit,
    ];

    for command in commands {
        state.cqrs.execute(&booking_id, command).await?;
    }

    // Without a lookup result the street stays empty and submission is blocked.
    if let Some(view) = state.booking_query.load(&booking_id).await
        && view.last_outcome.as_deref() == Some("SubmissionBlocked")
    {
        tracing::warn!("Booking {booking_id} is incomplete, nothing was submitted");
    }
    Ok(())
}
