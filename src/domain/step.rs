use serde::{Deserialize, Serialize};

/// The four sections of the wizard, in order.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    #[default]
    FlightDetails,
    Passengers,
    Services,
    Payment,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::FlightDetails,
        WizardStep::Passengers,
        WizardStep::Services,
        WizardStep::Payment,
    ];

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            WizardStep::FlightDetails => 0,
            WizardStep::Passengers => 1,
            WizardStep::Services => 2,
            WizardStep::Payment => 3,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            WizardStep::FlightDetails => "Flight Details",
            WizardStep::Passengers => "Passengers",
            WizardStep::Services => "Services",
            WizardStep::Payment => "Payment",
        }
    }

    /// Top-level booking field holding the fields of this step.
    #[must_use]
    pub fn group(self) -> &'static str {
        match self {
            WizardStep::FlightDetails => "flightDetails",
            WizardStep::Passengers => "passengerDetails",
            WizardStep::Services => "services",
            WizardStep::Payment => "payment",
        }
    }

    /// The following step, clamped at the last one.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            WizardStep::FlightDetails => WizardStep::Passengers,
            WizardStep::Passengers => WizardStep::Services,
            WizardStep::Services | WizardStep::Payment => WizardStep::Payment,
        }
    }

    /// The preceding step, clamped at the first one.
    #[must_use]
    pub fn previous(self) -> Self {
        match self {
            WizardStep::FlightDetails | WizardStep::Passengers => WizardStep::FlightDetails,
            WizardStep::Services => WizardStep::Passengers,
            WizardStep::Payment => WizardStep::Services,
        }
    }

    /// Step owning a field path, e.g. `passengerDetails.0.passport`.
    #[must_use]
    pub fn for_field(field_path: &str) -> Option<Self> {
        let group = field_path.split('.').next()?;
        WizardStep::ALL.into_iter().find(|step| step.group() == group)
    }
}

/// Display state of one step in the progress indicator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StepProgress {
    pub label: String,
    pub index: usize,
    pub is_active: bool,
    pub is_completed: bool,
    pub is_pending: bool,
    pub aria_label: String,
}

#[must_use]
pub fn progress(current: WizardStep) -> Vec<StepProgress> {
    let total = WizardStep::ALL.len();
    WizardStep::ALL
        .into_iter()
        .map(|step| StepProgress {
            label: step.label().to_string(),
            index: step.index(),
            is_active: step == current,
            is_completed: step < current,
            is_pending: step > current,
            aria_label: format!("Step {} of {total}: {}", step.index() + 1, step.label()),
        })
        .collect()
}
