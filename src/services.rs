pub mod clock;
pub mod postal_lookup;
pub mod submission;
