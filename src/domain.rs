pub mod booking_schema;
pub mod commands;
pub mod events;
pub mod form;
pub mod model;
pub mod passengers;
pub mod payment;
pub mod step;
pub mod validation;
pub mod wizard;
