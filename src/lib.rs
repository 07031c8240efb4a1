pub mod config;
pub mod domain;
pub mod queries;
pub mod services;
pub mod state;
pub mod utils;

use async_trait::async_trait;
use cqrs_es::{Aggregate, DomainEvent, EventEnvelope, Query};

/// Writes every committed event to the log.
pub struct SimpleLoggingQuery;

#[async_trait]
impl<A> Query<A> for SimpleLoggingQuery
where
    A: Aggregate,
{
    async fn dispatch(&self, aggregate_id: &str, events: &[EventEnvelope<A>]) {
        for event in events {
            tracing::info!(
                aggregate_id,
                sequence = event.sequence,
                event_type = %event.payload.event_type(),
                "{:?}",
                event.payload
            );
        }
    }
}
