//! Consumers of the meals produced by an order.
//!
//! The dispatcher hands every [`Meal`] and [`BatchMeals`] to a [`Sink`] the
//! moment it arrives and closes each order with exactly one call to
//! [`Sink::complete`]. Sinks only observe; they never filter or transform what
//! the kitchen served.

use core::fmt;
use patron_core::{
    Error,
    proto::{BatchMeals, Meal},
};

/// The four ways a patron can order, one per RPC call shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OrderKind {
    /// Unary.
    Staff,
    /// Server streaming.
    Eastern,
    /// Client streaming.
    Western,
    /// Bidirectional streaming.
    DimSum,
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderKind::Staff => write!(f, "STAFF"),
            OrderKind::Eastern => write!(f, "EASTERN"),
            OrderKind::Western => write!(f, "WESTERN"),
            OrderKind::DimSum => write!(f, "DIMSUM"),
        }
    }
}

/// Receives the results of an order as they arrive.
pub trait Sink {
    /// A single meal: the whole response of a [`OrderKind::Staff`] order or
    /// one element of an [`OrderKind::Eastern`] stream.
    fn report_meal(&mut self, order: OrderKind, meal: &Meal);

    /// One aggregated batch of meals.
    fn report_batch(&mut self, batch: &BatchMeals);

    /// Called once per order, after every meal and batch has been reported.
    fn complete(&mut self, order: OrderKind, outcome: Result<(), &Error>);
}

/// Writes everything to the console through `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl Sink for LogSink {
    fn report_meal(&mut self, order: OrderKind, meal: &Meal) {
        if order == OrderKind::Staff {
            tracing::info!("Receiving single meal");
        }
        tracing::info!(
            meal_id = meal.id,
            serving_ms = meal.serving_time,
            "{meal}"
        );
    }

    fn report_batch(&mut self, batch: &BatchMeals) {
        tracing::info!(size = batch.meals.len(), "Receiving batch of meals");
        for (index, meal) in batch.meals.iter().enumerate() {
            tracing::info!("#{}: {meal}", index + 1);
        }
    }

    fn complete(&mut self, order: OrderKind, outcome: Result<(), &Error>) {
        match outcome {
            Ok(()) => tracing::info!("{order} DEMO COMPLETE!"),
            Err(e) => tracing::error!("{order} DEMO FAILED: {e}"),
        }
    }
}
