//! # Common Meal Types and Constants
//!
//! Shared aliases, defaults and helpers layered on top of the generated
//! [`proto`](crate::proto) messages.
//!
//! ## Type Aliases
//!
//! - [`MealId`] - The primitive integer identifying a menu item on the wire.
//!
//! ## Constants
//!
//! - [`DEFAULT_SERVER_ADDR`] - Where the kitchen listens by default.
//! - [`DEFAULT_STAFF_MEAL`], [`EASTERN_ORDER`], [`WESTERN_ORDER`],
//!   [`DIM_SUM_ORDER`] - The demo orders used when none are given.

use crate::proto::{BatchMeals, Meal, MealRequest, SingleOrder};
use core::fmt;
use core::time::Duration;

/// The integer type identifying a menu item (`int32` on the wire).
pub type MealId = i32;

/// Address of the kitchen's `Waiter` service.
pub const DEFAULT_SERVER_ADDR: &str = "http://127.0.0.1:50051";

/// Meal ordered by `staff` when no id is given.
pub const DEFAULT_STAFF_MEAL: MealId = 1;

/// Meals requested in one go by the server streaming demo.
pub const EASTERN_ORDER: [MealId; 3] = [1, 10, 12];

/// Meals ordered one at a time by the client streaming demo.
pub const WESTERN_ORDER: [MealId; 3] = [1, 10, 12];

/// Carts requested by the bidirectional streaming demo.
pub const DIM_SUM_ORDER: [&[MealId]; 4] = [&[12], &[1, 12], &[10, 12], &[1, 10, 12]];

impl Meal {
    /// Time the kitchen needs to prepare this meal.
    ///
    /// Negative values on the wire are treated as zero.
    pub fn serving_duration(&self) -> Duration {
        Duration::from_millis(u64::try_from(self.serving_time).unwrap_or_default())
    }
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Served meal: \"{}\" with ingredients: {}, for id: {}. Serving time required: {}",
            self.name,
            self.ingredients.join(", "),
            self.id,
            self.serving_time
        )
    }
}

impl From<MealId> for SingleOrder {
    fn from(meal_id: MealId) -> Self {
        SingleOrder { meal_id }
    }
}

impl From<Vec<MealId>> for MealRequest {
    fn from(meal_ids: Vec<MealId>) -> Self {
        MealRequest { meal_ids }
    }
}

impl BatchMeals {
    /// Ids of the meals in this batch, in the order they were served.
    pub fn ids(&self) -> Vec<MealId> {
        self.meals.iter().map(|meal| meal.id).collect()
    }
}

/// Expands [`DIM_SUM_ORDER`] into owned batches.
pub fn dim_sum_batches() -> Vec<Vec<MealId>> {
    DIM_SUM_ORDER.iter().map(|batch| batch.to_vec()).collect()
}
