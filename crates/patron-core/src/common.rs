//! Shared protocol bindings, errors and types.
//!
//! ## Submodules
//!
//! - [`error`] - The crate-wide [`Error`] and [`Result`].
//! - [`types`] - Meal id aliases, default orders and helpers on the generated
//!   messages.
//! - [`proto`] - Messages and the `Waiter` client/server generated from
//!   `proto/kitchen.proto`.

pub mod error;
pub mod types;

pub use error::{Error, Result};

/// gRPC service and message definitions generated from `proto/kitchen.proto`.
///
/// ## Service
///
/// `Waiter` exposes one method per call shape:
///
/// - `StaffOrder` - unary, [`SingleOrder`](proto::SingleOrder) to
///   [`Meal`](proto::Meal).
/// - `EasternHostOrder` - server streaming, one
///   [`MealRequest`](proto::MealRequest) to a stream of meals.
/// - `WesternHostOrder` - client streaming, many single orders to one
///   [`BatchMeals`](proto::BatchMeals).
/// - `DimSumOrder` - bidirectional, meal requests in, batches out.
pub mod proto {
    tonic::include_proto!("com.eginwong.kitchensim");
}
