//! Client-side components of the patron demo.
//!
//! ## Submodules
//!
//! - [`dispatcher`] - Turns an order into the matching RPC call shape and
//!   reports what comes back.
//! - [`channel`] - The [`WaiterChannel`](channel::WaiterChannel) capability
//!   trait and its `tonic` adapter.
//! - [`sink`] - Consumers of meals and completion signals.
//! - [`pacing`] - Randomized delays between client-streamed sends.
//! - [`config`] - Command line and environment configuration.
//! - [`telemetry`] - Logging setup.

pub mod channel;
pub mod config;
pub mod dispatcher;
pub mod pacing;
pub mod sink;
pub mod telemetry;
