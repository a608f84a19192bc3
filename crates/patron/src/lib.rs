#![doc = include_str!("../README.md")]

pub mod client;

pub use client::{
    channel::{GrpcWaiter, WaiterChannel},
    dispatcher::Dispatcher,
    pacing::Pacing,
    sink::{LogSink, OrderKind, Sink},
};
