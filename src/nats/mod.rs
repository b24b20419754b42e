pub mod client;
pub mod messages;

pub use client::NatsObserver;
pub use messages::{FillerMessage, ReportMessage, SampleMessage, StateMessage};
