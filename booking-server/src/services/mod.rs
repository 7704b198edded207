//! Services - external collaborator seams

pub mod notifier;

pub use notifier::{BookingEvent, NotifierService};
