//! Scheduled one-shot tasks with cancellation support

mod delayed;

pub use delayed::DelayedTask;
