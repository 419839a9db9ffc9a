// Diffusion Simulator Module

pub mod event_sink;
pub mod report;

// Re-export commonly used types
pub use event_sink::LoggingEventSink;
pub use report::{print_history, print_summary};
