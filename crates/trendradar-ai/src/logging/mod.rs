//! Logging abstractions for runtime-agnostic logging

mod traits;
mod noop;
mod console;
mod recording;

pub use traits::{Level, Logger};
pub use noop::NoOpLogger;
pub use console::ConsoleLogger;
pub use recording::RecordingLogger;
