mod progress;
mod size;

pub use progress::{ConsoleProgress, NoopProgress};
pub use size::{scan, SizeMeasurement};
