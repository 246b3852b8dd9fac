/// Command-line interface and generation runner
pub mod cli;
/// Constants and default parameters
pub mod configuration;
/// Error types and result alias
pub mod error;
/// PNG import and export
pub mod image;
/// Terminal progress bars for generation attempts
pub mod progress;
/// Resolution capture and animated GIF export
pub mod visualization;
