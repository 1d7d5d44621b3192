pub mod calculate;
pub mod report;
pub mod sensitivity;

use serde_json::Value;

/// What a command hands back to `main` for printing.
pub enum CommandOutput {
    /// Structured data, printed in the selected `--output` format
    Data(Value),
    /// Pre-rendered text, printed as-is
    Text(String),
}
