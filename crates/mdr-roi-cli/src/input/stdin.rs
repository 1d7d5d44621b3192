use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Calculation input piped on stdin, if any. An interactive terminal or an
/// empty pipe yields `None`, so the caller falls back to flags.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }
    parse_piped(io::stdin().lock())
}

fn parse_piped<R: Read, T: DeserializeOwned>(
    mut reader: R,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    let mut buffer = String::new();
    reader
        .read_to_string(&mut buffer)
        .map_err(|e| format!("Failed to read piped input: {}", e))?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let parsed = serde_json::from_str(trimmed)
        .map_err(|e| format!("Failed to parse piped input: {}", e))?;
    tracing::debug!(bytes = trimmed.len(), "calculation input read from stdin");
    Ok(Some(parsed))
}
