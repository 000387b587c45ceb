//! Pool status lookup
//!
//! The pool daemon writes its own plain-text log next to ours. The dashboard
//! only wants the most recent line that reports a hashrate.

use std::io::ErrorKind;
use std::path::Path;

/// Last line of the pool log mentioning `TH/s` or `GH/s`, trimmed
///
/// Always returns displayable text; failures are described, not raised.
pub fn pool_status(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return "Pool log not found".to_string(),
        Err(e) => return format!("Log read error: {e}"),
    };

    String::from_utf8_lossy(&bytes)
        .lines()
        .rev()
        .find(|line| line.contains("TH/s") || line.contains("GH/s"))
        .map(|line| line.trim().to_string())
        .unwrap_or_else(|| "No mining status found".to_string())
}
