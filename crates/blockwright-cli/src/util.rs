//! Input helpers

use std::io::Read;
use std::path::Path;

use crate::error::{CliError, Result};

/// Read a `--spec` or `--args` value
///
/// `-` reads stdin, `@path` reads a file, anything else is taken literally.
pub fn read_json_arg(raw: &str) -> Result<String> {
    if raw == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }

    match raw.strip_prefix('@') {
        Some(path) => read_file(Path::new(path)),
        None => Ok(raw.to_string()),
    }
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| CliError::Io {
        message: format!("cannot read '{}': {}", path.display(), e),
    })
}

/// Truncate to `max_len` characters, marking the cut with `...`
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_len.saturating_sub(3)).collect();
    format!("{kept}...")
}
