//! Program image loading: a plain hex-text format, one 32-bit word per
//! line, loaded into a flat word-addressed memory image.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::arch::MEMORY_WORDS;
use crate::error::{ImageError, SimulatorResult};

/// Reads `path` and parses it into a vector of 32-bit words. Each line must
/// hold exactly one hexadecimal word, with or without a `0x`/`0X` prefix;
/// blank lines and comments are not a supported format. Words past memory
/// capacity are parsed (so a malformed tail word is still reported) but
/// dropped from the returned image.
pub fn load_image(path: &Path) -> SimulatorResult<Vec<u32>> {
    let text = fs::read_to_string(path)
        .map_err(|e| ImageError::FileReadError(path.to_path_buf(), e))?;

    if text.trim().is_empty() {
        return Err(ImageError::Empty(path.to_path_buf()).into());
    }

    let mut image = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let word = parse_word(line).ok_or_else(|| {
            ImageError::InvalidWord(line_no + 1, line.to_string())
        })?;
        if image.len() < MEMORY_WORDS {
            image.push(word);
        }
    }

    debug!(words = image.len(), path = %path.display(), "loaded program image");
    Ok(image)
}

fn parse_word(line: &str) -> Option<u32> {
    let trimmed = line.trim();
    let digits = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")).unwrap_or(trimmed);
    u32::from_str_radix(digits, 16).ok()
}
