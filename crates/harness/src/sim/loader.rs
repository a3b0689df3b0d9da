//! Memory image loading.
//!
//! Accepts two formats, chosen by file extension:
//! - `.vmem` / `.hex` / `.mem`: `$readmemh`-style text — whitespace-
//!   separated 32-bit hex words stored little-endian, `@addr` records
//!   giving the word index of the next value, `//` line comments.
//! - anything else: raw binary, loaded as-is.
//!
//! A missing or malformed image is fatal: the run must abort before the
//! clock loop starts.

use std::fs;
use std::path::Path;

use crate::error::SimError;

const VMEM_EXTENSIONS: [&str; 3] = ["vmem", "hex", "mem"];

/// Upper bound on a parsed image; far larger than any RAM region this
/// harness instantiates, small enough that a stray address record cannot
/// balloon the allocation.
const MAX_IMAGE_BYTES: usize = 0x1000_0000;

/// Reads a memory image from disk.
///
/// # Errors
///
/// `Load` if the file cannot be read; `Image` if a text image is
/// malformed.
pub fn load_image(path: &Path) -> Result<Vec<u8>, SimError> {
    let bytes = fs::read(path).map_err(|source| SimError::Load {
        path: path.display().to_string(),
        source,
    })?;

    let is_vmem = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| VMEM_EXTENSIONS.contains(&e));
    if !is_vmem {
        return Ok(bytes);
    }

    let text = String::from_utf8(bytes).map_err(|_| SimError::Image {
        path: path.display().to_string(),
        line: 0,
        reason: "vmem image is not valid UTF-8".to_string(),
    })?;
    parse_vmem(&path.display().to_string(), &text)
}

/// Parses `$readmemh`-style text into a little-endian byte image.
///
/// # Errors
///
/// `Image` with a 1-based line number on any malformed record.
pub fn parse_vmem(path: &str, text: &str) -> Result<Vec<u8>, SimError> {
    let mut image = Vec::new();
    // Byte cursor; @addr records are word (32-bit) indices.
    let mut cursor = 0usize;

    let bad = |line: usize, reason: String| SimError::Image {
        path: path.to_string(),
        line,
        reason,
    };

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.split("//").next().unwrap_or("");
        for token in line.split_whitespace() {
            if let Some(addr) = token.strip_prefix('@') {
                let word = usize::from_str_radix(addr, 16)
                    .map_err(|_| bad(line_no, format!("bad address record '{token}'")))?;
                cursor = word.checked_mul(4).unwrap_or(usize::MAX);
                if cursor >= MAX_IMAGE_BYTES {
                    return Err(bad(line_no, format!("address record '{token}' out of range")));
                }
            } else {
                if token.len() > 8 {
                    return Err(bad(line_no, format!("word '{token}' wider than 32 bits")));
                }
                let word = u32::from_str_radix(token, 16)
                    .map_err(|_| bad(line_no, format!("bad hex word '{token}'")))?;
                if image.len() < cursor + 4 {
                    image.resize(cursor + 4, 0);
                }
                image[cursor..cursor + 4].copy_from_slice(&word.to_le_bytes());
                cursor += 4;
            }
        }
    }

    Ok(image)
}
