//! Structural sanity check for fetched artifacts.

/// Delimiter line that opens and closes the header
pub const HEADER_DELIMITER: &[u8] = b"---";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// True when `bytes` start with a `---` line and a later line closes the
/// header with `---`.
///
/// This does not parse the header. It exists to turn away HTML error pages,
/// empty bodies and truncated transfers before anything is written.
pub fn validate(bytes: &[u8]) -> bool {
    split_header(bytes).is_some()
}

/// Split `bytes` into `(header, rest)` where `header` is the text between the
/// delimiter lines and `rest` starts right after the closing delimiter line.
pub fn split_header(bytes: &[u8]) -> Option<(&[u8], &[u8])> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut lines = bytes.split_inclusive(|b| *b == b'\n');
    let first = lines.next()?;
    if !is_delimiter(first) || !first.ends_with(b"\n") {
        return None;
    }

    let header_start = first.len();
    let mut offset = header_start;
    for line in lines {
        if is_delimiter(line) {
            return Some((&bytes[header_start..offset], &bytes[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

fn is_delimiter(line: &[u8]) -> bool {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    line == HEADER_DELIMITER
}
