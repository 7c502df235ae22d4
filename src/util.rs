//! Input decoding helpers.

use std::borrow::Cow;

/// Decode text bytes to a string, handling various encodings.
///
/// Tries UTF-8 first (a BOM is handled automatically), then the label named by
/// `hint_encoding`, and finally Windows-1252.
pub fn decode_text<'a>(bytes: &'a [u8], hint_encoding: Option<&str>) -> Cow<'a, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    if let Some(name) = hint_encoding
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    // Fallback: Windows-1252 (superset of ISO-8859-1)
    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Extract the charset label from a `<meta charset="...">` or
/// `<meta http-equiv="Content-Type" content="...; charset=...">` element.
///
/// Only the first 1024 bytes are inspected, which is where the HTML standard
/// requires the declaration to appear.
pub fn extract_meta_charset(bytes: &[u8]) -> Option<&str> {
    let check_len = bytes.len().min(1024);
    let prefix = &bytes[..check_len];

    let pos = prefix
        .windows(8)
        .position(|w| w.eq_ignore_ascii_case(b"charset="))?;
    let mut value = &prefix[pos + 8..];

    if let Some(&quote) = value.first()
        && (quote == b'"' || quote == b'\'')
    {
        value = &value[1..];
    }

    let end = value
        .iter()
        .position(|&b| matches!(b, b'"' | b'\'' | b';' | b'>' | b'/') || b.is_ascii_whitespace())
        .unwrap_or(value.len());

    if end == 0 {
        return None;
    }

    std::str::from_utf8(&value[..end]).ok()
}
