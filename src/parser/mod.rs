//! CSV line parsing with encoding auto-detection.
//!
//! The line splitter is the minimal quote-toggle scanner the import contract
//! specifies: `"` flips an in-quotes flag, `,` outside quotes ends a field,
//! fields are trimmed of whitespace and wrapping quotes. There is no escape
//! mechanism for embedded quotes; this is deliberately not RFC 4180.

use std::collections::HashMap;

use crate::error::{CsvError, CsvResult};

/// Detect the encoding of raw bytes using chardet.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to a string using the specified encoding.
pub fn decode_content(bytes: &[u8], encoding: &str) -> CsvResult<String> {
    match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => Ok(String::from_utf8(bytes.to_vec())
            .unwrap_or_else(|_| String::from_utf8_lossy(bytes).to_string())),
        "iso-8859-1" | "latin-1" | "latin1" => {
            Ok(encoding_rs::ISO_8859_15.decode(bytes).0.to_string())
        }
        "windows-1252" | "cp1252" => Ok(encoding_rs::WINDOWS_1252.decode(bytes).0.to_string()),
        _ => {
            // Fallback: UTF-8 with lossy conversion
            Ok(String::from_utf8_lossy(bytes).to_string())
        }
    }
}

/// Decode uploaded bytes with encoding auto-detection.
pub fn decode_bytes(bytes: &[u8]) -> CsvResult<String> {
    if bytes.is_empty() {
        return Err(CsvError::EmptyFile);
    }
    let encoding = detect_encoding(bytes);
    decode_content(bytes, &encoding)
}

/// Split one CSV line into field values.
///
/// # Example
/// ```
/// use rosterload::parser::split_line;
///
/// let fields = split_line(r#""Smith, Jr",John,"123 Main St""#);
/// assert_eq!(fields, vec!["Smith, Jr", "John", "123 Main St"]);
/// ```
pub fn split_line(line: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        if c == '"' {
            in_quotes = !in_quotes;
        } else if c == ',' && !in_quotes {
            values.push(clean_field(&current));
            current.clear();
        } else {
            current.push(c);
        }
    }

    values.push(clean_field(&current));
    values
}

fn clean_field(raw: &str) -> String {
    raw.trim().trim_matches('"').to_string()
}

/// Build a mapping from exact header name to column index.
///
/// Returns an error when the header line is blank. Unknown headers are kept
/// as-is; expected columns missing from the map simply read as empty on
/// every row.
pub fn header_map(header_line: &str) -> CsvResult<HashMap<String, usize>> {
    if header_line.trim().is_empty() {
        return Err(CsvError::NoHeaders);
    }

    let map = split_line(header_line)
        .into_iter()
        .enumerate()
        .map(|(i, h)| (h, i))
        .collect();
    Ok(map)
}

/// Look up a named column in a parsed row.
///
/// Missing columns and short rows both yield the empty string.
pub fn column_value(values: &[String], map: &HashMap<String, usize>, name: &str) -> String {
    map.get(name)
        .and_then(|&i| values.get(i))
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_fields() {
        assert_eq!(split_line("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_quoted_field_with_embedded_comma() {
        let fields = split_line(r#""Smith, Jr",John,"123 Main St""#);
        assert_eq!(fields, vec!["Smith, Jr", "John", "123 Main St"]);
    }

    #[test]
    fn test_fields_are_trimmed() {
        assert_eq!(split_line(" a , \"b\" ,c "), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_fields_preserved() {
        assert_eq!(split_line("a,,c"), vec!["a", "", "c"]);
        assert_eq!(split_line(""), vec![""]);
    }

    #[test]
    fn test_trailing_comma_yields_empty_final_field() {
        assert_eq!(split_line("a,b,"), vec!["a", "b", ""]);
    }

    #[test]
    fn test_header_map() {
        let map = header_map("Personnel_Records.Payroll_Number,Personnel_Records.Surname").unwrap();
        assert_eq!(map["Personnel_Records.Payroll_Number"], 0);
        assert_eq!(map["Personnel_Records.Surname"], 1);
    }

    #[test]
    fn test_blank_header_rejected() {
        assert!(matches!(header_map("   "), Err(CsvError::NoHeaders)));
    }

    #[test]
    fn test_column_value_missing_column_is_empty() {
        let map = header_map("a,b").unwrap();
        let values = vec!["1".to_string(), "2".to_string()];
        assert_eq!(column_value(&values, &map, "a"), "1");
        assert_eq!(column_value(&values, &map, "missing"), "");
    }

    #[test]
    fn test_column_value_short_row_is_empty() {
        let map = header_map("a,b,c").unwrap();
        let values = vec!["1".to_string()];
        assert_eq!(column_value(&values, &map, "c"), "");
    }

    #[test]
    fn test_decode_empty_bytes_rejected() {
        assert!(matches!(decode_bytes(b""), Err(CsvError::EmptyFile)));
    }

    #[test]
    fn test_decode_utf8() {
        let decoded = decode_bytes("a,b\n1,2".as_bytes()).unwrap();
        assert_eq!(decoded, "a,b\n1,2");
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1").unwrap();
        assert!(decoded.contains("Soci"));
    }
}
