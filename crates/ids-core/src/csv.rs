//! Minimal CSV record codec for the flat files this crate persists.
//!
//! Fields containing a comma, quote or line break are quoted with doubled
//! inner quotes; everything else is written bare.

use std::io::Write;

/// Quote a field if it needs it.
pub fn escape_field(field: &str) -> std::borrow::Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        std::borrow::Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        std::borrow::Cow::Borrowed(field)
    }
}

/// Write one record followed by `\n`.
pub fn write_record<W, I, S>(w: &mut W, fields: I) -> std::io::Result<()>
where
    W: Write + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut first = true;
    for field in fields {
        if !first {
            w.write_all(b",")?;
        }
        first = false;
        w.write_all(escape_field(field.as_ref()).as_bytes())?;
    }
    w.write_all(b"\n")
}

/// Split one line into fields, honouring quotes.
///
/// An empty line yields no fields. An unterminated quote runs to the end of
/// the line.
pub fn parse_record(line: &str) -> Vec<String> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line.is_empty() {
        return Vec::new();
    }

    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.is_empty() => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}
