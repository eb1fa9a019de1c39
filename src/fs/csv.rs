use std::borrow::Cow;
use thiserror::Error;

pub const SEPARATOR: char = ',';
pub const QUOTE: char = '"';

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CsvError {
    #[error("unterminated quoted field starting on line {line}")]
    UnterminatedQuote { line: usize },
    #[error("unexpected character {found:?} after closing quote on line {line}")]
    TrailingAfterQuote { line: usize, found: char },
}

/// Quote a field when it contains the separator, the quote character or a
/// line break. Inner quotes are doubled.
pub fn escape_field(value: &str) -> Cow<'_, str> {
    if !value.contains([SEPARATOR, QUOTE, '\n', '\r']) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 2);
    escaped.push(QUOTE);
    for c in value.chars() {
        if c == QUOTE {
            escaped.push(QUOTE);
        }
        escaped.push(c);
    }
    escaped.push(QUOTE);
    Cow::Owned(escaped)
}

/// Join already-rendered fields into one record line (without the newline).
pub fn join_record<I, S>(fields: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fields
        .into_iter()
        .map(|f| escape_field(f.as_ref()).into_owned())
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse CSV text into records. Quoted fields may span lines.
/// Blank lines between records are skipped.
pub fn parse_records(content: &str) -> Result<Vec<Vec<String>>, CsvError> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut chars = content.chars().peekable();
    let mut line = 1;
    // true once the current record has any content
    let mut dirty = false;

    while let Some(c) = chars.next() {
        match c {
            QUOTE if field.is_empty() => {
                let opened_on = line;
                dirty = true;
                loop {
                    match chars.next() {
                        Some(QUOTE) if chars.peek() == Some(&QUOTE) => {
                            chars.next();
                            field.push(QUOTE);
                        }
                        Some(QUOTE) => break,
                        Some(inner) => {
                            if inner == '\n' {
                                line += 1;
                            }
                            field.push(inner);
                        }
                        None => return Err(CsvError::UnterminatedQuote { line: opened_on }),
                    }
                }
                match chars.peek() {
                    None | Some(&SEPARATOR) | Some(&'\n') | Some(&'\r') => {}
                    Some(&found) => return Err(CsvError::TrailingAfterQuote { line, found }),
                }
            }
            SEPARATOR => {
                dirty = true;
                record.push(std::mem::take(&mut field));
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                if dirty {
                    record.push(std::mem::take(&mut field));
                    records.push(std::mem::take(&mut record));
                }
                dirty = false;
                line += 1;
            }
            other => {
                dirty = true;
                field.push(other);
            }
        }
    }

    if dirty {
        record.push(field);
        records.push(record);
    }

    Ok(records)
}
