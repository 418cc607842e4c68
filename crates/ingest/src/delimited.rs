//! Delimited-text parsing for bulk imports.
//!
//! The separator is sniffed from the header line. Fields are split purely on
//! that separator: quotes are not honoured, so a quoted value containing the
//! separator is split in two. Each field is trimmed and loses one matching
//! pair of surrounding quotes.

use crate::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Semicolon,
}

impl Delimiter {
    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Semicolon => b';',
        }
    }
}

/// Semicolon when the header has strictly more `;` than `,`; comma otherwise.
pub fn detect_delimiter(header: &str) -> Delimiter {
    let commas = header.matches(',').count();
    let semicolons = header.matches(';').count();
    if semicolons > commas {
        Delimiter::Semicolon
    } else {
        Delimiter::Comma
    }
}

/// Trim a raw field and strip one matching pair of surrounding quotes.
pub fn clean_field(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) if first == last && (first == '"' || first == '\'') => {
            chars.as_str().to_string()
        }
        _ => trimmed.to_string(),
    }
}

/// Header plus data rows of a delimited text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimitedTable {
    pub delimiter: Delimiter,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Parse newline-delimited rows; the first non-blank line is the header.
///
/// A leading UTF-8 byte order mark is ignored, blank lines are skipped and
/// rows may have any number of fields.
pub fn parse_delimited(text: &str) -> Result<DelimitedTable, ParseError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let header_line = text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .ok_or(ParseError::Empty)?;
    let delimiter = detect_delimiter(header_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter.as_byte())
        .quoting(false)
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.len() == 1 && record[0].trim().is_empty() {
            continue;
        }
        records.push(record.iter().map(clean_field).collect::<Vec<_>>());
    }

    let mut records = records.into_iter();
    let header = records.next().ok_or(ParseError::Empty)?;
    Ok(DelimitedTable {
        delimiter,
        header,
        rows: records.collect(),
    })
}
