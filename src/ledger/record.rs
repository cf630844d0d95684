use crate::scanner::SizeMeasurement;
use crate::units::Unit;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One ledger line: the latest measurement for a case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRecord {
    pub case_id: String,
    /// Fixed-width rendering, e.g. `"  2.00 kB"`.
    pub size: String,
    pub timestamp: String,
    pub real_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    Record(LedgerRecord),
    Blank,
    Malformed(&'static str),
}

impl LedgerRecord {
    pub fn new(
        case_id: &str,
        measurement: &SizeMeasurement,
        timestamp: String,
        real_path: String,
    ) -> Self {
        Self {
            case_id: case_id.to_string(),
            size: format_size(measurement.total_size(), measurement.unit),
            timestamp,
            real_path,
        }
    }

    pub fn to_line(&self) -> String {
        format!(
            "{:<10} {} {} {}",
            self.case_id, self.size, self.timestamp, self.real_path
        )
    }
}

pub fn format_size(value: f64, unit: Unit) -> String {
    format!("{value:6.2} {unit}")
}

/// Split a ledger line into case id, size, timestamp and path.
///
/// Any line with a case id and at least three more tokens is kept. With
/// five or more, size and timestamp take two tokens each; otherwise one.
/// The path is whatever follows, so it may contain spaces. Only a size
/// whose number parses is re-padded; everything else is kept as written.
pub fn parse_line(line: &str) -> ParsedLine {
    let line = line.trim();
    if line.is_empty() {
        return ParsedLine::Blank;
    }

    let Some((case_id, fields)) = split_token(line) else {
        return ParsedLine::Blank;
    };
    let count = fields.split_whitespace().count();
    let width = if count >= 5 {
        2
    } else if count >= 3 {
        1
    } else {
        return ParsedLine::Malformed("too few fields");
    };

    let (size, rest) = take_tokens(fields, width);
    let (timestamp, rest) = take_tokens(rest, width);
    let real_path = rest.trim();

    ParsedLine::Record(LedgerRecord {
        case_id: case_id.to_string(),
        size: pad_size(&size),
        timestamp: timestamp.join(" "),
        real_path: real_path.to_string(),
    })
}

fn pad_size(tokens: &[&str]) -> String {
    match tokens {
        [value, unit] if value.parse::<f64>().is_ok() => format!("{value:>6} {unit}"),
        _ => tokens.join(" "),
    }
}

fn take_tokens(mut s: &str, count: usize) -> (Vec<&str>, &str) {
    let mut tokens = Vec::with_capacity(count);
    while tokens.len() < count {
        let Some((head, tail)) = split_token(s) else {
            break;
        };
        tokens.push(head);
        s = tail;
    }
    (tokens, s)
}

fn split_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    Some(s.split_once(char::is_whitespace).unwrap_or((s, "")))
}
