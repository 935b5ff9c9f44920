//! Date-scoped sequential transaction IDs, e.g. `20241006-001`.

use time::Date;

/// A transaction ID of the form `YYYYMMDD-NNN`.
pub type TransactionId = String;

/// The byte offset of the sequence number in a transaction ID, i.e. the length of `YYYYMMDD-`.
const SEQUENCE_OFFSET: usize = 9;

/// Format `date` as the `YYYYMMDD` prefix shared by every transaction ID on that day.
pub fn date_prefix(date: Date) -> String {
    format!(
        "{:04}{:02}{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Create the ID that follows `last_id` on the day identified by `prefix`.
///
/// `last_id` should be the greatest ID already stored for that day, or `None`
/// if there are none, in which case the sequence starts at `001`.
///
/// The sequence number is zero-padded to three digits. Numbers past 999 are
/// not checked and simply produce a longer suffix.
pub fn next_transaction_id(prefix: &str, last_id: Option<&str>) -> TransactionId {
    let sequence = match last_id {
        Some(last_id) => {
            parse_leading_integer(last_id.get(SEQUENCE_OFFSET..).unwrap_or("")).saturating_add(1)
        }
        None => 1,
    };

    format!("{prefix}-{sequence:03}")
}

/// Parse the integer at the start of `text`, ignoring anything after it.
///
/// Leading whitespace and a single `+` or `-` sign are accepted. Text that does
/// not start with a number parses as zero, and values outside the range of an
/// `i64` saturate.
///
/// ```ignore
/// assert_eq!(parse_leading_integer(" 42abc"), 42);
/// assert_eq!(parse_leading_integer("abc"), 0);
/// ```
pub fn parse_leading_integer(text: &str) -> i64 {
    let text = text.trim_start_matches([' ', '\t', '\n', '\r', '\x0B', '\x0C']);

    let (is_negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |value, digit| {
            let digit = i64::from(digit - b'0');

            if is_negative {
                value.saturating_mul(10).saturating_sub(digit)
            } else {
                value.saturating_mul(10).saturating_add(digit)
            }
        })
}
