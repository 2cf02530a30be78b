//! Literal classifier.
//!
//! Turns the raw text matched by a literal rule of the [lexer](crate::lexer)
//! into a token value. Strings lose their quotes and backslashes, numbers are
//! converted, temporal literals keep their raw text and are optionally
//! checked against the calendar.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;

use crate::ast::Token;

/// Why a literal with a valid shape was rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidLiteral {
    pub kind: &'static str,
    pub reason: String,
}

impl InvalidLiteral {
    fn new(kind: &'static str, reason: impl Into<String>) -> Self {
        InvalidLiteral {
            kind,
            reason: reason.into(),
        }
    }
}

/// Strips the surrounding quotes and deletes every backslash.
///
/// Escapes are not interpreted: `\n` becomes `n`, `\"` becomes `"`.
///
/// ```
/// use sift_query::classify::unescape;
///
/// assert_eq!(unescape(r#""it's \"ok\"""#), r#"it's "ok""#);
/// assert_eq!(unescape(r"'a\nb'"), "anb");
/// ```
pub fn unescape(raw: &str) -> String {
    let mut chars = raw.chars();
    chars.next();
    chars.next_back();
    chars.filter(|&c| c != '\\').collect()
}

/// Converts a number literal. Text with a fraction becomes a
/// [`Token::Decimal`], anything else a [`Token::Integer`].
pub fn number(raw: &str) -> Result<Token, InvalidLiteral> {
    if raw.contains('.') {
        Decimal::from_str(raw)
            .map(Token::Decimal)
            .map_err(|e| InvalidLiteral::new("decimal", e.to_string()))
    } else {
        raw.parse::<i64>()
            .map(Token::Integer)
            .map_err(|e| InvalidLiteral::new("integer", e.to_string()))
    }
}

pub fn time(raw: &str, validate: bool) -> Result<Token, InvalidLiteral> {
    if validate {
        check_time(raw).map_err(|reason| InvalidLiteral::new("time", reason))?;
    }
    Ok(Token::Time(raw.to_string()))
}

pub fn date(raw: &str, validate: bool) -> Result<Token, InvalidLiteral> {
    if validate {
        check_date(raw).map_err(|reason| InvalidLiteral::new("date", reason))?;
    }
    Ok(Token::Date(raw.to_string()))
}

pub fn datetime(raw: &str, validate: bool) -> Result<Token, InvalidLiteral> {
    if validate {
        let (date_part, time_part) = raw
            .split_once(char::is_whitespace)
            .ok_or_else(|| InvalidLiteral::new("datetime", "missing time part"))?;
        check_date(date_part).map_err(|reason| InvalidLiteral::new("datetime", reason))?;
        check_time(time_part.trim_start())
            .map_err(|reason| InvalidLiteral::new("datetime", reason))?;
    }
    Ok(Token::DateTime(raw.to_string()))
}

/// `H:M` with an optional `am`/`pm` suffix, already matched by the lexer.
fn check_time(text: &str) -> Result<NaiveTime, String> {
    let (hour, rest) = text
        .split_once(':')
        .ok_or_else(|| "missing ':'".to_string())?;
    let digits = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let (minute, suffix) = rest.split_at(digits);

    let hour: u32 = hour.parse().map_err(|_| format!("bad hour '{}'", hour))?;
    let minute: u32 = minute
        .parse()
        .map_err(|_| format!("bad minute '{}'", minute))?;

    let hour = match suffix.trim().to_ascii_lowercase().as_str() {
        "" => hour,
        meridiem @ ("am" | "pm") => {
            if !(1..=12).contains(&hour) {
                return Err(format!("hour {} is out of range for {}", hour, meridiem));
            }
            hour % 12 + if meridiem == "pm" { 12 } else { 0 }
        }
        other => return Err(format!("unknown suffix '{}'", other)),
    };

    NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| format!("{} is not a time of day", text))
}

/// `YYYY-M-D`, already matched by the lexer.
fn check_date(text: &str) -> Result<NaiveDate, String> {
    let mut parts = text.splitn(3, '-');
    let mut next = |name: &str| -> Result<u32, String> {
        parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(|| format!("bad {} in '{}'", name, text))
    };
    let year = next("year")?;
    let month = next("month")?;
    let day = next("day")?;

    NaiveDate::from_ymd_opt(year as i32, month, day)
        .ok_or_else(|| format!("{} is not a calendar date", text))
}

#[test]
fn test_number_kinds() {
    assert_eq!(number("42"), Ok(Token::Integer(42)));
    assert_eq!(number("-7"), Ok(Token::Integer(-7)));
    assert_eq!(number("+3"), Ok(Token::Integer(3)));
    assert_eq!(
        number("2.50"),
        Ok(Token::Decimal(Decimal::from_str("2.50").unwrap()))
    );
    assert_eq!(number("99999999999999999999").unwrap_err().kind, "integer");
}

#[test]
fn test_check_time() {
    assert!(check_time("0:00").is_ok());
    assert!(check_time("23:59").is_ok());
    assert!(check_time("11:24 PM").is_ok());
    assert!(check_time("12:00am").is_ok());
    assert!(check_time("24:00").is_err());
    assert!(check_time("13:99").is_err());
    assert!(check_time("0:15 am").is_err());
    assert!(check_time("13:15pm").is_err());
}

#[test]
fn test_check_date() {
    assert!(check_date("2013-2-1").is_ok());
    assert!(check_date("2024-02-29").is_ok());
    assert!(check_date("2023-02-29").is_err());
    assert!(check_date("2020-13-01").is_err());
    assert!(check_date("2020-0-10").is_err());
}
