//! Moment-style date/time patterns (`YYYY-MM-DD HH:mm:ss`, `MMM Do`, ...) and
//! parsers for the textual temporal cell encodings.
//!
//! Rendering never fails: unknown letters are copied through and every token
//! is computed from plain calendar fields, so a pattern cannot ask chrono for
//! a field the value does not carry.

use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc,
};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Year4,
    Year2,
    Quarter,
    MonthName,
    MonthShort,
    Month2,
    Month,
    DayOrdinal,
    DayOfYear3,
    DayOfYear,
    Day2,
    Day,
    WeekdayName,
    WeekdayShort,
    WeekdayMin,
    Weekday,
    Hour24Padded,
    Hour24,
    Hour12Padded,
    Hour12,
    Minute2,
    Minute,
    Second2,
    Second,
    Fraction(usize),
    MeridiemUpper,
    MeridiemLower,
    OffsetColon,
    OffsetCompact,
    ZoneAbbreviation,
    UnixSeconds,
    UnixMillis,
}

/// Longest tokens first so `MMMM` wins over `MM`.
const TOKEN_TABLE: &[(&str, Token)] = &[
    ("YYYY", Token::Year4),
    ("YY", Token::Year2),
    ("Q", Token::Quarter),
    ("MMMM", Token::MonthName),
    ("MMM", Token::MonthShort),
    ("MM", Token::Month2),
    ("M", Token::Month),
    ("Do", Token::DayOrdinal),
    ("DDDD", Token::DayOfYear3),
    ("DDD", Token::DayOfYear),
    ("DD", Token::Day2),
    ("D", Token::Day),
    ("dddd", Token::WeekdayName),
    ("ddd", Token::WeekdayShort),
    ("dd", Token::WeekdayMin),
    ("d", Token::Weekday),
    ("HH", Token::Hour24Padded),
    ("H", Token::Hour24),
    ("hh", Token::Hour12Padded),
    ("h", Token::Hour12),
    ("mm", Token::Minute2),
    ("m", Token::Minute),
    ("ss", Token::Second2),
    ("s", Token::Second),
    ("A", Token::MeridiemUpper),
    ("a", Token::MeridiemLower),
    ("ZZ", Token::OffsetCompact),
    ("Z", Token::OffsetColon),
    ("zz", Token::ZoneAbbreviation),
    ("z", Token::ZoneAbbreviation),
    ("X", Token::UnixSeconds),
    ("x", Token::UnixMillis),
];

/// Zone context of a zoned value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneInfo {
    pub offset_seconds: i32,
    pub abbreviation: String,
}

/// Calendar fields of a value plus its zone, if it has one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeParts {
    pub local: NaiveDateTime,
    pub zone: Option<ZoneInfo>,
}

impl DateTimeParts {
    #[must_use]
    pub fn naive(local: NaiveDateTime) -> Self {
        Self { local, zone: None }
    }

    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self::naive(date.and_time(NaiveTime::MIN))
    }

    #[must_use]
    pub fn from_time(time: NaiveTime) -> Self {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(NaiveDate::MIN);
        Self::naive(epoch.and_time(time))
    }

    /// Fields of `value` as seen in its own zone.
    #[must_use]
    pub fn zoned<Tz: TimeZone>(value: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let offset_seconds = value
            .fixed_offset()
            .offset()
            .local_minus_utc();
        Self {
            local: value.naive_local(),
            zone: Some(ZoneInfo {
                offset_seconds,
                abbreviation: value.offset().to_string(),
            }),
        }
    }

    fn unix_millis(&self) -> i64 {
        let offset = self.zone.as_ref().map_or(0, |zone| zone.offset_seconds);
        self.local.and_utc().timestamp_millis() - i64::from(offset) * 1_000
    }
}

/// Parsed moment-style pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MomentPattern {
    tokens: Vec<Token>,
}

impl MomentPattern {
    #[must_use]
    pub fn parse(pattern: &str) -> Self {
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut rest = pattern;

        while !rest.is_empty() {
            if let Some(inner) = rest.strip_prefix('[') {
                if let Some(end) = inner.find(']') {
                    literal.push_str(&inner[..end]);
                    rest = &inner[end + 1..];
                    continue;
                }
            }

            if rest.starts_with('S') {
                let count = rest.chars().take_while(|c| *c == 'S').count();
                flush_literal(&mut literal, &mut tokens);
                tokens.push(Token::Fraction(count.min(9)));
                rest = &rest[count..];
                continue;
            }

            if let Some((text, token)) = TOKEN_TABLE
                .iter()
                .find(|(text, _)| rest.starts_with(text))
            {
                flush_literal(&mut literal, &mut tokens);
                tokens.push(token.clone());
                rest = &rest[text.len()..];
                continue;
            }

            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                literal.push(c);
            }
            rest = chars.as_str();
        }
        flush_literal(&mut literal, &mut tokens);

        Self { tokens }
    }

    #[must_use]
    pub fn render(&self, parts: &DateTimeParts) -> String {
        let local = parts.local;
        let mut out = String::new();
        for token in &self.tokens {
            match token {
                Token::Literal(text) => out.push_str(text),
                Token::Year4 => out.push_str(&format!("{:04}", local.year())),
                Token::Year2 => out.push_str(&format!("{:02}", local.year().rem_euclid(100))),
                Token::Quarter => out.push_str(&((local.month() - 1) / 3 + 1).to_string()),
                Token::MonthName => out.push_str(MONTH_NAMES[local.month0() as usize]),
                Token::MonthShort => out.push_str(&MONTH_NAMES[local.month0() as usize][..3]),
                Token::Month2 => out.push_str(&format!("{:02}", local.month())),
                Token::Month => out.push_str(&local.month().to_string()),
                Token::DayOrdinal => out.push_str(&ordinal(local.day())),
                Token::DayOfYear3 => out.push_str(&format!("{:03}", local.ordinal())),
                Token::DayOfYear => out.push_str(&local.ordinal().to_string()),
                Token::Day2 => out.push_str(&format!("{:02}", local.day())),
                Token::Day => out.push_str(&local.day().to_string()),
                Token::WeekdayName => out.push_str(weekday_name(local)),
                Token::WeekdayShort => out.push_str(&weekday_name(local)[..3]),
                Token::WeekdayMin => out.push_str(&weekday_name(local)[..2]),
                Token::Weekday => {
                    out.push_str(&local.weekday().num_days_from_sunday().to_string());
                }
                Token::Hour24Padded => out.push_str(&format!("{:02}", local.hour())),
                Token::Hour24 => out.push_str(&local.hour().to_string()),
                Token::Hour12Padded => out.push_str(&format!("{:02}", hour12(local))),
                Token::Hour12 => out.push_str(&hour12(local).to_string()),
                Token::Minute2 => out.push_str(&format!("{:02}", local.minute())),
                Token::Minute => out.push_str(&local.minute().to_string()),
                Token::Second2 => out.push_str(&format!("{:02}", local.second())),
                Token::Second => out.push_str(&local.second().to_string()),
                Token::Fraction(digits) => {
                    let nanos = format!("{:09}", local.nanosecond() % 1_000_000_000);
                    out.push_str(&nanos[..*digits]);
                }
                Token::MeridiemUpper => out.push_str(if local.hour() < 12 { "AM" } else { "PM" }),
                Token::MeridiemLower => out.push_str(if local.hour() < 12 { "am" } else { "pm" }),
                Token::OffsetColon => out.push_str(&offset_text(parts, true)),
                Token::OffsetCompact => out.push_str(&offset_text(parts, false)),
                Token::ZoneAbbreviation => {
                    if let Some(zone) = &parts.zone {
                        out.push_str(&zone.abbreviation);
                    }
                }
                Token::UnixSeconds => out.push_str(&(parts.unix_millis().div_euclid(1_000)).to_string()),
                Token::UnixMillis => out.push_str(&parts.unix_millis().to_string()),
            }
        }
        out
    }
}

fn flush_literal(literal: &mut String, tokens: &mut Vec<Token>) {
    if !literal.is_empty() {
        tokens.push(Token::Literal(std::mem::take(literal)));
    }
}

fn ordinal(day: u32) -> String {
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{day}{suffix}")
}

fn weekday_name(local: NaiveDateTime) -> &'static str {
    WEEKDAY_NAMES[local.weekday().num_days_from_monday() as usize]
}

fn hour12(local: NaiveDateTime) -> u32 {
    match local.hour() % 12 {
        0 => 12,
        hour => hour,
    }
}

fn offset_text(parts: &DateTimeParts, colon: bool) -> String {
    let seconds = parts.zone.as_ref().map_or(0, |zone| zone.offset_seconds);
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes = seconds.abs() / 60;
    if colon {
        format!("{sign}{:02}:{:02}", minutes / 60, minutes % 60)
    } else {
        format!("{sign}{:02}{:02}", minutes / 60, minutes % 60)
    }
}

/// `2017-03-01`.
#[must_use]
pub fn parse_local_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// `2017-03-01T12:30`, with optional seconds and fraction.
#[must_use]
pub fn parse_local_date_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

/// `12:30`, `12:30:15` or `12:30:15.123456789`.
#[must_use]
pub fn parse_local_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    ["%H:%M:%S%.f", "%H:%M"]
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(raw, format).ok())
}

/// Date-time with an explicit offset (`2017-03-01T12:30+01:00`, `...Z`).
#[must_use]
pub fn parse_offset_date_time(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(value) = DateTime::parse_from_rfc3339(raw) {
        return Some(value);
    }
    let normalized = match raw.strip_suffix('Z') {
        Some(head) => format!("{head}+00:00"),
        None => raw.to_owned(),
    };
    ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M%:z"]
        .iter()
        .find_map(|format| DateTime::parse_from_str(&normalized, format).ok())
}

/// Legacy UTC date-time: epoch millis or an ISO string with or without offset.
#[must_use]
pub fn parse_legacy_date_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(millis) = raw.parse::<i64>() {
        return DateTime::<Utc>::from_timestamp_millis(millis);
    }
    if let Some(value) = parse_offset_date_time(raw) {
        return Some(value.with_timezone(&Utc));
    }
    parse_local_date_time(raw).map(|local| local.and_utc())
}

#[cfg(test)]
mod tests {
    use super::{DateTimeParts, MomentPattern, parse_local_date_time, parse_offset_date_time};

    #[test]
    fn common_tokens_render() {
        let local = parse_local_date_time("2017-03-01T09:05:07.250").expect("parse");
        let parts = DateTimeParts::naive(local);
        let pattern = MomentPattern::parse("YYYY-MM-DD HH:mm:ss.SSS");
        assert_eq!(pattern.render(&parts), "2017-03-01 09:05:07.250");

        let pattern = MomentPattern::parse("dddd, MMMM Do YYYY h:mm A [week] Q");
        assert_eq!(pattern.render(&parts), "Wednesday, March 1st 2017 9:05 AM week 1");
    }

    #[test]
    fn offsets_render_from_zone() {
        let value = parse_offset_date_time("2017-03-01T12:00+01:00").expect("parse");
        let parts = DateTimeParts::zoned(&value);
        assert_eq!(MomentPattern::parse("HH:mm Z ZZ").render(&parts), "12:00 +01:00 +0100");
        assert_eq!(MomentPattern::parse("X").render(&parts), "1488366000");
    }
}
