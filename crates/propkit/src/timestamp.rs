use std::fmt::Write;
use std::rc::Rc;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;

use crate::object::Object;
use crate::value::Value;
use crate::{Error, Result};

/// Default pattern for human-readable date output.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampKind {
    Mutable,
    Immutable,
}

/// An instant carrying the UTC offset it is displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    at: DateTime<FixedOffset>,
    kind: TimestampKind,
}

impl Timestamp {
    pub fn new<Z: TimeZone>(at: DateTime<Z>, kind: TimestampKind) -> Self {
        Self {
            at: at.fixed_offset(),
            kind,
        }
    }

    pub fn mutable<Z: TimeZone>(at: DateTime<Z>) -> Self {
        Self::new(at, TimestampKind::Mutable)
    }

    pub fn immutable<Z: TimeZone>(at: DateTime<Z>) -> Self {
        Self::new(at, TimestampKind::Immutable)
    }

    pub fn now(kind: TimestampKind) -> Self {
        Self::new(Utc::now(), kind)
    }

    /// Whole seconds since the Unix epoch, in UTC.
    pub fn from_unix(secs: i64, kind: TimestampKind) -> Result<Self> {
        let at = DateTime::from_timestamp(secs, 0).ok_or_else(|| Error::InvalidDate {
            input: secs.to_string(),
            message: "timestamp out of range".into(),
        })?;
        Ok(Self::new(at, kind))
    }

    /// Parse RFC 3339, `@<unix seconds>`, or a zone-less date/date-time read as UTC.
    pub fn parse(input: &str, kind: TimestampKind) -> Result<Self> {
        let s = input.trim();
        if let Some(secs) = s.strip_prefix('@') {
            let secs: i64 = secs.parse().map_err(|_| Error::InvalidDate {
                input: input.to_string(),
                message: "expected unix seconds after '@'".into(),
            })?;
            return Self::from_unix(secs, kind);
        }
        if let Ok(at) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self::new(at, kind));
        }
        for fmt in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(Self::new(naive.and_utc(), kind));
            }
        }
        if let Some(naive) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
        {
            return Ok(Self::new(naive.and_utc(), kind));
        }
        Err(Error::InvalidDate {
            input: input.to_string(),
            message: "unrecognized date format".into(),
        })
    }

    pub fn instant(&self) -> DateTime<FixedOffset> {
        self.at
    }

    pub fn unix(&self) -> i64 {
        self.at.timestamp()
    }

    pub fn kind(&self) -> TimestampKind {
        self.kind
    }

    pub fn with_kind(self, kind: TimestampKind) -> Self {
        Self { kind, ..self }
    }

    /// Same instant, displayed in `zone`.
    pub fn in_zone(&self, zone: Tz) -> Self {
        Self::new(self.at.with_timezone(&zone), self.kind)
    }

    /// Format with a strftime pattern. Invalid patterns are an error rather than a panic.
    pub fn format(&self, pattern: &str) -> Result<String> {
        if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
            return Err(invalid_format(pattern));
        }
        let mut out = String::new();
        write!(out, "{}", self.at.format(pattern)).map_err(|_| invalid_format(pattern))?;
        Ok(out)
    }

    /// `YYYY-MM-DDTHH:MM:SS+HH:MM`.
    pub fn to_rfc3339(&self) -> String {
        self.at.to_rfc3339_opts(SecondsFormat::Secs, false)
    }
}

/// Fails when `pattern` cannot render a date.
pub fn check_format(pattern: &str) -> Result<()> {
    Timestamp::from_unix(0, TimestampKind::Mutable)?
        .format(pattern)
        .map(|_| ())
}

fn invalid_format(pattern: &str) -> Error {
    Error::Message(format!("invalid date format \"{pattern}\""))
}

pub fn parse_zone(name: &str) -> Result<Tz> {
    name.parse::<Tz>().map_err(|_| Error::InvalidDate {
        input: name.to_string(),
        message: "unknown time zone".into(),
    })
}

impl Object for Timestamp {
    fn class_name(&self) -> &str {
        match self.kind {
            TimestampKind::Mutable => "DateTime",
            TimestampKind::Immutable => "DateTimeImmutable",
        }
    }

    fn clone_object(&self) -> Rc<dyn Object> {
        Rc::new(*self)
    }

    fn as_timestamp(&self) -> Option<&Timestamp> {
        Some(self)
    }
}

impl From<Timestamp> for Value {
    fn from(ts: Timestamp) -> Self {
        Value::object(ts)
    }
}

impl<Z: TimeZone> From<DateTime<Z>> for Value {
    fn from(at: DateTime<Z>) -> Self {
        Value::object(Timestamp::mutable(at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc3339_uses_numeric_utc_offset() {
        let ts = Timestamp::from_unix(0, TimestampKind::Mutable).unwrap();
        assert_eq!(ts.to_rfc3339(), "1970-01-01T00:00:00+00:00");
    }

    #[test]
    fn parse_accepts_common_shapes() {
        let kind = TimestampKind::Immutable;
        let a = Timestamp::parse("2024-05-01 12:34:56", kind).unwrap();
        let b = Timestamp::parse("2024-05-01T12:34:56+00:00", kind).unwrap();
        let c = Timestamp::parse(&format!("@{}", a.unix()), kind).unwrap();
        assert_eq!(a.unix(), b.unix());
        assert_eq!(a.unix(), c.unix());
        let d = Timestamp::parse("2024-05-01", kind).unwrap();
        assert_eq!(d.format(DEFAULT_DATE_FORMAT).unwrap(), "2024-05-01 00:00:00");
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = Timestamp::parse("not a date", TimestampKind::Mutable).unwrap_err();
        assert!(matches!(err, Error::InvalidDate { .. }));
    }

    #[test]
    fn zone_change_keeps_instant() {
        let utc = Timestamp::parse("2024-05-01 00:00:00", TimestampKind::Mutable).unwrap();
        let tokyo = utc.in_zone(parse_zone("Asia/Tokyo").unwrap());
        assert_eq!(utc.unix(), tokyo.unix());
        assert_eq!(tokyo.to_rfc3339(), "2024-05-01T09:00:00+09:00");
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        let ts = Timestamp::now(TimestampKind::Mutable);
        assert!(ts.format("%Q").is_err());
    }

    #[test]
    fn parse_only_specifier_is_an_error() {
        let ts = Timestamp::from_unix(0, TimestampKind::Mutable).unwrap();
        assert!(matches!(ts.format("%#z"), Err(Error::Message(_))));
        assert_eq!(ts.format("%Y").unwrap(), "1970");
    }
}
