use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{DecodeError, Result};
use crate::grammar::{self, Captures, Field};

/// The altitude field is the only optional field in the sentence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Altitude {
    Present(f64),
    Absent,
}

impl Altitude {
    /// Meters, with an absent field reported as sea level.
    pub fn meters(self) -> f64 {
        match self {
            Altitude::Present(m) => m,
            Altitude::Absent => 0.0,
        }
    }
}

/// Date and time fields as sent, before calendar validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawTime {
    /// Full year (2000 + YY).
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// 24-hour clock.
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl RawTime {
    /// Compose the UTC instant. Out-of-range components are rejected, never
    /// rolled over into the next unit.
    pub fn to_utc(self) -> Result<DateTime<Utc>> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
            .and_then(|date| date.and_hms_opt(self.hour, self.minute, self.second))
            .map(|naive| naive.and_utc())
            .ok_or(DecodeError::InvalidTimestamp {
                year: self.year,
                month: self.month,
                day: self.day,
                hour: self.hour,
                minute: self.minute,
                second: self.second,
            })
    }
}

/// A sentence that matched the grammar, with numeric fields converted.
#[derive(Debug, Clone, PartialEq)]
pub struct Sentence<'a> {
    /// Two-letter report type, e.g. `GP` or `KP`.
    pub kind: &'a str,
    /// Hardware identifier of the sending unit.
    pub unit_id: &'a str,
    pub time: RawTime,
    /// Signed decimal degrees (negative = West).
    pub longitude: f64,
    /// Signed decimal degrees (negative = South).
    pub latitude: f64,
    pub altitude: Altitude,
    pub speed: f64,
    pub course: f64,
    pub satellites: u32,
    pub report_id: &'a str,
    pub status: &'a str,
}

impl<'a> Sentence<'a> {
    /// Match `line` against the grammar and convert its fields.
    ///
    /// A line outside the grammar is `FormatMismatch`. A matched field that
    /// fails to convert is `InternalInconsistency`.
    pub fn parse(line: &'a str) -> Result<Self> {
        let caps = grammar::match_sentence(line).ok_or(DecodeError::FormatMismatch)?;

        let mut longitude: f64 = convert(&caps, Field::Longitude)?;
        if caps.get(Field::LonHemisphere) == "W" {
            longitude = -longitude;
        }

        let mut latitude: f64 = convert(&caps, Field::Latitude)?;
        if caps.get(Field::LatHemisphere) == "S" {
            latitude = -latitude;
        }

        let altitude = match caps.get(Field::Altitude) {
            "" => Altitude::Absent,
            _ => Altitude::Present(convert(&caps, Field::Altitude)?),
        };

        let year: i32 = convert(&caps, Field::Year)?;

        Ok(Sentence {
            kind: caps.get(Field::Kind),
            unit_id: caps.get(Field::UnitId),
            time: RawTime {
                year: 2000 + year,
                month: convert(&caps, Field::Month)?,
                day: convert(&caps, Field::Day)?,
                hour: convert(&caps, Field::Hour)?,
                minute: convert(&caps, Field::Minute)?,
                second: convert(&caps, Field::Second)?,
            },
            longitude,
            latitude,
            altitude,
            speed: convert(&caps, Field::Speed)?,
            course: convert(&caps, Field::Course)?,
            satellites: convert(&caps, Field::Satellites)?,
            report_id: caps.get(Field::ReportId),
            status: caps.get(Field::Status),
        })
    }
}

fn convert<T: FromStr>(caps: &Captures<'_>, field: Field) -> Result<T> {
    let text = caps.get(field);
    text.parse().map_err(|_| DecodeError::InternalInconsistency {
        field: field_name(field),
        value: text.to_string(),
    })
}

fn field_name(field: Field) -> &'static str {
    match field {
        Field::Kind => "type",
        Field::UnitId => "unit id",
        Field::Year => "year",
        Field::Month => "month",
        Field::Day => "day",
        Field::Hour => "hour",
        Field::Minute => "minute",
        Field::Second => "second",
        Field::LonHemisphere => "longitude hemisphere",
        Field::Longitude => "longitude",
        Field::LatHemisphere => "latitude hemisphere",
        Field::Latitude => "latitude",
        Field::Altitude => "altitude",
        Field::Speed => "speed",
        Field::Course => "course",
        Field::Satellites => "satellites",
        Field::ReportId => "report id",
        Field::Status => "status",
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    const SAMPLE: &str =
        "%GP,3000012345:0,090723182813,E114.602345,N22.069725,,30,160,4,0,00,,2794-10FF-46000,3>0-0";

    #[test]
    fn test_parse_sample() {
        let s = Sentence::parse(SAMPLE).unwrap();
        assert_eq!(s.kind, "GP");
        assert_eq!(s.unit_id, "3000012345");
        assert_eq!(s.longitude, 114.602345);
        assert_eq!(s.latitude, 22.069725);
        assert_eq!(s.altitude, Altitude::Absent);
        assert_eq!(s.speed, 30.0);
        assert_eq!(s.course, 160.0);
        assert_eq!(s.satellites, 4);
        assert_eq!(s.report_id, "0");
        assert_eq!(s.status, "00");
        assert_eq!(
            s.time,
            RawTime { year: 2009, month: 7, day: 23, hour: 18, minute: 28, second: 13 }
        );
    }

    #[test]
    fn test_hemisphere_signs() {
        let input = SAMPLE.replacen("E114", "W114", 1).replacen("N22", "S22", 1);
        let s = Sentence::parse(&input).unwrap();
        assert_eq!(s.longitude, -114.602345);
        assert_eq!(s.latitude, -22.069725);
    }

    #[test]
    fn test_altitude_present() {
        let input = SAMPLE.replacen("N22.069725,,", "N22.069725,87,", 1);
        let s = Sentence::parse(&input).unwrap();
        assert_eq!(s.altitude, Altitude::Present(87.0));
        assert_eq!(s.altitude.meters(), 87.0);
        assert_eq!(Altitude::Absent.meters(), 0.0);
    }

    #[test]
    fn test_format_mismatch() {
        assert_eq!(Sentence::parse("%GP,garbage"), Err(DecodeError::FormatMismatch));
    }

    #[test]
    fn test_oversized_satellite_count_is_internal() {
        let line = SAMPLE.replacen(",160,4,", ",160,99999999999,", 1);
        match Sentence::parse(&line) {
            Err(DecodeError::InternalInconsistency { field, value }) => {
                assert_eq!(field, "satellites");
                assert_eq!(value, "99999999999");
            }
            other => panic!("expected internal inconsistency, got {other:?}"),
        }
    }

    #[test]
    fn test_afternoon_hour_is_24h() {
        let time = Sentence::parse(SAMPLE).unwrap().time.to_utc().unwrap();
        assert_eq!(time.year(), 2009);
        assert_eq!(time.month(), 7);
        assert_eq!(time.day(), 23);
        assert_eq!(time.hour(), 18);
        assert_eq!(time.minute(), 28);
        assert_eq!(time.second(), 13);
    }

    #[test]
    fn test_impossible_times_rejected() {
        let base = RawTime { year: 2009, month: 7, day: 23, hour: 18, minute: 28, second: 13 };
        for bad in [
            RawTime { hour: 24, ..base },
            RawTime { month: 13, ..base },
            RawTime { month: 0, ..base },
            RawTime { month: 2, day: 30, ..base },
            RawTime { minute: 60, ..base },
            RawTime { second: 60, ..base },
        ] {
            assert!(matches!(bad.to_utc(), Err(DecodeError::InvalidTimestamp { .. })), "{bad:?}");
        }
    }
}
