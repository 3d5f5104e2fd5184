//! The YWT sentence grammar.
//!
//! Wire format:
//! `%<TT>,<unit>:<sub>,<YYMMDDhhmmss>,<E|W><DDD.DDDDDD>,<N|S><DD.DDDDDD>,<alt?>,<speed>,<course>,<sats>,<report>,<status>...`
//!
//! The grammar is a static table of segments walked left to right. Every
//! variable-length run is followed by a literal outside its character class
//! (or by the trailing rest), so a single greedy pass decides the match.

/// Named captures produced by a successful match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Kind,
    UnitId,
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    LonHemisphere,
    Longitude,
    LatHemisphere,
    Latitude,
    Altitude,
    Speed,
    Course,
    Satellites,
    ReportId,
    Status,
}

impl Field {
    pub const COUNT: usize = 18;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    Letter,
    Digit,
    EastWest,
    NorthSouth,
    NotComma,
    HexOrDash,
}

impl Class {
    fn accepts(self, b: u8) -> bool {
        match self {
            Class::Letter => b.is_ascii_alphabetic(),
            Class::Digit => b.is_ascii_digit(),
            Class::EastWest => b == b'E' || b == b'W',
            Class::NorthSouth => b == b'N' || b == b'S',
            Class::NotComma => b != b',',
            Class::HexOrDash => b.is_ascii_hexdigit() || b == b'-',
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Segment {
    /// Exactly this byte.
    Literal(u8),
    /// Between `min` and `max` bytes of the class, greedy.
    Run(Class, usize, usize),
    /// Start capturing `Field` at the current position.
    Open(Field),
    /// End the open capture.
    Close,
    /// Anything up to the end of the line, except a line terminator.
    Rest,
}

const MANY: usize = usize::MAX;

use Class::*;
use Segment::*;

#[rustfmt::skip]
static GRAMMAR: &[Segment] = &[
    Literal(b'%'),
    Open(Field::Kind), Run(Letter, 2, 2), Close,
    Literal(b','),
    Open(Field::UnitId), Run(Digit, 1, MANY), Close,
    Literal(b':'),
    Run(Digit, 1, MANY), // subtype
    Literal(b','),
    Open(Field::Year), Run(Digit, 2, 2), Close,
    Open(Field::Month), Run(Digit, 2, 2), Close,
    Open(Field::Day), Run(Digit, 2, 2), Close,
    Open(Field::Hour), Run(Digit, 2, 2), Close,
    Open(Field::Minute), Run(Digit, 2, 2), Close,
    Open(Field::Second), Run(Digit, 2, 2), Close,
    Literal(b','),
    Open(Field::LonHemisphere), Run(EastWest, 1, 1), Close,
    Open(Field::Longitude), Run(Digit, 3, 3), Literal(b'.'), Run(Digit, 6, 6), Close,
    Literal(b','),
    Open(Field::LatHemisphere), Run(NorthSouth, 1, 1), Close,
    Open(Field::Latitude), Run(Digit, 2, 2), Literal(b'.'), Run(Digit, 6, 6), Close,
    Literal(b','),
    Open(Field::Altitude), Run(Digit, 0, MANY), Close,
    Literal(b','),
    Open(Field::Speed), Run(Digit, 1, MANY), Close,
    Literal(b','),
    Open(Field::Course), Run(Digit, 1, MANY), Close,
    Literal(b','),
    Open(Field::Satellites), Run(Digit, 1, MANY), Close,
    Literal(b','),
    Open(Field::ReportId), Run(NotComma, 1, MANY), Close,
    Literal(b','),
    Open(Field::Status), Run(HexOrDash, 1, MANY), Close,
    Rest,
];

/// Captured substrings of a line that matched the grammar.
#[derive(Debug, Clone, Copy)]
pub struct Captures<'a> {
    line: &'a str,
    spans: [(usize, usize); Field::COUNT],
}

impl<'a> Captures<'a> {
    /// The text captured for `field`. Empty only for an absent altitude.
    pub fn get(&self, field: Field) -> &'a str {
        let (start, end) = self.spans[field as usize];
        &self.line[start..end]
    }
}

/// Match a whole line against the grammar.
///
/// Returns `None` unless the entire line conforms; nothing is extracted from
/// a partial match.
pub fn match_sentence(line: &str) -> Option<Captures<'_>> {
    let bytes = line.as_bytes();
    let mut pos = 0;
    let mut spans = [(0, 0); Field::COUNT];
    let mut open: Option<(Field, usize)> = None;

    for segment in GRAMMAR {
        match *segment {
            Literal(b) => {
                if bytes.get(pos) != Some(&b) {
                    return None;
                }
                pos += 1;
            }
            Run(class, min, max) => {
                let len = bytes[pos..]
                    .iter()
                    .take(max)
                    .take_while(|&&b| class.accepts(b))
                    .count();
                if len < min {
                    return None;
                }
                pos += len;
            }
            Open(field) => open = Some((field, pos)),
            Close => {
                let (field, start) = open.take()?;
                spans[field as usize] = (start, pos);
            }
            Rest => {
                if bytes[pos..].iter().any(|&b| b == b'\r' || b == b'\n') {
                    return None;
                }
                pos = bytes.len();
            }
        }
    }

    (pos == bytes.len()).then_some(Captures { line, spans })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str =
        "%GP,3000012345:0,090723182813,E114.602345,N22.069725,,30,160,4,0,00,,2794-10FF-46000,3>0-0";

    #[test]
    fn test_sample_captures() {
        let caps = match_sentence(SAMPLE).unwrap();
        assert_eq!(caps.get(Field::Kind), "GP");
        assert_eq!(caps.get(Field::UnitId), "3000012345");
        assert_eq!(caps.get(Field::Year), "09");
        assert_eq!(caps.get(Field::Month), "07");
        assert_eq!(caps.get(Field::Day), "23");
        assert_eq!(caps.get(Field::Hour), "18");
        assert_eq!(caps.get(Field::Minute), "28");
        assert_eq!(caps.get(Field::Second), "13");
        assert_eq!(caps.get(Field::LonHemisphere), "E");
        assert_eq!(caps.get(Field::Longitude), "114.602345");
        assert_eq!(caps.get(Field::LatHemisphere), "N");
        assert_eq!(caps.get(Field::Latitude), "22.069725");
        assert_eq!(caps.get(Field::Altitude), "");
        assert_eq!(caps.get(Field::Speed), "30");
        assert_eq!(caps.get(Field::Course), "160");
        assert_eq!(caps.get(Field::Satellites), "4");
        assert_eq!(caps.get(Field::ReportId), "0");
        assert_eq!(caps.get(Field::Status), "00");
    }

    #[test]
    fn test_altitude_present() {
        let line = SAMPLE.replace("N22.069725,,", "N22.069725,125,");
        let caps = match_sentence(&line).unwrap();
        assert_eq!(caps.get(Field::Altitude), "125");
    }

    #[test]
    fn test_status_without_trailing_content() {
        let caps = match_sentence("%KP,1:0,090723182813,W001.000000,S01.000000,,0,0,0,r-7,A-f").unwrap();
        assert_eq!(caps.get(Field::ReportId), "r-7");
        assert_eq!(caps.get(Field::Status), "A-f");
    }

    #[test]
    fn test_status_stops_at_first_non_hex() {
        let caps = match_sentence("%KP,1:0,090723182813,W001.000000,S01.000000,,0,0,0,r,0aZ9").unwrap();
        assert_eq!(caps.get(Field::Status), "0a");
    }

    #[test]
    fn test_report_id_may_be_non_ascii() {
        let line = SAMPLE.replace(",4,0,00,", ",4,été,00,");
        let caps = match_sentence(&line).unwrap();
        assert_eq!(caps.get(Field::ReportId), "été");
    }

    #[test]
    fn test_empty_line() {
        assert!(match_sentence("").is_none());
    }

    #[test]
    fn test_type_must_be_two_letters() {
        assert!(match_sentence(&SAMPLE.replacen("%GP,", "%G,", 1)).is_none());
        assert!(match_sentence(&SAMPLE.replacen("%GP,", "%GPS,", 1)).is_none());
        assert!(match_sentence(&SAMPLE.replacen("%GP,", "%G1,", 1)).is_none());
    }

    #[test]
    fn test_missing_subtype() {
        assert!(match_sentence(&SAMPLE.replacen(":0,", ":,", 1)).is_none());
    }

    #[test]
    fn test_non_numeric_date() {
        assert!(match_sentence(&SAMPLE.replacen("090723182813", "09O723182813", 1)).is_none());
        assert!(match_sentence(&SAMPLE.replacen("090723182813", "0907231828", 1)).is_none());
    }

    #[test]
    fn test_malformed_coordinates() {
        assert!(match_sentence(&SAMPLE.replacen("E114.602345", "E14.602345", 1)).is_none());
        assert!(match_sentence(&SAMPLE.replacen("E114.602345", "E114.60234", 1)).is_none());
        assert!(match_sentence(&SAMPLE.replacen("E114.602345", "X114.602345", 1)).is_none());
        assert!(match_sentence(&SAMPLE.replacen("N22.069725", "N222.069725", 1)).is_none());
        assert!(match_sentence(&SAMPLE.replacen("N22.069725", "E22.069725", 1)).is_none());
    }

    #[test]
    fn test_missing_fields() {
        assert!(match_sentence("%GP,3000012345:0,090723182813,E114.602345,N22.069725,,30,160,4").is_none());
        // Status must contain at least one hex digit or dash.
        assert!(match_sentence("%GP,3000012345:0,090723182813,E114.602345,N22.069725,,30,160,4,0,").is_none());
    }

    #[test]
    fn test_line_terminator_rejected() {
        assert!(match_sentence(&format!("{SAMPLE}\r\n")).is_none());
        assert!(match_sentence(&format!("{SAMPLE}\n")).is_none());
    }

    #[test]
    fn test_leading_garbage_rejected() {
        assert!(match_sentence(&format!(" {SAMPLE}")).is_none());
    }
}
