//! Generic field extraction shared by every path, independent of which
//! catalog rule later identifies the naming convention.

use crate::model::{EventType, FieldSource, Region};
use lazy_static::lazy_static;
use regex::Regex;

pub const MIN_YEAR: i32 = 1970;
pub const MAX_YEAR: i32 = 2030;

lazy_static! {
    static ref FOUR_DIGIT_YEAR: Regex =
        Regex::new(r"(?:^|[^\d])(\d{4})(?:[^\d]|$)").expect("valid year regex");
    static ref PREFIXED_SHORT_YEAR: Regex =
        Regex::new(r"(?:WS|WSOP|WSOPE|WSE)(\d{2})[_\-]").expect("valid short year regex");
    static ref DATE_TOKEN: Regex =
        Regex::new(r"(?:^|[_\-])(\d{2})(\d{2})(\d{2})(?:[_\-]|$)").expect("valid date regex");
    static ref EVENT_NUMBER: Regex =
        Regex::new(r"(?i)Event\s*#?\s*(\d+)").expect("valid event number regex");
    static ref FILENAME_EVENT_CODES: Vec<(Regex, EventType)> = vec![
        (code_regex(r"[_\-]ME[_\-\d]|(?:^|[_\-\d])ME\d{2}[_\-]"), EventType::Me),
        (code_regex(r"[_\-]GM[_\-\d]"), EventType::Gm),
        (code_regex(r"[_\-]HU[_\-\d]"), EventType::Hu),
        (code_regex(r"[_\-]BR[_\-\d]"), EventType::Br),
        (code_regex(r"[_\-]HR[_\-\d]"), EventType::Hr),
        (code_regex(r"[_\-]PPC[_\-\d]"), EventType::Ppc),
    ];
    static ref EPISODE_PATTERNS: Vec<Regex> = vec![
        code_regex(r"[_\-](\d{2})[_\.\-]"),
        code_regex(r"(?i)EP?(\d{1,2})"),
        code_regex(r"(?i)Episode[_\s]?(\d+)"),
        code_regex(r"(?i)Show[_\s]?(\d+)"),
        code_regex(r"(?i)Part[_\s]?(\d+)"),
    ];
    static ref STAGE_PATTERNS: Vec<(Regex, StageKind)> = vec![
        (code_regex(r"(?i)Final\s*Table"), StageKind::FinalTable),
        (code_regex(r"(?i)Final\s*Day"), StageKind::FinalDay),
        (code_regex(r"(?i)Day\s*(\d+)\s*([ABCD])?"), StageKind::Day),
        (code_regex(r"(?i)Session\s*(\d+)"), StageKind::Session),
    ];
    static ref BUYIN: Regex =
        Regex::new(r"(?i)\$(\d+(?:[.,]\d+)?[KM]?)").expect("valid buy-in regex");
    static ref NO_COMMENTARY: Regex =
        Regex::new(r"NO[\s_\-]*COMMENTARY").expect("valid version regex");
    static ref NB_VERSION: Regex = Regex::new(r"_NB[_\.]").expect("valid version regex");
    static ref PART: Regex = Regex::new(r"(?i)part[_\s\-]*(\d+)").expect("valid part regex");
}

fn code_regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid extraction regex")
}

#[derive(Debug, Clone, Copy)]
enum StageKind {
    FinalTable,
    FinalDay,
    Day,
    Session,
}

/// Ordered region keyword checks against the upper-cased path.
const REGION_RULES: &[(Region, &[&str])] = &[
    (Region::Apac, &["APAC"]),
    (Region::Eu, &["EUROPE", "WSOPE", "-EU", "_EU"]),
    (Region::Paradise, &["PARADISE"]),
    (Region::Lv, &["LAS VEGAS", "LAS_VEGAS"]),
];

/// Keyword checks for a single path segment, in priority order.
const SEGMENT_EVENT_KEYWORDS: &[(EventType, &[&str])] = &[
    (EventType::Me, &["MAIN EVENT", "MAIN_EVENT"]),
    (EventType::Br, &["BRACELET"]),
    (EventType::Hr, &["HIGH ROLLER", "HIGH_ROLLER"]),
    (EventType::Hu, &["HEADS UP", "HEADS-UP"]),
];

/// Two-digit years below 50 belong to 2000s, the rest to 1900s.
pub fn expand_short_year(yy: i32) -> i32 {
    if yy < 50 {
        2000 + yy
    } else {
        1900 + yy
    }
}

pub fn is_plausible_year(year: i32) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&year)
}

/// Year strategies, first success wins:
/// a 4-digit year inside any segment, a `WS`/`WSOP`/`WSOPE`/`WSE` prefixed
/// two-digit year, then a `YYMMDD` date token. A strategy whose value falls
/// outside 1970..=2030 counts as a miss.
pub fn extract_year(segments: &[&str], path_upper: &str, full_path: &str) -> Option<(i32, FieldSource)> {
    for segment in segments {
        let year = FOUR_DIGIT_YEAR
            .captures(segment)
            .and_then(|caps| caps[1].parse::<i32>().ok());
        if let Some(year) = year.filter(|y| is_plausible_year(*y)) {
            return Some((year, FieldSource::FourDigitYear));
        }
    }

    let short = PREFIXED_SHORT_YEAR
        .captures(path_upper)
        .and_then(|caps| caps[1].parse::<i32>().ok())
        .map(expand_short_year)
        .filter(|y| is_plausible_year(*y));
    if let Some(year) = short {
        return Some((year, FieldSource::PrefixedShortYear));
    }

    DATE_TOKEN
        .captures(full_path)
        .and_then(|caps| caps[1].parse::<i32>().ok())
        .map(expand_short_year)
        .filter(|y| is_plausible_year(*y))
        .map(|year| (year, FieldSource::DateToken))
}

pub fn extract_region(path_upper: &str) -> Option<Region> {
    for (region, keywords) in REGION_RULES {
        if keywords.iter().any(|k| path_upper.contains(k)) {
            return Some(*region);
        }
    }
    if path_upper.contains("CIRCUIT") && path_upper.contains("LA") {
        return Some(Region::La);
    }
    if path_upper.contains("CYPRUS") {
        return Some(Region::Cyprus);
    }
    if path_upper.contains("LONDON") {
        return Some(Region::London);
    }
    None
}

fn segment_event_type(segment_upper: &str) -> Option<EventType> {
    SEGMENT_EVENT_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| segment_upper.contains(k)))
        .map(|(event_type, _)| *event_type)
}

fn filename_event_code(filename_upper: &str) -> Option<EventType> {
    FILENAME_EVENT_CODES
        .iter()
        .find(|(re, _)| re.is_match(filename_upper))
        .map(|(_, event_type)| *event_type)
}

/// Event type from path keywords, then filename short codes.
///
/// A `BRACELET` segment names the umbrella series rather than the event, so it
/// only holds when no deeper segment or filename code is more specific.
pub fn extract_event_type(segments: &[&str], filename: &str) -> Option<(EventType, FieldSource)> {
    let mut umbrella = None;
    for segment in segments {
        match segment_event_type(&segment.to_uppercase()) {
            Some(EventType::Br) => {
                if umbrella.is_none() {
                    umbrella = Some(EventType::Br);
                }
            }
            Some(event_type) => return Some((event_type, FieldSource::PathKeyword)),
            None => {}
        }
    }

    if let Some(code) = filename_event_code(&filename.to_uppercase()) {
        return Some((code, FieldSource::FilenameCode));
    }
    umbrella.map(|event_type| (event_type, FieldSource::PathKeyword))
}

pub fn extract_event_number(full_path: &str) -> Option<u32> {
    EVENT_NUMBER
        .captures(full_path)
        .and_then(|caps| caps[1].parse().ok())
}

pub fn extract_episode(filename: &str) -> Option<u32> {
    EPISODE_PATTERNS
        .iter()
        .find_map(|re| re.captures(filename))
        .and_then(|caps| caps[1].parse().ok())
}

pub fn extract_stage(full_path: &str) -> Option<String> {
    for (re, kind) in STAGE_PATTERNS.iter() {
        let Some(caps) = re.captures(full_path) else {
            continue;
        };
        let tag = match kind {
            StageKind::FinalTable => "FT".to_string(),
            StageKind::FinalDay => "FINAL".to_string(),
            StageKind::Day => {
                let flight = caps
                    .get(2)
                    .map(|m| m.as_str().to_uppercase())
                    .unwrap_or_default();
                format!("D{}{}", &caps[1], flight)
            }
            StageKind::Session => format!("S{}", &caps[1]),
        };
        return Some(tag);
    }
    None
}

pub fn extract_buyin(full_path: &str) -> Option<String> {
    BUYIN
        .captures(full_path)
        .map(|caps| caps[1].replace(',', "").to_uppercase())
}

pub fn extract_version(path_upper: &str) -> Option<String> {
    if NO_COMMENTARY.is_match(path_upper) {
        Some("NC".to_string())
    } else if NB_VERSION.is_match(path_upper) {
        Some("NB".to_string())
    } else if path_upper.contains("CLEAN") {
        Some("CLEAN".to_string())
    } else {
        None
    }
}

pub fn extract_part(full_path: &str) -> Option<u32> {
    PART.captures(full_path).and_then(|caps| caps[1].parse().ok())
}
