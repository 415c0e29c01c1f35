use serde::{Deserialize, Serialize};
use std::fmt;

pub const UNKNOWN_PATTERN: &str = "UNKNOWN";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    Apac,
    Eu,
    Paradise,
    Lv,
    La,
    Cyprus,
    London,
}

impl Region {
    pub fn code(self) -> &'static str {
        match self {
            Region::Apac => "APAC",
            Region::Eu => "EU",
            Region::Paradise => "PARADISE",
            Region::Lv => "LV",
            Region::La => "LA",
            Region::Cyprus => "CYPRUS",
            Region::London => "LONDON",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Region::Apac => "APAC",
            Region::Eu => "Europe",
            Region::Paradise => "Paradise",
            Region::Lv => "Las Vegas",
            Region::La => "Circuit LA",
            Region::Cyprus => "Cyprus",
            Region::London => "London",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "APAC" => Some(Region::Apac),
            "EU" => Some(Region::Eu),
            "PARADISE" => Some(Region::Paradise),
            "LV" => Some(Region::Lv),
            "LA" => Some(Region::La),
            "CYPRUS" => Some(Region::Cyprus),
            "LONDON" => Some(Region::London),
            _ => None,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventType {
    Me,
    Br,
    Hr,
    Hu,
    Gm,
    Ppc,
}

impl EventType {
    pub fn code(self) -> &'static str {
        match self {
            EventType::Me => "ME",
            EventType::Br => "BR",
            EventType::Hr => "HR",
            EventType::Hu => "HU",
            EventType::Gm => "GM",
            EventType::Ppc => "PPC",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            EventType::Me => "Main Event",
            EventType::Br => "Bracelet",
            EventType::Hr => "High Roller",
            EventType::Hu => "Heads Up",
            EventType::Gm => "Grudge Match",
            EventType::Ppc => "Poker Players Championship",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "ME" => Some(EventType::Me),
            "BR" => Some(EventType::Br),
            "HR" => Some(EventType::Hr),
            "HU" => Some(EventType::Hu),
            "GM" => Some(EventType::Gm),
            "PPC" => Some(EventType::Ppc),
            _ => None,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Which kind of catalog rule assigned `pattern_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleTier {
    Primary,
    Fallback,
    Unmatched,
}

/// Strategy that populated a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    FourDigitYear,
    PrefixedShortYear,
    DateToken,
    PathKeyword,
    FilenameCode,
    EventNumberToken,
    EpisodeToken,
    StageToken,
    RuleTemplate,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub year: Option<FieldSource>,
    pub region: Option<FieldSource>,
    pub event_type: Option<FieldSource>,
    pub event_number: Option<FieldSource>,
    pub episode: Option<FieldSource>,
    pub stage: Option<FieldSource>,
}

/// Structured identity recovered from one path.
///
/// `confidence == 0.0` exactly when `pattern_id == "UNKNOWN"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedMetadata {
    pub year: Option<i32>,
    pub region: Option<Region>,
    pub event_type: Option<EventType>,
    pub event_number: Option<u32>,
    pub episode: Option<u32>,
    pub stage: Option<String>,
    pub category: Option<String>,
    pub pattern_id: String,
    pub confidence: f64,
    pub rule_tier: RuleTier,
    pub buyin: Option<String>,
    pub version: Option<String>,
    pub part: Option<u32>,
    pub season: Option<u32>,
    pub provenance: Provenance,
}

impl ExtractedMetadata {
    pub fn unknown() -> Self {
        Self {
            year: None,
            region: None,
            event_type: None,
            event_number: None,
            episode: None,
            stage: None,
            category: None,
            pattern_id: UNKNOWN_PATTERN.to_string(),
            confidence: 0.0,
            rule_tier: RuleTier::Unmatched,
            buyin: None,
            version: None,
            part: None,
            season: None,
            provenance: Provenance::default(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.pattern_id == UNKNOWN_PATTERN
    }

    /// True when at least one grouping key field is populated.
    pub fn has_key(&self) -> bool {
        self.year.is_some()
            || self.region.is_some()
            || self.event_type.is_some()
            || self.episode.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_through_from_code() {
        for et in [
            EventType::Me,
            EventType::Br,
            EventType::Hr,
            EventType::Hu,
            EventType::Gm,
            EventType::Ppc,
        ] {
            assert_eq!(EventType::from_code(et.code()), Some(et));
        }
        assert_eq!(Region::from_code("eu"), Some(Region::Eu));
        assert_eq!(Region::from_code("MARS"), None);
    }

    #[test]
    fn test_unknown_has_zero_confidence() {
        let meta = ExtractedMetadata::unknown();
        assert!(meta.is_unknown());
        assert_eq!(meta.confidence, 0.0);
        assert!(!meta.has_key());
    }

    #[test]
    fn test_enums_serialize_as_codes() {
        assert_eq!(serde_json::to_string(&Region::Lv).unwrap(), "\"LV\"");
        assert_eq!(serde_json::to_string(&EventType::Ppc).unwrap(), "\"PPC\"");
    }
}
