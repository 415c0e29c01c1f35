use crate::config::AppConfig;
use crate::error::Error;
use crate::extract::fields::{expand_short_year, is_plausible_year};
use crate::model::{EventType, ExtractedMetadata, Region, RuleTier, UNKNOWN_PATTERN};
use regex::{Captures, Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

const YEAR_BOOST: f64 = 0.05;
const EVENT_TYPE_BOOST: f64 = 0.05;
const REGION_BOOST: f64 = 0.03;

/// Capture group indices feeding metadata fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureMap {
    pub year: Option<usize>,
    pub event_type: Option<usize>,
    pub event_number: Option<usize>,
    pub episode: Option<usize>,
    pub season: Option<usize>,
}

/// Uncompiled rule, as written in a rules file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub pattern_id: String,
    pub regex: String,
    pub base_confidence: f64,
    #[serde(default)]
    pub region: Option<Region>,
    #[serde(default)]
    pub event_type: Option<EventType>,
    #[serde(default)]
    pub captures: CaptureMap,
}

impl RuleSpec {
    pub fn new(pattern_id: &str, regex: &str, base_confidence: f64) -> Self {
        Self {
            pattern_id: pattern_id.to_string(),
            regex: regex.to_string(),
            base_confidence,
            region: None,
            event_type: None,
            captures: CaptureMap::default(),
        }
    }

    fn region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    fn event_type(mut self, event_type: EventType) -> Self {
        self.event_type = Some(event_type);
        self
    }

    fn captures(mut self, captures: CaptureMap) -> Self {
        self.captures = captures;
        self
    }
}

/// Contents of a TOML rules file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuleFile {
    #[serde(default)]
    pub replace_builtin: bool,
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
}

impl RuleFile {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, Error> {
        Ok(toml::from_str(text)?)
    }
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub pattern_id: String,
    pub regex: Regex,
    pub base_confidence: f64,
    pub region: Option<Region>,
    pub event_type: Option<EventType>,
    pub captures: CaptureMap,
}

impl Rule {
    pub fn compile(spec: RuleSpec) -> Result<Self, Error> {
        if !(spec.base_confidence > 0.0 && spec.base_confidence <= 1.0) {
            return Err(Error::Other(format!(
                "rule '{}' has base_confidence {} outside (0, 1]",
                spec.pattern_id, spec.base_confidence
            )));
        }
        let regex = RegexBuilder::new(&spec.regex)
            .case_insensitive(true)
            .build()
            .map_err(|source| Error::InvalidRule {
                pattern_id: spec.pattern_id.clone(),
                source,
            })?;
        Ok(Self {
            pattern_id: spec.pattern_id,
            regex,
            base_confidence: spec.base_confidence,
            region: spec.region,
            event_type: spec.event_type,
            captures: spec.captures,
        })
    }

    fn template_fill(&self, caps: &Captures<'_>) -> TemplateFill {
        let text = |group: Option<usize>| group.and_then(|g| caps.get(g)).map(|m| m.as_str());

        let year = text(self.captures.year)
            .and_then(|t| t.parse::<i32>().ok().map(|n| (t.len(), n)))
            .map(|(len, n)| if len == 2 { expand_short_year(n) } else { n })
            .filter(|y| is_plausible_year(*y));

        TemplateFill {
            year,
            region: self.region,
            event_type: text(self.captures.event_type)
                .and_then(EventType::from_code)
                .or(self.event_type),
            event_number: text(self.captures.event_number).and_then(|t| t.parse().ok()),
            episode: text(self.captures.episode).and_then(|t| t.parse().ok()),
            season: text(self.captures.season).and_then(|t| t.parse().ok()),
        }
    }
}

/// Category-keyed rule used when no primary rule matched.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackRule {
    pub pattern_id: String,
    pub base_confidence: f64,
    pub requires_year: bool,
    pub requires_event_type: bool,
}

impl FallbackRule {
    fn new(pattern_id: &str, base_confidence: f64, requires_year: bool, requires_event_type: bool) -> Self {
        Self {
            pattern_id: pattern_id.to_string(),
            base_confidence,
            requires_year,
            requires_event_type,
        }
    }

    fn accepts(&self, fields: &ExtractedMetadata) -> bool {
        (!self.requires_year || fields.year.is_some())
            && (!self.requires_event_type || fields.event_type.is_some())
    }
}

/// Values a rule contributes on top of generic extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TemplateFill {
    pub year: Option<i32>,
    pub region: Option<Region>,
    pub event_type: Option<EventType>,
    pub event_number: Option<u32>,
    pub episode: Option<u32>,
    pub season: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub pattern_id: String,
    pub confidence: f64,
    pub tier: RuleTier,
    pub fill: TemplateFill,
}

impl Classification {
    fn unknown() -> Self {
        Self {
            pattern_id: UNKNOWN_PATTERN.to_string(),
            confidence: 0.0,
            tier: RuleTier::Unmatched,
            fill: TemplateFill::default(),
        }
    }
}

/// Ordered, immutable rule list. The first matching primary rule wins;
/// fallbacks run only for paths under one of `fallback_categories`.
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    rules: Vec<Rule>,
    fallbacks: Vec<FallbackRule>,
    fallback_categories: Vec<String>,
}

impl PatternCatalog {
    pub fn new(rules: Vec<Rule>, fallbacks: Vec<FallbackRule>, fallback_categories: Vec<String>) -> Self {
        Self {
            rules,
            fallbacks,
            fallback_categories,
        }
    }

    pub fn builtin() -> Self {
        let rules = builtin_rule_specs()
            .into_iter()
            .map(|spec| Rule::compile(spec).expect("built-in rules compile"))
            .collect();
        Self::new(rules, builtin_fallbacks(), vec!["WSOP".to_string()])
    }

    /// Built-in rules, configured fallback categories and the optional rules file.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let mut catalog =
            Self::builtin().with_fallback_categories(config.fallback_categories.clone());
        if let Some(path) = &config.rules_file {
            info!("Loading pattern rules from {}", path);
            catalog = catalog.with_rule_file(RuleFile::load(Path::new(path))?)?;
        }
        debug!(
            "Pattern catalog ready: {} primary rules, {} fallbacks",
            catalog.rules.len(),
            catalog.fallbacks.len()
        );
        Ok(catalog)
    }

    pub fn with_fallback_categories(mut self, categories: Vec<String>) -> Self {
        self.fallback_categories = categories;
        self
    }

    /// Appends the file's rules after the current primary rules, or replaces
    /// them when the file sets `replace_builtin`.
    pub fn with_rule_file(mut self, file: RuleFile) -> Result<Self, Error> {
        let compiled = file
            .rules
            .into_iter()
            .map(Rule::compile)
            .collect::<Result<Vec<_>, _>>()?;
        if file.replace_builtin {
            self.rules = compiled;
        } else {
            self.rules.extend(compiled);
        }
        Ok(self)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn fallbacks(&self) -> &[FallbackRule] {
        &self.fallbacks
    }

    pub fn fallback_categories(&self) -> &[String] {
        &self.fallback_categories
    }

    /// Identifies the naming convention of `full_path`.
    ///
    /// `fields` holds the generically extracted values; boosts are derived
    /// from them, not from the rule's own template.
    pub fn classify(&self, full_path: &str, fields: &ExtractedMetadata) -> Classification {
        for rule in &self.rules {
            if let Some(caps) = rule.regex.captures(full_path) {
                return Classification {
                    pattern_id: rule.pattern_id.clone(),
                    confidence: boosted(rule.base_confidence, fields, false, false),
                    tier: RuleTier::Primary,
                    fill: rule.template_fill(&caps),
                };
            }
        }

        let in_fallback_category = fields.category.as_deref().is_some_and(|category| {
            self.fallback_categories
                .iter()
                .any(|c| c.eq_ignore_ascii_case(category))
        });
        if in_fallback_category {
            if let Some(rule) = self.fallbacks.iter().find(|r| r.accepts(fields)) {
                return Classification {
                    pattern_id: rule.pattern_id.clone(),
                    confidence: boosted(
                        rule.base_confidence,
                        fields,
                        rule.requires_year,
                        rule.requires_event_type,
                    ),
                    tier: RuleTier::Fallback,
                    fill: TemplateFill::default(),
                };
            }
        }

        Classification::unknown()
    }
}

impl Default for PatternCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn boosted(base: f64, fields: &ExtractedMetadata, skip_year: bool, skip_event_type: bool) -> f64 {
    let mut confidence = base;
    if fields.year.is_some() && !skip_year {
        confidence += YEAR_BOOST;
    }
    if fields.event_type.is_some() && !skip_event_type {
        confidence += EVENT_TYPE_BOOST;
    }
    if fields.region.is_some() {
        confidence += REGION_BOOST;
    }
    ((confidence * 10_000.0).round() / 10_000.0).min(1.0)
}

fn builtin_fallbacks() -> Vec<FallbackRule> {
    vec![
        FallbackRule::new("WSOP_GENERIC", 0.6, true, true),
        FallbackRule::new("WSOP_YEAR_ONLY", 0.5, true, false),
        FallbackRule::new("WSOP_UNKNOWN", 0.3, false, false),
    ]
}

fn year_capture(year: usize) -> CaptureMap {
    CaptureMap {
        year: Some(year),
        ..CaptureMap::default()
    }
}

/// Known archive naming conventions, most specific first.
pub fn builtin_rule_specs() -> Vec<RuleSpec> {
    vec![
        RuleSpec::new("WSOP_BR_LV_2025_ME", r"WSOP.*Bracelet.*LAS.?VEGAS.*2025.*MAIN.?EVENT", 1.0)
            .region(Region::Lv)
            .event_type(EventType::Me),
        RuleSpec::new("WSOP_BR_LV_2025_SIDE", r"WSOP.*Bracelet.*LAS.?VEGAS.*2025.*BRACELET.?SIDE", 0.95)
            .region(Region::Lv)
            .event_type(EventType::Br),
        RuleSpec::new("WSOP_BR_EU_2025", r"WSOP.*Bracelet.*EUROPE.*2025", 0.95).region(Region::Eu),
        RuleSpec::new("WSOP_BR_EU", r"WSOP.*Bracelet.*EUROPE", 0.9).region(Region::Eu),
        RuleSpec::new("WSOP_BR_PARADISE", r"WSOP.*Bracelet.*PARADISE", 0.9).region(Region::Paradise),
        RuleSpec::new("WSOP_BR_LV", r"WSOP.*Bracelet.*LAS.?VEGAS", 0.85).region(Region::Lv),
        RuleSpec::new("WSOP_CIRCUIT_LA", r"WSOP.*Circuit.*LA", 0.9).region(Region::La),
        RuleSpec::new("WSOP_CIRCUIT_SUPER", r"WSOP.*Super.?Circuit", 0.9),
        RuleSpec::new("WSOP_ARCHIVE_PRE2016", r"WSOP.*ARCHIVE.*PRE-?2016", 0.85).region(Region::Lv),
        RuleSpec::new("WSOP_CLIP_POKERGO", r"\d+-wsop-(\d{4})-(be|me)-", 0.95).captures(CaptureMap {
            year: Some(1),
            event_type: Some(2),
            ..CaptureMap::default()
        }),
        RuleSpec::new("WSOP_WS_SHORT", r"WS(\d{2})[_\-]([A-Z]{2})(\d{2})", 0.9).captures(CaptureMap {
            year: Some(1),
            event_type: Some(2),
            episode: Some(3),
            ..CaptureMap::default()
        }),
        RuleSpec::new("WSOP_WSOP_SHORT", r"WSOP(\d{2})[_\-]", 0.9).captures(year_capture(1)),
        RuleSpec::new("WSOP_WSOPE_EP", r"WSOPE(\d{2})[_\-]Episode", 0.9)
            .region(Region::Eu)
            .captures(year_capture(1)),
        RuleSpec::new("WSOP_WSE", r"WSE(\d{2})[_\-]", 0.9)
            .region(Region::Eu)
            .captures(year_capture(1)),
        RuleSpec::new("WSOP_EVENT_NUM", r"(\d{4})\s*WSOP\s*Event\s*#(\d+)", 0.95).captures(CaptureMap {
            year: Some(1),
            event_number: Some(2),
            ..CaptureMap::default()
        }),
        RuleSpec::new("WSOP_BRACELET_EVENT", r"WSOP.*Bracelet.*Event", 0.85),
        RuleSpec::new("WSOP_HISTORIC", r"WSOP\s*-\s*(\d{4})", 0.8)
            .region(Region::Lv)
            .captures(year_capture(1)),
        RuleSpec::new("WSOP_ESPN", r"ESPN.*WSOP|WSOP.*Show.*\d+", 0.8),
        RuleSpec::new("WSOP_MXF_ARCHIVE", r"WSOP[_\-](\d{4}).*\.mxf", 0.85).captures(year_capture(1)),
        RuleSpec::new("WSOP_2016_ME", r"2016.*World.*Series.*Main.*Event", 0.9).event_type(EventType::Me),
        RuleSpec::new("PAD", r"PAD.*pad[_\-]s(\d{2})[_\-]ep(\d{2})", 1.0).captures(CaptureMap {
            season: Some(1),
            episode: Some(2),
            ..CaptureMap::default()
        }),
        RuleSpec::new("GOG", r"GOG.*E(\d{2})[_\-]GOG", 1.0).captures(CaptureMap {
            episode: Some(1),
            ..CaptureMap::default()
        }),
        RuleSpec::new("MPP_ME", r"MPP.*Main.?Event", 0.95)
            .region(Region::Cyprus)
            .event_type(EventType::Me),
        RuleSpec::new("MPP", r"MPP.*\$\d+[MK]?\s*GTD", 0.9).region(Region::Cyprus),
        RuleSpec::new("GGMILLIONS", r"GGMillions.*Super.*High.*Roller", 0.9).event_type(EventType::Hr),
        RuleSpec::new("HCL", r"^HCL", 0.8),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(year: Option<i32>, event_type: Option<EventType>, region: Option<Region>) -> ExtractedMetadata {
        ExtractedMetadata {
            year,
            event_type,
            region,
            category: Some("WSOP".to_string()),
            ..ExtractedMetadata::unknown()
        }
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let catalog = PatternCatalog::builtin();
        let path = "WSOP/WSOP Bracelet Event/WSOP-LAS VEGAS/2025 WSOP-LAS VEGAS MAIN EVENT/day1.mp4";
        let c = catalog.classify(path, &fields(None, None, None));
        assert_eq!(c.pattern_id, "WSOP_BR_LV_2025_ME");
        assert_eq!(c.tier, RuleTier::Primary);
        assert_eq!(c.fill.region, Some(Region::Lv));
        assert_eq!(c.fill.event_type, Some(EventType::Me));
    }

    #[test]
    fn test_boosts_are_capped() {
        let catalog = PatternCatalog::builtin();
        let c = catalog.classify(
            "WSOP/WSOP24_ME05.mp4",
            &fields(Some(2024), Some(EventType::Me), Some(Region::Lv)),
        );
        assert_eq!(c.pattern_id, "WSOP_WSOP_SHORT");
        assert_eq!(c.confidence, 1.0);
    }

    #[test]
    fn test_capture_template() {
        let catalog = PatternCatalog::builtin();
        let c = catalog.classify("Archive/WS11_GM02.mp4", &fields(None, None, None));
        assert_eq!(c.pattern_id, "WSOP_WS_SHORT");
        assert_eq!(c.fill.year, Some(2011));
        assert_eq!(c.fill.event_type, Some(EventType::Gm));
        assert_eq!(c.fill.episode, Some(2));
    }

    #[test]
    fn test_fallback_bands() {
        let catalog = PatternCatalog::builtin();
        let path = "WSOP/misc/final.mp4";

        let generic = catalog.classify(path, &fields(Some(2010), Some(EventType::Me), None));
        assert_eq!(generic.pattern_id, "WSOP_GENERIC");
        assert_eq!(generic.tier, RuleTier::Fallback);
        assert_eq!(generic.confidence, 0.6);

        let year_only = catalog.classify(path, &fields(Some(2010), None, None));
        assert_eq!(year_only.pattern_id, "WSOP_YEAR_ONLY");
        assert_eq!(year_only.confidence, 0.5);

        let bare = catalog.classify(path, &fields(None, None, None));
        assert_eq!(bare.pattern_id, "WSOP_UNKNOWN");
        assert_eq!(bare.confidence, 0.3);

        let with_region = catalog.classify(path, &fields(Some(2010), Some(EventType::Me), Some(Region::Eu)));
        assert!((with_region.confidence - 0.63).abs() < 1e-9);
    }

    #[test]
    fn test_fallback_needs_listed_category() {
        let catalog = PatternCatalog::builtin();
        let mut meta = fields(Some(2010), Some(EventType::Me), None);
        meta.category = Some("Holiday".to_string());
        let c = catalog.classify("Holiday/beach.mp4", &meta);
        assert_eq!(c.pattern_id, UNKNOWN_PATTERN);
        assert_eq!(c.confidence, 0.0);
        assert_eq!(c.tier, RuleTier::Unmatched);
    }

    #[test]
    fn test_rule_file_appends_and_replaces() {
        let text = r#"
            [[rules]]
            pattern_id = "WSOP_YEAR_ME"
            regex = 'WSOP\s+(\d{4})\s+Main\s*Event'
            base_confidence = 0.85
            region = "LV"
            event_type = "ME"
            captures = { year = 1 }
        "#;
        let file = RuleFile::parse(text).unwrap();
        let catalog = PatternCatalog::builtin().with_rule_file(file.clone()).unwrap();
        assert_eq!(catalog.rules().len(), builtin_rule_specs().len() + 1);
        assert_eq!(catalog.rules().last().unwrap().pattern_id, "WSOP_YEAR_ME");

        let replaced = PatternCatalog::builtin()
            .with_rule_file(RuleFile {
                replace_builtin: true,
                ..file
            })
            .unwrap();
        assert_eq!(replaced.rules().len(), 1);
    }

    #[test]
    fn test_invalid_rule_regex_is_reported() {
        let spec = RuleSpec::new("BROKEN", r"WSOP(\d{2}", 0.5);
        match Rule::compile(spec) {
            Err(Error::InvalidRule { pattern_id, .. }) => assert_eq!(pattern_id, "BROKEN"),
            other => panic!("expected InvalidRule, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_confidence_rule_is_rejected() {
        let spec = RuleSpec::new("ZERO", r"x", 0.0);
        assert!(matches!(Rule::compile(spec), Err(Error::Other(_))));
    }
}
