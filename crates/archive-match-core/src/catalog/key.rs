use crate::model::{CatalogEntry, EventType, Region};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref YEAR: Regex = Regex::new(r"\b(19[7-9]\d|20[0-2]\d)\b").expect("valid year regex");
    static ref EVENT_NUMBER: Regex =
        Regex::new(r"(?i)event\s*#?\s*(\d+)").expect("valid event number regex");
    static ref EPISODE: Regex = Regex::new(r"(?i)episode\s*(\d+)").expect("valid episode regex");
    static ref PART: Regex = Regex::new(r"(?i)part\s*(\d+)").expect("valid part regex");
}

/// Title keywords checked when the season label names no event type.
const TITLE_EVENT_KEYWORDS: &[(&str, EventType)] = &[
    ("grudge match", EventType::Gm),
    ("heads up", EventType::Hu),
    ("heads-up", EventType::Hu),
    ("high roller", EventType::Hr),
    ("main event", EventType::Me),
    ("players championship", EventType::Ppc),
];

/// Structured identity parsed from a catalog entry's labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogKey {
    pub year: Option<i32>,
    pub region: Option<Region>,
    pub event_type: Option<EventType>,
    pub event_number: Option<u32>,
    pub episode: Option<u32>,
}

impl CatalogKey {
    pub fn parse(entry: &CatalogEntry) -> Self {
        let title = entry.title.as_str();
        let season = entry.season.as_deref().unwrap_or("");
        let collection = entry.collection.as_deref().unwrap_or("");

        let year = [season, title, collection].iter().find_map(|text| {
            YEAR.captures(text)
                .and_then(|caps| caps[1].parse::<i32>().ok())
        });

        let title_lower = title.to_lowercase();
        let season_lower = season.to_lowercase();
        let all_text = format!("{} {} {}", title_lower, season_lower, collection.to_lowercase());

        Self {
            year,
            region: parse_region(&all_text),
            event_type: parse_event_type(&season_lower, &title_lower),
            event_number: first_number(&EVENT_NUMBER, title),
            episode: first_number(&EPISODE, title).or_else(|| first_number(&PART, title)),
        }
    }

    /// Exact-index key: year plus at least one of event number and episode.
    pub fn exact_key(&self) -> Option<ExactKey> {
        let year = self.year?;
        if self.event_number.is_none() && self.episode.is_none() {
            return None;
        }
        Some((year, self.event_number, self.episode))
    }
}

/// `(year, event_number, episode)`.
pub type ExactKey = (i32, Option<u32>, Option<u32>);

fn first_number(re: &Regex, text: &str) -> Option<u32> {
    re.captures(text).and_then(|caps| caps[1].parse().ok())
}

fn parse_region(all_text: &str) -> Option<Region> {
    if all_text.contains("wsope") || all_text.contains("europe") {
        Some(Region::Eu)
    } else if all_text.contains("apac") || all_text.contains("asia") {
        Some(Region::Apac)
    } else if all_text.contains("paradise") {
        Some(Region::Paradise)
    } else if all_text.contains("cyprus") {
        Some(Region::Cyprus)
    } else {
        None
    }
}

fn parse_event_type(season_lower: &str, title_lower: &str) -> Option<EventType> {
    if season_lower.contains("main event") {
        return Some(EventType::Me);
    }
    if season_lower.contains("bracelet") {
        return Some(if title_lower.contains("grudge match") {
            EventType::Gm
        } else if title_lower.contains("heads up") || title_lower.contains("heads-up") {
            EventType::Hu
        } else {
            EventType::Br
        });
    }
    TITLE_EVENT_KEYWORDS
        .iter()
        .find(|(keyword, _)| title_lower.contains(keyword))
        .map(|(_, event_type)| *event_type)
}
