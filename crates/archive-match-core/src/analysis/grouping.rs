use crate::model::{EventType, ExtractedMetadata, RawPathRecord, Region};
use ahash::{AHashMap, AHashSet};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

/// Partial identity shared by every member of a group. `None` is a wildcard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    pub year: Option<i32>,
    pub region: Option<Region>,
    pub event_type: Option<EventType>,
    pub episode: Option<u32>,
}

impl GroupKey {
    pub fn from_metadata(meta: &ExtractedMetadata) -> Self {
        Self {
            year: meta.year,
            region: meta.region,
            event_type: meta.event_type,
            episode: meta.episode,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.year.is_none()
            && self.region.is_none()
            && self.event_type.is_none()
            && self.episode.is_none()
    }

    /// No field populated on both sides disagrees.
    pub fn compatible_with(&self, other: &GroupKey) -> bool {
        agrees(self.year, other.year)
            && agrees(self.region, other.region)
            && agrees(self.event_type, other.event_type)
            && agrees(self.episode, other.episode)
    }

    fn shared_fields(&self, other: &GroupKey) -> usize {
        [
            self.year.is_some() && other.year.is_some(),
            self.region.is_some() && other.region.is_some(),
            self.event_type.is_some() && other.event_type.is_some(),
            self.episode.is_some() && other.episode.is_some(),
        ]
        .iter()
        .filter(|shared| **shared)
        .count()
    }

    fn absorb(&mut self, other: &GroupKey) {
        self.year = self.year.or(other.year);
        self.region = self.region.or(other.region);
        self.event_type = self.event_type.or(other.event_type);
        self.episode = self.episode.or(other.episode);
    }
}

fn agrees<T: PartialEq>(a: Option<T>, b: Option<T>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    }
}

/// Files believed to hold one logical piece of content.
///
/// Member and primary entries are indices into the record slice the group
/// was built from, in discovery order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetGroup {
    pub group_id: String,
    pub group_key: GroupKey,
    /// `Event #N`; separates bracelet events that share year and type.
    pub event_number: Option<u32>,
    /// `Part N`; separates multi-part classic broadcasts.
    pub part: Option<u32>,
    pub member_records: Vec<usize>,
    pub primary_record: usize,
    pub file_count: usize,
    pub total_size_bytes: u64,
}

impl AssetGroup {
    fn new(index: usize, key: GroupKey, meta: &ExtractedMetadata, size: u64) -> Self {
        Self {
            group_id: String::new(),
            group_key: key,
            event_number: meta.event_number,
            part: meta.part,
            member_records: vec![index],
            primary_record: index,
            file_count: 1,
            total_size_bytes: size,
        }
    }

    pub fn is_keyed(&self) -> bool {
        !self.group_key.is_empty()
    }

    pub fn primary<'a>(&self, records: &'a [RawPathRecord]) -> &'a RawPathRecord {
        &records[self.primary_record]
    }

    fn accepts(&self, key: &GroupKey, meta: &ExtractedMetadata) -> bool {
        self.is_keyed()
            && self.group_key.compatible_with(key)
            && agrees(self.event_number, meta.event_number)
            && agrees(self.part, meta.part)
    }

    fn affinity(&self, key: &GroupKey, meta: &ExtractedMetadata) -> usize {
        let extra = [
            self.event_number.is_some() && meta.event_number.is_some(),
            self.part.is_some() && meta.part.is_some(),
        ]
        .iter()
        .filter(|shared| **shared)
        .count();
        self.group_key.shared_fields(key) + extra
    }

    fn add(&mut self, index: usize, key: &GroupKey, meta: &ExtractedMetadata, size: u64) {
        self.group_key.absorb(key);
        self.event_number = self.event_number.or(meta.event_number);
        self.part = self.part.or(meta.part);
        self.member_records.push(index);
        self.file_count += 1;
        self.total_size_bytes += size;
    }
}

/// Clusters extracted records into asset groups in one pass over discovery
/// order.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetGrouper;

impl AssetGrouper {
    /// `records` and `metadata` are index-aligned.
    ///
    /// A record joins the compatible group with which it shares the most
    /// populated fields (earliest group on ties) and must share at least one.
    /// Records with an empty key always get a group of their own.
    pub fn group(&self, records: &[RawPathRecord], metadata: &[ExtractedMetadata]) -> Vec<AssetGroup> {
        let mut groups: Vec<AssetGroup> = Vec::new();
        // groups by known year; `None` holds groups whose year is still open
        let mut by_year: AHashMap<Option<i32>, Vec<usize>> = AHashMap::new();

        for (index, (record, meta)) in records.iter().zip(metadata).enumerate() {
            let key = GroupKey::from_metadata(meta);
            let size = record.size_bytes;

            if key.is_empty() {
                groups.push(AssetGroup::new(index, key, meta, size));
                continue;
            }

            let best = {
                let mut candidates: Vec<usize> = match key.year {
                    Some(year) => by_year
                        .get(&Some(year))
                        .into_iter()
                        .chain(by_year.get(&None))
                        .flatten()
                        .copied()
                        .collect(),
                    None => by_year.values().flatten().copied().collect(),
                };
                candidates.sort_unstable();
                candidates
                    .into_iter()
                    .filter(|&g| groups[g].accepts(&key, meta))
                    .map(|g| (g, groups[g].affinity(&key, meta)))
                    .filter(|(_, affinity)| *affinity > 0)
                    .fold(None, |best: Option<(usize, usize)>, candidate| match best {
                        Some(b) if b.1 >= candidate.1 => Some(b),
                        _ => Some(candidate),
                    })
                    .map(|(g, _)| g)
            };

            match best {
                Some(g) => {
                    let had_year = groups[g].group_key.year.is_some();
                    groups[g].add(index, &key, meta, size);
                    if !had_year {
                        if let Some(year) = groups[g].group_key.year {
                            if let Some(open) = by_year.get_mut(&None) {
                                open.retain(|&x| x != g);
                            }
                            by_year.entry(Some(year)).or_default().push(g);
                        }
                    }
                }
                None => {
                    by_year.entry(key.year).or_default().push(groups.len());
                    groups.push(AssetGroup::new(index, key, meta, size));
                }
            }
        }

        for group in &mut groups {
            group.primary_record = select_primary(&group.member_records, records, metadata);
        }
        assign_group_ids(&mut groups);

        debug!(
            "Grouped {} records into {} groups ({} keyed)",
            records.len(),
            groups.len(),
            groups.iter().filter(|g| g.is_keyed()).count()
        );
        groups
    }
}

/// Highest confidence, then largest file, then first seen.
fn select_primary(members: &[usize], records: &[RawPathRecord], metadata: &[ExtractedMetadata]) -> usize {
    let mut best = members[0];
    for &candidate in &members[1..] {
        let by_confidence = metadata[candidate]
            .confidence
            .total_cmp(&metadata[best].confidence);
        let better = match by_confidence {
            Ordering::Greater => true,
            Ordering::Equal => records[candidate].size_bytes > records[best].size_bytes,
            Ordering::Less => false,
        };
        if better {
            best = candidate;
        }
    }
    best
}

fn assign_group_ids(groups: &mut [AssetGroup]) {
    let mut seen: AHashSet<String> = AHashSet::new();
    let mut ungrouped = 0usize;
    for group in groups.iter_mut() {
        let base = if group.is_keyed() {
            group_label(&group.group_key, group.event_number, group.part)
        } else {
            ungrouped += 1;
            format!("UNGROUPED_{}", ungrouped)
        };
        let mut id = base.clone();
        let mut n = 2;
        while !seen.insert(id.clone()) {
            id = format!("{}_{}", base, n);
            n += 1;
        }
        group.group_id = id;
    }
}

/// `2024_ME_05`, `2014_APAC_ME_01`, `2023_BR_E37`, `2002_ME_P1`.
/// Las Vegas is the default region and is left out.
pub fn group_label(key: &GroupKey, event_number: Option<u32>, part: Option<u32>) -> String {
    let mut parts = vec![key
        .year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "NOYEAR".to_string())];
    if let Some(region) = key.region.filter(|r| *r != Region::Lv) {
        parts.push(region.code().to_string());
    }
    if let Some(event_type) = key.event_type {
        parts.push(event_type.code().to_string());
    }
    if let Some(n) = event_number {
        parts.push(format!("E{}", n));
    } else if let Some(ep) = key.episode {
        parts.push(format!("{:02}", ep));
    } else if let Some(p) = part {
        parts.push(format!("P{}", p));
    }
    parts.join("_")
}

lazy_static! {
    static ref PART_IN_TITLE: Regex = Regex::new(r"(?i)part\s*(\d+)").expect("valid part regex");
}

/// Human title for a group: the catalog title when linked (with `Part N`
/// appended if the title lacks it), otherwise one generated from the key.
pub fn display_title(group: &AssetGroup, catalog_title: Option<&str>) -> String {
    if let Some(title) = catalog_title {
        if let Some(part) = group.part {
            let has_part = PART_IN_TITLE
                .captures_iter(title)
                .any(|caps| caps[1].parse::<u32>().ok() == Some(part));
            if !has_part {
                return format!("{} Part {}", title, part);
            }
        }
        return title.to_string();
    }

    let key = &group.group_key;
    let Some(year) = key.year else {
        return String::new();
    };
    let mut parts = vec!["WSOP".to_string(), year.to_string()];
    if let Some(region) = key.region.filter(|r| *r != Region::Lv) {
        parts.push(region.display_name().to_string());
    }
    if let Some(event_type) = key.event_type {
        parts.push(event_type.display_name().to_string());
    }
    if let Some(ep) = key.episode {
        parts.push(format!("Episode {}", ep));
    } else if let Some(p) = group.part {
        parts.push(format!("Part {}", p));
    } else if let Some(n) = group.event_number {
        parts.push(format!("Event #{}", n));
    }
    parts.join(" ")
}
