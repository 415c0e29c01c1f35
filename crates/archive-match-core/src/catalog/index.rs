use crate::analysis::similarity::normalize;
use crate::catalog::key::{CatalogKey, ExactKey};
use crate::model::{CatalogEntry, CatalogRef};
use ahash::AHashMap;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct IndexedEntry {
    pub entry: CatalogEntry,
    pub key: CatalogKey,
    pub normalized_title: String,
    pub is_header: bool,
}

/// Lookup structures over the catalog, built once per run.
///
/// Candidate lists hold catalog positions in catalog order, which is
/// the tie-break order for fuzzy matching. Event type is filtered at lookup
/// time and never part of a key.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    entries: Vec<IndexedEntry>,
    exact: AHashMap<ExactKey, Vec<usize>>,
    by_year: AHashMap<i32, Vec<usize>>,
}

impl CatalogIndex {
    pub fn build(entries: Vec<CatalogEntry>) -> Self {
        let mut index = CatalogIndex::default();

        for (position, entry) in entries.into_iter().enumerate() {
            let key = CatalogKey::parse(&entry);
            let is_header = entry.is_header();

            if let Some(year) = key.year {
                index.by_year.entry(year).or_default().push(position);
            }
            if !is_header {
                if let Some(exact) = key.exact_key() {
                    index.exact.entry(exact).or_default().push(position);
                }
            }

            index.entries.push(IndexedEntry {
                normalized_title: normalize(&entry.title),
                entry,
                key,
                is_header,
            });
        }

        debug!(
            "Catalog index built: {} entries, {} years, {} exact keys",
            index.entries.len(),
            index.by_year.len(),
            index.exact.len()
        );
        index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, position: usize) -> &IndexedEntry {
        &self.entries[position]
    }

    pub fn has_year(&self, year: i32) -> bool {
        self.by_year.contains_key(&year)
    }

    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.by_year.keys().copied().collect();
        years.sort_unstable();
        years
    }

    pub fn year_candidates(&self, year: i32) -> &[usize] {
        self.by_year.get(&year).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn exact_candidates(&self, key: &ExactKey) -> &[usize] {
        self.exact.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn catalog_ref(&self, position: usize) -> CatalogRef {
        let indexed = &self.entries[position];
        CatalogRef {
            index: position,
            id: indexed.entry.id.clone(),
            title: indexed.entry.title.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<CatalogEntry> {
        vec![
            CatalogEntry::new("h", "WSOP 2011 Main Event | Episodes").with_season("WSOP 2011 Main Event"),
            CatalogEntry::new("a", "WSOP 2011 Main Event | Episode 1").with_season("WSOP 2011 Main Event"),
            CatalogEntry::new("b", "WSOP 2011 Main Event | Episode 1 (Replay)")
                .with_season("WSOP 2011 Main Event"),
            CatalogEntry::new("c", "High Stakes Poker"),
        ]
    }

    #[test]
    fn test_ambiguous_exact_keys_keep_all_candidates() {
        let index = CatalogIndex::build(catalog());
        assert_eq!(index.exact_candidates(&(2011, None, Some(1))), &[1, 2]);
    }

    #[test]
    fn test_headers_only_in_year_list() {
        let index = CatalogIndex::build(catalog());
        assert!(index.entry(0).is_header);
        assert_eq!(index.year_candidates(2011), &[0, 1, 2]);
        assert!(index.has_year(2011));
        assert!(!index.has_year(1999));
        assert_eq!(index.years(), vec![2011]);
    }

    #[test]
    fn test_catalog_ref() {
        let index = CatalogIndex::build(catalog());
        let r = index.catalog_ref(3);
        assert_eq!(r.id, "c");
        assert_eq!(index.entry(3).normalized_title, "high stakes poker");
        assert!(index.year_candidates(1990).is_empty());
    }
}
