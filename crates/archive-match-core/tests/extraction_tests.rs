use std::path::Path;

use archive_match_core::extract::{PatternCatalog, RuleFile};
use archive_match_core::model::{FieldSource, Provenance, RuleTier};
use archive_match_core::{EventType, FieldExtractor, RawPathRecord, Region};

fn extractor() -> FieldExtractor {
    FieldExtractor::new(PatternCatalog::builtin())
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[test]
fn test_bracelet_folder_with_main_event_filename() {
    let meta = extractor().extract_path("WSOP/2024 Bracelet Events/WSOP24_ME05_Final Table.mp4");
    assert_eq!(meta.year, Some(2024));
    assert_eq!(meta.event_type, Some(EventType::Me));
    assert_eq!(meta.episode, Some(5));
    assert_eq!(meta.stage.as_deref(), Some("FT"));
    assert_eq!(meta.category.as_deref(), Some("WSOP"));
    assert_eq!(meta.region, None);
    assert_eq!(meta.pattern_id, "WSOP_WSOP_SHORT");
    assert_eq!(meta.rule_tier, RuleTier::Primary);
    assert_close(meta.confidence, 1.0);
}

#[test]
fn test_short_code_path() {
    let meta = extractor().extract_path("Archive/WS11_GM02.mp4");
    assert_eq!(meta.year, Some(2011));
    assert_eq!(meta.provenance.year, Some(FieldSource::PrefixedShortYear));
    assert_eq!(meta.event_type, Some(EventType::Gm));
    assert_eq!(meta.episode, Some(2));
    assert_eq!(meta.provenance.episode, Some(FieldSource::RuleTemplate));
    assert_eq!(meta.category.as_deref(), Some("Archive"));
    assert_eq!(meta.pattern_id, "WSOP_WS_SHORT");
}

#[test]
fn test_garbage_filename_yields_nothing() {
    let meta = extractor().extract_path("IMG_0001.mp4");
    assert_eq!(meta.year, None);
    assert_eq!(meta.region, None);
    assert_eq!(meta.event_type, None);
    assert_eq!(meta.event_number, None);
    assert_eq!(meta.episode, None);
    assert_eq!(meta.stage, None);
    assert_eq!(meta.category, None);
    assert_eq!(meta.pattern_id, "UNKNOWN");
    assert_eq!(meta.confidence, 0.0);
    assert_eq!(meta.rule_tier, RuleTier::Unmatched);
    assert_eq!(meta.provenance, Provenance::default());
}

#[test]
fn test_empty_and_separator_only_paths() {
    for path in ["", "/", "\\\\", "   "] {
        let meta = extractor().extract_path(path);
        assert!(meta.is_unknown(), "{:?} should be unknown", path);
        assert_eq!(meta.confidence, 0.0);
    }
}

#[test]
fn test_extraction_is_deterministic() {
    let ex = extractor();
    for path in [
        "WSOP/WSOP Bracelet Event/WSOP-EUROPE/2021 WSOPE/wsope-2021-10k-me-ft-004.mp4",
        "PAD/Season 12/pad-s12-ep03.mp4",
        "WSOP/2003 WSOP/WSOP_2003-01.mxf",
        "IMG_0001.mp4",
    ] {
        assert_eq!(ex.extract_path(path), ex.extract_path(path));
    }
}

#[test]
fn test_explicit_year_beats_later_short_year() {
    let meta = extractor().extract_path("WSOP/2019/WS99_ME01.mp4");
    assert_eq!(meta.year, Some(2019));
    assert_eq!(meta.provenance.year, Some(FieldSource::FourDigitYear));
}

#[test]
fn test_region_adds_exactly_three_points() {
    let ex = extractor();
    let pairs = [
        ("WSOP/wsop-1973-me-nobug.mp4", "WSOP/APAC/wsop-1973-me-nobug.mp4", 0.9),
        ("WSOP/Specials/1995 final.mp4", "WSOP/Specials/Paradise/1995 final.mp4", 0.5),
    ];
    for (plain, with_region, expected) in pairs {
        let a = ex.extract_path(plain);
        let b = ex.extract_path(with_region);
        assert_eq!(a.pattern_id, b.pattern_id);
        assert_eq!(a.region, None);
        assert!(b.region.is_some());
        assert_close(a.confidence, expected);
        assert_close(b.confidence - a.confidence, 0.03);
    }
}

#[test]
fn test_region_boost_is_capped() {
    let meta = extractor().extract_path("WSOP/LAS VEGAS/WSOP24_ME05.mp4");
    assert_eq!(meta.region, Some(Region::Lv));
    assert_close(meta.confidence, 1.0);
}

#[test]
fn test_fallback_tiers() {
    let ex = extractor();
    let generic = ex.extract_path("WSOP/2010/Main Event/final.mp4");
    assert_eq!(generic.pattern_id, "WSOP_GENERIC");
    assert_eq!(generic.rule_tier, RuleTier::Fallback);
    assert_close(generic.confidence, 0.6);

    let unknown_wsop = ex.extract_path("WSOP/misc/promo.mp4");
    assert_eq!(unknown_wsop.pattern_id, "WSOP_UNKNOWN");
    assert_close(unknown_wsop.confidence, 0.3);

    let other = ex.extract_path("Holiday/2010/beach.mp4");
    assert_eq!(other.pattern_id, "UNKNOWN");
    assert_eq!(other.year, Some(2010));
}

#[test]
fn test_stage_and_event_number() {
    let meta = extractor().extract_path("WSOP/2023 WSOP Event #37 $10K/Day 2B.mp4");
    assert_eq!(meta.event_number, Some(37));
    assert_eq!(meta.stage.as_deref(), Some("D2B"));
    assert_eq!(meta.buyin.as_deref(), Some("10K"));
    assert_eq!(meta.pattern_id, "WSOP_EVENT_NUM");
}

#[test]
fn test_windows_and_posix_paths_agree() {
    let ex = extractor();
    let win = ex.extract(&RawPathRecord::new(r"Z:\WSOP\WSOP 2011\WS11_ME25_NB.mp4", 5));
    let posix = ex.extract(&RawPathRecord::new("WSOP/WSOP 2011/WS11_ME25_NB.mp4", 5));
    assert_eq!(win, posix);
    assert_eq!(win.version.as_deref(), Some("NB"));
}

#[test]
fn test_rules_file_adds_classic_conventions() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../rules/classic_era.toml");
    let file = RuleFile::load(&path).unwrap();

    let plain = extractor().extract_path("Misc/WSOP_1983.mov");
    assert_eq!(plain.pattern_id, "UNKNOWN");

    let catalog = PatternCatalog::builtin().with_rule_file(file).unwrap();
    let meta = FieldExtractor::new(catalog).extract_path("Misc/WSOP_1983.mov");
    assert_eq!(meta.pattern_id, "WSOP_CLASSIC_UNDERSCORE");
    assert_eq!(meta.year, Some(1983));
    assert_eq!(meta.region, Some(Region::Lv));
    assert_eq!(meta.event_type, Some(EventType::Me));
    assert_eq!(meta.provenance.event_type, Some(FieldSource::RuleTemplate));
    assert_close(meta.confidence, 0.85);
}
