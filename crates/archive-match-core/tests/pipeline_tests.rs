use archive_match_core::catalog::load_catalog_csv;
use archive_match_core::report::{write_results_csv, write_stats_json};
use archive_match_core::scanner::{load_paths_csv, ExclusionReason};
use archive_match_core::{AppConfig, MatchBasis, MatchEngine, ReasonCode, SilentReporter};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

fn create_file(path: &Path, size: usize) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut file = File::create(path).unwrap();
    file.write_all(&vec![0u8; size]).unwrap();
}

fn create_archive(root: &Path) {
    create_file(&root.join("Archive/WS11_GM02.mov"), 100);
    create_file(&root.join("IMG_0001.mp4"), 100);
    create_file(&root.join("WSOP/2011/WS11_ME25.mp4"), 2000);
    create_file(&root.join("WSOP/2011/backup/WS11_ME25.mp4"), 1000);
    create_file(&root.join("WSOP/highlight clip.mp4"), 100);
    create_file(&root.join("notes.txt"), 10);
}

fn write_catalog(path: &Path) {
    fs::write(
        path,
        "id,title,collection,season,duration_secs\n\
         h1,WSOP 2011 Main Event | Episodes,WSOP,WSOP 2011 Main Event,\n\
         e1,WSOP 2011 Main Event | Episode 25,WSOP,WSOP 2011 Main Event,2640\n\
         bad,,WSOP,WSOP 2011 Main Event,\n",
    )
    .unwrap();
}

fn config_for(root: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.archive_roots = vec![root.to_string_lossy().to_string()];
    config.exclusions.keywords = vec!["clip".to_string()];
    config
}

#[test]
fn test_scan_to_reports() {
    let archive = tempdir().unwrap();
    let out = tempdir().unwrap();
    create_archive(archive.path());
    let catalog_path = out.path().join("catalog.csv");
    write_catalog(&catalog_path);

    let engine = MatchEngine::from_config(config_for(archive.path())).unwrap();
    let scan = engine.scan(&SilentReporter).unwrap();

    let paths: Vec<&str> = scan.records.iter().map(|r| r.full_path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "Archive/WS11_GM02.mov",
            "IMG_0001.mp4",
            "WSOP/2011/WS11_ME25.mp4",
            "WSOP/2011/backup/WS11_ME25.mp4",
        ]
    );
    assert_eq!(scan.non_video, 1);
    assert_eq!(scan.excluded.len(), 1);
    assert_eq!(scan.excluded[0].reason, ExclusionReason::Keyword("clip".to_string()));

    let catalog = load_catalog_csv(&catalog_path).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog[1].duration_secs, Some(2640));

    let result = engine.run(scan.records, catalog, &SilentReporter);
    let ids: Vec<&str> = result.groups.iter().map(|g| g.group_id.as_str()).collect();
    assert_eq!(ids, vec!["2011_GM_02", "UNGROUPED_1", "2011_ME_25"]);

    assert_eq!(result.results[0].reason_code, Some(ReasonCode::M01));
    assert_eq!(result.results[1].reason_code, Some(ReasonCode::P01));

    let main_event = &result.groups[2];
    assert_eq!(main_event.file_count, 2);
    assert_eq!(main_event.total_size_bytes, 3000);
    assert_eq!(main_event.primary_record, 2);
    let linked = &result.results[2];
    assert!(linked.matched);
    assert_eq!(linked.match_basis, MatchBasis::ExactKey);
    assert_eq!(linked.catalog_entry_ref.as_ref().unwrap().id, "e1");
    assert_eq!(linked.reason_code, None);

    assert_eq!(result.stats.total_files, 4);
    assert_eq!(result.stats.matched_groups, 1);

    let csv_path = out.path().join("reports/results.csv");
    let json_path = out.path().join("reports/stats.json");
    write_results_csv(&csv_path, &result.groups, &result.results, &result.records).unwrap();
    write_stats_json(&json_path, &result.stats).unwrap();

    let csv_text = fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = csv_text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("group_id,display_title,primary_path"));
    assert!(lines[3].contains("WSOP 2011 Main Event | Episode 25"));
    assert!(lines[3].contains("1.000"));
    assert!(lines[1].contains("M01"));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert!(json.get("generated_at").is_some());
    assert_eq!(json["total_groups"], 3);
    assert_eq!(json["by_reason_code"]["P01"], 1);
}

#[test]
fn test_nested_roots_are_walked_once() {
    let archive = tempdir().unwrap();
    create_archive(archive.path());
    let mut config = config_for(archive.path());
    config
        .archive_roots
        .push(archive.path().join("WSOP").to_string_lossy().to_string());

    let engine = MatchEngine::from_config(config).unwrap();
    let scan = engine.scan(&SilentReporter).unwrap();
    assert_eq!(scan.records.len(), 4);
}

#[test]
fn test_parent_root_after_several_children_is_walked_once() {
    let archive = tempdir().unwrap();
    create_archive(archive.path());
    let mut config = config_for(archive.path());
    config.archive_roots = vec![
        archive.path().join("WSOP/2011").to_string_lossy().to_string(),
        archive.path().join("Archive").to_string_lossy().to_string(),
        archive.path().to_string_lossy().to_string(),
    ];

    let engine = MatchEngine::from_config(config).unwrap();
    let scan = engine.scan(&SilentReporter).unwrap();
    let paths: Vec<&str> = scan.records.iter().map(|r| r.full_path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "Archive/WS11_GM02.mov",
            "IMG_0001.mp4",
            "WSOP/2011/WS11_ME25.mp4",
            "WSOP/2011/backup/WS11_ME25.mp4",
        ]
    );
}

#[test]
fn test_ignore_patterns_prune_directories() {
    let archive = tempdir().unwrap();
    create_archive(archive.path());
    let mut config = config_for(archive.path());
    config.ignore_patterns = vec!["*/backup".to_string(), "[invalid".to_string()];

    let engine = MatchEngine::from_config(config).unwrap();
    let scan = engine.scan(&SilentReporter).unwrap();
    assert_eq!(scan.records.len(), 3);
    assert!(scan.records.iter().all(|r| !r.full_path.contains("backup")));
}

#[test]
fn test_size_exclusions() {
    let archive = tempdir().unwrap();
    create_archive(archive.path());
    let mut config = config_for(archive.path());
    config.exclusions.min_size_bytes = Some(500);

    let engine = MatchEngine::from_config(config).unwrap();
    let scan = engine.scan(&SilentReporter).unwrap();
    assert_eq!(scan.records.len(), 2);
    assert!(scan
        .excluded
        .iter()
        .any(|e| matches!(e.reason, ExclusionReason::BelowMinSize { size: 100, min: 500 })));
}

#[test]
fn test_paths_csv_feeds_the_same_pipeline() {
    let dir = tempdir().unwrap();
    let paths_csv = dir.path().join("paths.csv");
    fs::write(
        &paths_csv,
        "full_path,size_bytes\n\
         Z:\\WSOP\\2011\\WS11_ME25.mp4,2000\n\
         WSOP/2011/backup/WS11_ME25.mp4,\n",
    )
    .unwrap();

    let records = load_paths_csv(&paths_csv).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].full_path, "WSOP/2011/WS11_ME25.mp4");
    assert_eq!(records[1].size_bytes, 0);

    let engine = MatchEngine::from_config(AppConfig::default()).unwrap();
    let result = engine.run(records, Vec::new(), &SilentReporter);
    assert_eq!(result.groups.len(), 1);
    assert_eq!(result.results[0].reason_code, Some(ReasonCode::D01));
}

#[test]
fn test_missing_rules_file_is_an_error() {
    let mut config = AppConfig::default();
    config.rules_file = Some("/nonexistent/rules.toml".to_string());
    assert!(MatchEngine::from_config(config).is_err());
}
