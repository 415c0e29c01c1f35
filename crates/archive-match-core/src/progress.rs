/// Phase notifications for long pipeline runs.
///
/// The CLI implements this with indicatif bars. All methods default to no-ops
/// and may be called from worker threads.
pub trait ProgressReporter: Send + Sync {
    fn on_scan_start(&self) {}
    fn on_scan_progress(&self, _files_found: usize, _current_path: &str) {}
    fn on_scan_complete(&self, _total_files: usize, _excluded: usize, _duration_secs: f64) {}
    fn on_extract_start(&self, _total_records: usize) {}
    fn on_extract_complete(&self, _total_records: usize, _duration_secs: f64) {}
    fn on_group_complete(&self, _total_groups: usize, _duration_secs: f64) {}
    fn on_match_start(&self, _total_groups: usize) {}
    fn on_match_progress(&self, _groups_done: usize, _total_groups: usize) {}
    fn on_match_complete(&self, _matched: usize, _total_groups: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
