use archive_match_core::ProgressReporter;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Terminal progress for the pipeline phases.
///
/// Scanning and extraction show a spinner since the work is either unbounded
/// or short; matching shows a bar over the known group count.
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn set_bar(&self, pb: ProgressBar) {
        let mut guard = self.bar.lock().unwrap();
        if let Some(old) = guard.take() {
            old.finish_and_clear();
        }
        *guard = Some(pb);
    }

    fn finish_bar(&self) {
        let mut guard = self.bar.lock().unwrap();
        if let Some(pb) = guard.take() {
            pb.finish_and_clear();
        }
    }

    fn start_spinner(&self, message: String) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_chars(TICK_CHARS),
        );
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(80));
        self.set_bar(pb);
    }
}

impl ProgressReporter for CliReporter {
    fn on_scan_start(&self) {
        self.start_spinner("Scanning archive...".to_string());
    }

    fn on_scan_progress(&self, files_found: usize, _current_path: &str) {
        let guard = self.bar.lock().unwrap();
        if let Some(pb) = guard.as_ref() {
            pb.set_message(format!("Scanning... {} video files found", files_found));
        }
    }

    fn on_scan_complete(&self, total_files: usize, excluded: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Scan complete: {} files ({} excluded) in {:.2}s",
            total_files, excluded, duration_secs
        );
    }

    fn on_extract_start(&self, total_records: usize) {
        self.start_spinner(format!("Extracting metadata from {} paths...", total_records));
    }

    fn on_extract_complete(&self, total_records: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Extraction complete: {} paths in {:.2}s",
            total_records, duration_secs
        );
    }

    fn on_group_complete(&self, total_groups: usize, duration_secs: f64) {
        eprintln!(
            "  \x1b[32m✓\x1b[0m Grouping complete: {} groups in {:.2}s",
            total_groups, duration_secs
        );
    }

    fn on_match_start(&self, total_groups: usize) {
        let pb = ProgressBar::new(total_groups as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "  {spinner:.cyan} Matching [{bar:30.cyan/dim}] {pos}/{len} groups ({eta} remaining)",
            )
            .unwrap()
            .progress_chars("━╸─")
            .tick_chars(TICK_CHARS),
        );
        pb.enable_steady_tick(Duration::from_millis(80));
        self.set_bar(pb);
    }

    fn on_match_progress(&self, groups_done: usize, _total_groups: usize) {
        let guard = self.bar.lock().unwrap();
        if let Some(pb) = guard.as_ref() {
            // workers report out of order
            if (groups_done as u64) > pb.position() {
                pb.set_position(groups_done as u64);
            }
        }
    }

    fn on_match_complete(&self, matched: usize, total_groups: usize, duration_secs: f64) {
        self.finish_bar();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Matching complete: {}/{} groups linked in {:.2}s",
            matched, total_groups, duration_secs
        );
    }
}
