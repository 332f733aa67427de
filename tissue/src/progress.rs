//! Progress Reporting

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Returns a progress bar for `count` units of work. A hidden bar is returned
/// when `quiet` is set so callers can report unconditionally.
///
/// * `count` - Total units of work.
/// * `quiet` - Suppress drawing.
pub fn create_progress_reporter(count: u64, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::with_draw_target(Some(count), ProgressDrawTarget::hidden());
    }

    let style = ProgressStyle::with_template(
        "[{elapsed_precise}] {bar:40.cyan/blue} {pos:>5}/{len:5} {msg} (eta {eta})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("=> ");

    let progress = ProgressBar::new(count);
    progress.set_style(style);
    progress
}
