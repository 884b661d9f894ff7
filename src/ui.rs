// UI module for consistent terminal output with progress bars and styling

#![allow(clippy::print_stdout, clippy::print_stderr)]

use console::{Term, style};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Check if stderr is a TTY (for interactive output)
fn is_tty() -> bool {
    Term::stderr().is_term()
}

fn hide_unless_tty(pb: ProgressBar) -> ProgressBar {
    if !is_tty() {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    }
    pb
}

/// Create a progress bar for downloads with size
pub fn download_bar(total_size: u64) -> ProgressBar {
    let pb = hide_unless_tty(ProgressBar::new(total_size));
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.cyan} {msg} [{bar:25.cyan/dim}] {bytes}/{total_bytes} ({bytes_per_sec})",
            )
            .expect("valid progress template")
            .tick_chars(SPINNER_CHARS)
            .progress_chars("━━╺"),
    );
    pb
}

/// Create an indeterminate progress bar (when size is unknown)
pub fn download_bar_indeterminate() -> ProgressBar {
    let pb = hide_unless_tty(ProgressBar::new_spinner());
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars(SPINNER_CHARS)
            .template("{spinner:.cyan} {msg} {bytes} ({bytes_per_sec})")
            .expect("valid progress template"),
    );
    if is_tty() {
        pb.enable_steady_tick(Duration::from_millis(80));
    }
    pb
}

/// Print a success message with checkmark
pub fn success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Print a warning message
pub fn warning(message: &str) {
    eprintln!("{} {}", style("⚠").yellow(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red(), message);
}

/// Print a dimmed/secondary message
pub fn dim(message: &str) {
    println!("{}", style(message).dim());
}

/// Print unstyled output, e.g. JSON for scripts
pub fn plain(message: &str) {
    println!("{}", message);
}

/// Print a status message with a highlighted prefix
pub fn status(prefix: &str, message: &str) {
    println!("{} {}", style(prefix).cyan().bold(), message);
}

fn finish_with(pb: &ProgressBar, msg: String, to_stderr: bool) {
    if is_tty() {
        if let Ok(style) = ProgressStyle::default_spinner().template("{msg}") {
            pb.set_style(style);
        }
        pb.finish_with_message(msg);
    } else {
        pb.finish_and_clear();
        if to_stderr {
            eprintln!("{}", msg);
        } else {
            println!("{}", msg);
        }
    }
}

/// Finish a download bar with success
pub fn finish_download_success(pb: &ProgressBar, name: &str) {
    let msg = format!(
        "{} {} {}",
        style("✓").green(),
        name,
        style("downloaded").dim()
    );
    finish_with(pb, msg, false);
}

/// Finish a bar with error
pub fn finish_spinner_error(pb: &ProgressBar, message: &str) {
    let msg = format!("{} {}", style("✗").red(), message);
    finish_with(pb, msg, true);
}
