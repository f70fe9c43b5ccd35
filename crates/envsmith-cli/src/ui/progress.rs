//! Progress indicators.

use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar for a run over a known number of files.
pub fn bar(length: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(length);
    if let Ok(style) = ProgressStyle::default_bar().template("[{bar:40.cyan/blue}] {pos}/{len} {msg}") {
        pb.set_style(style.progress_chars("=>-"));
    }
    pb.set_message(message.to_string());
    pb
}
