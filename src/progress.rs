use std::sync::Arc;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Callback type for reporting download progress.
/// Arguments: label, bytes downloaded, total bytes, MiB/s, is_complete
pub type ProgressFn = Arc<dyn Fn(&str, u64, u64, f64, bool) + Send + Sync>;

const TEMPLATE: &str = "Downloading: {bytes}/{total_bytes} {wide_bar} {percent}% {binary_bytes_per_sec} [{msg}]";

/// Returns the default progress function: a byte-counting bar on stderr.
///
/// The bar is hidden when stderr is not a terminal.
pub fn default_progress_fn() -> ProgressFn {
    let style = ProgressStyle::with_template(TEMPLATE).unwrap_or_else(|_| ProgressStyle::default_bar());
    let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr()).with_style(style);

    Arc::new(move |label: &str, current: u64, total: u64, _mib_per_sec: f64, complete: bool| {
        if bar.length() != Some(total) {
            bar.set_length(total);
        }
        if bar.message() != label {
            bar.set_message(label.to_owned());
        }
        bar.set_position(current);
        if complete {
            bar.finish();
        }
    })
}

/// Transfer rate in MiB/s for `bytes` moved over `elapsed_secs`.
pub(crate) fn mib_per_sec(bytes: u64, elapsed_secs: f64) -> f64 {
    if elapsed_secs > 0.0 {
        (bytes as f64) / (1024.0 * 1024.0) / elapsed_secs
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mib_per_sec() {
        assert_eq!(mib_per_sec(1024 * 1024, 0.0), 0.0);
        assert_eq!(mib_per_sec(4 * 1024 * 1024, 2.0), 2.0);
    }

    #[test]
    fn test_default_progress_fn_accepts_updates() {
        let progress = default_progress_fn();
        progress("asset.bin", 10, 100, 1.0, false);
        progress("asset.bin", 100, 100, 1.0, true);
    }
}
