#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal plumbing for the address parser binary.
//!
//! [`AddressProgress`] renders batch parsing progress for a CSV file and
//! [`init_logger`] routes `log` output through the same [`MultiProgress`],
//! so parse traces and failures print above the bar instead of through it.

use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use openblock_address::progress::ProgressCallback;

pub use indicatif::MultiProgress;

const READING_TEMPLATE: &str = "{spinner:.green} {msg} ({elapsed})";
const PARSING_TEMPLATE: &str =
    "{msg:>12} [{bar:40.green/black}] {human_pos}/{human_len} addresses ({per_sec}, {eta} left)";

/// Progress of one CSV file's address rows.
///
/// The CSV reader loads every row before parsing starts, so the row count
/// is unknown at first. Until [`ProgressCallback::set_total`] is called the
/// display is a spinner naming the file being read.
pub struct AddressProgress {
    bar: ProgressBar,
    parsing_style: ProgressStyle,
}

impl AddressProgress {
    /// Adds a spinner for `file` to `multi`.
    #[must_use]
    pub fn for_csv(multi: &MultiProgress, file: &str) -> Arc<dyn ProgressCallback> {
        let bar = multi.add(ProgressBar::new_spinner());
        bar.enable_steady_tick(Duration::from_millis(120));
        bar.set_style(
            ProgressStyle::with_template(READING_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(format!("Reading {file}"));

        let parsing_style = ProgressStyle::with_template(PARSING_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");

        Arc::new(Self { bar, parsing_style })
    }
}

impl ProgressCallback for AddressProgress {
    fn set_total(&self, total: u64) {
        self.bar.set_style(self.parsing_style.clone());
        self.bar.set_length(total);
        self.bar.reset_eta();
    }

    fn inc(&self, delta: u64) {
        self.bar.inc(delta);
    }

    fn set_message(&self, msg: String) {
        self.bar.set_message(msg);
    }

    fn finish(&self, msg: String) {
        self.bar.finish_with_message(msg);
    }
}

/// Installs `pretty_env_logger` (filtered by `RUST_LOG`) behind
/// `indicatif-log-bridge`.
///
/// Every [`AddressProgress`] must be added to the returned
/// [`MultiProgress`], otherwise log lines and bar redraws interleave.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    // A second call (from tests) finds the logger already installed.
    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok();

    log::set_max_level(level);

    multi
}

#[cfg(test)]
mod tests {
    use indicatif::ProgressDrawTarget;

    use super::*;

    fn hidden_progress() -> AddressProgress {
        let multi = MultiProgress::with_draw_target(ProgressDrawTarget::hidden());
        let bar = multi.add(ProgressBar::new_spinner());
        let parsing_style = ProgressStyle::with_template(PARSING_TEMPLATE).unwrap();
        AddressProgress { bar, parsing_style }
    }

    #[test]
    fn templates_are_valid() {
        assert!(ProgressStyle::with_template(READING_TEMPLATE).is_ok());
        assert!(ProgressStyle::with_template(PARSING_TEMPLATE).is_ok());
    }

    #[test]
    fn counts_parsed_rows_against_the_total() {
        let progress = hidden_progress();
        assert_eq!(progress.bar.length(), None);

        progress.set_total(3);
        progress.inc(1);
        progress.inc(1);
        assert_eq!(progress.bar.length(), Some(3));
        assert_eq!(progress.bar.position(), 2);

        progress.finish("3 rows".to_string());
        assert!(progress.bar.is_finished());
        assert_eq!(progress.bar.message(), "3 rows");
    }
}
