#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal plumbing shared by the exposure binaries.
//!
//! [`init_logger`] installs `pretty_env_logger` behind
//! `indicatif-log-bridge`, so log lines are printed above any live progress
//! bar instead of tearing it. [`IndicatifProgress`] renders the pipeline's
//! [`ProgressCallback`] reports.

use std::sync::Arc;
use std::time::Duration;

use exposure_source::progress::ProgressCallback;
use indicatif::{ProgressBar, ProgressStyle};

pub use indicatif::MultiProgress;

/// An `indicatif` [`ProgressBar`] that implements [`ProgressCallback`].
pub struct IndicatifProgress {
    bar: ProgressBar,
    /// Style applied once `set_total()` provides a length.
    bar_style: ProgressStyle,
}

impl IndicatifProgress {
    /// Bar for stage-level progress (one tick per pipeline stage).
    ///
    /// Starts as a spinner; becomes a bar when the pipeline announces its
    /// stage count through [`ProgressCallback::set_total()`].
    #[must_use]
    pub fn stages_bar(multi: &MultiProgress, message: &str) -> Arc<dyn ProgressCallback> {
        let bar = multi.add(ProgressBar::new_spinner());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());

        let bar_style = ProgressStyle::with_template(
            "{msg:<28} {wide_bar:.green/dim} {pos}/{len} [{elapsed_precise}]",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");

        Arc::new(Self { bar, bar_style })
    }

    /// Spinner for a single open-ended step such as reading the extract.
    #[must_use]
    pub fn spinner(multi: &MultiProgress, message: &str) -> Arc<dyn ProgressCallback> {
        let bar = multi.add(ProgressBar::new_spinner());
        bar.enable_steady_tick(Duration::from_millis(100));
        let style = ProgressStyle::with_template("{spinner:.yellow} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(style.clone());
        bar.set_message(message.to_string());

        Arc::new(Self {
            bar,
            bar_style: style,
        })
    }
}

impl ProgressCallback for IndicatifProgress {
    fn set_total(&self, total: u64) {
        self.bar.set_length(total);
        self.bar.set_position(0);
        self.bar.set_style(self.bar_style.clone());
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

/// Initializes the global logger wrapped in `indicatif-log-bridge`.
///
/// The level comes from `RUST_LOG` (nothing is logged when it is unset).
/// Returns the [`MultiProgress`] that all progress bars must be added to.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    // Already set when called twice in one process.
    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok();

    log::set_max_level(level);

    multi
}
