//! Endpoint progress bar.

use indicatif::{ProgressBar, ProgressStyle};
use trowel_lib::{Endpoint, FetchError, RunError, RunObserver, RunReport};

const TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} endpoints {msg}";

/// Progress bar advanced once per endpoint.
#[derive(Debug)]
pub(crate) struct EndpointProgress {
    bar: ProgressBar,
}

impl EndpointProgress {
    /// Creates a bar over `endpoints`; hidden when `quiet`.
    pub(crate) fn new(endpoints: usize, quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new(endpoints as u64);
            let style = ProgressStyle::with_template(TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-");
            bar.set_style(style);
            bar
        };
        Self { bar }
    }

    /// Stops the bar according to how the run ended.
    ///
    /// Endpoint failures are counted from the report; a failed run names
    /// the stage it stopped at.
    pub(crate) fn finish_run(&self, outcome: &Result<RunReport, RunError>) {
        match outcome {
            Ok(report) if report.failed_endpoints.is_empty() => {
                self.bar.finish_with_message("done");
            }
            Ok(report) => self.bar.finish_with_message(format!(
                "done ({} failed)",
                report.failed_endpoints.len()
            )),
            Err(e) => self.abandon(&format!("{} stage failed", e.stage)),
        }
    }

    /// Leaves the bar where it stopped with `reason`.
    pub(crate) fn abandon(&self, reason: &str) {
        self.bar.abandon_with_message(reason.to_string());
    }
}

impl RunObserver for EndpointProgress {
    fn endpoint_started(&self, endpoint: &Endpoint) {
        self.bar.set_message(endpoint.to_string());
    }

    fn endpoint_finished(&self, _endpoint: &Endpoint, _records: usize) {
        self.bar.inc(1);
    }

    fn endpoint_failed(&self, endpoint: &Endpoint, error: &FetchError) {
        self.bar.println(format!("failed {endpoint}: {error}"));
        self.bar.inc(1);
    }
}
