use crate::registry::Progress;
use core::fmt::{Debug, Formatter};
use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Instant;

const DETERMINATE_TEMPLATE: &str = "{prefix:>12.bold.cyan} [{bar:25}] {pos}/{len}";
const DETERMINATE_TEMPLATE_NO_COLOR: &str = "{prefix:>12} [{bar:25}] {pos}/{len}";

/// A progress bar that delays showing itself until a threshold is reached.
pub struct ProgressReporter {
    bar: ProgressBar,
    visible_after: Instant,
    visible: AtomicBool,
    use_colors: bool,
}

impl ProgressReporter {
    /// Create a new progress reporter.
    ///
    /// The progress bar will only become visible if operations continue beyond the delay threshold.
    /// When `use_colors` is false, progress bar chrome is rendered without ANSI styling.
    #[must_use]
    pub fn new(delay: Duration, use_colors: bool) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_draw_target(ProgressDrawTarget::hidden());

        Self {
            bar,
            visible_after: Instant::now() + delay,
            visible: AtomicBool::new(false),
            use_colors,
        }
    }

    fn reveal_if_due(&self) {
        if !self.visible.load(Ordering::Relaxed) && Instant::now() >= self.visible_after {
            self.visible.store(true, Ordering::Relaxed);
            self.bar.set_draw_target(ProgressDrawTarget::stderr_with_hz(10));
        }
    }
}

impl Progress for ProgressReporter {
    fn set_phase(&self, phase: &str) {
        self.bar.set_prefix(phase.to_string());
    }

    fn set_length(&self, total: u64) {
        let template = if self.use_colors { DETERMINATE_TEMPLATE } else { DETERMINATE_TEMPLATE_NO_COLOR };
        self.bar.set_style(
            ProgressStyle::default_bar()
                .template(template)
                .expect("could not create progress bar style")
                .progress_chars("=> "),
        );
        self.bar.set_length(total);
        self.bar.set_position(0);
        self.reveal_if_due();
    }

    fn advance(&self) {
        self.bar.inc(1);
        self.reveal_if_due();
    }

    fn done(&self) {
        if self.visible.load(Ordering::Relaxed) {
            self.bar.finish_and_clear();
        }
    }
}

impl Debug for ProgressReporter {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("bar", &self.bar)
            .field("visible_after", &self.visible_after)
            .field("visible", &self.visible)
            .field("use_colors", &self.use_colors)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_until_delay_elapses() {
        let reporter = ProgressReporter::new(Duration::from_hours(1), false);
        reporter.set_phase("Processing");
        reporter.set_length(3);
        reporter.advance();

        assert!(!reporter.visible.load(Ordering::Relaxed));
        assert_eq!(reporter.bar.position(), 1);
        assert_eq!(reporter.bar.length(), Some(3));
        reporter.done();
    }

    #[test]
    fn test_zero_delay_becomes_visible() {
        let reporter = ProgressReporter::new(Duration::ZERO, true);
        reporter.set_length(2);
        reporter.advance();
        reporter.advance();

        assert!(reporter.visible.load(Ordering::Relaxed));
        assert_eq!(reporter.bar.position(), 2);
        reporter.done();
    }
}
