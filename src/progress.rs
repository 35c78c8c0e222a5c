// src/progress.rs

//! Progress sinks.
//!
//! The pipeline reports from several source workers at once. A sink must
//! accept interleaved calls, return quickly, and never fail the run.

use std::sync::Mutex;

use tokio::sync::mpsc;

use crate::models::{Activity, JobSource, ScrapingProgress};
use crate::utils::log;

/// Receives best-effort progress notifications.
pub trait ProgressSink: Send + Sync {
    fn report(&self, progress: &ScrapingProgress);
}

/// Discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn report(&self, _progress: &ScrapingProgress) {}
}

/// Prints progress lines to the console.
///
/// The activity line is printed only when the activity or source changes.
#[derive(Debug, Default)]
pub struct ConsoleProgressSink {
    last: Mutex<Option<(Activity, Option<JobSource>)>>,
}

impl ConsoleProgressSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this report starts a new activity, recording it if so.
    fn activity_changed(&self, progress: &ScrapingProgress) -> bool {
        let current = (progress.activity, progress.source);
        let mut last = match self.last.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if *last == Some(current) {
            return false;
        }
        *last = Some(current);
        true
    }
}

impl ProgressSink for ConsoleProgressSink {
    fn report(&self, progress: &ScrapingProgress) {
        if self.activity_changed(progress) {
            match progress.source {
                Some(source) => log::info(&format!("{} ({})", progress.activity, source)),
                None => log::info(&progress.activity.to_string()),
            }
        }

        if let Some(line) = format_counts(progress) {
            log::progress(&line);
        }
    }
}

/// `processed/found (pct%)`, plus failures; None before anything is found.
pub fn format_counts(progress: &ScrapingProgress) -> Option<String> {
    if progress.found == 0 {
        return None;
    }

    let pct = progress.processed as f64 / progress.found as f64 * 100.0;
    let mut line = format!(
        "Progress: {}/{} ({:.1}%)",
        progress.processed, progress.found, pct
    );
    if progress.failed > 0 {
        line.push_str(&format!(", {} failed", progress.failed));
    }
    Some(line)
}

/// Forwards snapshots to a bounded channel, dropping them when it is full
/// or closed.
#[derive(Debug, Clone)]
pub struct ChannelProgressSink {
    tx: mpsc::Sender<ScrapingProgress>,
}

impl ChannelProgressSink {
    pub fn new(tx: mpsc::Sender<ScrapingProgress>) -> Self {
        Self { tx }
    }

    /// Create a sink and the receiving end of its channel.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ScrapingProgress>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self::new(tx), rx)
    }
}

impl ProgressSink for ChannelProgressSink {
    fn report(&self, progress: &ScrapingProgress) {
        if let Err(e) = self.tx.try_send(progress.clone()) {
            ::log::trace!("Dropped progress update: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(activity: Activity, processed: usize, found: usize, failed: usize) -> ScrapingProgress {
        ScrapingProgress {
            source: Some(JobSource::Pracuj),
            activity,
            processed,
            found,
            failed,
        }
    }

    #[test]
    fn test_format_counts() {
        assert_eq!(format_counts(&snapshot(Activity::Scraping, 0, 0, 0)), None);
        assert_eq!(
            format_counts(&snapshot(Activity::Normalizing, 1, 4, 0)).as_deref(),
            Some("Progress: 1/4 (25.0%)")
        );
        assert_eq!(
            format_counts(&snapshot(Activity::Normalizing, 2, 3, 1)).as_deref(),
            Some("Progress: 2/3 (66.7%), 1 failed")
        );
    }

    #[test]
    fn test_console_prints_activity_once() {
        let sink = ConsoleProgressSink::new();
        assert!(sink.activity_changed(&snapshot(Activity::Normalizing, 0, 3, 0)));
        assert!(!sink.activity_changed(&snapshot(Activity::Normalizing, 1, 3, 0)));
        assert!(sink.activity_changed(&snapshot(Activity::Saving, 3, 3, 0)));

        let other_source = ScrapingProgress {
            source: Some(JobSource::JustJoin),
            ..snapshot(Activity::Saving, 3, 3, 0)
        };
        assert!(sink.activity_changed(&other_source));
    }

    #[tokio::test]
    async fn test_channel_sink_forwards() {
        let (sink, mut rx) = ChannelProgressSink::channel(4);
        sink.report(&snapshot(Activity::Scraping, 0, 0, 0));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.activity, Activity::Scraping);
    }

    #[test]
    fn test_channel_sink_never_blocks() {
        let (sink, rx) = ChannelProgressSink::channel(1);
        sink.report(&snapshot(Activity::Scraping, 0, 0, 0));
        // Full: dropped silently
        sink.report(&snapshot(Activity::Normalizing, 0, 0, 0));

        drop(rx);
        // Closed: dropped silently
        sink.report(&snapshot(Activity::Saving, 0, 0, 0));
    }
}
