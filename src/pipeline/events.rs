// src/pipeline/events.rs

//! Structured progress events emitted while a page is scraped.
//!
//! Callers plug in a [`ScrapeObserver`] to watch the extraction. The default
//! [`LogObserver`] forwards everything to the `log` facade.

use std::fmt;

/// How a page was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Plain HTTP
    Static,
    /// Headless browser
    Rendered,
    /// Profile page visited during the deep crawl
    Detail,
}

impl fmt::Display for FetchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Static => "static",
            Self::Rendered => "rendered",
            Self::Detail => "detail",
        };
        f.write_str(s)
    }
}

/// Extraction strategy that produced (or failed to produce) records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    SelectorCascade,
    TableFallback,
    MailtoFallback,
    DeepCrawl,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::SelectorCascade => "selector cascade",
            Self::TableFallback => "table fallback",
            Self::MailtoFallback => "mailto fallback",
            Self::DeepCrawl => "deep crawl",
        };
        f.write_str(s)
    }
}

/// Why a deep-crawl link was not followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    CrossDomain,
    NotAName,
    NavigationKeyword,
    SiteChrome,
    NoProfileContext,
    DuplicateUrl,
    OverCandidateLimit,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::CrossDomain => "cross-domain target",
            Self::NotAName => "text is not a name",
            Self::NavigationKeyword => "navigation keyword",
            Self::SiteChrome => "inside site chrome",
            Self::NoProfileContext => "no profile context",
            Self::DuplicateUrl => "duplicate url",
            Self::OverCandidateLimit => "over candidate limit",
        };
        f.write_str(s)
    }
}

/// A discrete step of one scrape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeEvent {
    FetchAttempted {
        url: String,
        mode: FetchMode,
        success: bool,
    },
    StrategyApplied {
        strategy: Strategy,
        found: usize,
        total: usize,
    },
    StageFailed {
        strategy: Strategy,
        message: String,
    },
    CandidateRejected {
        text: String,
        reason: RejectReason,
    },
    DetailVisited {
        url: String,
        email: Option<String>,
    },
    ResourceReleased,
}

/// Receives [`ScrapeEvent`]s as they happen.
pub trait ScrapeObserver: Send + Sync {
    fn on_event(&self, event: &ScrapeEvent);
}

/// Forwards events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl ScrapeObserver for LogObserver {
    fn on_event(&self, event: &ScrapeEvent) {
        match event {
            ScrapeEvent::FetchAttempted { url, mode, success } => {
                if *success {
                    log::debug!("Fetched {url} ({mode})");
                } else {
                    log::info!("Could not fetch {url} ({mode})");
                }
            }
            ScrapeEvent::StrategyApplied {
                strategy,
                found,
                total,
            } => log::info!("{strategy}: {found} found, {total} total"),
            ScrapeEvent::StageFailed { strategy, message } => {
                log::warn!("{strategy} failed: {message}")
            }
            ScrapeEvent::CandidateRejected { text, reason } => {
                log::debug!("Skipped link '{text}': {reason}")
            }
            ScrapeEvent::DetailVisited { url, email } => match email {
                Some(email) => log::info!("  ✓ {email} ({url})"),
                None => log::info!("  ✗ no email ({url})"),
            },
            ScrapeEvent::ResourceReleased => log::debug!("Browser released"),
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl ScrapeObserver for NullObserver {
    fn on_event(&self, _event: &ScrapeEvent) {}
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Records every event for later inspection.
    #[derive(Default)]
    pub struct RecordingObserver {
        events: Mutex<Vec<ScrapeEvent>>,
    }

    impl RecordingObserver {
        pub fn events(&self) -> Vec<ScrapeEvent> {
            self.events.lock().map(|e| e.clone()).unwrap_or_default()
        }
    }

    impl ScrapeObserver for RecordingObserver {
        fn on_event(&self, event: &ScrapeEvent) {
            if let Ok(mut events) = self.events.lock() {
                events.push(event.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_labels() {
        assert_eq!(Strategy::TableFallback.to_string(), "table fallback");
        assert_eq!(FetchMode::Rendered.to_string(), "rendered");
        assert_eq!(RejectReason::SiteChrome.to_string(), "inside site chrome");
    }

    #[test]
    fn test_recording_observer_keeps_order() {
        let observer = testing::RecordingObserver::default();
        observer.on_event(&ScrapeEvent::ResourceReleased);
        observer.on_event(&ScrapeEvent::StrategyApplied {
            strategy: Strategy::DeepCrawl,
            found: 1,
            total: 1,
        });
        let events = observer.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], ScrapeEvent::ResourceReleased);
    }
}
