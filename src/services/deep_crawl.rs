// src/services/deep_crawl.rs

//! Deep crawl service.
//!
//! Follows same-domain links whose text looks like a person's name to the
//! linked profile pages and takes one email from each.

use std::collections::HashSet;
use std::time::Duration;

use scraper::{ElementRef, Html};
use url::Url;

use crate::error::{AppError, Result};
use crate::fetch::{PageFetch, RenderSession};
use crate::models::keywords::{
    CHROME_BLOCK_KEYWORDS, CONTENT_AREA_KEYWORDS, LINK_EXCLUDE_KEYWORDS, PROFILE_HREF_KEYWORDS,
    PROFILE_TEXT_KEYWORDS, SHARED_MAILBOX_KEYWORDS, contains_any,
};
use crate::models::{Config, ExtractionConfig, LinkCandidate, ProfessorRecord};
use crate::pipeline::events::{FetchMode, RejectReason, ScrapeEvent, ScrapeObserver, Strategy};
use crate::services::departments;
use crate::services::email::{find_all_emails, is_valid_email};
use crate::services::names::is_professor_name;
use crate::utils::dom::{closest, mail_links, mailto_address, parse_selector, raw_text, text_of};
use crate::utils::{get_domain, resolve_url};

const CHROME_TAGS: &[&str] = &["nav", "header", "footer"];
const CHROME_CLASSES: &[&str] = &["menu", "navigation"];
const BLOCK_TAGS: &[&str] = &["div", "section", "article", "li", "td"];
const BLOCK_TEXT_PREFIX_CHARS: usize = 200;

/// Listing page analysis: the default department and the links to follow.
#[derive(Debug, Default)]
struct CrawlPlan {
    department: String,
    candidates: Vec<LinkCandidate>,
}

/// Service that visits individual profile pages.
pub struct DeepCrawler<'a> {
    fetcher: &'a dyn PageFetch,
    observer: &'a dyn ScrapeObserver,
    config: &'a Config,
}

impl<'a> DeepCrawler<'a> {
    pub fn new(
        fetcher: &'a dyn PageFetch,
        observer: &'a dyn ScrapeObserver,
        config: &'a Config,
    ) -> Self {
        Self {
            fetcher,
            observer,
            config,
        }
    }

    /// Render the listing page, pick candidate profile links and visit each
    /// in order. Returns nothing when the page cannot be rendered.
    pub async fn crawl(
        &self,
        url: &str,
        session: &mut RenderSession<'_>,
    ) -> Result<Vec<ProfessorRecord>> {
        if !session.is_available() {
            log::info!("Deep crawl needs a browser; skipping");
            return Ok(Vec::new());
        }

        let html = session.render(url).await;
        self.observer.on_event(&ScrapeEvent::FetchAttempted {
            url: url.to_string(),
            mode: FetchMode::Rendered,
            success: html.is_some(),
        });
        let Some(html) = html else {
            return Ok(Vec::new());
        };

        let plan = self.plan(url, &html)?;
        if plan.candidates.is_empty() {
            log::info!("No profile links found on {url}");
            return Ok(Vec::new());
        }
        log::info!("Following {} profile links", plan.candidates.len());

        let delay = Duration::from_millis(self.config.crawler.detail_delay_ms);
        let total = plan.candidates.len();
        let mut records = Vec::new();

        for (i, candidate) in plan.candidates.into_iter().enumerate() {
            log::info!("  {}/{}: {}", i + 1, total, candidate.display_text);

            match self.visit(&candidate).await {
                Ok(email) => {
                    self.observer.on_event(&ScrapeEvent::DetailVisited {
                        url: candidate.absolute_url.clone(),
                        email: email.clone(),
                    });

                    let record = email
                        .filter(|_| is_professor_name(&candidate.display_text))
                        .and_then(|email| {
                            ProfessorRecord::new(
                                candidate.display_text,
                                email,
                                plan.department.clone(),
                            )
                        });
                    records.extend(record);
                }
                Err(e) => {
                    log::warn!("Skipping profile: {e}");
                    self.observer.on_event(&ScrapeEvent::DetailVisited {
                        url: candidate.absolute_url.clone(),
                        email: None,
                    });
                }
            }

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        self.observer.on_event(&ScrapeEvent::StrategyApplied {
            strategy: Strategy::DeepCrawl,
            found: records.len(),
            total: records.len(),
        });

        Ok(records)
    }

    fn plan(&self, url: &str, html: &str) -> Result<CrawlPlan> {
        let document = Html::parse_document(html);
        Ok(CrawlPlan {
            department: departments::resolve_default(url, &document)?,
            candidates: collect_candidates(&document, url, self.observer, &self.config.extraction)?,
        })
    }

    /// Fetch one profile page and look for its owner's email. A page that
    /// cannot be fetched or parsed is an [`AppError::Crawl`] for its URL.
    async fn visit(&self, candidate: &LinkCandidate) -> Result<Option<String>> {
        if !candidate.absolute_url.starts_with("http") {
            return Ok(None);
        }

        let html = self.fetcher.fetch(&candidate.absolute_url).await;
        self.observer.on_event(&ScrapeEvent::FetchAttempted {
            url: candidate.absolute_url.clone(),
            mode: FetchMode::Detail,
            success: html.is_some(),
        });

        let html =
            html.ok_or_else(|| AppError::crawl(&candidate.absolute_url, "page could not be fetched"))?;
        find_profile_email(&Html::parse_document(&html))
            .map_err(|e| AppError::crawl(&candidate.absolute_url, e))
    }
}

/// Same-domain links on a listing page that plausibly lead to a personal
/// profile, deduplicated by URL and capped per `config`.
pub fn collect_candidates(
    document: &Html,
    page_url: &str,
    observer: &dyn ScrapeObserver,
    config: &ExtractionConfig,
) -> Result<Vec<LinkCandidate>> {
    let base = Url::parse(page_url)?;
    let base_domain = get_domain(page_url);
    let anchors = parse_selector("a[href]")?;

    let reject = |text: &str, reason: RejectReason| {
        observer.on_event(&ScrapeEvent::CandidateRejected {
            text: text.to_string(),
            reason,
        });
    };

    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for anchor in document.select(&anchors) {
        let href = anchor.value().attr("href").unwrap_or_default().trim();
        if href.is_empty() {
            continue;
        }

        let absolute = resolve_url(&base, href);
        let text = text_of(anchor);

        if get_domain(&absolute) != base_domain {
            reject(&text, RejectReason::CrossDomain);
            continue;
        }
        if !is_professor_name(&text) || text.contains('@') || text.contains("http") {
            reject(&text, RejectReason::NotAName);
            continue;
        }
        if is_navigation(&text, &absolute) {
            reject(&text, RejectReason::NavigationKeyword);
            continue;
        }

        let block = closest(anchor, BLOCK_TAGS);
        if in_site_chrome(anchor) || block.is_some_and(block_reads_as_chrome) {
            reject(&text, RejectReason::SiteChrome);
            continue;
        }
        if !has_profile_context(&text, &absolute, block) {
            reject(&text, RejectReason::NoProfileContext);
            continue;
        }
        if !seen.insert(absolute.clone()) {
            reject(&text, RejectReason::DuplicateUrl);
            continue;
        }

        candidates.push(LinkCandidate {
            display_text: text,
            absolute_url: absolute,
        });
    }

    let mut accepted: Vec<LinkCandidate> = Vec::new();
    for (i, candidate) in candidates.into_iter().enumerate() {
        if i >= config.max_link_candidates || accepted.len() >= config.max_detail_pages {
            reject(&candidate.display_text, RejectReason::OverCandidateLimit);
        } else if is_professor_name(&candidate.display_text) {
            accepted.push(candidate);
        } else {
            reject(&candidate.display_text, RejectReason::NotAName);
        }
    }

    Ok(accepted)
}

/// First personal address on a profile page: mail-links first, then any
/// address in the page text. Shared mailboxes are skipped.
pub fn find_profile_email(document: &Html) -> Result<Option<String>> {
    let root = document.root_element();

    let linked = mail_links(root)?
        .into_iter()
        .filter_map(mailto_address)
        .find(|address| is_personal_address(address));
    if linked.is_some() {
        return Ok(linked);
    }

    Ok(find_all_emails(&raw_text(root))
        .into_iter()
        .find(|address| is_personal_address(address)))
}

fn is_personal_address(address: &str) -> bool {
    is_valid_email(address) && !contains_any(&address.to_lowercase(), SHARED_MAILBOX_KEYWORDS)
}

fn is_navigation(text: &str, href: &str) -> bool {
    contains_any(&text.to_lowercase(), LINK_EXCLUDE_KEYWORDS)
        || contains_any(&href.to_lowercase(), LINK_EXCLUDE_KEYWORDS)
}

/// Whether the anchor sits inside navigation, header, footer or a menu.
fn in_site_chrome(anchor: ElementRef<'_>) -> bool {
    anchor.ancestors().filter_map(ElementRef::wrap).any(|el| {
        let element = el.value();
        CHROME_TAGS.contains(&element.name())
            || element
                .classes()
                .any(|class| contains_any(&class.to_lowercase(), CHROME_CLASSES))
    })
}

fn block_reads_as_chrome(block: ElementRef<'_>) -> bool {
    let prefix: String = block
        .text()
        .collect::<String>()
        .chars()
        .take(BLOCK_TEXT_PREFIX_CHARS)
        .collect();
    contains_any(&prefix.to_lowercase(), CHROME_BLOCK_KEYWORDS)
}

fn has_profile_context(text: &str, href: &str, block: Option<ElementRef<'_>>) -> bool {
    if contains_any(&href.to_lowercase(), PROFILE_HREF_KEYWORDS) {
        return true;
    }
    if contains_any(&text.to_lowercase(), PROFILE_TEXT_KEYWORDS) {
        return true;
    }

    block.is_some_and(|block| {
        let element = block.value();
        let classes = element.classes().collect::<Vec<_>>().join(" ").to_lowercase();
        let id = element.id().unwrap_or_default().to_lowercase();
        contains_any(&classes, CONTENT_AREA_KEYWORDS) || contains_any(&id, CONTENT_AREA_KEYWORDS)
    })
}
