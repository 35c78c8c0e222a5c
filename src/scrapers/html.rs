// src/scrapers/html.rs

//! HTML extraction helpers shared by the site scrapers.
//!
//! Everything here is synchronous: a parsed `Html` document is not `Send`, so
//! callers fetch the body first, extract plain data here, and only then
//! await again.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::SiteSelectors;
use crate::utils::{clean_text, resolve_url, truncate};

/// Parse a CSS selector string.
pub fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| AppError::selector(selector, e))
}

fn parse_optional(selector: Option<&String>) -> Result<Option<Selector>> {
    selector.map(|s| parse_selector(s)).transpose()
}

/// Compiled selectors for one site.
#[derive(Debug)]
pub struct CardSelectors {
    pub card: Selector,
    pub title: Selector,
    /// None: the link lives on the card itself or on the title element
    pub link: Option<Selector>,
    pub company: Option<Selector>,
    pub location: Option<Selector>,
    pub salary: Option<Selector>,
    pub detail: Vec<Selector>,
    pub attr_name: String,
}

impl CardSelectors {
    pub fn compile(site: &SiteSelectors) -> Result<Self> {
        Ok(Self {
            card: parse_selector(&site.card_selector)?,
            title: parse_selector(&site.title_selector)?,
            link: parse_optional(site.link_selector.as_ref())?,
            company: parse_optional(site.company_selector.as_ref())?,
            location: parse_optional(site.location_selector.as_ref())?,
            salary: parse_optional(site.salary_selector.as_ref())?,
            detail: site
                .detail_selectors
                .iter()
                .map(|s| parse_selector(s))
                .collect::<Result<_>>()?,
            attr_name: site.attr_name.clone(),
        })
    }
}

/// Fields lifted from one listing card.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapedCard {
    pub title: String,
    pub link: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub salary: Option<String>,
    /// Whole card text, whitespace-normalized
    pub text: Option<String>,
}

/// Element text with whitespace collapsed, None if blank.
pub fn element_text(element: &ElementRef) -> Option<String> {
    clean_text(&element.text().collect::<String>())
}

/// Text of the first match under `element`.
pub fn select_text(element: &ElementRef, selector: Option<&Selector>) -> Option<String> {
    selector
        .and_then(|sel| element.select(sel).next())
        .and_then(|el| element_text(&el))
}

/// Non-blank attribute value.
pub fn attr(element: &ElementRef, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// Extract up to `limit` cards, skipping cards without a title or link.
pub fn extract_cards(
    body: &str,
    selectors: &CardSelectors,
    base_url: &Url,
    limit: usize,
) -> Vec<ScrapedCard> {
    let document = Html::parse_document(body);

    document
        .select(&selectors.card)
        .take(limit)
        .filter_map(|card| parse_card(&card, selectors, base_url))
        .collect()
}

fn parse_card(card: &ElementRef, selectors: &CardSelectors, base_url: &Url) -> Option<ScrapedCard> {
    let title_el = card.select(&selectors.title).next();
    let title = title_el.as_ref().and_then(element_text);

    let href = match &selectors.link {
        Some(sel) => card
            .select(sel)
            .next()
            .and_then(|el| attr(&el, &selectors.attr_name)),
        None => attr(card, &selectors.attr_name)
            .or_else(|| title_el.as_ref().and_then(|el| attr(el, &selectors.attr_name))),
    };

    let (Some(title), Some(href)) = (title, href) else {
        log::debug!("Skipping card without title or link");
        return None;
    };

    Some(ScrapedCard {
        title,
        link: resolve_url(base_url, &href),
        company: select_text(card, selectors.company.as_ref()),
        location: select_text(card, selectors.location.as_ref()),
        salary: select_text(card, selectors.salary.as_ref()),
        text: element_text(card),
    })
}

/// Join the text of every detail selector that matches, truncated.
pub fn extract_description(body: &str, selectors: &[Selector], max_chars: usize) -> Option<String> {
    let document = Html::parse_document(body);
    let root = document.root_element();

    let parts: Vec<String> = selectors
        .iter()
        .filter_map(|sel| root.select(sel).next())
        .filter_map(|el| element_text(&el))
        .collect();

    clean_text(&parts.join("\n")).map(|text| truncate(&text, max_chars))
}
