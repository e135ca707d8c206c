//! HTML parser for the listing page and paste pages
//!
//! This module extracts:
//! - Candidate links from the listing page's sidebar menu
//! - Title, author and date from a paste page
//!
//! Every region lookup returns an `Option`; a missing region is an ordinary
//! outcome, not an error.

use crate::paste::CandidateLink;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

/// Region of the listing page that holds the recent pastes
const LISTING_MENU: &str = "ul.sidebar__menu";

const TITLE: &str = "title";
const AUTHOR: &str = "div.username a";
const DATE: &str = "div.date span";

/// Raw fields scraped from a paste page, before normalization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PastePage {
    pub title: Option<String>,
    pub author: Option<String>,
    /// Value of the date span's `title` attribute
    pub date: Option<String>,
}

/// Extracts candidate links from the listing page
///
/// Links whose href does not name a paste are dropped, and a paste linked
/// more than once appears once, in first-seen order.
///
/// # Returns
///
/// * `Ok(Vec<CandidateLink>)` - Links found in the menu (possibly none)
/// * `Err(String)` - The page has no listing menu
///
/// # Example
///
/// ```
/// use paste_crawler::crawler::extract_candidate_links;
///
/// let html = r#"<ul class="sidebar__menu"><li><a href="/abc">A</a></li></ul>"#;
/// let links = extract_candidate_links(html).unwrap();
/// assert_eq!(links[0].id, "abc");
/// ```
pub fn extract_candidate_links(html: &str) -> Result<Vec<CandidateLink>, String> {
    let document = Html::parse_document(html);
    let menu_selector = selector(LISTING_MENU)?;
    let link_selector = selector("a[href]")?;

    let menu = document
        .select(&menu_selector)
        .next()
        .ok_or_else(|| format!("no '{}' region on the listing page", LISTING_MENU))?;

    let mut seen = HashSet::new();
    let links = menu
        .select(&link_selector)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(CandidateLink::from_href)
        .filter(|link| seen.insert(link.id.clone()))
        .collect();

    Ok(links)
}

/// Extracts the raw title, author and date from a paste page
///
/// An empty or unrelated document yields a `PastePage` with every field
/// `None`.
pub fn parse_paste_page(html: &str) -> PastePage {
    let document = Html::parse_document(html);

    PastePage {
        title: first_match(&document, TITLE).map(element_text),
        author: first_match(&document, AUTHOR).map(element_text),
        date: first_match(&document, DATE)
            .and_then(|span| span.value().attr("title"))
            .map(str::to_string),
    }
}

fn selector(css: &str) -> Result<Selector, String> {
    Selector::parse(css).map_err(|e| format!("invalid selector '{}': {:?}", css, e))
}

fn first_match<'a>(document: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let selector = selector(css).ok()?;
    document.select(&selector).next()
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}
