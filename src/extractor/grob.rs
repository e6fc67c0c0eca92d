//! Extractor for the gr-oborona.ru song pages
//!
//! The catalog is a list of links inside `#abc_list`; every song has a
//! printable page with the title in `<h2>`, labelled metadata paragraphs
//! (`<p><strong>Автор:</strong> ...</p>`) and the lyrics in the last
//! paragraph, where verses are separated by two or more `<br>` tags and lines
//! by a single one.

use super::tables::{artist_for_album, canonical_album};
use super::text::{catalog_id, normalize_text, value_after_label};
use super::Extractor;
use crate::domain::{CatalogEntry, Group, Item, Tag};
use crate::ParseError;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Parser id used in configuration
pub const GROB_PARSER_ID: &str = "grob";

const CATALOG_LINKS: &str = "#abc_list a";
const TITLE: &str = "h2";
const PARAGRAPHS: &str = "p";
const LABELS: &str = "strong";
const BODY: &str = "p:last-of-type";

// A run of two or more line breaks, allowing whitespace and non-breaking
// spaces (raw or serialized as entities) between them
const GROUP_BREAK: &str = r"(?i)(?:<br\s*/?>(?:\s|\x{A0}|&nbsp;|&#160;)*){2,}";
const LINE_BREAK: &str = r"(?i)<br\s*/?>";

/// Labelled metadata fields, in the order their tags are emitted
const AUTHOR_LABEL: &str = "Автор";
const ALBUM_LABEL: &str = "Альбом";

/// Markup extractor for gr-oborona.ru
#[derive(Debug, Clone)]
pub struct GrobExtractor {
    catalog_links: Selector,
    title: Selector,
    paragraphs: Selector,
    labels: Selector,
    body: Selector,
    group_break: Regex,
    line_break: Regex,
}

impl GrobExtractor {
    /// Compiles the selectors and patterns used by the extractor.
    pub fn new() -> Result<Self, ParseError> {
        Ok(Self {
            catalog_links: parse_selector(CATALOG_LINKS)?,
            title: parse_selector(TITLE)?,
            paragraphs: parse_selector(PARAGRAPHS)?,
            labels: parse_selector(LABELS)?,
            body: parse_selector(BODY)?,
            group_break: parse_pattern(GROUP_BREAK)?,
            line_break: parse_pattern(LINE_BREAK)?,
        })
    }

    /// Replaces the selector locating the catalog links (e.g. `#list a`).
    pub fn with_catalog_links(mut self, selector: &str) -> Result<Self, ParseError> {
        self.catalog_links = parse_selector(selector)?;
        Ok(self)
    }

    /// Finds the first paragraph holding a `<strong>` label containing `label`
    /// and returns the value following it.
    fn labeled_value(&self, document: &Html, label: &str) -> Option<String> {
        let paragraph = document.select(&self.paragraphs).find(|paragraph| {
            paragraph
                .select(&self.labels)
                .any(|strong| element_text(strong).contains(label))
        })?;

        let value = value_after_label(&element_text(paragraph), label);
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    fn parse_tags(&self, document: &Html) -> Vec<Tag> {
        let mut tags = Vec::new();

        if let Some(author) = self.labeled_value(document, AUTHOR_LABEL) {
            tags.push(Tag::new("author", author));
        }

        if let Some(album) = self.labeled_value(document, ALBUM_LABEL) {
            let album = canonical_album(&album);
            if let Some(artist) = artist_for_album(album) {
                tags.push(Tag::new("artist", artist));
            }
            tags.push(Tag::new("album", album));
        }

        tags
    }

    /// Splits body markup into groups of normalized lines
    ///
    /// Empty lines are skipped, and so are groups left without any line.
    fn parse_body(&self, html: &str) -> Vec<Group> {
        self.group_break
            .split(html)
            .map(|group_html| Group {
                lines: self
                    .line_break
                    .split(group_html)
                    .map(fragment_text)
                    .filter(|line| !line.is_empty())
                    .collect(),
            })
            .filter(|group| !group.lines.is_empty())
            .collect()
    }
}

impl Extractor for GrobExtractor {
    fn parse_catalog(&self, markup: &str) -> Result<Vec<CatalogEntry>, ParseError> {
        let document = Html::parse_document(markup);

        let entries = document
            .select(&self.catalog_links)
            .filter_map(|link| {
                let href = link.value().attr("href")?;
                let id = catalog_id(href)?;
                Some(CatalogEntry {
                    id: id.to_string(),
                    title: element_text(link),
                })
            })
            .collect();

        Ok(entries)
    }

    fn parse_item(&self, markup: &str) -> Result<Item, ParseError> {
        let document = Html::parse_document(markup);

        let title = document
            .select(&self.title)
            .next()
            .map(element_text)
            .unwrap_or_default();

        let tags = self.parse_tags(&document);

        let body_html = document
            .select(&self.body)
            .next()
            .map(|body| body.inner_html())
            .unwrap_or_default();

        Ok(Item {
            id: String::new(),
            title,
            tags,
            body: self.parse_body(&body_html),
        })
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ParseError> {
    Selector::parse(selector).map_err(|e| ParseError::selector(selector, format!("{e:?}")))
}

fn parse_pattern(pattern: &str) -> Result<Regex, ParseError> {
    Regex::new(pattern).map_err(|source| ParseError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Normalized visible text of an element
fn element_text(element: ElementRef<'_>) -> String {
    normalize_text(&element.text().collect::<String>())
}

/// Normalized visible text of an HTML fragment
fn fragment_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    normalize_text(&fragment.root_element().text().collect::<String>())
}
