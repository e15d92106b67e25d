use std::collections::BTreeMap;

use log::debug;
use scraper::{ElementRef, Html, Selector};

use crate::utils::conversion::strip_non_ascii;

/// Label → relative download link of every homework that was already submitted
pub type SubmittedHomework = BTreeMap<String, String>;

/// Length of the prefix in front of every label text
const LABEL_PREFIX: usize = 2;

/// Homework links and labels have an empty (or no) class, the rest of the page has one
pub(crate) fn has_empty_class(element: &ElementRef) -> bool {
    element.value().attr("class").map_or(true, |class| class.trim().is_empty())
}

/// Turns the text of a label into its key (drops the prefix and anything outside of ASCII)
pub fn label_key(text: &str) -> String {
    let rest = text.chars().skip(LABEL_PREFIX).collect::<String>();
    strip_non_ascii(&rest).trim().to_string()
}

/// Pairs labels with links by position
/// <br> Surplus labels are dropped from the front (the page carries a few extra labels before the homework list),
/// after that pairing stops as soon as either side runs out
pub fn pair_labels(labels: Vec<String>, links: Vec<String>) -> SubmittedHomework {
    let surplus = labels.len().saturating_sub(links.len());
    labels.into_iter().skip(surplus).zip(links).collect()
}

/// Parses the `homework_view2` page
pub fn parse_submitted(html: &str) -> SubmittedHomework {
    let document = Html::parse_document(html);
    let link_selector = Selector::parse("a[href]").unwrap();
    let label_selector = Selector::parse("label").unwrap();

    let links = document
        .select(&link_selector)
        .filter(has_empty_class)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect::<Vec<String>>();

    let labels = document
        .select(&label_selector)
        .filter(has_empty_class)
        .map(|element| label_key(&element.text().collect::<String>()))
        .collect::<Vec<String>>();

    debug!("found {} homework labels and {} links", labels.len(), links.len());

    pair_labels(labels, links)
}
