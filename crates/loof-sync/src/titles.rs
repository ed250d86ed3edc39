//! Title list extraction and ordering.
//!
//! The registry's title markup has changed before, so both known layouts are
//! kept behind [`TitleLayout`]. All selectors for titles live in this module.

use std::cmp::Ordering;
use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::config::TitleLayout;
use crate::types::{LookupError, LookupResult, Title};

const LIST_ITEM_SELECTOR: &str = r#"ul[data-drupal-selector="edit-list"] li"#;
const TITLE_SELECTOR: &str = "span.placeholder.i-title";
const FEDERATION_SELECTOR: &str = "span.placeholder.i-federation";
const DATE_SELECTOR: &str = "span.placeholder.i-date";

/// Date format used by the registry for obtained dates.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

fn inline_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)obtenu le\s*:\s*(\d{2}-\d{2}-\d{4})").expect("inline date regex is valid")
    })
}

fn selector(css: &str) -> LookupResult<Selector> {
    Selector::parse(css).map_err(|e| LookupError::Parse(format!("selector '{css}': {e}")))
}

/// Whitespace-normalized text content of an element.
pub(crate) fn element_text(el: &ElementRef<'_>) -> String {
    el.text()
        .flat_map(|t| t.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a registry date (`DD-MM-YYYY`).
pub fn parse_obtained_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()
}

/// Extract every title in the result page's title list, most recent first.
///
/// Items without a title name are skipped. `default_federation` is used when
/// the layout carries no federation or the item leaves it blank.
pub fn extract_titles(
    document: &Html,
    layout: TitleLayout,
    default_federation: &str,
) -> LookupResult<Vec<Title>> {
    let item_sel = selector(LIST_ITEM_SELECTOR)?;
    let title_sel = selector(TITLE_SELECTOR)?;

    let mut titles = Vec::new();
    for item in document.select(&item_sel) {
        let name = first_text(&item, &title_sel);
        if name.is_empty() {
            continue;
        }

        let (federation, date) = match layout {
            TitleLayout::InlineDate => (String::new(), inline_date(&item)),
            TitleLayout::SplitColumns => split_columns(&item)?,
        };

        let federation = if federation.is_empty() {
            default_federation.to_string()
        } else {
            federation
        };

        titles.push(build_title(&name, federation, date));
    }

    sort_most_recent_first(&mut titles);
    Ok(titles)
}

/// `Obtenu le : 14-11-2018` anywhere in the item's text.
fn inline_date(item: &ElementRef<'_>) -> Option<NaiveDate> {
    let text = element_text(item);
    inline_date_re()
        .captures(&text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| parse_obtained_date(m.as_str()))
}

fn split_columns(item: &ElementRef<'_>) -> LookupResult<(String, Option<NaiveDate>)> {
    let federation_sel = selector(FEDERATION_SELECTOR)?;
    let date_sel = selector(DATE_SELECTOR)?;

    let federation = first_text(item, &federation_sel);
    let date = parse_obtained_date(&first_text(item, &date_sel));
    Ok((federation, date))
}

fn first_text(scope: &ElementRef<'_>, sel: &Selector) -> String {
    scope
        .select(sel)
        .next()
        .map(|el| element_text(&el))
        .unwrap_or_default()
}

fn build_title(name: &str, federation: String, date: Option<NaiveDate>) -> Title {
    match date {
        Some(d) => Title {
            name: format!("{name} ({})", d.year()),
            federation,
            obtained_date: d.format(DATE_FORMAT).to_string(),
        },
        None => Title {
            name: name.to_string(),
            federation,
            obtained_date: String::new(),
        },
    }
}

/// Order titles by obtained date, most recent first.
///
/// Titles without a parseable date go last; ties keep their page order.
pub fn sort_most_recent_first(titles: &mut [Title]) {
    titles.sort_by(|a, b| {
        match (
            parse_obtained_date(&a.obtained_date),
            parse_obtained_date(&b.obtained_date),
        ) {
            (Some(da), Some(db)) => db.cmp(&da),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}
