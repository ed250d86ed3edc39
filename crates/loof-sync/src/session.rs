//! Search-form session tokens.
//!
//! The registry's search page is a Drupal form. A query is only accepted when
//! it carries the hidden `form_build_id` and `form_id` values served with the
//! form, so every lookup starts by scraping them.

use scraper::{Html, Selector};

use crate::types::{LookupError, LookupResult};

/// Value of the submit button that triggers a search.
pub const SEARCH_OP: &str = "Rechercher";

/// Tokens scraped from one fetch of the search page.
///
/// Lives for a single lookup; never cached or shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSession {
    pub form_build_id: String,
    pub form_id: String,
}

impl SearchSession {
    /// Read the hidden form tokens from the search page.
    ///
    /// Fails with [`LookupError::TokenNotFound`] when either input is missing
    /// or empty, which is what a maintenance page or a markup change looks
    /// like from here.
    pub fn from_search_page(html: &str) -> LookupResult<Self> {
        let document = Html::parse_document(html);

        let form_build_id = hidden_value(&document, "form_build_id")?;
        let form_id = hidden_value(&document, "form_id")?;

        match (form_build_id, form_id) {
            (Some(form_build_id), Some(form_id)) => Ok(Self {
                form_build_id,
                form_id,
            }),
            _ => Err(LookupError::TokenNotFound),
        }
    }

    /// Url-encoded form fields for the search submission.
    pub fn form_fields(&self, chip: &str) -> Vec<(String, String)> {
        vec![
            ("number".to_string(), chip.to_string()),
            ("op".to_string(), SEARCH_OP.to_string()),
            ("form_build_id".to_string(), self.form_build_id.clone()),
            ("form_id".to_string(), self.form_id.clone()),
        ]
    }
}

/// First non-empty `value` of an `<input name="...">`.
fn hidden_value(document: &Html, name: &str) -> LookupResult<Option<String>> {
    let sel = Selector::parse(&format!(r#"input[name="{name}"]"#))
        .map_err(|e| LookupError::Parse(format!("token selector for '{name}': {e}")))?;

    Ok(document
        .select(&sel)
        .filter_map(|input| input.value().attr("value"))
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string))
}
