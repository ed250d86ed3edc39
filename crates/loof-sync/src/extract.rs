//! Result page parsing.
//!
//! [`RecordParser::parse`] is the only place that knows the result page's
//! markup (plus [`crate::titles`] for the title list). Every field is best
//! effort: a missing marker leaves the field unset, it is not an error.
//!
//! `scraper::Html` is `!Send`, so parsing stays synchronous and never spans
//! an `.await` in the client.

use scraper::{Html, Selector};

use crate::breed::BreedCatalog;
use crate::config::{RegistryConfig, TitleLayout, DEFAULT_FEDERATION};
use crate::titles::{element_text, extract_titles};
use crate::types::{BreederRecord, LookupError, LookupResult, Sex};

const DESCRIPTION_SELECTOR: &str = "span.placeholder.description";
const SEX_SELECTOR: &str = "span.placeholder.sex";
const QUALIFICATION_SELECTOR: &str = "span.placeholder.qualif";

/// Turns a registry result page into a [`BreederRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordParser {
    catalog: BreedCatalog,
    layout: TitleLayout,
    default_federation: String,
}

impl RecordParser {
    pub fn new(catalog: BreedCatalog, layout: TitleLayout, default_federation: &str) -> Self {
        Self {
            catalog,
            layout,
            default_federation: default_federation.to_string(),
        }
    }

    pub fn from_config(config: &RegistryConfig) -> Self {
        Self::new(
            BreedCatalog::new(config.known_breeds.iter().cloned()),
            config.title_layout,
            &config.default_federation,
        )
    }

    /// Extract every recognised field from the result page for `chip_id`.
    pub fn parse(&self, html: &str, chip_id: &str) -> LookupResult<BreederRecord> {
        let document = Html::parse_document(html);
        let mut record = BreederRecord::new(chip_id);

        let description = marker_text(&document, DESCRIPTION_SELECTOR)?;
        if let Some((breed, color)) = self.catalog.split(&description) {
            record.breed = Some(breed);
            record.color = color;
        }

        record.sex = Sex::from_registry_text(&marker_text(&document, SEX_SELECTOR)?);

        let qualification = marker_text(&document, QUALIFICATION_SELECTOR)?;
        if !qualification.is_empty() {
            record.qualification_grade = Some(qualification);
        }

        let titles = extract_titles(&document, self.layout, &self.default_federation)?;
        if !titles.is_empty() {
            record.titles = Some(titles);
        }

        Ok(record)
    }
}

impl Default for RecordParser {
    fn default() -> Self {
        Self::new(
            BreedCatalog::default(),
            TitleLayout::default(),
            DEFAULT_FEDERATION,
        )
    }
}

/// Text of the first element matching `css`, or an empty string.
fn marker_text(document: &Html, css: &str) -> LookupResult<String> {
    let sel =
        Selector::parse(css).map_err(|e| LookupError::Parse(format!("selector '{css}': {e}")))?;
    Ok(document
        .select(&sel)
        .next()
        .map(|el| element_text(&el))
        .unwrap_or_default())
}
