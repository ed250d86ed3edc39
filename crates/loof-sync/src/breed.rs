//! Breed/color split of the registry's description line.

/// Known breed names matched as a case-insensitive prefix of the description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreedCatalog {
    breeds: Vec<String>,
}

impl BreedCatalog {
    pub fn new<I, S>(breeds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            breeds: breeds.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a description such as `"Maine Coon Brown mackerel tabby"` into
    /// `(breed, color)`.
    ///
    /// The first known breed prefixing the text wins. Without a match the first
    /// whitespace-delimited token is taken as the breed and the rest as color.
    /// Color is `None` when nothing follows the breed.
    pub fn split(&self, description: &str) -> Option<(String, Option<String>)> {
        let text = description.trim();
        if text.is_empty() {
            return None;
        }

        for breed in &self.breeds {
            if let Some(rest) = strip_prefix_ignore_case(text, breed) {
                return Some((breed.clone(), non_empty(rest.trim())));
            }
        }

        let mut parts = text.splitn(2, char::is_whitespace);
        let breed = parts.next().unwrap_or(text).to_string();
        let color = parts.next().and_then(|rest| non_empty(rest.trim()));
        Some((breed, color))
    }
}

impl Default for BreedCatalog {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_KNOWN_BREEDS.iter().copied())
    }
}

/// `text` after `prefix`, comparing one char at a time in lowercase.
///
/// Lowercasing may change a char's byte length (`İ` becomes two chars), so the
/// offset is taken from `text` itself rather than from a lowercased copy.
fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let mut chars = text.char_indices();
    for expected in prefix.chars() {
        let (_, actual) = chars.next()?;
        if !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
    }
    let offset = chars.next().map_or(text.len(), |(i, _)| i);
    Some(&text[offset..])
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_breed_prefix() {
        let catalog = BreedCatalog::default();
        let (breed, color) = catalog
            .split("Maine Coon Brown mackerel tabby et blanc")
            .unwrap();
        assert_eq!(breed, "Maine Coon");
        assert_eq!(color.as_deref(), Some("Brown mackerel tabby et blanc"));
    }

    #[test]
    fn test_unknown_breed_falls_back_to_first_token() {
        let catalog = BreedCatalog::default();
        let (breed, color) = catalog.split("Unknown Something Else").unwrap();
        assert_eq!(breed, "Unknown");
        assert_eq!(color.as_deref(), Some("Something Else"));
    }

    #[test]
    fn test_case_insensitive_and_accented() {
        let catalog = BreedCatalog::default();
        let (breed, color) = catalog.split("SACRÉ DE BIRMANIE seal point").unwrap();
        assert_eq!(breed, "Sacré de Birmanie");
        assert_eq!(color.as_deref(), Some("seal point"));
    }

    #[test]
    fn test_breed_only() {
        let catalog = BreedCatalog::default();
        assert_eq!(catalog.split("Bengal"), Some(("Bengal".into(), None)));
        assert_eq!(catalog.split("Savannah"), Some(("Savannah".into(), None)));
    }

    #[test]
    fn test_empty_description() {
        assert_eq!(BreedCatalog::default().split("   "), None);
    }

    #[test]
    fn test_custom_catalog_order() {
        let catalog = BreedCatalog::new(["British", "British Shorthair"]);
        let (breed, color) = catalog.split("British Shorthair blue").unwrap();
        assert_eq!(breed, "British");
        assert_eq!(color.as_deref(), Some("Shorthair blue"));
    }

    #[test]
    fn test_prefix_with_length_changing_lowercase() {
        // 'İ' lowercases to two chars, so a lowercased copy is longer than the text.
        let catalog = BreedCatalog::new(["İstanbul Van"]);
        let (breed, color) = catalog.split("İSTANBUL VAN blanc").unwrap();
        assert_eq!(breed, "İstanbul Van");
        assert_eq!(color.as_deref(), Some("blanc"));

        // "İbis" lowercases to "i\u{307}bis", which starts with "i" but 'İ' is not 'i'.
        let catalog = BreedCatalog::new(["I"]);
        let (breed, color) = catalog.split("İbis crème").unwrap();
        assert_eq!(breed, "İbis");
        assert_eq!(color.as_deref(), Some("crème"));
    }

    #[test]
    fn test_text_shorter_than_breed_does_not_match() {
        let catalog = BreedCatalog::new(["Maine Coon"]);
        let (breed, color) = catalog.split("Maine").unwrap();
        assert_eq!(breed, "Maine");
        assert_eq!(color, None);
    }
}
