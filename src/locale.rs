//! Language/country/variant triples identifying which bundle files to try.

use std::fmt;
use std::str::FromStr;

use regex::Regex;

/// A locale split into its language, country and variant segments.
///
/// Any segment may be empty. Languages are stored lowercase and countries uppercase so
/// that generated bundle filenames are stable regardless of how the tag was written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locale {
    language: String,
    country: String,
    variant: String,
}

impl Locale {
    /// Build a locale from its three segments.
    pub fn new(
        language: impl Into<String>,
        country: impl Into<String>,
        variant: impl Into<String>,
    ) -> Self {
        Self {
            language: language.into().to_ascii_lowercase(),
            country: country.into().to_ascii_uppercase(),
            variant: variant.into(),
        }
    }

    /// Locale with every segment empty.
    pub fn root() -> Self {
        Self::default()
    }

    /// Plain English (`en`).
    pub fn english() -> Self {
        Self::new("en", "", "")
    }

    /// Plain French (`fr`).
    pub fn french() -> Self {
        Self::new("fr", "", "")
    }

    /// Language segment, lowercase.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Country segment, uppercase.
    pub fn country(&self) -> &str {
        &self.country
    }

    /// Variant segment as supplied.
    pub fn variant(&self) -> &str {
        &self.variant
    }

    /// Returns `true` when every segment is empty.
    pub fn is_root(&self) -> bool {
        self.language.is_empty() && self.country.is_empty() && self.variant.is_empty()
    }
}

/// Error returned when a locale tag cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleError {
    /// The language segment is not 2-8 ASCII letters.
    InvalidLanguage(String),
    /// The country segment is neither two letters nor three digits.
    InvalidCountry(String),
    /// The variant contains characters other than ASCII letters, digits and `_`.
    InvalidVariant(String),
}

impl fmt::Display for LocaleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLanguage(value) => write!(f, "invalid locale language '{value}'"),
            Self::InvalidCountry(value) => write!(f, "invalid locale country '{value}'"),
            Self::InvalidVariant(value) => write!(f, "invalid locale variant '{value}'"),
        }
    }
}

impl std::error::Error for LocaleError {}

fn language_pattern() -> &'static Regex {
    use std::sync::OnceLock;

    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(?:[A-Za-z]{2,8})?$").expect("invalid language regex"))
}

fn country_pattern() -> &'static Regex {
    use std::sync::OnceLock;

    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:[A-Za-z]{2}|[0-9]{3})?$").expect("invalid country regex")
    })
}

fn variant_pattern() -> &'static Regex {
    use std::sync::OnceLock;

    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]*$").expect("invalid variant regex"))
}

impl FromStr for Locale {
    type Err = LocaleError;

    /// Parse tags such as `en`, `en_CA`, `en-CA`, `en_CA_x`, `_CA` or `en__x`.
    ///
    /// Segments beyond the third are folded into the variant.
    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Ok(Self::root());
        }

        let mut parts = tag.splitn(3, ['_', '-']);
        let language = parts.next().unwrap_or_default();
        let country = parts.next().unwrap_or_default();
        let variant = parts.next().unwrap_or_default().replace('-', "_");

        if !language_pattern().is_match(language) {
            return Err(LocaleError::InvalidLanguage(language.to_string()));
        }
        if !country_pattern().is_match(country) {
            return Err(LocaleError::InvalidCountry(country.to_string()));
        }
        if !variant_pattern().is_match(&variant) {
            return Err(LocaleError::InvalidVariant(variant));
        }

        Ok(Self::new(language, country, variant))
    }
}

impl fmt::Display for Locale {
    /// Underscore-joined form, dropping trailing empty segments.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.language)?;
        if !self.country.is_empty() || !self.variant.is_empty() {
            write!(f, "_{}", self.country)?;
        }
        if !self.variant.is_empty() {
            write!(f, "_{}", self.variant)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_language_only() {
        let locale: Locale = "EN".parse().unwrap();
        assert_eq!(locale, Locale::new("en", "", ""));
    }

    #[test]
    fn accepts_hyphen_and_underscore_separators() {
        let underscore: Locale = "en_ca".parse().unwrap();
        let hyphen: Locale = "en-CA".parse().unwrap();
        assert_eq!(underscore, hyphen);
        assert_eq!(underscore.country(), "CA");
    }

    #[test]
    fn keeps_empty_language_before_country() {
        let locale: Locale = "_CA".parse().unwrap();
        assert_eq!(locale.language(), "");
        assert_eq!(locale.country(), "CA");
    }

    #[test]
    fn folds_extra_segments_into_variant() {
        let locale: Locale = "en-CA-posix-x".parse().unwrap();
        assert_eq!(locale.variant(), "posix_x");
    }

    #[test]
    fn empty_tag_is_root() {
        assert!("".parse::<Locale>().unwrap().is_root());
    }

    #[test]
    fn rejects_malformed_segments() {
        assert_eq!(
            "e1".parse::<Locale>(),
            Err(LocaleError::InvalidLanguage("e1".into()))
        );
        assert_eq!(
            "en_CAN".parse::<Locale>(),
            Err(LocaleError::InvalidCountry("CAN".into()))
        );
    }

    #[test]
    fn rejects_variants_with_path_characters() {
        assert_eq!(
            "en_CA_../../x".parse::<Locale>(),
            Err(LocaleError::InvalidVariant("../../x".into()))
        );
        assert!("en_CA_x/y".parse::<Locale>().is_err());
        assert!("en_CA_POSIX_2".parse::<Locale>().is_ok());
    }

    #[test]
    fn displays_without_trailing_separators() {
        assert_eq!(Locale::new("en", "", "").to_string(), "en");
        assert_eq!(Locale::new("en", "CA", "").to_string(), "en_CA");
        assert_eq!(Locale::new("", "CA", "").to_string(), "_CA");
        assert_eq!(Locale::new("en", "", "x").to_string(), "en__x");
        assert_eq!(Locale::root().to_string(), "");
    }
}
