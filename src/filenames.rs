//! Locale-qualified bundle filename expansion.

use std::collections::BTreeSet;

use crate::locale::Locale;

/// Compute the locale-qualified filenames to try for `basename`, most specific first.
///
/// The suffix is built in three steps: `_language`, then `_country` (keeping the separator
/// even when the language is empty, so `messages__CA` is a valid candidate), then
/// `_variant` when at least one of language or country was present. The bare basename is
/// never returned.
pub fn candidate_filenames(basename: &str, locale: &Locale) -> Vec<String> {
    let mut builder = CandidateBuilder::new(basename, locale);

    builder.add_language_candidate();
    builder.add_country_candidate();
    builder.add_variant_candidate();

    builder.finish()
}

struct CandidateBuilder<'a> {
    locale: &'a Locale,
    buffer: String,
    seen: BTreeSet<String>,
    result: Vec<String>,
}

impl<'a> CandidateBuilder<'a> {
    fn new(basename: &str, locale: &'a Locale) -> Self {
        let mut buffer = String::with_capacity(basename.len() + 16);
        buffer.push_str(basename);
        buffer.push('_');

        Self {
            locale,
            buffer,
            seen: BTreeSet::new(),
            result: Vec::new(),
        }
    }

    fn add_language_candidate(&mut self) {
        let language = self.locale.language();
        if !language.is_empty() {
            self.buffer.push_str(language);
            self.push_buffer();
        }
        self.buffer.push('_');
    }

    fn add_country_candidate(&mut self) {
        let country = self.locale.country();
        if !country.is_empty() {
            self.buffer.push_str(country);
            self.push_buffer();
        }
    }

    fn add_variant_candidate(&mut self) {
        let locale = self.locale;
        if locale.variant().is_empty() {
            return;
        }
        if locale.language().is_empty() && locale.country().is_empty() {
            return;
        }

        self.buffer.push('_');
        self.buffer.push_str(locale.variant());
        self.push_buffer();
    }

    /// Candidates were collected general to specific; lookups run the other way.
    fn finish(mut self) -> Vec<String> {
        self.result.reverse();
        self.result
    }

    fn push_buffer(&mut self) {
        if self.seen.insert(self.buffer.clone()) {
            self.result.push(self.buffer.clone());
        }
    }
}
