//! English pluralization.

use submit_compare_core::traits::Localizer;

/// Untranslated messages with English plural rules: only `1` is singular.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnglishLocalizer;

impl Localizer for EnglishLocalizer {
    fn ngettext(&self, singular: &str, plural: &str, n: u64) -> String {
        let message = if n == 1 { singular } else { plural };
        message.to_string()
    }
}
