use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Strips diacritics from a city name ("São Paulo" -> "Sao Paulo").
///
/// Weather providers match city names against ASCII spellings, so accented
/// names coming from the postal lookup must be folded before querying.
pub fn strip_accents(name: &str) -> String {
    name.nfd().filter(|c| !is_combining_mark(*c)).nfc().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_portuguese_diacritics() {
        assert_eq!(strip_accents("São Paulo"), "Sao Paulo");
        assert_eq!(strip_accents("Florianópolis"), "Florianopolis");
        assert_eq!(strip_accents("Maceió"), "Maceio");
        assert_eq!(strip_accents("Jaraguá do Sul"), "Jaragua do Sul");
        assert_eq!(strip_accents("Conceição"), "Conceicao");
    }

    #[test]
    fn leaves_plain_ascii_untouched() {
        assert_eq!(strip_accents("Rio de Janeiro"), "Rio de Janeiro");
        assert_eq!(strip_accents(""), "");
    }
}
