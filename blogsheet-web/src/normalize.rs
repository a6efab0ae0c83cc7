//! Diacritic stripping for scraped text.

use blogsheet_common::ArticleRecord;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Decompose `text` (NFD) and drop every combining mark.
///
/// ```
/// use blogsheet_web::normalize::normalize;
///
/// assert_eq!(normalize("Educación"), "Educacion");
/// assert_eq!(normalize("Pequeñas y Medianas"), "Pequenas y Medianas");
/// ```
pub fn normalize(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Applies [`normalize`] to the text fields of a record.
pub trait Normalized {
    fn normalized(self) -> Self;
}

impl Normalized for ArticleRecord {
    fn normalized(self) -> Self {
        self.map_text(normalize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_accents_and_tildes() {
        assert_eq!(normalize("Ñandú über café"), "Nandu uber cafe");
        assert_eq!(normalize("Mónica Álvarez"), "Monica Alvarez");
    }

    #[test]
    fn ascii_is_untouched() {
        let ascii = "Plain ASCII 123 !?";
        assert_eq!(normalize(ascii), ascii);
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn idempotent_and_free_of_combining_marks() {
        for input in ["Educación Financiera", "a\u{0301}e\u{0300}", "Crème brûlée"] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once);
            assert!(!once.chars().any(is_combining_mark));
        }
    }

    #[test]
    fn record_normalization_leaves_read_time() {
        let record = ArticleRecord {
            title: "Cómo crecer".into(),
            category: "Pymes".into(),
            read_time_minutes: 4,
            author: "José Pérez".into(),
        }
        .normalized();
        assert_eq!(record.title, "Como crecer");
        assert_eq!(record.author, "Jose Perez");
        assert_eq!(record.read_time_minutes, 4);
    }
}
