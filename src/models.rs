//! Core data types: verse coordinates and the normalized verse record.

use serde::Serialize;
use std::fmt;

use crate::error::ExplorerError;

/// Number of books (mandalas) in the Rigveda.
pub const MANDALA_COUNT: u8 = 10;

/// Largest hymn number that fits the 3-digit slot of a document id.
pub const MAX_SUKTA: u16 = 999;

/// Largest verse number that fits the 2-digit slot of a document id.
pub const MAX_RIK: u8 = 99;

/// A validated (mandala, sukta, rik) triple.
///
/// Only constructible through [`VerseCoordinate::new`] or
/// [`VerseCoordinate::parse`], so every value yields a 7-character
/// document id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VerseCoordinate {
    mandala: u8,
    sukta: u16,
    rik: u8,
}

impl VerseCoordinate {
    pub fn new(mandala: i64, sukta: i64, rik: i64) -> Result<Self, ExplorerError> {
        if !(1..=MANDALA_COUNT as i64).contains(&mandala) {
            return Err(ExplorerError::Validation(format!(
                "mandala must be between 1 and {}, got {}",
                MANDALA_COUNT, mandala
            )));
        }
        if !(1..=MAX_SUKTA as i64).contains(&sukta) {
            return Err(ExplorerError::Validation(format!(
                "sukta must be between 1 and {}, got {}",
                MAX_SUKTA, sukta
            )));
        }
        if !(1..=MAX_RIK as i64).contains(&rik) {
            return Err(ExplorerError::Validation(format!(
                "rik must be between 1 and {}, got {}",
                MAX_RIK, rik
            )));
        }
        Ok(Self {
            mandala: mandala as u8,
            sukta: sukta as u16,
            rik: rik as u8,
        })
    }

    /// Parses raw request parameters. A `None` means the field was absent.
    pub fn parse(
        mandala: Option<&str>,
        sukta: Option<&str>,
        rik: Option<&str>,
    ) -> Result<Self, ExplorerError> {
        let mandala = parse_field("mandala", mandala)?;
        let sukta = parse_field("sukta", sukta)?;
        let rik = parse_field("rik", rik)?;
        Self::new(mandala, sukta, rik)
    }

    pub fn mandala(&self) -> u8 {
        self.mandala
    }

    pub fn sukta(&self) -> u16 {
        self.sukta
    }

    pub fn rik(&self) -> u8 {
        self.rik
    }

    /// VedaWeb addressing key: `MM` + `SSS` + `RR`, zero-padded.
    pub fn document_id(&self) -> String {
        format!("{:02}{:03}{:02}", self.mandala, self.sukta, self.rik)
    }
}

impl fmt::Display for VerseCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.mandala, self.sukta, self.rik)
    }
}

fn parse_field(name: &str, raw: Option<&str>) -> Result<i64, ExplorerError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ExplorerError::Validation(format!("missing required field: {}", name)))?;
    raw.parse::<i64>().map_err(|_| {
        ExplorerError::Validation(format!("{} must be an integer, got '{}'", name, raw))
    })
}

/// The flat verse record returned to clients.
///
/// Every field except `metrical_data` is always present; missing source data
/// is replaced by the fallback text documented in [`crate::normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedVerse {
    pub id: String,
    pub mandala: u8,
    pub sukta: u16,
    pub rik: u8,
    /// Devanagari rendering.
    pub sanskrit: String,
    /// Token forms joined per pada, padas separated by ` | `.
    pub padapatha: String,
    pub transliteration: String,
    pub translation: String,
    /// Best-effort; sourced from a version whose language is not verified.
    pub hindi_translation: String,
    pub deity: String,
    pub meter: String,
    pub group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrical_data: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_padding() {
        let c = VerseCoordinate::new(1, 1, 1).unwrap();
        assert_eq!(c.document_id(), "0100101");
        let c = VerseCoordinate::new(10, 129, 2).unwrap();
        assert_eq!(c.document_id(), "1012902");
    }

    #[test]
    fn test_document_id_always_seven_chars() {
        for (m, s, r) in [(1, 1, 1), (10, 999, 99), (3, 62, 10), (7, 104, 25)] {
            let id = VerseCoordinate::new(m, s, r).unwrap().document_id();
            assert_eq!(id.len(), 7, "id for {}.{}.{} was {}", m, s, r, id);
            assert!(id.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_book_out_of_range() {
        assert!(matches!(
            VerseCoordinate::new(0, 1, 1),
            Err(ExplorerError::Validation(_))
        ));
        assert!(matches!(
            VerseCoordinate::new(11, 1, 1),
            Err(ExplorerError::Validation(_))
        ));
    }

    #[test]
    fn test_hymn_and_verse_bounds() {
        assert!(VerseCoordinate::new(1, 0, 1).is_err());
        assert!(VerseCoordinate::new(1, 1000, 1).is_err());
        assert!(VerseCoordinate::new(1, 1, 0).is_err());
        assert!(VerseCoordinate::new(1, 1, 100).is_err());
    }

    #[test]
    fn test_parse_names_missing_field() {
        let err = VerseCoordinate::parse(Some("1"), None, Some("1")).unwrap_err();
        assert!(err.to_string().contains("sukta"));
        let err = VerseCoordinate::parse(Some("1"), Some("2"), Some("  ")).unwrap_err();
        assert!(err.to_string().contains("rik"));
    }

    #[test]
    fn test_parse_rejects_non_integers() {
        let err = VerseCoordinate::parse(Some("one"), Some("1"), Some("1")).unwrap_err();
        assert!(matches!(err, ExplorerError::Validation(_)));
        assert!(err.to_string().contains("mandala"));
        assert!(VerseCoordinate::parse(Some("1.5"), Some("1"), Some("1")).is_err());
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let c = VerseCoordinate::parse(Some(" 3 "), Some("62"), Some("10")).unwrap();
        assert_eq!(c.to_string(), "3.62.10");
    }
}
