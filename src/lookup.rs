//! Verse lookup: validate, fetch, normalize.
//!
//! Used by both the `rv verse` CLI command and `GET /api/verse`.

use anyhow::Result;
use std::fmt::Write;

use crate::config::Config;
use crate::error::ExplorerError;
use crate::models::{NormalizedVerse, VerseCoordinate};
use crate::normalize::normalize;
use crate::samples::not_found_suggestion;
use crate::vedaweb::{VedaWebClient, VerseSource};

/// Fetches and normalizes the verse at `coord`.
///
/// A missing document is reported as [`ExplorerError::NotFound`] with a
/// suggestion of a coordinate that is known to exist.
pub async fn lookup_verse(
    source: &dyn VerseSource,
    coord: &VerseCoordinate,
) -> Result<NormalizedVerse, ExplorerError> {
    let id = coord.document_id();
    match source.fetch_document(&id).await {
        Ok(doc) => {
            tracing::info!(verse = %coord, %id, "verse fetched");
            Ok(normalize(coord, &doc))
        }
        Err(ExplorerError::NotFound(_)) => {
            tracing::info!(verse = %coord, %id, "verse not catalogued");
            Err(ExplorerError::NotFound(format!(
                "Verse {} not found. {}",
                coord,
                not_found_suggestion(coord.mandala())
            )))
        }
        Err(e) => Err(e),
    }
}

/// Validates raw parameters and then looks the verse up.
///
/// Validation failures return before `source` is touched.
pub async fn lookup_raw(
    source: &dyn VerseSource,
    mandala: Option<&str>,
    sukta: Option<&str>,
    rik: Option<&str>,
) -> Result<NormalizedVerse, ExplorerError> {
    let coord = VerseCoordinate::parse(mandala, sukta, rik)?;
    lookup_verse(source, &coord).await
}

/// CLI entry point for `rv verse`.
pub async fn run_verse(config: &Config, mandala: &str, sukta: &str, rik: &str) -> Result<()> {
    let coord = VerseCoordinate::parse(Some(mandala), Some(sukta), Some(rik))?;
    let client = VedaWebClient::new(&config.vedaweb)?;
    let verse = lookup_verse(&client, &coord).await?;
    print!("{}", format_verse(&verse));
    Ok(())
}

/// Renders a verse as the plain-text block printed by `rv verse`.
pub fn format_verse(verse: &NormalizedVerse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "--- Rigveda {}.{}.{} ---", verse.mandala, verse.sukta, verse.rik);
    let _ = writeln!(out, "id:              {}", verse.id);
    let _ = writeln!(out, "deity:           {}", verse.deity);
    let _ = writeln!(out, "meter:           {}", verse.meter);
    let _ = writeln!(out, "group:           {}", verse.group);
    if let Some(ref m) = verse.metrical_data {
        let _ = writeln!(out, "metrical data:   {}", m);
    }
    out.push('\n');

    let _ = writeln!(out, "--- Sanskrit ---\n{}\n", verse.sanskrit);
    if !verse.padapatha.is_empty() {
        let _ = writeln!(out, "--- Padapatha ---\n{}\n", verse.padapatha);
    }
    let _ = writeln!(out, "--- Transliteration ---\n{}\n", verse.transliteration);
    let _ = writeln!(out, "--- Translation ---\n{}\n", verse.translation);
    let _ = writeln!(
        out,
        "--- Hindi translation (unverified source) ---\n{}",
        verse.hindi_translation
    );
    out
}
