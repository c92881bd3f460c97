//! Normalization of VedaWeb documents into [`NormalizedVerse`] records.
//!
//! VedaWeb documents are treated as untrusted JSON: any field may be absent
//! or have the wrong shape, and normalization never fails because of it.
//! Each output field falls back to a fixed text instead.
//!
//! # Field sources
//!
//! | Output | Source | Fallback |
//! |--------|--------|----------|
//! | `sanskrit` | version `version_sasaadhu` | [`FALLBACK_SANSKRIT`] |
//! | `padapatha` | `padas[].tokens[].form` | empty string |
//! | `transliteration` | version `version_lubotsky`, then `version_vannootenholland` | [`FALLBACK_TRANSLITERATION`] |
//! | `translation` | translation `translation_griffith` | [`FALLBACK_TRANSLATION`] |
//! | `hindi_translation` | translation `translation_geldner` | [`FALLBACK_HINDI`] |
//! | `deity` / `meter` / `group` | `hymnAddressee` / `stanzaType` / `hymnGroup` | [`FALLBACK_METADATA`] |
//! | `metrical_data` | `metricalData` of `version_vannootenholland` | omitted |
//!
//! Versions are matched on `(type, id)` by a linear scan; with duplicates the
//! first match in document order wins.

use serde_json::Value;

use crate::models::{NormalizedVerse, VerseCoordinate};

pub const SANSKRIT_VERSION: &str = "version_sasaadhu";
pub const TRANSLITERATION_VERSIONS: [&str; 2] = ["version_lubotsky", "version_vannootenholland"];
pub const TRANSLATION_ID: &str = "translation_griffith";
// Unverified: this id may not carry Hindi text.
pub const HINDI_TRANSLATION_ID: &str = "translation_geldner";
pub const METRICAL_VERSION: &str = "version_vannootenholland";

pub const FALLBACK_SANSKRIT: &str = "Devanagari text not available";
pub const FALLBACK_TRANSLITERATION: &str = "Transliteration not available";
pub const FALLBACK_TRANSLATION: &str = "Translation not available";
pub const FALLBACK_HINDI: &str = "Hindi translation not available";
pub const FALLBACK_METADATA: &str = "Unknown";

/// Separator placed between padas in the token text.
pub const PADA_SEPARATOR: &str = " | ";

const KIND_VERSION: &str = "version";
const KIND_TRANSLATION: &str = "translation";

/// Builds a fully populated verse record from a raw VedaWeb document.
pub fn normalize(coord: &VerseCoordinate, doc: &Value) -> NormalizedVerse {
    let sanskrit = find_version(doc, KIND_VERSION, SANSKRIT_VERSION)
        .and_then(version_text)
        .unwrap_or_else(|| FALLBACK_SANSKRIT.to_string());

    let transliteration = TRANSLITERATION_VERSIONS
        .iter()
        .find_map(|id| find_version(doc, KIND_VERSION, id).and_then(version_text))
        .unwrap_or_else(|| FALLBACK_TRANSLITERATION.to_string());

    let translation = find_version(doc, KIND_TRANSLATION, TRANSLATION_ID)
        .and_then(version_text)
        .unwrap_or_else(|| FALLBACK_TRANSLATION.to_string());

    let hindi_translation = find_version(doc, KIND_TRANSLATION, HINDI_TRANSLATION_ID)
        .and_then(version_text)
        .unwrap_or_else(|| FALLBACK_HINDI.to_string());

    let metrical_data = find_version(doc, KIND_VERSION, METRICAL_VERSION)
        .and_then(|v| v.get("metricalData"))
        .and_then(joined_text);

    NormalizedVerse {
        id: coord.document_id(),
        mandala: coord.mandala(),
        sukta: coord.sukta(),
        rik: coord.rik(),
        sanskrit,
        padapatha: pada_text(doc),
        transliteration,
        translation,
        hindi_translation,
        deity: metadata(doc, "hymnAddressee"),
        meter: metadata(doc, "stanzaType"),
        group: metadata(doc, "hymnGroup"),
        metrical_data,
    }
}

/// Joins token forms: spaces inside a pada, [`PADA_SEPARATOR`] between padas.
///
/// Returns an empty string when `padas` is missing or not an array. Padas
/// without any usable token are skipped.
pub fn pada_text(doc: &Value) -> String {
    let Some(padas) = doc.get("padas").and_then(Value::as_array) else {
        return String::new();
    };

    padas
        .iter()
        .filter_map(|pada| {
            let words: Vec<&str> = pada
                .get("tokens")
                .and_then(Value::as_array)?
                .iter()
                .filter_map(|t| t.get("form").and_then(Value::as_str))
                .filter(|f| !f.is_empty())
                .collect();
            if words.is_empty() {
                None
            } else {
                Some(words.join(" "))
            }
        })
        .collect::<Vec<_>>()
        .join(PADA_SEPARATOR)
}

/// First entry of `versions` whose `type` and `id` both match.
pub fn find_version<'a>(doc: &'a Value, kind: &str, id: &str) -> Option<&'a Value> {
    doc.get("versions")?.as_array()?.iter().find(|v| {
        v.get("type").and_then(Value::as_str) == Some(kind)
            && v.get("id").and_then(Value::as_str) == Some(id)
    })
}

fn version_text(version: &Value) -> Option<String> {
    version.get("form").and_then(joined_text)
}

/// Accepts either a string or an array of strings (joined with newlines).
///
/// Lines are kept exactly as sent; non-string entries are skipped. Text that
/// is blank after joining counts as absent.
fn joined_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Array(lines) => lines
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join("\n"),
        _ => return None,
    };
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

fn metadata(doc: &Value, key: &str) -> String {
    doc.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(FALLBACK_METADATA)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn coord() -> VerseCoordinate {
        VerseCoordinate::new(1, 1, 1).unwrap()
    }

    fn full_document() -> Value {
        json!({
            "id": "0100101",
            "hymnAddressee": "Agni",
            "hymnGroup": "Madhuchchhandas Vaishvamitra",
            "stanzaType": "Gāyatrī",
            "padas": [
                { "tokens": [ { "form": "agním" }, { "form": "īḷe" } ] },
                { "tokens": [ { "form": "puróhitaṁ" } ] },
                { "tokens": [ { "form": "yajñásya" }, { "form": "devám" }, { "form": "r̥tvíjam" } ] }
            ],
            "versions": [
                { "type": "version", "id": "version_sasaadhu", "form": ["अग्निमीळे पुरोहितं", "यज्ञस्य देवमृत्विजम्"] },
                { "type": "version", "id": "version_vannootenholland",
                  "form": ["agním īḷe puróhitaṁ"], "metricalData": ["LHLHLLHL"] },
                { "type": "version", "id": "version_lubotsky", "form": ["agním īḷe puróhitam", "yajñásya devám r̥tvíjam"] },
                { "type": "translation", "id": "translation_griffith", "form": ["I Laud Agni, the chosen Priest,", "God, minister of sacrifice,"] },
                { "type": "translation", "id": "translation_geldner", "form": "Agni preise ich" }
            ]
        })
    }

    #[test]
    fn test_full_document() {
        let verse = normalize(&coord(), &full_document());
        assert_eq!(verse.id, "0100101");
        assert_eq!(verse.sanskrit, "अग्निमीळे पुरोहितं\nयज्ञस्य देवमृत्विजम्");
        assert_eq!(
            verse.padapatha,
            "agním īḷe | puróhitaṁ | yajñásya devám r̥tvíjam"
        );
        assert_eq!(
            verse.transliteration,
            "agním īḷe puróhitam\nyajñásya devám r̥tvíjam"
        );
        assert_eq!(
            verse.translation,
            "I Laud Agni, the chosen Priest,\nGod, minister of sacrifice,"
        );
        assert_eq!(verse.hindi_translation, "Agni preise ich");
        assert_eq!(verse.deity, "Agni");
        assert_eq!(verse.meter, "Gāyatrī");
        assert_eq!(verse.metrical_data.as_deref(), Some("LHLHLLHL"));
    }

    #[test]
    fn test_no_versions_all_fallbacks() {
        let verse = normalize(&coord(), &json!({}));
        assert_eq!(verse.sanskrit, FALLBACK_SANSKRIT);
        assert_eq!(verse.padapatha, "");
        assert_eq!(verse.transliteration, FALLBACK_TRANSLITERATION);
        assert_eq!(verse.translation, FALLBACK_TRANSLATION);
        assert_eq!(verse.hindi_translation, FALLBACK_HINDI);
        assert_eq!(verse.deity, FALLBACK_METADATA);
        assert_eq!(verse.meter, FALLBACK_METADATA);
        assert_eq!(verse.group, FALLBACK_METADATA);
        assert_eq!(verse.metrical_data, None);
        assert_eq!(verse.mandala, 1);
    }

    #[test]
    fn test_malformed_fields_do_not_fail() {
        let doc = json!({
            "padas": "not an array",
            "versions": { "type": "version" },
            "hymnAddressee": 42
        });
        let verse = normalize(&coord(), &doc);
        assert_eq!(verse.padapatha, "");
        assert_eq!(verse.translation, FALLBACK_TRANSLATION);
        assert_eq!(verse.deity, FALLBACK_METADATA);

        let doc = json!({
            "padas": [ { "tokens": [ { "form": 7 }, { "lemma": "x" } ] }, { "tokens": [ { "form": "ca" } ] } ],
            "versions": [ null, 3, { "type": "translation", "id": "translation_griffith", "form": 12 } ]
        });
        let verse = normalize(&coord(), &doc);
        assert_eq!(verse.padapatha, "ca");
        assert_eq!(verse.translation, FALLBACK_TRANSLATION);
    }

    #[test]
    fn test_transliteration_falls_back_to_second_id() {
        let doc = json!({
            "versions": [
                { "type": "version", "id": "version_vannootenholland", "form": ["second choice"] }
            ]
        });
        assert_eq!(normalize(&coord(), &doc).transliteration, "second choice");
    }

    #[test]
    fn test_type_must_match_as_well_as_id() {
        let doc = json!({
            "versions": [
                { "type": "version", "id": "translation_griffith", "form": ["wrong type"] }
            ]
        });
        assert_eq!(normalize(&coord(), &doc).translation, FALLBACK_TRANSLATION);
    }

    #[test]
    fn test_first_match_wins_on_duplicates() {
        let doc = json!({
            "versions": [
                { "type": "translation", "id": "translation_griffith", "form": ["first"] },
                { "type": "translation", "id": "translation_griffith", "form": ["second"] }
            ]
        });
        assert_eq!(normalize(&coord(), &doc).translation, "first");
    }

    #[test]
    fn test_translation_lines_kept_verbatim() {
        let doc = json!({
            "versions": [
                { "type": "translation", "id": "translation_griffith",
                  "form": ["  I Laud Agni,", "", "the chosen Priest  "] }
            ]
        });
        assert_eq!(
            normalize(&coord(), &doc).translation,
            "  I Laud Agni,\n\nthe chosen Priest  "
        );
    }

    #[test]
    fn test_blank_form_falls_back() {
        let doc = json!({
            "versions": [
                { "type": "translation", "id": "translation_griffith", "form": ["  ", ""] }
            ]
        });
        assert_eq!(normalize(&coord(), &doc).translation, FALLBACK_TRANSLATION);
    }

    #[test]
    fn test_metrical_data_requires_field() {
        let doc = json!({
            "versions": [
                { "type": "version", "id": "version_vannootenholland", "form": ["x"] }
            ]
        });
        assert_eq!(normalize(&coord(), &doc).metrical_data, None);
    }

    #[test]
    fn test_normalization_is_deterministic() {
        let doc = full_document();
        let a = serde_json::to_vec(&normalize(&coord(), &doc)).unwrap();
        let b = serde_json::to_vec(&normalize(&coord(), &doc)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_metrical_data_omitted_from_json() {
        let json = serde_json::to_value(normalize(&coord(), &json!({}))).unwrap();
        assert!(json.get("metrical_data").is_none());
        assert!(json.get("hindi_translation").is_some());
    }
}
