//! Static reference data: well-known sample verses and hymn counts per book.

use serde::Serialize;

/// A curated starting point offered to readers.
#[derive(Debug, Clone, Serialize)]
pub struct SampleVerse {
    pub mandala: u8,
    pub sukta: u16,
    pub rik: u8,
    pub title: &'static str,
    pub deity: &'static str,
}

pub const SAMPLE_VERSES: &[SampleVerse] = &[
    SampleVerse {
        mandala: 1,
        sukta: 1,
        rik: 1,
        title: "Opening hymn to Agni",
        deity: "Agni",
    },
    SampleVerse {
        mandala: 1,
        sukta: 164,
        rik: 46,
        title: "Truth is one, the wise call it by many names",
        deity: "Vishvedevas",
    },
    SampleVerse {
        mandala: 3,
        sukta: 62,
        rik: 10,
        title: "Gayatri Mantra",
        deity: "Savitr",
    },
    SampleVerse {
        mandala: 7,
        sukta: 59,
        rik: 12,
        title: "Mahamrityunjaya Mantra",
        deity: "Rudra",
    },
    SampleVerse {
        mandala: 10,
        sukta: 90,
        rik: 1,
        title: "Purusha Sukta",
        deity: "Purusha",
    },
    SampleVerse {
        mandala: 10,
        sukta: 129,
        rik: 1,
        title: "Nasadiya Sukta (Hymn of Creation)",
        deity: "Bhavavrttam",
    },
];

/// Hymn count of each book, indexed by `mandala - 1`.
pub const HYMNS_PER_MANDALA: [u16; 10] = [191, 43, 62, 58, 87, 75, 104, 103, 114, 191];

#[derive(Debug, Clone, Serialize)]
pub struct MandalaInfo {
    pub mandala: u8,
    pub hymns: u16,
}

pub fn mandalas() -> Vec<MandalaInfo> {
    HYMNS_PER_MANDALA
        .iter()
        .enumerate()
        .map(|(i, &hymns)| MandalaInfo {
            mandala: i as u8 + 1,
            hymns,
        })
        .collect()
}

/// Hymn count of `mandala`, or `None` outside 1–10.
pub fn hymn_count(mandala: u8) -> Option<u16> {
    HYMNS_PER_MANDALA
        .get((mandala as usize).checked_sub(1)?)
        .copied()
}

/// Human-readable hint attached to not-found responses.
pub fn not_found_suggestion(mandala: u8) -> String {
    match hymn_count(mandala) {
        Some(n) => format!(
            "Mandala {} has {} hymns. Try a known verse such as 1.1.1 or 10.129.1.",
            mandala, n
        ),
        None => "Try a known verse such as 1.1.1 or 10.129.1.".to_string(),
    }
}

/// CLI entry point for `rv samples`.
pub fn run_samples() {
    println!("{:<10} {:<12} TITLE", "VERSE", "DEITY");
    for s in SAMPLE_VERSES {
        let coord = format!("{}.{}.{}", s.mandala, s.sukta, s.rik);
        println!("{:<10} {:<12} {}", coord, s.deity, s.title);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VerseCoordinate;

    #[test]
    fn test_samples_are_valid_coordinates() {
        for s in SAMPLE_VERSES {
            let c = VerseCoordinate::new(s.mandala as i64, s.sukta as i64, s.rik as i64).unwrap();
            assert!(s.sukta <= hymn_count(c.mandala()).unwrap());
        }
    }

    #[test]
    fn test_hymn_count_bounds() {
        assert_eq!(hymn_count(0), None);
        assert_eq!(hymn_count(1), Some(191));
        assert_eq!(hymn_count(10), Some(191));
        assert_eq!(hymn_count(11), None);
        assert_eq!(mandalas().iter().map(|m| m.hymns as u32).sum::<u32>(), 1028);
    }

    #[test]
    fn test_suggestion_mentions_count() {
        assert!(not_found_suggestion(2).contains("43 hymns"));
        assert!(not_found_suggestion(0).contains("1.1.1"));
    }
}
