use crate::app::ports::{EntityKind, EntityRecognizer, NamedEntity};
use once_cell::sync::Lazy;
use regex::Regex;

/// Rule-based local recognizer for road-relevant place mentions. Stands in
/// for a model-backed NER behind the `EntityRecognizer` port; matches are
/// reported in document order so "first match" is well defined for the
/// extraction policy.
///
/// Pattern families, roughly in descending specificity:
///   - interstate / US / state route designations (I-15, US-89, SR-201)
///   - Salt Lake grid street numbers (400 South, 4500 West)
///   - capitalized street names with a common suffix (Foothill Drive)
///   - a small gazetteer of metro-area municipalities and neighborhoods
pub struct RoadTermRecognizer;

static PATTERNS: Lazy<Vec<(Regex, EntityKind)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"\b(?:I-\d{1,3}|US-\d{1,3}|SR-\d{1,3}|[Hh]ighway \d{1,3})\b").unwrap(),
            EntityKind::Location,
        ),
        (
            Regex::new(r"\b\d{1,4}00 (?:North|South|East|West)\b").unwrap(),
            EntityKind::Location,
        ),
        (
            Regex::new(
                r"\b(?:[A-Z][a-z]+ )+(?:Street|St|Avenue|Ave|Boulevard|Blvd|Drive|Dr|Road|Rd|Lane|Ln|Parkway|Pkwy|Canyon|Highway)\b",
            )
            .unwrap(),
            EntityKind::Location,
        ),
        (
            Regex::new(
                r"\b(?:Salt Lake City|Salt Lake County|Utah County|Davis County|Sugar House|Rose Park|The Avenues|Downtown|West Valley City|West Jordan|South Jordan|Taylorsville|Millcreek|Holladay|Murray|Sandy|Draper|Lehi|Provo|Orem|Ogden|Bountiful|Park City|Tooele|Magna|Kearns|Herriman|Riverton|Cottonwood Heights)\b",
            )
            .unwrap(),
            EntityKind::Geopolitical,
        ),
    ]
});

impl EntityRecognizer for RoadTermRecognizer {
    fn entities(&self, text: &str) -> Vec<NamedEntity> {
        let mut found: Vec<(usize, NamedEntity)> = Vec::new();
        for (pattern, kind) in PATTERNS.iter() {
            for m in pattern.find_iter(text) {
                found.push((
                    m.start(),
                    NamedEntity {
                        text: m.as_str().to_string(),
                        kind: *kind,
                    },
                ));
            }
        }
        found.sort_by_key(|(start, _)| *start);
        found.dedup_by_key(|(start, _)| *start);
        found.into_iter().map(|(_, e)| e).collect()
    }
}
