use crate::domain::evidence::entities::{EvidenceStore, MatchedEvidence};

/// Returns every record whose case-folded name is a substring of the
/// case-folded `text`.
///
/// Plain containment, no tokenization: partial-word hits are accepted.
pub fn lookup(store: &EvidenceStore, text: &str) -> MatchedEvidence {
    let folded = text.to_lowercase();

    store
        .records()
        .iter()
        .filter(|record| folded.contains(&record.name.to_lowercase()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::evidence::entities::IngredientRecord;

    fn store() -> EvidenceStore {
        EvidenceStore::new(vec![
            IngredientRecord::new("maltodextrin", "commonly used thickener, limited standalone risk"),
            IngredientRecord::new("soy", "common allergen"),
            IngredientRecord::new("sugar", "added sugar, limit intake"),
            IngredientRecord::new("soy", "source of plant protein"),
        ])
    }

    fn names(matched: &MatchedEvidence) -> Vec<&str> {
        matched.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_lookup_is_deterministic() {
        let store = store();
        let text = "Soybean oil, sugar, maltodextrin";
        let first = lookup(&store, text);

        for _ in 0..5 {
            assert_eq!(lookup(&store, text), first);
        }
    }

    #[test]
    fn test_lookup_ignores_case() {
        let store = store();
        let text = "Whole Wheat Flour, Sugar, MaltoDextrin";

        let mixed = lookup(&store, text);
        assert_eq!(mixed, lookup(&store, &text.to_uppercase()));
        assert_eq!(mixed, lookup(&store, &text.to_lowercase()));
        assert_eq!(names(&mixed), vec!["maltodextrin", "sugar"]);
    }

    #[test]
    fn test_lookup_preserves_store_order_and_duplicates() {
        let matched = lookup(&store(), "sugar, soy lecithin, maltodextrin");

        assert_eq!(names(&matched), vec!["maltodextrin", "soy", "sugar", "soy"]);
        assert_eq!(matched[1].consensus, "common allergen");
        assert_eq!(matched[3].consensus, "source of plant protein");
    }

    #[test]
    fn test_lookup_accepts_partial_word_matches() {
        let matched = lookup(&store(), "soybean oil");

        assert_eq!(names(&matched), vec!["soy", "soy"]);
    }

    #[test]
    fn test_lookup_follows_containment_law() {
        let store = store();
        let text = "Corn syrup, SUGAR, salt";
        let folded = text.to_lowercase();
        let matched = lookup(&store, text);

        for record in store.records() {
            let contained = folded.contains(&record.name.to_lowercase());
            assert_eq!(matched.contains(record), contained, "record {}", record.name);
        }
    }

    #[test]
    fn test_lookup_folds_record_names() {
        let store = EvidenceStore::new(vec![IngredientRecord::new("Palm Oil", "saturated fat")]);

        assert_eq!(lookup(&store, "refined palm oil").len(), 1);
    }

    #[test]
    fn test_lookup_on_empty_store_matches_nothing() {
        let store = EvidenceStore::default();

        assert!(lookup(&store, "sugar, salt").is_empty());
        assert!(lookup(&store, "").is_empty());
    }

    #[test]
    fn test_lookup_on_empty_text_matches_nothing() {
        assert!(lookup(&store(), "").is_empty());
    }

    #[test]
    fn test_lookup_does_not_normalize_punctuation() {
        let store = EvidenceStore::new(vec![IngredientRecord::new("vitamin b12", "essential nutrient")]);

        assert!(lookup(&store, "Vitamin B-12").is_empty());
        assert_eq!(lookup(&store, "Vitamin B12").len(), 1);
    }
}
