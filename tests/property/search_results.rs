//! Search results over random corpora.

use std::collections::HashSet;

use super::common::titles_collection;
use super::corpus_strategy;
use ferret::SearchParams;
use proptest::prelude::*;

const QUERIES: &[&str] = &["apple", "aple", "band", "charger", "wireles", "mouse", "fox", "house box"];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Hits are unique, ordered by score and bounded by the collection.
    #[test]
    fn prop_results_well_formed(corpus in corpus_strategy(), q in prop::sample::select(QUERIES)) {
        let borrowed: Vec<(&str, i64)> = corpus.iter().map(|(t, p)| (t.as_str(), *p)).collect();
        let coll = titles_collection(&borrowed);

        let result = coll.search(&SearchParams::new(q, &["title"]).page(1, 250)).unwrap();
        prop_assert!(result.found <= result.out_of);
        prop_assert_eq!(result.out_of, corpus.len());
        prop_assert_eq!(result.hits.len(), result.found);

        let ids: HashSet<&str> = result.hits.iter().map(|h| h.id()).collect();
        prop_assert_eq!(ids.len(), result.hits.len());
        for pair in result.hits.windows(2) {
            prop_assert!(pair[0].text_match >= pair[1].text_match);
        }
    }

    /// A document holding the query word verbatim is always found.
    #[test]
    fn prop_exact_word_is_found(corpus in corpus_strategy(), pick in any::<prop::sample::Index>()) {
        let borrowed: Vec<(&str, i64)> = corpus.iter().map(|(t, p)| (t.as_str(), *p)).collect();
        let coll = titles_collection(&borrowed);

        let doc = pick.index(corpus.len());
        let word = corpus[doc].0.split(' ').next().unwrap_or_default().to_string();
        let result = coll.search(&SearchParams::new(word.as_str(), &["title"]).page(1, 250)).unwrap();
        let expected = doc.to_string();
        prop_assert!(result.ids().contains(&expected.as_str()), "{:?} missed doc {}", word, doc);
    }

    /// The wildcard query returns everything, best tie-break first.
    #[test]
    fn prop_wildcard_returns_all(corpus in corpus_strategy()) {
        let borrowed: Vec<(&str, i64)> = corpus.iter().map(|(t, p)| (t.as_str(), *p)).collect();
        let coll = titles_collection(&borrowed);

        let result = coll.search(&SearchParams::new("*", &[]).page(1, 250)).unwrap();
        prop_assert_eq!(result.found, corpus.len());
        let points: Vec<i64> = result
            .hits
            .iter()
            .map(|h| h.document["points"].as_i64().unwrap_or_default())
            .collect();
        for pair in points.windows(2) {
            prop_assert!(pair[0] >= pair[1]);
        }
    }
}
