//! Nearest-key suggestions for missing fragments

/// Edit distance between two strings, by chars
pub(crate) fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    if b.is_empty() {
        return a.chars().count();
    }

    // two rows: distances from a[..i] to every prefix of b
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Best `limit` candidates for `key`, by edit distance then key
pub(crate) fn rank<I>(key: &str, candidates: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut scored: Vec<(usize, String)> = candidates
        .into_iter()
        .filter(|c| c != key)
        .map(|c| (levenshtein(key, &c), c))
        .collect();
    scored.sort();
    scored.dedup();
    scored.into_iter().take(limit).map(|(_, c)| c).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn distances() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("form", ""), 4);
        assert_eq!(levenshtein("", "form"), 4);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("table", "tables"), 1);
    }

    #[test]
    fn rank_orders_by_distance_then_name() {
        let got = rank(
            "tabel",
            ["table", "label", "tablet", "chart"].map(String::from),
            3,
        );
        assert_eq!(got, vec!["label", "table", "tablet"]);
    }

    proptest! {
        #[test]
        fn prop_symmetric(a in "[a-z]{0,8}", b in "[a-z]{0,8}") {
            prop_assert_eq!(levenshtein(&a, &b), levenshtein(&b, &a));
        }

        #[test]
        fn prop_bounded_by_longer(a in "[a-z]{0,8}", b in "[a-z]{0,8}") {
            let d = levenshtein(&a, &b);
            prop_assert!(d <= a.len().max(b.len()));
            prop_assert_eq!(d == 0, a == b);
        }
    }
}
