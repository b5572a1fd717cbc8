//! Fuzzy matching of a requested tenant against the stores on disk

use crate::config::MatchThresholds;

use super::name::TenantName;

/// Outcome of matching one requested name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchDecision {
    /// The canonical name exists as is
    Exact(TenantName),
    /// Close enough to open without asking
    Accept { name: TenantName, score: u8 },
    /// Plausible, but the user must confirm
    Confirm { name: TenantName, score: u8 },
    /// Nothing acceptable; `best` is the closest store if any exist
    NoMatch { best: Option<(TenantName, u8)> },
}

/// Similarity of two tenant names from 0 (unrelated) to 100 (identical)
///
/// Compares the lowercased names without suffix by normalized edit distance.
pub fn similarity(a: &TenantName, b: &TenantName) -> u8 {
    let a = a.stem().to_lowercase();
    let b = b.stem().to_lowercase();
    let ratio = strsim::normalized_levenshtein(&a, &b);
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Decide which store, if any, `requested` refers to
///
/// `located` is expected in enumeration order; among equal scores the first
/// one wins.
pub fn decide(
    requested: &TenantName,
    located: &[TenantName],
    thresholds: &MatchThresholds,
) -> MatchDecision {
    if located.is_empty() {
        return MatchDecision::NoMatch { best: None };
    }

    if located.contains(requested) {
        return MatchDecision::Exact(requested.clone());
    }

    let mut best: Option<(&TenantName, u8)> = None;
    for candidate in located {
        let score = similarity(requested, candidate);
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((candidate, score));
        }
    }

    let Some((name, score)) = best else {
        return MatchDecision::NoMatch { best: None };
    };
    let name = name.clone();

    tracing::debug!(requested = %requested, best = %name, score, "scored tenant candidates");

    if score >= thresholds.high {
        MatchDecision::Accept { name, score }
    } else if score >= thresholds.low {
        MatchDecision::Confirm { name, score }
    } else {
        MatchDecision::NoMatch {
            best: Some((name, score)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tenant::normalize;

    fn names(raw: &[&str]) -> Vec<TenantName> {
        raw.iter().map(|n| normalize(n).unwrap()).collect()
    }

    #[test]
    fn test_similarity_range() {
        let a = normalize("Acme Corp").unwrap();
        assert_eq!(similarity(&a, &a), 100);
        assert_eq!(similarity(&a, &normalize("acme corp").unwrap()), 100);
        assert!(similarity(&a, &normalize("Zzzz").unwrap()) < 20);
    }

    #[test]
    fn test_empty_set_short_circuits() {
        let decision = decide(&normalize("Acme").unwrap(), &[], &MatchThresholds::default());
        assert_eq!(decision, MatchDecision::NoMatch { best: None });
    }

    #[test]
    fn test_exact_match() {
        let located = names(&["Acme Corp", "Globex"]);
        let decision = decide(
            &normalize("Acme   Corp").unwrap(),
            &located,
            &MatchThresholds::default(),
        );
        assert_eq!(decision, MatchDecision::Exact(normalize("Acme Corp").unwrap()));
    }

    #[test]
    fn test_typo_auto_accepted() {
        // one edit in nine characters scores 89
        let located = names(&["Acme Corp", "Globex"]);
        let decision = decide(
            &normalize("Acme Corb").unwrap(),
            &located,
            &MatchThresholds::default(),
        );
        assert!(matches!(
            decision,
            MatchDecision::Accept { ref name, score } if name.as_str() == "Acme_Corp.db" && score >= 80
        ));
    }

    #[test]
    fn test_threshold_boundaries() {
        let located = names(&["abcdefghij"]);
        let thresholds = MatchThresholds { high: 80, low: 50 };

        // two edits in ten characters: exactly 80
        let at_high = decide(&normalize("abcdefghXY").unwrap(), &located, &thresholds);
        assert!(matches!(at_high, MatchDecision::Accept { score: 80, .. }));

        // three edits: 70, must be confirmed
        let between = decide(&normalize("abcdefgXYZ").unwrap(), &located, &thresholds);
        assert!(matches!(between, MatchDecision::Confirm { score: 70, .. }));

        // five edits: exactly 50, still confirmable
        let at_low = decide(&normalize("abcdeVWXYZ").unwrap(), &located, &thresholds);
        assert!(matches!(at_low, MatchDecision::Confirm { score: 50, .. }));

        // six edits: 40, no match but the best candidate is reported
        let below = decide(&normalize("abcdUVWXYZ").unwrap(), &located, &thresholds);
        assert!(matches!(
            below,
            MatchDecision::NoMatch { best: Some((_, 40)) }
        ));
    }

    #[test]
    fn test_ties_resolve_to_first() {
        let located = names(&["abcx", "abcy"]);
        let decision = decide(
            &normalize("abcz").unwrap(),
            &located,
            &MatchThresholds { high: 100, low: 0 },
        );
        assert!(matches!(
            decision,
            MatchDecision::Confirm { ref name, score: 75 } if name.as_str() == "abcx.db"
        ));
    }
}
