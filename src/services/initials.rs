//! Initials generation
//!
//! Derives a person's login handle from their first and last name. The
//! shortest free derivation wins: "Peter Pan" gets `pp`, or `pep` when `pp`
//! is taken. Once the names run out of letters a numeric suffix is appended.

use std::collections::HashSet;

use crate::error::{BookkeeperError, BookkeeperResult};
use crate::models::{Initials, PersonName};

/// Length of the first candidate
pub const MIN_INITIALS_LEN: usize = 2;

/// Generates initials that are unique among a fixed set of taken ones
#[derive(Debug, Default)]
pub struct InitialsGenerator {
    taken: HashSet<String>,
}

impl InitialsGenerator {
    pub fn new<I, S>(taken: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            taken: taken.into_iter().map(Into::into).collect(),
        }
    }

    fn is_free(&self, candidate: &str) -> bool {
        !self.taken.contains(candidate)
    }

    /// Generate free initials for `name`
    ///
    /// Middle names are not used. Tries lengths 2, 3, ... while the names
    /// still provide enough letters, then falls back to the longest
    /// derivation followed by 2, 3, ...
    pub fn generate(&self, name: &PersonName) -> BookkeeperResult<Initials> {
        let first = letters(&name.first_name);
        let last = letters(&name.last_name);

        let mut longest = String::new();
        for len in MIN_INITIALS_LEN..=first.len() + last.len() {
            let candidate = derive_candidate(&first, &last, len);
            if candidate.chars().count() < len {
                break;
            }
            if self.is_free(&candidate) {
                return to_initials(&candidate);
            }
            longest = candidate;
        }

        if longest.is_empty() {
            longest = derive_candidate(&first, &last, MIN_INITIALS_LEN);
        }
        if longest.is_empty() {
            return Err(BookkeeperError::Validation(format!(
                "Cannot derive initials from '{}'",
                name
            )));
        }

        // At most taken.len() suffixes can collide
        for suffix in 2..=self.taken.len() + 2 {
            let candidate = format!("{}{}", longest, suffix);
            if self.is_free(&candidate) {
                tracing::debug!(initials = %candidate, "names exhausted, using numeric suffix");
                return to_initials(&candidate);
            }
        }

        Err(BookkeeperError::Storage(
            "No free initials left for this name".into(),
        ))
    }
}

/// Candidate of length `len`: ceil(len/2) letters of the first name and
/// floor(len/2) of the last name
///
/// Shorter than `len` when a name has too few letters.
pub fn derive_candidate(first: &[char], last: &[char], len: usize) -> String {
    let from_first = (len + 1) / 2;
    let from_last = len / 2;

    first
        .iter()
        .take(from_first)
        .chain(last.iter().take(from_last))
        .collect()
}

/// Alphanumeric characters of the lowercased name
///
/// Filtered after lowercasing: some capitals lowercase to a letter plus a
/// combining mark, e.g. 'İ' becomes "i\u{307}".
fn letters(name: &str) -> Vec<char> {
    name.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric())
        .collect()
}

fn to_initials(candidate: &str) -> BookkeeperResult<Initials> {
    Initials::parse(candidate).map_err(|e| BookkeeperError::Validation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(first: &str, last: &str) -> PersonName {
        PersonName::new(first, None, last).unwrap()
    }

    fn generate(taken: &[&str], first: &str, last: &str) -> String {
        InitialsGenerator::new(taken.iter().copied())
            .generate(&name(first, last))
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_first_candidate() {
        assert_eq!(generate(&[], "Peter", "Pan"), "pp");
        assert_eq!(generate(&[], "Jon", "Outsh"), "jo");
    }

    #[test]
    fn test_collision_grows_length() {
        assert_eq!(generate(&["pp"], "Peter", "Pan"), "pep");
        assert_eq!(generate(&["pp", "pep"], "Peter", "Pan"), "pepa");
        assert_eq!(generate(&["pp", "pep", "pepa"], "Peter", "Pan"), "petpa");
    }

    #[test]
    fn test_derive_candidate_split() {
        let first: Vec<char> = "peter".chars().collect();
        let last: Vec<char> = "pan".chars().collect();
        assert_eq!(derive_candidate(&first, &last, 2), "pp");
        assert_eq!(derive_candidate(&first, &last, 3), "pep");
        assert_eq!(derive_candidate(&first, &last, 4), "pepa");
        assert_eq!(derive_candidate(&first, &last, 5), "petpa");
    }

    #[test]
    fn test_exhausted_names_use_suffix() {
        // "al"/"bo": ab, alb, albo; length 5 would need a third letter
        assert_eq!(generate(&["ab", "alb", "albo"], "Al", "Bo"), "albo2");
        assert_eq!(
            generate(&["ab", "alb", "albo", "albo2"], "Al", "Bo"),
            "albo3"
        );
    }

    #[test]
    fn test_single_letter_names() {
        assert_eq!(generate(&[], "A", "B"), "ab");
        assert_eq!(generate(&["ab"], "A", "B"), "ab2");
    }

    #[test]
    fn test_ignores_punctuation_and_case() {
        assert_eq!(generate(&[], "O'Neil", "McDonald"), "om");
        assert_eq!(generate(&["om"], "O'Neil", "McDonald"), "onm");
        assert_eq!(generate(&[], "Ümit", "Öztürk"), "üö");
    }

    #[test]
    fn test_dotted_capital_i() {
        assert_eq!(generate(&[], "İlker", "Yılmaz"), "iy");
        assert_eq!(generate(&["iy"], "İlker", "Yılmaz"), "ily");
        assert_eq!(generate(&["iy", "ily", "ilyı"], "İlker", "Yılmaz"), "ilkyı");
    }

    #[test]
    fn test_sequence_stays_unique() {
        let names = [
            ("Peter", "Pan"),
            ("Paul", "Panther"),
            ("Pia", "Pe"),
            ("P", "P"),
            ("Pe", "Pa"),
            ("Peter", "Pan"),
            ("Jon", "Outsh"),
            ("Jo", "Ol"),
        ];

        let mut assigned: Vec<String> = Vec::new();
        for (first, last) in names {
            let initials = InitialsGenerator::new(assigned.iter().cloned())
                .generate(&name(first, last))
                .unwrap()
                .to_string();
            assert!(!assigned.contains(&initials), "{} assigned twice", initials);
            assigned.push(initials);
        }

        assert_eq!(assigned.len(), names.len());
    }
}
