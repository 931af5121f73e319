//! Comparison tokens and alias resolution for university names.
//!
//! Matching is heuristic: after normalization two names are the same
//! institution when one token contains the other. That tolerates suffixes such
//! as "(UET)" that the data sources append inconsistently, but it also treats
//! two distinct universities as one when one name is nested inside the other.

use crate::models::University;

/// Lower-cases `name` and keeps only `[a-z0-9]`. Never displayed.
pub fn normalize(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Canonical name of the first university whose name or alias normalizes to
/// the same token as `name`.
pub fn resolve_alias<'a>(name: &str, catalog: &'a [University]) -> Option<&'a str> {
    let token = normalize(name);
    if token.is_empty() {
        return None;
    }

    catalog
        .iter()
        .find(|university| {
            std::iter::once(&university.name)
                .chain(university.aliases.iter())
                .any(|candidate| normalize(candidate) == token)
        })
        .map(|university| university.name.as_str())
}

pub fn same_university(a: Option<&str>, b: Option<&str>, catalog: &[University]) -> bool {
    let (Some(a), Some(b)) = (a, b) else {
        return false;
    };
    if a.trim().is_empty() || b.trim().is_empty() {
        return false;
    }

    if tokens_match(&normalize(a), &normalize(b)) {
        return true;
    }

    let resolved_a = resolve_alias(a, catalog);
    let resolved_b = resolve_alias(b, catalog);
    if resolved_a.is_none() && resolved_b.is_none() {
        return false;
    }

    let canonical_a = resolved_a.unwrap_or(a);
    let canonical_b = resolved_b.unwrap_or(b);
    tokens_match(&normalize(canonical_a), &normalize(canonical_b))
}

fn tokens_match(a: &str, b: &str) -> bool {
    // punctuation-only names normalize to nothing and would contain-match anything
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a == b || a.contains(b) || b.contains(a)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<University> {
        vec![
            University {
                id: "u-1".to_string(),
                name: "Polytechnic University of Tirana".to_string(),
                aliases: vec!["UPT".to_string(), "Politeknik".to_string()],
                rating: 4.1,
                departments: Vec::new(),
            },
            University {
                id: "u-2".to_string(),
                name: "EPOKA University".to_string(),
                aliases: Vec::new(),
                rating: 4.4,
                departments: Vec::new(),
            },
        ]
    }

    #[test]
    fn normalize_strips_case_and_punctuation() {
        assert_eq!(normalize("University of Tirana!!"), "universityoftirana");
        assert_eq!(normalize("  U.E.T. (2024) "), "uet2024");
        assert_eq!(normalize("Università"), "universit");
    }

    #[test]
    fn equal_tokens_match() {
        assert!(same_university(
            Some("University of Tirana"),
            Some("university of tirana!!"),
            &[]
        ));
    }

    #[test]
    fn containment_matches_either_direction() {
        assert!(same_university(Some("EPOKA"), Some("EPOKA University"), &[]));
        assert!(same_university(Some("EPOKA University (EU)"), Some("epoka"), &[]));
    }

    #[test]
    fn empty_or_missing_names_never_match() {
        assert!(!same_university(Some(""), Some("EPOKA"), &[]));
        assert!(!same_university(None, Some("EPOKA"), &[]));
        assert!(!same_university(Some("EPOKA"), Some("   "), &[]));
        assert!(!same_university(Some("!!!"), Some("EPOKA"), &[]));
    }

    #[test]
    fn aliases_resolve_to_canonical_name() {
        let catalog = catalog();
        assert_eq!(resolve_alias("upt", &catalog), Some("Polytechnic University of Tirana"));
        assert!(same_university(
            Some("UPT"),
            Some("Polytechnic University of Tirana"),
            &catalog
        ));
        assert!(same_university(Some("Politeknik"), Some("U.P.T."), &catalog));
    }

    #[test]
    fn unrelated_names_do_not_match() {
        let catalog = catalog();
        assert!(!same_university(Some("UPT"), Some("EPOKA University"), &catalog));
        assert!(!same_university(Some("Harvard"), Some("Yale"), &catalog));
    }

    #[test]
    fn nested_names_are_treated_as_one_institution() {
        // known imprecision of containment matching
        assert!(same_university(
            Some("University of Tirana"),
            Some("Polytechnic University of Tirana"),
            &[]
        ));
    }
}
