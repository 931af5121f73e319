use crate::models::{ProfessorListing, ProgramListing, University, WILDCARD_TAG};
use crate::names::same_university;

/// University filter value that disables the affiliation check.
pub const ANY_UNIVERSITY: &str = "Any";

/// Comma-separated course fragments, trimmed and lower-cased; blanks dropped.
pub fn query_terms(course_query: &str) -> Vec<String> {
    course_query
        .split(',')
        .map(|term| term.trim().to_lowercase())
        .filter(|term| !term.is_empty())
        .collect()
}

/// Professors teaching a course that contains any query term, in input order.
/// An empty query matches nobody.
pub fn find_matches(
    course_query: &str,
    university_filter: &str,
    professors: &[ProfessorListing],
    catalog: &[University],
) -> Vec<ProfessorListing> {
    let terms = query_terms(course_query);
    if terms.is_empty() {
        return Vec::new();
    }

    professors
        .iter()
        .filter(|professor| {
            university_filter == ANY_UNIVERSITY
                || same_university(
                    Some(professor.university_name.as_str()),
                    Some(university_filter),
                    catalog,
                )
        })
        .filter(|professor| {
            professor.courses.iter().any(|course| {
                let course = course.to_lowercase();
                terms.iter().any(|term| course.contains(term.as_str()))
            })
        })
        .cloned()
        .collect()
}

/// Programs carrying `tag`. `"All"` and a blank tag match every program.
pub fn programs_with_tag(tag: &str, programs: &[ProgramListing]) -> Vec<ProgramListing> {
    let tag = tag.trim();
    let tag = if tag.is_empty() { WILDCARD_TAG } else { tag };

    programs
        .iter()
        .filter(|program| program.has_tag(tag))
        .cloned()
        .collect()
}
