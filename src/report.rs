use std::fmt::Write;

use crate::catalog::flatten_professors;
use crate::models::{Review, University};
use crate::rating::{display_rating, review_count};

#[derive(Debug, Clone)]
pub struct RankedEntity {
    pub name: String,
    pub detail: String,
    pub rating: f64,
    pub review_count: usize,
}

pub fn rank_universities(catalog: &[University], reviews: &[Review]) -> Vec<RankedEntity> {
    let mut ranked: Vec<RankedEntity> = catalog
        .iter()
        .map(|university| RankedEntity {
            name: university.name.clone(),
            detail: format!("{} departments", university.departments.len()),
            rating: display_rating(university, reviews),
            review_count: review_count(university, reviews),
        })
        .collect();

    // stable: ties keep catalog order
    ranked.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(std::cmp::Ordering::Equal));
    ranked
}

pub fn rank_professors(catalog: &[University], reviews: &[Review]) -> Vec<RankedEntity> {
    let mut ranked: Vec<RankedEntity> = flatten_professors(catalog)
        .iter()
        .map(|professor| RankedEntity {
            name: professor.full_name(),
            detail: format!("{}, {}", professor.department_name, professor.university_name),
            rating: display_rating(professor, reviews),
            review_count: review_count(professor, reviews),
        })
        .collect();

    ranked.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(std::cmp::Ordering::Equal));
    ranked
}

pub fn build_report(catalog: &[University], reviews: &[Review]) -> String {
    let universities = rank_universities(catalog, reviews);
    let professors = rank_professors(catalog, reviews);

    let mut output = String::new();

    let _ = writeln!(output, "# Campus Review Dashboard");
    let _ = writeln!(
        output,
        "Generated from {} reviews across {} universities",
        reviews.len(),
        catalog.len()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Universities");

    if universities.is_empty() {
        let _ = writeln!(output, "No universities in the catalog.");
    } else {
        for entry in universities.iter() {
            let _ = writeln!(
                output,
                "- {} ({}) rated {:.2} from {} reviews",
                entry.name, entry.detail, entry.rating, entry.review_count
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Top Professors");

    if professors.is_empty() {
        let _ = writeln!(output, "No professors in the catalog.");
    } else {
        for entry in professors.iter().take(10) {
            let _ = writeln!(
                output,
                "- {} ({}) rated {:.2} from {} reviews",
                entry.name, entry.detail, entry.rating, entry.review_count
            );
        }
    }

    let mut recent: Vec<&Review> = reviews
        .iter()
        .filter(|review| review.comment.is_some())
        .collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date));
    let _ = writeln!(output);
    let _ = writeln!(output, "## Recent Comments");

    if recent.is_empty() {
        let _ = writeln!(output, "No comments yet.");
    } else {
        for review in recent.iter().take(5) {
            let _ = writeln!(
                output,
                "- {} {} on {}: {}",
                review.target_type.as_str(),
                review.target_id,
                review.date.date_naive(),
                review.comment.as_deref().unwrap_or_default()
            );
        }
    }

    output
}
