use crate::models::{Professor, ProfessorListing, Review, TargetType, University};

/// Catalog entity that accumulates review scores on top of a baseline.
pub trait Rated {
    fn target_type(&self) -> TargetType;
    fn target_id(&self) -> &str;
    fn baseline_rating(&self) -> f64;
}

impl Rated for University {
    fn target_type(&self) -> TargetType {
        TargetType::University
    }

    fn target_id(&self) -> &str {
        &self.id
    }

    fn baseline_rating(&self) -> f64 {
        self.rating
    }
}

impl Rated for Professor {
    fn target_type(&self) -> TargetType {
        TargetType::Professor
    }

    fn target_id(&self) -> &str {
        &self.id
    }

    fn baseline_rating(&self) -> f64 {
        self.rating
    }
}

impl Rated for ProfessorListing {
    fn target_type(&self) -> TargetType {
        TargetType::Professor
    }

    fn target_id(&self) -> &str {
        &self.id
    }

    fn baseline_rating(&self) -> f64 {
        self.rating
    }
}

/// Rating shown on the dashboard.
///
/// The baseline counts as one extra vote, so it never disappears but its
/// weight dilutes as reviews accumulate. With no matching reviews the
/// baseline is returned untouched.
pub fn display_rating<E: Rated + ?Sized>(entity: &E, reviews: &[Review]) -> f64 {
    let (total, count) = matching_reviews(entity, reviews).fold((0.0, 0usize), |acc, review| {
        (acc.0 + review.score.unwrap_or(0.0), acc.1 + 1)
    });

    if count == 0 {
        return entity.baseline_rating();
    }

    round2((entity.baseline_rating() + total) / (1 + count) as f64)
}

pub fn review_count<E: Rated + ?Sized>(entity: &E, reviews: &[Review]) -> usize {
    matching_reviews(entity, reviews).count()
}

/// Two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn matching_reviews<'a, E: Rated + ?Sized>(
    entity: &'a E,
    reviews: &'a [Review],
) -> impl Iterator<Item = &'a Review> + 'a {
    reviews
        .iter()
        .filter(move |review| review.targets(entity.target_type(), entity.target_id()))
}
