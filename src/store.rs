use std::sync::Mutex;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::catalog::{find_professor, find_university, flatten_professors};
use crate::eligibility::{can_modify_review, can_user_review_target, has_reviewed};
use crate::error::{DeskError, StoreError};
use crate::matching::find_matches;
use crate::models::{CurrentUser, ProfessorListing, Review, ReviewTarget, TargetType, University};
use crate::rating::display_rating;

/// Storage abstraction so the desk can run against Postgres snapshots or memory.
pub trait ReviewStore: Send + Sync {
    fn reviews(&self) -> Result<Vec<Review>, StoreError>;
    fn insert(&self, review: Review) -> Result<Review, StoreError>;
    fn update(&self, review: Review) -> Result<(), StoreError>;
    fn remove(&self, id: Uuid) -> Result<Review, StoreError>;
}

pub trait CatalogStore: Send + Sync {
    fn universities(&self) -> Result<Vec<University>, StoreError>;
}

#[derive(Debug, Default)]
pub struct InMemoryReviewStore {
    reviews: Mutex<Vec<Review>>,
}

impl InMemoryReviewStore {
    pub fn new(reviews: Vec<Review>) -> Self {
        Self {
            reviews: Mutex::new(reviews),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Review>>, StoreError> {
        self.reviews
            .lock()
            .map_err(|_| StoreError::Unavailable("review store mutex poisoned".to_string()))
    }
}

impl ReviewStore for InMemoryReviewStore {
    fn reviews(&self) -> Result<Vec<Review>, StoreError> {
        Ok(self.lock()?.clone())
    }

    fn insert(&self, review: Review) -> Result<Review, StoreError> {
        let mut reviews = self.lock()?;
        if reviews.iter().any(|existing| existing.id == review.id) {
            return Err(StoreError::Conflict(review.id));
        }
        reviews.push(review.clone());
        Ok(review)
    }

    fn update(&self, review: Review) -> Result<(), StoreError> {
        let mut reviews = self.lock()?;
        let slot = reviews
            .iter_mut()
            .find(|existing| existing.id == review.id)
            .ok_or(StoreError::NotFound(review.id))?;
        *slot = review;
        Ok(())
    }

    fn remove(&self, id: Uuid) -> Result<Review, StoreError> {
        let mut reviews = self.lock()?;
        let index = reviews
            .iter()
            .position(|existing| existing.id == id)
            .ok_or(StoreError::NotFound(id))?;
        Ok(reviews.remove(index))
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    universities: Vec<University>,
}

impl StaticCatalog {
    pub fn new(universities: Vec<University>) -> Self {
        Self { universities }
    }
}

impl CatalogStore for StaticCatalog {
    fn universities(&self) -> Result<Vec<University>, StoreError> {
        Ok(self.universities.clone())
    }
}

/// Review workflow over injected stores. Every call takes fresh snapshots.
pub struct ReviewDesk<R, C> {
    reviews: R,
    catalog: C,
}

impl<R: ReviewStore, C: CatalogStore> ReviewDesk<R, C> {
    pub fn new(reviews: R, catalog: C) -> Self {
        Self { reviews, catalog }
    }

    pub fn review_store(&self) -> &R {
        &self.reviews
    }

    pub fn university_rating(&self, id: &str) -> Result<f64, DeskError> {
        let catalog = self.catalog.universities()?;
        let university = find_university(&catalog, id).ok_or_else(|| DeskError::UnknownTarget {
            target_type: TargetType::University,
            id: id.to_string(),
        })?;
        Ok(display_rating(university, &self.reviews.reviews()?))
    }

    pub fn professor_rating(&self, id: &str) -> Result<f64, DeskError> {
        let catalog = self.catalog.universities()?;
        let professor = find_professor(&catalog, id).ok_or_else(|| DeskError::UnknownTarget {
            target_type: TargetType::Professor,
            id: id.to_string(),
        })?;
        Ok(display_rating(professor, &self.reviews.reviews()?))
    }

    pub fn can_review(&self, user: &CurrentUser, target: &ReviewTarget) -> Result<bool, DeskError> {
        let catalog = self.catalog.universities()?;
        Ok(can_user_review_target(user, Some(target), &catalog))
    }

    pub fn matches(
        &self,
        course_query: &str,
        university_filter: &str,
    ) -> Result<Vec<ProfessorListing>, DeskError> {
        let catalog = self.catalog.universities()?;
        let professors = flatten_professors(&catalog);
        let matches = find_matches(course_query, university_filter, &professors, &catalog);
        debug!(query = course_query, filter = university_filter, found = matches.len(), "course match");
        Ok(matches)
    }

    pub fn submit(
        &self,
        user: &CurrentUser,
        target: &ReviewTarget,
        score: f64,
        comment: Option<String>,
    ) -> Result<Review, DeskError> {
        let reviewer_id = user
            .id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .ok_or(DeskError::MissingIdentity)?;
        validate_score(score)?;

        let catalog = self.catalog.universities()?;
        if !can_user_review_target(user, Some(target), &catalog) {
            warn!(reviewer = %reviewer_id, target = %target.id, "review rejected: not eligible");
            return Err(DeskError::NotEligible);
        }

        let reviews = self.reviews.reviews()?;
        if has_reviewed(user, target.kind, &target.id, &reviews) {
            return Err(DeskError::AlreadyReviewed {
                target_type: target.kind,
                id: target.id.clone(),
            });
        }

        let review = self.reviews.insert(Review {
            id: Uuid::new_v4(),
            target_type: target.kind,
            target_id: target.id.clone(),
            score: Some(score),
            comment: clean_comment(comment),
            reviewer_id: Some(reviewer_id),
            date: Utc::now(),
        })?;
        info!(review = %review.id, target_type = target.kind.as_str(), target = %target.id, "review submitted");
        Ok(review)
    }

    pub fn update(
        &self,
        user: &CurrentUser,
        review_id: Uuid,
        score: f64,
        comment: Option<String>,
    ) -> Result<Review, DeskError> {
        validate_score(score)?;
        let mut review = self.owned_review(user, review_id)?;
        review.score = Some(score);
        review.comment = clean_comment(comment);
        self.reviews.update(review.clone())?;
        info!(review = %review_id, "review updated");
        Ok(review)
    }

    pub fn delete(&self, user: &CurrentUser, review_id: Uuid) -> Result<Review, DeskError> {
        self.owned_review(user, review_id)?;
        let removed = self.reviews.remove(review_id)?;
        info!(review = %review_id, "review deleted");
        Ok(removed)
    }

    fn owned_review(&self, user: &CurrentUser, review_id: Uuid) -> Result<Review, DeskError> {
        let review = self
            .reviews
            .reviews()?
            .into_iter()
            .find(|review| review.id == review_id)
            .ok_or(DeskError::NotFound(review_id))?;

        if !can_modify_review(user, &review) {
            warn!(review = %review_id, "review change rejected: not the owner");
            return Err(DeskError::NotOwner(review_id));
        }
        Ok(review)
    }
}

fn validate_score(score: f64) -> Result<(), DeskError> {
    if (1.0..=5.0).contains(&score) {
        Ok(())
    } else {
        Err(DeskError::InvalidScore(score))
    }
}

fn clean_comment(comment: Option<String>) -> Option<String> {
    comment
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed_catalog;
    use crate::models::Role;

    fn desk() -> ReviewDesk<InMemoryReviewStore, StaticCatalog> {
        let catalog = seed_catalog().expect("catalog");
        ReviewDesk::new(InMemoryReviewStore::default(), StaticCatalog::new(catalog))
    }

    fn student(id: &str, university: &str) -> CurrentUser {
        CurrentUser {
            id: Some(id.to_string()),
            role: Role::Student,
            university: Some(university.to_string()),
        }
    }

    #[test]
    fn submitted_review_moves_the_rating() {
        let desk = desk();
        assert_eq!(desk.professor_rating("p-hoxha").expect("rating"), 4.6);

        desk.submit(
            &student("s-1", "EPOKA"),
            &ReviewTarget::professor("p-hoxha"),
            3.0,
            Some("  tough but fair ".to_string()),
        )
        .expect("submit");

        assert_eq!(desk.professor_rating("p-hoxha").expect("rating"), 3.8);
        let stored = desk.review_store().reviews().expect("reviews");
        assert_eq!(stored[0].comment.as_deref(), Some("tough but fair"));
    }

    #[test]
    fn second_review_of_same_target_is_rejected() {
        let desk = desk();
        let user = student("s-1", "EPOKA");
        let target = ReviewTarget::professor("p-kola");
        desk.submit(&user, &target, 4.0, None).expect("first");

        let err = desk.submit(&user, &target, 5.0, None).unwrap_err();
        assert!(matches!(err, DeskError::AlreadyReviewed { .. }));

        desk.submit(&student("s-2", "EPOKA"), &target, 5.0, None)
            .expect("another reviewer may review");
    }

    #[test]
    fn ineligible_and_invalid_submissions_are_rejected() {
        let desk = desk();
        let target = ReviewTarget::professor("p-hoxha");

        let err = desk.submit(&student("s-1", "UPT"), &target, 4.0, None).unwrap_err();
        assert!(matches!(err, DeskError::NotEligible));

        let err = desk.submit(&student("s-1", "EPOKA"), &target, 6.0, None).unwrap_err();
        assert!(matches!(err, DeskError::InvalidScore(_)));

        let anonymous = CurrentUser { id: None, ..student("", "EPOKA") };
        let err = desk.submit(&anonymous, &target, 4.0, None).unwrap_err();
        assert!(matches!(err, DeskError::MissingIdentity));

        assert!(desk.review_store().reviews().expect("reviews").is_empty());
    }

    #[test]
    fn only_the_reviewer_updates_or_deletes() {
        let desk = desk();
        let owner = student("s-1", "EPOKA");
        let review = desk
            .submit(&owner, &ReviewTarget::professor("p-meta"), 2.0, None)
            .expect("submit");

        let intruder = student("s-2", "EPOKA");
        assert!(matches!(
            desk.update(&intruder, review.id, 5.0, None).unwrap_err(),
            DeskError::NotOwner(_)
        ));
        assert!(matches!(
            desk.delete(&intruder, review.id).unwrap_err(),
            DeskError::NotOwner(_)
        ));

        let updated = desk
            .update(&owner, review.id, 4.0, Some("improved".to_string()))
            .expect("update");
        assert_eq!(updated.score, Some(4.0));

        desk.delete(&owner, review.id).expect("delete");
        assert!(matches!(
            desk.delete(&owner, review.id).unwrap_err(),
            DeskError::NotFound(_)
        ));
    }

    #[test]
    fn legacy_reviews_cannot_be_changed() {
        let legacy = Review {
            id: Uuid::new_v4(),
            target_type: TargetType::University,
            target_id: "u-epoka".to_string(),
            score: Some(5.0),
            comment: None,
            reviewer_id: None,
            date: Utc::now(),
        };
        let catalog = seed_catalog().expect("catalog");
        let desk = ReviewDesk::new(
            InMemoryReviewStore::new(vec![legacy.clone()]),
            StaticCatalog::new(catalog),
        );

        assert!(matches!(
            desk.delete(&student("s-1", "EPOKA"), legacy.id).unwrap_err(),
            DeskError::NotOwner(_)
        ));
        // (4.4 + 5) / 2
        assert_eq!(desk.university_rating("u-epoka").expect("rating"), 4.7);
    }

    #[test]
    fn unknown_entities_are_reported() {
        let desk = desk();
        assert!(matches!(
            desk.university_rating("u-nowhere").unwrap_err(),
            DeskError::UnknownTarget { .. }
        ));
        assert!(matches!(
            desk.professor_rating("p-nobody").unwrap_err(),
            DeskError::UnknownTarget { .. }
        ));
    }

    #[test]
    fn matches_use_the_current_catalog() {
        let desk = desk();
        let found = desk.matches("linear", "Any").expect("matches");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].full_name(), "Ilir Shehu");
        assert!(desk.can_review(&student("s-1", "UT"), &ReviewTarget::professor("p-shehu")).expect("check"));
    }

    #[test]
    fn in_memory_store_rejects_duplicate_ids() {
        let store = InMemoryReviewStore::default();
        let review = Review {
            id: Uuid::new_v4(),
            target_type: TargetType::Professor,
            target_id: "p-kola".to_string(),
            score: Some(3.0),
            comment: None,
            reviewer_id: Some("s-1".to_string()),
            date: Utc::now(),
        };
        store.insert(review.clone()).expect("insert");
        assert!(matches!(store.insert(review).unwrap_err(), StoreError::Conflict(_)));
    }
}
