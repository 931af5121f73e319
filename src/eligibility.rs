use crate::catalog::flatten_professors;
use crate::models::{CurrentUser, Review, ReviewTarget, Role, TargetType, University};
use crate::names::same_university;

/// Whether `user` may review `target`: only students, and only inside their
/// own university. Recomputed on every call.
pub fn can_user_review_target(
    user: &CurrentUser,
    target: Option<&ReviewTarget>,
    catalog: &[University],
) -> bool {
    if user.role != Role::Student {
        return false;
    }
    let Some(target) = target else {
        return false;
    };

    match target.kind {
        TargetType::University => {
            same_university(user.university.as_deref(), Some(target.name.as_str()), catalog)
        }
        TargetType::Professor => flatten_professors(catalog)
            .iter()
            .find(|professor| professor.id == target.id)
            .map(|professor| {
                same_university(
                    Some(professor.university_name.as_str()),
                    user.university.as_deref(),
                    catalog,
                )
            })
            .unwrap_or(false),
        TargetType::Unknown => false,
    }
}

pub fn has_reviewed(
    user: &CurrentUser,
    target_type: TargetType,
    target_id: &str,
    reviews: &[Review],
) -> bool {
    let Some(user_id) = user.id.as_deref() else {
        return false;
    };

    reviews.iter().any(|review| {
        review.targets(target_type, target_id) && review.reviewer_id.as_deref() == Some(user_id)
    })
}

/// Only the original reviewer may edit or delete; unattributed reviews are frozen.
pub fn can_modify_review(user: &CurrentUser, review: &Review) -> bool {
    match (user.id.as_deref(), review.reviewer_id.as_deref()) {
        (Some(user_id), Some(reviewer_id)) => !user_id.is_empty() && user_id == reviewer_id,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed_catalog;
    use chrono::Utc;
    use uuid::Uuid;

    fn student(university: &str) -> CurrentUser {
        CurrentUser {
            id: Some("s-1".to_string()),
            role: Role::Student,
            university: Some(university.to_string()),
        }
    }

    fn uni_target(name: &str) -> ReviewTarget {
        ReviewTarget {
            kind: TargetType::University,
            id: String::new(),
            name: name.to_string(),
        }
    }

    fn review_by(reviewer: Option<&str>) -> Review {
        Review {
            id: Uuid::new_v4(),
            target_type: TargetType::Professor,
            target_id: "p-hoxha".to_string(),
            score: Some(4.0),
            comment: None,
            reviewer_id: reviewer.map(str::to_string),
            date: Utc::now(),
        }
    }

    #[test]
    fn role_gate_precedes_affiliation() {
        let guest = CurrentUser {
            id: Some("g-1".to_string()),
            role: Role::Guest,
            university: Some("X".to_string()),
        };
        assert!(!can_user_review_target(&guest, Some(&uni_target("X")), &[]));

        let other = CurrentUser {
            role: Role::Other,
            ..student("X")
        };
        assert!(!can_user_review_target(&other, Some(&uni_target("X")), &[]));
    }

    #[test]
    fn missing_target_is_not_reviewable() {
        assert!(!can_user_review_target(&student("EPOKA"), None, &[]));
    }

    #[test]
    fn students_review_their_own_university() {
        let catalog = seed_catalog().expect("catalog");
        let user = student("epoka");
        assert!(can_user_review_target(
            &user,
            Some(&uni_target("EPOKA University")),
            &catalog
        ));
        assert!(!can_user_review_target(
            &user,
            Some(&uni_target("University of Tirana")),
            &catalog
        ));
    }

    #[test]
    fn students_review_professors_of_their_university() {
        let catalog = seed_catalog().expect("catalog");
        assert!(can_user_review_target(
            &student("UPT"),
            Some(&ReviewTarget::professor("p-leka")),
            &catalog
        ));
        assert!(!can_user_review_target(
            &student("UPT"),
            Some(&ReviewTarget::professor("p-hoxha")),
            &catalog
        ));
        assert!(!can_user_review_target(
            &student("UPT"),
            Some(&ReviewTarget::professor("p-nobody")),
            &catalog
        ));
    }

    #[test]
    fn student_without_university_is_not_eligible() {
        let user = CurrentUser {
            university: None,
            ..student("ignored")
        };
        let catalog = seed_catalog().expect("catalog");
        assert!(!can_user_review_target(
            &user,
            Some(&ReviewTarget::professor("p-hoxha")),
            &catalog
        ));
    }

    #[test]
    fn unknown_target_kind_is_rejected() {
        let target = ReviewTarget {
            kind: TargetType::Unknown,
            id: "d-epoka-ce".to_string(),
            name: "EPOKA University".to_string(),
        };
        assert!(!can_user_review_target(&student("EPOKA"), Some(&target), &[]));
    }

    #[test]
    fn detects_existing_review_by_same_reviewer() {
        let reviews = vec![review_by(Some("s-1")), review_by(None)];
        let user = student("EPOKA");
        assert!(has_reviewed(&user, TargetType::Professor, "p-hoxha", &reviews));
        assert!(!has_reviewed(&user, TargetType::Professor, "p-kola", &reviews));

        let anonymous = CurrentUser { id: None, ..student("EPOKA") };
        assert!(!has_reviewed(&anonymous, TargetType::Professor, "p-hoxha", &reviews));
    }

    #[test]
    fn only_owner_modifies_review() {
        let user = student("EPOKA");
        assert!(can_modify_review(&user, &review_by(Some("s-1"))));
        assert!(!can_modify_review(&user, &review_by(Some("s-2"))));
        assert!(!can_modify_review(&user, &review_by(None)));
    }
}
