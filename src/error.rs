use uuid::Uuid;

use crate::models::TargetType;

/// Failures of the review/catalog storage behind the desk.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("review {0} already exists")]
    Conflict(Uuid),
    #[error("review {0} not found")]
    NotFound(Uuid),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum DeskError {
    #[error("no {} with id {id}", .target_type.as_str())]
    UnknownTarget { target_type: TargetType, id: String },
    #[error("user is not allowed to review this target")]
    NotEligible,
    #[error("user has already reviewed {} {id}", .target_type.as_str())]
    AlreadyReviewed { target_type: TargetType, id: String },
    #[error("a reviewer id is required")]
    MissingIdentity,
    #[error("score {0} is outside 1-5")]
    InvalidScore(f64),
    #[error("review {0} not found")]
    NotFound(Uuid),
    #[error("only the original reviewer may change review {0}")]
    NotOwner(Uuid),
    #[error(transparent)]
    Store(#[from] StoreError),
}
