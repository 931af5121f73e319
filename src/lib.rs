//! Review aggregation and eligibility rules for the campus review dashboard.
//!
//! The rating, name-matching, eligibility and course-matching functions are
//! pure and total. [`store::ReviewDesk`] wires them to injected stores, and
//! [`db`] persists reviews in Postgres for the command-line front end.

pub mod catalog;
pub mod config;
pub mod db;
pub mod eligibility;
pub mod error;
pub mod matching;
pub mod models;
pub mod names;
pub mod rating;
pub mod report;
pub mod store;
pub mod telemetry;

pub use eligibility::can_user_review_target;
pub use matching::find_matches;
pub use names::{normalize, same_university};
pub use rating::display_rating;
