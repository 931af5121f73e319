use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgPool, Row};
use tracing::{info, warn};
use uuid::Uuid;

use crate::catalog::{find_professor, find_university};
use crate::models::{Review, TargetType, University};

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let reviews = vec![
        (
            Uuid::parse_str("3d7f5d6f-24f7-4e8e-8b4b-3e7e44b4a7b2")?,
            TargetType::University,
            "u-epoka",
            Some(5.0),
            Some("Great labs and responsive staff"),
            Some("s-avery"),
            NaiveDate::from_ymd_opt(2026, 2, 2).context("invalid date")?,
        ),
        (
            Uuid::parse_str("0c22f1f1-9184-4fd4-9b21-28c68a6a89dc")?,
            TargetType::Professor,
            "p-hoxha",
            Some(4.0),
            Some("Demanding AI course, worth it"),
            Some("s-avery"),
            NaiveDate::from_ymd_opt(2026, 1, 30).context("invalid date")?,
        ),
        (
            Uuid::parse_str("d5a0a1a2-2a3c-44c2-8f73-60b7897a9dd2")?,
            TargetType::Professor,
            "p-leka",
            Some(3.0),
            None,
            None,
            NaiveDate::from_ymd_opt(2025, 11, 14).context("invalid date")?,
        ),
    ];

    for (id, target_type, target_id, score, comment, reviewer_id, date) in reviews {
        sqlx::query(
            r#"
            INSERT INTO campus_reviews.reviews
            (id, target_type, target_id, score, comment, reviewer_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(target_type.as_str())
        .bind(target_id)
        .bind(score)
        .bind(comment)
        .bind(reviewer_id)
        .bind(start_of_day(date)?)
        .execute(pool)
        .await?;
    }

    Ok(())
}

pub async fn fetch_reviews(pool: &PgPool) -> anyhow::Result<Vec<Review>> {
    let rows = sqlx::query(
        "SELECT id, target_type, target_id, score, comment, reviewer_id, created_at \
         FROM campus_reviews.reviews \
         ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    let mut reviews = Vec::with_capacity(rows.len());
    for row in rows {
        let target_type: String = row.get("target_type");
        reviews.push(Review {
            id: row.get("id"),
            target_type: TargetType::parse(&target_type),
            target_id: row.get("target_id"),
            score: row.get("score"),
            comment: row.get("comment"),
            reviewer_id: row.get("reviewer_id"),
            date: row.get("created_at"),
        });
    }

    Ok(reviews)
}

pub async fn insert_review(pool: &PgPool, review: &Review) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO campus_reviews.reviews
        (id, target_type, target_id, score, comment, reviewer_id, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(review.id)
    .bind(review.target_type.as_str())
    .bind(&review.target_id)
    .bind(review.score)
    .bind(&review.comment)
    .bind(&review.reviewer_id)
    .bind(review.date)
    .execute(pool)
    .await
    .with_context(|| format!("failed to insert review {}", review.id))?;
    Ok(())
}

pub async fn update_review(pool: &PgPool, review: &Review) -> anyhow::Result<()> {
    let result = sqlx::query(
        "UPDATE campus_reviews.reviews SET score = $2, comment = $3 WHERE id = $1",
    )
    .bind(review.id)
    .bind(review.score)
    .bind(&review.comment)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        anyhow::bail!("review {} disappeared before update", review.id);
    }
    Ok(())
}

pub async fn delete_review(pool: &PgPool, id: Uuid) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM campus_reviews.reviews WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Imports reviews from CSV. Rows that name an unknown entity are stored
/// anyway; they simply never contribute to a rating.
pub async fn import_csv(
    pool: &PgPool,
    csv_path: &std::path::Path,
    catalog: &[University],
) -> anyhow::Result<usize> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        id: Option<Uuid>,
        target_type: String,
        target_id: String,
        score: Option<f64>,
        comment: Option<String>,
        reviewer_id: Option<String>,
        date: NaiveDate,
    }

    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let mut inserted = 0usize;

    for (line, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.with_context(|| format!("invalid review on data row {}", line + 1))?;
        let target_type = TargetType::parse(&row.target_type);
        let known = match target_type {
            TargetType::University => find_university(catalog, &row.target_id).is_some(),
            TargetType::Professor => find_professor(catalog, &row.target_id).is_some(),
            TargetType::Unknown => false,
        };
        if !known {
            warn!(
                target_type = %row.target_type,
                target = %row.target_id,
                "imported review points at no catalog entity"
            );
        }

        let result = sqlx::query(
            r#"
            INSERT INTO campus_reviews.reviews
            (id, target_type, target_id, score, comment, reviewer_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(row.id.unwrap_or_else(Uuid::new_v4))
        .bind(row.target_type.trim())
        .bind(&row.target_id)
        .bind(row.score)
        .bind(row.comment.filter(|text| !text.trim().is_empty()))
        .bind(row.reviewer_id.filter(|id| !id.trim().is_empty()))
        .bind(start_of_day(row.date)?)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            inserted += 1;
        }
    }

    info!(inserted, path = %csv_path.display(), "review import finished");
    Ok(inserted)
}

fn start_of_day(date: NaiveDate) -> anyhow::Result<DateTime<Utc>> {
    Ok(date
        .and_hms_opt(0, 0, 0)
        .context("invalid time of day")?
        .and_utc())
}
