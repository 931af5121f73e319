use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgGroup, Args, Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use campus_reviews::catalog::{self, find_university, flatten_programs};
use campus_reviews::config::AppConfig;
use campus_reviews::matching::{programs_with_tag, ANY_UNIVERSITY};
use campus_reviews::models::{CurrentUser, ReviewTarget, Role, University};
use campus_reviews::store::{InMemoryReviewStore, ReviewDesk, StaticCatalog};
use campus_reviews::{db, report, telemetry};

#[derive(Parser)]
#[command(name = "campus-reviews")]
#[command(about = "University and professor review dashboard engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Actor {
    /// Id of the acting user
    #[arg(long)]
    user_id: Option<String>,
    /// student, guest, or any other role
    #[arg(long, default_value = "guest")]
    role: String,
    /// Free-text university of the acting user
    #[arg(long)]
    university: Option<String>,
}

impl Actor {
    fn user(&self) -> CurrentUser {
        CurrentUser {
            id: self.user_id.clone(),
            role: Role::parse(&self.role),
            university: self.university.clone(),
        }
    }
}

#[derive(Args)]
#[command(group(
    ArgGroup::new("target")
        .args(["uni", "prof"])
        .required(true)
        .multiple(false)
))]
struct TargetArgs {
    /// University id
    #[arg(long)]
    uni: Option<String>,
    /// Professor id
    #[arg(long)]
    prof: Option<String>,
}

impl TargetArgs {
    fn resolve(&self, catalog: &[University]) -> anyhow::Result<ReviewTarget> {
        match (&self.uni, &self.prof) {
            (Some(id), _) => find_university(catalog, id)
                .map(ReviewTarget::university)
                .with_context(|| format!("no university with id {id}")),
            (None, Some(id)) => Ok(ReviewTarget::professor(id.clone())),
            (None, None) => anyhow::bail!("either --uni or --prof is required"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load sample reviews
    Seed,
    /// Import reviews from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Show the displayed rating of a university or professor
    Rating {
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Check whether a user may review a target
    CanReview {
        #[command(flatten)]
        actor: Actor,
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Find professors teaching any of the comma-separated courses
    Match {
        #[arg(long)]
        courses: String,
        #[arg(long, default_value = ANY_UNIVERSITY)]
        university: String,
    },
    /// List programs carrying a type tag
    Programs {
        #[arg(long, default_value = "All")]
        tag: String,
    },
    /// Submit a review
    Submit {
        #[command(flatten)]
        actor: Actor,
        #[command(flatten)]
        target: TargetArgs,
        #[arg(long)]
        score: f64,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Change the score or comment of your own review
    Update {
        #[command(flatten)]
        actor: Actor,
        #[arg(long)]
        id: Uuid,
        #[arg(long)]
        score: f64,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Delete your own review
    Delete {
        #[command(flatten)]
        actor: Actor,
        #[arg(long)]
        id: Uuid,
    },
    /// Generate a markdown report
    Report {
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.log_level)?;

    let universities = match &config.catalog_path {
        Some(path) => catalog::load_catalog(path)?,
        None => catalog::seed_catalog()?,
    };
    info!(universities = universities.len(), "catalog loaded");

    match cli.command {
        Commands::InitDb => {
            let pool = connect(&config).await?;
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            let pool = connect(&config).await?;
            db::seed(&pool).await?;
            println!("Seed reviews inserted.");
        }
        Commands::Import { csv } => {
            let pool = connect(&config).await?;
            let inserted = db::import_csv(&pool, &csv, &universities).await?;
            println!("Inserted {inserted} reviews from {}.", csv.display());
        }
        Commands::Rating { target } => {
            let pool = connect(&config).await?;
            let desk = desk_from_pool(&pool, universities).await?;
            let (label, rating) = match (&target.uni, &target.prof) {
                (Some(id), _) => (id.clone(), desk.university_rating(id)?),
                (None, Some(id)) => (id.clone(), desk.professor_rating(id)?),
                (None, None) => anyhow::bail!("either --uni or --prof is required"),
            };
            println!("{label}: {rating}");
        }
        Commands::CanReview { actor, target } => {
            let target = target.resolve(&universities)?;
            let desk = ReviewDesk::new(
                InMemoryReviewStore::default(),
                StaticCatalog::new(universities),
            );
            let allowed = desk.can_review(&actor.user(), &target)?;
            println!("{}", if allowed { "allowed" } else { "not allowed" });
        }
        Commands::Match {
            courses,
            university,
        } => {
            let desk = ReviewDesk::new(
                InMemoryReviewStore::default(),
                StaticCatalog::new(universities),
            );
            let matches = desk.matches(&courses, &university)?;

            if matches.is_empty() {
                println!("No professors match these courses.");
                return Ok(());
            }

            println!("Matching professors:");
            for professor in matches.iter() {
                println!(
                    "- {} ({}, {}): {}",
                    professor.full_name(),
                    professor.department_name,
                    professor.university_name,
                    professor.courses.join(", ")
                );
            }
        }
        Commands::Programs { tag } => {
            let programs = programs_with_tag(&tag, &flatten_programs(&universities));
            if programs.is_empty() {
                println!("No programs tagged {tag}.");
                return Ok(());
            }
            for program in programs.iter() {
                println!(
                    "- {} {} ({}, {}) {} credits, {}",
                    program.degree,
                    program.name,
                    program.department_name,
                    program.university_name,
                    program.credits,
                    program.language
                );
            }
        }
        Commands::Submit {
            actor,
            target,
            score,
            comment,
        } => {
            let target = target.resolve(&universities)?;
            let pool = connect(&config).await?;
            let desk = desk_from_pool(&pool, universities).await?;
            let review = desk.submit(&actor.user(), &target, score, comment)?;
            db::insert_review(&pool, &review).await?;
            println!("Review {} saved.", review.id);
        }
        Commands::Update {
            actor,
            id,
            score,
            comment,
        } => {
            let pool = connect(&config).await?;
            let desk = desk_from_pool(&pool, universities).await?;
            let review = desk.update(&actor.user(), id, score, comment)?;
            db::update_review(&pool, &review).await?;
            println!("Review {} updated.", review.id);
        }
        Commands::Delete { actor, id } => {
            let pool = connect(&config).await?;
            let desk = desk_from_pool(&pool, universities).await?;
            desk.delete(&actor.user(), id)?;
            db::delete_review(&pool, id).await?;
            println!("Review {id} deleted.");
        }
        Commands::Report { out } => {
            let pool = connect(&config).await?;
            let reviews = db::fetch_reviews(&pool).await?;
            let report = report::build_report(&universities, &reviews);
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    let database_url = config.require_database_url()?;
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(database_url)
        .await
        .context("failed to connect to Postgres")
}

async fn desk_from_pool(
    pool: &PgPool,
    universities: Vec<University>,
) -> anyhow::Result<ReviewDesk<InMemoryReviewStore, StaticCatalog>> {
    let reviews = db::fetch_reviews(pool).await?;
    Ok(ReviewDesk::new(
        InMemoryReviewStore::new(reviews),
        StaticCatalog::new(universities),
    ))
}
