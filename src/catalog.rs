use std::path::Path;

use crate::models::{Professor, ProfessorListing, ProgramListing, University};

const SEED_CATALOG: &str = include_str!("../data/catalog.json");

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Catalog bundled with the binary, used when no catalog file is configured.
pub fn seed_catalog() -> Result<Vec<University>, CatalogError> {
    Ok(serde_json::from_str(SEED_CATALOG)?)
}

pub fn load_catalog(path: &Path) -> Result<Vec<University>, CatalogError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&raw)?)
}

/// Every professor with its university and department names, in catalog order.
pub fn flatten_professors(catalog: &[University]) -> Vec<ProfessorListing> {
    catalog
        .iter()
        .flat_map(|university| {
            university.departments.iter().flat_map(move |department| {
                department.professors.iter().map(move |professor| {
                    ProfessorListing::from_catalog(professor, &university.name, &department.name)
                })
            })
        })
        .collect()
}

pub fn flatten_programs(catalog: &[University]) -> Vec<ProgramListing> {
    catalog
        .iter()
        .flat_map(|university| {
            university.departments.iter().flat_map(move |department| {
                department.programs.iter().map(move |program| {
                    ProgramListing::from_catalog(program, &university.name, &department.name)
                })
            })
        })
        .collect()
}

pub fn find_university<'a>(catalog: &'a [University], id: &str) -> Option<&'a University> {
    catalog.iter().find(|university| university.id == id)
}

pub fn find_professor<'a>(catalog: &'a [University], id: &str) -> Option<&'a Professor> {
    catalog
        .iter()
        .flat_map(|university| university.departments.iter())
        .flat_map(|department| department.professors.iter())
        .find(|professor| professor.id == id)
}
