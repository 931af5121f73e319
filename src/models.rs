use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Wildcard program tag every program carries, listed or not.
pub const WILDCARD_TAG: &str = "All";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct University {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub departments: Vec<Department>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub professors: Vec<Professor>,
    #[serde(default)]
    pub programs: Vec<Program>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Professor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub courses: Vec<String>,
    #[serde(default)]
    pub research_areas: Vec<String>,
    #[serde(default)]
    pub years_of_experience: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub credits: u32,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub types: Vec<String>,
}

/// Professor flattened out of the catalog tree for display and matching.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessorListing {
    pub id: String,
    pub name: String,
    pub surname: String,
    pub rating: f64,
    pub courses: Vec<String>,
    pub research_areas: Vec<String>,
    pub years_of_experience: u32,
    pub university_name: String,
    pub department_name: String,
}

impl ProfessorListing {
    pub fn from_catalog(professor: &Professor, university: &str, department: &str) -> Self {
        Self {
            id: professor.id.clone(),
            name: professor.name.clone(),
            surname: professor.surname.clone(),
            rating: professor.rating,
            courses: professor.courses.clone(),
            research_areas: professor.research_areas.clone(),
            years_of_experience: professor.years_of_experience,
            university_name: university.to_string(),
            department_name: department.to_string(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname).trim().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramListing {
    pub id: String,
    pub name: String,
    pub degree: String,
    pub credits: u32,
    pub language: String,
    pub rating: f64,
    pub types: Vec<String>,
    pub university_name: String,
    pub department_name: String,
}

impl ProgramListing {
    pub fn from_catalog(program: &Program, university: &str, department: &str) -> Self {
        let mut types = program.types.clone();
        if !types.iter().any(|t| t.eq_ignore_ascii_case(WILDCARD_TAG)) {
            types.insert(0, WILDCARD_TAG.to_string());
        }

        Self {
            id: program.id.clone(),
            name: program.name.clone(),
            degree: program.degree.clone(),
            credits: program.credits,
            language: program.language.clone(),
            rating: program.rating,
            types,
            university_name: university.to_string(),
            department_name: department.to_string(),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        tag.eq_ignore_ascii_case(WILDCARD_TAG)
            || self.types.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetType {
    #[serde(rename = "uni")]
    University,
    #[serde(rename = "prof")]
    Professor,
    #[serde(other)]
    Unknown,
}

impl TargetType {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "uni" => Self::University,
            "prof" => Self::Professor,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::University => "uni",
            Self::Professor => "prof",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub target_type: TargetType,
    pub target_id: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub reviewer_id: Option<String>,
    pub date: DateTime<Utc>,
}

impl Review {
    pub fn targets(&self, target_type: TargetType, target_id: &str) -> bool {
        target_type != TargetType::Unknown
            && self.target_type == target_type
            && self.target_id == target_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    #[default]
    Guest,
    #[serde(other)]
    Other,
}

impl Role {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "student" => Self::Student,
            "guest" | "" => Self::Guest,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub university: Option<String>,
}

/// Entity a user asks to review. `name` is only consulted for universities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewTarget {
    #[serde(rename = "type")]
    pub kind: TargetType,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl ReviewTarget {
    pub fn university(university: &University) -> Self {
        Self {
            kind: TargetType::University,
            id: university.id.clone(),
            name: university.name.clone(),
        }
    }

    pub fn professor(id: impl Into<String>) -> Self {
        Self {
            kind: TargetType::Professor,
            id: id.into(),
            name: String::new(),
        }
    }
}
