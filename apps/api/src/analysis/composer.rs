//! Result Composer — turns matched skills into job links or course suggestions.

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::analysis::catalog::{CourseSuggestion, COURSE_CATALOG};

/// Job links are built for at most this many skills, taken in sorted order.
pub const MAX_JOB_SKILLS: usize = 5;

const LINKEDIN_SEARCH: &str = "https://www.linkedin.com/jobs/search/?keywords=";
const NAUKRI_BASE: &str = "https://www.naukri.com/";
const INDEED_SEARCH: &str = "https://www.indeed.com/jobs?q=";

/// Search links for one skill on each supported job board.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct JobLinks {
    pub skill: String,
    pub title: String,
    pub linkedin: String,
    pub naukri: String,
    pub indeed: String,
}

impl JobLinks {
    pub fn for_skill(skill: &str) -> Self {
        let query = skill.replace(' ', "+");
        Self {
            skill: skill.to_string(),
            title: format!("{skill} Jobs"),
            linkedin: format!("{LINKEDIN_SEARCH}{query}"),
            naukri: format!("{NAUKRI_BASE}{query}-jobs"),
            indeed: format!("{INDEED_SEARCH}{query}"),
        }
    }
}

/// Outcome of analysing one résumé.
///
/// Both variants serialize to `{"skills": [...], "jobs": [...], "courses": [...]}`
/// with the unused arrays empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    SkillsFound {
        skills: Vec<String>,
        jobs: Vec<JobLinks>,
    },
    NoSkillsFound {
        courses: Vec<CourseSuggestion>,
    },
}

/// Builds the outcome for a sorted, deduplicated skill list.
pub fn compose(skills: Vec<String>) -> AnalysisOutcome {
    if skills.is_empty() {
        return AnalysisOutcome::NoSkillsFound {
            courses: COURSE_CATALOG.to_vec(),
        };
    }
    let jobs = skills
        .iter()
        .take(MAX_JOB_SKILLS)
        .map(|s| JobLinks::for_skill(s))
        .collect();
    AnalysisOutcome::SkillsFound { skills, jobs }
}

impl Serialize for AnalysisOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        const NO_STRINGS: &[String] = &[];
        const NO_JOBS: &[JobLinks] = &[];
        const NO_COURSES: &[CourseSuggestion] = &[];

        let (skills, jobs, courses) = match self {
            AnalysisOutcome::SkillsFound { skills, jobs } => {
                (skills.as_slice(), jobs.as_slice(), NO_COURSES)
            }
            AnalysisOutcome::NoSkillsFound { courses } => {
                (NO_STRINGS, NO_JOBS, courses.as_slice())
            }
        };

        let mut state = serializer.serialize_struct("AnalysisOutcome", 3)?;
        state.serialize_field("skills", skills)?;
        state.serialize_field("jobs", jobs)?;
        state.serialize_field("courses", courses)?;
        state.end()
    }
}
