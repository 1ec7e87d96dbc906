//! Static catalogs: the recognized skills and the beginner course list.

use serde::Serialize;

/// Canonical lowercase skill names recognized in résumés.
pub const SKILL_CATALOG: &[&str] = &[
    "python",
    "java",
    "javascript",
    "c",
    "c++",
    "c#",
    "php",
    "swift",
    "kotlin",
    "go",
    "ruby",
    "html",
    "css",
    "react",
    "angular",
    "vue",
    "django",
    "flask",
    "node",
    "express",
    "spring",
    "bootstrap",
    "android",
    "flutter",
    "sql",
    "mysql",
    "mongodb",
    "postgresql",
    "oracle",
    "aws",
    "git",
    "linux",
    "machine learning",
    "deep learning",
    "pandas",
    "numpy",
    "scikit-learn",
    "tensorflow",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CourseSuggestion {
    pub name: &'static str,
    pub link: &'static str,
}

/// Suggested when a résumé matches no known skill. Order is part of the response contract.
pub const COURSE_CATALOG: [CourseSuggestion; 5] = [
    CourseSuggestion {
        name: "Introduction to Programming",
        link: "https://www.coursera.org/learn/python",
    },
    CourseSuggestion {
        name: "Web Development for Beginners",
        link: "https://www.coursera.org/specializations/web-design",
    },
    CourseSuggestion {
        name: "Machine Learning Basics",
        link: "https://www.coursera.org/learn/machine-learning",
    },
    CourseSuggestion {
        name: "Database Management Essentials",
        link: "https://www.coursera.org/learn/database-management",
    },
    CourseSuggestion {
        name: "Cloud Computing Fundamentals",
        link: "https://www.coursera.org/learn/cloud-computing",
    },
];
