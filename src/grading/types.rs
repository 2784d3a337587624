use serde::{Deserialize, Serialize};

use super::lenient;

/// A gradable unit inside a category.
///
/// Example JSON:
/// ```json
/// { "id": "1f0c...", "name": "Midterm", "weight": 50, "grade": 85 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Activity {
    pub id: String,

    pub name: String,

    /// Share of the parent category, 0-100. Treated as a ratio against the
    /// sibling weights when averaging.
    #[serde(default, deserialize_with = "lenient::weight")]
    pub weight: f64,

    /// Score 0-100, or `None` while ungraded
    #[serde(
        default,
        deserialize_with = "lenient::grade",
        skip_serializing_if = "Option::is_none"
    )]
    pub grade: Option<f64>,
}

impl Activity {
    pub fn new(name: impl Into<String>, weight: f64, grade: Option<f64>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            weight,
            grade,
        }
    }
}

/// A weighted group of activities contributing to the final grade.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Category {
    pub id: String,

    pub name: String,

    /// Share of the overall grade, 0-100. All category weights must sum to
    /// exactly 100 before a final score is shown.
    #[serde(default, deserialize_with = "lenient::weight")]
    pub weight: f64,

    /// Insertion order is kept for display only
    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl Category {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            weight,
            activities: Vec::new(),
        }
    }

    pub fn with_activities(mut self, activities: Vec<Activity>) -> Self {
        self.activities = activities;
        self
    }

    /// Sum of the declared activity weights, graded or not
    pub fn activity_weight_total(&self) -> f64 {
        self.activities.iter().map(|a| a.weight).sum()
    }
}

/// One category's contribution to the final grade.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub category_id: String,
    pub category_name: String,
    pub category_weight: f64,
    /// Weighted average of the category, 0-100
    pub average: f64,
    /// Contribution on a 0-100 scale
    pub points: f64,
    /// Contribution on a 0-10 scale
    #[serde(rename = "base10Points")]
    pub base10_points: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GradeReport {
    pub results: Vec<CalculationResult>,
    /// Final grade on a 0-10 scale
    pub total_points: f64,
}
