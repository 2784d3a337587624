pub mod engine;
pub mod lenient;
pub mod types;
pub mod validation;

pub use engine::{average_of_activities, compute_results, points_from_average};
pub use types::{Activity, CalculationResult, Category, GradeReport};
pub use validation::{
    category_weight_total, validate_activity_weights, validate_category_weights, weight_issues,
};
