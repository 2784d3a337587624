use super::types::{Activity, Category};

/// Weight every set of category weights must add up to.
pub const REQUIRED_TOTAL: f64 = 100.0;

/// True iff the category weights sum to exactly 100.
///
/// Callers must not show a final score when this is false. No tolerance is
/// applied, so three categories at 33.33 do not pass.
pub fn validate_category_weights(categories: &[Category]) -> bool {
    category_weight_total(categories) == REQUIRED_TOTAL
}

/// Informational check of the activity weights inside one category.
///
/// An empty list is valid. A single activity must carry the full 100.
/// Averages are computed regardless of the outcome.
pub fn validate_activity_weights(activities: &[Activity]) -> bool {
    match activities {
        [] => true,
        [only] => only.weight == REQUIRED_TOTAL,
        _ => activities.iter().map(|a| a.weight).sum::<f64>() == REQUIRED_TOTAL,
    }
}

pub fn category_weight_total(categories: &[Category]) -> f64 {
    categories.iter().map(|c| c.weight).sum()
}

/// Collect every weight problem at once (not just the first).
/// The first entry, when present, is the one that blocks the final score.
pub fn weight_issues(categories: &[Category]) -> Vec<String> {
    let mut issues = Vec::new();

    if !validate_category_weights(categories) {
        issues.push(format!(
            "Category weights sum to {}, must be exactly {}",
            category_weight_total(categories),
            REQUIRED_TOTAL
        ));
    }

    for category in categories {
        if !validate_activity_weights(&category.activities) {
            issues.push(format!(
                "{}: activity weights sum to {}, expected {}",
                category.name,
                category.activity_weight_total(),
                REQUIRED_TOTAL
            ));
        }
    }

    issues
}
