use super::lenient::finite_or_zero;
use super::types::{Activity, CalculationResult, Category, GradeReport};

/// Weighted average of the graded activities, 0-100.
///
/// Ungraded activities are skipped entirely. Weights act as ratios, so they
/// do not need to sum to 100. Returns 0 when nothing is graded or the graded
/// weights sum to 0.
pub fn average_of_activities(activities: &[Activity]) -> f64 {
    let (weighted_sum, total_weight) = activities
        .iter()
        .filter_map(|a| a.grade.map(|g| (finite_or_zero(g), finite_or_zero(a.weight))))
        .fold((0.0, 0.0), |(sum, total), (grade, weight)| {
            (sum + grade * weight, total + weight)
        });

    if total_weight == 0.0 {
        return 0.0;
    }
    weighted_sum / total_weight
}

/// A category's contribution on a 0-100 scale.
pub fn points_from_average(average: f64, category_weight: f64) -> f64 {
    (average * category_weight) / 100.0
}

pub fn compute_results(categories: &[Category]) -> GradeReport {
    let results: Vec<CalculationResult> = categories.iter().map(category_result).collect();
    let total_points = results.iter().map(|r| r.points).sum::<f64>() / 10.0;

    GradeReport {
        results,
        total_points,
    }
}

fn category_result(category: &Category) -> CalculationResult {
    let average = category_average(&category.activities);
    let points = points_from_average(average, finite_or_zero(category.weight));

    CalculationResult {
        category_id: category.id.clone(),
        category_name: category.name.clone(),
        category_weight: category.weight,
        average,
        points,
        base10_points: points / 10.0,
    }
}

fn category_average(activities: &[Activity]) -> f64 {
    match activities {
        // A lone activity is the whole category, whatever weight it declares
        [only] => only.grade.map(finite_or_zero).unwrap_or(0.0),
        _ => average_of_activities(activities),
    }
}
