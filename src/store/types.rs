use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::grading::{Activity, Category};

pub const STATE_VERSION: u32 = 1;

/// Shortest id prefix accepted as a reference
const MIN_ID_PREFIX: usize = 4;

/// Application state: the full category list plus bookkeeping.
///
/// All mutations go through this type so range and naming rules are checked
/// in one place. The grading engine only ever sees `categories()`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Gradebook {
    pub version: u32,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// How `update_activity` treats the grade
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradeUpdate {
    Keep,
    Set(f64),
    Clear,
}

impl Default for Gradebook {
    fn default() -> Self {
        Self::new()
    }
}

impl Gradebook {
    pub fn new() -> Self {
        Self {
            version: STATE_VERSION,
            updated_at: None,
            categories: Vec::new(),
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn find_category(&self, reference: &str) -> Result<&Category> {
        let index = resolve(&self.categories, reference, |c| (&c.id, &c.name), "category")?;
        Ok(&self.categories[index])
    }

    pub fn add_category(&mut self, name: &str, weight: f64) -> Result<String> {
        let name = checked_name(name)?;
        check_range("weight", weight)?;

        let category = Category::new(name, weight);
        let id = category.id.clone();
        self.categories.push(category);
        self.touch();
        Ok(id)
    }

    pub fn update_category(
        &mut self,
        reference: &str,
        name: Option<&str>,
        weight: Option<f64>,
    ) -> Result<()> {
        let name = name.map(checked_name).transpose()?;
        if let Some(w) = weight {
            check_range("weight", w)?;
        }

        let category = self.category_mut(reference)?;
        if let Some(name) = name {
            category.name = name;
        }
        if let Some(w) = weight {
            category.weight = w;
        }
        self.touch();
        Ok(())
    }

    pub fn remove_category(&mut self, reference: &str) -> Result<Category> {
        let index = resolve(&self.categories, reference, |c| (&c.id, &c.name), "category")?;
        let removed = self.categories.remove(index);
        self.touch();
        Ok(removed)
    }

    pub fn add_activity(
        &mut self,
        category_ref: &str,
        name: &str,
        weight: f64,
        grade: Option<f64>,
    ) -> Result<String> {
        let name = checked_name(name)?;
        check_range("weight", weight)?;
        if let Some(g) = grade {
            check_range("grade", g)?;
        }

        let activity = Activity::new(name, weight, grade);
        let id = activity.id.clone();
        self.category_mut(category_ref)?.activities.push(activity);
        self.touch();
        Ok(id)
    }

    pub fn update_activity(
        &mut self,
        category_ref: &str,
        activity_ref: &str,
        name: Option<&str>,
        weight: Option<f64>,
        grade: GradeUpdate,
    ) -> Result<()> {
        let name = name.map(checked_name).transpose()?;
        if let Some(w) = weight {
            check_range("weight", w)?;
        }
        if let GradeUpdate::Set(g) = grade {
            check_range("grade", g)?;
        }

        let category = self.category_mut(category_ref)?;
        let index = resolve(&category.activities, activity_ref, |a| (&a.id, &a.name), "activity")?;
        let activity = &mut category.activities[index];

        if let Some(name) = name {
            activity.name = name;
        }
        if let Some(w) = weight {
            activity.weight = w;
        }
        match grade {
            GradeUpdate::Keep => {}
            GradeUpdate::Set(g) => activity.grade = Some(g),
            GradeUpdate::Clear => activity.grade = None,
        }
        self.touch();
        Ok(())
    }

    pub fn remove_activity(&mut self, category_ref: &str, activity_ref: &str) -> Result<Activity> {
        let category = self.category_mut(category_ref)?;
        let index = resolve(&category.activities, activity_ref, |a| (&a.id, &a.name), "activity")?;
        let removed = category.activities.remove(index);
        self.touch();
        Ok(removed)
    }

    /// Drop every category
    pub fn clear(&mut self) {
        self.categories.clear();
        self.touch();
    }

    fn category_mut(&mut self, reference: &str) -> Result<&mut Category> {
        let index = resolve(&self.categories, reference, |c| (&c.id, &c.name), "category")?;
        Ok(&mut self.categories[index])
    }

    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

fn checked_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        bail!("name must not be empty");
    }
    Ok(name.to_string())
}

fn check_range(field: &str, value: f64) -> Result<()> {
    if !(0.0..=100.0).contains(&value) {
        bail!("{} must be between 0 and 100, got {}", field, value);
    }
    Ok(())
}

/// Resolve a user reference to a list position.
///
/// Tried in order: 1-based index, exact id, unique id prefix, then
/// case-insensitive name. Out-of-range numbers still match ids and names.
fn resolve<T, F>(items: &[T], reference: &str, key: F, kind: &str) -> Result<usize>
where
    F: Fn(&T) -> (&String, &String),
{
    let reference = reference.trim();

    let as_index = reference.parse::<usize>().ok();
    if let Some(index) = as_index {
        if index >= 1 && index <= items.len() {
            return Ok(index - 1);
        }
    }

    if let Some(pos) = items.iter().position(|item| key(item).0 == reference) {
        return Ok(pos);
    }

    if reference.len() >= MIN_ID_PREFIX {
        let matches: Vec<usize> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| key(item).0.starts_with(reference))
            .map(|(i, _)| i)
            .collect();
        match matches.as_slice() {
            [only] => return Ok(*only),
            [] => {}
            _ => bail!("{} id prefix '{}' is ambiguous", kind, reference),
        }
    }

    let matches: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| key(item).1.eq_ignore_ascii_case(reference))
        .map(|(i, _)| i)
        .collect();
    match (matches.as_slice(), as_index) {
        ([only], _) => Ok(*only),
        ([], Some(index)) => bail!(
            "Invalid {} index {}. Must be between 1 and {}.",
            kind,
            index,
            items.len()
        ),
        ([], None) => bail!("No {} matches '{}'", kind, reference),
        (_, _) => bail!(
            "{} name '{}' is ambiguous, use the index or id instead",
            kind,
            reference
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_book() -> Gradebook {
        let mut book = Gradebook::new();
        book.add_category("Exams", 40.0).unwrap();
        book.add_category("Homework", 60.0).unwrap();
        book.add_activity("Exams", "Midterm", 50.0, Some(85.0)).unwrap();
        book.add_activity("Exams", "Final", 50.0, None).unwrap();
        book
    }

    #[test]
    fn test_new_book_empty() {
        let book = Gradebook::new();
        assert_eq!(book.version, STATE_VERSION);
        assert!(book.categories().is_empty());
        assert!(book.updated_at.is_none());
    }

    #[test]
    fn test_add_category_keeps_order_and_touches() {
        let book = sample_book();
        let names: Vec<&str> = book.categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Exams", "Homework"]);
        assert!(book.updated_at.is_some());
    }

    #[test]
    fn test_add_category_rejects_out_of_range() {
        let mut book = Gradebook::new();
        assert!(book.add_category("Exams", 101.0).is_err());
        assert!(book.add_category("Exams", -1.0).is_err());
        assert!(book.add_category("Exams", f64::NAN).is_err());
        assert!(book.categories().is_empty());
    }

    #[test]
    fn test_add_category_rejects_blank_name() {
        let mut book = Gradebook::new();
        let err = book.add_category("   ", 10.0).unwrap_err();
        assert!(err.to_string().contains("name must not be empty"));
    }

    #[test]
    fn test_find_category_by_index_id_prefix_and_name() {
        let book = sample_book();
        let id = book.categories()[1].id.clone();

        assert_eq!(book.find_category("2").unwrap().name, "Homework");
        assert_eq!(book.find_category(&id).unwrap().name, "Homework");
        assert_eq!(book.find_category(&id[..8]).unwrap().name, "Homework");
        assert_eq!(book.find_category("homework").unwrap().name, "Homework");
    }

    #[test]
    fn test_find_category_errors() {
        let book = sample_book();
        assert!(book.find_category("3").is_err());
        assert!(book.find_category("0").is_err());
        assert!(book.find_category("Projects").is_err());
    }

    #[test]
    fn test_ambiguous_name() {
        let mut book = Gradebook::new();
        book.add_category("Labs", 50.0).unwrap();
        book.add_category("labs", 50.0).unwrap();
        let err = book.find_category("LABS").unwrap_err();
        assert!(err.to_string().contains("ambiguous"));
    }

    #[test]
    fn test_update_category_keeps_id() {
        let mut book = sample_book();
        let id = book.categories()[0].id.clone();
        book.update_category("Exams", Some("Tests"), Some(50.0)).unwrap();

        let category = &book.categories()[0];
        assert_eq!(category.id, id);
        assert_eq!(category.name, "Tests");
        assert_eq!(category.weight, 50.0);
    }

    #[test]
    fn test_update_category_invalid_weight_changes_nothing() {
        let mut book = sample_book();
        assert!(book.update_category("Exams", Some("Tests"), Some(150.0)).is_err());
        assert_eq!(book.categories()[0].name, "Exams");
        assert_eq!(book.categories()[0].weight, 40.0);
    }

    #[test]
    fn test_remove_category() {
        let mut book = sample_book();
        let removed = book.remove_category("1").unwrap();
        assert_eq!(removed.name, "Exams");
        assert_eq!(book.categories().len(), 1);
    }

    #[test]
    fn test_add_activity_validates_grade() {
        let mut book = sample_book();
        assert!(book.add_activity("Homework", "HW1", 50.0, Some(120.0)).is_err());
        assert!(book.add_activity("Projects", "P1", 50.0, None).is_err());
        assert!(book.categories()[1].activities.is_empty());
    }

    #[test]
    fn test_update_activity_grade_modes() {
        let mut book = sample_book();

        book.update_activity("Exams", "Final", None, None, GradeUpdate::Set(92.0))
            .unwrap();
        assert_eq!(book.categories()[0].activities[1].grade, Some(92.0));

        book.update_activity("Exams", "Final", Some("Final Exam"), None, GradeUpdate::Keep)
            .unwrap();
        let activity = &book.categories()[0].activities[1];
        assert_eq!(activity.name, "Final Exam");
        assert_eq!(activity.grade, Some(92.0));

        book.update_activity("Exams", "2", None, Some(60.0), GradeUpdate::Clear)
            .unwrap();
        let activity = &book.categories()[0].activities[1];
        assert_eq!(activity.grade, None);
        assert_eq!(activity.weight, 60.0);
    }

    #[test]
    fn test_update_activity_rejects_bad_grade() {
        let mut book = sample_book();
        assert!(book
            .update_activity("Exams", "Midterm", None, None, GradeUpdate::Set(-5.0))
            .is_err());
        assert_eq!(book.categories()[0].activities[0].grade, Some(85.0));
    }

    #[test]
    fn test_remove_activity() {
        let mut book = sample_book();
        let removed = book.remove_activity("Exams", "Midterm").unwrap();
        assert_eq!(removed.grade, Some(85.0));
        assert_eq!(book.categories()[0].activities.len(), 1);
        assert!(book.remove_activity("Exams", "Midterm").is_err());
    }

    #[test]
    fn test_clear() {
        let mut book = sample_book();
        book.clear();
        assert!(book.categories().is_empty());
    }
}
