use shared::{
    domain::{Category, NewTask, Task, TaskId},
    view::CategoryChoice,
};

use crate::error::ValidationError;

/// Task input that passed validation: trimmed name, known category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub name: String,
    pub category: String,
}

impl TaskDraft {
    pub fn into_new_task(self) -> NewTask {
        NewTask::new(self.name, self.category)
    }

    pub fn into_task(self, id: TaskId) -> Task {
        self.into_new_task().with_id(id)
    }
}

pub fn is_valid_task_input(name: &str, choice: &CategoryChoice, known: &[Category]) -> bool {
    validate_task_input(name, choice, known).is_ok()
}

/// Shared by the create and update paths.
pub fn validate_task_input(
    name: &str,
    choice: &CategoryChoice,
    known: &[Category],
) -> Result<TaskDraft, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::BlankTaskName);
    }
    let CategoryChoice::Category(category) = choice else {
        return Err(ValidationError::MissingCategory);
    };
    if !known.iter().any(|c| &c.name == category) {
        return Err(ValidationError::UnknownCategory(category.clone()));
    }
    Ok(TaskDraft {
        name: name.to_string(),
        category: category.clone(),
    })
}

/// Returns the trimmed name to store.
pub fn validate_category_name(name: &str, known: &[Category]) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::BlankCategoryName);
    }
    if known.iter().any(|c| c.name == name) {
        return Err(ValidationError::DuplicateCategory(name.to_string()));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known() -> Vec<Category> {
        vec![Category::new("Work"), Category::new("Home")]
    }

    #[test]
    fn accepts_trimmed_name_and_known_category() {
        let draft = validate_task_input("  Write report ", &CategoryChoice::category("Work"), &known())
            .expect("valid");
        assert_eq!(
            draft,
            TaskDraft {
                name: "Write report".into(),
                category: "Work".into(),
            }
        );
        assert_eq!(draft.into_task(TaskId(4)).id, TaskId(4));
    }

    #[test]
    fn rejects_blank_name_before_looking_at_category() {
        assert_eq!(
            validate_task_input("   ", &CategoryChoice::Placeholder, &known()),
            Err(ValidationError::BlankTaskName)
        );
    }

    #[test]
    fn rejects_placeholder_and_unknown_categories() {
        assert_eq!(
            validate_task_input("Ship", &CategoryChoice::Placeholder, &known()),
            Err(ValidationError::MissingCategory)
        );
        assert_eq!(
            validate_task_input("Ship", &CategoryChoice::category("work"), &known()),
            Err(ValidationError::UnknownCategory("work".into()))
        );
        assert!(!is_valid_task_input("Ship", &CategoryChoice::category("Select"), &known()));
    }

    #[test]
    fn category_names_must_be_present_and_unique() {
        assert_eq!(
            validate_category_name(" ", &known()),
            Err(ValidationError::BlankCategoryName)
        );
        assert_eq!(
            validate_category_name("Work ", &known()),
            Err(ValidationError::DuplicateCategory("Work".into()))
        );
        assert_eq!(validate_category_name("work", &known()), Ok("work".into()));
        assert_eq!(validate_category_name("ALL", &known()), Ok("ALL".into()));
    }
}
