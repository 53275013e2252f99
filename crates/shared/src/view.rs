//! Read models published to the presentation surface.

use serde::{Deserialize, Serialize};

use crate::domain::{Task, TaskId};

pub const ALL_FILTER_LABEL: &str = "ALL";
pub const ADD_ACTION_LABEL: &str = "+";
pub const PLACEHOLDER_LABEL: &str = "Select";

/// Which category filter is active. Owned by the controller, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Selection {
    #[default]
    All,
    Category(String),
}

impl Selection {
    pub fn category_name(&self) -> Option<&str> {
        match self {
            Selection::All => None,
            Selection::Category(name) => Some(name.as_str()),
        }
    }
}

/// One row of the category strip. The pseudo-categories are their own
/// variants, so a real category called "ALL" or "+" never collides with them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CategoryListItem {
    AllFilter { selected: bool },
    Regular { name: String, selected: bool },
    AddAction,
}

impl CategoryListItem {
    pub fn regular(name: impl Into<String>, selected: bool) -> Self {
        CategoryListItem::Regular {
            name: name.into(),
            selected,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            CategoryListItem::AllFilter { .. } => ALL_FILTER_LABEL,
            CategoryListItem::Regular { name, .. } => name.as_str(),
            CategoryListItem::AddAction => ADD_ACTION_LABEL,
        }
    }

    pub fn is_selected(&self) -> bool {
        match self {
            CategoryListItem::AllFilter { selected } => *selected,
            CategoryListItem::Regular { selected, .. } => *selected,
            CategoryListItem::AddAction => false,
        }
    }

    /// Only real categories can be deleted; the surface should not even ask
    /// for confirmation on the pseudo-categories.
    pub fn is_deletable(&self) -> bool {
        matches!(self, CategoryListItem::Regular { .. })
    }

    /// The filter this item stands for, `None` for the add action.
    pub fn as_selection(&self) -> Option<Selection> {
        match self {
            CategoryListItem::AllFilter { .. } => Some(Selection::All),
            CategoryListItem::Regular { name, .. } => Some(Selection::Category(name.clone())),
            CategoryListItem::AddAction => None,
        }
    }
}

/// The projected category strip: ALL first, stored categories in store
/// order, the add action last. Surfaces may select by index.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryList {
    pub items: Vec<CategoryListItem>,
}

impl CategoryList {
    pub fn new(items: Vec<CategoryListItem>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CategoryListItem> {
        self.items.get(index)
    }

    /// No user category exists yet: the surface shows the first-category
    /// prompt instead of the strip and hides task creation.
    pub fn is_empty_state(&self) -> bool {
        !self.items.iter().any(CategoryListItem::is_deletable)
    }

    pub fn selected(&self) -> Option<&CategoryListItem> {
        self.items.iter().find(|item| item.is_selected())
    }

    pub fn regular_names(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match item {
            CategoryListItem::Regular { name, .. } => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn find_regular(&self, name: &str) -> Option<&CategoryListItem> {
        self.items
            .iter()
            .find(|item| matches!(item, CategoryListItem::Regular { name: n, .. } if n == name))
    }

    pub fn all_filter(&self) -> Option<&CategoryListItem> {
        self.items
            .iter()
            .find(|item| matches!(item, CategoryListItem::AllFilter { .. }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskListItem {
    pub id: TaskId,
    pub name: String,
    pub category: String,
}

impl From<&Task> for TaskListItem {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            name: task.name.clone(),
            category: task.category.clone(),
        }
    }
}

impl From<&TaskListItem> for Task {
    fn from(item: &TaskListItem) -> Self {
        Task {
            id: item.id,
            name: item.name.clone(),
            category: item.category.clone(),
        }
    }
}

/// Value of the task form's category chooser.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum CategoryChoice {
    /// Nothing picked yet; never valid for submission.
    #[default]
    Placeholder,
    Category(String),
}

impl CategoryChoice {
    pub fn category(name: impl Into<String>) -> Self {
        CategoryChoice::Category(name.into())
    }

    /// Preselection when editing an existing task.
    pub fn for_task(task: &TaskListItem) -> Self {
        CategoryChoice::Category(task.category.clone())
    }

    pub fn label(&self) -> &str {
        match self {
            CategoryChoice::Placeholder => PLACEHOLDER_LABEL,
            CategoryChoice::Category(name) => name.as_str(),
        }
    }
}

impl From<Option<String>> for CategoryChoice {
    fn from(value: Option<String>) -> Self {
        value.map_or(CategoryChoice::Placeholder, CategoryChoice::Category)
    }
}
