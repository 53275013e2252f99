//! Pure transforms from stored entities to the lists the surface renders.

use shared::{
    domain::{Category, Task},
    view::{CategoryChoice, CategoryList, CategoryListItem, Selection, TaskListItem},
};

/// ALL first, stored categories in the order given, the add action last.
/// The item matching `selection` is the only one marked selected.
pub fn project_categories(categories: &[Category], selection: &Selection) -> CategoryList {
    let mut items = Vec::with_capacity(categories.len() + 2);
    items.push(CategoryListItem::AllFilter {
        selected: *selection == Selection::All,
    });
    items.extend(categories.iter().map(|category| {
        let selected = selection.category_name() == Some(category.name.as_str());
        CategoryListItem::regular(category.name.clone(), selected)
    }));
    items.push(CategoryListItem::AddAction);
    CategoryList::new(items)
}

pub fn project_tasks(tasks: &[Task]) -> Vec<TaskListItem> {
    tasks.iter().map(TaskListItem::from).collect()
}

/// Options for the task form's category chooser, placeholder first.
pub fn task_form_choices(categories: &CategoryList) -> Vec<CategoryChoice> {
    std::iter::once(CategoryChoice::Placeholder)
        .chain(categories.regular_names().map(CategoryChoice::category))
        .collect()
}

#[cfg(test)]
#[path = "tests/projection_tests.rs"]
mod tests;
