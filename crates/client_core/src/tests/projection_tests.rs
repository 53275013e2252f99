use super::*;
use proptest::prelude::*;
use shared::domain::TaskId;

fn categories(names: &[&str]) -> Vec<Category> {
    names.iter().map(|name| Category::new(*name)).collect()
}

#[test]
fn empty_store_projects_only_pseudo_categories() {
    let list = project_categories(&[], &Selection::All);
    assert_eq!(
        list.items,
        vec![
            CategoryListItem::AllFilter { selected: true },
            CategoryListItem::AddAction,
        ]
    );
    assert!(list.is_empty_state());
}

#[test]
fn marks_only_the_selected_regular_category() {
    let list = project_categories(
        &categories(&["Work", "Home"]),
        &Selection::Category("Home".into()),
    );
    assert_eq!(
        list.items,
        vec![
            CategoryListItem::AllFilter { selected: false },
            CategoryListItem::regular("Work", false),
            CategoryListItem::regular("Home", true),
            CategoryListItem::AddAction,
        ]
    );
}

#[test]
fn category_named_all_is_not_the_all_filter() {
    let list = project_categories(&categories(&["ALL", "+"]), &Selection::All);
    assert_eq!(list.len(), 4);
    assert_eq!(list.get(0), Some(&CategoryListItem::AllFilter { selected: true }));
    assert_eq!(list.get(1), Some(&CategoryListItem::regular("ALL", false)));
    assert_eq!(list.get(2), Some(&CategoryListItem::regular("+", false)));
    assert_eq!(list.get(3), Some(&CategoryListItem::AddAction));
}

#[test]
fn task_projection_keeps_input_order() {
    let tasks = vec![
        Task {
            id: TaskId(9),
            name: "later".into(),
            category: "Home".into(),
        },
        Task {
            id: TaskId(2),
            name: "earlier".into(),
            category: "Work".into(),
        },
    ];
    let rows = project_tasks(&tasks);
    let ids: Vec<TaskId> = rows.iter().map(|row| row.id).collect();
    assert_eq!(ids, [TaskId(9), TaskId(2)]);
    assert_eq!(rows[1].name, "earlier");
    assert_eq!(rows[1].category, "Work");
}

#[test]
fn form_choices_start_with_placeholder() {
    let list = project_categories(&categories(&["Work", "Home"]), &Selection::All);
    assert_eq!(
        task_form_choices(&list),
        vec![
            CategoryChoice::Placeholder,
            CategoryChoice::category("Work"),
            CategoryChoice::category("Home"),
        ]
    );
}

proptest! {
    #[test]
    fn prop_strip_is_bracketed_by_pseudo_categories(
        names in prop::collection::hash_set("[A-Za-z+]{1,8}", 0..12),
        pick in any::<prop::sample::Index>(),
    ) {
        let names: Vec<String> = names.into_iter().collect();
        let stored: Vec<Category> = names.iter().cloned().map(Category::new).collect();
        let selection = if names.is_empty() {
            Selection::All
        } else {
            Selection::Category(names[pick.index(names.len())].clone())
        };

        let list = project_categories(&stored, &selection);

        prop_assert_eq!(list.len(), names.len() + 2);
        prop_assert_eq!(list.items.first(), list.all_filter());
        prop_assert_eq!(list.items.last(), Some(&CategoryListItem::AddAction));
        let middle: Vec<&str> = list.regular_names().collect();
        let expected: Vec<&str> = names.iter().map(String::as_str).collect();
        prop_assert_eq!(middle, expected);
        prop_assert_eq!(list.items.iter().filter(|item| item.is_selected()).count(), 1);
        prop_assert_eq!(list.selected().and_then(CategoryListItem::as_selection), Some(selection));
    }
}
