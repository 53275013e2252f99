//! Plain-text rendering of the published board.

use client_core::{BoardSnapshot, Notice, NoticeKind};
use shared::view::{CategoryList, CategoryListItem, TaskListItem};

pub fn board(snapshot: &BoardSnapshot) -> String {
    let mut out = String::new();
    if snapshot.categories.is_empty_state() {
        out.push_str("No categories yet. Create one with `taskboard add-category <name>`.\n");
    } else {
        out.push_str(&categories(&snapshot.categories));
        out.push('\n');
    }
    out.push_str(&tasks(&snapshot.tasks));
    out
}

pub fn categories(list: &CategoryList) -> String {
    let labels: Vec<String> = list
        .items
        .iter()
        .map(|item| match item {
            CategoryListItem::AddAction => format!("[{}]", item.label()),
            _ if item.is_selected() => format!("*{}*", item.label()),
            _ => item.label().to_string(),
        })
        .collect();
    format!("Categories: {}", labels.join("  "))
}

pub fn tasks(tasks: &[TaskListItem]) -> String {
    if tasks.is_empty() {
        return "No tasks.\n".to_string();
    }
    let id_width = tasks
        .iter()
        .map(|t| t.id.to_string().len())
        .max()
        .unwrap_or(1);
    let name_width = tasks.iter().map(|t| t.name.chars().count()).max().unwrap_or(0);

    let mut out = String::from("Tasks:\n");
    for task in tasks {
        out.push_str(&format!(
            "  #{:<id_width$}  {:<name_width$}  ({})\n",
            task.id.0, task.name, task.category
        ));
    }
    out
}

pub fn notice(notice: &Notice) -> String {
    match notice.kind() {
        NoticeKind::Validation => format!("! {}", notice.message()),
        NoticeKind::Persistence => format!("error: {}", notice.message()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::TaskId;

    #[test]
    fn marks_the_selected_category() {
        let list = CategoryList::new(vec![
            CategoryListItem::AllFilter { selected: false },
            CategoryListItem::regular("Work", true),
            CategoryListItem::AddAction,
        ]);
        assert_eq!(categories(&list), "Categories: ALL  *Work*  [+]");
    }

    #[test]
    fn aligns_task_rows() {
        let rows = vec![
            TaskListItem {
                id: TaskId(1),
                name: "Write notes".into(),
                category: "Work".into(),
            },
            TaskListItem {
                id: TaskId(12),
                name: "Buy".into(),
                category: "Home".into(),
            },
        ];
        assert_eq!(
            tasks(&rows),
            "Tasks:\n  #1   Write notes  (Work)\n  #12  Buy          (Home)\n"
        );
    }

    #[test]
    fn empty_board_prompts_for_a_category() {
        let snapshot = BoardSnapshot {
            categories: CategoryList::new(vec![
                CategoryListItem::AllFilter { selected: true },
                CategoryListItem::AddAction,
            ]),
            tasks: Vec::new(),
        };
        assert!(board(&snapshot).starts_with("No categories yet."));
        assert!(board(&snapshot).ends_with("No tasks.\n"));
    }
}
