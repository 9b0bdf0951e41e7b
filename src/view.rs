use crate::models::{Counts, StatusFilter, Task};

/// Derives the displayed list: status filter, then case-insensitive title
/// search, then important tasks first. Relative order inside each group is the
/// input order.
pub fn visible_tasks<'a>(tasks: &'a [Task], query: &str, filter: StatusFilter) -> Vec<&'a Task> {
    let needle = query.trim().to_lowercase();
    let mut visible: Vec<&Task> = tasks
        .iter()
        .filter(|task| filter.matches(task))
        .filter(|task| needle.is_empty() || task.title.to_lowercase().contains(&needle))
        .collect();
    // `sort_by_key` is stable.
    visible.sort_by_key(|task| !task.is_important);
    visible
}

pub fn counts(tasks: &[Task]) -> Counts {
    let completed = tasks.iter().filter(|task| task.completed).count();
    Counts {
        active: tasks.len() - completed,
        completed,
    }
}
