use crate::categories::CategoryRegistry;
use crate::models::{Category, CategoryTheme, Counts, StatusFilter, Task, Timestamp};
use crate::normalize::generate_task_id;
use crate::view;

/// The task collection and category registry. Tasks are kept newest-first.
#[derive(Debug, Clone)]
pub struct AppState {
    tasks: Vec<Task>,
    categories: CategoryRegistry,
}

impl AppState {
    pub fn new(tasks: Vec<Task>, categories: CategoryRegistry) -> Self {
        let mut tasks = tasks;
        for task in &mut tasks {
            if !categories.contains(&task.category) {
                let fallback = categories.first_id().to_string();
                log::debug!(
                    "task id={} references unknown category={}, moved to {}",
                    task.id,
                    task.category,
                    fallback
                );
                task.category = fallback;
            }
        }
        Self { tasks, categories }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn categories(&self) -> &CategoryRegistry {
        &self.categories
    }

    pub fn add_task(
        &mut self,
        title: &str,
        category_id: &str,
        due_date: &str,
        now: Timestamp,
    ) -> Option<Task> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        let task = Task {
            id: generate_task_id(),
            title: title.to_string(),
            completed: false,
            is_important: false,
            created_at: now,
            due_date: due_date.to_string(),
            category: self.categories.resolve(category_id),
        };
        self.tasks.insert(0, task.clone());
        Some(task)
    }

    pub fn toggle_completed(&mut self, task_id: &str) -> bool {
        match self.find_mut(task_id) {
            Some(task) => {
                task.completed = !task.completed;
                true
            }
            None => false,
        }
    }

    pub fn toggle_important(&mut self, task_id: &str) -> bool {
        match self.find_mut(task_id) {
            Some(task) => {
                task.is_important = !task.is_important;
                true
            }
            None => false,
        }
    }

    /// Replaces title, category and due date. `None` when the title is empty
    /// after trimming or no task has `task_id`.
    pub fn edit_task(
        &mut self,
        task_id: &str,
        title: &str,
        category_id: &str,
        due_date: &str,
    ) -> Option<Task> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        let category = self.categories.resolve(category_id);
        let task = self.find_mut(task_id)?;
        task.title = title.to_string();
        task.category = category;
        task.due_date = due_date.to_string();
        Some(task.clone())
    }

    pub fn remove_task(&mut self, task_id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != task_id);
        self.tasks.len() != before
    }

    /// Returns how many tasks were removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| !task.completed);
        before - self.tasks.len()
    }

    pub fn add_category(
        &mut self,
        label: &str,
        theme: CategoryTheme,
        now: Timestamp,
    ) -> Option<Category> {
        self.categories.add(label, theme, now)
    }

    pub fn visible_tasks(&self, query: &str, filter: StatusFilter) -> Vec<&Task> {
        view::visible_tasks(&self.tasks, query, filter)
    }

    pub fn counts(&self) -> Counts {
        view::counts(&self.tasks)
    }

    fn find_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == task_id)
    }
}
