use chrono::Utc;

use crate::categories::{parse_categories, CategoryRegistry};
use crate::i18n::{labels, Labels, Language};
use crate::models::{Category, CategoryTheme, Counts, StatusFilter, Task, Timestamp};
use crate::normalize::{parse_tasks, serialize_tasks};
use crate::notify::{NotificationKind, Notifier};
use crate::state::AppState;
use crate::storage::{KeyValueStore, StorageError, CATEGORIES_KEY, TASKS_KEY};

#[derive(Debug, serde::Serialize)]
pub struct CommandResult<T> {
    pub ok: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

pub fn ok<T>(data: T) -> CommandResult<T> {
    CommandResult {
        ok: true,
        data: Some(data),
        error: None,
    }
}

pub fn err<T>(message: &str) -> CommandResult<T> {
    CommandResult {
        ok: false,
        data: None,
        error: Some(message.to_string()),
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct StateSnapshot {
    pub tasks: Vec<Task>,
    pub categories: Vec<Category>,
    pub counts: Counts,
}

pub fn now_millis() -> Timestamp {
    Utc::now().timestamp_millis()
}

/// Owns the application state and drives every mutation through persistence
/// and notification. Saves are write-through and best-effort: a failed save is
/// logged and the in-memory change stays.
pub struct Controller<S: KeyValueStore, N: Notifier> {
    state: AppState,
    store: S,
    notifier: N,
    labels: Labels,
}

impl<S: KeyValueStore, N: Notifier> Controller<S, N> {
    /// Loads both collections from `store`. Never fails: missing or corrupt
    /// data falls back to an empty task list and the default categories.
    pub fn load(store: S, notifier: N, lang: Language) -> Self {
        let now = now_millis();
        let categories = parse_categories(read_key(&store, CATEGORIES_KEY).as_deref(), lang);
        let tasks = read_key(&store, TASKS_KEY)
            .map(|text| parse_tasks(&text, now))
            .unwrap_or_default();
        log::info!(
            "state loaded tasks={} categories={}",
            tasks.len(),
            categories.len()
        );
        Self::with_state(
            AppState::new(tasks, CategoryRegistry::new(categories)),
            store,
            notifier,
            lang,
        )
    }

    pub fn with_state(state: AppState, store: S, notifier: N, lang: Language) -> Self {
        Self {
            state,
            store,
            notifier,
            labels: labels(lang),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            tasks: self.state.tasks().to_vec(),
            categories: self.state.categories().list().to_vec(),
            counts: self.state.counts(),
        }
    }

    pub fn add_task(&mut self, title: &str, category_id: &str, due_date: &str) -> Option<Task> {
        let task = self
            .state
            .add_task(title, category_id, due_date, now_millis())?;
        log::info!("task added id={} category={}", task.id, task.category);
        self.persist_tasks();
        self.notifier
            .notify(self.labels.task_added, NotificationKind::Success);
        Some(task)
    }

    pub fn add_category(&mut self, label: &str, theme: CategoryTheme) -> Option<Category> {
        let category = self.state.add_category(label, theme, now_millis())?;
        log::info!("category added id={}", category.id);
        self.persist_categories();
        self.notifier.notify(
            &self.labels.category_added(&category.label),
            NotificationKind::Success,
        );
        Some(category)
    }

    pub fn toggle_completed(&mut self, task_id: &str) -> bool {
        if !self.state.toggle_completed(task_id) {
            return false;
        }
        self.persist_tasks();
        true
    }

    pub fn toggle_important(&mut self, task_id: &str) -> bool {
        if !self.state.toggle_important(task_id) {
            return false;
        }
        self.persist_tasks();
        true
    }

    pub fn edit_task(
        &mut self,
        task_id: &str,
        title: &str,
        category_id: &str,
        due_date: &str,
    ) -> Option<Task> {
        let task = self.state.edit_task(task_id, title, category_id, due_date)?;
        log::info!("task edited id={}", task.id);
        self.persist_tasks();
        self.notifier
            .notify(self.labels.task_updated, NotificationKind::Success);
        Some(task)
    }

    pub fn delete_task(&mut self, task_id: &str) -> bool {
        if !self.state.remove_task(task_id) {
            return false;
        }
        log::info!("task deleted id={task_id}");
        self.persist_tasks();
        self.notifier
            .notify(self.labels.task_deleted, NotificationKind::Neutral);
        true
    }

    pub fn clear_completed(&mut self) -> usize {
        let removed = self.state.clear_completed();
        if removed == 0 {
            return 0;
        }
        log::info!("completed tasks cleared count={removed}");
        self.persist_tasks();
        self.notifier.notify(
            &self.labels.tasks_cleared(removed),
            NotificationKind::Neutral,
        );
        removed
    }

    pub fn visible_tasks(&self, query: &str, filter: StatusFilter) -> Vec<&Task> {
        self.state.visible_tasks(query, filter)
    }

    pub fn counts(&self) -> Counts {
        self.state.counts()
    }

    fn persist_tasks(&self) {
        let result = serialize_tasks(self.state.tasks())
            .map_err(StorageError::from)
            .and_then(|text| self.store.save(TASKS_KEY, &text));
        if let Err(error) = result {
            log::warn!("failed to save tasks: {error}");
        }
    }

    fn persist_categories(&self) {
        let result = serde_json::to_string(self.state.categories().list())
            .map_err(StorageError::from)
            .and_then(|text| self.store.save(CATEGORIES_KEY, &text));
        if let Err(error) = result {
            log::warn!("failed to save categories: {error}");
        }
    }
}

fn read_key(store: &impl KeyValueStore, key: &str) -> Option<String> {
    match store.load(key) {
        Ok(text) => text,
        Err(error) => {
            log::warn!("failed to read {key}: {error}");
            None
        }
    }
}
