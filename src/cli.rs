//! Command-line front end over the task controller.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use crate::categories::{swatch, DEFAULT_SWATCH, PALETTE};
use crate::commands::Controller;
use crate::config::{save_settings, DATA_DIR_ENV};
use crate::i18n::normalize_language_setting;
use crate::models::{Settings, StatusFilter, Task};
use crate::notify::{Notification, NotificationLog};
use crate::state::AppState;
use crate::storage::KeyValueStore;

/// todo-board - a categorized local task list
#[derive(Parser, Debug)]
#[command(name = "todo-board")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the task, category and settings files
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    pub data_dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Message language for this run: auto, he, en
    #[arg(long, global = true)]
    pub lang: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a task
    Add {
        title: String,

        /// Category id; unknown ids fall back to the first category
        #[arg(short, long, default_value = "")]
        category: String,

        /// Due date (YYYY-MM-DD)
        #[arg(short, long, default_value = "")]
        due: String,
    },

    /// Show tasks, important first
    List {
        /// Case-insensitive title search
        #[arg(short, long, default_value = "")]
        query: String,

        /// all, active or completed (defaults to the configured filter)
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Show active and completed totals
    Counts,

    /// Toggle a task between active and completed
    Toggle {
        /// Task id or unique id prefix
        id: String,
    },

    /// Toggle the important flag of a task
    Star {
        /// Task id or unique id prefix
        id: String,
    },

    /// Edit title, category and due date of a task
    Edit {
        /// Task id or unique id prefix
        id: String,

        /// New title (keeps the current one when omitted)
        #[arg(short, long)]
        title: Option<String>,

        /// New category id (keeps the current one when omitted)
        #[arg(short, long)]
        category: Option<String>,

        /// New due date, or "" to clear (keeps the current one when omitted)
        #[arg(short, long)]
        due: Option<String>,
    },

    /// Delete a task
    Delete {
        /// Task id or unique id prefix
        id: String,
    },

    /// Delete every completed task
    ClearCompleted,

    /// Category management
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Show or change persisted settings
    Settings {
        /// auto, he or en
        #[arg(long)]
        language: Option<String>,

        /// Filter used by `list` when none is given
        #[arg(long)]
        default_filter: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// List categories
    List,

    /// Add a category
    Add {
        label: String,

        /// Palette color: red, orange, amber, emerald, teal, cyan, blue,
        /// indigo, violet, fuchsia, pink, rose
        #[arg(long, default_value = DEFAULT_SWATCH)]
        color: String,
    },
}

/// What a command produced: machine-readable data plus the lines shown to a
/// human.
#[derive(Debug, Default)]
pub struct Rendered {
    pub data: Value,
    pub lines: Vec<String>,
}

impl Rendered {
    fn new(data: Value) -> Self {
        Self {
            data,
            lines: Vec::new(),
        }
    }

    fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }
}

/// Runs one command against the controller. `Err` carries a message for
/// arguments the presentation layer rejects before reaching the core.
pub fn execute<S: KeyValueStore>(
    command: &Commands,
    controller: &mut Controller<S, NotificationLog>,
    settings: &mut Settings,
) -> Result<Rendered, String> {
    match command {
        Commands::Add {
            title,
            category,
            due,
        } => {
            let due = parse_due(due)?;
            Ok(match controller.add_task(title, category, &due) {
                Some(task) => {
                    let line = format_task(controller.state(), &task);
                    Rendered::new(json!({ "task": task })).line(line)
                }
                None => Rendered::new(json!({ "task": null })).line("Nothing added: title is empty"),
            })
        }
        Commands::List { query, filter } => {
            let filter = filter
                .as_deref()
                .map(StatusFilter::parse_lenient)
                .unwrap_or(settings.default_filter);
            let state = controller.state();
            let visible = controller.visible_tasks(query, filter);
            let lines = if visible.is_empty() {
                vec!["No tasks".to_string()]
            } else {
                visible.iter().map(|task| format_task(state, task)).collect()
            };
            Ok(Rendered {
                data: json!({
                    "filter": filter,
                    "query": query,
                    "tasks": visible,
                    "counts": controller.counts(),
                }),
                lines,
            })
        }
        Commands::Counts => {
            let counts = controller.counts();
            Ok(Rendered::new(json!(counts)).line(format!(
                "{} active, {} completed",
                counts.active, counts.completed
            )))
        }
        Commands::Toggle { id } => {
            let id = resolve_task_id(controller.state().tasks(), id);
            let changed = controller.toggle_completed(&id);
            Ok(changed_output(controller.state(), &id, changed))
        }
        Commands::Star { id } => {
            let id = resolve_task_id(controller.state().tasks(), id);
            let changed = controller.toggle_important(&id);
            Ok(changed_output(controller.state(), &id, changed))
        }
        Commands::Edit {
            id,
            title,
            category,
            due,
        } => {
            let id = resolve_task_id(controller.state().tasks(), id);
            let Some(current) = controller
                .state()
                .tasks()
                .iter()
                .find(|task| task.id == id)
                .cloned()
            else {
                return Ok(changed_output(controller.state(), &id, false));
            };
            let due = match due {
                Some(due) => parse_due(due)?,
                None => current.due_date.clone(),
            };
            let title = title.clone().unwrap_or(current.title);
            let category = category.clone().unwrap_or(current.category);
            Ok(match controller.edit_task(&id, &title, &category, &due) {
                Some(task) => {
                    let line = format_task(controller.state(), &task);
                    Rendered::new(json!({ "task": task })).line(line)
                }
                None => Rendered::new(json!({ "task": null })).line("Nothing changed: title is empty"),
            })
        }
        Commands::Delete { id } => {
            let id = resolve_task_id(controller.state().tasks(), id);
            let changed = controller.delete_task(&id);
            let output = Rendered::new(json!({ "id": id, "changed": changed }));
            Ok(if changed {
                output
            } else {
                output.line(format!("No task matched {id}"))
            })
        }
        Commands::ClearCompleted => {
            let removed = controller.clear_completed();
            let output = Rendered::new(json!({ "removed": removed }));
            Ok(if removed == 0 {
                output.line("No completed tasks")
            } else {
                output
            })
        }
        Commands::Category(CategoryCommands::List) => {
            let categories = controller.state().categories().list();
            let lines = categories
                .iter()
                .map(|category| format!("{:<16} {}", category.id, category.label))
                .collect();
            Ok(Rendered {
                data: json!({ "categories": categories }),
                lines,
            })
        }
        Commands::Category(CategoryCommands::Add { label, color }) => {
            let Some(swatch) = swatch(color) else {
                let known: Vec<_> = PALETTE.iter().map(|s| s.id).collect();
                return Err(format!(
                    "unknown color {color:?}, expected one of: {}",
                    known.join(", ")
                ));
            };
            Ok(match controller.add_category(label, swatch.theme()) {
                Some(category) => {
                    let line = format!("{:<16} {}", category.id, category.label);
                    Rendered::new(json!({ "category": category })).line(line)
                }
                None => Rendered::new(json!({ "category": null })).line("Nothing added: label is empty"),
            })
        }
        Commands::Settings {
            language,
            default_filter,
        } => {
            let mut changed = false;
            if let Some(language) = language {
                settings.language = normalize_language_setting(language);
                changed = true;
            }
            if let Some(filter) = default_filter {
                settings.default_filter = StatusFilter::parse_lenient(filter);
                changed = true;
            }
            if changed {
                save_settings(controller.store(), settings)
                    .map_err(|error| format!("failed to save settings: {error}"))?;
            }
            Ok(Rendered::new(json!({ "settings": settings })).line(format!(
                "language={} default_filter={}",
                settings.language,
                settings.default_filter.as_str()
            )))
        }
    }
}

/// Accepts an empty string (no due date) or a `YYYY-MM-DD` date.
pub fn parse_due(value: &str) -> Result<String, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(String::new());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| date.format("%Y-%m-%d").to_string())
        .map_err(|_| format!("invalid due date {value:?}, expected YYYY-MM-DD"))
}

/// Expands a unique id prefix to the full id. Anything else is returned
/// unchanged and treated as an unknown id by the core.
pub fn resolve_task_id(tasks: &[Task], input: &str) -> String {
    let input = input.trim();
    if input.is_empty() || tasks.iter().any(|task| task.id == input) {
        return input.to_string();
    }
    let mut matches = tasks.iter().filter(|task| task.id.starts_with(input));
    match (matches.next(), matches.next()) {
        (Some(task), None) => task.id.clone(),
        _ => input.to_string(),
    }
}

pub fn format_task(state: &AppState, task: &Task) -> String {
    let mark = if task.completed { "[x]" } else { "[ ]" };
    let star = if task.is_important { "* " } else { "" };
    let category = state
        .categories()
        .get(&task.category)
        .map(|category| category.label.as_str())
        .unwrap_or(task.category.as_str());
    let due = if task.due_date.is_empty() {
        String::new()
    } else {
        format!(" due {}", task.due_date)
    };
    let short_id: String = task.id.chars().take(8).collect();
    format!("{mark} {star}{}  [{category}]{due}  ({short_id})", task.title)
}

fn changed_output(state: &AppState, id: &str, changed: bool) -> Rendered {
    match state.tasks().iter().find(|task| task.id == id) {
        Some(task) if changed => {
            Rendered::new(json!({ "task": task, "changed": true })).line(format_task(state, task))
        }
        _ => Rendered::new(json!({ "id": id, "changed": false }))
            .line(format!("No task matched {id}")),
    }
}

/// Appends the notifications raised while the command ran.
pub fn with_notifications(mut rendered: Rendered, notifications: Vec<Notification>) -> Rendered {
    for notification in &notifications {
        rendered.lines.push(format!("> {}", notification.message));
    }
    if let Value::Object(map) = &mut rendered.data {
        map.insert("notifications".to_string(), json!(notifications));
    }
    rendered
}
