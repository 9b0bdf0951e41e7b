use serde::{Deserialize, Serialize};

/// Epoch milliseconds.
pub type Timestamp = i64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub is_important: bool,
    pub created_at: Timestamp,
    /// Free-form date text as entered (usually `YYYY-MM-DD`); empty when unset.
    #[serde(default)]
    pub due_date: String,
    pub category: String,
}

/// Opaque styling tokens. The core never interprets them beyond checking that
/// `card_bg` is present on the first loaded record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTheme {
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub card_bg: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub light: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: String,
    pub label: String,
    #[serde(flatten)]
    pub theme: CategoryTheme,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    /// Unknown values fall back to `All`, like the filter menu does.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "active" => Self::Active,
            "completed" => Self::Completed,
            _ => Self::All,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub struct Counts {
    pub active: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct Settings {
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub default_filter: StatusFilter,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: default_language(),
            default_filter: StatusFilter::All,
        }
    }
}

fn default_language() -> String {
    "auto".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SettingsFile {
    pub schema_version: u32,
    pub settings: Settings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_default_values() {
        let settings = Settings::default();
        assert_eq!(settings.language, "auto");
        assert_eq!(settings.default_filter, StatusFilter::All);
    }

    #[test]
    fn settings_serde_applies_defaults_for_missing_fields() {
        let settings: Settings = serde_json::from_str("{}").expect("settings should deserialize");
        assert_eq!(settings, Settings::default());

        let settings: Settings =
            serde_json::from_str(r#"{ "language": "he", "default_filter": "active" }"#)
                .expect("settings should deserialize");
        assert_eq!(settings.language, "he");
        assert_eq!(settings.default_filter, StatusFilter::Active);
    }

    #[test]
    fn task_serializes_with_camel_case_wire_names() {
        let task = Task {
            id: "t1".into(),
            title: "Buy milk".into(),
            completed: false,
            is_important: true,
            created_at: 1_700_000_000_000,
            due_date: "2024-05-01".into(),
            category: "work".into(),
        };
        let value = serde_json::to_value(&task).expect("serialize task");
        assert_eq!(
            value,
            serde_json::json!({
              "id": "t1",
              "title": "Buy milk",
              "completed": false,
              "isImportant": true,
              "createdAt": 1_700_000_000_000_i64,
              "dueDate": "2024-05-01",
              "category": "work"
            })
        );
    }

    #[test]
    fn category_flattens_theme_tokens() {
        let json = r#"
        {
          "id": "work",
          "label": "Work",
          "color": "bg-blue-500",
          "cardBg": "bg-blue-50",
          "text": "text-blue-700",
          "light": "bg-blue-50 text-blue-700"
        }
        "#;
        let category: Category = serde_json::from_str(json).expect("category should deserialize");
        assert_eq!(category.theme.card_bg, "bg-blue-50");
        assert_eq!(category.theme.light, "bg-blue-50 text-blue-700");

        // Legacy records without theme tokens still parse.
        let legacy: Category =
            serde_json::from_str(r#"{ "id": "x", "label": "X", "color": "bg-red-500" }"#)
                .expect("legacy category should deserialize");
        assert_eq!(legacy.theme.card_bg, "");
    }

    #[test]
    fn status_filter_parses_leniently() {
        assert_eq!(StatusFilter::parse_lenient("active"), StatusFilter::Active);
        assert_eq!(StatusFilter::parse_lenient(" Completed "), StatusFilter::Completed);
        assert_eq!(StatusFilter::parse_lenient("all"), StatusFilter::All);
        assert_eq!(StatusFilter::parse_lenient("whatever"), StatusFilter::All);
        assert_eq!(StatusFilter::Active.as_str(), "active");
    }
}
