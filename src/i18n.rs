use sys_locale::get_locale;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    He,
    En,
}

/// Resolves the `language` setting; `auto` and unknown values follow the
/// system locale.
pub fn resolve_language(setting: &str) -> Language {
    match normalize_language_setting(setting).as_str() {
        "he" => Language::He,
        "en" => Language::En,
        _ => detect_system_language(),
    }
}

/// Canonical form of a user-supplied language setting.
pub fn normalize_language_setting(setting: &str) -> String {
    let normalized = setting.trim().to_lowercase();
    match normalized.as_str() {
        "auto" | "he" | "en" => normalized,
        _ => "auto".to_string(),
    }
}

fn detect_system_language() -> Language {
    language_for_locale(&get_locale().unwrap_or_default())
}

fn language_for_locale(locale: &str) -> Language {
    let locale = locale.to_lowercase();
    // `iw` is the legacy code some platforms still report for Hebrew.
    if locale.starts_with("he") || locale.starts_with("iw") {
        Language::He
    } else {
        Language::En
    }
}

pub struct Labels {
    pub task_added: &'static str,
    pub task_updated: &'static str,
    pub task_deleted: &'static str,
    category_added: (&'static str, &'static str),
    tasks_cleared: (&'static str, &'static str),
    pub default_categories: [&'static str; 4],
}

impl Labels {
    pub fn category_added(&self, label: &str) -> String {
        let (prefix, suffix) = self.category_added;
        format!("{prefix}\"{label}\"{suffix}")
    }

    pub fn tasks_cleared(&self, count: usize) -> String {
        let (prefix, suffix) = self.tasks_cleared;
        format!("{prefix}{count}{suffix}")
    }
}

pub fn labels(lang: Language) -> Labels {
    match lang {
        Language::He => Labels {
            task_added: "משימה חדשה נוספה!",
            task_updated: "המשימה עודכנה",
            task_deleted: "המשימה נמחקה",
            category_added: ("קטגוריה ", " נוספה!"),
            tasks_cleared: ("", " משימות נמחקו"),
            default_categories: ["עבודה", "לימודים", "אישי", "כללי"],
        },
        Language::En => Labels {
            task_added: "New task added!",
            task_updated: "Task updated",
            task_deleted: "Task deleted",
            category_added: ("Category ", " added!"),
            tasks_cleared: ("", " tasks deleted"),
            default_categories: ["Work", "Study", "Personal", "General"],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_settings_win_over_locale() {
        assert_eq!(resolve_language("he"), Language::He);
        assert_eq!(resolve_language(" EN "), Language::En);
    }

    #[test]
    fn unknown_setting_normalizes_to_auto() {
        assert_eq!(normalize_language_setting("fr"), "auto");
        assert_eq!(normalize_language_setting("He"), "he");
        assert_eq!(normalize_language_setting(""), "auto");
    }

    #[test]
    fn locale_detection_maps_hebrew_codes() {
        assert_eq!(language_for_locale("he-IL"), Language::He);
        assert_eq!(language_for_locale("iw_IL"), Language::He);
        assert_eq!(language_for_locale("en-US"), Language::En);
        assert_eq!(language_for_locale(""), Language::En);
    }

    #[test]
    fn formatted_messages() {
        let en = labels(Language::En);
        assert_eq!(en.category_added("Gym"), "Category \"Gym\" added!");
        assert_eq!(en.tasks_cleared(2), "2 tasks deleted");

        let he = labels(Language::He);
        assert_eq!(he.category_added("כושר"), "קטגוריה \"כושר\" נוספה!");
        assert_eq!(he.tasks_cleared(3), "3 משימות נמחקו");
    }
}
