use serde_json::Value;

use crate::i18n::{labels, Language};
use crate::models::{Category, CategoryTheme, Timestamp};
use crate::normalize::FALLBACK_CATEGORY;

pub struct Swatch {
    pub id: &'static str,
    pub bg: &'static str,
    pub card_bg: &'static str,
    pub text: &'static str,
}

impl Swatch {
    pub fn theme(&self) -> CategoryTheme {
        CategoryTheme {
            color: self.bg.to_string(),
            card_bg: self.card_bg.to_string(),
            text: self.text.to_string(),
            light: format!("{} {}", self.card_bg, self.text),
        }
    }
}

const fn swatch_of(id: &'static str, bg: &'static str, card_bg: &'static str, text: &'static str) -> Swatch {
    Swatch { id, bg, card_bg, text }
}

/// Colors offered when creating a category.
pub static PALETTE: [Swatch; 12] = [
    swatch_of("red", "bg-red-500", "bg-red-50", "text-red-700"),
    swatch_of("orange", "bg-orange-500", "bg-orange-50", "text-orange-700"),
    swatch_of("amber", "bg-amber-500", "bg-amber-50", "text-amber-700"),
    swatch_of("emerald", "bg-emerald-500", "bg-emerald-50", "text-emerald-700"),
    swatch_of("teal", "bg-teal-500", "bg-teal-50", "text-teal-700"),
    swatch_of("cyan", "bg-cyan-500", "bg-cyan-50", "text-cyan-700"),
    swatch_of("blue", "bg-blue-500", "bg-blue-50", "text-blue-700"),
    swatch_of("indigo", "bg-indigo-500", "bg-indigo-50", "text-indigo-700"),
    swatch_of("violet", "bg-violet-500", "bg-violet-50", "text-violet-700"),
    swatch_of("fuchsia", "bg-fuchsia-500", "bg-fuchsia-50", "text-fuchsia-700"),
    swatch_of("pink", "bg-pink-500", "bg-pink-50", "text-pink-700"),
    swatch_of("rose", "bg-rose-500", "bg-rose-50", "text-rose-700"),
];

pub const DEFAULT_SWATCH: &str = "blue";

pub fn swatch(id: &str) -> Option<&'static Swatch> {
    let id = id.trim().to_lowercase();
    PALETTE.iter().find(|swatch| swatch.id == id)
}

const DEFAULT_IDS: [&str; 4] = ["work", "study", "personal", FALLBACK_CATEGORY];
static DEFAULT_THEMES: [Swatch; 4] = [
    swatch_of("blue", "bg-blue-500", "bg-blue-50", "text-blue-700"),
    swatch_of("purple", "bg-purple-500", "bg-purple-50", "text-purple-700"),
    swatch_of("pink", "bg-pink-500", "bg-pink-50", "text-pink-700"),
    swatch_of("slate", "bg-slate-500", "bg-slate-50", "text-slate-700"),
];

pub fn default_categories(lang: Language) -> Vec<Category> {
    let names = labels(lang).default_categories;
    DEFAULT_IDS
        .iter()
        .zip(names.iter())
        .zip(DEFAULT_THEMES.iter())
        .map(|((id, label), theme)| Category {
            id: id.to_string(),
            label: label.to_string(),
            theme: theme.theme(),
        })
        .collect()
}

/// Parses the persisted category list, falling back to the default set when
/// the text is absent, unparsable, empty, or written by an older build.
///
/// An older build is recognized only by the first entry lacking `cardBg`; later
/// entries are not inspected.
pub fn parse_categories(text: Option<&str>, lang: Language) -> Vec<Category> {
    let Some(text) = text else {
        return default_categories(lang);
    };
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(error) => {
            log::warn!("category data is not valid json, using defaults: {error}");
            return default_categories(lang);
        }
    };
    let Value::Array(records) = value else {
        log::warn!("category data is not a list, using defaults");
        return default_categories(lang);
    };
    let Some(first) = records.first() else {
        return default_categories(lang);
    };
    let has_card_bg = first
        .get("cardBg")
        .and_then(Value::as_str)
        .map(|card_bg| !card_bg.is_empty())
        .unwrap_or(false);
    if !has_card_bg {
        log::warn!("category data predates theme tokens, using defaults");
        return default_categories(lang);
    }

    let total = records.len();
    let categories: Vec<Category> = records
        .into_iter()
        .filter_map(|record| serde_json::from_value(record).ok())
        .collect();
    if categories.len() != total {
        log::warn!(
            "dropped {} unreadable category records",
            total - categories.len()
        );
    }
    if categories.is_empty() {
        return default_categories(lang);
    }
    categories
}

#[derive(Debug, Clone)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
}

impl CategoryRegistry {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn list(&self) -> &[Category] {
        &self.categories
    }

    pub fn get(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn first_id(&self) -> &str {
        self.categories
            .first()
            .map(|category| category.id.as_str())
            .unwrap_or(FALLBACK_CATEGORY)
    }

    /// Returns `id` when registered, otherwise the first registered category.
    pub fn resolve(&self, id: &str) -> String {
        if self.contains(id) {
            id.to_string()
        } else {
            self.first_id().to_string()
        }
    }

    /// Appends a category with a freshly generated id. Returns `None` when the
    /// label is empty after trimming.
    pub fn add(&mut self, label: &str, theme: CategoryTheme, now: Timestamp) -> Option<Category> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        let category = Category {
            id: self.next_id(now),
            label: label.to_string(),
            theme,
        };
        self.categories.push(category.clone());
        Some(category)
    }

    fn next_id(&self, now: Timestamp) -> String {
        let base = format!("cat_{now}");
        if !self.contains(&base) {
            return base;
        }
        let mut suffix = 2;
        loop {
            let candidate = format!("{base}_{suffix}");
            if !self.contains(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blue() -> CategoryTheme {
        swatch(DEFAULT_SWATCH).unwrap().theme()
    }

    #[test]
    fn default_set_has_four_distinct_themes() {
        let defaults = default_categories(Language::En);
        let ids: Vec<_> = defaults.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["work", "study", "personal", "general"]);
        assert_eq!(defaults[3].label, "General");
        for (i, a) in defaults.iter().enumerate() {
            assert!(!a.theme.card_bg.is_empty());
            for b in defaults.iter().skip(i + 1) {
                assert_ne!(a.theme, b.theme);
            }
        }
        assert_eq!(default_categories(Language::He)[0].label, "עבודה");
    }

    #[test]
    fn parse_falls_back_to_defaults() {
        let defaults = default_categories(Language::En);
        assert_eq!(parse_categories(None, Language::En), defaults);
        assert_eq!(parse_categories(Some("{oops"), Language::En), defaults);
        assert_eq!(parse_categories(Some("[]"), Language::En), defaults);
        assert_eq!(parse_categories(Some(r#"{"id":"x"}"#), Language::En), defaults);
        assert_eq!(
            parse_categories(Some(r#"[{"id":"x","label":"X","color":"bg-red-500"}]"#), Language::En),
            defaults
        );
        assert_eq!(
            parse_categories(Some(r#"[{"id":"x","label":"X","cardBg":""}]"#), Language::En),
            defaults
        );
    }

    #[test]
    fn stale_check_only_inspects_first_entry() {
        let text = r#"[
          {"id":"a","label":"A","color":"bg-red-500","cardBg":"bg-red-50","text":"text-red-700","light":"bg-red-50 text-red-700"},
          {"id":"b","label":"B","color":"bg-teal-500"}
        ]"#;
        let categories = parse_categories(Some(text), Language::En);
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[1].id, "b");
        assert_eq!(categories[1].theme.card_bg, "");
    }

    #[test]
    fn unreadable_records_are_dropped() {
        let text = r#"[
          {"id":"a","label":"A","cardBg":"bg-red-50"},
          {"label":"missing id"}
        ]"#;
        let categories = parse_categories(Some(text), Language::En);
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].id, "a");
    }

    #[test]
    fn resolve_falls_back_to_first_category() {
        let registry = CategoryRegistry::new(default_categories(Language::En));
        assert_eq!(registry.resolve("study"), "study");
        assert_eq!(registry.resolve("nonexistent-cat"), "work");

        let empty = CategoryRegistry::new(Vec::new());
        assert_eq!(empty.resolve("anything"), FALLBACK_CATEGORY);
    }

    #[test]
    fn add_generates_unique_ids_and_trims_label() {
        let mut registry = CategoryRegistry::new(default_categories(Language::En));
        let first = registry.add("  Gym ", blue(), 1000).expect("category added");
        assert_eq!(first.id, "cat_1000");
        assert_eq!(first.label, "Gym");
        assert_eq!(first.theme.light, "bg-blue-50 text-blue-700");

        let second = registry.add("Shopping", blue(), 1000).unwrap();
        assert_eq!(second.id, "cat_1000_2");
        let third = registry.add("Reading", blue(), 1000).unwrap();
        assert_eq!(third.id, "cat_1000_3");

        assert_eq!(registry.list().len(), 7);
        assert_eq!(registry.list().last().unwrap().label, "Reading");
    }

    #[test]
    fn add_with_empty_label_is_noop() {
        let mut registry = CategoryRegistry::new(default_categories(Language::En));
        assert!(registry.add("   ", blue(), 1).is_none());
        assert_eq!(registry.list().len(), 4);
    }

    #[test]
    fn palette_lookup_is_case_insensitive() {
        assert_eq!(swatch("Teal").unwrap().bg, "bg-teal-500");
        assert!(swatch("beige").is_none());
        assert_eq!(PALETTE.len(), 12);
    }
}
