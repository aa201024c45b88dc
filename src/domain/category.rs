use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of emails the classify step asks the service to look at.
pub const CLASSIFY_LIMIT: u32 = 50;

/// Closed set of classification labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    School,
    Bills,
    Travel,
    Urgent,
    Todos,
    Other,
}

impl Category {
    /// Fixed presentation order.
    pub const ALL: [Category; 7] = [
        Category::Work,
        Category::School,
        Category::Bills,
        Category::Travel,
        Category::Urgent,
        Category::Todos,
        Category::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::School => "school",
            Category::Bills => "bills",
            Category::Travel => "travel",
            Category::Urgent => "urgent",
            Category::Todos => "todos",
            Category::Other => "other",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == s)
    }

    /// Capitalized label for display.
    pub fn title(self) -> String {
        let label = self.label();
        let mut chars = label.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Category -> display strings. Absent categories mean "empty".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClassificationResult {
    groups: HashMap<Category, Vec<String>>,
}

impl ClassificationResult {
    pub fn get(&self, category: Category) -> Option<&[String]> {
        self.groups.get(&category).map(Vec::as_slice)
    }

    pub fn insert(&mut self, category: Category, items: Vec<String>) {
        self.groups.insert(category, items);
    }

    pub fn is_empty(&self) -> bool {
        self.groups.values().all(Vec::is_empty)
    }

    /// Build from the raw wire mapping. Unknown labels are dropped. Labels
    /// match case-insensitively, and an exact lowercase key wins over any
    /// differently-cased duplicate.
    pub fn from_wire(raw: HashMap<String, Option<Vec<String>>>) -> Self {
        let mut out = Self::default();
        for (label, items) in raw {
            let Some(c) = Category::from_label(&label.to_ascii_lowercase()) else {
                log::debug!("ignoring unknown category '{label}'");
                continue;
            };
            let items = items.unwrap_or_default();
            if label == c.label() {
                out.groups.insert(c, items);
            } else {
                out.groups.entry(c).or_insert(items);
            }
        }
        out
    }
}

impl<'de> Deserialize<'de> for ClassificationResult {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = HashMap::<String, Option<Vec<String>>>::deserialize(d)?;
        Ok(Self::from_wire(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_labels_and_nulls_are_tolerated() {
        let c: ClassificationResult = serde_json::from_str(
            r#"{"work": ["standup notes"], "Urgent": null, "meetings": ["ignored"]}"#,
        )
        .unwrap();
        assert_eq!(c.get(Category::Work), Some(&["standup notes".to_string()][..]));
        assert_eq!(c.get(Category::Urgent), Some(&[] as &[String]));
        assert_eq!(c.get(Category::Travel), None);
    }

    #[test]
    fn exact_case_label_wins_over_variants() {
        for _ in 0..16 {
            let c: ClassificationResult = serde_json::from_str(
                r#"{"Work": ["shouty"], "work": ["exact"], "WORK": ["louder"]}"#,
            )
            .unwrap();
            assert_eq!(c.get(Category::Work), Some(&["exact".to_string()][..]));
        }
    }

    #[test]
    fn titles_are_capitalized() {
        assert_eq!(Category::Todos.title(), "Todos");
        assert_eq!(Category::ALL.map(Category::label).join(","), "work,school,bills,travel,urgent,todos,other");
    }
}
