use serde::Serialize;

use crate::domain::category::{Category, ClassificationResult};

/// One renderable group of classified emails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryGroup {
    pub category: Category,
    pub title: String,
    pub items: Vec<String>,
}

/// Map a classification onto `labels`, in that order. Missing labels are empty.
pub fn project(classification: &ClassificationResult, labels: &[Category]) -> Vec<CategoryGroup> {
    labels
        .iter()
        .map(|&category| CategoryGroup {
            category,
            title: category.title(),
            items: classification
                .get(category)
                .map(<[String]>::to_vec)
                .unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_travel_projects_to_empty() {
        let mut c = ClassificationResult::default();
        c.insert(Category::Work, vec!["Q3 planning".into()]);

        let groups = project(&c, &Category::ALL);
        assert_eq!(groups.len(), 7);
        assert_eq!(groups[0].title, "Work");
        assert_eq!(groups[0].items, vec!["Q3 planning".to_string()]);

        let travel = groups.iter().find(|g| g.category == Category::Travel).unwrap();
        assert!(travel.items.is_empty());
    }

    #[test]
    fn order_follows_labels() {
        let groups = project(&ClassificationResult::default(), &[Category::Other, Category::Bills]);
        let titles: Vec<_> = groups.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, ["Other", "Bills"]);
    }
}
