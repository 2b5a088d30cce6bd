use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_CATEGORIES: [&str; 17] = [
    "Groceries",
    "Produce",
    "Dairy",
    "Meat",
    "Bakery",
    "Pantry",
    "Frozen",
    "Beverages",
    "Snacks",
    "Household",
    "Health",
    "Personal Care",
    "Clothing",
    "Dining",
    "Utilities",
    "Retail",
    "Other",
];

/// A user's category taxonomy. Insertion is a union: names compare
/// case-insensitively but keep the casing they were first added with.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct CategorySet {
    categories: Vec<String>,
}

impl CategorySet {
    pub fn with_defaults() -> Self {
        CategorySet {
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        let needle = name.trim().to_lowercase();
        self.categories.iter().any(|c| c.to_lowercase() == needle)
    }

    /// Returns `false` when the name was already present.
    pub fn insert(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.contains(name) {
            return false;
        }
        self.categories.push(name.to_string());
        true
    }

    pub fn sorted(&self) -> Vec<String> {
        let mut names = self.categories.clone();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Icon and colour classes used to render a category badge.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct CategoryStyle {
    pub icon: String,
    pub color: String,
    pub bg: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct StyledCategory {
    pub name: String,
    pub style: CategoryStyle,
}
