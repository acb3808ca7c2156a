//! Default categories and title word.

use super::types::Category;

/// The classic title word.
pub const DEFAULT_LETTERS: &str = "MASH";

const DEFAULT_CATEGORIES: [(&str, &str); 5] = [
    ("spouse", "Spouse"),
    ("kids", "Number of Kids"),
    ("car", "Car"),
    ("job", "Job"),
    ("city", "City"),
];

/// The classic category set, empty and unlocked, in display order.
pub fn default_categories() -> Vec<Category> {
    DEFAULT_CATEGORIES
        .iter()
        .map(|(key, label)| Category::new(*key, *label))
        .collect()
}
