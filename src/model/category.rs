use serde::{Deserialize, Serialize};

/// Category names that exist for the lifetime of the dataset and cannot be
/// renamed: tasks default into "ToDo" and the checkbox moves them to
/// "Completed".
pub const RESERVED_NAMES: [&str; 2] = ["ToDo", "Completed"];

/// A named bucket that groups tasks. A task belongs to exactly one
/// category at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Carried in the data file for compatibility; the position in the
    /// category list is the ordering source of truth, not this field.
    #[serde(default)]
    pub order: u32,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Category {
            id: id.into(),
            name: name.into(),
            order: 0,
        }
    }

    /// Whether this category's current name is reserved
    pub fn is_reserved(&self) -> bool {
        RESERVED_NAMES.contains(&self.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_names_are_flagged() {
        assert!(Category::new("c1", "ToDo").is_reserved());
        assert!(Category::new("c4", "Completed").is_reserved());
        assert!(!Category::new("c3", "School").is_reserved());
    }

    #[test]
    fn order_field_defaults_on_deserialize() {
        let c: Category = serde_json::from_str(r#"{"id":"c2","name":"Work"}"#).unwrap();
        assert_eq!(c.order, 0);
    }
}
