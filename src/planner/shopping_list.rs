use serde::{Deserialize, Serialize};

pub const DEFAULT_LIST_NAME: &str = "Weekly Shopping List";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingList {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub items: Vec<ShoppingItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub id: i64,
    pub ingredient: String,
    #[serde(default = "default_quantity")]
    pub quantity: String,
    #[serde(default)]
    pub is_checked: bool,
}

/// Request body for a list built from hand-picked recipes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewShoppingList {
    pub name: String,
    pub recipe_ids: Vec<i64>,
}

impl ShoppingList {
    pub fn checked_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_checked).count()
    }

    pub fn remaining(&self) -> impl Iterator<Item = &ShoppingItem> {
        self.items.iter().filter(|item| !item.is_checked)
    }

    pub fn set_checked(&mut self, item_id: i64, checked: bool) -> bool {
        match self.items.iter_mut().find(|item| item.id == item_id) {
            Some(item) => {
                item.is_checked = checked;
                true
            }
            None => false,
        }
    }
}

fn default_quantity() -> String {
    "1".to_string()
}
