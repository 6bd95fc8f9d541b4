use serde::{Deserialize, Serialize};

pub const UNKNOWN_RECIPE_TITLE: &str = "Unknown Recipe";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikedRecipe {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cooking_time: Option<u32>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl LikedRecipe {
    /// One-line summary shown next to the title when picking a recipe.
    pub fn summary(&self) -> String {
        match (self.cooking_time, self.budget) {
            (Some(minutes), Some(budget)) => format!("{} min • £{:.2}", minutes, budget),
            (Some(minutes), None) => format!("{} min", minutes),
            (None, Some(budget)) => format!("£{:.2}", budget),
            (None, None) => String::new(),
        }
    }
}

pub fn title_for(recipes: &[LikedRecipe], recipe_id: i64) -> &str {
    recipes
        .iter()
        .find(|r| r.id == recipe_id)
        .map(|r| r.title.as_str())
        .unwrap_or(UNKNOWN_RECIPE_TITLE)
}
