use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::planner::{
    DateRange, LikedRecipe, MealPlan, NewMealPlan, NewShoppingList, ShoppingList,
};
use crate::storage::config::BackendConfig;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Request rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MealPlanApi: Send + Sync {
    async fn add_meal_plan(&self, user_id: i64, plan: &NewMealPlan) -> Result<MealPlan, ApiError>;

    async fn query_meal_plans(&self, user_id: i64, range: DateRange) -> Result<Vec<MealPlan>, ApiError>;

    async fn remove_meal_plan(&self, plan_id: i64, user_id: i64) -> Result<(), ApiError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LikedRecipesApi: Send + Sync {
    async fn liked_recipes(&self, user_id: i64) -> Result<Vec<LikedRecipe>, ApiError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShoppingListApi: Send + Sync {
    async fn create_from_date_range(
        &self,
        user_id: i64,
        range: DateRange,
        name: &str,
    ) -> Result<ShoppingList, ApiError>;

    async fn create_from_recipes(&self, user_id: i64, list: &NewShoppingList) -> Result<ShoppingList, ApiError>;

    async fn shopping_lists(&self, user_id: i64) -> Result<Vec<ShoppingList>, ApiError>;

    async fn shopping_list(&self, list_id: i64) -> Result<ShoppingList, ApiError>;

    async fn toggle_item(&self, item_id: i64) -> Result<bool, ApiError>;

    async fn delete_shopping_list(&self, list_id: i64, user_id: i64) -> Result<(), ApiError>;
}

#[derive(Debug, Deserialize)]
struct ToggleResponse {
    is_checked: bool,
}

/// Talks to the recipe backend's JSON API.
pub struct RestClient {
    base_url: String,
    client: reqwest::Client,
}

impl RestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(config.base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn ensure_success(response: Response, what: &str) -> Result<Response, ApiError> {
        let status = response.status();
        tracing::info!("{} response status: {}", what, status);

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();

        match status {
            StatusCode::NOT_FOUND => {
                tracing::warn!("{} not found: {}", what, body);
                Err(ApiError::NotFound(detail_or(body, what)))
            }
            StatusCode::CONFLICT => {
                tracing::warn!("{} conflict: {}", what, body);
                Err(ApiError::Conflict(detail_or(body, what)))
            }
            _ => {
                tracing::error!("{} failed. Status: {}, Body: {}", what, status, body);
                Err(ApiError::Rejected {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response, what: &str) -> Result<T, ApiError> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::error!("Could not decode {} response: {}", what, e);
            ApiError::Parse(format!("{}: {}", what, e))
        })
    }
}

/// FastAPI reports errors as `{"detail": "..."}`; fall back to the raw body.
fn detail_or(body: String, what: &str) -> String {
    #[derive(Deserialize)]
    struct Detail {
        detail: String,
    }

    match serde_json::from_str::<Detail>(&body) {
        Ok(d) => d.detail,
        Err(_) if body.is_empty() => what.to_string(),
        Err(_) => body,
    }
}

#[async_trait]
impl MealPlanApi for RestClient {
    async fn add_meal_plan(&self, user_id: i64, plan: &NewMealPlan) -> Result<MealPlan, ApiError> {
        let url = self.url("/meal-planning/plans");

        tracing::info!("Adding {} of recipe {} on {}", plan.meal_type, plan.recipe_id, plan.meal_date.date());
        tracing::debug!("POST {} with payload: {:?}", url, plan);

        let response = self.client
            .post(&url)
            .query(&[("user_id", user_id)])
            .json(plan)
            .send()
            .await?;

        let response = Self::ensure_success(response, "Add meal plan").await?;
        let created: MealPlan = Self::decode(response, "meal plan").await?;

        tracing::info!("Meal plan created with ID: {}", created.id);
        Ok(created)
    }

    async fn query_meal_plans(&self, user_id: i64, range: DateRange) -> Result<Vec<MealPlan>, ApiError> {
        let url = self.url("/meal-planning/plans");

        tracing::info!("Fetching meal plans from {} to {}", range.start, range.end);

        let response = self.client
            .get(&url)
            .query(&[
                ("user_id", user_id.to_string()),
                ("start_date", range.start_param()),
                ("end_date", range.end_param()),
            ])
            .send()
            .await?;

        let response = Self::ensure_success(response, "Fetch meal plans").await?;
        let plans: Vec<MealPlan> = Self::decode(response, "meal plans").await?;

        tracing::info!("Fetched {} meal plans", plans.len());
        Ok(plans)
    }

    async fn remove_meal_plan(&self, plan_id: i64, user_id: i64) -> Result<(), ApiError> {
        let url = self.url(&format!("/meal-planning/plans/{}", plan_id));

        tracing::info!("Removing meal plan {}", plan_id);

        let response = self.client
            .delete(&url)
            .query(&[("user_id", user_id)])
            .send()
            .await?;

        Self::ensure_success(response, "Remove meal plan").await?;
        Ok(())
    }
}

#[async_trait]
impl LikedRecipesApi for RestClient {
    async fn liked_recipes(&self, user_id: i64) -> Result<Vec<LikedRecipe>, ApiError> {
        let url = self.url(&format!("/api/recipes/liked/{}", user_id));

        let response = self.client.get(&url).send().await?;

        let response = Self::ensure_success(response, "Fetch liked recipes").await?;
        let recipes: Vec<LikedRecipe> = Self::decode(response, "liked recipes").await?;

        tracing::info!("Fetched {} liked recipes", recipes.len());
        Ok(recipes)
    }
}

#[async_trait]
impl ShoppingListApi for RestClient {
    async fn create_from_date_range(
        &self,
        user_id: i64,
        range: DateRange,
        name: &str,
    ) -> Result<ShoppingList, ApiError> {
        let url = self.url("/shopping/from-meal-plans");

        tracing::info!("Generating shopping list '{}' for {} to {}", name, range.start, range.end);

        let response = self.client
            .post(&url)
            .query(&[
                ("user_id", user_id.to_string()),
                ("start_date", range.start_param()),
                ("end_date", range.end_param()),
                ("list_name", name.to_string()),
            ])
            .send()
            .await?;

        let response = Self::ensure_success(response, "Generate shopping list").await?;
        let list: ShoppingList = Self::decode(response, "shopping list").await?;

        tracing::info!("Shopping list {} created with {} items", list.id, list.items.len());
        Ok(list)
    }

    async fn create_from_recipes(&self, user_id: i64, list: &NewShoppingList) -> Result<ShoppingList, ApiError> {
        let url = self.url("/shopping/lists");

        tracing::info!("Creating shopping list '{}' from {} recipes", list.name, list.recipe_ids.len());
        tracing::debug!("POST {} with payload: {:?}", url, list);

        let response = self.client
            .post(&url)
            .query(&[("user_id", user_id)])
            .json(list)
            .send()
            .await?;

        let response = Self::ensure_success(response, "Create shopping list").await?;
        Self::decode(response, "shopping list").await
    }

    async fn shopping_lists(&self, user_id: i64) -> Result<Vec<ShoppingList>, ApiError> {
        let url = self.url("/shopping/lists");

        let response = self.client
            .get(&url)
            .query(&[("user_id", user_id)])
            .send()
            .await?;

        let response = Self::ensure_success(response, "Fetch shopping lists").await?;
        Self::decode(response, "shopping lists").await
    }

    async fn shopping_list(&self, list_id: i64) -> Result<ShoppingList, ApiError> {
        let url = self.url(&format!("/shopping/lists/{}", list_id));

        let response = self.client.get(&url).send().await?;

        let response = Self::ensure_success(response, "Fetch shopping list").await?;
        Self::decode(response, "shopping list").await
    }

    async fn toggle_item(&self, item_id: i64) -> Result<bool, ApiError> {
        let url = self.url(&format!("/shopping/items/{}/toggle", item_id));

        let response = self.client.patch(&url).send().await?;

        let response = Self::ensure_success(response, "Toggle shopping item").await?;
        let toggled: ToggleResponse = Self::decode(response, "toggle").await?;
        Ok(toggled.is_checked)
    }

    async fn delete_shopping_list(&self, list_id: i64, user_id: i64) -> Result<(), ApiError> {
        let url = self.url(&format!("/shopping/lists/{}", list_id));

        tracing::info!("Deleting shopping list {}", list_id);

        let response = self.client
            .delete(&url)
            .query(&[("user_id", user_id)])
            .send()
            .await?;

        Self::ensure_success(response, "Delete shopping list").await?;
        Ok(())
    }
}
