pub mod rest_api;
pub mod session;

pub use rest_api::{ApiError, LikedRecipesApi, MealPlanApi, RestClient, ShoppingListApi};
pub use session::{Session, SessionError};
