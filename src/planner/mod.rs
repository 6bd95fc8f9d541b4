pub mod week;
pub mod meal_plan;
pub mod recipe;
pub mod shopping_list;
pub mod slot_index;

pub use week::{DateRange, WeekAnchor, shift_week, week_anchor, week_dates};
pub use meal_plan::{MealPlan, MealType, NewMealPlan, DEFAULT_SERVINGS};
pub use recipe::LikedRecipe;
pub use shopping_list::{NewShoppingList, ShoppingItem, ShoppingList};
pub use slot_index::{MealSlot, SlotIndex};
