pub mod planner;
pub mod backend;
pub mod storage;
pub mod app;
pub mod controller;
pub mod ui;

pub use planner::{MealPlan, MealSlot, MealType, ShoppingList, WeekAnchor};
pub use app::{PlannerState, RequestStatus};
pub use controller::{CalendarController, Direction, PlannerError, PlannerEvent, ShoppingListAggregator};
