pub mod calendar;
pub mod events;
pub mod shopping;

use chrono::NaiveDate;
use thiserror::Error;

use crate::backend::ApiError;
use crate::planner::WeekAnchor;

pub use calendar::{CalendarController, SlotAction};
pub use events::{EventBus, PlannerEvent};
pub use shopping::ShoppingListAggregator;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Network failure: {0}")]
    NetworkFailure(#[from] ApiError),
    #[error("{0}")]
    Precondition(#[from] PreconditionFailure),
    #[error("Meal plan {plan_id} no longer exists")]
    NotFound { plan_id: i64 },
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PreconditionFailure {
    #[error("No meal slot is waiting for a recipe")]
    NoPendingSlot,
    #[error("Recipe {recipe_id} is not among your liked recipes")]
    RecipeNotLiked { recipe_id: i64 },
    #[error("{date} is outside the week of {week}")]
    SlotOutsideWeek { date: NaiveDate, week: WeekAnchor },
    #[error("No meal plans found for the week of {week}")]
    NoMealPlansInWeek { week: WeekAnchor },
    #[error("Select at least one recipe")]
    EmptyRecipeSelection,
    #[error("Shopping list name must not be blank")]
    BlankListName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    pub fn weeks(&self) -> i64 {
        match self {
            Direction::Previous => -1,
            Direction::Next => 1,
        }
    }
}
