use std::sync::Arc;

use tokio::sync::broadcast;

use crate::backend::{ApiError, Session, ShoppingListApi};
use crate::controller::events::{EventBus, PlannerEvent};
use crate::controller::{PlannerError, PreconditionFailure};
use crate::planner::shopping_list::DEFAULT_LIST_NAME;
use crate::planner::{MealPlan, NewShoppingList, ShoppingList, WeekAnchor};

/// Asks the backend to turn planned meals into a shopping list.
///
/// Merging quantities of the same ingredient happens server-side; this side
/// only decides which days go in and refuses requests that cannot succeed.
/// Every failure is logged once here and published as
/// [`PlannerEvent::OperationFailed`].
pub struct ShoppingListAggregator {
    session: Session,
    api: Arc<dyn ShoppingListApi>,
    list_name: String,
    events: EventBus,
}

impl ShoppingListAggregator {
    pub fn new(session: Session, api: Arc<dyn ShoppingListApi>) -> Self {
        Self {
            session,
            api,
            list_name: DEFAULT_LIST_NAME.to_string(),
            events: EventBus::new(),
        }
    }

    pub fn with_list_name(mut self, name: impl Into<String>) -> Self {
        self.list_name = name.into();
        self
    }

    /// Publish on a shared bus, usually [`CalendarController::event_bus`](crate::controller::CalendarController::event_bus).
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlannerEvent> {
        self.events.subscribe()
    }

    pub fn list_name(&self) -> &str {
        &self.list_name
    }

    /// `plans` is the caller's cache for `week`; with nothing planned Monday
    /// through Sunday the backend is never called.
    pub async fn generate_from_week(
        &self,
        week: WeekAnchor,
        plans: &[MealPlan],
    ) -> Result<ShoppingList, PlannerError> {
        let range = week.range();
        let planned = plans.iter().filter(|plan| range.contains(plan.day())).count();

        if planned == 0 {
            return Err(self.report(
                "generate shopping list",
                PreconditionFailure::NoMealPlansInWeek { week }.into(),
            ));
        }

        tracing::info!("Generating shopping list from {} planned meals in week of {}", planned, week.date());

        match self
            .api
            .create_from_date_range(self.session.user_id(), range, &self.list_name)
            .await
        {
            Ok(list) => Ok(list),
            // Someone emptied the week after our last fetch.
            Err(ApiError::NotFound(_)) => Err(self.report(
                "generate shopping list",
                PreconditionFailure::NoMealPlansInWeek { week }.into(),
            )),
            Err(e) => Err(self.report("generate shopping list", e.into())),
        }
    }

    pub async fn generate_from_recipes(
        &self,
        name: &str,
        recipe_ids: &[i64],
    ) -> Result<ShoppingList, PlannerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(self.report("create shopping list", PreconditionFailure::BlankListName.into()));
        }
        if recipe_ids.is_empty() {
            return Err(self.report("create shopping list", PreconditionFailure::EmptyRecipeSelection.into()));
        }

        let request = NewShoppingList {
            name: name.to_string(),
            recipe_ids: recipe_ids.to_vec(),
        };

        self.api
            .create_from_recipes(self.session.user_id(), &request)
            .await
            .map_err(|e| self.report("create shopping list", e.into()))
    }

    pub async fn lists(&self) -> Result<Vec<ShoppingList>, PlannerError> {
        self.api
            .shopping_lists(self.session.user_id())
            .await
            .map_err(|e| self.report("load shopping lists", e.into()))
    }

    pub async fn list(&self, list_id: i64) -> Result<ShoppingList, PlannerError> {
        self.api
            .shopping_list(list_id)
            .await
            .map_err(|e| self.report("load shopping list", e.into()))
    }

    /// Returns the item's new checked state.
    pub async fn toggle_item(&self, item_id: i64) -> Result<bool, PlannerError> {
        self.api
            .toggle_item(item_id)
            .await
            .map_err(|e| self.report("toggle shopping item", e.into()))
    }

    pub async fn delete_list(&self, list_id: i64) -> Result<(), PlannerError> {
        self.api
            .delete_shopping_list(list_id, self.session.user_id())
            .await
            .map_err(|e| self.report("delete shopping list", e.into()))?;
        tracing::info!("Deleted shopping list {}", list_id);
        Ok(())
    }

    fn report(&self, operation: &'static str, error: PlannerError) -> PlannerError {
        let message = error.to_string();
        tracing::error!("Failed to {}: {}", operation, message);
        self.events.emit(PlannerEvent::OperationFailed { operation, message });
        error
    }
}
