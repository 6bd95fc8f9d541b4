use chrono::NaiveDate;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;

use crate::app::{PlannerState, RequestStatus};
use crate::backend::{ApiError, LikedRecipesApi, MealPlanApi, Session};
use crate::controller::events::{EventBus, PlannerEvent};
use crate::controller::shopping::ShoppingListAggregator;
use crate::controller::{Direction, PlannerError, PreconditionFailure};
use crate::planner::{
    DEFAULT_SERVINGS, LikedRecipe, MealPlan, MealSlot, MealType, NewMealPlan, ShoppingList, WeekAnchor,
};
use crate::ui::week_view::{self, WeekGrid};

#[derive(Debug, Clone, PartialEq)]
pub enum SlotAction {
    Removed(MealPlan),
    AwaitingRecipe(MealSlot),
}

/// Drives the weekly meal grid for one user session.
///
/// State lives behind a mutex that is never held across an await, so the
/// presentation layer may fire navigation while a mutation is still in
/// flight. Every refetch takes a ticket from [`PlannerState::begin_fetch`];
/// responses whose ticket went stale are dropped.
pub struct CalendarController {
    session: Session,
    meal_plans: Arc<dyn MealPlanApi>,
    liked_recipes: Arc<dyn LikedRecipesApi>,
    state: Mutex<PlannerState>,
    events: EventBus,
    default_servings: u32,
}

impl CalendarController {
    pub fn new(
        session: Session,
        meal_plans: Arc<dyn MealPlanApi>,
        liked_recipes: Arc<dyn LikedRecipesApi>,
        today: NaiveDate,
    ) -> Self {
        Self {
            session,
            meal_plans,
            liked_recipes,
            state: Mutex::new(PlannerState::new(today)),
            events: EventBus::new(),
            default_servings: DEFAULT_SERVINGS,
        }
    }

    pub fn with_default_servings(mut self, servings: u32) -> Self {
        self.default_servings = servings;
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlannerEvent> {
        self.events.subscribe()
    }

    /// Handle for collaborators that should publish on the same channel,
    /// such as [`ShoppingListAggregator::with_events`].
    pub fn event_bus(&self) -> EventBus {
        self.events.clone()
    }

    fn state(&self) -> MutexGuard<'_, PlannerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn session(&self) -> Session {
        self.session
    }

    pub fn current_week(&self) -> WeekAnchor {
        self.state().current_week
    }

    pub fn week_dates(&self) -> [NaiveDate; 7] {
        self.current_week().dates()
    }

    pub fn meal_plans(&self) -> Vec<MealPlan> {
        self.state().meal_plans.clone()
    }

    pub fn liked_recipes(&self) -> Vec<LikedRecipe> {
        self.state().liked_recipes.clone()
    }

    pub fn selected_slot(&self) -> Option<MealSlot> {
        self.state().selected_slot
    }

    pub fn status(&self) -> RequestStatus {
        self.state().status.clone()
    }

    pub fn lookup(&self, date: NaiveDate, meal_type: MealType) -> Option<MealPlan> {
        self.state().lookup(date, meal_type).cloned()
    }

    pub fn recipe_title(&self, recipe_id: i64) -> String {
        self.state().recipe_title(recipe_id).to_string()
    }

    pub fn grid(&self, today: NaiveDate) -> WeekGrid {
        week_view::calculate_layout(&self.state(), today)
    }

    /// Initial load: liked recipes, then the current week.
    pub async fn load(&self) -> Result<(), PlannerError> {
        let liked = self.refresh_liked_recipes().await.map(|_| ());
        let week = self.refresh_week().await;
        liked.and(week)
    }

    pub async fn refresh_liked_recipes(&self) -> Result<usize, PlannerError> {
        let user_id = self.session.user_id();

        match self.liked_recipes.liked_recipes(user_id).await {
            Ok(recipes) => {
                let count = recipes.len();
                self.state().liked_recipes = recipes;
                self.events.emit(PlannerEvent::LikedRecipesLoaded { count });
                Ok(count)
            }
            Err(e) => Err(self.report("load liked recipes", e.into())),
        }
    }

    /// Refetches the displayed week and replaces the cache with the response.
    pub async fn refresh_week(&self) -> Result<(), PlannerError> {
        let ticket = self.state().begin_fetch();
        let result = self
            .meal_plans
            .query_meal_plans(self.session.user_id(), ticket.week.range())
            .await;

        match result {
            Ok(plans) => {
                let count = plans.len();
                let applied = self.state().apply_week(ticket, plans);
                if applied {
                    self.events.emit(PlannerEvent::MealPlansLoaded { week: ticket.week, count });
                } else {
                    tracing::debug!("Discarding stale meal plans for week of {}", ticket.week.date());
                }
                Ok(())
            }
            Err(e) => {
                let still_current = self.state().is_current(ticket);
                if still_current {
                    Err(self.report("load meal plans", e.into()))
                } else {
                    tracing::debug!("Ignoring failed fetch for stale week of {}: {}", ticket.week.date(), e);
                    Ok(())
                }
            }
        }
    }

    pub async fn navigate(&self, direction: Direction) -> Result<WeekAnchor, PlannerError> {
        let week = self.state().shift_week(direction.weeks());
        self.week_changed(week).await
    }

    pub async fn show_week_of(&self, date: NaiveDate) -> Result<WeekAnchor, PlannerError> {
        let week = self.state().show_week(WeekAnchor::containing(date));
        self.week_changed(week).await
    }

    async fn week_changed(&self, week: WeekAnchor) -> Result<WeekAnchor, PlannerError> {
        tracing::info!("Showing week {}", week);
        self.events.emit(PlannerEvent::WeekChanged(week));
        self.refresh_week().await?;
        Ok(week)
    }

    /// An occupied slot is cleared at once; an empty one waits for
    /// [`confirm_add_meal`](Self::confirm_add_meal).
    pub async fn on_slot_clicked(
        &self,
        date: NaiveDate,
        meal_type: MealType,
    ) -> Result<SlotAction, PlannerError> {
        let slot = MealSlot::new(date, meal_type);
        let (week, existing) = {
            let state = self.state();
            (state.current_week, state.lookup(date, meal_type).cloned())
        };

        // Only the displayed week is cached, so any other day would look empty.
        if !week.contains(date) {
            return Err(self.report("select slot", PreconditionFailure::SlotOutsideWeek { date, week }.into()));
        }

        match existing {
            Some(plan) => self.remove_meal(plan).await.map(SlotAction::Removed),
            None => {
                self.state().selected_slot = Some(slot);
                self.events.emit(PlannerEvent::SlotSelected(slot));
                Ok(SlotAction::AwaitingRecipe(slot))
            }
        }
    }

    pub fn cancel_selection(&self) {
        let cleared = self.state().selected_slot.take();
        if cleared.is_some() {
            self.events.emit(PlannerEvent::SelectionCleared);
        }
    }

    pub async fn confirm_add_meal(&self, recipe_id: i64) -> Result<MealPlan, PlannerError> {
        self.confirm_add_meal_with_servings(recipe_id, self.default_servings).await
    }

    pub async fn confirm_add_meal_with_servings(
        &self,
        recipe_id: i64,
        servings: u32,
    ) -> Result<MealPlan, PlannerError> {
        let pending = self.state().selected_slot;
        let Some(slot) = pending else {
            return Err(self.report("add meal", PreconditionFailure::NoPendingSlot.into()));
        };

        let liked = self.state().liked_recipes.iter().any(|recipe| recipe.id == recipe_id);
        if !liked {
            return Err(self.report("add meal", PreconditionFailure::RecipeNotLiked { recipe_id }.into()));
        }

        let new_plan = NewMealPlan::for_slot(slot.date, slot.meal_type, recipe_id, servings);

        match self.meal_plans.add_meal_plan(self.session.user_id(), &new_plan).await {
            Ok(created) => {
                tracing::info!("Planned recipe {} for {} on {}", recipe_id, slot.meal_type, slot.date);
                {
                    let mut state = self.state();
                    if state.selected_slot == Some(slot) {
                        state.selected_slot = None;
                    }
                }
                self.events.emit(PlannerEvent::MealAdded { plan_id: created.id, slot });
                self.events.emit(PlannerEvent::SelectionCleared);
                self.reload_after_mutation().await;
                Ok(created)
            }
            // The slot stays selected so the user can pick again.
            Err(e) => Err(self.report("add meal", e.into())),
        }
    }

    async fn remove_meal(&self, plan: MealPlan) -> Result<MealPlan, PlannerError> {
        let slot = MealSlot::new(plan.day(), plan.meal_type);

        match self.meal_plans.remove_meal_plan(plan.id, self.session.user_id()).await {
            Ok(()) => {
                tracing::info!("Removed meal plan {} from {} on {}", plan.id, slot.meal_type, slot.date);
                self.events.emit(PlannerEvent::MealRemoved { plan_id: plan.id, slot });
                self.reload_after_mutation().await;
                Ok(plan)
            }
            Err(ApiError::NotFound(_)) => {
                // Already gone on the server; resync so the slot shows empty.
                self.reload_after_mutation().await;
                Err(self.report("remove meal", PlannerError::NotFound { plan_id: plan.id }))
            }
            Err(e) => Err(self.report("remove meal", e.into())),
        }
    }

    /// A failed reload is already reported; the mutation itself still stands.
    async fn reload_after_mutation(&self) {
        if let Err(e) = self.refresh_week().await {
            tracing::warn!("Week reload after change failed: {}", e);
        }
    }

    pub async fn generate_shopping_list(
        &self,
        aggregator: &ShoppingListAggregator,
    ) -> Result<ShoppingList, PlannerError> {
        let (week, plans) = {
            let state = self.state();
            (state.current_week, state.meal_plans.clone())
        };

        match aggregator.generate_from_week(week, &plans).await {
            Ok(list) => {
                self.events.emit(PlannerEvent::ShoppingListCreated {
                    list_id: list.id,
                    name: list.name.clone(),
                });
                Ok(list)
            }
            // Already logged and announced by the aggregator.
            Err(e) => {
                self.state().fail(e.to_string());
                Err(e)
            }
        }
    }

    fn report(&self, operation: &'static str, error: PlannerError) -> PlannerError {
        let message = error.to_string();
        tracing::error!("Failed to {}: {}", operation, message);
        self.state().fail(message.clone());
        self.events.emit(PlannerEvent::OperationFailed { operation, message });
        error
    }
}
