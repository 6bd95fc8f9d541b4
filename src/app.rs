use chrono::NaiveDate;

use crate::planner::{
    LikedRecipe, MealPlan, MealSlot, MealType, SlotIndex, WeekAnchor, recipe,
};

#[derive(Debug, Clone, PartialEq)]
pub enum RequestStatus {
    Idle,
    Loading,
    Failed(String),
}

/// Ticket handed out when a week refetch starts. Only the newest ticket
/// may write its response into the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub week: WeekAnchor,
}

/// Everything the calendar knows about the displayed week.
#[derive(Debug, Clone)]
pub struct PlannerState {
    pub current_week: WeekAnchor,
    pub meal_plans: Vec<MealPlan>,
    pub index: SlotIndex,
    pub liked_recipes: Vec<LikedRecipe>,
    pub selected_slot: Option<MealSlot>,
    pub status: RequestStatus,
    generation: u64,
}

impl PlannerState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            current_week: WeekAnchor::containing(today),
            meal_plans: Vec::new(),
            index: SlotIndex::default(),
            liked_recipes: Vec::new(),
            selected_slot: None,
            status: RequestStatus::Idle,
            generation: 0,
        }
    }

    /// Moves the week pointer. The old week's cache and pending slot are dropped
    /// and any fetch still in flight becomes stale.
    pub fn shift_week(&mut self, weeks: i64) -> WeekAnchor {
        self.show_week(self.current_week.shift(weeks))
    }

    pub fn show_week(&mut self, week: WeekAnchor) -> WeekAnchor {
        self.current_week = week;
        self.generation += 1;
        self.meal_plans.clear();
        self.index = SlotIndex::default();
        self.selected_slot = None;
        self.current_week
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.status = RequestStatus::Loading;
        FetchTicket {
            generation: self.generation,
            week: self.current_week,
        }
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.generation == self.generation && ticket.week == self.current_week
    }

    /// Replaces the week cache if `ticket` is still current. Returns whether it was applied.
    pub fn apply_week(&mut self, ticket: FetchTicket, plans: Vec<MealPlan>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }

        self.index = SlotIndex::build(&plans);
        self.meal_plans = plans;
        self.status = RequestStatus::Idle;
        true
    }

    pub fn lookup(&self, date: NaiveDate, meal_type: MealType) -> Option<&MealPlan> {
        self.index.lookup(date, meal_type)
    }

    pub fn plans_in_current_week(&self) -> impl Iterator<Item = &MealPlan> {
        let week = self.current_week;
        self.meal_plans.iter().filter(move |plan| week.contains(plan.day()))
    }

    pub fn recipe_title(&self, recipe_id: i64) -> &str {
        recipe::title_for(&self.liked_recipes, recipe_id)
    }

    pub fn fail(&mut self, message: String) {
        self.status = RequestStatus::Failed(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn plan(id: i64, day: NaiveDate, meal_type: MealType) -> MealPlan {
        MealPlan {
            id,
            user_id: 1,
            recipe_id: 100 + id,
            meal_date: day.and_hms_opt(12, 0, 0).unwrap(),
            meal_type,
            servings: 2,
            created_at: None,
        }
    }

    #[test]
    fn new_state_shows_week_of_today() {
        let state = PlannerState::new(date(2024, 6, 13));

        assert_eq!(state.current_week.date(), date(2024, 6, 10));
        assert_eq!(state.current_week.date().weekday(), chrono::Weekday::Mon);
        assert!(state.meal_plans.is_empty());
        assert_eq!(state.status, RequestStatus::Idle);
    }

    #[test]
    fn apply_week_rebuilds_index() {
        let mut state = PlannerState::new(date(2024, 6, 10));
        let ticket = state.begin_fetch();

        let applied = state.apply_week(ticket, vec![plan(1, date(2024, 6, 12), MealType::Lunch)]);

        assert!(applied);
        assert_eq!(state.lookup(date(2024, 6, 12), MealType::Lunch).map(|p| p.id), Some(1));
        assert_eq!(state.status, RequestStatus::Idle);
    }

    #[test]
    fn apply_week_replaces_rather_than_appends() {
        let mut state = PlannerState::new(date(2024, 6, 10));
        let first = state.begin_fetch();
        state.apply_week(first, vec![plan(1, date(2024, 6, 12), MealType::Lunch)]);

        let second = state.begin_fetch();
        state.apply_week(second, vec![plan(2, date(2024, 6, 14), MealType::Dinner)]);

        assert_eq!(state.meal_plans.len(), 1);
        assert!(state.lookup(date(2024, 6, 12), MealType::Lunch).is_none());
    }

    #[test]
    fn navigation_makes_in_flight_fetch_stale() {
        let mut state = PlannerState::new(date(2024, 6, 10));
        let ticket = state.begin_fetch();

        state.shift_week(1);
        let applied = state.apply_week(ticket, vec![plan(1, date(2024, 6, 12), MealType::Lunch)]);

        assert!(!applied);
        assert!(state.meal_plans.is_empty());
        assert_eq!(state.current_week.date(), date(2024, 6, 17));
    }

    #[test]
    fn older_fetch_for_same_week_is_discarded() {
        let mut state = PlannerState::new(date(2024, 6, 10));
        let older = state.begin_fetch();
        let newer = state.begin_fetch();

        assert!(state.apply_week(newer, vec![plan(2, date(2024, 6, 11), MealType::Dinner)]));
        assert!(!state.apply_week(older, vec![]));
        assert_eq!(state.meal_plans.len(), 1);
    }

    #[test]
    fn shifting_clears_cache_and_selection() {
        let mut state = PlannerState::new(date(2024, 6, 10));
        let ticket = state.begin_fetch();
        state.apply_week(ticket, vec![plan(1, date(2024, 6, 12), MealType::Lunch)]);
        state.selected_slot = Some(MealSlot::new(date(2024, 6, 11), MealType::Breakfast));

        state.shift_week(-1);

        assert_eq!(state.current_week.date(), date(2024, 6, 3));
        assert!(state.meal_plans.is_empty());
        assert!(state.index.is_empty());
        assert!(state.selected_slot.is_none());
    }

    #[test]
    fn plans_in_current_week_skips_strays() {
        let mut state = PlannerState::new(date(2024, 6, 10));
        let ticket = state.begin_fetch();
        state.apply_week(
            ticket,
            vec![
                plan(1, date(2024, 6, 16), MealType::Dinner),
                plan(2, date(2024, 6, 17), MealType::Dinner),
            ],
        );

        let ids: Vec<i64> = state.plans_in_current_week().map(|p| p.id).collect();

        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn recipe_title_falls_back_when_not_liked() {
        let state = PlannerState::new(date(2024, 6, 10));
        assert_eq!(state.recipe_title(7), recipe::UNKNOWN_RECIPE_TITLE);
    }
}
