use chrono::NaiveDate;

use crate::app::PlannerState;
use crate::planner::{MealSlot, MealType, WeekAnchor};

#[derive(Debug, Clone, PartialEq)]
pub struct WeekGrid {
    pub week: WeekAnchor,
    pub days: Vec<DayColumn>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayColumn {
    pub date: NaiveDate,
    pub is_today: bool,
    pub meals: Vec<SlotCell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlotCell {
    pub slot: MealSlot,
    pub is_selected: bool,
    pub state: SlotState,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SlotState {
    Empty,
    Occupied {
        plan_id: i64,
        recipe_id: i64,
        title: String,
        servings: u32,
    },
}

impl SlotCell {
    pub fn title(&self) -> Option<&str> {
        match &self.state {
            SlotState::Occupied { title, .. } => Some(title),
            SlotState::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.state == SlotState::Empty
    }
}

impl WeekGrid {
    pub fn label(&self) -> String {
        self.week.to_string()
    }

    pub fn cell(&self, day_index: usize, meal_type: MealType) -> Option<&SlotCell> {
        self.days
            .get(day_index)?
            .meals
            .iter()
            .find(|cell| cell.slot.meal_type == meal_type)
    }

    pub fn planned_count(&self) -> usize {
        self.days
            .iter()
            .flat_map(|day| &day.meals)
            .filter(|cell| !cell.is_empty())
            .count()
    }
}

pub fn calculate_layout(state: &PlannerState, today: NaiveDate) -> WeekGrid {
    let week = state.current_week;

    let days = week
        .dates()
        .into_iter()
        .map(|date| DayColumn {
            date,
            is_today: date == today,
            meals: MealType::ALL
                .iter()
                .map(|meal_type| build_cell(state, MealSlot::new(date, *meal_type)))
                .collect(),
        })
        .collect();

    WeekGrid { week, days }
}

fn build_cell(state: &PlannerState, slot: MealSlot) -> SlotCell {
    let cell_state = match state.index.get(&slot) {
        Some(plan) => SlotState::Occupied {
            plan_id: plan.id,
            recipe_id: plan.recipe_id,
            title: state.recipe_title(plan.recipe_id).to_string(),
            servings: plan.servings,
        },
        None => SlotState::Empty,
    };

    SlotCell {
        slot,
        is_selected: state.selected_slot == Some(slot),
        state: cell_state,
    }
}
