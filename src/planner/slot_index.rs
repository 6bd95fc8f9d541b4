use chrono::NaiveDate;
use std::collections::HashMap;

use crate::planner::meal_plan::{MealPlan, MealType};

/// A (day, meal type) cell of the weekly grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MealSlot {
    pub date: NaiveDate,
    pub meal_type: MealType,
}

impl MealSlot {
    pub fn new(date: NaiveDate, meal_type: MealType) -> Self {
        Self { date, meal_type }
    }
}

/// Maps each slot to at most one plan.
///
/// The backend refuses a second plan for an occupied slot, so a collision
/// here means its data is inconsistent. The first plan in response order
/// wins; later ones are counted and logged, never surfaced as an error.
#[derive(Debug, Clone, Default)]
pub struct SlotIndex {
    slots: HashMap<MealSlot, MealPlan>,
    collisions: usize,
}

impl SlotIndex {
    pub fn build(plans: &[MealPlan]) -> Self {
        let mut slots: HashMap<MealSlot, MealPlan> = HashMap::with_capacity(plans.len());
        let mut collisions = 0;

        for plan in plans {
            let slot = MealSlot::new(plan.day(), plan.meal_type);
            if let Some(kept) = slots.get(&slot) {
                tracing::warn!(
                    "Meal plan {} collides with plan {} on {} {}; keeping the first",
                    plan.id,
                    kept.id,
                    slot.date,
                    slot.meal_type
                );
                collisions += 1;
                continue;
            }
            slots.insert(slot, plan.clone());
        }

        Self { slots, collisions }
    }

    pub fn lookup(&self, date: NaiveDate, meal_type: MealType) -> Option<&MealPlan> {
        self.slots.get(&MealSlot::new(date, meal_type))
    }

    pub fn get(&self, slot: &MealSlot) -> Option<&MealPlan> {
        self.slots.get(slot)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn collisions(&self) -> usize {
        self.collisions
    }
}

pub fn build_index(plans: &[MealPlan]) -> SlotIndex {
    SlotIndex::build(plans)
}

pub fn lookup(index: &SlotIndex, date: NaiveDate, meal_type: MealType) -> Option<&MealPlan> {
    index.lookup(date, meal_type)
}
