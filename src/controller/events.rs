use tokio::sync::broadcast;

use crate::planner::{MealSlot, WeekAnchor};

const CHANNEL_CAPACITY: usize = 64;

/// State changes a rendering layer subscribes to instead of polling.
#[derive(Debug, Clone, PartialEq)]
pub enum PlannerEvent {
    WeekChanged(WeekAnchor),
    MealPlansLoaded { week: WeekAnchor, count: usize },
    LikedRecipesLoaded { count: usize },
    SlotSelected(MealSlot),
    SelectionCleared,
    MealAdded { plan_id: i64, slot: MealSlot },
    MealRemoved { plan_id: i64, slot: MealSlot },
    ShoppingListCreated { list_id: i64, name: String },
    OperationFailed { operation: &'static str, message: String },
}

#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<PlannerEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlannerEvent> {
        self.sender.subscribe()
    }

    /// Nobody listening is fine; the event is dropped.
    pub fn emit(&self, event: PlannerEvent) {
        tracing::debug!("Planner event: {:?}", event);
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
