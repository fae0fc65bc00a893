use crate::core::error::KanbanError;
use crate::core::time;
use crate::model::{
    Card, CardPatch, CardRepository, CardUpdate, ColumnRepository, Priority, next_position,
};
use crate::services::require_title;
use std::sync::Arc;

pub struct CardService {
    cards: Arc<dyn CardRepository>,
    columns: Arc<dyn ColumnRepository>,
}

impl CardService {
    pub fn new(cards: Arc<dyn CardRepository>, columns: Arc<dyn ColumnRepository>) -> Self {
        Self { cards, columns }
    }

    pub fn get(&self, id: &str) -> Result<Card, KanbanError> {
        self.cards.get_by_id(id)
    }

    /// Appends a medium-priority card to the bottom of the column.
    pub fn create(&self, column_id: &str, title: &str) -> Result<Card, KanbanError> {
        require_title("card", title)?;
        self.columns.get_by_id(column_id).map_err(|e| match e {
            KanbanError::NotFound(what) => KanbanError::NotFound(format!("column not found: {}", what)),
            other => other,
        })?;

        let now = time::now_utc();
        let card = Card {
            id: time::new_id(),
            column_id: column_id.to_string(),
            title: title.to_string(),
            description: None,
            priority: Priority::Medium,
            due_date: None,
            position: next_position(self.cards.max_position(column_id)?)?,
            created_at: now,
            updated_at: now,
        };
        self.cards.create(&card)?;
        tracing::info!(card_id = %card.id, column_id, "card created");
        Ok(card)
    }

    /// Applies only the fields present in `updates` and re-stamps `updated_at`.
    pub fn update(&self, id: &str, updates: CardUpdate) -> Result<Card, KanbanError> {
        let patch = to_patch(updates)?;
        let card = self.cards.update(id, &patch, time::now_utc())?;
        tracing::info!(card_id = %id, "card updated");
        Ok(card)
    }

    pub fn delete(&self, id: &str) -> Result<(), KanbanError> {
        self.cards.delete(id)?;
        tracing::info!(card_id = %id, "card deleted");
        Ok(())
    }

    /// Puts the card in `target_column_id` at exactly `new_position`.
    pub fn move_to(
        &self,
        id: &str,
        target_column_id: &str,
        new_position: i64,
    ) -> Result<(), KanbanError> {
        self.columns.get_by_id(target_column_id)?;
        self.cards
            .move_to(id, target_column_id, new_position, time::now_utc())?;
        tracing::info!(card_id = %id, column_id = %target_column_id, position = new_position, "card moved");
        Ok(())
    }

    pub fn search(&self, board_id: &str, query: &str) -> Result<Vec<Card>, KanbanError> {
        let cards = self.cards.search(board_id, query)?;
        tracing::debug!(board_id, hits = cards.len(), "card search");
        Ok(cards)
    }
}

fn to_patch(updates: CardUpdate) -> Result<CardPatch, KanbanError> {
    if let Some(title) = &updates.title {
        require_title("card", title)?;
    }
    let due_date = match updates.due_date.as_deref() {
        None => None,
        Some("") => Some(None),
        Some(raw) => Some(Some(time::parse_timestamp(raw).map_err(|_| {
            KanbanError::ValidationError(format!("invalid due date '{}'", raw))
        })?)),
    };
    Ok(CardPatch {
        title: updates.title,
        description: updates.description,
        priority: updates.priority,
        due_date,
    })
}
