// In-memory conversation list with a single active conversation.
// Nothing here persists: a new store starts from whatever it was given.

use chrono::Local;
use log::{debug, info};
use uuid::Uuid;

use crate::filter;
use crate::models::{Conversation, DeliveryStatus, Message, MessageOrigin};

/// Last-activity text shown for a conversation right after sending
pub const JUST_NOW: &str = "Just now";

pub struct ConversationStore {
    conversations: Vec<Conversation>,
    selected: Option<String>,
}

impl ConversationStore {
    /// The first conversation, if any, starts out selected.
    pub fn new(conversations: Vec<Conversation>) -> Self {
        let selected = conversations.first().map(|c| c.id.clone());
        ConversationStore { conversations, selected }
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn get(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    pub fn selected(&self) -> Option<&Conversation> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Makes `id` the active conversation.
    ///
    /// Unread counts are left as they are. An unknown id keeps the current
    /// selection and returns `None`.
    pub fn select(&mut self, id: &str) -> Option<&Conversation> {
        if self.get(id).is_none() {
            debug!("Ignoring selection of unknown conversation {}", id);
            return None;
        }
        self.selected = Some(id.to_string());
        self.get(id)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Appends an own message to the active conversation, stamped with the local time.
    pub fn append(&mut self, text: &str) -> Option<&Message> {
        let timestamp = Local::now().format("%-I:%M %p").to_string();
        self.append_at(text, &timestamp)
    }

    /// Appends an own message with status `Sent` to the active conversation
    /// and refreshes its last-message snapshot.
    ///
    /// Nothing happens when the text is blank or no conversation is active.
    pub fn append_at(&mut self, text: &str, timestamp: &str) -> Option<&Message> {
        if text.trim().is_empty() {
            return None;
        }
        let selected = self.selected.as_deref()?;
        let conversation = self.conversations.iter_mut().find(|c| c.id == selected)?;

        conversation.messages.push(Message {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            timestamp: timestamp.to_string(),
            origin: MessageOrigin::Own,
            delivery_status: DeliveryStatus::Sent,
        });
        conversation.last_message = text.to_string();
        conversation.last_activity = JUST_NOW.to_string();
        info!(
            "Message appended to conversation {} ({} messages)",
            conversation.id,
            conversation.messages.len()
        );

        conversation.messages.last()
    }

    /// Conversations whose participant name contains `query`, in list order.
    pub fn search(&self, query: &str) -> Vec<&Conversation> {
        filter::search_conversations(&self.conversations, query)
    }

    pub fn unread_total(&self) -> u32 {
        self.conversations.iter().map(|c| c.unread_count).sum()
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PresenceStatus;

    fn conversation(id: &str, name: &str) -> Conversation {
        Conversation {
            id: id.to_string(),
            name: name.to_string(),
            country: "India".to_string(),
            major: "Business".to_string(),
            last_message: String::new(),
            last_activity: "1 hour ago".to_string(),
            unread_count: 0,
            status: PresenceStatus::Online,
            messages: Vec::new(),
        }
    }

    #[test]
    fn test_empty_store_has_no_selection() {
        let mut store = ConversationStore::new(Vec::new());
        assert!(store.selected().is_none());
        assert!(store.append_at("hello", "1:00 PM").is_none());
    }

    #[test]
    fn test_append_sets_own_sent_message() {
        let mut store = ConversationStore::new(vec![conversation("a", "Ahmed")]);
        let message = store.append_at("See you at 3", "2:40 PM").cloned().unwrap();

        assert!(message.is_own());
        assert_eq!(message.delivery_status, DeliveryStatus::Sent);
        assert_eq!(message.timestamp, "2:40 PM");

        let conv = store.get("a").unwrap();
        assert_eq!(conv.last_message, "See you at 3");
        assert_eq!(conv.last_activity, JUST_NOW);
        assert_eq!(conv.messages.last().unwrap().id, message.id);
    }

    #[test]
    fn test_message_ids_are_unique() {
        let mut store = ConversationStore::new(vec![conversation("a", "Ahmed")]);
        let first = store.append_at("one", "1:00 PM").unwrap().id.clone();
        let second = store.append_at("two", "1:01 PM").unwrap().id.clone();
        assert_ne!(first, second);
    }

    #[test]
    fn test_text_is_stored_untrimmed() {
        let mut store = ConversationStore::new(vec![conversation("a", "Ahmed")]);
        let message = store.append_at("  padded  ", "1:00 PM").unwrap();
        assert_eq!(message.text, "  padded  ");
    }

    #[test]
    fn test_append_uses_clock_format() {
        let mut store = ConversationStore::new(vec![conversation("a", "Ahmed")]);
        let message = store.append("hi").unwrap();
        assert!(message.timestamp.ends_with("AM") || message.timestamp.ends_with("PM"));
    }
}
