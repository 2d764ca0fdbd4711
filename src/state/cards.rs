// Card list state.
// Keyboard-navigable list of fetched cards and the JSON summary shown for a card.

use ratatui::widgets::ListState;
use serde::Serialize;

use crate::sdk::CardSummary;

/// State for a selectable list with keyboard navigation.
#[derive(Debug, Clone)]
pub struct SelectableList<T> {
    pub items: Vec<T>,
    pub list_state: ListState,
}

impl<T> Default for SelectableList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            list_state: ListState::default(),
        }
    }
}

impl<T> SelectableList<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the currently highlighted index.
    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }

    /// Highlight the next item in the list.
    pub fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.selected() {
            Some(i) => (i + 1).min(self.items.len() - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Highlight the previous item in the list.
    pub fn select_prev(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Highlight the first item matching a predicate. Returns false if none matched.
    pub fn select_where(&mut self, pred: impl Fn(&T) -> bool) -> bool {
        match self.items.iter().position(pred) {
            Some(i) => {
                self.list_state.select(Some(i));
                true
            }
            None => false,
        }
    }

    /// Get the highlighted item.
    pub fn selected_item(&self) -> Option<&T> {
        let index = self.selected()?;
        self.items.get(index)
    }

    /// Replace the items wholesale and highlight the first one.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.reset_selection();
    }

    /// Reset highlight to first item.
    pub fn reset_selection(&mut self) {
        if self.items.is_empty() {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(0));
        }
    }
}

/// Card fields shown in the card info panel.
#[derive(Debug, Serialize)]
struct CardInfo<'a> {
    #[serde(rename = "Card ID")]
    id: &'a str,
    #[serde(rename = "Cardholder Name")]
    cardholder_name: &'a str,
    #[serde(rename = "Last 4 Digits")]
    last4: &'a str,
    #[serde(rename = "Expiry Date")]
    expiry: String,
    #[serde(rename = "State")]
    state: &'static str,
}

/// Pretty-printed JSON summary of a card.
pub fn card_info_json(card: &CardSummary) -> serde_json::Result<String> {
    let info = CardInfo {
        id: card.id.as_str(),
        cardholder_name: &card.cardholder_name,
        last4: &card.pan_last4,
        expiry: card.expiry.to_string(),
        state: card.state.label(),
    };
    serde_json::to_string_pretty(&info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::types::ExpiryDate;
    use crate::sdk::{CardId, CardState};

    fn card(id: &str) -> CardSummary {
        CardSummary {
            id: CardId::new(id),
            pan_last4: "4242".to_string(),
            cardholder_name: "Ada Lovelace".to_string(),
            expiry: ExpiryDate {
                month: 9,
                year: 2028,
            },
            state: CardState::Active,
        }
    }

    #[test]
    fn test_navigation_clamps() {
        let mut list: SelectableList<CardSummary> = SelectableList::default();
        list.select_next();
        assert_eq!(list.selected(), None);

        list.set_items(vec![card("a"), card("b")]);
        assert_eq!(list.selected(), Some(0));

        list.select_next();
        list.select_next();
        assert_eq!(list.selected(), Some(1));

        list.select_prev();
        list.select_prev();
        assert_eq!(list.selected(), Some(0));
    }

    #[test]
    fn test_select_where() {
        let mut list = SelectableList::default();
        list.set_items(vec![card("a"), card("b")]);

        assert!(list.select_where(|c| c.id.as_str() == "b"));
        assert_eq!(list.selected_item().unwrap().id, CardId::new("b"));
        assert!(!list.select_where(|c| c.id.as_str() == "zzz"));
        assert_eq!(list.selected(), Some(1));
    }

    #[test]
    fn test_set_items_replaces_wholesale() {
        let mut list = SelectableList::default();
        list.set_items(vec![card("a"), card("b")]);
        list.select_next();

        list.set_items(vec![card("c")]);
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.selected(), Some(0));

        list.set_items(Vec::new());
        assert!(list.is_empty());
        assert_eq!(list.selected(), None);
    }

    #[test]
    fn test_card_info_json() {
        let json = card_info_json(&card("crd_1")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["Card ID"], "crd_1");
        assert_eq!(value["Cardholder Name"], "Ada Lovelace");
        assert_eq!(value["Last 4 Digits"], "4242");
        assert_eq!(value["Expiry Date"], "9/2028");
        assert!(json.contains('\n'));
    }
}
