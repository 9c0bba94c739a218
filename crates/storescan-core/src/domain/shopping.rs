//! Shopping - 買い物リストと品目の評価状態
//!
//! # Rating の三状態
//! 数値 0 を「未設定」と見なすと、本当に 0 のスコアと区別できない。
//! そこで `Rating::Unset` / `Rating::Set` を明示的に持つ。

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Running average score of a shopping item.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "value")]
pub enum Rating {
    #[default]
    Unset,
    Set(f64),
}

impl Rating {
    pub fn value(&self) -> Option<f64> {
        match self {
            Rating::Unset => None,
            Rating::Set(v) => Some(*v),
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Rating::Set(_))
    }

    /// Mean of the current value and `rating`; an unset rating simply takes `rating`.
    pub fn averaged_with(&self, rating: f64) -> Rating {
        match self {
            Rating::Unset => Rating::Set(rating),
            Rating::Set(current) => Rating::Set((current + rating) / 2.0),
        }
    }

    /// 表示用（未設定は 0.00 と表示する）
    pub fn display_value(&self) -> f64 {
        self.value().unwrap_or(0.0)
    }
}

/// One requested item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub name: String,
    pub quantity: u32,
    pub rating: Rating,
}

impl ShoppingItem {
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            quantity,
            rating: Rating::Unset,
        }
    }

    /// Case-insensitive name comparison.
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShoppingListError {
    #[error("shopping list is full (capacity {0})")]
    Full(usize),

    #[error("item name must not be empty")]
    EmptyName,

    #[error("item name '{name}' is longer than {max} characters")]
    NameTooLong { name: String, max: usize },

    #[error("quantity for '{0}' must be at least 1")]
    ZeroQuantity(String),
}

/// Fixed-capacity ordered list of requested items.
#[derive(Debug, Clone, PartialEq)]
pub struct ShoppingList {
    items: Vec<ShoppingItem>,
    capacity: usize,
    max_name_chars: usize,
}

impl ShoppingList {
    /// `max_name_len` は終端を含む長さ（名前は最大 `max_name_len - 1` 文字）
    pub fn new(capacity: usize, max_name_len: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
            max_name_chars: max_name_len.saturating_sub(1),
        }
    }

    pub fn push(&mut self, item: ShoppingItem) -> Result<(), ShoppingListError> {
        if self.items.len() >= self.capacity {
            return Err(ShoppingListError::Full(self.capacity));
        }
        let name = self.check_name(&item.name)?;
        if item.quantity == 0 {
            return Err(ShoppingListError::ZeroQuantity(name));
        }
        self.items.push(ShoppingItem { name, ..item });
        Ok(())
    }

    /// Trimmed `name` if this list would accept it.
    pub fn check_name(&self, name: &str) -> Result<String, ShoppingListError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ShoppingListError::EmptyName);
        }
        if name.chars().count() > self.max_name_chars {
            return Err(ShoppingListError::NameTooLong {
                name: name.to_string(),
                max: self.max_name_chars,
            });
        }
        Ok(name.to_string())
    }

    pub fn max_name_chars(&self) -> usize {
        self.max_name_chars
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn items(&self) -> &[ShoppingItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<ShoppingItem> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn averaged_with_takes_mean_of_set_rating() {
        let rating = Rating::Set(0.8).averaged_with(7.0);
        assert_eq!(rating, Rating::Set(3.9));
    }

    #[test]
    fn averaged_with_on_unset_takes_new_rating() {
        assert_eq!(Rating::Unset.averaged_with(4.0), Rating::Set(4.0));
    }

    #[test]
    fn zero_score_counts_as_set() {
        let rating = Rating::Set(0.0);
        assert!(rating.is_set());
        assert_eq!(rating.value(), Some(0.0));
    }

    #[rstest]
    #[case::same("Widget", "Widget")]
    #[case::lower("Widget", "widget")]
    #[case::upper("widget", "WIDGET")]
    fn matches_ignores_case(#[case] wanted: &str, #[case] catalog: &str) {
        assert!(ShoppingItem::new(wanted, 1).matches(catalog));
    }

    #[test]
    fn matches_requires_whole_name() {
        assert!(!ShoppingItem::new("Widget", 1).matches("Widgets"));
    }

    #[test]
    fn push_rejects_when_full() {
        let mut list = ShoppingList::new(1, 50);
        list.push(ShoppingItem::new("a", 1)).unwrap();
        let err = list.push(ShoppingItem::new("b", 1)).unwrap_err();
        assert_eq!(err, ShoppingListError::Full(1));
        assert_eq!(list.len(), 1);
    }

    #[rstest]
    #[case::empty(ShoppingItem::new("   ", 1))]
    #[case::zero_quantity(ShoppingItem::new("Widget", 0))]
    #[case::too_long(ShoppingItem::new("x".repeat(50), 1))]
    fn push_rejects_invalid_items(#[case] item: ShoppingItem) {
        let mut list = ShoppingList::new(4, 50);
        assert!(list.push(item).is_err());
        assert!(list.is_empty());
    }

    #[test]
    fn push_trims_names() {
        let mut list = ShoppingList::new(4, 50);
        list.push(ShoppingItem::new("  Widget \n", 2)).unwrap();
        assert_eq!(list.items()[0].name, "Widget");
        assert_eq!(list.items()[0].rating, Rating::Unset);
    }
}
