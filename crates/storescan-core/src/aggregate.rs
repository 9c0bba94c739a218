//! SharedAggregate - 全 tier から共有される集計領域
//!
//! Orchestrator が fan-out 前に一度だけ作り、`Arc` で全 coordinator / worker に
//! 明示的に渡す（グローバル変数は使わない）。
//!
//! # 不変条件
//! - 品目数 ≤ capacity（ShoppingList 側で保証）
//! - 評価フェーズ中、店舗ごとの合計は単調非減少（寄与が非負である限り）
//! - 選択後の `selected` はある 1 店舗の合計の正確なコピー
//! - 可変フィールドの更新はすべて Gate を通る

use serde::Serialize;
use thiserror::Error;

use crate::domain::{CatalogRecord, Rating, ShoppingItem, ShoppingList, StoreId};
use crate::gate::Gate;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregateError {
    #[error("store {store} is outside 1..={store_count}")]
    UnknownStore { store: StoreId, store_count: usize },

    #[error("no shopping item at position {0}")]
    UnknownItem(usize),
}

/// Final total of one store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StoreTotal {
    pub store: StoreId,
    pub total: f64,
}

/// The store the user picked and its copied total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Selection {
    pub store: StoreId,
    pub total: f64,
}

/// A shopping item whose name matched a catalog record.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedItem {
    pub index: usize,
    pub name: String,
    pub quantity: u32,
}

/// Result of folding one record into one item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fold {
    pub added: f64,
    /// この fold で品目の Rating が初めて設定されたか
    pub first_score: bool,
}

#[derive(Debug)]
struct AggregateState {
    items: Vec<ShoppingItem>,
    store_totals: Vec<f64>,
    selected: Option<Selection>,
}

/// Shopping list, per-store running totals and the selected total.
#[derive(Debug)]
pub struct SharedAggregate {
    state: Gate<AggregateState>,
    store_count: usize,
}

impl SharedAggregate {
    pub fn new(list: ShoppingList, store_count: usize) -> Self {
        Self {
            state: Gate::new(AggregateState {
                items: list.into_items(),
                store_totals: vec![0.0; store_count],
                selected: None,
            }),
            store_count,
        }
    }

    pub fn store_count(&self) -> usize {
        self.store_count
    }

    pub fn item_count(&self) -> usize {
        self.state.with(|s| s.items.len())
    }

    /// Snapshot of the shopping list.
    pub fn items(&self) -> Vec<ShoppingItem> {
        self.state.with(|s| s.items.clone())
    }

    pub fn item(&self, index: usize) -> Option<ShoppingItem> {
        self.state.with(|s| s.items.get(index).cloned())
    }

    /// Items whose name equals `name` ignoring case.
    pub fn matching_items(&self, name: &str) -> Vec<MatchedItem> {
        self.state.with(|s| {
            s.items
                .iter()
                .enumerate()
                .filter(|(_, item)| item.matches(name))
                .map(|(index, item)| MatchedItem {
                    index,
                    name: item.name.clone(),
                    quantity: item.quantity,
                })
                .collect()
        })
    }

    /// Add `price × score × quantity` to `store`'s total and set the item's
    /// rating if it has never been set. Both happen in one gate acquisition.
    pub fn fold(
        &self,
        store: StoreId,
        index: usize,
        record: &CatalogRecord,
    ) -> Result<Fold, AggregateError> {
        let slot = self.store_slot(store)?;
        self.state.with(|s| {
            let item = s
                .items
                .get_mut(index)
                .ok_or(AggregateError::UnknownItem(index))?;
            let added = record.contribution(item.quantity);
            let first_score = !item.rating.is_set();
            if first_score {
                item.rating = Rating::Set(record.score);
            }
            s.store_totals[slot] += added;
            Ok(Fold { added, first_score })
        })
    }

    pub fn store_total(&self, store: StoreId) -> Result<f64, AggregateError> {
        let slot = self.store_slot(store)?;
        Ok(self.state.with(|s| s.store_totals[slot]))
    }

    pub fn store_totals(&self) -> Vec<StoreTotal> {
        let totals = self.state.with(|s| s.store_totals.clone());
        StoreId::all(self.store_count)
            .zip(totals)
            .map(|(store, total)| StoreTotal { store, total })
            .collect()
    }

    /// Copy `store`'s total into the selected slot.
    pub fn select(&self, store: StoreId) -> Result<Selection, AggregateError> {
        let slot = self.store_slot(store)?;
        Ok(self.state.with(|s| {
            let selection = Selection {
                store,
                total: s.store_totals[slot],
            };
            s.selected = Some(selection);
            selection
        }))
    }

    pub fn selected(&self) -> Option<Selection> {
        self.state.with(|s| s.selected)
    }

    /// Average a new user rating into the item's rating.
    pub fn rerate(&self, index: usize, rating: f64) -> Result<Rating, AggregateError> {
        self.state.with(|s| {
            let item = s
                .items
                .get_mut(index)
                .ok_or(AggregateError::UnknownItem(index))?;
            item.rating = item.rating.averaged_with(rating);
            Ok(item.rating)
        })
    }

    fn store_slot(&self, store: StoreId) -> Result<usize, AggregateError> {
        let slot = store.index();
        if slot < self.store_count {
            Ok(slot)
        } else {
            Err(AggregateError::UnknownStore {
                store,
                store_count: self.store_count,
            })
        }
    }
}
