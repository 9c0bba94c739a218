//! StoreId - 店舗の識別子
//!
//! 店舗は 1 始まりの小さな整数で識別される。集計配列の添字は `index()` で得る。

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one competing store (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreId(u16);

impl StoreId {
    /// 0 は店舗 ID として無効
    pub fn new(id: u16) -> Option<Self> {
        (id >= 1).then_some(Self(id))
    }

    /// `1..=count` の全店舗を列挙
    pub fn all(count: usize) -> impl Iterator<Item = StoreId> {
        let count = u16::try_from(count).unwrap_or(u16::MAX);
        (1..=count).map(StoreId)
    }

    pub fn get(&self) -> u16 {
        self.0
    }

    /// Zero-based slot in the per-store totals array.
    pub fn index(&self) -> usize {
        usize::from(self.0) - 1
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
