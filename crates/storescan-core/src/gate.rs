//! Gate - 共有領域を守る排他ゲート
//!
//! 初期カウント 1 の計数ロックに相当する。store / subcategory / worker /
//! finalization のすべての tier が同じインスタンスを共有する。
//!
//! # 学習ポイント
//! - ガードを外に出さず、クロージャの中だけで `&mut T` を渡す
//!   （ゲートを保持したままファイル I/O をすることが型の上でできない）
//! - worker の panic で Mutex が poison されても、他の worker は続行できる
//! - 公平性や優先度は保証しない

use std::sync::{Mutex, PoisonError};

/// Mutual-exclusion cell guarding every read-modify-write of `T`.
#[derive(Debug, Default)]
pub struct Gate<T> {
    inner: Mutex<T>,
}

impl<T> Gate<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(value),
        }
    }

    /// Acquire, run `f`, release.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    pub fn into_inner(self) -> T {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}
