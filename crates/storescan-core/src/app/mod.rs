//! App - アプリケーション層
//!
//! ports を組み合わせて評価パイプラインを実装します。
//!
//! # 主要コンポーネント
//! - **OrchestratorBuilder**: 構築とワイヤリング（起動時検証）
//! - **Orchestrator**: store tier の fan-out、join barrier、店舗選択、finalization の起動
//! - **store_coordinator**: 1 店舗のサブカテゴリを列挙して subcategory coordinator を起動
//! - **subcategory_coordinator**: 1 サブカテゴリのエントリごとに worker スレッドを起動
//! - **worker**: 1 エントリをデコードして集計に畳み込む
//! - **finalization**: 選択後の 3 タスク（valuation / ceiling / re-rating）
//! - **intake**: 対話入力の検証と再入力
//! - **Session**: 対話の 1 実行分を最初から最後まで通す

pub mod builder;
pub mod context;
pub mod finalization;
pub mod intake;
pub mod orchestrator;
pub mod session;
pub mod store_coordinator;
pub mod subcategory_coordinator;
pub mod worker;

// 主要な型を再エクスポート
pub use self::builder::{BuildError, OrchestratorBuilder};
pub use self::context::{FanoutLimits, RunContext};
pub use self::finalization::{FinalizationReport, RatingOutcome, Verdict};
pub use self::orchestrator::Orchestrator;
pub use self::session::{Session, SessionReport};
