//! Session - 対話 1 回分の実行
//!
//! 名前 → 作業ログ作成 → 品目数 → 品目 → 上限 → 評価 → 店舗選択 → finalization
//! → ログを `store<id>/` へ移動、の順に進む。
//!
//! 評価と finalization 以外の対話中は他のタスクが走っていないので、
//! Prompt の読み取りはその場でブロックする。

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::app::finalization::FinalizationReport;
use crate::app::intake;
use crate::app::orchestrator::Orchestrator;
use crate::config::EvaluationConfig;
use crate::domain::{IntakeError, RunId, SetupError, ShoppingList, StorescanError};
use crate::impls::FileActivityLog;
use crate::layout::LogLocations;
use crate::observability::EvaluationReport;
use crate::ports::{CatalogDecoder, Clock, Prompt, SystemClock};

#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub identity: String,
    pub run_id: RunId,
    pub evaluation: EvaluationReport,
    pub finalization: FinalizationReport,
    /// Where the activity log ended up.
    pub log_path: PathBuf,
}

pub struct Session {
    config: EvaluationConfig,
    decoder: Option<Arc<dyn CatalogDecoder>>,
    clock: Arc<dyn Clock>,
}

impl Session {
    pub fn new(config: EvaluationConfig) -> Self {
        Self {
            config,
            decoder: None,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_decoder(mut self, decoder: Arc<dyn CatalogDecoder>) -> Self {
        self.decoder = Some(decoder);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    pub async fn run(&self, prompt: Box<dyn Prompt>) -> Result<SessionReport, StorescanError> {
        self.config.validate()?;
        let mut prompt = prompt;

        let identity = intake::ask_identity(prompt.as_mut(), self.config.max_name_len)?;
        say(prompt.as_mut(), &format!("Welcome, {identity}!"))?;

        let locations = LogLocations::new(&self.config.log_dir, &identity);
        let log = Arc::new(
            FileActivityLog::create(locations.working(), Arc::clone(&self.clock))
                .map_err(SetupError::from)?,
        );
        info!(%identity, path = %log.path().display(), "working log created");

        let count = intake::ask_item_count(prompt.as_mut(), self.config.max_items)?;
        let mut list = ShoppingList::new(self.config.max_items, self.config.max_name_len);
        for position in 1..=count {
            intake::ask_item(prompt.as_mut(), &mut list, position)?;
        }
        let ceiling = intake::ask_ceiling(prompt.as_mut())?;

        let mut builder = Orchestrator::builder(self.config.clone())
            .shopping_list(list)
            .activity_log(log.clone())
            .clock(Arc::clone(&self.clock));
        if let Some(decoder) = &self.decoder {
            builder = builder.decoder(Arc::clone(decoder));
        }
        let orchestrator = builder.build()?;

        let evaluation = orchestrator.evaluate().await?;
        say(prompt.as_mut(), "")?;
        say(prompt.as_mut(), "--- Order Lists from All Stores ---")?;
        for t in &evaluation.totals {
            say(
                prompt.as_mut(),
                &format!("Store {} Total Score: {:.2}", t.store, t.total),
            )?;
        }

        let store = intake::ask_store_selection(prompt.as_mut(), self.config.store_count)?;
        orchestrator.select(store)?;
        say(prompt.as_mut(), &format!("You selected Store {store}."))?;

        let (finalization, mut prompt) = orchestrator.finalize(ceiling, prompt).await?;
        say(
            prompt.as_mut(),
            &format!("Valuation: Total Score = {:.2}", finalization.valuation),
        )?;
        say(prompt.as_mut(), &finalization.verdict.to_string())?;

        // 移動に失敗しても評価結果は有効。作業中の場所にログが残る
        let log_path = match log.relocate(&locations.final_for(store)) {
            Ok(path) => {
                info!(run_id = %orchestrator.run_id(), path = %path.display(), "activity log relocated");
                path
            }
            Err(err) => {
                warn!(run_id = %orchestrator.run_id(), error = %err, "activity log left at working location");
                log.path()
            }
        };

        Ok(SessionReport {
            identity,
            run_id: orchestrator.run_id(),
            evaluation,
            finalization,
            log_path,
        })
    }
}

fn say(prompt: &mut dyn Prompt, line: &str) -> Result<(), StorescanError> {
    prompt
        .say(line)
        .map_err(|e| StorescanError::from(IntakeError::from(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::context::testing::write_entry;
    use crate::app::Verdict;
    use crate::domain::{ErrorKind, StoreId};
    use crate::impls::ScriptedPrompt;

    fn config(root: &std::path::Path) -> EvaluationConfig {
        EvaluationConfig {
            catalog_root: root.join("Dataset"),
            log_dir: root.join("dataset"),
            ..EvaluationConfig::default()
        }
    }

    #[tokio::test]
    async fn full_session_relocates_log_to_selected_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        write_entry(&config.catalog_root.join("Store1/Tools"), "w.txt", "Widget", 10.0, 0.8);
        std::fs::create_dir_all(config.catalog_root.join("Store2")).unwrap();
        std::fs::create_dir_all(config.catalog_root.join("Store3")).unwrap();

        let prompt = ScriptedPrompt::new(["alice", "1", "Widget", "2", "0", "1", "7"]);
        let session = Session::new(config.clone());

        let report = session.run(Box::new(prompt.clone())).await.unwrap();

        let store1 = StoreId::new(1).unwrap();
        assert!((report.evaluation.total_for(store1).unwrap() - 16.0).abs() < 1e-9);
        assert_eq!(report.finalization.selection.store, store1);
        assert!(matches!(report.finalization.verdict, Verdict::Finalized { .. }));

        let working = config.log_dir.join("alice_Order.log");
        let final_path = config.log_dir.join("store1").join("alice_Order.log");
        assert!(!working.exists());
        assert_eq!(report.log_path, final_path);
        let text = std::fs::read_to_string(&final_path).unwrap();
        assert!(text.contains("User selected Store 1 for purchase."));
        assert!(text.contains("Re-Rating: Updated score for 'Widget' to 3.90"));

        let transcript = prompt.transcript();
        assert!(transcript.contains(&"--- Order Lists from All Stores ---".to_string()));
        assert!(transcript.contains(&"You selected Store 1.".to_string()));
    }

    #[tokio::test]
    async fn blocked_store_log_directory_keeps_working_log() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        write_entry(&config.catalog_root.join("Store1/Tools"), "w.txt", "Widget", 10.0, 0.8);
        std::fs::create_dir_all(&config.log_dir).unwrap();
        std::fs::write(config.log_dir.join("store1"), "not a directory").unwrap();

        let prompt = ScriptedPrompt::new(["alice", "1", "Widget", "2", "0", "1", "7"]);
        let report = Session::new(config.clone())
            .run(Box::new(prompt))
            .await
            .unwrap();

        let working = config.log_dir.join("alice_Order.log");
        assert_eq!(report.log_path, working);
        assert!(matches!(report.finalization.verdict, Verdict::Finalized { .. }));
        let text = std::fs::read_to_string(&working).unwrap();
        assert!(text.contains("Finalization: Purchase finalized."));
    }

    #[tokio::test]
    async fn invalid_item_count_stops_before_evaluation() {
        let dir = tempfile::tempdir().unwrap();
        let prompt = ScriptedPrompt::new(["alice", "0"]);

        let err = Session::new(config(dir.path()))
            .run(Box::new(prompt.clone()))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::FatalSetup);
        assert!(prompt
            .transcript()
            .iter()
            .all(|l| !l.starts_with("--- Order Lists")));
    }

    #[tokio::test]
    async fn missing_catalog_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let prompt = ScriptedPrompt::new(["alice", "1", "Widget", "1", "0"]);

        let err = Session::new(config(dir.path()))
            .run(Box::new(prompt))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            StorescanError::Setup(SetupError::CatalogRoot { .. })
        ));
    }
}
