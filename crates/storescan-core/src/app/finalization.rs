//! Finalization Pipeline - 店舗選択後の 3 タスク
//!
//! - valuation reporter: 選択された合計を読んでログに残す
//! - ceiling-gated finalizer: 上限を超えていれば拒否、そうでなければ確定
//! - re-rating: 品目ごとにユーザーの評価を聞き、現在の Rating と平均する
//!
//! 3 つは互いに順序依存がなく並行に走る。Orchestrator は 3 つ全部を待つ。

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinError;
use tracing::{info, warn};

use crate::aggregate::{Selection, SharedAggregate};
use crate::domain::FinalizationError;
use crate::ports::{ActivityLog, Prompt};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "verdict")]
pub enum Verdict {
    Finalized { total: f64 },
    ExceedsCeiling { total: f64, ceiling: f64 },
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Finalized { total } => {
                write!(f, "Purchase finalized with total score {total:.2}.")
            }
            Verdict::ExceedsCeiling { total, ceiling } => write!(
                f,
                "Total score {total:.2} exceeds the purchase ceiling of {ceiling:.2}. Purchase cannot be completed."
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum RatingOutcome {
    Updated { item: String, rating: f64 },
    Skipped { item: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalizationReport {
    pub selection: Selection,
    pub valuation: f64,
    pub verdict: Verdict,
    pub ratings: Vec<RatingOutcome>,
}

/// Run the three tasks concurrently and wait for all of them.
///
/// The prompt is handed to the re-rating task and returned afterwards.
pub async fn run(
    aggregate: Arc<SharedAggregate>,
    log: Arc<dyn ActivityLog>,
    ceiling: Option<f64>,
    prompt: Box<dyn Prompt>,
) -> Result<(FinalizationReport, Box<dyn Prompt>), FinalizationError> {
    let selection = aggregate.selected().ok_or(FinalizationError::NotSelected)?;

    let valuation = tokio::spawn({
        let aggregate = Arc::clone(&aggregate);
        let log = Arc::clone(&log);
        async move { report_valuation(&aggregate, log.as_ref()) }
    });
    let finalizer = tokio::spawn({
        let aggregate = Arc::clone(&aggregate);
        let log = Arc::clone(&log);
        async move { finalize_purchase(&aggregate, log.as_ref(), ceiling) }
    });
    // 対話入力でブロックするので blocking pool で動かす
    let rerating = tokio::task::spawn_blocking(move || {
        let mut prompt = prompt;
        let outcomes = rerate_items(&aggregate, log.as_ref(), prompt.as_mut());
        (outcomes, prompt)
    });

    let (valuation, finalizer, rerating) = tokio::join!(valuation, finalizer, rerating);
    let valuation = valuation.map_err(|e| task_failed("valuation", e))??;
    let verdict = finalizer.map_err(|e| task_failed("finalization", e))??;
    let (ratings, prompt) = rerating.map_err(|e| task_failed("re-rating", e))?;

    Ok((
        FinalizationReport {
            selection,
            valuation,
            verdict,
            ratings,
        },
        prompt,
    ))
}

fn task_failed(task: &'static str, err: JoinError) -> FinalizationError {
    FinalizationError::TaskFailed {
        task,
        reason: err.to_string(),
    }
}

pub fn report_valuation(
    aggregate: &SharedAggregate,
    log: &dyn ActivityLog,
) -> Result<f64, FinalizationError> {
    let total = aggregate
        .selected()
        .ok_or(FinalizationError::NotSelected)?
        .total;
    info!(total, "valuation reported");
    log.record(&format!("Valuation: Total Score = {total:.2}"));
    Ok(total)
}

/// 割引ロジックはない（拡張ポイント）
pub fn finalize_purchase(
    aggregate: &SharedAggregate,
    log: &dyn ActivityLog,
    ceiling: Option<f64>,
) -> Result<Verdict, FinalizationError> {
    let total = aggregate
        .selected()
        .ok_or(FinalizationError::NotSelected)?
        .total;

    let verdict = match ceiling {
        Some(ceiling) if total > ceiling => {
            warn!(total, ceiling, "purchase exceeds ceiling");
            log.record("Finalization: Purchase exceeded ceiling and was not completed.");
            Verdict::ExceedsCeiling { total, ceiling }
        }
        _ => {
            info!(total, "purchase finalized");
            log.record("Finalization: Purchase finalized.");
            Verdict::Finalized { total }
        }
    };
    Ok(verdict)
}

/// Ask for a new rating per item, sequentially.
pub fn rerate_items(
    aggregate: &SharedAggregate,
    log: &dyn ActivityLog,
    prompt: &mut dyn Prompt,
) -> Vec<RatingOutcome> {
    let items = aggregate.items();
    let mut outcomes = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let question = format!(
            "Rate the product '{}' (current average score: {:.2}): ",
            item.name,
            item.rating.display_value()
        );
        let answer = match prompt.ask(&question) {
            Ok(Some(answer)) => answer,
            Ok(None) => {
                warn!(remaining = items.len() - index, "input closed; remaining re-ratings skipped");
                outcomes.extend(items[index..].iter().map(|i| RatingOutcome::Skipped {
                    item: i.name.clone(),
                }));
                break;
            }
            Err(err) => {
                warn!(error = %err, "re-rating prompt failed; remaining re-ratings skipped");
                outcomes.extend(items[index..].iter().map(|i| RatingOutcome::Skipped {
                    item: i.name.clone(),
                }));
                break;
            }
        };

        let Some(rating) = parse_rating(&answer) else {
            warn!(item = %item.name, input = %answer, "invalid rating skipped");
            if let Err(err) = prompt.say(&format!("Invalid input. Skipping rating for '{}'.", item.name)) {
                warn!(error = %err, "cannot show re-rating warning");
            }
            outcomes.push(RatingOutcome::Skipped {
                item: item.name.clone(),
            });
            continue;
        };

        match aggregate.rerate(index, rating) {
            Ok(updated) => {
                let value = updated.display_value();
                log.record(&format!(
                    "Re-Rating: Updated score for '{}' to {value:.2}",
                    item.name
                ));
                outcomes.push(RatingOutcome::Updated {
                    item: item.name.clone(),
                    rating: value,
                });
            }
            Err(err) => {
                warn!(item = %item.name, error = %err, "re-rating rejected");
                outcomes.push(RatingOutcome::Skipped {
                    item: item.name.clone(),
                });
            }
        }
    }
    outcomes
}

fn parse_rating(input: &str) -> Option<f64> {
    input.trim().parse::<f64>().ok().filter(|r| r.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CatalogRecord, Rating, ShoppingItem, ShoppingList, StoreId};
    use crate::impls::{MemoryActivityLog, ScriptedPrompt};
    use rstest::rstest;

    fn selected_aggregate(items: &[(&str, u32)], price: f64, score: f64) -> Arc<SharedAggregate> {
        let mut list = ShoppingList::new(100, 50);
        for (name, qty) in items {
            list.push(ShoppingItem::new(*name, *qty)).unwrap();
        }
        let agg = SharedAggregate::new(list, 3);
        let store = StoreId::new(1).unwrap();
        let record = CatalogRecord {
            name: items[0].0.to_string(),
            price,
            score,
            entity: 0,
            last_modified: None,
        };
        agg.fold(store, 0, &record).unwrap();
        agg.select(store).unwrap();
        Arc::new(agg)
    }

    #[test]
    fn ceiling_below_total_rejects_without_finalized_line() {
        let agg = selected_aggregate(&[("Widget", 2)], 10.0, 0.8);
        let log = MemoryActivityLog::new();

        let verdict = finalize_purchase(&agg, &log, Some(10.0)).unwrap();

        assert_eq!(
            verdict,
            Verdict::ExceedsCeiling {
                total: agg.selected().unwrap().total,
                ceiling: 10.0
            }
        );
        assert!(log.messages().iter().all(|m| !m.contains("finalized")));
        assert!(verdict.to_string().contains("cannot be completed"));
    }

    #[rstest]
    #[case::no_ceiling(None)]
    #[case::ceiling_above(Some(20.0))]
    #[case::ceiling_equal(Some(16.0))]
    fn within_ceiling_finalizes(#[case] ceiling: Option<f64>) {
        let agg = selected_aggregate(&[("Widget", 2)], 10.0, 0.8);
        let log = MemoryActivityLog::new();
        let total = agg.selected().unwrap().total;

        let verdict = finalize_purchase(&agg, &log, ceiling).unwrap();

        assert_eq!(verdict, Verdict::Finalized { total });
        assert_eq!(log.messages(), vec!["Finalization: Purchase finalized.".to_string()]);
    }

    #[test]
    fn valuation_requires_selection() {
        let agg = SharedAggregate::new(ShoppingList::new(1, 50), 3);
        let log = MemoryActivityLog::new();
        assert!(matches!(
            report_valuation(&agg, &log),
            Err(FinalizationError::NotSelected)
        ));
    }

    #[test]
    fn rerating_averages_and_logs_exactly_once() {
        let agg = selected_aggregate(&[("Widget", 2)], 10.0, 0.8);
        let log = MemoryActivityLog::new();
        let mut prompt = ScriptedPrompt::new(["7"]);

        let outcomes = rerate_items(&agg, &log, &mut prompt);

        let rating = agg.items()[0].rating.value().unwrap();
        assert!((rating - 3.9).abs() < 1e-9);
        assert_eq!(outcomes.len(), 1);
        let updates: Vec<_> = log
            .messages()
            .into_iter()
            .filter(|m| m.contains("Updated score for 'Widget' to 3.90"))
            .collect();
        assert_eq!(updates.len(), 1);
        assert!(prompt.transcript()[0].contains("current average score: 0.80"));
    }

    #[rstest]
    #[case::word("great")]
    #[case::empty("")]
    #[case::nan("NaN")]
    fn invalid_rating_skips_item_with_warning(#[case] input: &str) {
        let agg = selected_aggregate(&[("Widget", 1), ("Apple", 1)], 2.0, 0.5);
        let log = MemoryActivityLog::new();
        let mut prompt = ScriptedPrompt::new([input, "4"]);

        let outcomes = rerate_items(&agg, &log, &mut prompt);

        assert_eq!(
            outcomes,
            vec![
                RatingOutcome::Skipped { item: "Widget".into() },
                RatingOutcome::Updated { item: "Apple".into(), rating: 4.0 },
            ]
        );
        assert_eq!(agg.items()[0].rating, Rating::Set(0.5));
        assert!(prompt
            .transcript()
            .iter()
            .any(|l| l == "Invalid input. Skipping rating for 'Widget'."));
    }

    #[test]
    fn closed_input_skips_remaining_items() {
        let agg = selected_aggregate(&[("Widget", 1), ("Apple", 1)], 2.0, 0.5);
        let log = MemoryActivityLog::new();
        let mut prompt = ScriptedPrompt::new(Vec::<String>::new());

        let outcomes = rerate_items(&agg, &log, &mut prompt);

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| matches!(o, RatingOutcome::Skipped { .. })));
        assert!(log.messages().is_empty());
    }

    #[tokio::test]
    async fn pipeline_runs_all_three_tasks() {
        let agg = selected_aggregate(&[("Widget", 2)], 10.0, 0.8);
        let log = Arc::new(MemoryActivityLog::new());
        let prompt = ScriptedPrompt::new(["7"]);

        let (report, _prompt) = run(
            Arc::clone(&agg),
            log.clone(),
            Some(10.0),
            Box::new(prompt.clone()),
        )
        .await
        .unwrap();

        assert!((report.valuation - 16.0).abs() < 1e-9);
        assert!(matches!(report.verdict, Verdict::ExceedsCeiling { .. }));
        assert_eq!(report.ratings.len(), 1);

        let messages = log.messages();
        assert!(messages.contains(&"Valuation: Total Score = 16.00".to_string()));
        assert!(messages.iter().all(|m| !m.contains("finalized")));
        assert_eq!(messages.iter().filter(|m| m.starts_with("Re-Rating")).count(), 1);
    }

    #[tokio::test]
    async fn pipeline_requires_selection() {
        let agg = Arc::new(SharedAggregate::new(ShoppingList::new(1, 50), 3));
        let result = run(
            agg,
            Arc::new(MemoryActivityLog::new()),
            None,
            Box::new(ScriptedPrompt::default()),
        )
        .await;
        assert!(matches!(result, Err(FinalizationError::NotSelected)));
    }
}
