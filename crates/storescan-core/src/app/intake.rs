//! Intake - 対話入力の検証
//!
//! | 質問 | 不正入力 |
//! |------|----------|
//! | 名前（identity） | 再入力 |
//! | 品目数 | fatal-setup（fan-out 前に終了） |
//! | 品目名・数量 | 再入力 |
//! | 購入上限 | 再入力（0 以下は「上限なし」） |
//! | 店舗選択 | 再入力（回数無制限） |
//!
//! 再入力待ちの間に入力が閉じたら `IntakeError::InputClosed` で終わる。

use tracing::debug;

use crate::domain::{
    IntakeError, SetupError, ShoppingItem, ShoppingList, StorescanError, StoreId,
};
use crate::ports::Prompt;

/// Ask `question` until `parse` accepts the answer.
///
/// `parse` returns the line to show before asking again.
fn ask_until<T>(
    prompt: &mut dyn Prompt,
    question: &str,
    what: &'static str,
    mut parse: impl FnMut(&str) -> Result<T, String>,
) -> Result<T, IntakeError> {
    loop {
        let Some(answer) = prompt.ask(question)? else {
            return Err(IntakeError::InputClosed(what));
        };
        match parse(answer.trim()) {
            Ok(value) => return Ok(value),
            Err(reason) => {
                debug!(what, input = %answer, "invalid input; asking again");
                prompt.say(&reason)?;
            }
        }
    }
}

/// User name; it becomes part of the log file name.
pub fn ask_identity(prompt: &mut dyn Prompt, max_name_len: usize) -> Result<String, IntakeError> {
    let max_chars = max_name_len.saturating_sub(1);
    ask_until(prompt, "Enter your name: ", "name", |input| {
        if input.is_empty() {
            Err("Name must not be empty.".to_string())
        } else if input.contains(['/', '\\']) || input == "." || input == ".." {
            Err("Name must not contain path separators.".to_string())
        } else if input.chars().any(char::is_whitespace) {
            Err("Name must be a single word.".to_string())
        } else if input.chars().count() > max_chars {
            Err(format!("Name must be at most {max_chars} characters."))
        } else {
            Ok(input.to_string())
        }
    })
}

/// Number of products; anything outside `1..=capacity` ends the run.
pub fn ask_item_count(prompt: &mut dyn Prompt, capacity: usize) -> Result<usize, StorescanError> {
    let answer = prompt
        .ask("How many products do you want to order? ")
        .map_err(IntakeError::from)?
        .ok_or(IntakeError::InputClosed("number of products"))?;

    match answer.trim().parse::<usize>() {
        Ok(count) if (1..=capacity).contains(&count) => Ok(count),
        _ => Err(SetupError::InvalidItemCount {
            input: answer.trim().to_string(),
            capacity,
        }
        .into()),
    }
}

/// Ask name and quantity for product `position` (1-based) and append it.
pub fn ask_item(
    prompt: &mut dyn Prompt,
    list: &mut ShoppingList,
    position: usize,
) -> Result<(), StorescanError> {
    let name = ask_until(
        prompt,
        &format!("Enter name of product {position}: "),
        "product name",
        |input| list.check_name(input).map_err(|e| format!("Invalid name: {e}.")),
    )?;
    let quantity = ask_until(
        prompt,
        &format!("Enter quantity for {name}: "),
        "quantity",
        |input| match input.parse::<u32>() {
            Ok(q) if q >= 1 => Ok(q),
            _ => Err("Quantity must be a whole number of at least 1.".to_string()),
        },
    )?;
    list.push(ShoppingItem::new(name, quantity))?;
    Ok(())
}

/// `None` when no ceiling applies.
pub fn ask_ceiling(prompt: &mut dyn Prompt) -> Result<Option<f64>, IntakeError> {
    ask_until(
        prompt,
        "Enter purchase ceiling (0 if not defined): ",
        "purchase ceiling",
        |input| match input.parse::<f64>() {
            Ok(c) if c.is_finite() && c > 0.0 => Ok(Some(c)),
            Ok(c) if c.is_finite() => Ok(None),
            _ => Err("Invalid ceiling. Please enter a number.".to_string()),
        },
    )
}

pub fn ask_store_selection(
    prompt: &mut dyn Prompt,
    store_count: usize,
) -> Result<StoreId, IntakeError> {
    ask_until(
        prompt,
        &format!("Select a store to proceed with purchase (1-{store_count}): "),
        "store selection",
        |input| {
            input
                .parse::<u16>()
                .ok()
                .and_then(StoreId::new)
                .filter(|s| usize::from(s.get()) <= store_count)
                .ok_or_else(|| "Invalid selection. Please try again.".to_string())
        },
    )
}
