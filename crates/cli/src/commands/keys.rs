//! Show which keys a window resolves to.
//!
//! Pure key arithmetic: nothing is read from or written to the store. Handy
//! when checking retention rules or inspecting partitions by hand.

use anyhow::Result;
use ranking::{RankingAggregator, ResolvedWindow, Window};

use crate::ui;

pub fn run(aggregator: &RankingAggregator, window: Window) -> Result<()> {
    let resolved = aggregator.resolve(window)?;
    println!("{}", render(&resolved));
    Ok(())
}

fn render(resolved: &ResolvedWindow) -> String {
    let mut lines = Vec::with_capacity(resolved.day_keys.len() + 2);
    match &resolved.derived_key {
        Some(key) => {
            lines.push(format!("{} {}", ui::dimmed("union into"), ui::bold(key)));
            lines.push(ui::dimmed("from"));
        }
        None => lines.push(ui::dimmed("read directly from")),
    }
    lines.extend(resolved.day_keys.iter().map(|key| format!("  {key}")));
    lines.join("\n")
}
