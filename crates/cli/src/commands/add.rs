//! Add to an identity's score in today's partition.
//!
//! The increment is atomic in Redis, so several writers may run this for the
//! same identity at once without losing updates.

use anyhow::Result;
use ranking::RankingAggregator;

use crate::ui;

pub async fn run(aggregator: &RankingAggregator, identity: &str, by: f64) -> Result<()> {
    let day_key = aggregator.keys().day_key(aggregator.today());
    let score = aggregator.add_score(identity, by).await?;

    ui::success(&format!(
        "{} now scores {} {}",
        ui::bold(identity),
        score,
        ui::dimmed(&format!("({day_key})"))
    ));

    Ok(())
}
