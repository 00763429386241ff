//! Check that the backing store answers.

use anyhow::{Result, bail};
use ranking::RankingAggregator;

use crate::ui;

pub async fn run(aggregator: &RankingAggregator) -> Result<()> {
    if !aggregator.health_check().await? {
        bail!("Store connection failed: unexpected PING reply");
    }

    ui::success("Store is reachable");
    Ok(())
}
