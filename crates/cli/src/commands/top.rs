//! List the highest-scoring identities of a window.
//!
//! Single days are read straight from their partition. Longer windows are
//! unioned into their derived key first, so each call rebuilds that key.
//! Shows:
//! - Rank (1-based, continuing from `--offset`)
//! - Identity
//! - Score summed over the window

use anyhow::{Context, Result, bail};
use ranking::{Entry, RankingAggregator, Window};
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

#[derive(Tabled)]
struct RankRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Identity")]
    identity: String,
    #[tabled(rename = "Score")]
    score: f64,
}

#[derive(Debug, Serialize)]
struct RankedEntry<'a> {
    rank: usize,
    identity: &'a str,
    score: f64,
}

pub async fn run(
    aggregator: &RankingAggregator,
    window: Window,
    offset: usize,
    limit: usize,
    json: bool,
) -> Result<()> {
    let entries = fetch(aggregator, window, offset, limit).await?;

    if json {
        println!("{}", render_json(&entries, offset)?);
    } else if entries.is_empty() {
        println!("No scores for {window}");
    } else {
        println!("{}", render_table(&entries, offset));
    }

    Ok(())
}

async fn fetch(
    aggregator: &RankingAggregator,
    window: Window,
    offset: usize,
    limit: usize,
) -> Result<Vec<Entry>> {
    if limit == 0 {
        bail!("--limit must be at least 1");
    }
    let stop = offset
        .checked_add(limit - 1)
        .context("--offset plus --limit is too large")?;

    Ok(aggregator.top(window, offset, stop).await?)
}

fn ranked(entries: &[Entry], offset: usize) -> impl Iterator<Item = RankedEntry<'_>> {
    entries.iter().enumerate().map(move |(i, entry)| RankedEntry {
        rank: offset + i + 1,
        identity: &entry.identity,
        score: entry.score,
    })
}

fn render_table(entries: &[Entry], offset: usize) -> String {
    let rows: Vec<RankRow> = ranked(entries, offset)
        .map(|entry| RankRow {
            rank: entry.rank,
            identity: entry.identity.to_string(),
            score: entry.score,
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json(entries: &[Entry], offset: usize) -> Result<String> {
    let ranked: Vec<RankedEntry> = ranked(entries, offset).collect();
    Ok(serde_json::to_string_pretty(&ranked)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::context::TestContext;

    async fn seeded() -> TestContext {
        let ctx = TestContext::new("articles");
        for (identity, score) in [("a", 1.0), ("b", 4.0), ("c", 2.0), ("d", 8.0)] {
            ctx.aggregator.add_score(identity, score).await.unwrap();
        }
        ctx
    }

    #[tokio::test]
    async fn fetch_applies_offset_and_limit() {
        let ctx = seeded().await;

        let entries = fetch(&ctx.aggregator, Window::Today, 1, 2).await.unwrap();

        let ids: Vec<&str> = entries.iter().map(|e| e.identity.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn fetch_rejects_zero_limit() {
        let ctx = seeded().await;

        assert!(fetch(&ctx.aggregator, Window::Today, 0, 0).await.is_err());
    }

    #[tokio::test]
    async fn fetch_rejects_offset_past_largest_rank() {
        let ctx = seeded().await;

        let err = fetch(&ctx.aggregator, Window::Today, usize::MAX, 1)
            .await
            .unwrap_err();

        let err = err.downcast_ref::<ranking::RankingError>().unwrap();
        assert!(err.is_invalid_argument());
    }

    #[tokio::test]
    async fn fetch_week_sums_partitions() {
        let ctx = seeded().await;
        ctx.seed_yesterday(&[("a", 10.0)]).await;

        let entries = fetch(&ctx.aggregator, Window::CurrentWeek, 0, 10)
            .await
            .unwrap();

        assert_eq!(entries[0], Entry::new("a", 11.0));
        assert!(ctx.store.contains_key("articles:rank:current_week"));
    }

    #[tokio::test]
    async fn empty_window_is_not_an_error() {
        let ctx = TestContext::new("articles");

        let entries = fetch(&ctx.aggregator, Window::CurrentMonth, 0, 10)
            .await
            .unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn table_numbers_ranks_from_offset() {
        let entries = vec![Entry::new("post7", 12.0), Entry::new("post3", 9.5)];

        let table = render_table(&entries, 10);

        assert!(table.contains("11"));
        assert!(table.contains("post7"));
        assert!(table.contains("12"));
        assert!(table.contains("9.5"));
    }

    #[test]
    fn json_includes_rank_identity_and_score() {
        let entries = vec![Entry::new("post7", 12.0), Entry::new("post3", 9.5)];

        let json: serde_json::Value =
            serde_json::from_str(&render_json(&entries, 0).unwrap()).unwrap();

        assert_eq!(
            json,
            serde_json::json!([
                { "rank": 1, "identity": "post7", "score": 12.0 },
                { "rank": 2, "identity": "post3", "score": 9.5 },
            ])
        );
    }
}
