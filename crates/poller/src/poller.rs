//! Region poller — drives one fetch → filter → dedup → notify pass per region.

use std::time::Duration;

use chrono::{DateTime, Utc};

use leakwatch_common::config::AppConfig;
use leakwatch_common::types::{Region, VictimRecord};
use leakwatch_engine::{DedupCache, build_message, filter_recent, normalize};
use leakwatch_notifier::{Notifier, TelegramNotifier};

use crate::feed::{FeedSource, RansomwareLiveClient};

/// Result of processing one region in a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionOutcome {
    /// Nothing recent, or everything recent was already notified.
    NoNewVictims,
    /// A notification went out for `count` new victims.
    Sent { count: usize, status: u16 },
    /// Fetch, delivery or persistence failed; the error message.
    Failed(String),
}

/// Outcome for a single region, printable as the per-region status line.
#[derive(Debug, Clone)]
pub struct RegionReport {
    pub region: Region,
    pub outcome: RegionOutcome,
}

impl std::fmt::Display for RegionReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.outcome {
            RegionOutcome::NoNewVictims => write!(f, "[{}] No new victims.", self.region.name),
            RegionOutcome::Sent { count, status } => write!(
                f,
                "[{}] Notification sent ({} new). Status code: {}",
                self.region.name, count, status
            ),
            RegionOutcome::Failed(e) => write!(f, "[{}] ERROR: {}", self.region.name, e),
        }
    }
}

/// Polls every configured region in order and notifies about new victims.
pub struct RegionPoller {
    regions: Vec<Region>,
    feed: Box<dyn FeedSource>,
    notifier: Box<dyn Notifier>,
    cache: DedupCache,
}

impl RegionPoller {
    pub fn new(
        regions: Vec<Region>,
        feed: Box<dyn FeedSource>,
        notifier: Box<dyn Notifier>,
        cache: DedupCache,
    ) -> Self {
        Self {
            regions,
            feed,
            notifier,
            cache,
        }
    }

    /// Wire up the HTTP feed client, Telegram notifier and on-disk cache.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(config.http_timeout_secs);

        let feed = RansomwareLiveClient::new(&config.feed_base_url, timeout)?;
        let notifier = TelegramNotifier::new(
            config.telegram_bot_token.clone(),
            config.telegram_chat_id.clone(),
        )?
        .with_api_base(config.telegram_api_base.clone())
        .with_timeout(timeout)?;
        let cache = DedupCache::load(&config.cache_path);

        Ok(Self::new(
            config.regions.clone(),
            Box::new(feed),
            Box::new(notifier),
            cache,
        ))
    }

    pub fn cache(&self) -> &DedupCache {
        &self.cache
    }

    /// Run one cycle over all regions using the current time.
    pub async fn run_cycle(&mut self) -> Vec<RegionReport> {
        self.run_cycle_at(Utc::now()).await
    }

    /// Run one cycle over all regions, measuring recency against `now`.
    ///
    /// A failure in one region is reported in its `RegionReport` and never
    /// stops the regions after it.
    pub async fn run_cycle_at(&mut self, now: DateTime<Utc>) -> Vec<RegionReport> {
        let regions = self.regions.clone();
        let mut reports = Vec::with_capacity(regions.len());

        for region in regions {
            let outcome = match self.process_region(&region, now).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::warn!(
                        region = %region.code,
                        error = %e,
                        "Region processing failed"
                    );
                    RegionOutcome::Failed(e.to_string())
                }
            };

            reports.push(RegionReport { region, outcome });
        }

        reports
    }

    /// Fetch, filter and dedup one region; notify and persist if anything is new.
    async fn process_region(
        &mut self,
        region: &Region,
        now: DateTime<Utc>,
    ) -> anyhow::Result<RegionOutcome> {
        let payload = self.feed.fetch(&region.code).await?;
        let recent = filter_recent(normalize(payload), now);
        let fresh = self.cache.select_new(&region.name, recent);

        if fresh.is_empty() {
            tracing::info!(region = %region.code, "No new victims");
            return Ok(RegionOutcome::NoNewVictims);
        }

        let message = build_message(&region.name, &fresh);
        let status = match self.notifier.send(&message).await {
            Ok(status) => status,
            // The same batch would be rejected again on every cycle and hold
            // back every later victim in this region.
            Err(e) if e.is_permanent() => {
                tracing::warn!(
                    region = %region.code,
                    new_victims = fresh.len(),
                    error = %e,
                    "Notification permanently rejected, marking batch as seen"
                );
                self.remember(&region.name, &fresh)?;
                return Err(e.into());
            }
            // Transient failures leave the batch unmarked for the next cycle.
            Err(e) => return Err(e.into()),
        };

        self.remember(&region.name, &fresh)?;

        tracing::info!(
            region = %region.code,
            new_victims = fresh.len(),
            channel = self.notifier.channel_name(),
            status,
            "Notification delivered"
        );

        Ok(RegionOutcome::Sent {
            count: fresh.len(),
            status,
        })
    }

    /// Mark `records` as notified for `region_name` and persist the cache.
    fn remember(&mut self, region_name: &str, records: &[VictimRecord]) -> anyhow::Result<()> {
        for record in records {
            self.cache.mark_seen(region_name, record);
        }
        self.cache.save()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_lines() {
        let region = Region::new("QA", "Qatar");
        let line = |outcome| {
            RegionReport {
                region: region.clone(),
                outcome,
            }
            .to_string()
        };

        assert_eq!(line(RegionOutcome::NoNewVictims), "[Qatar] No new victims.");
        assert_eq!(
            line(RegionOutcome::Sent {
                count: 3,
                status: 200
            }),
            "[Qatar] Notification sent (3 new). Status code: 200"
        );
        assert_eq!(
            line(RegionOutcome::Failed("Feed error: boom".into())),
            "[Qatar] ERROR: Feed error: boom"
        );
    }
}
