//! Aggregate statistics for the Models & Stats dashboard cards.

use time::{Date, OffsetDateTime};

use crate::api::predictions::{self, DailyCount, PredictionQuery};
use crate::api::{ApiClient, ApiError, dataset};
use crate::egui_app::ui::style::StatusTone;

use super::EguiController;
use super::jobs::{StatsOutcome, StatsResult};

/// Trailing window fetched for the daily series. Only today and yesterday
/// feed the cards, but a short buffer tolerates timezone skew between the
/// client and the backend.
const DAILY_WINDOW_DAYS: u16 = 7;

impl EguiController {
    pub fn refresh_dashboard_stats(&mut self) {
        self.ui.stats.loading = true;
        self.jobs.begin_stats(self.api.clone());
    }

    pub(in crate::egui_app::controller) fn apply_stats_loaded(&mut self, result: StatsResult) {
        self.jobs.clear_stats();
        self.ui.stats.loading = false;
        match result.result {
            Ok(outcome) => {
                let (today, yesterday) = daily_counts_for(&outcome.series, local_today());
                self.ui.stats.total_predictions = outcome.total_predictions;
                self.ui.stats.today = today;
                self.ui.stats.yesterday = yesterday;
                self.ui.stats.average_confidence = outcome.average_confidence;
                self.ui.stats.distribution = Some(outcome.distribution);
                self.ui.stats.loaded_once = true;
                self.set_status("Statistics refreshed", StatusTone::Idle);
            }
            Err(err) => self.report_api_error("Could not load statistics", &err),
        }
    }
}

pub(super) fn run_stats_job(client: &ApiClient) -> Result<StatsOutcome, ApiError> {
    // A one-row page is the cheapest way to learn the overall total.
    let probe = PredictionQuery {
        page: 1,
        limit: 1,
        ..PredictionQuery::default()
    };
    let total_predictions = predictions::fetch_predictions(client, &probe)?.total;
    let series = predictions::fetch_daily_series(client, DAILY_WINDOW_DAYS)?;
    let average_confidence = predictions::fetch_average_confidence(client)?;
    let distribution = dataset::fetch_class_stats(client)?;
    Ok(StatsOutcome {
        total_predictions,
        series,
        average_confidence,
        distribution,
    })
}

fn local_today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

/// Counts for `today` and the day before, keyed by calendar date. Days
/// missing from the series count as zero.
fn daily_counts_for(series: &[DailyCount], today: Date) -> (u64, u64) {
    let count_on = |date: Date| {
        series
            .iter()
            .find(|entry| entry.date == date)
            .map(|entry| entry.count)
            .unwrap_or(0)
    };
    let yesterday = today.previous_day().map(count_on).unwrap_or(0);
    (count_on(today), yesterday)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn counts_are_keyed_by_date_not_position() {
        let series = vec![
            DailyCount {
                date: date!(2026 - 02 - 09),
                count: 3,
            },
            DailyCount {
                date: date!(2026 - 02 - 11),
                count: 12,
            },
            DailyCount {
                date: date!(2026 - 02 - 10),
                count: 5,
            },
        ];
        assert_eq!(daily_counts_for(&series, date!(2026 - 02 - 11)), (12, 5));
    }

    #[test]
    fn missing_days_count_as_zero() {
        let series = vec![DailyCount {
            date: date!(2026 - 02 - 08),
            count: 2,
        }];
        assert_eq!(daily_counts_for(&series, date!(2026 - 02 - 11)), (0, 0));
        assert_eq!(daily_counts_for(&series, date!(2026 - 02 - 09)), (0, 2));
        assert_eq!(daily_counts_for(&[], date!(2026 - 02 - 11)), (0, 0));
    }
}
