//! Historical rate series for charting

use super::currency::RateService;
use super::error::RateError;
use super::model::{ChartSeries, CurrencyPair};
use chrono::{Days, NaiveDate};
use tracing::debug;

/// Days between the end of the chart window and today.
pub const WINDOW_END_OFFSET_DAYS: u64 = 7;
/// Days between the start of the chart window and today.
pub const WINDOW_START_OFFSET_DAYS: u64 = 21;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ChartWindow {
    /// Two weeks of rates ending a week before `today`.
    pub fn ending_before(today: NaiveDate) -> Self {
        Self {
            start: today - Days::new(WINDOW_START_OFFSET_DAYS),
            end: today - Days::new(WINDOW_END_OFFSET_DAYS),
        }
    }
}

/// Day-of-month part of a `YYYY-MM-DD` key; the whole key if it is shorter.
fn day_label(date: &str) -> String {
    date.get(8..)
        .filter(|s| !s.is_empty())
        .unwrap_or(date)
        .to_string()
}

pub struct ChartSeriesBuilder<'a> {
    service: &'a dyn RateService,
}

impl<'a> ChartSeriesBuilder<'a> {
    pub fn new(service: &'a dyn RateService) -> Self {
        Self { service }
    }

    /// Fetches `pair` over the window before `today`. Every date in the
    /// response must carry a rate for `pair.to`.
    pub async fn build_series(
        &self,
        pair: &CurrencyPair,
        today: NaiveDate,
    ) -> Result<ChartSeries, RateError> {
        let window = ChartWindow::ending_before(today);
        debug!(?window, %pair, "Building rate chart");

        let series = self
            .service
            .fetch_timeseries(
                window.start,
                window.end,
                &pair.from,
                std::slice::from_ref(&pair.to),
            )
            .await?;

        if series.is_empty() {
            return Err(RateError::ComputeUnavailable(format!(
                "{pair} between {} and {}",
                window.start, window.end
            )));
        }

        let mut labels = Vec::with_capacity(series.len());
        let mut values = Vec::with_capacity(series.len());
        for (date, rates) in &series {
            let value = rates
                .get(&pair.to)
                .copied()
                .ok_or_else(|| RateError::ComputeUnavailable(format!("{pair} on {date}")))?;
            labels.push(day_label(date));
            values.push(value);
        }

        Ok(ChartSeries {
            pair: pair.clone(),
            labels,
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::TimeSeries;
    use crate::core::sync::tests::MockService;
    use std::collections::BTreeMap;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn series(points: &[(&str, Option<f64>)]) -> TimeSeries {
        points
            .iter()
            .map(|(date, rate)| {
                let rates = rate
                    .map(|r| BTreeMap::from([("USD".to_string(), r)]))
                    .unwrap_or_default();
                (date.to_string(), rates)
            })
            .collect()
    }

    #[test]
    fn test_window_crosses_month_boundary() {
        let window = ChartWindow::ending_before(day(19));
        assert_eq!(window.start, NaiveDate::from_ymd_opt(2026, 9, 28).unwrap());
        assert_eq!(window.end, day(12));
    }

    #[test]
    fn test_day_label() {
        assert_eq!(day_label("2026-10-05"), "05");
        assert_eq!(day_label("2026-10"), "2026-10");
    }

    #[tokio::test]
    async fn test_series_is_index_aligned_in_date_order() {
        let service = MockService {
            series: Some(series(&[
                ("2026-10-01", Some(0.0121)),
                ("2026-09-30", Some(0.0120)),
                ("2026-10-02", Some(0.0122)),
            ])),
            ..Default::default()
        };

        let pair = CurrencyPair::new("INR", "USD");
        let chart = ChartSeriesBuilder::new(&service)
            .build_series(&pair, day(19))
            .await
            .unwrap();

        assert_eq!(chart.labels, vec!["30", "01", "02"]);
        assert_eq!(chart.values, vec![0.0120, 0.0121, 0.0122]);
        assert_eq!(chart.labels.len(), chart.values.len());

        let requests = service.series_requests.lock().unwrap().clone();
        assert_eq!(
            requests,
            vec![(
                NaiveDate::from_ymd_opt(2026, 9, 28).unwrap(),
                day(12),
                "INR".to_string(),
                vec!["USD".to_string()]
            )]
        );
    }

    #[tokio::test]
    async fn test_service_failure_is_surfaced() {
        let service = MockService::default();
        let result = ChartSeriesBuilder::new(&service)
            .build_series(&CurrencyPair::new("INR", "USD"), day(19))
            .await;
        assert!(matches!(result, Err(RateError::NetworkUnavailable(_))));
    }

    #[tokio::test]
    async fn test_gap_in_series_is_unavailable() {
        let service = MockService {
            series: Some(series(&[("2026-10-01", Some(0.0121)), ("2026-10-02", None)])),
            ..Default::default()
        };
        let result = ChartSeriesBuilder::new(&service)
            .build_series(&CurrencyPair::new("INR", "USD"), day(19))
            .await;
        assert_eq!(
            result,
            Err(RateError::ComputeUnavailable(
                "INR to USD on 2026-10-02".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_empty_window_is_unavailable() {
        let service = MockService {
            series: Some(TimeSeries::new()),
            ..Default::default()
        };
        let result = ChartSeriesBuilder::new(&service)
            .build_series(&CurrencyPair::new("INR", "USD"), day(19))
            .await;
        assert!(matches!(result, Err(RateError::ComputeUnavailable(_))));
    }
}
