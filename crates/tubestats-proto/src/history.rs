//! Per-channel metric history and the chart series derived from it.

use chrono::{DateTime, Utc};

use crate::protocol::{Metric, MetricSnapshot};

/// Snapshots of one channel, oldest first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct History {
    snapshots: Vec<MetricSnapshot>,
}

impl History {
    /// Order raw snapshots by timestamp. The sort is stable, so snapshots
    /// sharing a timestamp keep their arrival order.
    pub fn from_snapshots(mut snapshots: Vec<MetricSnapshot>) -> Self {
        snapshots.sort_by_key(|s| s.timestamp);
        Self { snapshots }
    }

    pub fn snapshots(&self) -> &[MetricSnapshot] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Chart data for `metric`. Never re-sorts; switching metric is a pure
    /// projection of the already ordered snapshots.
    pub fn series(&self, metric: Metric) -> Series {
        if self.snapshots.is_empty() {
            return Series::NoHistory;
        }
        let points = self
            .snapshots
            .iter()
            .map(|s| SeriesPoint {
                label: display_label(s.timestamp),
                value: metric.of_snapshot(s),
            })
            .collect();
        Series::Points(ChartSeries { metric, points })
    }
}

/// Human-readable x-axis label for a snapshot.
pub fn display_label(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

/// Chart input for one metric, or the explicit absence of data.
#[derive(Debug, Clone, PartialEq)]
pub enum Series {
    NoHistory,
    Points(ChartSeries),
}

impl Series {
    pub fn points(&self) -> Option<&ChartSeries> {
        match self {
            Self::Points(s) => Some(s),
            Self::NoHistory => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesPoint {
    pub label: String,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub metric: Metric,
    pub points: Vec<SeriesPoint>,
}

impl ChartSeries {
    /// Dataset name shown in the legend.
    pub fn label(&self) -> &'static str {
        self.metric.label()
    }

    pub fn title(&self) -> String {
        format!("{} Over Time", self.metric.label())
    }

    /// `(x, y)` pairs with x = position in the series.
    pub fn xy(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64, p.value as f64))
            .collect()
    }

    pub fn x_bounds(&self) -> [f64; 2] {
        [0.0, self.points.len().saturating_sub(1).max(1) as f64]
    }

    /// Y range hugging the data rather than starting at zero, padded by 5% of
    /// the spread (or of the value itself for a flat line).
    pub fn y_bounds(&self) -> [f64; 2] {
        let min = self.points.iter().map(|p| p.value).min().unwrap_or(0) as f64;
        let max = self.points.iter().map(|p| p.value).max().unwrap_or(0) as f64;
        let spread = max - min;
        let pad = if spread > 0.0 {
            spread * 0.05
        } else {
            (max.abs() * 0.05).max(1.0)
        };
        [(min - pad).max(0.0), max + pad]
    }

    /// First, middle and last labels, deduplicated, for a compact x axis.
    pub fn axis_labels(&self) -> Vec<&str> {
        let n = self.points.len();
        let mut idx = vec![0, n / 2, n.saturating_sub(1)];
        idx.dedup();
        idx.into_iter()
            .filter_map(|i| self.points.get(i).map(|p| p.label.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn snap(y: i32, m: u32, d: u32, subs: u64) -> MetricSnapshot {
        MetricSnapshot {
            timestamp: Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap(),
            subscriber_count: subs,
            view_count: subs * 10,
            video_count: subs / 10,
        }
    }

    fn pairs(series: &Series) -> Vec<(String, u64)> {
        series
            .points()
            .unwrap()
            .points
            .iter()
            .map(|p| (p.label.clone(), p.value))
            .collect()
    }

    #[test]
    fn test_two_snapshot_scenario() {
        let history = History::from_snapshots(vec![snap(2020, 1, 2, 100), snap(2020, 1, 1, 90)]);
        assert_eq!(
            pairs(&history.series(Metric::SubscriberCount)),
            vec![("2020-01-01".to_string(), 90), ("2020-01-02".to_string(), 100)]
        );
    }

    #[test]
    fn test_order_independent_for_every_permutation() {
        let base = vec![
            snap(2021, 3, 1, 10),
            snap(2021, 1, 1, 30),
            snap(2021, 2, 1, 20),
            snap(2020, 12, 31, 40),
        ];
        let expected = History::from_snapshots(base.clone()).series(Metric::ViewCount);

        // Heap's algorithm over the 24 orderings
        fn permute(k: usize, items: &mut Vec<MetricSnapshot>, out: &mut Vec<Vec<MetricSnapshot>>) {
            if k <= 1 {
                out.push(items.clone());
                return;
            }
            permute(k - 1, items, out);
            for i in 0..k - 1 {
                if k % 2 == 0 {
                    items.swap(i, k - 1);
                } else {
                    items.swap(0, k - 1);
                }
                permute(k - 1, items, out);
            }
        }
        let mut items = base;
        let mut all = Vec::new();
        permute(items.len(), &mut items, &mut all);
        assert_eq!(all.len(), 24);

        for order in all {
            assert_eq!(History::from_snapshots(order).series(Metric::ViewCount), expected);
        }
    }

    #[test]
    fn test_equal_timestamps_keep_arrival_order() {
        let a = snap(2022, 5, 5, 1);
        let b = snap(2022, 5, 5, 2);
        let history = History::from_snapshots(vec![b.clone(), snap(2022, 5, 4, 9), a.clone()]);
        let values: Vec<u64> = history.snapshots().iter().map(|s| s.subscriber_count).collect();
        assert_eq!(values, vec![9, 2, 1]);
    }

    #[test]
    fn test_metric_switch_projects_same_order() {
        let history = History::from_snapshots(vec![snap(2020, 1, 3, 30), snap(2020, 1, 1, 10)]);
        let subs = history.series(Metric::SubscriberCount);
        let views = history.series(Metric::ViewCount);
        let videos = history.series(Metric::VideoCount);
        assert_eq!(pairs(&subs).iter().map(|p| p.1).collect::<Vec<_>>(), vec![10, 30]);
        assert_eq!(pairs(&views).iter().map(|p| p.1).collect::<Vec<_>>(), vec![100, 300]);
        assert_eq!(pairs(&videos).iter().map(|p| p.1).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(views.points().unwrap().title(), "Views Over Time");
        assert_eq!(videos.points().unwrap().label(), "Videos");
    }

    #[test]
    fn test_empty_is_no_history_not_zero_series() {
        let history = History::from_snapshots(Vec::new());
        assert_eq!(history.series(Metric::SubscriberCount), Series::NoHistory);

        let zeros = History::from_snapshots(vec![snap(2020, 1, 1, 0)]);
        let series = zeros.series(Metric::SubscriberCount);
        assert_ne!(series, Series::NoHistory);
        assert_eq!(pairs(&series), vec![("2020-01-01".to_string(), 0)]);
    }

    #[test]
    fn test_chart_geometry() {
        let history = History::from_snapshots(vec![
            snap(2020, 1, 1, 100),
            snap(2020, 1, 2, 200),
            snap(2020, 1, 3, 300),
        ]);
        let series = history.series(Metric::SubscriberCount);
        let chart = series.points().unwrap();
        assert_eq!(chart.xy(), vec![(0.0, 100.0), (1.0, 200.0), (2.0, 300.0)]);
        assert_eq!(chart.x_bounds(), [0.0, 2.0]);
        assert_eq!(chart.y_bounds(), [90.0, 310.0]);
        assert_eq!(chart.axis_labels(), vec!["2020-01-01", "2020-01-02", "2020-01-03"]);

        let flat = History::from_snapshots(vec![snap(2020, 1, 1, 0)]);
        let flat = flat.series(Metric::SubscriberCount);
        let flat = flat.points().unwrap();
        assert_eq!(flat.y_bounds(), [0.0, 1.0]);
        assert_eq!(flat.x_bounds(), [0.0, 1.0]);
        assert_eq!(flat.axis_labels(), vec!["2020-01-01"]);
    }
}
