use chrono::{DateTime, Local};

use crate::model::{Collection, Constrained};
use crate::time::from_wire;

domain!(
    /// Rollup frequency of a metric series.
    MetricFrequency,
    "frequency",
    ["ONE_MIN", "TEN_MIN", "SIXTY_MIN"]
);

field_mapped! {
    /// One data point of a metric series.
    pub struct MetricValue {
        pub current: i64 = "",
        pub min: i64 = "",
        pub max: i64 = "",
        pub value: i64 = "",
        pub start_time_ms: i64 = "startTimeInMillis",
    }
}

impl MetricValue {
    pub fn start_time(&self) -> Option<DateTime<Local>> {
        from_wire(self.start_time_ms)
    }
}

pub type MetricValues = Collection<MetricValue>;

field_mapped! {
    /// A metric series: the metric path and its data points.
    pub struct MetricDataSingle {
        pub frequency: Constrained<MetricFrequency> = "",
        pub path: String = "metricPath",
        pub values: MetricValues = "metricValues",
    }
}

pub type MetricData = Collection<MetricDataSingle>;

impl Collection<MetricDataSingle> {
    /// Series whose path contains `name`.
    pub fn by_partial_name(&self, name: &str) -> MetricData {
        self.filter(|m| m.path.contains(name))
    }

    /// Series whose last path segment is `name`.
    pub fn by_leaf_name(&self, name: &str) -> MetricData {
        self.filter(|m| m.path.rsplit('|').next() == Some(name))
    }

    pub fn by_path(&self, path: &str) -> MetricData {
        self.filter(|m| m.path == path)
    }

    /// Value of the first data point of the first series.
    pub fn first_value(&self) -> Option<i64> {
        self.first()
            .and_then(|series| series.values.first())
            .map(|v| v.value)
    }
}
