//! Smoother.
//!
//! Trailing rolling mean per locality, ordered by week: the current value
//! and up to `window - 1` preceding values. Runs on the densified grid, so
//! zero-filled gap weeks pull the mean toward zero during quiet periods.

use std::collections::{BTreeMap, VecDeque};

use exposure_incident_models::{IncidentType, TypeValues};
use exposure_pipeline_models::DenseRow;

use crate::{HostNationPartition, PipelineOptions};

/// Bounded window of the most recent values.
#[derive(Debug, Clone)]
struct TrailingWindow {
    capacity: usize,
    values: VecDeque<f64>,
}

impl TrailingWindow {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            values: VecDeque::with_capacity(capacity),
        }
    }

    /// Pushes `value`, evicting the oldest if full, and returns the mean of
    /// the window. The sum is recomputed each step so an all-zero window
    /// yields exactly zero.
    #[allow(clippy::cast_precision_loss)]
    fn push(&mut self, value: f64) -> f64 {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }
}

/// One trailing window per incident type.
struct TypeWindows {
    enemy_action: TrailingWindow,
    explosive_hazard: TrailingWindow,
    friendly_fire: TrailingWindow,
    host_nation_activity: TrailingWindow,
}

impl TypeWindows {
    fn new(options: &PipelineOptions) -> Self {
        let window = options.rolling_window;
        let host_nation_window = match options.host_nation_partition {
            HostNationPartition::Locality => window,
            HostNationPartition::LocalityWeek => 1,
        };
        Self {
            enemy_action: TrailingWindow::new(window),
            explosive_hazard: TrailingWindow::new(window),
            friendly_fire: TrailingWindow::new(window),
            host_nation_activity: TrailingWindow::new(host_nation_window),
        }
    }

    fn window_mut(&mut self, incident_type: IncidentType) -> &mut TrailingWindow {
        match incident_type {
            IncidentType::EnemyAction => &mut self.enemy_action,
            IncidentType::ExplosiveHazard => &mut self.explosive_hazard,
            IncidentType::FriendlyFire => &mut self.friendly_fire,
            IncidentType::HostNationActivity => &mut self.host_nation_activity,
        }
    }

    fn push(&mut self, raw: &TypeValues) -> TypeValues {
        TypeValues::from_fn(|t| self.window_mut(t).push(raw.get(t)))
    }
}

/// Fills the rolling columns of every row.
///
/// Rows are partitioned by locality and scanned in ascending week order;
/// output is ordered by locality, then week. The raw columns are copied
/// unchanged.
#[must_use]
pub fn smooth(rows: &[DenseRow], options: &PipelineOptions) -> Vec<DenseRow> {
    let mut partitions: BTreeMap<&str, Vec<&DenseRow>> = BTreeMap::new();
    for row in rows {
        partitions.entry(row.locality.as_str()).or_default().push(row);
    }

    let mut smoothed = Vec::with_capacity(rows.len());
    for (locality, mut series) in partitions {
        series.sort_by_key(|row| row.week);
        let mut windows = TypeWindows::new(options);
        for row in series {
            smoothed.push(DenseRow {
                week: row.week,
                locality: locality.to_string(),
                raw: row.raw,
                rolling: windows.push(&row.raw),
            });
        }
    }

    log::info!(
        "Smoothed {} rows with a {}-week trailing window",
        smoothed.len(),
        options.rolling_window
    );
    smoothed
}
