use std::collections::BTreeMap;

use hdrhistogram::Histogram;
use serde::{Deserialize, Serialize};

use crate::driver::ReplicationResult;
use crate::engine::SimTime;
use crate::error::StoreError;
use crate::patient::Stage;
use crate::store::ResultStore;

/// Waits are recorded in thousandths of a time unit.
const WAIT_SCALE: f64 = 1000.0;
const SIGNIFICANT_DIGITS: u8 = 3;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StageSummary {
    pub stage: Stage,
    pub served: u64,
    pub mean_wait: SimTime,
    pub p95_wait: SimTime,
    pub mean_queue_length: f64,
}

struct StageStats {
    waits: Histogram<u64>,
    queue_len_sum: u64,
    queue_samples: u64,
}

/// Steady-state waiting times and queue lengths across all replications.
///
/// Waits come from retained patients only; queue samples are filtered by
/// timestamp against the warm-up boundary.
pub struct Analytics {
    warm_up: SimTime,
    stages: BTreeMap<Stage, StageStats>,
}

impl Analytics {
    pub fn new(warm_up: SimTime) -> Result<Self, StoreError> {
        let mut stages = BTreeMap::new();
        for stage in Stage::ALL {
            stages.insert(
                stage,
                StageStats {
                    waits: Histogram::new(SIGNIFICANT_DIGITS)?,
                    queue_len_sum: 0,
                    queue_samples: 0,
                },
            );
        }
        Ok(Self { warm_up, stages })
    }

    pub fn report(&self) -> Vec<StageSummary> {
        self.stages
            .iter()
            .map(|(&stage, stats)| {
                let served = stats.waits.len();
                let (mean_wait, p95_wait) = if served == 0 {
                    (0.0, 0.0)
                } else {
                    (
                        stats.waits.mean() / WAIT_SCALE,
                        stats.waits.value_at_quantile(0.95) as f64 / WAIT_SCALE,
                    )
                };
                let mean_queue_length = if stats.queue_samples == 0 {
                    0.0
                } else {
                    stats.queue_len_sum as f64 / stats.queue_samples as f64
                };
                StageSummary {
                    stage,
                    served,
                    mean_wait,
                    p95_wait,
                    mean_queue_length,
                }
            })
            .collect()
    }
}

impl ResultStore for Analytics {
    fn append(&mut self, result: &ReplicationResult) -> Result<(), StoreError> {
        for patient in &result.patients {
            for stage in patient.route() {
                let wait = patient.stage(stage).and_then(|times| times.wait());
                if let (Some(wait), Some(stats)) = (wait, self.stages.get_mut(&stage)) {
                    stats.waits.record((wait * WAIT_SCALE).round() as u64)?;
                }
            }
        }
        let warm_up = self.warm_up;
        for (stage, samples) in &result.queue_samples {
            let Some(stats) = self.stages.get_mut(stage) else {
                continue;
            };
            for sample in samples.iter().filter(|s| s.timestamp >= warm_up) {
                stats.queue_len_sum += sample.q_len as u64;
                stats.queue_samples += 1;
            }
        }
        Ok(())
    }
}
