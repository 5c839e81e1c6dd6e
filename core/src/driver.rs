use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::clinic::Clinic;
use crate::config::ClinicConfig;
use crate::error::{ConfigError, SimError};
use crate::patient::{Patient, Stage};
use crate::resource::QueueSample;
use crate::store::ResultStore;

/// How the random stream is shared between replications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeedPolicy {
    /// Seed once and keep drawing from the same stream across replications.
    #[default]
    Continuous,
    /// Reseed with `seed + run_id` so any replication can be rerun alone.
    PerReplication,
}

/// Everything one replication observed.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplicationResult {
    pub run_id: u32,
    /// Patients that arrived after warm-up, in arrival order.
    pub patients: Vec<Patient>,
    pub queue_samples: BTreeMap<Stage, Vec<QueueSample>>,
}

impl ReplicationResult {
    pub fn sample_count(&self) -> usize {
        self.queue_samples.values().map(Vec::len).sum()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub replications: u32,
    pub patients: usize,
    pub samples: usize,
}

/// Runs one replication from an empty clinic to the configured horizon.
pub fn run_replication<R: Rng>(
    run_id: u32,
    config: &ClinicConfig,
    rng: R,
) -> Result<ReplicationResult, ConfigError> {
    let mut sim = Clinic::replication(config, rng)?;
    let events = sim.run_until(config.horizon());
    let processes = sim.process_count();
    let (clinic, pools) = sim.into_parts();
    log::debug!(
        "replication {run_id}: {events} events, {processes} processes, {} patients arrived",
        clinic.patients().len()
    );
    Ok(clinic.into_result(run_id, pools))
}

/// Drives `n_sims` independent replications, handing each result to `store`
/// as soon as it is complete.
pub struct ReplicationDriver<'a> {
    config: &'a ClinicConfig,
}

impl<'a> ReplicationDriver<'a> {
    pub fn new(config: &'a ClinicConfig) -> Self {
        Self { config }
    }

    pub fn seed_for(&self, run_id: u32) -> u64 {
        let seed = self.config.simulation.seed;
        match self.config.simulation.seed_policy {
            SeedPolicy::Continuous => seed,
            SeedPolicy::PerReplication => seed.wrapping_add(u64::from(run_id)),
        }
    }

    pub fn run<S: ResultStore>(&self, store: &mut S) -> Result<RunSummary, SimError> {
        self.config.validate()?;
        let sims = &self.config.simulation;
        log::info!(
            "running {} replications to t={} (warm-up {}, seed {} {:?})",
            sims.n_sims,
            self.config.horizon(),
            sims.warm_up,
            sims.seed,
            sims.seed_policy
        );

        let mut stream = StdRng::seed_from_u64(sims.seed);
        let mut summary = RunSummary::default();
        for run_id in 0..sims.n_sims {
            let result = match sims.seed_policy {
                SeedPolicy::Continuous => run_replication(run_id, self.config, &mut stream)?,
                SeedPolicy::PerReplication => {
                    let rng = StdRng::seed_from_u64(self.seed_for(run_id));
                    run_replication(run_id, self.config, rng)?
                }
            };
            store.append(&result)?;

            summary.replications += 1;
            summary.patients += result.patients.len();
            summary.samples += result.sample_count();
            log::info!(
                "replication {run_id} done: {} patients kept, {} queue samples",
                result.patients.len(),
                result.sample_count()
            );
        }
        Ok(summary)
    }
}
