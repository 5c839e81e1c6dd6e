#![allow(dead_code)]

use clinic_core::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub struct TestHarness {
    pub config: ClinicConfig,
    pub store: MemoryStore,
}

impl TestHarness {
    /// One member of staff per stage, ten minute services, no warm-up.
    pub fn new() -> Self {
        Self::new_with_seed(12345)
    }

    pub fn new_with_seed(seed: u64) -> Self {
        let mut config = ClinicConfig::uniform(1, 10.0);
        config.patient.inter_arrival_time = 12.0;
        config.patient.p_ed = 0.5;
        config.simulation.warm_up = 0.0;
        config.simulation.sim_duration = 1000.0;
        config.simulation.n_sims = 1;
        config.simulation.seed = seed;
        Self {
            config,
            store: MemoryStore::new(),
        }
    }

    pub fn set_staff(&mut self, stage: Stage, capacity: u32) {
        match stage {
            Stage::Registration => self.config.reception.n_receptionists = capacity,
            Stage::Triage => self.config.nurse.n_nurses = capacity,
            Stage::Ed => self.config.doctor.n_ed_doctors = capacity,
            Stage::Acu => self.config.doctor.n_acu_doctors = capacity,
        }
    }

    pub fn set_warm_up(&mut self, warm_up: SimTime) {
        self.config.simulation.warm_up = warm_up;
    }

    pub fn set_duration(&mut self, duration: SimTime) {
        self.config.simulation.sim_duration = duration;
    }

    pub fn set_replications(&mut self, n: u32) {
        self.config.simulation.n_sims = n;
    }

    pub fn set_inter_arrival(&mut self, mean: SimTime) {
        self.config.patient.inter_arrival_time = mean;
    }

    pub fn set_seed_policy(&mut self, policy: SeedPolicy) {
        self.config.simulation.seed_policy = policy;
    }

    /// Runs every replication into the in-memory store.
    pub fn run(&mut self) -> RunSummary {
        ReplicationDriver::new(&self.config)
            .run(&mut self.store)
            .expect("simulation run failed")
    }

    /// Runs one replication on its own stream seeded with `seed`.
    pub fn replicate(&self, run_id: u32, seed: u64) -> ReplicationResult {
        run_replication(run_id, &self.config, StdRng::seed_from_u64(seed))
            .expect("replication failed")
    }
}
