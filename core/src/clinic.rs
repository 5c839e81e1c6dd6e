use std::collections::BTreeMap;

use rand::Rng;
use rand_distr::{Distribution, Exp};

use crate::components::PatientGenerator;
use crate::config::ClinicConfig;
use crate::driver::ReplicationResult;
use crate::engine::SimTime;
use crate::error::ConfigError;
use crate::patient::{Patient, PatientId, Stage, Treatment};
use crate::resource::{PoolId, ResourcePool};
use crate::scheduler::Scheduler;

/// Staff serving one stage: the pool they form and how long they take.
#[derive(Debug, Clone)]
pub struct Team {
    pub stage: Stage,
    pub pool: PoolId,
    pub mean_service_time: SimTime,
    service: Exp<f64>,
}

/// Model state shared by every process of one replication.
pub struct Clinic<R> {
    rng: R,
    teams: Vec<Team>,
    arrivals: Exp<f64>,
    p_ed: f64,
    warm_up: SimTime,
    patients: Vec<Patient>,
    retained: Vec<PatientId>,
}

fn exponential(field: &'static str, mean: SimTime) -> Result<Exp<f64>, ConfigError> {
    Exp::new(1.0 / mean).map_err(|e| ConfigError::Invalid {
        field,
        reason: format!("mean {mean} gives no exponential distribution: {e}"),
    })
}

impl<R: Rng> Clinic<R> {
    /// Builds a fresh replication: one pool per stage and the patient
    /// generator ready to fire at time zero.
    pub fn replication(config: &ClinicConfig, rng: R) -> Result<Scheduler<Clinic<R>>, ConfigError> {
        let clinic = Clinic {
            rng,
            teams: Vec::with_capacity(Stage::ALL.len()),
            arrivals: exponential("patient.inter_arrival_time", config.patient.inter_arrival_time)?,
            p_ed: config.patient.p_ed,
            warm_up: config.simulation.warm_up,
            patients: Vec::new(),
            retained: Vec::new(),
        };
        let mut sim = Scheduler::new(clinic);
        for stage in Stage::ALL {
            let mean = config.mean_service_time(stage);
            let service = exponential(stage.name(), mean)?;
            let pool = sim.add_pool(stage.name(), config.capacity(stage));
            sim.env_mut().teams.push(Team {
                stage,
                pool,
                mean_service_time: mean,
                service,
            });
        }
        sim.spawn(Box::new(PatientGenerator));
        Ok(sim)
    }

    pub fn is_warming_up(&self, now: SimTime) -> bool {
        now < self.warm_up
    }

    /// Registers the next walk-in. The treatment branch is decided here, once.
    pub fn admit(&mut self, now: SimTime) -> PatientId {
        let id = self.patients.len() as PatientId;
        let treatment = if self.rng.gen::<f64>() < self.p_ed {
            Treatment::Ed
        } else {
            Treatment::Acu
        };
        self.patients.push(Patient::new(id, treatment));
        if !self.is_warming_up(now) {
            self.retained.push(id);
        }
        id
    }

    pub fn interarrival_time(&mut self) -> SimTime {
        self.arrivals.sample(&mut self.rng)
    }

    pub fn service_time(&mut self, stage: Stage) -> SimTime {
        let service = self.team(stage).service;
        service.sample(&mut self.rng)
    }
}

impl<R> Clinic<R> {
    pub fn team(&self, stage: Stage) -> &Team {
        &self.teams[stage as usize]
    }

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    pub fn patient_mut(&mut self, id: PatientId) -> &mut Patient {
        &mut self.patients[id as usize]
    }

    pub fn retained(&self) -> &[PatientId] {
        &self.retained
    }

    /// Keeps the post-warm-up patients and every pool's samples.
    pub fn into_result(self, run_id: u32, pools: Vec<ResourcePool>) -> ReplicationResult {
        let mut patients: Vec<Option<Patient>> = self.patients.into_iter().map(Some).collect();
        let retained = self
            .retained
            .iter()
            .filter_map(|&id| patients[id as usize].take())
            .collect();

        let stage_of: BTreeMap<PoolId, Stage> =
            self.teams.iter().map(|team| (team.pool, team.stage)).collect();
        let queue_samples = pools
            .into_iter()
            .enumerate()
            .filter_map(|(id, pool)| Some((*stage_of.get(&id)?, pool.into_samples())))
            .collect();

        ReplicationResult {
            run_id,
            patients: retained,
            queue_samples,
        }
    }
}
