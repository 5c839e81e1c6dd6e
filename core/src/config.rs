use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::driver::SeedPolicy;
use crate::engine::SimTime;
use crate::error::ConfigError;
use crate::patient::Stage;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientConfig {
    pub inter_arrival_time: SimTime,
    pub p_ed: f64,
}

impl Default for PatientConfig {
    fn default() -> Self {
        Self { inter_arrival_time: 3.0, p_ed: 0.1 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceptionConfig {
    pub n_receptionists: u32,
    pub mean_reception_time: SimTime,
}

impl Default for ReceptionConfig {
    fn default() -> Self {
        Self { n_receptionists: 1, mean_reception_time: 2.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NurseConfig {
    pub n_nurses: u32,
    pub mean_triage_time: SimTime,
}

impl Default for NurseConfig {
    fn default() -> Self {
        Self { n_nurses: 2, mean_triage_time: 5.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorConfig {
    pub n_ed_doctors: u32,
    pub n_acu_doctors: u32,
    pub mean_ed_consult_time: SimTime,
    pub mean_acu_consult_time: SimTime,
}

impl Default for DoctorConfig {
    fn default() -> Self {
        Self {
            n_ed_doctors: 2,
            n_acu_doctors: 1,
            mean_ed_consult_time: 30.0,
            mean_acu_consult_time: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub warm_up: SimTime,
    pub sim_duration: SimTime,
    pub n_sims: u32,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub seed_policy: SeedPolicy,
}

fn default_seed() -> u64 {
    42
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            warm_up: 180.0,
            sim_duration: 1440.0,
            n_sims: 10,
            seed: default_seed(),
            seed_policy: SeedPolicy::default(),
        }
    }
}

/// Where the CSV tables go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub patients_file: String,
    pub queues_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("results"),
            patients_file: "patients.csv".to_string(),
            queues_file: "queue_lengths.csv".to_string(),
        }
    }
}

/// Full scenario description, one TOML section per staff group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClinicConfig {
    pub patient: PatientConfig,
    pub reception: ReceptionConfig,
    pub nurse: NurseConfig,
    pub doctor: DoctorConfig,
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl ClinicConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for stage in Stage::ALL {
            if self.capacity(stage) == 0 {
                return Err(invalid(capacity_field(stage), "at least one member of staff is required"));
            }
            positive(mean_field(stage), self.mean_service_time(stage))?;
        }
        positive("patient.inter_arrival_time", self.patient.inter_arrival_time)?;
        if !(0.0..=1.0).contains(&self.patient.p_ed) {
            return Err(invalid("patient.p_ed", "must be a probability in [0, 1]"));
        }
        if !(self.simulation.warm_up.is_finite() && self.simulation.warm_up >= 0.0) {
            return Err(invalid("simulation.warm_up", "must be zero or positive"));
        }
        positive("simulation.sim_duration", self.simulation.sim_duration)?;
        if self.simulation.n_sims == 0 {
            return Err(invalid("simulation.n_sims", "at least one replication is required"));
        }
        Ok(())
    }

    /// End of a replication: warm-up plus the steady-state window.
    pub fn horizon(&self) -> SimTime {
        self.simulation.warm_up + self.simulation.sim_duration
    }

    pub fn capacity(&self, stage: Stage) -> u32 {
        match stage {
            Stage::Registration => self.reception.n_receptionists,
            Stage::Triage => self.nurse.n_nurses,
            Stage::Ed => self.doctor.n_ed_doctors,
            Stage::Acu => self.doctor.n_acu_doctors,
        }
    }

    pub fn mean_service_time(&self, stage: Stage) -> SimTime {
        match stage {
            Stage::Registration => self.reception.mean_reception_time,
            Stage::Triage => self.nurse.mean_triage_time,
            Stage::Ed => self.doctor.mean_ed_consult_time,
            Stage::Acu => self.doctor.mean_acu_consult_time,
        }
    }

    /// Same staffing and service mean at every stage.
    pub fn uniform(capacity: u32, mean_service_time: SimTime) -> Self {
        let mut config = Self::default();
        config.reception = ReceptionConfig {
            n_receptionists: capacity,
            mean_reception_time: mean_service_time,
        };
        config.nurse = NurseConfig { n_nurses: capacity, mean_triage_time: mean_service_time };
        config.doctor = DoctorConfig {
            n_ed_doctors: capacity,
            n_acu_doctors: capacity,
            mean_ed_consult_time: mean_service_time,
            mean_acu_consult_time: mean_service_time,
        };
        config
    }
}

fn capacity_field(stage: Stage) -> &'static str {
    match stage {
        Stage::Registration => "reception.n_receptionists",
        Stage::Triage => "nurse.n_nurses",
        Stage::Ed => "doctor.n_ed_doctors",
        Stage::Acu => "doctor.n_acu_doctors",
    }
}

fn mean_field(stage: Stage) -> &'static str {
    match stage {
        Stage::Registration => "reception.mean_reception_time",
        Stage::Triage => "nurse.mean_triage_time",
        Stage::Ed => "doctor.mean_ed_consult_time",
        Stage::Acu => "doctor.mean_acu_consult_time",
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be positive, got {value}")))
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field, reason: reason.into() }
}
