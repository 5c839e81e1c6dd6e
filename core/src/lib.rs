//! Discrete-event simulation of patient flow through a clinic.
//!
//! Patients walk in, register, are triaged and then seen by either the
//! emergency (ED) or acute care (ACU) team. Each replication runs the network
//! from empty to the configured horizon and yields per-patient timestamps plus
//! queue-length samples for every stage.

pub mod analytics;
pub mod clinic;
pub mod components;
pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod patient;
pub mod resource;
pub mod scheduler;
pub mod store;
pub mod traits;

pub use analytics::{Analytics, StageSummary};
pub use clinic::{Clinic, Team};
pub use config::ClinicConfig;
pub use driver::{run_replication, ReplicationDriver, ReplicationResult, RunSummary, SeedPolicy};
pub use engine::{Event, EventQueue, SimTime};
pub use error::{ConfigError, SimError, StoreError};
pub use patient::{Patient, PatientId, Stage, StageTimes, Treatment};
pub use resource::{Admission, PoolId, QueueSample, ResourcePool};
pub use scheduler::{Context, ProcessId, ProcessState, Scheduler};
pub use store::{CsvStore, MemoryStore, PatientRow, QueueLengthRow, ResultStore};
pub use traits::{Process, Suspend};
