use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::driver::ReplicationResult;
use crate::engine::SimTime;
use crate::error::StoreError;
use crate::patient::{Patient, PatientId, Stage, StageTimes, Treatment};

/// One row of the patient table. The treatment branch not taken stays null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRow {
    pub run_id: u32,
    pub patient_id: PatientId,
    pub is_for_ed: bool,
    pub registration_entry: Option<SimTime>,
    pub registration_start: Option<SimTime>,
    pub registration_exit: Option<SimTime>,
    pub triage_entry: Option<SimTime>,
    pub triage_start: Option<SimTime>,
    pub triage_exit: Option<SimTime>,
    pub ed_entry: Option<SimTime>,
    pub ed_start: Option<SimTime>,
    pub ed_exit: Option<SimTime>,
    pub acu_entry: Option<SimTime>,
    pub acu_start: Option<SimTime>,
    pub acu_exit: Option<SimTime>,
    pub exit: Option<SimTime>,
}

impl PatientRow {
    pub fn new(run_id: u32, patient: &Patient) -> Self {
        let none = StageTimes::default();
        let (ed, acu) = match patient.treatment {
            Treatment::Ed => (patient.care, none),
            Treatment::Acu => (none, patient.care),
        };
        Self {
            run_id,
            patient_id: patient.id,
            is_for_ed: patient.is_for_ed(),
            registration_entry: patient.registration.entry,
            registration_start: patient.registration.start,
            registration_exit: patient.registration.exit,
            triage_entry: patient.triage.entry,
            triage_start: patient.triage.start,
            triage_exit: patient.triage.exit,
            ed_entry: ed.entry,
            ed_start: ed.start,
            ed_exit: ed.exit,
            acu_entry: acu.entry,
            acu_start: acu.start,
            acu_exit: acu.exit,
            exit: patient.exit,
        }
    }

    pub fn stage(&self, stage: Stage) -> StageTimes {
        let (entry, start, exit) = match stage {
            Stage::Registration => (self.registration_entry, self.registration_start, self.registration_exit),
            Stage::Triage => (self.triage_entry, self.triage_start, self.triage_exit),
            Stage::Ed => (self.ed_entry, self.ed_start, self.ed_exit),
            Stage::Acu => (self.acu_entry, self.acu_start, self.acu_exit),
        };
        StageTimes { entry, start, exit }
    }
}

/// One row of the queue-length table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueLengthRow {
    pub run_id: u32,
    pub service: Stage,
    pub timestamp: SimTime,
    pub q_len: usize,
}

pub fn patient_rows(result: &ReplicationResult) -> impl Iterator<Item = PatientRow> + '_ {
    result
        .patients
        .iter()
        .map(move |patient| PatientRow::new(result.run_id, patient))
}

pub fn queue_rows(result: &ReplicationResult) -> impl Iterator<Item = QueueLengthRow> + '_ {
    result.queue_samples.iter().flat_map(move |(&service, samples)| {
        samples.iter().map(move |sample| QueueLengthRow {
            run_id: result.run_id,
            service,
            timestamp: sample.timestamp,
            q_len: sample.q_len,
        })
    })
}

/// Sink for finished replications. Results may arrive in any run order.
pub trait ResultStore {
    fn append(&mut self, result: &ReplicationResult) -> Result<(), StoreError>;
}

impl<S: ResultStore + ?Sized> ResultStore for &mut S {
    fn append(&mut self, result: &ReplicationResult) -> Result<(), StoreError> {
        (**self).append(result)
    }
}

impl<A: ResultStore, B: ResultStore> ResultStore for (A, B) {
    fn append(&mut self, result: &ReplicationResult) -> Result<(), StoreError> {
        self.0.append(result)?;
        self.1.append(result)
    }
}

/// Both tables held in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    pub patients: Vec<PatientRow>,
    pub queue_lengths: Vec<QueueLengthRow>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn patients_for_run(&self, run_id: u32) -> impl Iterator<Item = &PatientRow> {
        self.patients.iter().filter(move |row| row.run_id == run_id)
    }

    pub fn queue_lengths_for(&self, service: Stage) -> impl Iterator<Item = &QueueLengthRow> {
        self.queue_lengths.iter().filter(move |row| row.service == service)
    }

    /// Queue samples taken once the warm-up period is over.
    pub fn steady_state_queue_lengths(&self, warm_up: SimTime) -> impl Iterator<Item = &QueueLengthRow> {
        self.queue_lengths.iter().filter(move |row| row.timestamp >= warm_up)
    }
}

impl ResultStore for MemoryStore {
    fn append(&mut self, result: &ReplicationResult) -> Result<(), StoreError> {
        self.patients.extend(patient_rows(result));
        self.queue_lengths.extend(queue_rows(result));
        Ok(())
    }
}

/// Writes the two tables as CSV, one header row each.
pub struct CsvStore<W: Write> {
    patients: csv::Writer<W>,
    queue_lengths: csv::Writer<W>,
}

impl CsvStore<File> {
    /// Creates `dir` if needed and truncates both tables.
    pub fn create(dir: &Path, patients_file: &str, queues_file: &str) -> Result<Self, StoreError> {
        fs::create_dir_all(dir)?;
        let patients = File::create(dir.join(patients_file))?;
        let queue_lengths = File::create(dir.join(queues_file))?;
        log::debug!("writing results to {}", dir.display());
        Ok(Self::from_writers(patients, queue_lengths))
    }
}

impl<W: Write> CsvStore<W> {
    pub fn from_writers(patients: W, queue_lengths: W) -> Self {
        Self {
            patients: csv::Writer::from_writer(patients),
            queue_lengths: csv::Writer::from_writer(queue_lengths),
        }
    }

    /// Flushes and returns the underlying writers.
    pub fn into_inner(self) -> Result<(W, W), StoreError> {
        let patients = self.patients.into_inner().map_err(|e| e.into_error())?;
        let queue_lengths = self.queue_lengths.into_inner().map_err(|e| e.into_error())?;
        Ok((patients, queue_lengths))
    }
}

impl<W: Write> ResultStore for CsvStore<W> {
    fn append(&mut self, result: &ReplicationResult) -> Result<(), StoreError> {
        for row in patient_rows(result) {
            self.patients.serialize(row)?;
        }
        for row in queue_rows(result) {
            self.queue_lengths.serialize(row)?;
        }
        self.patients.flush()?;
        self.queue_lengths.flush()?;
        log::debug!("stored replication {}", result.run_id);
        Ok(())
    }
}
