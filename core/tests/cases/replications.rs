use crate::common::TestHarness;
use clinic_core::*;

#[test]
fn patient_ids_restart_in_every_replication() {
    let mut h = TestHarness::new();
    h.set_replications(2);
    let summary = h.run();
    assert_eq!(summary.replications, 2);
    assert_eq!(summary.patients, h.store.patients.len());
    assert_eq!(summary.samples, h.store.queue_lengths.len());

    for run_id in 0..2 {
        let ids: Vec<_> = h.store.patients_for_run(run_id).map(|r| r.patient_id).collect();
        assert!(!ids.is_empty());
        let expected: Vec<_> = (0..ids.len() as u64).collect();
        assert_eq!(ids, expected, "run {run_id} ids must count up from 0");
    }
}

#[test]
fn per_replication_seeding_makes_runs_reproducible_alone() {
    let mut h = TestHarness::new_with_seed(99);
    h.set_replications(3);
    h.set_seed_policy(SeedPolicy::PerReplication);
    h.run();

    let alone = h.replicate(2, 99 + 2);
    let mut store = MemoryStore::new();
    store.append(&alone).unwrap();
    let from_batch: Vec<_> = h.store.patients_for_run(2).cloned().collect();
    assert_eq!(from_batch, store.patients);
}

#[test]
fn first_replication_is_the_same_under_both_policies() {
    let mut continuous = TestHarness::new_with_seed(5);
    continuous.set_replications(2);
    continuous.run();

    let mut reseeded = TestHarness::new_with_seed(5);
    reseeded.set_replications(2);
    reseeded.set_seed_policy(SeedPolicy::PerReplication);
    reseeded.run();

    let first = |h: &TestHarness| h.store.patients_for_run(0).cloned().collect::<Vec<_>>();
    assert_eq!(first(&continuous), first(&reseeded));

    let second = |h: &TestHarness| h.store.patients_for_run(1).cloned().collect::<Vec<_>>();
    assert_ne!(second(&continuous), second(&reseeded));
}

struct FailingStore {
    stored: Vec<u32>,
    fail_on: u32,
}

impl ResultStore for FailingStore {
    fn append(&mut self, result: &ReplicationResult) -> Result<(), StoreError> {
        if result.run_id == self.fail_on {
            return Err(StoreError::Io(std::io::Error::other("disk full")));
        }
        self.stored.push(result.run_id);
        Ok(())
    }
}

#[test]
fn store_failure_aborts_the_run() {
    let mut h = TestHarness::new();
    h.set_replications(4);
    let mut store = FailingStore { stored: Vec::new(), fail_on: 1 };

    let err = ReplicationDriver::new(&h.config).run(&mut store).unwrap_err();
    assert!(matches!(err, SimError::Store(StoreError::Io(_))));
    assert_eq!(store.stored, vec![0]);
}

#[test]
fn invalid_config_is_rejected_before_running() {
    let mut h = TestHarness::new();
    h.config.simulation.n_sims = 0;
    let mut store = MemoryStore::new();
    let err = ReplicationDriver::new(&h.config).run(&mut store).unwrap_err();
    assert!(matches!(err, SimError::Config(ConfigError::Invalid { .. })));
    assert!(store.patients.is_empty());
}
