use crate::engine::{EventQueue, SimTime};
use crate::resource::{Admission, PoolId, ResourcePool};
use crate::traits::{Process, Suspend};

pub type ProcessId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Runnable,
    WaitingOnTimer,
    WaitingOnResource(PoolId),
    Finished,
}

struct ProcessSlot<C> {
    state: ProcessState,
    behavior: Option<Box<dyn Process<C>>>,
}

/// Cooperative scheduler: owns the clock, the resource pools and every
/// process of one replication.
///
/// Every pending event is a wake-up for one process. Processes never
/// interleave; a process runs from one suspension point to the next.
pub struct Scheduler<C> {
    queue: EventQueue<ProcessId>,
    pools: Vec<ResourcePool>,
    processes: Vec<ProcessSlot<C>>,
    env: C,
}

/// What a running process may touch besides its own state.
pub struct Context<'a, C> {
    now: SimTime,
    queue: &'a mut EventQueue<ProcessId>,
    pools: &'a mut [ResourcePool],
    processes: &'a mut Vec<ProcessSlot<C>>,
    env: &'a mut C,
}

impl<C> Context<'_, C> {
    pub fn now(&self) -> SimTime {
        self.now
    }

    pub fn env(&mut self) -> &mut C {
        &mut *self.env
    }

    pub fn pool(&self, id: PoolId) -> &ResourcePool {
        &self.pools[id]
    }

    /// Gives up a slot in `pool`. The next waiter, if any, is admitted now and
    /// woken once the current process suspends.
    pub fn release(&mut self, pool: PoolId) {
        if let Some(next) = self.pools[pool].release(self.now) {
            self.processes[next].state = ProcessState::Runnable;
            self.queue.schedule(0.0, next);
        }
    }

    /// Starts a new process; it first runs after the current one suspends.
    pub fn spawn(&mut self, behavior: Box<dyn Process<C>>) -> ProcessId {
        spawn_into(self.queue, self.processes, behavior)
    }
}

fn spawn_into<C>(
    queue: &mut EventQueue<ProcessId>,
    processes: &mut Vec<ProcessSlot<C>>,
    behavior: Box<dyn Process<C>>,
) -> ProcessId {
    let id = processes.len();
    processes.push(ProcessSlot {
        state: ProcessState::Runnable,
        behavior: Some(behavior),
    });
    queue.schedule(0.0, id);
    id
}

impl<C> Scheduler<C> {
    pub fn new(env: C) -> Self {
        Self {
            queue: EventQueue::new(),
            pools: Vec::new(),
            processes: Vec::new(),
            env,
        }
    }

    pub fn add_pool(&mut self, name: &str, capacity: u32) -> PoolId {
        self.pools.push(ResourcePool::new(name, capacity));
        self.pools.len() - 1
    }

    pub fn spawn(&mut self, behavior: Box<dyn Process<C>>) -> ProcessId {
        spawn_into(&mut self.queue, &mut self.processes, behavior)
    }

    pub fn now(&self) -> SimTime {
        self.queue.now()
    }

    pub fn pool(&self, id: PoolId) -> &ResourcePool {
        &self.pools[id]
    }

    pub fn pools(&self) -> &[ResourcePool] {
        &self.pools
    }

    pub fn state(&self, id: ProcessId) -> Option<ProcessState> {
        self.processes.get(id).map(|slot| slot.state)
    }

    pub fn process_count(&self) -> usize {
        self.processes.len()
    }

    pub fn env(&self) -> &C {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut C {
        &mut self.env
    }

    /// Runs every wake-up due no later than `horizon`, then closes the clock
    /// out at `horizon`. Returns the number of events executed.
    pub fn run_until(&mut self, horizon: SimTime) -> usize {
        let mut executed = 0;
        while let Some(event) = self.queue.pop_due(horizon) {
            self.resume(event.payload);
            executed += 1;
        }
        self.queue.close(horizon);
        executed
    }

    /// Tears the replication down into its model state and pools.
    pub fn into_parts(self) -> (C, Vec<ResourcePool>) {
        (self.env, self.pools)
    }

    fn resume(&mut self, id: ProcessId) {
        let Some(mut behavior) = self.processes[id].behavior.take() else {
            return;
        };
        self.processes[id].state = ProcessState::Runnable;
        let now = self.queue.now();

        loop {
            let step = {
                let mut cx = Context {
                    now,
                    queue: &mut self.queue,
                    pools: &mut self.pools,
                    processes: &mut self.processes,
                    env: &mut self.env,
                };
                behavior.resume(&mut cx)
            };
            match step {
                Suspend::Timeout(delay) => {
                    self.queue.schedule(delay, id);
                    self.processes[id].state = ProcessState::WaitingOnTimer;
                    break;
                }
                Suspend::Request(pool) => match self.pools[pool].request(id, now) {
                    Admission::Granted => continue,
                    Admission::Queued => {
                        self.processes[id].state = ProcessState::WaitingOnResource(pool);
                        break;
                    }
                },
                Suspend::Finished => {
                    log::trace!("process {id} finished at {now}");
                    self.processes[id].state = ProcessState::Finished;
                    return;
                }
            }
        }
        self.processes[id].behavior = Some(behavior);
    }
}
