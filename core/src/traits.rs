use crate::engine::SimTime;
use crate::resource::PoolId;
use crate::scheduler::Context;

/// Where a process hands control back to the scheduler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Suspend {
    /// Resume after the given duration.
    Timeout(SimTime),
    /// Resume once the pool admits this process.
    Request(PoolId),
    Finished,
}

/// An entity behaviour written as an explicit state machine.
///
/// `resume` is re-entered after every satisfied suspension point and runs
/// uninterrupted until it returns the next one. `C` is the model state shared
/// by all processes of a replication.
pub trait Process<C> {
    fn resume(&mut self, cx: &mut Context<'_, C>) -> Suspend;
}
