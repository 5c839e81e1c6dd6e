use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Simulated time, in the same unit as the configured service means (minutes).
pub type SimTime = f64;

/// A pending event. Ordered by due time, then by the order it was scheduled in.
#[derive(Debug, Clone)]
pub struct Event<E> {
    pub time: SimTime,
    pub seq: u64,
    pub payload: E,
}

impl<E> PartialEq for Event<E> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl<E> Eq for Event<E> {}
impl<E> PartialOrd for Event<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<E> Ord for Event<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .total_cmp(&other.time)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// The logical clock and its time-ordered set of pending events.
pub struct EventQueue<E> {
    now: SimTime,
    next_seq: u64,
    closed: bool,
    events: BinaryHeap<Reverse<Event<E>>>,
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventQueue<E> {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_seq: 0,
            closed: false,
            events: BinaryHeap::new(),
        }
    }

    pub fn now(&self) -> SimTime {
        self.now
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Due time of the earliest pending event.
    pub fn peek_time(&self) -> Option<SimTime> {
        self.events.peek().map(|Reverse(event)| event.time)
    }

    /// Schedules `payload` at `now + delay`.
    ///
    /// # Panics
    ///
    /// A negative (or NaN) delay and scheduling after close-out are model
    /// defects and abort the replication.
    pub fn schedule(&mut self, delay: SimTime, payload: E) {
        assert!(delay >= 0.0, "cannot schedule an event {delay} in the past");
        assert!(
            !self.closed,
            "cannot schedule an event after the clock closed out at {}",
            self.now
        );
        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push(Reverse(Event {
            time: self.now + delay,
            seq,
            payload,
        }));
    }

    /// Pops the earliest event if it is due no later than `horizon`, advancing
    /// the clock to its due time.
    pub fn pop_due(&mut self, horizon: SimTime) -> Option<Event<E>> {
        match self.peek_time() {
            Some(time) if time <= horizon => {}
            _ => return None,
        }
        let Reverse(event) = self.events.pop()?;
        self.now = event.time;
        Some(event)
    }

    /// Ends the run: the clock moves to `horizon` and no more events may be
    /// scheduled. Events still pending are discarded with the queue.
    pub fn close(&mut self, horizon: SimTime) {
        if horizon > self.now {
            self.now = horizon;
        }
        self.closed = true;
    }

    /// Executes events in order until the next one would be due after
    /// `horizon`, then closes out. The handler may schedule follow-up events.
    /// Returns the number of events executed.
    pub fn run_until<F>(&mut self, horizon: SimTime, mut handler: F) -> usize
    where
        F: FnMut(&mut Self, E),
    {
        let mut executed = 0;
        while let Some(event) = self.pop_due(horizon) {
            handler(self, event.payload);
            executed += 1;
        }
        self.close(horizon);
        executed
    }
}
