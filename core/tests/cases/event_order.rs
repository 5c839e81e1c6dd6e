use clinic_core::EventQueue;

#[test]
fn same_time_events_run_in_scheduling_order() {
    let mut queue = EventQueue::new();
    queue.schedule(5.0, "E1");
    queue.schedule(5.0, "E2");
    queue.schedule(1.0, "E0");

    let mut order = Vec::new();
    queue.run_until(10.0, |_, e| order.push(e));
    assert_eq!(order, vec!["E0", "E1", "E2"]);
}

#[test]
fn follow_up_events_queue_behind_existing_ties() {
    let mut queue = EventQueue::new();
    queue.schedule(5.0, 1);
    queue.schedule(5.0, 2);

    let mut order = Vec::new();
    queue.run_until(10.0, |q, n| {
        order.push((q.now(), n));
        if n == 1 {
            // Due at t=5 as well, but scheduled after event 2.
            q.schedule(0.0, 3);
        }
    });
    assert_eq!(order, vec![(5.0, 1), (5.0, 2), (5.0, 3)]);
}

#[test]
fn execution_times_never_decrease() {
    let delays = [7.5, 0.25, 3.0, 3.0, 12.0, 0.0, 9.75, 3.0, 1.5];
    let mut queue = EventQueue::new();
    for (i, d) in delays.iter().enumerate() {
        queue.schedule(*d, i);
    }

    let mut seen = Vec::new();
    let executed = queue.run_until(10.0, |q, i| seen.push((q.now(), i)));
    assert_eq!(executed, 8, "the event at t=12 lies past the horizon");
    assert!(seen.windows(2).all(|w| w[0].0 <= w[1].0));

    let ties: Vec<usize> = seen.iter().filter(|(t, _)| *t == 3.0).map(|(_, i)| *i).collect();
    assert_eq!(ties, vec![2, 3, 7]);
    assert_eq!(queue.now(), 10.0);
    assert_eq!(queue.len(), 1);
}
