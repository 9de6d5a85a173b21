//! # Concurrency Tests using Loom
//!
//! This module uses loom to check the stop token guarantees that dispatch
//! workers rely on when the Ctrl-C handler cancels a campaign.
//!
//! The model covers the token checks only. The `select!` between a running
//! process and cancellation is exercised with real processes in
//! `integration_dispatch_tests.rs`.

#[cfg(test)]
mod tests {
    use loom::sync::Arc;
    use loom::sync::atomic::{AtomicBool, AtomicU8, Ordering};
    use loom::thread;
    use tokio_util::sync::CancellationToken;

    const UNSETTLED: u8 = 0;
    const STARTED: u8 = 1;
    const CANCELLED: u8 = 2;

    /// Workers check the token before launching a case, as `run_case` does,
    /// while the signal handler cancels concurrently.
    ///
    /// A worker that begins after the handler has finished must see the
    /// cancellation, a cancellation seen once stays seen, and each case slot
    /// is settled exactly once.
    #[test]
    fn test_cancellation_is_visible_to_later_workers() {
        // loom's exploration recurses deeply; give it room.
        const STACK_SIZE: usize = 8 * 1024 * 1024; // 8 MB

        let builder = std::thread::Builder::new()
            .name("loom-dispatch-model".into())
            .stack_size(STACK_SIZE);

        let handle = builder
            .spawn(|| {
                loom::model(|| {
                    const NUM_CASES: usize = 2;
                    let token = Arc::new(CancellationToken::new());
                    let handler_done = Arc::new(AtomicBool::new(false));
                    let slots: Arc<Vec<AtomicU8>> =
                        Arc::new((0..NUM_CASES).map(|_| AtomicU8::new(UNSETTLED)).collect());

                    let signal = {
                        let token = token.clone();
                        let handler_done = handler_done.clone();
                        thread::spawn(move || {
                            token.cancel();
                            handler_done.store(true, Ordering::Release);
                        })
                    };

                    let workers: Vec<_> = (0..NUM_CASES)
                        .map(|index| {
                            let token = token.clone();
                            let handler_done = handler_done.clone();
                            let slots = slots.clone();
                            thread::spawn(move || {
                                let after_handler = handler_done.load(Ordering::Acquire);
                                let first = token.is_cancelled();
                                if after_handler {
                                    assert!(first, "case {index} missed a finished cancel");
                                }
                                // Re-checked once the case is running.
                                let second = token.is_cancelled();
                                assert!(!first || second, "case {index} saw the cancel undone");

                                let outcome = if first { CANCELLED } else { STARTED };
                                slots[index]
                                    .compare_exchange(
                                        UNSETTLED,
                                        outcome,
                                        Ordering::AcqRel,
                                        Ordering::Acquire,
                                    )
                                    .expect("case settled twice");
                            })
                        })
                        .collect();

                    for worker in workers {
                        worker.join().unwrap();
                    }
                    signal.join().unwrap();

                    assert!(token.is_cancelled());
                    for (index, slot) in slots.iter().enumerate() {
                        let outcome = slot.load(Ordering::Acquire);
                        assert!(
                            outcome == STARTED || outcome == CANCELLED,
                            "case {index} left unsettled"
                        );
                    }
                });
            })
            .unwrap();

        handle.join().unwrap();
    }
}
