//! Parallel test execution
//!
//! Runs test units on a bounded worker pool. Each worker writes into a
//! private transcript; a single coordinator prints transcripts strictly in
//! suite order, whatever order the workers finish in.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::thread;

use futures::future::join_all;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, error, info};

use super::runner::run_unit;
use super::SharedUnit;
use crate::error::GradeError;
use crate::models::TestRecord;
use crate::output::{Console, Render, Tone};

/// Twice the available hardware parallelism
pub fn default_workers() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
        * 2
}

/// Completed work for one suite position
#[derive(Debug)]
pub struct Ticket {
    pub index: usize,
    pub record: TestRecord,
    pub transcript: String,
    /// Grading error that must stop the suite once output is drained
    pub fatal: Option<GradeError>,
}

impl Ticket {
    fn finished(
        index: usize,
        name: &str,
        outcome: Result<TestRecord, GradeError>,
        transcript: String,
    ) -> Self {
        match outcome {
            Ok(record) => Self {
                index,
                record,
                transcript,
                fatal: None,
            },
            Err(err) => Self {
                index,
                record: TestRecord::error(index, name, err.to_string()),
                transcript: format!("{transcript}\n"),
                fatal: Some(err),
            },
        }
    }

    /// Ticket issued by the supervisor for a worker that died
    fn crashed(index: usize, name: &str, reason: &str, render: &dyn Render) -> Self {
        let line = render.render(&format!("Test #{index} ({name}) crashed: {reason}"), Tone::Fail);
        Self {
            index,
            record: TestRecord::error(index, name, reason),
            transcript: format!("{line}\n"),
            fatal: None,
        }
    }
}

impl PartialEq for Ticket {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for Ticket {}

impl PartialOrd for Ticket {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ticket {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index.cmp(&other.index)
    }
}

/// Releases tickets in index order
///
/// Holds early arrivals in a min-heap until every lower index has been
/// released.
#[derive(Debug, Default)]
pub struct OrderingGate {
    pending: BinaryHeap<Reverse<Ticket>>,
    next: usize,
}

impl OrderingGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a ticket and return every ticket now ready, in order
    pub fn admit(&mut self, ticket: Ticket) -> Vec<Ticket> {
        self.pending.push(Reverse(ticket));

        let mut ready = Vec::new();
        while self
            .pending
            .peek()
            .is_some_and(|Reverse(head)| head.index == self.next)
        {
            if let Some(Reverse(head)) = self.pending.pop() {
                ready.push(head);
                self.next += 1;
            }
        }
        ready
    }

    /// Index allowed to print next
    pub fn next_index(&self) -> usize {
        self.next
    }

    /// Tickets received but still waiting on a lower index
    pub fn waiting(&self) -> usize {
        self.pending.len()
    }
}

/// Parallel test executor
pub struct ParallelExecutor {
    workers: usize,
}

impl ParallelExecutor {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run every unit and print transcripts in suite order.
    ///
    /// Records come back in index order. A grading error from any unit is
    /// returned after all transcripts have been printed.
    pub async fn run_all(
        &self,
        units: &[SharedUnit],
        console: &mut Console,
    ) -> Result<Vec<TestRecord>, GradeError> {
        let total = units.len();
        info!(
            "Running {} tests in parallel (max {} workers)",
            total, self.workers
        );

        let semaphore = Arc::new(Semaphore::new(self.workers));
        let (tx, mut rx) = mpsc::unbounded_channel::<Ticket>();
        let mut handles = Vec::with_capacity(total);

        for (index, unit) in units.iter().enumerate() {
            let unit = Arc::clone(unit);
            let semaphore = Arc::clone(&semaphore);
            let render = console.renderer();
            let tx = tx.clone();

            let handle = tokio::spawn(async move {
                let name = unit.name().to_string();
                let ticket = match semaphore.acquire_owned().await {
                    Ok(permit) => {
                        debug!("Dispatching #{} {}", index, name);
                        let worker_render = Arc::clone(&render);
                        let worker_name = name.clone();
                        let worker = tokio::task::spawn_blocking(move || {
                            let _permit = permit;
                            let mut console = Console::buffered(worker_render);
                            let outcome = run_unit(index, unit.as_ref(), &mut console);
                            let transcript = console.into_transcript();
                            Ticket::finished(index, &worker_name, outcome, transcript)
                        });

                        match worker.await {
                            Ok(ticket) => ticket,
                            Err(err) => {
                                error!("Worker for #{} ({}) died: {}", index, name, err);
                                Ticket::crashed(index, &name, &err.to_string(), render.as_ref())
                            }
                        }
                    }
                    Err(err) => Ticket::crashed(index, &name, &err.to_string(), render.as_ref()),
                };

                // The coordinator outlives every sender
                let _ = tx.send(ticket);
            });
            handles.push(handle);
        }
        drop(tx);

        let mut gate = OrderingGate::new();
        let mut records = Vec::with_capacity(total);
        let mut fatal = None;

        while let Some(ticket) = rx.recv().await {
            for ready in gate.admit(ticket) {
                debug!("Flushing #{}", ready.index);
                console.write(&ready.transcript)?;
                if let Some(err) = ready.fatal {
                    fatal.get_or_insert(err);
                }
                records.push(ready.record);
            }
        }

        join_all(handles).await;

        if gate.waiting() > 0 || gate.next_index() != total {
            error!(
                "Ordering stalled at #{} with {} tickets waiting",
                gate.next_index(),
                gate.waiting()
            );
        }

        match fatal {
            Some(err) => Err(err),
            None => Ok(records),
        }
    }
}

impl Default for ParallelExecutor {
    fn default() -> Self {
        Self::new(default_workers())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::fixtures::{plain_console, Scripted};
    use crate::models::TestStatus;

    fn ticket(index: usize) -> Ticket {
        Ticket {
            index,
            record: TestRecord::from_outcome(index, format!("t{index}"), true, 0),
            transcript: format!("t{index}\n"),
            fatal: None,
        }
    }

    #[test]
    fn test_gate_holds_early_tickets() {
        let mut gate = OrderingGate::new();

        assert!(gate.admit(ticket(2)).is_empty());
        assert!(gate.admit(ticket(1)).is_empty());
        assert_eq!(gate.waiting(), 2);

        let ready: Vec<usize> = gate.admit(ticket(0)).iter().map(|t| t.index).collect();
        assert_eq!(ready, vec![0, 1, 2]);
        assert_eq!(gate.next_index(), 3);

        let ready: Vec<usize> = gate.admit(ticket(3)).iter().map(|t| t.index).collect();
        assert_eq!(ready, vec![3]);
        assert_eq!(gate.waiting(), 0);
    }

    #[test]
    fn test_executor_creation() {
        assert_eq!(ParallelExecutor::new(0).workers(), 1);
        assert_eq!(ParallelExecutor::new(8).workers(), 8);
        assert!(default_workers() >= 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_output_follows_submission_order() {
        const N: usize = 6;
        let units: Vec<SharedUnit> = (0..N)
            .map(|i| {
                let delay_ms = (N - i) as u64 * 10;
                Arc::new(Scripted::new(&format!("slow{i}"), i % 2 == 0).sleeping(delay_ms))
                    as SharedUnit
            })
            .collect();
        let mut console = plain_console();

        let records = ParallelExecutor::new(N).run_all(&units, &mut console).await.unwrap();

        let indices: Vec<usize> = records.iter().map(|r| r.index).collect();
        assert_eq!(indices, (0..N).collect::<Vec<_>>());
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.passed(), i % 2 == 0);
        }

        let transcript = console.into_transcript();
        let positions: Vec<usize> = (0..N)
            .map(|i| transcript.find(&format!("Testing slow{i}...")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{transcript}");
    }

    #[tokio::test]
    async fn test_single_worker_still_completes() {
        let units: Vec<SharedUnit> = (0..4)
            .map(|i| Arc::new(Scripted::new(&format!("t{i}"), true)) as SharedUnit)
            .collect();
        let mut console = plain_console();

        let records = ParallelExecutor::new(1).run_all(&units, &mut console).await.unwrap();
        assert_eq!(records.len(), 4);
        assert!(records.iter().all(TestRecord::passed));
    }

    #[tokio::test]
    async fn test_crashed_unit_keeps_its_slot() {
        let units: Vec<SharedUnit> = vec![
            Arc::new(Scripted::new("a", true)),
            Arc::new(Scripted::new("b", true).crashing()),
            Arc::new(Scripted::new("c", false)),
        ];
        let mut console = plain_console();

        let records = ParallelExecutor::new(3).run_all(&units, &mut console).await.unwrap();
        let statuses: Vec<TestStatus> = records.iter().map(|r| r.status).collect();
        assert_eq!(statuses, vec![TestStatus::Pass, TestStatus::Error, TestStatus::Fail]);

        let transcript = console.into_transcript();
        let crash = transcript.find("Panicked: setup exploded.").unwrap();
        assert!(transcript.find("Testing a...").unwrap() < crash);
        assert!(crash < transcript.find("Testing c...").unwrap());
    }

    #[tokio::test]
    async fn test_exhaustion_reported_after_drain() {
        let units: Vec<SharedUnit> = vec![
            Arc::new(Scripted::new("first", true).exhausting()),
            Arc::new(Scripted::new("second", true).sleeping(20)),
        ];
        let mut console = plain_console();

        let err = ParallelExecutor::new(2).run_all(&units, &mut console).await.unwrap_err();
        assert!(matches!(err, GradeError::Aborted { index: 0, .. }));
        assert!(console.into_transcript().contains("Testing second..."));
    }

    #[tokio::test]
    async fn test_empty_suite() {
        let mut console = plain_console();
        let records = ParallelExecutor::default().run_all(&[], &mut console).await.unwrap();
        assert!(records.is_empty());
    }
}
