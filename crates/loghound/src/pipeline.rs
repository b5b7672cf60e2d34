//! Pipeline — scanner and aggregator tasks joined by one FIFO queue.
//!
//! The scanner walks every input source in order inside a blocking task and
//! pushes raw blocks onto an unbounded channel; the aggregator task
//! normalizes and tallies them. Completion travels in-band as a dedicated
//! message variant, never as a data value. Blocks are tallied in the exact
//! order they were discovered (single producer, single consumer).

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::counter::Counter;
use crate::normalize::Normalizer;
use crate::record::{Block, Record};
use crate::scan::BlockExtractor;

/// One line sequence to scan.
#[derive(Debug, Clone)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    fn open(&self) -> io::Result<Box<dyn BufRead + Send>> {
        match self {
            Input::Stdin => Ok(Box::new(BufReader::new(io::stdin()))),
            Input::File(path) => Ok(Box::new(BufReader::new(File::open(path)?))),
        }
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Stdin => write!(f, "<stdin>"),
            Input::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Message on the scanner → aggregator queue. `Complete` is the termination
/// sentinel: a distinct variant that can never collide with block data.
enum ScanMessage {
    Block(Block),
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Running,
    Draining,
    Stopped,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("aggregator stopped before the scan completed")]
    AggregatorStopped,

    #[error("aggregator task failed: {0}")]
    AggregatorFailed(String),

    #[error("scanner task failed: {0}")]
    ScannerFailed(String),
}

/// A source that could not be scanned (open or read failure). The run
/// continues past these.
#[derive(Debug)]
pub struct SourceFailure {
    pub source: String,
    pub error: String,
}

/// Final result of one scanning session.
#[derive(Debug)]
pub struct ScanOutcome {
    /// Per-identity occurrence counts, in discovery order.
    pub tally: Vec<(Record, usize)>,
    pub skipped: Vec<SourceFailure>,
}

pub struct Pipeline {
    catalog: Arc<Catalog>,
    state: PipelineState,
}

impl Pipeline {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            state: PipelineState::Idle,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Run one scanning session over `inputs`, sequentially, to completion.
    ///
    /// The tally is only read after the aggregator task has exited; an
    /// aggregator that dies early surfaces as an error, never as a silently
    /// partial result.
    pub async fn run(&mut self, inputs: Vec<Input>) -> Result<ScanOutcome, PipelineError> {
        self.state = PipelineState::Running;
        debug!(inputs = inputs.len(), "pipeline running");

        let (tx, rx) = mpsc::unbounded_channel();

        let aggregator = tokio::spawn(aggregate(rx, Arc::clone(&self.catalog)));

        let catalog = Arc::clone(&self.catalog);
        let scanner = tokio::task::spawn_blocking(move || scan_all(&inputs, &catalog, &tx));
        let skipped = scanner
            .await
            .map_err(|err| PipelineError::ScannerFailed(err.to_string()))??;

        // Sentinel enqueued; the aggregator drains what is left.
        self.state = PipelineState::Draining;
        debug!("pipeline draining");

        let counter = aggregator
            .await
            .map_err(|err| PipelineError::AggregatorFailed(err.to_string()))?;

        self.state = PipelineState::Stopped;
        info!(identities = counter.len(), "pipeline stopped");

        Ok(ScanOutcome {
            tally: counter.into_result(),
            skipped,
        })
    }
}

/// Scanner side: every source in order, then exactly one sentinel.
fn scan_all(
    inputs: &[Input],
    catalog: &Arc<Catalog>,
    tx: &UnboundedSender<ScanMessage>,
) -> Result<Vec<SourceFailure>, PipelineError> {
    let mut skipped = Vec::new();

    for input in inputs {
        let reader = match input.open() {
            Ok(reader) => reader,
            Err(err) => {
                warn!(source = %input, error = %err, "cannot open source; skipping");
                skipped.push(SourceFailure {
                    source: input.to_string(),
                    error: err.to_string(),
                });
                continue;
            }
        };

        debug!(source = %input, "scanning");
        for item in BlockExtractor::new(reader, Arc::clone(catalog)) {
            match item {
                Ok(block) => {
                    tx.send(ScanMessage::Block(block))
                        .map_err(|_| PipelineError::AggregatorStopped)?;
                }
                Err(err) => {
                    warn!(source = %input, error = %err, "read failed; abandoning source");
                    skipped.push(SourceFailure {
                        source: input.to_string(),
                        error: err.to_string(),
                    });
                    break;
                }
            }
        }
    }

    tx.send(ScanMessage::Complete)
        .map_err(|_| PipelineError::AggregatorStopped)?;
    Ok(skipped)
}

/// Aggregator side: normalize and tally until the sentinel arrives.
async fn aggregate(mut rx: UnboundedReceiver<ScanMessage>, catalog: Arc<Catalog>) -> Counter {
    let normalizer = Normalizer::new(catalog);
    let mut counter = Counter::new();

    while let Some(message) = rx.recv().await {
        match message {
            ScanMessage::Block(block) => counter.put(normalizer.normalize(&block)),
            ScanMessage::Complete => break,
        }
    }

    counter
}
