use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use firesight_core::error::{FiresightError, Result};
use firesight_core::state::StateRecord;
use firesight_core::types::ExecutionId;

use crate::compiled::CompiledGraph;
use crate::router::{self, Route};

/// Lifecycle of one execution: `Pending → Running → Completed | Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

/// Trace entry for one executed step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepTrace {
    /// Which node was executed.
    pub node: String,
    /// Execution time in milliseconds.
    pub elapsed_ms: u64,
}

/// Terminal outcome of one execution.
#[derive(Debug)]
pub enum Outcome {
    /// The router reached terminal.
    Completed,
    /// A node failed, the step limit was hit, routing failed, or the
    /// execution was cancelled — one uniform failure shape, distinguished
    /// only by the reason.
    Failed(FiresightError),
}

impl Outcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, Outcome::Completed)
    }
}

/// Result of executing a graph to completion.
#[derive(Debug)]
pub struct ExecutionReport {
    pub execution_id: ExecutionId,
    pub started_at: DateTime<Utc>,
    /// The final record. After a failed step this is the state as of the
    /// last completed merge — a failed invocation never merges partially.
    pub state: StateRecord,
    /// Ordered (node, duration) pairs, including a failed final step.
    pub trace: Vec<StepTrace>,
    pub outcome: Outcome,
    pub total_elapsed_ms: u64,
}

impl ExecutionReport {
    /// Terminal status implied by the outcome.
    pub fn status(&self) -> ExecutionStatus {
        match self.outcome {
            Outcome::Completed => ExecutionStatus::Completed,
            Outcome::Failed(_) => ExecutionStatus::Failed,
        }
    }

    /// Node names in execution order.
    pub fn visited(&self) -> Vec<&str> {
        self.trace.iter().map(|t| t.node.as_str()).collect()
    }
}

/// Steps a compiled graph to completion against one state record.
///
/// Single logical thread of control: nodes run strictly one at a time in
/// causal order, each invocation awaited before its update is merged. The
/// executor holds no mutable shared state, so one executor (or many, over
/// the same `Arc<CompiledGraph>`) can serve concurrent executions, each
/// exclusively owning its own record.
pub struct Executor {
    graph: Arc<CompiledGraph>,
    max_steps: usize,
    cancel: CancellationToken,
}

impl Executor {
    /// Create an executor with the default step limit of twice the node
    /// count — enough to admit limited dynamic loops while guaranteeing
    /// termination.
    pub fn new(graph: Arc<CompiledGraph>) -> Self {
        let max_steps = graph.node_count().saturating_mul(2).max(1);
        Self {
            graph,
            max_steps,
            cancel: CancellationToken::new(),
        }
    }

    /// Override the step limit.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Get a cancellation token for this executor.
    ///
    /// Cancellation is checked between steps, never inside a node
    /// invocation; the in-flight step is allowed to finish.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run the graph from its entry point against `initial_state`.
    ///
    /// Failures (node error, missing input, step limit, routing error,
    /// cancellation) are reported through `Outcome::Failed` with the state
    /// as of the last completed merge. The only hard `Err` is a node-map
    /// lookup miss, which a successful compile makes unreachable.
    pub async fn run(&self, initial_state: StateRecord) -> Result<ExecutionReport> {
        let execution_id = ExecutionId::new();
        let started_at = Utc::now();
        let start = Instant::now();

        let mut state = initial_state;
        let mut trace: Vec<StepTrace> = Vec::new();
        let mut current = self.graph.entry().to_string();
        let mut steps = 0usize;

        let mut status = ExecutionStatus::Pending;
        debug!(execution_id = %execution_id, ?status, "Execution created");

        status = ExecutionStatus::Running;
        info!(
            execution_id = %execution_id,
            entry = %current,
            max_steps = self.max_steps,
            ?status,
            "Starting pipeline execution"
        );

        let outcome = loop {
            if self.cancel.is_cancelled() {
                warn!(execution_id = %execution_id, node = %current, "Execution cancelled");
                break Outcome::Failed(FiresightError::Cancelled);
            }

            if steps >= self.max_steps {
                warn!(
                    execution_id = %execution_id,
                    node = %current,
                    max_steps = self.max_steps,
                    "Step limit reached"
                );
                break Outcome::Failed(FiresightError::StepLimitExceeded(self.max_steps));
            }

            let node = self
                .graph
                .node(&current)
                .ok_or_else(|| FiresightError::UnknownNode(current.clone()))?;

            debug!(node = %current, step = steps, "Executing node");
            let node_start = Instant::now();
            let result = node.invoke(&state).await;
            let elapsed_ms = node_start.elapsed().as_millis() as u64;
            steps += 1;
            trace.push(StepTrace {
                node: current.clone(),
                elapsed_ms,
            });

            let output = match result {
                Ok(output) => output,
                Err(e) => {
                    // State stays as of the last completed merge.
                    let e = match e {
                        e @ FiresightError::NodeExecution { .. }
                        | e @ FiresightError::MissingInput { .. } => e,
                        other => FiresightError::node_execution(current.as_str(), other),
                    };
                    error!(node = %current, error = %e, "Node failed");
                    break Outcome::Failed(e);
                }
            };

            state.merge(output.update);
            debug!(node = %current, elapsed_ms, "Node complete");

            match router::resolve(&current, output.directive.as_ref(), &self.graph) {
                Ok(Route::Terminal) => break Outcome::Completed,
                Ok(Route::Next(next)) => {
                    debug!(from = %current, to = %next, "Routing to next node");
                    current = next;
                }
                Err(e) => {
                    error!(node = %current, error = %e, "Routing failed");
                    break Outcome::Failed(e);
                }
            }
        };

        let total_elapsed_ms = start.elapsed().as_millis() as u64;
        let report = ExecutionReport {
            execution_id,
            started_at,
            state,
            trace,
            outcome,
            total_elapsed_ms,
        };
        status = report.status();
        info!(
            execution_id = %report.execution_id,
            ?status,
            steps,
            total_elapsed_ms,
            "Pipeline execution finished"
        );
        Ok(report)
    }
}
