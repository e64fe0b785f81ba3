//! Graph-based pipeline orchestration engine.
//!
//! A pipeline is a directed graph of named `Node`s, each binding a
//! `CapabilityDescriptor` to executable logic. Static edges give every node
//! at most one unconditional successor; a node can override that at runtime
//! by returning a `Directive` alongside its state update.
//!
//! Build with `GraphBuilder` (`add_node`, `add_edge`, `set_entry_point`),
//! `compile()` into an immutable `CompiledGraph`, then run it repeatedly
//! with an `Executor`, which threads a `StateRecord` through successive
//! node invocations until the router reaches a terminal.

pub mod builder;
pub mod compiled;
pub mod directive;
pub mod executor;
pub mod node;
pub mod router;

pub use builder::GraphBuilder;
pub use compiled::CompiledGraph;
pub use directive::Directive;
pub use executor::{ExecutionReport, ExecutionStatus, Executor, Outcome, StepTrace};
pub use node::{Node, NodeLogic, NodeOutput};
pub use router::{resolve, Route};
