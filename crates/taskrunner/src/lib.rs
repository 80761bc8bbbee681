//! Workflow execution runtime
//!
//! This crate provides the engine that runs workflows: the task registry,
//! dependency ordering, input composition and the sequential orchestrator.

mod composer;
mod executor;
mod registry;
mod runtime;
mod sorter;

pub use composer::{compose_input, predecessors};
pub use executor::WorkflowExecutor;
pub use registry::TaskRegistry;
pub use runtime::TaskflowRuntime;
pub use sorter::topological_order;
