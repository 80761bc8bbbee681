//! Built-in task library
//!
//! Actions, conditions, transforms and triggers available to every workflow.

mod aggregate;
mod compare;
mod condition;
mod http;
mod log;
mod time;
mod transform;
mod trigger;

pub use aggregate::{AggregateTask, FilterTask};
pub use compare::Operator;
pub use condition::IfConditionTask;
pub use http::HttpRequestTask;
pub use log::LogTask;
pub use time::DelayTask;
pub use transform::{DataTransformTask, JsonParseTask};
pub use trigger::ScheduleTriggerTask;
use taskrunner::TaskRegistry;

use std::sync::Arc;

/// Register all built-in tasks with a registry
pub fn register_all(registry: &TaskRegistry) {
    registry.register(Arc::new(DelayTask));
    registry.register(Arc::new(LogTask));
    registry.register(Arc::new(HttpRequestTask::new()));
    registry.register(Arc::new(IfConditionTask));
    registry.register(Arc::new(DataTransformTask));
    registry.register(Arc::new(JsonParseTask));
    registry.register(Arc::new(FilterTask));
    registry.register(Arc::new(AggregateTask));
    registry.register(Arc::new(ScheduleTriggerTask));
}

/// A registry preloaded with every built-in task
pub fn default_registry() -> TaskRegistry {
    let registry = TaskRegistry::new();
    register_all(&registry);
    registry
}
