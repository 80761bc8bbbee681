use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock};
use taskcore::{Task, TaskConfig, TaskError, TaskInput, TaskOutput};

/// Registry of available task types.
///
/// Constructed once at startup and shared by handle. The map is guarded by a
/// reader/writer lock held only for lookups, so executions overlap freely.
pub struct TaskRegistry {
    tasks: RwLock<HashMap<String, Arc<dyn Task>>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self {
            tasks: RwLock::new(HashMap::new()),
        }
    }

    /// Register a task, replacing any previous entry with the same type
    pub fn register(&self, task: Arc<dyn Task>) {
        let task_type = task.task_type().to_string();
        tracing::info!("Registering task type: {}", task_type);
        self.tasks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(task_type, task);
    }

    pub fn get(&self, task_type: &str) -> Option<Arc<dyn Task>> {
        self.tasks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(task_type)
            .cloned()
    }

    pub fn contains(&self, task_type: &str) -> bool {
        self.tasks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(task_type)
    }

    pub fn len(&self) -> usize {
        self.tasks.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parameter schema for a task type
    pub fn get_config(&self, task_type: &str) -> Option<TaskConfig> {
        self.get(task_type).map(|task| task.config())
    }

    /// All task schemas, sorted by id
    pub fn list_configs(&self) -> Vec<TaskConfig> {
        let mut configs: Vec<TaskConfig> = self
            .tasks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|task| task.config())
            .collect();
        configs.sort_by(|a, b| a.id.cmp(&b.id));
        configs
    }

    /// Task schemas grouped by category, each group sorted by id
    pub fn list_by_category(&self) -> BTreeMap<String, Vec<TaskConfig>> {
        let mut grouped: BTreeMap<String, Vec<TaskConfig>> = BTreeMap::new();
        for config in self.list_configs() {
            grouped.entry(config.category.clone()).or_default().push(config);
        }
        grouped
    }

    /// Execute a task by type.
    ///
    /// Never fails loudly: unknown types and task errors come back as a
    /// failed `TaskOutput`.
    pub async fn execute(&self, task_type: &str, input: TaskInput) -> TaskOutput {
        let Some(task) = self.get(task_type) else {
            tracing::warn!("Unknown task type requested: {}", task_type);
            return TaskError::UnknownTaskType(task_type.to_string()).into();
        };

        task.execute(input).await.into()
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}
