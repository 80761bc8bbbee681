use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use taskcore::{NodeStatus, TaskInput, Workflow, WorkflowExecutionResult, WorkflowNode};
use taskrunner::TaskflowRuntime;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "taskflow")]
#[command(about = "Taskflow workflow runner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a workflow file
    Run {
        /// Path to workflow JSON file
        #[arg(short, long)]
        file: PathBuf,

        /// Show debug logs
        #[arg(short, long)]
        verbose: bool,
    },

    /// Check a workflow file without running it
    Validate {
        /// Path to workflow JSON file
        file: PathBuf,
    },

    /// List available task types
    Tasks,

    /// Execute a single task
    Exec {
        /// Task type, e.g. `http-request`
        #[arg(short, long)]
        task: String,

        /// Task input as a JSON object
        #[arg(short, long)]
        input: Option<String>,
    },

    /// Create an example workflow
    Init {
        /// Output file path
        #[arg(short, long, default_value = "workflow.json")]
        output: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}

fn runtime() -> TaskflowRuntime {
    TaskflowRuntime::with_registry(Arc::new(tasklib::default_registry()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { file, verbose } => {
            init_tracing(verbose);
            run_workflow(&file).await?;
        }
        Commands::Validate { file } => {
            init_tracing(false);
            validate_workflow(&file)?;
        }
        Commands::Tasks => list_tasks(),
        Commands::Exec { task, input } => {
            init_tracing(false);
            exec_task(&task, input.as_deref()).await?;
        }
        Commands::Init { output } => create_example_workflow(&output)?,
    }

    Ok(())
}

fn load_workflow(file: &Path) -> Result<Workflow> {
    Workflow::load(file).with_context(|| format!("failed to load workflow {}", file.display()))
}

async fn run_workflow(file: &Path) -> Result<()> {
    println!("Loading workflow from: {}", file.display());
    let workflow = load_workflow(file)?;
    println!("   Nodes: {}", workflow.nodes.len());
    println!("   Edges: {}", workflow.edges.len());
    println!();

    let result = runtime().run_workflow(&workflow).await;
    print_logs(&result);

    println!();
    println!("{}", serde_json::to_string_pretty(&result)?);

    if !result.is_success() {
        bail!(
            "workflow failed: {}",
            result.error.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(())
}

fn print_logs(result: &WorkflowExecutionResult) {
    for log in &result.logs {
        let marker = match log.status {
            NodeStatus::Running => "..",
            NodeStatus::Success => "ok",
            NodeStatus::Error => "!!",
        };
        match log.duration {
            Some(ms) => println!("  [{}] {} ({}ms)", marker, log.message, ms),
            None => println!("  [{}] {}", marker, log.message),
        }
    }
}

fn validate_workflow(file: &Path) -> Result<()> {
    println!("Validating workflow: {}", file.display());
    let workflow = load_workflow(file)?;

    let order = runtime().validate(&workflow)?;

    println!("Workflow is valid:");
    println!("   Nodes: {}", workflow.nodes.len());
    println!("   Edges: {}", workflow.edges.len());
    println!("   Order: {}", order.join(" -> "));
    Ok(())
}

fn list_tasks() {
    println!("Available task types:");

    for (category, configs) in runtime().registry().list_by_category() {
        println!();
        println!("[{}]", category);
        for config in configs {
            println!("  {} ({})", config.id, config.name);
            println!("    {}", config.description);
        }
    }
}

fn parse_input(input: Option<&str>) -> Result<TaskInput> {
    match input {
        None => Ok(TaskInput::new()),
        Some(raw) => serde_json::from_str(raw).context("input must be a JSON object"),
    }
}

async fn exec_task(task_type: &str, input: Option<&str>) -> Result<()> {
    let input = parse_input(input)?;

    let output = runtime().execute_task(task_type, input).await;
    println!("{}", serde_json::to_string_pretty(&output)?);

    if !output.is_success() {
        bail!("task {} failed: {}", task_type, output.error);
    }
    Ok(())
}

fn example_workflow() -> Workflow {
    let mut workflow = Workflow::new();

    let wait = workflow.add_node(
        WorkflowNode::new("wait", "delay")
            .with_label("Wait a moment")
            .with_config("seconds", 1.0)
            .with_position(100.0, 100.0),
    );
    let say = workflow.add_node(
        WorkflowNode::new("say", "log")
            .with_label("Say hello")
            .with_config("level", "info")
            .with_config("message", "Hello from taskflow")
            .with_position(300.0, 100.0),
    );
    workflow.connect(wait, say);

    workflow
}

fn create_example_workflow(output: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&example_workflow())?;
    std::fs::write(output, json).with_context(|| format!("failed to write {}", output.display()))?;

    println!("Created example workflow: {}", output.display());
    println!();
    println!("Run it with:");
    println!("  taskflow run --file {}", output.display());
    Ok(())
}
