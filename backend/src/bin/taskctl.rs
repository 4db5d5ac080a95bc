//! Terminal front end for the task server.

use anyhow::Context;
use clap::{Parser, Subcommand};
use taskboard_server::{
    client::task_client::TaskClient, create_task_request::NewTask, task::Task,
    task_status::TaskStatus, update_task_request::TaskPatch,
};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "taskctl", about = "List, filter, create, edit and delete tasks")]
struct Cli {
    /// Base URL of the task server.
    #[arg(long, env = "TASKS_API_URL", default_value = "http://localhost:3001")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
enum Commands {
    /// Show all tasks, optionally only those with one status.
    List {
        #[arg(long)]
        status: Option<TaskStatus>,
    },
    /// Show one task in full.
    Show { id: Uuid },
    /// Create a task.
    Add {
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<TaskStatus>,
    },
    /// Change any of a task's fields; omitted fields are left as they are.
    Edit {
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<TaskStatus>,
    },
    /// Move a task to another status.
    Status { id: Uuid, status: TaskStatus },
    /// Delete a task.
    Rm { id: Uuid },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = TaskClient::new(&cli.url);

    match cli.command {
        Commands::List { status } => {
            let tasks = client
                .fetch_tasks(status)
                .await
                .context("Failed to load tasks")?;
            print!("{}", render_list(&tasks));
        }
        Commands::Show { id } => {
            let task = client.fetch_task(id).await.context("Failed to load task")?;
            print!("{}", render_detail(&task));
        }
        Commands::Add { title, description, status } => {
            let task = client
                .create_task(&NewTask { title, description, status })
                .await
                .context("Failed to create task")?;
            println!("Task added with ID {}", task.id);
        }
        Commands::Edit { id, title, description, status } => {
            let patch = TaskPatch { title, description, status };
            if patch.is_empty() {
                anyhow::bail!("nothing to change: pass --title, --description or --status");
            }
            let task = client
                .update_task(id, &patch)
                .await
                .context("Failed to update task")?;
            print!("{}", render_detail(&task));
        }
        Commands::Status { id, status } => {
            let patch = TaskPatch { status: Some(status), ..TaskPatch::default() };
            let task = client
                .update_task(id, &patch)
                .await
                .context("Failed to update task status")?;
            println!("{} is now {}", task.id, task.status.label());
        }
        Commands::Rm { id } => {
            client.delete_task(id).await.context("Failed to delete task")?;
            println!("Task {id} deleted");
        }
    }

    Ok(())
}

fn render_list(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks found.\n".to_string();
    }
    let mut out = format!("{:<36}  {:<11}  {}\n", "ID", "STATUS", "TITLE");
    for task in tasks {
        out.push_str(&format!("{:<36}  {:<11}  {}\n", task.id, task.status.label(), task.title));
    }
    out
}

fn render_detail(task: &Task) -> String {
    format!(
        concat!(
            "{}\n",
            "  id:          {}\n",
            "  status:      {}\n",
            "  description: {}\n",
            "  created:     {}\n",
            "  updated:     {}\n",
        ),
        task.title,
        task.id,
        task.status.label(),
        task.description.as_deref().unwrap_or("-"),
        task.created_at.to_rfc3339(),
        task.updated_at.to_rfc3339(),
    )
}
