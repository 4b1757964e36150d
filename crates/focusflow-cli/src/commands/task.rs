use clap::Subcommand;
use focusflow_core::TaskStore;

#[derive(Subcommand)]
pub enum TaskAction {
    /// List all tasks
    List,
    /// Add a new task
    Add {
        /// Task text
        text: String,
    },
    /// Flip a task's completed flag
    Toggle {
        /// Task ID
        id: String,
    },
    /// Remove a task
    Remove {
        /// Task ID
        id: String,
    },
    /// Remove all tasks
    Clear,
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = TaskStore::open()?;

    match action {
        TaskAction::List => {
            println!("{}", serde_json::to_string_pretty(store.get_tasks())?);
        }
        TaskAction::Add { text } => {
            let task = store.add(&text)?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Toggle { id } => {
            if !store.toggle(&id)? {
                eprintln!("task not found: {id}");
                std::process::exit(1);
            }
            println!("ok");
        }
        TaskAction::Remove { id } => {
            if !store.remove(&id)? {
                eprintln!("task not found: {id}");
                std::process::exit(1);
            }
            println!("ok");
        }
        TaskAction::Clear => {
            store.clear_all()?;
            println!("ok");
        }
    }
    Ok(())
}
