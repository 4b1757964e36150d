use clap::Subcommand;
use focusflow_core::SessionStore;

#[derive(Subcommand)]
pub enum SessionsAction {
    /// List recorded sessions, newest first
    List {
        /// Limit the number of sessions printed
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Delete the entire session history
    Clear,
}

pub fn run(action: SessionsAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = SessionStore::open()?;

    match action {
        SessionsAction::List { limit } => {
            let records = store.get_recent(limit.unwrap_or(store.len()));
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        SessionsAction::Clear => {
            let count = store.len();
            store.clear_all()?;
            println!("cleared {count} sessions");
        }
    }
    Ok(())
}
