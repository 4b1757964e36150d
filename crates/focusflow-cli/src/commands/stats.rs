use clap::Subcommand;
use focusflow_core::{stats, SessionStore};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Derived metrics over the whole history
    Show,
    /// Most recent sessions, newest first
    Recent {
        /// Maximum number of sessions to print
        #[arg(long, default_value = "10")]
        limit: usize,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = SessionStore::open()?;

    match action {
        StatsAction::Show => {
            let stats = stats::compute(store.get_all());
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::Recent { limit } => {
            let sessions = stats::recent_sessions(&store, limit);
            println!("{}", serde_json::to_string_pretty(&sessions)?);
        }
    }
    Ok(())
}
