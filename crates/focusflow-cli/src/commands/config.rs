use clap::Subcommand;
use focusflow_core::SettingsStore;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print settings; with --task, the effective cycle for that task
    Show {
        /// Task name to resolve settings for
        #[arg(long)]
        task: Option<String>,
    },
    /// Set a settings value
    Set {
        /// Settings key: "focus", "short-break", "long-break",
        /// "sessions-before-long-break" or "dark-mode"
        key: String,
        /// New value (minutes, a count, or true/false)
        value: String,
        /// Write a task-specific override instead of the global cycle
        #[arg(long)]
        task: Option<String>,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = SettingsStore::open()?;

    match action {
        ConfigAction::Show { task } => match task {
            Some(name) => {
                let cycle = settings.effective_cycle(Some(&name));
                println!("{}", serde_json::to_string_pretty(cycle)?);
            }
            None => {
                println!("{}", serde_json::to_string_pretty(settings.settings())?);
            }
        },
        ConfigAction::Set { key, value, task } => {
            if key == "dark-mode" {
                if task.is_some() {
                    return Err("dark-mode is a global setting".into());
                }
                settings.set_dark_mode(value.parse()?)?;
                println!("ok");
                return Ok(());
            }
            // A first per-task override starts from that task's current
            // effective cycle.
            let mut cycle = settings.effective_cycle(task.as_deref()).clone();
            match key.as_str() {
                "focus" => cycle.focus = value.parse()?,
                "short-break" => cycle.short_break = value.parse()?,
                "long-break" => cycle.long_break = value.parse()?,
                "sessions-before-long-break" => {
                    cycle.sessions_before_long_break = value.parse()?
                }
                _ => {
                    eprintln!("unknown key: {key}");
                    std::process::exit(1);
                }
            }
            match task {
                Some(name) => settings.save_for_task(&name, cycle)?,
                None => settings.save_global(cycle)?,
            }
            println!("ok");
        }
    }
    Ok(())
}
