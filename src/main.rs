use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use ssh_key_switcher::{
    commands,
    paths::Paths,
    ui::{ColorMode, Ui},
};

#[derive(Parser)]
#[command(name = "ssh-key-switcher")]
#[command(about = "Switch keys between accounts for .ssh")]
#[command(
    long_about = "Switch keys between accounts for .ssh\n\n\
    Keeps separated key sets inside ~/.ssh-key-switcher and swaps one set at a \
    time into ~/.ssh.\n\n\
    Getting started:\n  \
    1. Create accounts:        ssh-key-switcher create my_keys\n  \
    2. Adopt the current keys: ssh-key-switcher current my_keys\n  \
    3. Switch between them:    ssh-key-switcher switch company_keys"
)]
#[command(version)]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// When to use colors: always, auto, never
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List stored accounts, marking the current one
    List,

    /// Create a new account
    Create {
        /// Name for the new account
        name: String,
    },

    /// Set an existing account as current, saving the active keys into it
    Current {
        /// Name of the account
        name: String,
    },

    /// Switch the active keys over to another account
    Switch {
        /// Name of the account to load
        name: String,
    },

    /// Run diagnostics on the switcher setup
    Doctor,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let paths = Paths::new()?;
    let ui = Ui::new(cli.color, cli.no_color);

    match cli.command {
        Commands::List => commands::list(&paths, &ui),
        Commands::Create { name } => commands::create(&paths, &name, &ui),
        Commands::Current { name } => commands::current(&paths, &name, &ui),
        Commands::Switch { name } => commands::switch_account(&paths, &name, &ui),
        Commands::Doctor => commands::doctor(&paths, &ui),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(
                shell,
                &mut cmd,
                "ssh-key-switcher",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}
