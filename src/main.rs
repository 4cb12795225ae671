//! jpview - run a JMESPath query over a JSON file through a managed result
//! buffer.
//!
//! # Usage
//!
//! ```bash
//! jpview data.json 'people[?age > `30`].name'
//! jpview --watch data.json 'length(items)'
//! jpview --split horizontal --save data.json '@'
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use jpview::app::App;
use jpview::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    save_config_flags,
};
use jpview::host::SplitDirection;

/// Run a JMESPath query over a JSON file
#[derive(Parser, Debug)]
#[command(name = "jpview", version, about, long_about = None)]
struct Cli {
    /// JSON file to query
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// JMESPath expression
    #[arg(value_name = "QUERY")]
    query: String,

    /// Watch file for changes and re-run the query
    #[arg(short, long)]
    watch: bool,

    /// Where to open the result buffer when it is hidden
    #[arg(long, value_enum)]
    split: Option<SplitDirection>,

    /// Filetype tag for result buffers
    #[arg(long, value_name = "NAME")]
    filetype: Option<String>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = ConfigFlags {
        watch: cli.watch,
        split: cli.split,
        filetype: cli.filetype.clone(),
    };

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    if !cli.file.exists() {
        anyhow::bail!("File not found: {}", cli.file.display());
    }

    let app = App::new(cli.file, cli.query)
        .with_watch(effective.watch)
        .with_split(effective.split.unwrap_or_default())
        .with_filetype(effective.filetype);

    app.run()
}
