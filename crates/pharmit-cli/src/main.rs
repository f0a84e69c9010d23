use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use pharmit_execution::init_logging;

mod commands;

use commands::{Workbench, DEFAULT_SESSION};

#[derive(Parser)]
#[command(name = "pharmit")]
#[command(about = "Pharmit query panel - build, validate and save pharmacophore queries", long_about = None)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    /// Directory holding catalog.toml and sessions/ (defaults to the platform config dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Session to operate on
    #[arg(short, long, global = true, default_value = DEFAULT_SESSION)]
    session: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an empty query with catalog defaults
    New,
    /// Print the session document
    Show,
    /// Check filter ranges
    Validate,
    /// Add a pharmacophore feature
    AddFeature {
        /// Feature kind (e.g. Aromatic, HydrogenDonor, ExclusionSphere)
        kind: String,
        #[arg(allow_hyphen_values = true)]
        x: f64,
        #[arg(allow_hyphen_values = true)]
        y: f64,
        #[arg(allow_hyphen_values = true)]
        z: f64,
        /// Radius in Ångström (kind default when omitted)
        #[arg(short, long)]
        radius: Option<f64>,
    },
    /// Remove the feature at INDEX
    RemoveFeature { index: usize },
    /// Flip the enabled flag of the feature at INDEX
    ToggleFeature { index: usize },
    /// Set a filter (max-orient, reduceConfs, max-hits, minMolWeight, maxMolWeight, minrotbonds, maxrotbonds)
    SetFilter {
        field: String,
        /// New value; omit with --clear
        value: Option<f64>,
        /// Reset the field to unlimited / unbounded
        #[arg(long, conflicts_with = "value")]
        clear: bool,
    },
    /// Set the viewer style of a role (Ligand, Results, Receptor)
    SetStyle { role: String, style: usize },
    /// Choose the search backend
    SelectVendor { name: String },
    /// Validate and run the query through the dry-run dispatcher
    Search,
    /// List saved sessions
    List,
    /// Delete a saved session
    Delete { handle: String },
    /// Show the catalog, or write the default catalog.toml
    Catalog {
        /// Write the default catalog file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.json_logs);

    let mut workbench = Workbench::open(cli.data_dir)?;
    let handle = cli.session.as_str();

    match cli.command {
        Commands::New => commands::session::new_query(&mut workbench, handle).await?,
        Commands::Show => commands::session::show(&mut workbench, handle).await?,
        Commands::Validate => commands::session::validate(&mut workbench, handle).await?,
        Commands::AddFeature {
            kind,
            x,
            y,
            z,
            radius,
        } => commands::edit::add_feature(&mut workbench, handle, &kind, [x, y, z], radius).await?,
        Commands::RemoveFeature { index } => {
            commands::edit::remove_feature(&mut workbench, handle, index).await?
        }
        Commands::ToggleFeature { index } => {
            commands::edit::toggle_feature(&mut workbench, handle, index).await?
        }
        Commands::SetFilter {
            field,
            value,
            clear,
        } => commands::edit::set_filter(&mut workbench, handle, &field, value, clear).await?,
        Commands::SetStyle { role, style } => {
            commands::edit::set_style(&mut workbench, handle, &role, style).await?
        }
        Commands::SelectVendor { name } => {
            commands::edit::select_vendor(&mut workbench, handle, &name).await?
        }
        Commands::Search => commands::session::search(&mut workbench, handle).await?,
        Commands::List => commands::session::list(&mut workbench).await?,
        Commands::Delete { handle } => commands::session::delete(&mut workbench, &handle).await?,
        Commands::Catalog { init } => commands::catalog::show(&workbench, init)?,
    }

    Ok(())
}
