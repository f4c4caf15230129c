//! gormgen CLI - generate Go GORM model structs from a live database.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use gormgen::{Config, DbConfig, GenError, Session};
use tokio_util::sync::CancellationToken;
use tracing::Level;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

#[derive(Parser)]
#[command(name = "gormgen")]
#[command(about = "Generate Go GORM model structs from MySQL and PostgreSQL schemas")]
#[command(version)]
struct Cli {
    /// Path to a YAML configuration file (flags override its values)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Database engine: mysql or postgres
    #[arg(long)]
    engine: Option<String>,

    /// Database host
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Database port
    #[arg(short = 'P', long)]
    port: Option<u16>,

    /// Username
    #[arg(short, long)]
    user: Option<String>,

    /// Password
    #[arg(short = 'p', long)]
    password: Option<String>,

    /// Database name
    #[arg(short, long)]
    database: Option<String>,

    /// Schema to introspect (PostgreSQL)
    #[arg(long)]
    schema: Option<String>,

    /// SSL mode for PostgreSQL: disable, require, verify-ca, verify-full
    #[arg(long)]
    ssl_mode: Option<String>,

    /// Package name for generated files
    #[arg(long, default_value = "models")]
    package: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "warn")]
    verbosity: String,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List base tables in the database
    Tables,

    /// List available schemas (PostgreSQL)
    Schemas,

    /// Show column metadata and resolved Go types for a table
    Describe {
        /// Table name
        table: String,
    },

    /// Print the generated model source for a table
    Preview {
        /// Table name
        table: String,
    },

    /// Generate model files
    Generate {
        /// Generate a single table
        #[arg(long, conflicts_with = "all")]
        table: Option<String>,

        /// Generate every table
        #[arg(long)]
        all: bool,

        /// Output directory [default: ./models]
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), GenError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format)
        .map_err(GenError::Config)?;

    let db_config = resolve_db_config(&cli)?;
    let output_dir = resolve_output_dir(&cli);

    let cancel_token = setup_signal_handler().await;

    let session = Session::with_cancellation(cancel_token);
    session.set_package_name(&cli.package).await;
    session.connect(db_config).await?;

    if let Some(schema) = &cli.schema {
        session.select_schema(schema).await?;
    }

    let result = dispatch(&cli, &session, &output_dir).await;

    // Tear the session down even when the command failed.
    let _ = session.disconnect().await;
    result
}

async fn dispatch(
    cli: &Cli,
    session: &Session,
    output_dir: &std::path::Path,
) -> Result<(), GenError> {
    match &cli.command {
        Commands::Tables => {
            for table in session.list_tables().await? {
                println!("{}", table);
            }
        }

        Commands::Schemas => {
            let schemas = session.list_schemas().await?;
            if schemas.is_empty() {
                eprintln!("(engine has no schema concept)");
            }
            for schema in schemas {
                println!("{}", schema);
            }
        }

        Commands::Describe { table } => {
            let columns = session.describe_table(table).await?;
            println!(
                "{:<24} {:<20} {:<12} {:<8} {}",
                "COLUMN", "RAW TYPE", "GO TYPE", "NULL", "FLAGS"
            );
            for col in columns {
                let mut flags = Vec::new();
                if col.is_primary_key {
                    flags.push("pk");
                }
                if col.is_auto_increment {
                    flags.push("auto");
                }
                if !col.enum_values.is_empty() {
                    flags.push("enum");
                }
                println!(
                    "{:<24} {:<20} {:<12} {:<8} {}",
                    col.name,
                    col.raw_type,
                    col.go_type,
                    if col.is_nullable { "yes" } else { "no" },
                    flags.join(",")
                );
            }
        }

        Commands::Preview { table } => {
            print!("{}", session.preview(table).await?);
        }

        Commands::Generate { table, all, .. } => match (table, *all) {
            (Some(table), _) => {
                let path = output_dir.join(gormgen::generator::naming::to_file_name(table));
                let written = session.write(table, &path).await?;
                println!("{}", written.display());
            }
            (None, true) => {
                let result = session.write_all(output_dir).await?;
                for path in &result.written {
                    println!("{}", path.display());
                }
                if let Some((failed_table, err)) = result.failed {
                    eprintln!(
                        "Aborted at table {} after {} file(s): {}",
                        failed_table,
                        result.written.len(),
                        err
                    );
                    return Err(err);
                }
            }
            (None, false) => {
                return Err(GenError::Config(
                    "pass --table <name> or --all to generate".to_string(),
                ));
            }
        },
    }

    Ok(())
}

/// Merge the config file (if any) with command-line flag overrides.
fn resolve_db_config(cli: &Cli) -> Result<DbConfig, GenError> {
    let file_config = match &cli.config {
        Some(path) => Some(Config::load(path)?),
        None => None,
    };

    let base = file_config.as_ref().map(|c| c.database.clone());

    let pick = |flag: &Option<String>, from_file: Option<String>, name: &str| {
        flag.clone()
            .or(from_file)
            .ok_or_else(|| GenError::Config(format!("missing required parameter: {}", name)))
    };

    let engine = pick(&cli.engine, base.as_ref().map(|b| b.engine.clone()), "engine")?;
    let host = pick(&cli.host, base.as_ref().map(|b| b.host.clone()), "host")?;
    let user = pick(&cli.user, base.as_ref().map(|b| b.user.clone()), "user")?;
    let database = pick(
        &cli.database,
        base.as_ref().map(|b| b.database.clone()),
        "database",
    )?;

    let port = cli
        .port
        .or(base.as_ref().map(|b| b.port))
        .unwrap_or_else(|| default_port(&engine));
    let password = cli
        .password
        .clone()
        .or(base.as_ref().map(|b| b.password.clone()))
        .unwrap_or_default();
    let schema = cli
        .schema
        .clone()
        .or(base.as_ref().map(|b| b.schema.clone()))
        .unwrap_or_else(|| "public".to_string());
    let ssl_mode = cli
        .ssl_mode
        .clone()
        .or(base.as_ref().map(|b| b.ssl_mode.clone()))
        .unwrap_or_else(|| "disable".to_string());

    Ok(DbConfig {
        engine,
        host,
        port,
        user,
        password,
        database,
        schema,
        ssl_mode,
    })
}

fn resolve_output_dir(cli: &Cli) -> PathBuf {
    if let Commands::Generate { out: Some(out), .. } = &cli.command {
        return out.clone();
    }
    if let Some(path) = &cli.config {
        if let Ok(config) = Config::load(path) {
            return PathBuf::from(config.generator.output_dir);
        }
    }
    PathBuf::from("./models")
}

fn default_port(engine: &str) -> u16 {
    match engine {
        "mysql" => 3306,
        _ => 5432,
    }
}

fn setup_logging(verbosity: &str, format: &str) -> Result<(), String> {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    Ok(())
}

/// Setup SIGINT/SIGTERM handlers; returns a token cancelled on signal.
#[cfg(unix)]
async fn setup_signal_handler() -> CancellationToken {
    let cancel_token = CancellationToken::new();

    let token_int = cancel_token.clone();
    let token_term = cancel_token.clone();

    tokio::spawn(async move {
        if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
            sigint.recv().await;
            eprintln!("\nReceived SIGINT. Cancelling...");
            token_int.cancel();
        }
    });

    tokio::spawn(async move {
        if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
            sigterm.recv().await;
            eprintln!("\nReceived SIGTERM. Cancelling...");
            token_term.cancel();
        }
    });

    cancel_token
}

/// Setup signal handler for Windows (only Ctrl-C).
#[cfg(not(unix))]
async fn setup_signal_handler() -> CancellationToken {
    let cancel_token = CancellationToken::new();
    let token = cancel_token.clone();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nReceived Ctrl-C. Cancelling...");
            token.cancel();
        }
    });

    cancel_token
}
