//! influxql CLI
//!
//! Command-line front end for the query builder:
//! - Build a query from clause arguments
//! - Render a query stored as JSON
//! - Generate a default config file

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use influxql_builder::config::{generate_default_config, Config, LoggingConfig};
use influxql_builder::query::{parse_condition, parse_order, parse_select, Fill, Query};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "influxql")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build InfluxQL query strings from structured arguments")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ~/.config/influxql/config.toml or ./influxql.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long, global = true)]
    pub format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a query from clause arguments
    Build(BuildArgs),

    /// Render a query stored as JSON ("-" reads stdin)
    Render {
        /// Path to the JSON query document
        file: PathBuf,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Selected expression, optionally with "AS alias" (repeatable)
    #[arg(short = 's', long = "select")]
    pub select: Vec<String>,

    /// Database part of the FROM target
    #[arg(long)]
    pub database: Option<String>,

    /// Retention policy part of the FROM target
    #[arg(long = "rp")]
    pub retention_policy: Option<String>,

    /// Measurement to select from
    #[arg(long)]
    pub from: Option<String>,

    /// Condition as "<field> <op> <value>" (repeatable)
    #[arg(short = 'w', long = "where")]
    pub conditions: Vec<String>,

    /// Condition passed through untouched (repeatable)
    #[arg(long = "where-raw")]
    pub raw_conditions: Vec<String>,

    /// Group-by term (repeatable)
    #[arg(short = 'g', long = "group-by")]
    pub group_by: Vec<String>,

    /// Group by time bucket, e.g. 10m (repeatable)
    #[arg(long)]
    pub group_by_time: Vec<String>,

    /// Order term as "<field> [ASC|DESC]" (repeatable)
    #[arg(short = 'o', long = "order-by")]
    pub order_by: Vec<String>,

    /// Fill policy: null, previous, none, linear or a number
    #[arg(long, allow_negative_numbers = true)]
    pub fill: Option<String>,

    /// Maximum points per series
    #[arg(short = 'l', long, allow_negative_numbers = true)]
    pub limit: Option<i64>,

    /// Maximum series
    #[arg(long, allow_negative_numbers = true)]
    pub slimit: Option<i64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("Failed to load config {:?}", path))?,
        None => Config::load_default(),
    };

    init_logging(&config.logging);

    let format = cli.format.as_deref().unwrap_or(&config.output.format);

    match cli.command {
        Commands::Build(args) => {
            let query = build_query(&args, &config)?;
            print_query(&query, format)?;
        }

        Commands::Render { file } => {
            let query = read_query(&file)?;
            print_query(&query, format)?;
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("Failed to write config to {:?}", path))?;
                    tracing::info!("Wrote default config to {:?}", path);
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

fn init_logging(config: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "influxql={level},influxql_builder={level}",
            level = config.level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);

    if config.format == "json" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Assemble a query from command-line clause arguments.
///
/// Structured conditions come before raw ones in the WHERE clause.
fn build_query(args: &BuildArgs, config: &Config) -> Result<Query> {
    let mut query = Query::new();

    for item in &args.select {
        let (column, alias) = parse_select(item)?;
        query.add_select(column, alias.unwrap_or_default());
    }

    if let Some(measurement) = &args.from {
        let database = args
            .database
            .clone()
            .unwrap_or_else(|| config.defaults.database.clone());
        let retention_policy = args
            .retention_policy
            .clone()
            .unwrap_or_else(|| config.defaults.retention_policy.clone());
        query.set_from(database, retention_policy, measurement.as_str());
    }

    for item in &args.conditions {
        let (field, symbol, value) = parse_condition(item)?;
        query.add_where(field, symbol, value);
    }
    for text in &args.raw_conditions {
        query.add_where_raw(text.as_str());
    }

    for expr in &args.group_by {
        query.add_group_by(expr.as_str());
    }
    for duration in &args.group_by_time {
        query.add_group_by_time(duration.as_str());
    }

    for item in &args.order_by {
        let (field, ascending) = parse_order(item)?;
        query.add_order_by(field, ascending);
    }

    if let Some(fill) = &args.fill {
        let fill: Fill = fill.parse()?;
        query.set_fill(fill);
    }

    if let Some(limit) = args.limit {
        query.set_limit(limit);
    }
    if let Some(limit) = args.slimit {
        query.set_series_limit(limit);
    }

    tracing::debug!(?query, "Built query");
    Ok(query)
}

fn read_query(file: &Path) -> Result<Query> {
    let content = if file.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read query from stdin")?;
        buf
    } else {
        std::fs::read_to_string(file).with_context(|| format!("Failed to read {:?}", file))?
    };

    Query::from_json(&content).with_context(|| format!("Failed to parse query in {:?}", file))
}

fn format_query(query: &Query, format: &str) -> Result<String> {
    let rendered = query.render();
    match format {
        "json" => Ok(serde_json::to_string(&serde_json::json!({ "query": rendered }))?),
        _ => Ok(rendered),
    }
}

fn print_query(query: &Query, format: &str) -> Result<()> {
    println!("{}", format_query(query, format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(args: &[&str]) -> Result<Query> {
        let cli = Cli::try_parse_from(args.iter().copied())?;
        match cli.command {
            Commands::Build(args) => build_query(&args, &Config::default()),
            _ => anyhow::bail!("not a build command"),
        }
    }

    #[test]
    fn test_build_full_query() {
        let query = build(&[
            "influxql",
            "build",
            "--select",
            "mean(usage_idle) as idle",
            "--database",
            "telegraf",
            "--rp",
            "autogen",
            "--from",
            "cpu",
            "--where",
            "host = 'web01'",
            "--where",
            "time > now() - 1h",
            "--group-by-time",
            "5m",
            "--fill",
            "none",
            "--limit",
            "10",
        ])
        .unwrap();

        assert_eq!(
            query.render(),
            concat!(
                r#"SELECT mean("usage_idle") as "idle" FROM "telegraf"."autogen"."cpu" "#,
                r#"WHERE "host" = 'web01' AND time > now() - 1h GROUP BY time(5m) FILL(none) LIMIT 10"#
            )
        );
    }

    #[test]
    fn test_build_uses_config_defaults() {
        let cli = Cli::try_parse_from(["influxql", "build", "--from", "mem"]).unwrap();
        let mut config = Config::default();
        config.defaults.database = "metrics".to_string();

        let Commands::Build(args) = cli.command else {
            panic!("expected build command");
        };
        let query = build_query(&args, &config).unwrap();
        assert_eq!(query.render(), r#"FROM "metrics"."mem""#);
    }

    #[test]
    fn test_build_repeated_group_by_time() {
        let query = build(&[
            "influxql",
            "build",
            "-g",
            "host",
            "--group-by-time",
            "1h",
            "--group-by-time",
            "10m",
        ])
        .unwrap();
        assert_eq!(query.render(), r#"GROUP BY "host", time(1h), time(10m)"#);
    }

    #[test]
    fn test_build_raw_conditions_follow_structured() {
        let query = build(&[
            "influxql",
            "build",
            "--where-raw",
            "col3 = '3'",
            "-w",
            "col1 = 1",
        ])
        .unwrap();
        assert_eq!(query.render(), r#"WHERE "col1" = '1' AND col3 = '3'"#);
    }

    #[test]
    fn test_build_order_fill_limits() {
        let query = build(&[
            "influxql",
            "build",
            "-o",
            "time desc",
            "--fill",
            "-1",
            "--slimit",
            "2",
        ])
        .unwrap();
        assert_eq!(query.render(), "ORDER BY time DESC FILL(number, -1) SLIMIT 2");
    }

    #[test]
    fn test_build_rejects_bad_arguments() {
        assert!(build(&["influxql", "build", "--where", "col1"]).is_err());
        assert!(build(&["influxql", "build", "--fill", "sideways"]).is_err());
    }

    #[test]
    fn test_empty_build_renders_empty() {
        let query = build(&["influxql", "build"]).unwrap();
        assert_eq!(query.render(), "");
    }

    #[test]
    fn test_format_query_json() {
        let mut query = Query::new();
        query.set_limit(1);

        assert_eq!(format_query(&query, "text").unwrap(), "LIMIT 1");
        assert_eq!(
            format_query(&query, "json").unwrap(),
            r#"{"query":"LIMIT 1"}"#
        );
    }

    #[test]
    fn test_read_query_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("query.json");
        std::fs::write(
            &path,
            r#"{"fields": [{"column": "col1"}], "order_bys": [{"field": "col1", "ascending": false}]}"#,
        )
        .unwrap();

        let query = read_query(&path).unwrap();
        assert_eq!(query.render(), r#"SELECT "col1" ORDER BY "col1" DESC"#);
    }
}
