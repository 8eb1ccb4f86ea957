mod clear;
mod count;
mod report;
mod scan;
mod view;
mod widgets;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub use scan::ScanArgs;

#[derive(Parser)]
#[command(
    name = "widgetscope",
    version,
    about = "Audit which page-builder widgets a content corpus uses, and where",
    long_about = "Widgetscope walks the element tree of every document in a corpus and reports, \
                  for each widget type, the documents that use it and how many times."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report every widget type with the documents using it
    #[command(
        long_about = "Indexes the corpus under CORPUS_PATH and prints one row per widget type and \
                      document. Every run indexes afresh unless --cached is given."
    )]
    Report {
        #[command(flatten)]
        scan: ScanArgs,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Summarize usage per widget type
    Widgets {
        #[command(flatten)]
        scan: ScanArgs,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Count the widgets in a single record file
    Count {
        /// Path to a record file, or to a bare element tree with --raw
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Treat the file as a bare serialized element tree
        #[arg(long)]
        raw: bool,
    },
    /// Clear cached reports
    #[command(
        long_about = "Removes cached reports. If a path is provided, only that corpus's report \
                      is removed. Otherwise, all cached reports are cleared."
    )]
    Clear {
        /// Path to the corpus whose cached report should be removed (optional)
        #[arg(value_name = "CORPUS_PATH")]
        path: Option<PathBuf>,
    },
    /// Print the JSON schema of the report produced by `report --format json`
    Schema,
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let _guard = widgetscope_core::logging::init_logging("cli", true);

    let rt = tokio::runtime::Runtime::new()?;

    match cli.command {
        Commands::Report { scan, format } => rt.block_on(report::run(scan, format)),
        Commands::Widgets { scan, format } => rt.block_on(widgets::run(scan, format)),
        Commands::Count { file, raw } => count::run(&file, raw),
        Commands::Clear { path } => clear::run(path),
        Commands::Schema => {
            let schema = schemars::schema_for!(widgetscope_api::WidgetUsageIndex);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_report_with_filters() {
        let cli = Cli::try_parse_from([
            "widgetscope",
            "report",
            "./corpus",
            "--post-type",
            "page",
            "--post-type",
            "elementor_library",
            "--status",
            "publish",
            "--format",
            "json",
            "--timeout-secs",
            "30",
        ])
        .unwrap();

        match cli.command {
            Commands::Report { scan, format } => {
                assert_eq!(scan.path, PathBuf::from("./corpus"));
                assert_eq!(scan.post_types, vec!["page", "elementor_library"]);
                assert_eq!(scan.statuses, vec!["publish"]);
                assert_eq!(scan.timeout_secs, Some(30));
                assert!(!scan.cached);
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("expected report command"),
        }
    }

    #[test]
    fn test_parse_count_and_clear() {
        let cli = Cli::try_parse_from(["widgetscope", "count", "tree.json", "--raw"]).unwrap();
        assert!(matches!(cli.command, Commands::Count { raw: true, .. }));

        let cli = Cli::try_parse_from(["widgetscope", "clear"]).unwrap();
        assert!(matches!(cli.command, Commands::Clear { path: None }));
    }
}
