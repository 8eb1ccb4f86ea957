use crate::OutputFormat;
use crate::scan::{ScanArgs, scan};
use crate::view::usage_rows;
use nu_ansi_term::Color;
use tabled::Table;

pub async fn run(args: ScanArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let outcome = scan(args).await?;
    let index = &outcome.report.index;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(index)?),
        OutputFormat::Table => {
            if index.is_empty() {
                println!("No widgets found.");
                return Ok(());
            }
            println!(
                "{} {} widget types across {} documents",
                Color::LightBlue.bold().paint("Widget usage:"),
                index.len(),
                index.document_count()
            );
            println!("{}", Table::new(usage_rows(&outcome.config, index)));
        }
    }

    Ok(())
}
