use crate::OutputFormat;
use crate::scan::{ScanArgs, scan};
use crate::view::summary_rows;
use tabled::Table;

pub async fn run(args: ScanArgs, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let outcome = scan(args).await?;
    let mut summaries = outcome.report.index.summaries();
    summaries.sort_by(|a, b| {
        b.total_uses
            .cmp(&a.total_uses)
            .then_with(|| a.widget_type.cmp(&b.widget_type))
    });

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
        OutputFormat::Table => {
            if summaries.is_empty() {
                println!("No widgets found.");
            } else {
                println!("{}", Table::new(summary_rows(&outcome.config, summaries)));
            }
        }
    }

    Ok(())
}
