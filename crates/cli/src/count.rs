use crate::view::CountRow;
use std::path::Path;
use tabled::Table;
use widgetscope_api::RawTree;
use widgetscope_core::{DirectorySource, TreeCounter, tree};

pub fn run(file: &Path, raw: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut rows = Vec::new();

    if raw {
        let content = std::fs::read_to_string(file)?;
        let nodes = tree::parse_raw_tree(&RawTree::Serialized(content))?;
        for (widget, count) in TreeCounter::count(&nodes) {
            rows.push(CountRow {
                document: file.display().to_string(),
                widget,
                count,
            });
        }
    } else {
        for record in DirectorySource::read_file(file)? {
            for (widget, count) in TreeCounter::count_record(&record) {
                rows.push(CountRow {
                    document: record.id.to_string(),
                    widget,
                    count,
                });
            }
        }
    }

    if rows.is_empty() {
        println!("No widgets found.");
    } else {
        println!("{}", Table::new(rows));
    }
    Ok(())
}
