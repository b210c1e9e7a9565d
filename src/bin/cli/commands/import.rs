use std::path::Path;

use anyhow::Result;

use flashdeck_lib::sets::MergePolicy;

use crate::app::App;
use crate::OutputFormat;

pub fn run(
    app: &App,
    set_query: &str,
    csv_path: &Path,
    has_header: bool,
    policy: MergePolicy,
    format: &OutputFormat,
) -> Result<()> {
    let set = app.find_set(set_query)?;
    let items = app.read_csv(csv_path, has_header)?;
    let report = app.merge_items(&set.id, items, policy)?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": set.id,
                "name": set.name,
                "policy": policy,
                "added": report.added,
                "replaced": report.replaced,
                "skipped": report.skipped,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Imported into \"{}\"", set.name);
            println!("  Added: {}", report.added);
            match policy {
                MergePolicy::ReplaceOrAppend => println!("  Replaced: {}", report.replaced),
                MergePolicy::AppendSkip => println!("  Skipped (already present): {}", report.skipped),
            }
        }
    }

    Ok(())
}
