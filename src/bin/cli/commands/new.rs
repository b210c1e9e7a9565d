use std::path::Path;

use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

pub fn run(
    app: &App,
    name: &str,
    csv_path: &Path,
    has_header: bool,
    format: &OutputFormat,
) -> Result<()> {
    let items = app.read_csv(csv_path, has_header)?;
    let set = app.create_set(name, items)?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": set.id,
                "name": set.name,
                "itemCount": set.items.len(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Created set \"{}\" with {} cards", set.name, set.items.len());
            println!("  ID: {}", set.id);
        }
    }

    Ok(())
}
