use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, set_query: &str, format: &OutputFormat) -> Result<()> {
    let set = app.find_set(set_query)?;
    let deleted = app.delete_set(&set.id)?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": set.id,
                "name": set.name,
                "deleted": deleted,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Deleted set \"{}\" ({} cards)", set.name, set.items.len());
        }
    }

    Ok(())
}
