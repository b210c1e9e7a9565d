use anyhow::Result;

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, set_query: &str, name: &str, format: &OutputFormat) -> Result<()> {
    let set = app.find_set(set_query)?;
    let renamed = app.rename_set(&set.id, name)?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": renamed.id,
                "name": renamed.name,
                "previousName": set.name,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Renamed \"{}\" to \"{}\"", set.name, renamed.name);
        }
    }

    Ok(())
}
