use anyhow::Result;

use crate::app::App;
use crate::render::terminal::{truncate, Color};
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let sets = app.list_sets();

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = sets.iter().map(|set| {
                serde_json::json!({
                    "id": set.id,
                    "name": set.name,
                    "itemCount": set.item_count,
                    "createdAt": set.created_at.map(|t| t.to_rfc3339()),
                })
            }).collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if sets.is_empty() {
                println!("No sets yet. Create one with: flashdeck-cli new <name> <file.csv>");
                return Ok(());
            }

            let name_width = sets.iter().map(|s| s.name.chars().count()).max().unwrap_or(4).clamp(4, 40);
            let count_width = 5;

            println!("{:<nw$} {:>cw$} {:<10} {}",
                "Name", "Cards", "Created", "ID",
                nw = name_width, cw = count_width);
            println!("{} {} {} {}",
                "\u{2500}".repeat(name_width),
                "\u{2500}".repeat(count_width),
                "\u{2500}".repeat(10),
                "\u{2500}".repeat(13));

            for set in &sets {
                let created = set
                    .created_at
                    .map(|t| t.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "-".to_string());
                let id = if use_color {
                    format!("{}{}{}", Color::GRAY, set.id, Color::RESET)
                } else {
                    set.id.clone()
                };

                println!("{:<nw$} {:>cw$} {:<10} {}",
                    truncate(&set.name, name_width), set.item_count, created, id,
                    nw = name_width, cw = count_width);
            }

            println!("\n{} sets total", sets.len());
        }
    }

    Ok(())
}
