use anyhow::Result;

use crate::app::App;
use crate::render::terminal::{self, CardFlags};
use crate::OutputFormat;

pub fn run(app: &App, set_query: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let set = app.find_set(set_query)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&set)?);
        }
        OutputFormat::Plain => {
            if use_color {
                println!("{}{}{}", terminal::Color::BOLD, set.name, terminal::Color::RESET);
            } else {
                println!("{}", set.name);
            }
            println!("{} cards", set.items.len());

            for item in &set.items {
                println!();
                println!("{}", terminal::render_card(item, CardFlags::default(), use_color));
            }
        }
    }

    Ok(())
}
