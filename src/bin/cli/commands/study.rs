use anyhow::{bail, Context, Result};

use flashdeck_lib::study::{StudyMode, StudySession};

use crate::app::App;
use crate::render::terminal::{self, CardFlags, Color};
use crate::{OutputFormat, StudyAction};

pub fn run(
    app: &App,
    set_query: &str,
    starred: bool,
    action: StudyAction,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let set = app.find_set(set_query)?;
    let mut session = StudySession::open(&app.state.study_store, &set)
        .context("Failed to load study progress")?;

    if session.is_empty() {
        bail!("Set \"{}\" has no cards", set.name);
    }

    if starred && session.enter_starred_only().is_err() {
        bail!("No starred cards in \"{}\". Star one with: flashdeck-cli study \"{}\" star", set.name, set.name);
    }

    let mut note = None;
    match action {
        StudyAction::Current => {}
        StudyAction::Next => {
            session.next()?;
        }
        StudyAction::Prev => {
            session.prev()?;
        }
        StudyAction::Star => {
            let now_starred = session.toggle_bookmark()?;
            note = Some(if now_starred { "Starred" } else { "Unstarred" });
        }
        StudyAction::Learn => {
            session.mark_learned()?;
            note = Some("Marked as learned");
        }
        StudyAction::Unlearn => {
            session.unmark_learned()?;
            note = Some("Learned mark removed");
        }
        StudyAction::Random => {
            if session.jump_to_random_unlearned()?.is_none() {
                note = Some("Every card is learned");
            }
        }
        StudyAction::Reset => {
            session.reset()?;
            note = Some("Progress cleared and deck reshuffled");
        }
    }

    let flags = CardFlags {
        starred: session.is_bookmarked(),
        learned: session.is_learned(),
    };

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": session.set_id(),
                "name": session.name(),
                "mode": session.mode(),
                "position": session.position(),
                "count": session.len(),
                "card": session.current(),
                "starred": flags.starred,
                "learned": flags.learned,
                "starredCount": session.bookmarks().len(),
                "learnedCount": session.learned_count(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if let Some(note) = note {
                println!("{}", note);
            }

            let header = format!(
                "{} [{}/{}]{}",
                session.name(),
                session.position() + 1,
                session.len(),
                if session.mode() == StudyMode::StarredOnly { " starred" } else { "" }
            );
            if use_color {
                println!("{}{}{}", Color::DIM, header, Color::RESET);
            } else {
                println!("{}", header);
            }

            if let Some(item) = session.current() {
                println!("{}", terminal::render_card(item, flags, use_color));
            }

            println!(
                "\n{} learned, {} starred",
                session.learned_count(),
                session.bookmarks().len()
            );
        }
    }

    Ok(())
}
