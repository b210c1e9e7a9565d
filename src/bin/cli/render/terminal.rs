use flashdeck_lib::sets::Item;

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const ITALIC: &str = "\x1b[3m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const GREEN: &str = "\x1b[32m";
    pub const GRAY: &str = "\x1b[90m";
}

/// Markers shown next to a card
#[derive(Debug, Clone, Copy, Default)]
pub struct CardFlags {
    pub starred: bool,
    pub learned: bool,
}

fn paint(text: &str, code: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", code, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Render one card: word line, wrapped definition, optional example
pub fn render_card(item: &Item, flags: CardFlags, use_color: bool) -> String {
    let mut lines = Vec::new();

    let mut head = paint(&item.word, Color::BOLD, use_color);
    if flags.starred {
        head.push(' ');
        head.push_str(&paint("\u{2605}", Color::YELLOW, use_color));
    }
    if flags.learned {
        head.push(' ');
        head.push_str(&paint("\u{2713}", Color::GREEN, use_color));
    }
    lines.push(head);

    lines.extend(wrap_lines(&item.definition, "  ", 80));

    if !item.example.is_empty() {
        for line in wrap_lines(&item.example, "  ", 80) {
            lines.push(paint(&line, Color::ITALIC, use_color));
        }
    }

    lines.join("\n")
}

/// Simple word-wrapping for terminal output
fn wrap_lines(text: &str, prefix: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let effective_width = max_width.saturating_sub(prefix.len());

    for line in text.lines() {
        if line.chars().count() <= effective_width {
            lines.push(format!("{}{}", prefix, line));
            continue;
        }

        let mut current_line = String::new();
        for word in line.split_whitespace() {
            if current_line.is_empty() {
                current_line = word.to_string();
            } else if current_line.chars().count() + 1 + word.chars().count() <= effective_width {
                current_line.push(' ');
                current_line.push_str(word);
            } else {
                lines.push(format!("{}{}", prefix, current_line));
                current_line = word.to_string();
            }
        }
        if !current_line.is_empty() {
            lines.push(format!("{}{}", prefix, current_line));
        }
    }

    lines
}

/// Shorten `text` to `width` characters, marking the cut with "..."
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_card_plain() {
        let item = Item::new("cat", "a feline", "The cat slept.");
        let flags = CardFlags { starred: true, learned: false };

        assert_eq!(render_card(&item, flags, false), "cat \u{2605}\n  a feline\n  The cat slept.");
    }

    #[test]
    fn test_wrap_long_definition() {
        let text = "word ".repeat(30);
        let lines = wrap_lines(text.trim(), "  ", 20);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= 20));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Animals", 10), "Animals");
        assert_eq!(truncate("Vocabulary for the exam", 10), "Vocabul...");
    }
}
