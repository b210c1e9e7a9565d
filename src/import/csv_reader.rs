use crate::sets::Item;

/// One parsed CSV row before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawRow {
    /// Row from a file with a header, columns looked up by name
    Named {
        word: Option<String>,
        definition: Option<String>,
        example: Option<String>,
    },
    /// Row from a headerless file, columns taken by position
    Positional(Vec<String>),
}

impl RawRow {
    /// The single place a raw row becomes an [`Item`].
    ///
    /// Values are trimmed; word and definition must be non-empty.
    pub fn validate(self) -> Option<Item> {
        let (word, definition, example) = match self {
            RawRow::Named {
                word,
                definition,
                example,
            } => (
                word.unwrap_or_default(),
                definition.unwrap_or_default(),
                example.unwrap_or_default(),
            ),
            RawRow::Positional(fields) => {
                if fields.len() < 2 {
                    return None;
                }
                let mut fields = fields.into_iter();
                (
                    fields.next().unwrap_or_default(),
                    fields.next().unwrap_or_default(),
                    fields.next().unwrap_or_default(),
                )
            }
        };

        let item = Item::new(word.trim(), definition.trim(), example.trim());
        item.is_valid().then_some(item)
    }
}

/// Parse CSV text into valid items, in file order
pub fn parse_items(text: &str, has_header: bool) -> Vec<Item> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let rows = if has_header {
        named_rows(text)
    } else {
        positional_rows(text)
    };

    let total = rows.len();
    let items: Vec<Item> = rows.into_iter().filter_map(RawRow::validate).collect();
    if items.len() < total {
        log::debug!("Dropped {} of {} CSV rows without word and definition", total - items.len(), total);
    }
    items
}

fn reader(text: &str, has_header: bool) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(has_header)
        .flexible(true)
        .from_reader(text.as_bytes())
}

fn named_rows(text: &str) -> Vec<RawRow> {
    let mut reader = reader(text, true);

    let headers: Vec<String> = match reader.headers() {
        Ok(h) => h.iter().map(|s| s.trim().to_lowercase()).collect(),
        Err(e) => {
            log::warn!("Unreadable CSV header: {}", e);
            return Vec::new();
        }
    };

    let column = |name: &str| headers.iter().position(|h| h == name);
    let word_col = column("word");
    let definition_col = column("definition");
    let example_col = column("example");

    if word_col.is_none() || definition_col.is_none() {
        log::warn!("CSV header {:?} has no word/definition column", headers);
    }

    reader
        .records()
        .filter_map(|result| match result {
            Ok(record) => Some(record),
            Err(e) => {
                log::debug!("Skipping unreadable CSV row: {}", e);
                None
            }
        })
        .map(|record| {
            let field = |col: Option<usize>| col.and_then(|i| record.get(i)).map(str::to_string);
            RawRow::Named {
                word: field(word_col),
                definition: field(definition_col),
                example: field(example_col),
            }
        })
        .collect()
}

fn positional_rows(text: &str) -> Vec<RawRow> {
    reader(text, false)
        .records()
        .filter_map(|result| match result {
            Ok(record) => Some(record),
            Err(e) => {
                log::debug!("Skipping unreadable CSV row: {}", e);
                None
            }
        })
        .map(|record| RawRow::Positional(record.iter().map(str::to_string).collect()))
        .collect()
}
