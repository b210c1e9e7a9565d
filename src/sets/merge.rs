//! Folding imported items into an existing set
//!
//! Items are processed in file order against the set as it grows, so a
//! duplicate later in the same batch sees the earlier one.

use super::models::{Item, MergePolicy, MergeReport};

/// Merge `incoming` into `items` under `policy`
pub fn merge_items(items: &mut Vec<Item>, incoming: Vec<Item>, policy: MergePolicy) -> MergeReport {
    match policy {
        MergePolicy::AppendSkip => append_skip(items, incoming),
        MergePolicy::ReplaceOrAppend => replace_or_append(items, incoming),
    }
}

fn append_skip(items: &mut Vec<Item>, incoming: Vec<Item>) -> MergeReport {
    let mut report = MergeReport::default();

    for item in incoming {
        if items.iter().any(|existing| existing.word == item.word) {
            report.skipped += 1;
        } else {
            items.push(item);
            report.added += 1;
        }
    }

    report
}

fn replace_or_append(items: &mut Vec<Item>, incoming: Vec<Item>) -> MergeReport {
    let mut report = MergeReport::default();

    for item in incoming {
        let word = item.word.to_lowercase();
        match items.iter().position(|existing| existing.word.to_lowercase() == word) {
            Some(pos) => {
                items[pos] = item;
                report.replaced += 1;
            }
            None => {
                items.push(item);
                report.added += 1;
            }
        }
    }

    report
}
