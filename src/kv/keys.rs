//! Storage key layout
//!
//! The names match what the mobile app already has on disk, so existing
//! stores load unchanged.

/// Key holding the serialized `{ sets: [...] }` root
pub const ROOT_KEY: &str = "flashcardAppSets";

pub fn bookmarks(set_id: &str) -> String {
    format!("bookmarks_{}", set_id)
}

pub fn learned(set_id: &str) -> String {
    format!("learned_{}", set_id)
}

pub fn current_position(set_id: &str) -> String {
    format!("current_position_{}", set_id)
}

pub fn shuffled_order(set_id: &str) -> String {
    format!("shuffled_order_{}", set_id)
}

pub fn starred_items(set_id: &str) -> String {
    format!("starred_items_{}", set_id)
}

pub fn starred_position(set_id: &str) -> String {
    format!("starred_position_{}", set_id)
}

/// Every auxiliary key a set can own
pub fn auxiliary_keys(set_id: &str) -> [String; 6] {
    [
        bookmarks(set_id),
        learned(set_id),
        current_position(set_id),
        shuffled_order(set_id),
        starred_items(set_id),
        starred_position(set_id),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auxiliary_keys() {
        let keys = auxiliary_keys("1712345678901");
        assert_eq!(keys[0], "bookmarks_1712345678901");
        assert_eq!(keys[3], "shuffled_order_1712345678901");
        assert!(keys.iter().all(|k| k.ends_with("_1712345678901")));
    }
}
