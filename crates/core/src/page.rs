//! Result pages
//!
//! One page of a query result, as handed back to the caller.

use serde::{Deserialize, Serialize};

/// One page of rows plus a continuation flag.
///
/// `has_next_page` is derived from what the index reported beyond the
/// requested window, never from the page being full: a final page that
/// happens to be exactly full still reports `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Rows of this page, in index order.
    pub rows: Vec<T>,
    /// Whether at least one more row exists past this page.
    pub has_next_page: bool,
}

impl<T> Page<T> {
    /// Create a page from rows and a continuation flag.
    pub fn new(rows: Vec<T>, has_next_page: bool) -> Self {
        Page {
            rows,
            has_next_page,
        }
    }

    /// An empty terminal page.
    pub fn empty() -> Self {
        Page {
            rows: Vec::new(),
            has_next_page: false,
        }
    }

    /// Number of rows on this page.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether this page carries no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over the rows of this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.rows.iter()
    }

    /// Consume the page, keeping only its rows.
    pub fn into_rows(self) -> Vec<T> {
        self.rows
    }

    /// Map every row, preserving the continuation flag.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            rows: self.rows.into_iter().map(f).collect(),
            has_next_page: self.has_next_page,
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Page::empty()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_page_is_terminal() {
        let page: Page<String> = Page::empty();
        assert!(page.is_empty());
        assert_eq!(page.len(), 0);
        assert!(!page.has_next_page);
    }

    #[test]
    fn test_full_final_page_does_not_imply_continuation() {
        let page = Page::new(vec![1, 2, 3], false);
        assert_eq!(page.len(), 3);
        assert!(!page.has_next_page);
    }

    #[test]
    fn test_map_preserves_continuation() {
        let page = Page::new(vec![1, 2], true).map(|n| n * 10);
        assert_eq!(page.rows, vec![10, 20]);
        assert!(page.has_next_page);
    }

    #[test]
    fn test_page_serialization() {
        let page = Page::new(vec!["a".to_string(), "b".to_string()], true);
        let json = serde_json::to_string(&page).unwrap();
        let restored: Page<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(page, restored);
    }
}
