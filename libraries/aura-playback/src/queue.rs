//! Play order over a fixed queue
//!
//! The queue handed to the engine never changes; navigation walks a
//! permutation of its indices. Shuffle swaps in a random permutation that
//! starts at the current item, and turning it off goes back to identity
//! order at the same item.

use crate::shuffle::shuffled_order;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayOrder {
    order: Vec<usize>,
    cursor: usize,
}

impl PlayOrder {
    /// Order over `len` items positioned on `start`
    pub fn new(len: usize, start: usize, shuffled: bool) -> Self {
        if shuffled {
            Self {
                order: shuffled_order(len, Some(start)),
                cursor: 0,
            }
        } else {
            Self {
                order: (0..len).collect(),
                cursor: start.min(len.saturating_sub(1)),
            }
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Queue index of the current item
    pub fn current(&self) -> Option<usize> {
        self.order.get(self.cursor).copied()
    }

    /// Move to the next item, returning its queue index
    pub fn advance(&mut self, wrap: bool) -> Option<usize> {
        let cursor = self.next_cursor(wrap)?;
        self.cursor = cursor;
        self.current()
    }

    /// Move to the previous item, returning its queue index
    pub fn go_back(&mut self, wrap: bool) -> Option<usize> {
        let cursor = self.previous_cursor(wrap)?;
        self.cursor = cursor;
        self.current()
    }

    pub fn has_previous(&self, wrap: bool) -> bool {
        self.previous_cursor(wrap).is_some()
    }

    /// Switch between shuffled and identity order, keeping the current item
    pub fn set_shuffled(&mut self, shuffled: bool) {
        let current = self.current();
        if shuffled {
            self.order = shuffled_order(self.order.len(), current);
            self.cursor = 0;
        } else {
            self.order = (0..self.order.len()).collect();
            self.cursor = current.unwrap_or(0);
        }
    }

    /// Queue indices in play order
    pub fn as_slice(&self) -> &[usize] {
        &self.order
    }

    fn next_cursor(&self, wrap: bool) -> Option<usize> {
        if self.order.is_empty() {
            return None;
        }
        if self.cursor + 1 < self.order.len() {
            Some(self.cursor + 1)
        } else if wrap {
            Some(0)
        } else {
            None
        }
    }

    fn previous_cursor(&self, wrap: bool) -> Option<usize> {
        if self.order.is_empty() {
            return None;
        }
        if self.cursor > 0 {
            Some(self.cursor - 1)
        } else if wrap {
            Some(self.order.len() - 1)
        } else {
            None
        }
    }
}
