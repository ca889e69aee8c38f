use std::ops::Range;

/// Inclusive `start..=stop` window over a list, with sorted-set semantics:
/// negative indices count from the end, so `-1` is the last element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListRange {
    pub start: i64,
    pub stop: i64,
}

impl ListRange {
    /// The whole list.
    pub const ALL: ListRange = ListRange { start: 0, stop: -1 };

    pub fn new(start: i64, stop: i64) -> Self {
        Self { start, stop }
    }

    /// Resolves the window against a list of `len` elements.
    ///
    /// Returns `None` when the window selects nothing.
    pub fn resolve(&self, len: usize) -> Option<Range<usize>> {
        let len = len as i64;
        let start = if self.start < 0 {
            (len + self.start).max(0)
        } else {
            self.start
        };
        let stop = if self.stop < 0 {
            len + self.stop
        } else {
            self.stop.min(len - 1)
        };

        if start >= len || stop < start {
            return None;
        }

        Some(start as usize..stop as usize + 1)
    }

    /// SQL `OFFSET`/`LIMIT` for windows that do not depend on the list length.
    ///
    /// `None` means the caller has to count the list first and use
    /// [`ListRange::resolve`]. A `None` limit reads to the end, which is also
    /// what a window too wide for an `i64` limit gets.
    pub fn offset_limit(&self) -> Option<(i64, Option<i64>)> {
        match (self.start, self.stop) {
            (start, -1) if start >= 0 => Some((start, None)),
            (start, stop) if start >= 0 && stop >= 0 => {
                let limit = stop.checked_sub(start).and_then(|n| n.checked_add(1));
                Some((start, limit.map(|n| n.max(0))))
            }
            _ => None,
        }
    }
}

impl Default for ListRange {
    fn default() -> Self {
        Self::ALL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_covers_the_list() {
        assert_eq!(ListRange::ALL.resolve(3), Some(0..3));
        assert_eq!(ListRange::ALL.resolve(0), None);
    }

    #[test]
    fn stop_is_inclusive_and_clamped() {
        assert_eq!(ListRange::new(0, 1).resolve(5), Some(0..2));
        assert_eq!(ListRange::new(3, 100).resolve(5), Some(3..5));
        assert_eq!(ListRange::new(5, 10).resolve(5), None);
    }

    #[test]
    fn negative_indices_count_from_the_end() {
        assert_eq!(ListRange::new(-2, -1).resolve(5), Some(3..5));
        assert_eq!(ListRange::new(-10, 1).resolve(5), Some(0..2));
        assert_eq!(ListRange::new(0, -6).resolve(5), None);
    }

    #[test]
    fn inverted_window_is_empty() {
        assert_eq!(ListRange::new(3, 1).resolve(5), None);
        assert_eq!(ListRange::new(3, 1).offset_limit(), Some((3, Some(0))));
    }

    #[test]
    fn offset_limit_only_for_length_independent_windows() {
        assert_eq!(ListRange::ALL.offset_limit(), Some((0, None)));
        assert_eq!(ListRange::new(10, 19).offset_limit(), Some((10, Some(10))));
        assert_eq!(ListRange::new(-5, -1).offset_limit(), None);
        assert_eq!(ListRange::new(0, -2).offset_limit(), None);
    }

    #[test]
    fn huge_stop_reads_to_the_end() {
        assert_eq!(ListRange::new(0, i64::MAX).offset_limit(), Some((0, None)));
        assert_eq!(ListRange::new(1, i64::MAX).offset_limit(), Some((1, Some(i64::MAX))));
        assert_eq!(ListRange::new(0, i64::MAX).resolve(3), Some(0..3));
    }
}
