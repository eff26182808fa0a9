/// Which slice of the user list a caller asked for.
///
/// Callers historically pass `(-1, -1)` to mean "everything"; any other
/// pair is an offset/limit window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListRange {
    #[default]
    All,
    Window { offset: i64, limit: i64 },
}

impl ListRange {
    pub const SENTINEL: i64 = -1;

    /// Build a range from the `(start, limit)` pair used by callers.
    ///
    /// Negative values other than the double sentinel clamp to zero, so a
    /// negative limit yields an empty page.
    pub fn from_sentinel(start: i64, limit: i64) -> Self {
        if start == Self::SENTINEL && limit == Self::SENTINEL {
            ListRange::All
        } else {
            ListRange::Window {
                offset: start.max(0),
                limit: limit.max(0),
            }
        }
    }

    /// Apply the window to an already materialized list.
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        match *self {
            ListRange::All => items,
            ListRange::Window { offset, limit } => items
                .into_iter()
                .skip(usize::try_from(offset).unwrap_or(usize::MAX))
                .take(usize::try_from(limit).unwrap_or(0))
                .collect(),
        }
    }
}

