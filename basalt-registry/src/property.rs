//! Keys of the open per-state property map.

/// A property a block state may carry.
///
/// Each definition declares the subset of keys its states may use; a
/// state carrying a key outside that schema fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyKey {
    /// Liquid fill level: 0 = source, 7 = weakest flow.
    Level,
    /// Growth age counter.
    Age,
    /// Taxicab distance to the nearest supporting log.
    Distance,
    /// Log orientation axis: 0 = x, 1 = y, 2 = z.
    Axis,
}
