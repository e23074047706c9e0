//! Propagation rule tags.

/// The propagation rule a block participates in.
///
/// This is a closed set: the rule dispatcher matches on it exhaustively,
/// so adding a category is a compile-enforced change at every dispatch
/// site. Each definition carries exactly one category, which keeps rules
/// mutually exclusive per block id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockCategory {
    /// No simulation behavior of its own.
    #[default]
    Inert,
    /// Leveling liquid (source level 0, flow levels 1..=7).
    Water,
    /// Gravity-affected; falls when unsupported.
    Falling,
    /// Grows into a tree under light and space conditions.
    Sapling,
    /// Spreads onto dirt in light, decays in darkness.
    Grass,
    /// Decays when too far from a supporting log.
    Leaves,
}
