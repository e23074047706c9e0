//! Tool classes and tiers used by the break-time formula and drop gating.

/// The class of tool a material responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ToolClass {
    /// No particular tool; bare hands are fine.
    #[default]
    None,
    Pickaxe,
    Shovel,
    Axe,
    Hoe,
}

/// Tool quality tier.
///
/// The discriminant doubles as the harvest level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ToolTier {
    Wood = 0,
    Stone = 1,
    Iron = 2,
    Diamond = 3,
    Netherite = 4,
}

impl ToolTier {
    /// Mining speed multiplier applied when the tool class matches.
    #[inline]
    #[must_use]
    pub const fn speed_multiplier(self) -> f32 {
        match self {
            Self::Wood => 2.0,
            Self::Stone => 4.0,
            Self::Iron => 6.0,
            Self::Diamond => 8.0,
            Self::Netherite => 9.0,
        }
    }

    /// Harvest level granted by this tier.
    #[inline]
    #[must_use]
    pub const fn harvest_level(self) -> u8 {
        self as u8
    }
}

/// A tool held while breaking a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tool {
    pub class: ToolClass,
    pub tier: ToolTier,
}

impl Tool {
    pub const fn new(class: ToolClass, tier: ToolTier) -> Self {
        Self { class, tier }
    }
}
