//! Seconds-to-break computation.

use crate::definition::BlockDefinition;
use crate::tool::{Tool, ToolClass};

/// Break time is never reported below this, whatever the tool.
const MIN_BREAK_SECONDS: f32 = 0.05;

/// Penalty for digging with bare hands.
const NO_TOOL_PENALTY: f32 = 5.0;

/// Penalty for the wrong tool class or an insufficient harvest level.
const WRONG_TOOL_PENALTY: f32 = 3.0;

/// Bonus scaling per efficiency level on a correct tool.
const EFFICIENCY_SCALE: f32 = 0.3;

/// Computes the seconds needed to break a block.
///
/// Pure function of its inputs: base time is `hardness * 1.5`; bare
/// hands multiply it by 5, a mismatched tool by 3, and a correct tool
/// divides it by the tier's speed multiplier scaled with the efficiency
/// bonus. Materials requiring no tool always break at the base rate.
/// Unbreakable materials report infinity.
#[must_use]
pub fn break_time(definition: &BlockDefinition, tool: Option<&Tool>, efficiency_bonus: u32) -> f32 {
    let material = &definition.material;
    if material.unbreakable() {
        return f32::INFINITY;
    }

    let base = material.hardness * 1.5;
    if material.required_tool == ToolClass::None {
        return base.max(MIN_BREAK_SECONDS);
    }

    let seconds = match tool {
        None => base * NO_TOOL_PENALTY,
        Some(tool) => {
            let correct = tool.class == material.required_tool
                && tool.tier.harvest_level() >= material.harvest_level;
            if correct {
                let speed = tool.tier.speed_multiplier()
                    * (1.0 + efficiency_bonus as f32 * EFFICIENCY_SCALE);
                base / speed
            } else {
                base * WRONG_TOOL_PENALTY
            }
        }
    };

    seconds.max(MIN_BREAK_SECONDS)
}

/// Returns whether a tool harvests the material correctly (used for
/// drop gating alongside the break-time formula).
#[must_use]
pub fn is_correct_tool(definition: &BlockDefinition, tool: Option<&Tool>) -> bool {
    let material = &definition.material;
    if material.required_tool == ToolClass::None {
        return true;
    }
    tool.is_some_and(|tool| {
        tool.class == material.required_tool && tool.tier.harvest_level() >= material.harvest_level
    })
}
