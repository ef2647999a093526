/// Objective carrier resolution
///
/// A player carries the objective when the item in their unit's equipped
/// slot declares a multiplayer classification. The chain is walked with
/// optional lookups; any missing link means "not carrying". Units and items
/// come and go between frames, so a broken chain is expected and must not
/// abort the snapshot.
use crate::host::{MultiplayerItemType, ObjectProvider};

/// Slot value meaning no item is equipped
const NO_EQUIPPED_SLOT: i8 = -1;

/// Whether the player in `player_index` is holding an objective item
pub fn has_objective(objects: &dyn ObjectProvider, player_index: i32) -> bool {
    objects
        .player_unit(player_index)
        .and_then(|unit| {
            objects
                .equipped_item_slot(unit)
                .filter(|&slot| slot != NO_EQUIPPED_SLOT)
                .and_then(|slot| objects.unit_item(unit, slot))
        })
        .and_then(|item| objects.item_definition(item))
        .map(|def| def.multiplayer_type != MultiplayerItemType::None)
        .unwrap_or(false)
}
