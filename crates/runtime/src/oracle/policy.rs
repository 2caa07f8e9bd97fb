//! Interaction policy implementing [`combat_core::InteractionPolicy`].
use combat_core::{InteractionPolicy, Npc, Player};

/// Instanced entities can only be attacked by their owner.
#[derive(Clone, Copy, Debug, Default)]
pub struct OwnershipPolicy;

impl InteractionPolicy for OwnershipPolicy {
    fn can_attack(&self, player: &Player, npc: &Npc) -> bool {
        npc.owner.is_none_or(|owner| owner == player.id)
    }
}
