//! Kill-credit bookkeeping.

use std::collections::BTreeMap;

use crate::state::EntityRef;

/// Cumulative damage per attacker during one life of a victim.
///
/// Insertion-ordered: on equal totals the attacker recorded first wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DamageLedger {
    entries: Vec<(EntityRef, u64)>,
}

impl DamageLedger {
    pub fn record(&mut self, attacker: EntityRef, amount: u32) {
        match self.entries.iter_mut().find(|(who, _)| *who == attacker) {
            Some((_, total)) => *total += u64::from(amount),
            None => self.entries.push((attacker, u64::from(amount))),
        }
    }

    pub fn damage_by(&self, attacker: EntityRef) -> u64 {
        self.entries
            .iter()
            .find(|(who, _)| *who == attacker)
            .map_or(0, |(_, total)| *total)
    }

    pub fn top_contributor(&self) -> Option<EntityRef> {
        let mut best: Option<(EntityRef, u64)> = None;
        for &(attacker, total) in &self.entries {
            if best.is_none_or(|(_, top)| total > top) {
                best = Some((attacker, total));
            }
        }
        best.map(|(attacker, _)| attacker)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ledgers for every victim currently taking player damage.
#[derive(Clone, Debug, Default)]
pub struct DamageLedgers {
    by_victim: BTreeMap<EntityRef, DamageLedger>,
}

impl DamageLedgers {
    pub fn record(&mut self, victim: EntityRef, attacker: EntityRef, amount: u32) {
        self.by_victim
            .entry(victim)
            .or_default()
            .record(attacker, amount);
    }

    pub fn get(&self, victim: EntityRef) -> Option<&DamageLedger> {
        self.by_victim.get(&victim)
    }

    pub fn top_contributor(&self, victim: EntityRef) -> Option<EntityRef> {
        self.by_victim
            .get(&victim)
            .and_then(DamageLedger::top_contributor)
    }

    /// Drops the victim's ledger; called the instant it dies.
    pub fn clear(&mut self, victim: EntityRef) -> Option<DamageLedger> {
        self.by_victim.remove(&victim)
    }

    pub fn len(&self) -> usize {
        self.by_victim.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_victim.is_empty()
    }
}
