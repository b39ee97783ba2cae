//! Expired-row sweep.
//!
//! Fireballs, chat messages and ring drops carry an `expires_at_ms`. The sweep deletes every
//! row with `expires_at_ms <= now`, and nothing earlier.

use crate::clock::SimClock;
use crate::settings::TickSettings;
use crate::store::WorldStore;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PruneReport {
    pub fireballs: usize,
    pub chat_messages: usize,
    pub ring_drops: usize,
}

impl PruneReport {
    pub fn total(&self) -> usize {
        self.fireballs + self.chat_messages + self.ring_drops
    }
}

pub fn prune_expired<S: WorldStore + ?Sized>(store: &mut S, now_ms: i64) -> PruneReport {
    let fireballs = store.expired_fireballs(now_ms);
    for id in &fireballs {
        store.delete_fireball(*id);
    }
    let chat = store.expired_chat_messages(now_ms);
    for id in &chat {
        store.delete_chat_message(*id);
    }
    let rings = store.expired_ring_drops(now_ms);
    for id in &rings {
        store.delete_ring_drop(*id);
    }

    let report = PruneReport {
        fireballs: fireballs.len(),
        chat_messages: chat.len(),
        ring_drops: rings.len(),
    };
    if report.total() > 0 {
        log::debug!("pruned {report:?}");
    }
    report
}

/// Runs the sweep when the clock's prune gate is open.
pub fn maybe_prune<S: WorldStore + ?Sized>(
    store: &mut S,
    clock: &mut SimClock,
    ticks: &TickSettings,
    now_ms: i64,
) -> Option<PruneReport> {
    clock
        .try_prune(now_ms, ticks)
        .then(|| prune_expired(store, now_ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_store::MemoryStore;
    use crate::rows::{ChatMessageEvent, FireballEvent, PlayerId, RingDrop, RingSource};

    fn seed(store: &mut MemoryStore, expires_at_ms: i64) {
        store.insert_fireball(FireballEvent {
            event_id: 0,
            owner_identity: PlayerId::default(),
            origin_x: 0.0,
            origin_y: 0.0,
            origin_z: 0.0,
            dir_x: 0.0,
            dir_y: 0.0,
            dir_z: -1.0,
            created_at_ms: 0,
            expires_at_ms,
        });
        store.insert_chat_message(ChatMessageEvent {
            message_id: 0,
            owner_identity: PlayerId::default(),
            display_name: "p".into(),
            text: "hi".into(),
            created_at_ms: 0,
            expires_at_ms,
        });
        store.insert_ring_drop(RingDrop {
            ring_id: 0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
            source: RingSource::Spill,
            collected: false,
            spawned_at_ms: 0,
            expires_at_ms,
        });
    }

    #[test]
    fn never_prunes_early() {
        let mut store = MemoryStore::new();
        seed(&mut store, 1_000);
        seed(&mut store, 2_000);

        assert_eq!(prune_expired(&mut store, 999).total(), 0);
        let r = prune_expired(&mut store, 1_000);
        assert_eq!(
            r,
            PruneReport {
                fireballs: 1,
                chat_messages: 1,
                ring_drops: 1
            }
        );
        assert!(store.fireballs.values().all(|f| f.expires_at_ms > 1_000));
        assert!(store.ring_drops.values().all(|d| d.expires_at_ms > 1_000));
    }

    #[test]
    fn gated_by_clock() {
        let mut store = MemoryStore::new();
        let mut clock = SimClock::new();
        let ticks = TickSettings::default();
        seed(&mut store, 100);

        assert_eq!(maybe_prune(&mut store, &mut clock, &ticks, 50).map(|r| r.total()), Some(0));
        // Gate closed: the row stays although it has expired.
        assert_eq!(maybe_prune(&mut store, &mut clock, &ticks, 500), None);
        assert_eq!(store.fireballs.len(), 1);
        assert_eq!(maybe_prune(&mut store, &mut clock, &ticks, 1_050).map(|r| r.total()), Some(3));
    }
}
