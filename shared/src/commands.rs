//! Command handlers.
//!
//! A [`Sim`] binds one host transaction: the store, the caller-owned [`SimClock`], the active
//! settings and the transaction timestamp. Each public method is one command. Validation runs
//! before any write; on success, commands give the world a chance to advance (ticks and the
//! expiry sweep, each behind its rate-limit gate).
//!
//! `upsert_player_state` is the heartbeat: it reconciles the caller's movement, then ticks
//! goombas and mystery boxes and runs their spawn coordinators over the chunks around every
//! connected player.

use nalgebra as na;

use crate::chat;
use crate::chunk::active_chunks;
use crate::clock::SimClock;
use crate::error::{CommandError, CommandResult};
use crate::fireball;
use crate::goomba::{self, Goomba};
use crate::mystery_box::{self, MysteryBox};
use crate::player::{self, sanitize_display_name};
use crate::prune::{PruneReport, maybe_prune};
use crate::reconcile::{Anchor, reconcile};
use crate::rings;
use crate::rows::{ChatMessageEvent, FireballEvent, MotionState, PlayerId, PlayerState};
use crate::settings::SimSettings;
use crate::spawn::run_coordinator;
use crate::store::WorldStore;

/// Client-reported player sample, as received by `upsert_player_state`.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerStateInput {
    pub display_name: String,
    pub position: na::Vector3<f32>,
    pub yaw: f32,
    pub pitch: f32,
    pub velocity: na::Vector3<f32>,
    pub planar_speed: f32,
    pub motion_state: String,
    pub last_input_seq: u32,
}

impl PlayerStateInput {
    fn is_finite(&self) -> bool {
        self.position.iter().all(|c| c.is_finite())
            && self.velocity.iter().all(|c| c.is_finite())
            && self.yaw.is_finite()
            && self.pitch.is_finite()
            && self.planar_speed.is_finite()
    }
}

/// What the opportunistic world update did during a command.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorldAdvance {
    pub goomba_tick: bool,
    pub mystery_box_tick: bool,
    pub pruned: Option<PruneReport>,
    pub spawned: Vec<String>,
}

pub struct Sim<'a, S: WorldStore + ?Sized> {
    pub store: &'a mut S,
    pub clock: &'a mut SimClock,
    pub settings: &'a SimSettings,
    pub now_ms: i64,
}

impl<'a, S: WorldStore + ?Sized> Sim<'a, S> {
    pub fn new(
        store: &'a mut S,
        clock: &'a mut SimClock,
        settings: &'a SimSettings,
        now_ms: i64,
    ) -> Self {
        Self {
            store,
            clock,
            settings,
            now_ms,
        }
    }

    pub fn bootstrap_world(&mut self) -> bool {
        player::bootstrap_world(self.store, self.now_ms)
    }

    pub fn client_connected(&mut self, caller: &PlayerId, connection_id: &str) {
        player::client_connected(self.store, caller, connection_id, self.now_ms);
    }

    pub fn client_disconnected(&mut self, caller: &PlayerId, connection_id: &str) {
        player::client_disconnected(self.store, caller, connection_id);
    }

    /// Heartbeat. Never rejects a finite payload; implausible movement is clamped instead.
    pub fn upsert_player_state(
        &mut self,
        caller: &PlayerId,
        input: PlayerStateInput,
    ) -> CommandResult<WorldAdvance> {
        if !input.is_finite() {
            log::warn!("non-finite player state from {caller:?}");
            return Err(CommandError::InvalidNumericPayload);
        }

        let previous = self.store.find_player(caller);
        let anchor = previous.as_ref().map(|p| Anchor {
            position: p.position(),
            updated_at_ms: p.updated_at_ms,
        });
        let reconciled = reconcile(anchor, input.position, &self.settings.movement, self.now_ms);
        if reconciled.corrected && previous.is_some() {
            log::warn!(
                "clamped movement for {caller:?}: claimed {:?}, accepted {:?}",
                input.position,
                reconciled.position
            );
        }

        let display_name = sanitize_display_name(&input.display_name);
        let p = reconciled.position;
        self.store.put_player(PlayerState {
            identity: *caller,
            display_name: display_name.clone(),
            x: p.x,
            y: p.y,
            z: p.z,
            vx: input.velocity.x,
            vy: input.velocity.y,
            vz: input.velocity.z,
            yaw: input.yaw,
            pitch: input.pitch,
            planar_speed: input.planar_speed,
            motion_state: MotionState::parse(&input.motion_state),
            last_input_seq: input.last_input_seq,
            updated_at_ms: self.now_ms,
            last_cast_at_ms: previous.and_then(|p| p.last_cast_at_ms),
        });

        if let Some(mut stats) = self.store.find_stats(caller) {
            if stats.display_name != display_name {
                stats.display_name = display_name;
                stats.updated_at_ms = self.now_ms;
                self.store.put_stats(stats);
            }
        }

        Ok(self.advance_world())
    }

    pub fn cast_fireball(
        &mut self,
        caller: &PlayerId,
        origin: na::Vector3<f32>,
        direction: na::Vector3<f32>,
    ) -> CommandResult<FireballEvent> {
        let event = fireball::cast_fireball(
            self.store,
            caller,
            origin,
            direction,
            &self.settings.fireball,
            self.now_ms,
        )?;
        self.sweep();
        Ok(event)
    }

    /// Returns the caller's new ring count.
    pub fn collect_ring(&mut self, caller: &PlayerId, ring_id: u64) -> CommandResult<u32> {
        let count =
            rings::collect_ring(self.store, caller, ring_id, &self.settings.rings, self.now_ms)?;
        self.sweep();
        Ok(count)
    }

    pub fn hit_goomba(&mut self, caller: &PlayerId, goomba_id: &str) -> CommandResult {
        goomba::hit_goomba(self.store, caller, goomba_id, self.settings, self.now_ms)?;
        self.sweep();
        Ok(())
    }

    pub fn hit_mystery_box(&mut self, caller: &PlayerId, mystery_box_id: &str) -> CommandResult {
        mystery_box::hit_mystery_box(self.store, caller, mystery_box_id, self.settings, self.now_ms)?;
        self.sweep();
        Ok(())
    }

    pub fn send_chat_message(
        &mut self,
        caller: &PlayerId,
        text: &str,
    ) -> CommandResult<ChatMessageEvent> {
        let message =
            chat::send_chat_message(self.store, caller, text, &self.settings.chat, self.now_ms)?;
        self.sweep();
        Ok(message)
    }

    fn sweep(&mut self) -> Option<PruneReport> {
        maybe_prune(self.store, self.clock, &self.settings.ticks, self.now_ms)
    }

    /// Runs whichever ticks are due: goombas, mystery boxes, then the sweep.
    pub fn advance_world(&mut self) -> WorldAdvance {
        let settings = self.settings;
        let ticks = &settings.ticks;
        let mut advance = WorldAdvance::default();

        let goomba_dt = self.clock.try_goomba_tick(self.now_ms, ticks);
        let box_due = self.clock.try_mystery_box_tick(self.now_ms, ticks);

        if goomba_dt.is_some() || box_due {
            let active = active_chunks(
                self.store.players().iter().map(|p| (p.x, p.z)),
                ticks.active_chunk_radius,
            );

            if let Some(dt_ms) = goomba_dt {
                goomba::tick_goombas(self.store, self.settings, dt_ms, self.now_ms);
                let report =
                    run_coordinator::<Goomba, S>(self.store, self.settings, &active, self.now_ms);
                advance.spawned.extend(report.spawned);
                advance.goomba_tick = true;
            }

            if box_due {
                mystery_box::tick_mystery_boxes(self.store, self.now_ms);
                let report =
                    run_coordinator::<MysteryBox, S>(self.store, self.settings, &active, self.now_ms);
                advance.spawned.extend(report.spawned);
                advance.mystery_box_tick = true;
            }
        }

        advance.pruned = self.sweep();
        advance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_store::MemoryStore;

    fn input_at(x: f32, y: f32, z: f32) -> PlayerStateInput {
        PlayerStateInput {
            display_name: "Toad".into(),
            position: na::Vector3::new(x, y, z),
            yaw: 0.0,
            pitch: 0.0,
            velocity: na::Vector3::zeros(),
            planar_speed: 0.0,
            motion_state: "walk".into(),
            last_input_seq: 1,
        }
    }

    #[test]
    fn upsert_rejects_non_finite_without_writes() {
        let mut store = MemoryStore::new();
        let mut clock = SimClock::new();
        let settings = SimSettings::default();
        let mut sim = Sim::new(&mut store, &mut clock, &settings, 0);
        let id = PlayerId([1; 32]);
        let r = sim.upsert_player_state(&id, input_at(f32::INFINITY, 0.0, 0.0));
        assert_eq!(r, Err(CommandError::InvalidNumericPayload));
        assert!(store.players.is_empty());
        assert_eq!(clock, SimClock::default());
    }

    #[test]
    fn upsert_keeps_cast_timestamp_and_sanitizes_name() {
        let mut store = MemoryStore::new();
        let mut clock = SimClock::new();
        let settings = SimSettings::default();
        let id = PlayerId([1; 32]);
        let mut p = player::new_player(id, 0);
        p.last_cast_at_ms = Some(77);
        store.put_player(p);

        let mut input = input_at(0.5, 1.0, 0.5);
        input.display_name = "  Toad\u{0}  ".into();
        Sim::new(&mut store, &mut clock, &settings, 100)
            .upsert_player_state(&id, input)
            .unwrap();
        let row = &store.players[&id];
        assert_eq!(row.last_cast_at_ms, Some(77));
        assert_eq!(row.display_name, "Toad");
        assert_eq!(row.motion_state, MotionState::Walk);
        assert_eq!(row.updated_at_ms, 100);
    }

    #[test]
    fn heartbeat_ticks_are_rate_limited() {
        let mut store = MemoryStore::new();
        let mut clock = SimClock::new();
        let settings = SimSettings::default();
        let id = PlayerId([1; 32]);

        let first = Sim::new(&mut store, &mut clock, &settings, 1_000)
            .upsert_player_state(&id, input_at(0.0, 1.0, 0.0))
            .unwrap();
        assert!(first.goomba_tick && first.mystery_box_tick);
        assert!(first.pruned.is_some());

        let second = Sim::new(&mut store, &mut clock, &settings, 1_010)
            .upsert_player_state(&id, input_at(0.1, 1.0, 0.0))
            .unwrap();
        assert!(!second.goomba_tick && !second.mystery_box_tick);
        assert!(second.pruned.is_none());
    }
}
