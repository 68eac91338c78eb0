//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, applies input events, runs all
//! systems, and produces `GameStateSnapshot`s. Completely headless (no
//! renderer or input dependency), enabling deterministic testing.

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use rangefire_core::commands::InputEvent;
use rangefire_core::components::{ScreenShake, Target};
use rangefire_core::config::{ConfigError, SimConfig};
use rangefire_core::constants::*;
use rangefire_core::enums::{CommandRejection, MatchPhase, RoundEndReason, WeaponKind};
use rangefire_core::events::{Alert, SimEvent};
use rangefire_core::state::GameStateSnapshot;
use rangefire_core::types::{frame_scale, SimTime};
use rangefire_weapons::armory::Armory;
use rangefire_weapons::fsm::WeaponUpdate;
use rangefire_weapons::spread;

use crate::aim::{CameraState, MoveIntent};
use crate::match_state::MatchState;
use crate::systems;
use crate::systems::collision::CollisionOutput;
use crate::systems::snapshot::SnapshotInputs;
use crate::world_setup;

/// All engine state outside the ECS world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimState {
    pub time: SimTime,
    pub camera: CameraState,
    pub move_intent: MoveIntent,
    pub armory: Armory,
    pub match_state: MatchState,
    pub shake: ScreenShake,
    /// Advisories still on screen.
    pub alerts: Vec<Alert>,
    /// Target currently swaying, while a round is in progress.
    pub mover: Option<usize>,
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    config: SimConfig,
    world: World,
    state: SimState,
    rng: ChaCha8Rng,
    next_spawn_order: u64,
    event_queue: VecDeque<InputEvent>,
    despawn_buffer: Vec<Entity>,
    events: Vec<SimEvent>,
}

impl SimulationEngine {
    /// Create a new engine. Fails if the config is inconsistent.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let armory = Armory::new(&config)?;

        Ok(Self {
            world: World::new(),
            state: SimState {
                time: SimTime::default(),
                camera: CameraState::default(),
                move_intent: MoveIntent::default(),
                armory,
                match_state: MatchState::new(config.grenade_supply),
                shake: ScreenShake::default(),
                alerts: Vec::new(),
                mover: None,
            },
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            next_spawn_order: 0,
            event_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            config,
        })
    }

    /// Queue an input event for processing at the next tick boundary.
    pub fn queue_event(&mut self, event: InputEvent) {
        self.event_queue.push_back(event);
    }

    /// Queue multiple events.
    pub fn queue_events(&mut self, events: impl IntoIterator<Item = InputEvent>) {
        self.event_queue.extend(events);
    }

    /// Apply queued events then `events`, advance the world by `dt_ms`, and
    /// return the resulting snapshot. Negative or NaN `dt_ms` counts as zero.
    pub fn advance(&mut self, dt_ms: f64, events: &[InputEvent]) -> GameStateSnapshot {
        let dt_ms = dt_ms.max(0.0);

        self.event_queue.extend(events.iter().cloned());
        self.process_events();

        self.state.time.advance(dt_ms);
        self.decay_shake(dt_ms);
        // A zero-length tick only applies input.
        if self.state.match_state.in_round() && dt_ms > 0.0 {
            self.run_systems(dt_ms);
        }
        self.expire_alerts();

        log::trace!(
            "tick t={:.1}ms dt={:.3}ms phase={:?}",
            self.state.time.elapsed_ms,
            dt_ms,
            self.state.match_state.phase
        );
        self.build_snapshot()
    }

    /// Get the current match phase.
    pub fn phase(&self) -> MatchPhase {
        self.state.match_state.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.state.time
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Engine state outside the world.
    pub fn state(&self) -> &SimState {
        &self.state
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Spawn a bullet at an exact position (for testing). Returns its id.
    #[cfg(test)]
    pub fn spawn_test_bullet(
        &mut self,
        position: glam::DVec3,
        velocity: glam::DVec3,
        gravity: bool,
    ) -> u64 {
        use rangefire_core::components::{Bullet, Projectile};

        let id = self.next_spawn_order;
        let bullet = Bullet {
            position,
            velocity,
            radius: BULLET_RADIUS,
            travel: 0.0,
            max_travel: BULLET_MAX_TRAVEL,
            gravity,
            hit: false,
        };
        world_setup::spawn_projectile(
            &mut self.world,
            &mut self.next_spawn_order,
            Projectile::Bullet(bullet),
        );
        id
    }

    /// Point the camera without going through pointer deltas (for testing).
    #[cfg(test)]
    pub fn set_test_orientation(&mut self, yaw: f64, pitch: f64) {
        self.state.camera.yaw = yaw;
        self.state.camera.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Process all queued events.
    fn process_events(&mut self) {
        while let Some(event) = self.event_queue.pop_front() {
            self.handle_event(event);
        }
    }

    /// Handle a single input event.
    fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::LookDelta { dx, dy } => {
                self.state
                    .camera
                    .apply_look_delta(dx, dy, self.config.mouse_sensitivity);
            }
            InputEvent::MoveIntent { forward, strafe } => {
                self.state.move_intent = MoveIntent::new(forward, strafe);
            }
            InputEvent::Fire => {
                let result = self
                    .require_round()
                    .and_then(|_| self.state.armory.fire());
                if let Err(rejection) = result {
                    self.reject(rejection);
                }
            }
            InputEvent::Reload => {
                let result = self
                    .require_round()
                    .and_then(|_| self.state.armory.reload());
                match result {
                    Ok(()) => {
                        let kind = self.state.armory.selected();
                        let reload_ms = self.state.armory.profile(kind).reload_ms;
                        self.events.push(SimEvent::ReloadStarted { kind });
                        self.raise(Alert::info("Reloading...", self.now(), reload_ms));
                    }
                    Err(rejection) => self.reject(rejection),
                }
            }
            InputEvent::SelectWeapon { kind } => {
                if self.state.armory.select(kind) {
                    log::debug!("selected {}", kind.label());
                    self.events.push(SimEvent::WeaponSelected { kind });
                }
            }
            InputEvent::ThrowGrenade => {
                if let Err(rejection) = self.throw_grenade() {
                    self.reject(rejection);
                }
            }
            InputEvent::AdvanceRound => {
                match self
                    .state
                    .match_state
                    .next_round_index(self.config.rounds_total())
                {
                    Some(index) => self.start_round(index),
                    None => log::trace!(
                        "advance round ignored in {:?}",
                        self.state.match_state.phase
                    ),
                }
            }
        }
    }

    fn require_round(&self) -> Result<(), CommandRejection> {
        if self.state.match_state.in_round() {
            Ok(())
        } else {
            Err(CommandRejection::NotInRound)
        }
    }

    fn throw_grenade(&mut self) -> Result<(), CommandRejection> {
        self.require_round()?;
        if self.state.match_state.grenades_remaining == 0 {
            return Err(CommandRejection::NoGrenades);
        }
        self.state.match_state.grenades_remaining -= 1;
        world_setup::spawn_grenade(
            &mut self.world,
            &mut self.next_spawn_order,
            &self.state.camera,
        );
        self.events.push(SimEvent::GrenadeThrown);
        log::debug!(
            "grenade thrown, {} left",
            self.state.match_state.grenades_remaining
        );
        Ok(())
    }

    fn reject(&mut self, rejection: CommandRejection) {
        log::trace!("command rejected: {:?}", rejection);
        if let Some(alert) = Alert::for_rejection(rejection, self.now()) {
            self.raise(alert);
        }
    }

    fn raise(&mut self, alert: Alert) {
        self.state.alerts.push(alert);
    }

    fn now(&self) -> f64 {
        self.state.time.elapsed_ms
    }

    /// Replace the world contents with round `index`'s targets.
    /// Ammo and reserve carry over.
    fn start_round(&mut self, index: usize) {
        world_setup::clear_world(&mut self.world);
        world_setup::spawn_round_targets(
            &mut self.world,
            &mut self.rng,
            &self.config.rounds[index],
            index,
        );
        self.state.camera.reset_orientation();
        self.state.match_state.begin_round(index);
        self.state.mover = systems::target_motion::run(
            &mut self.world,
            self.state.camera.position,
            self.state.time.elapsed_secs(),
        );

        self.events.push(SimEvent::RoundStarted { round: index });
        self.raise(Alert::info(
            format!("Round {} start!", index + 1),
            self.now(),
            ALERT_ROUND_START_MS,
        ));
        log::info!(
            "round {}/{} started with {} targets",
            index + 1,
            self.config.rounds_total(),
            self.config.rounds[index].distances.len()
        );
    }

    fn end_round(&mut self, reason: RoundEndReason) {
        let Some((round, points)) = self
            .state
            .match_state
            .finish_round(self.config.rounds_total())
        else {
            return;
        };
        self.state.mover = None;

        self.events.push(SimEvent::RoundEnded {
            round,
            points,
            reason,
        });
        self.raise(Alert::info(
            format!("Round {} complete: +{}", round + 1, points),
            self.now(),
            ALERT_ROUND_END_MS,
        ));
        log::info!("round {} ended ({:?}): +{}", round + 1, reason, points);

        if self.state.match_state.phase == MatchPhase::Finished {
            let score = self.state.match_state.score;
            let hits = self.state.match_state.hits;
            self.events.push(SimEvent::MatchFinished { score, hits });
            self.raise(Alert::info(
                format!("Match over! Final score: {}", score),
                self.now(),
                ALERT_MATCH_OVER_MS,
            ));
            log::info!("match finished: score {} with {} hits", score, hits);
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self, dt_ms: f64) {
        if let Some(round) = self.state.match_state.round.as_mut() {
            round.elapsed_ms += dt_ms;
        }

        // 1. Movement
        let intent = self.state.move_intent;
        if !intent.is_idle() {
            let speed = self.config.move_speed * MOVE_SPEED_SCALE * frame_scale(dt_ms);
            self.state.camera.apply_move_delta(
                f64::from(intent.forward),
                f64::from(intent.strafe),
                speed,
            );
        }
        // 2. Weapon timers and shot spawning
        let updates = self.state.armory.advance(dt_ms);
        for (kind, update) in updates {
            self.apply_weapon_update(kind, update);
        }
        world_setup::enforce_bullet_cap(&mut self.world, self.config.max_bullets);
        // 3. Target sway
        self.state.mover = systems::target_motion::run(
            &mut self.world,
            self.state.camera.position,
            self.state.time.elapsed_secs(),
        );
        // 4. Projectile integration
        systems::ballistics::run(&mut self.world, dt_ms);
        // 5. Collision (grenades, then bullets)
        let now_ms = self.now();
        systems::collision::run(
            &mut self.world,
            &mut CollisionOutput {
                score: &mut self.state.match_state,
                events: &mut self.events,
                alerts: &mut self.state.alerts,
                shake: &mut self.state.shake,
                now_ms,
            },
        );
        // 6. Cleanup
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
        // 7. Round end
        self.check_round_end();
    }

    fn apply_weapon_update(&mut self, kind: WeaponKind, update: WeaponUpdate) {
        if update.shots > 0 {
            let profile = self.state.armory.profile(kind).clone();
            let camera = self.state.camera;
            for _ in 0..update.shots {
                for velocity in
                    spread::pellet_velocities(&profile, camera.yaw, camera.pitch, &mut self.rng)
                {
                    world_setup::spawn_bullet(
                        &mut self.world,
                        &mut self.next_spawn_order,
                        &camera,
                        velocity,
                    );
                }
                self.events.push(SimEvent::ShotFired {
                    kind,
                    pellets: profile.pellets,
                });
            }
        }
        if let Some(loaded) = update.reload_completed {
            self.events.push(SimEvent::ReloadCompleted { kind, loaded });
        }
    }

    fn check_round_end(&mut self) {
        let alive = self
            .world
            .query::<&Target>()
            .iter()
            .filter(|(_, t)| t.alive)
            .count();
        let expired = self
            .state
            .match_state
            .round
            .as_ref()
            .is_some_and(|r| r.elapsed_ms >= self.config.round_duration_ms);

        if alive == 0 {
            self.end_round(RoundEndReason::Cleared);
        } else if expired {
            self.end_round(RoundEndReason::TimeExpired);
        }
    }

    fn decay_shake(&mut self, dt_ms: f64) {
        let shake = &mut self.state.shake;
        if shake.remaining_ms > 0.0 {
            shake.remaining_ms = (shake.remaining_ms - dt_ms).max(0.0);
            if shake.remaining_ms == 0.0 {
                shake.strength = 0.0;
            }
        }
    }

    fn expire_alerts(&mut self) {
        let now = self.now();
        self.state
            .alerts
            .retain(|alert| now < alert.at_ms + alert.duration_ms);
    }

    fn build_snapshot(&mut self) -> GameStateSnapshot {
        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &SnapshotInputs {
                time: self.state.time,
                camera: &self.state.camera,
                shake: self.state.shake,
                armory: &self.state.armory,
                match_state: &self.state.match_state,
                config: &self.config,
                mover: self.state.mover,
                alerts: &self.state.alerts,
            },
            events,
        )
    }
}
