//! Tests for the simulation engine, projectile systems, targets and match flow.

use glam::DVec3;
use hecs::World;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use rangefire_core::commands::InputEvent;
use rangefire_core::components::{Bullet, Grenade, Projectile, ScreenShake, Target};
use rangefire_core::config::{ConfigError, RoundSpec, SimConfig};
use rangefire_core::constants::*;
use rangefire_core::enums::*;
use rangefire_core::events::SimEvent;
use rangefire_core::state::GameStateSnapshot;

use crate::aim::CameraState;
use crate::engine::SimulationEngine;
use crate::match_state::MatchState;
use crate::systems::collision::CollisionOutput;
use crate::systems::{ballistics, cleanup, collision, target_motion};
use crate::world_setup;

const DT: f64 = REFERENCE_FRAME_MS;

fn engine_with(config: SimConfig) -> SimulationEngine {
    SimulationEngine::new(config).unwrap()
}

/// Fresh default engine with round 0 already started.
fn started_engine() -> (SimulationEngine, GameStateSnapshot) {
    let mut engine = engine_with(SimConfig::default());
    let snap = engine.advance(DT, &[InputEvent::AdvanceRound]);
    (engine, snap)
}

/// Point the camera straight up so nothing fired can reach a target.
fn aim_at_sky(engine: &mut SimulationEngine) {
    engine.set_test_orientation(CANONICAL_YAW, -PITCH_LIMIT);
}

fn has_event(snap: &GameStateSnapshot, pred: impl Fn(&SimEvent) -> bool) -> bool {
    snap.events.iter().any(pred)
}

fn has_alert(snap: &GameStateSnapshot, message: &str) -> bool {
    snap.alerts.iter().any(|a| a.message == message)
}

fn count_kind(snap: &GameStateSnapshot, kind: ProjectileKind) -> usize {
    snap.projectiles.iter().filter(|p| p.kind == kind).count()
}

fn scripted_inputs(tick: usize) -> Vec<InputEvent> {
    match tick {
        0 => vec![InputEvent::AdvanceRound],
        5 => vec![InputEvent::LookDelta { dx: 40.0, dy: 12.0 }],
        10 => vec![InputEvent::Fire],
        40 => vec![InputEvent::SelectWeapon {
            kind: WeaponKind::Shotgun,
        }],
        45 => vec![
            InputEvent::LookDelta { dx: -80.0, dy: 0.0 },
            InputEvent::Fire,
        ],
        60 => vec![InputEvent::MoveIntent {
            forward: 1,
            strafe: -1,
        }],
        80 => vec![InputEvent::ThrowGrenade, InputEvent::Reload],
        120 => vec![InputEvent::MoveIntent {
            forward: 0,
            strafe: 0,
        }],
        _ => Vec::new(),
    }
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let config = SimConfig {
        seed: 12345,
        ..Default::default()
    };
    let mut engine_a = engine_with(config.clone());
    let mut engine_b = engine_with(config);

    for tick in 0..400 {
        let inputs = scripted_inputs(tick);
        let snap_a = engine_a.advance(DT, &inputs);
        let snap_b = engine_b.advance(DT, &inputs);

        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed at tick {tick}");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = engine_with(SimConfig {
        seed: 111,
        ..Default::default()
    });
    let mut engine_b = engine_with(SimConfig {
        seed: 222,
        ..Default::default()
    });

    // Target placement draws from the RNG, so the very first round differs.
    let snap_a = engine_a.advance(DT, &[InputEvent::AdvanceRound]);
    let snap_b = engine_b.advance(DT, &[InputEvent::AdvanceRound]);
    let json_a = serde_json::to_string(&snap_a.targets).unwrap();
    let json_b = serde_json::to_string(&snap_b.targets).unwrap();
    assert_ne!(json_a, json_b, "Different seeds should place targets differently");
}

#[test]
fn test_zero_dt_tick_changes_nothing() {
    let mut engine = engine_with(SimConfig::default());

    for tick in 0..300 {
        let mut snap = engine.advance(DT, &scripted_inputs(tick));
        let state_before = serde_json::to_string(engine.state()).unwrap();

        let idle = engine.advance(0.0, &[]);
        assert!(idle.events.is_empty(), "zero tick produced events at {tick}");

        let state_after = serde_json::to_string(engine.state()).unwrap();
        assert_eq!(state_before, state_after, "engine state moved at tick {tick}");

        snap.events.clear();
        assert_eq!(
            serde_json::to_string(&snap).unwrap(),
            serde_json::to_string(&idle).unwrap(),
            "snapshot moved at tick {tick}"
        );
    }
}

// ---- Construction ----

#[test]
fn test_invalid_config_rejected_at_construction() {
    let result = SimulationEngine::new(SimConfig {
        max_bullets: 0,
        ..Default::default()
    });
    assert!(matches!(result, Err(ConfigError::InvalidMaxBullets)));

    let result = SimulationEngine::new(SimConfig {
        rounds: Vec::new(),
        ..Default::default()
    });
    assert!(matches!(result, Err(ConfigError::NoRounds)));
}

#[test]
fn test_initial_snapshot_before_first_round() {
    let mut engine = engine_with(SimConfig::default());
    let snap = engine.advance(DT, &[]);

    assert_eq!(snap.phase, MatchPhase::NotStarted);
    assert!(snap.targets.is_empty());
    assert_eq!(snap.score.round, None);
    assert_eq!(snap.score.rounds_total, 4);
    assert_eq!(snap.weapons.weapons.len(), 2);
    assert_eq!(snap.weapons.weapons[0].ammo, 12);
    assert_eq!(snap.weapons.weapons[1].ammo, 5);
    assert_eq!(snap.weapons.grenades_remaining, 1);
    assert_eq!(snap.camera.position, DVec3::new(0.0, 100.0, 150.0));
    assert!((snap.camera.forward - DVec3::new(0.0, -1.0, 0.0)).length() < 1e-12);
}

// ---- Camera ----

#[test]
fn test_pitch_stays_clamped() {
    let mut camera = CameraState::default();
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    for _ in 0..2000 {
        let dx = rng.gen_range(-500.0..500.0);
        let dy = rng.gen_range(-2000.0..2000.0);
        camera.apply_look_delta(dx, dy, MOUSE_SENSITIVITY);
        assert!(camera.pitch.abs() <= PITCH_LIMIT);
    }

    camera.apply_look_delta(0.0, -1.0e6, MOUSE_SENSITIVITY);
    assert_eq!(camera.pitch, PITCH_LIMIT);
    assert!(camera.forward().z < 0.0, "positive pitch looks down");
}

#[test]
fn test_move_intent_is_held_and_horizontal() {
    let (mut engine, _) = started_engine();
    let start = engine.state().camera.position;

    engine.advance(
        DT,
        &[InputEvent::MoveIntent {
            forward: 1,
            strafe: 0,
        }],
    );
    for _ in 0..9 {
        engine.advance(DT, &[]);
    }

    let pos = engine.state().camera.position;
    let step = MOVE_SPEED * MOVE_SPEED_SCALE;
    assert!((pos.y - (start.y - 10.0 * step)).abs() < 1e-9);
    assert!((pos.x - start.x).abs() < 1e-9);
    assert_eq!(pos.z, start.z);
}

#[test]
fn test_look_delta_applies_outside_round() {
    let mut engine = engine_with(SimConfig::default());
    engine.advance(DT, &[InputEvent::LookDelta { dx: 100.0, dy: 0.0 }]);
    let yaw = engine.state().camera.yaw;
    assert!((yaw - (CANONICAL_YAW + 100.0 * MOUSE_SENSITIVITY)).abs() < 1e-12);
}

#[test]
fn test_camera_orientation_resets_each_round() {
    let mut engine = engine_with(SimConfig {
        round_duration_ms: 1000.0,
        ..Default::default()
    });
    engine.advance(DT, &[InputEvent::AdvanceRound]);
    engine.advance(DT, &[InputEvent::LookDelta { dx: 300.0, dy: 200.0 }]);
    let snap = engine.advance(1000.0, &[]);
    assert_eq!(snap.phase, MatchPhase::BetweenRounds);
    assert_ne!(engine.state().camera.yaw, CANONICAL_YAW);

    engine.advance(DT, &[InputEvent::AdvanceRound]);
    assert_eq!(engine.state().camera.yaw, CANONICAL_YAW);
    assert_eq!(engine.state().camera.pitch, CANONICAL_PITCH);
}

// ---- Targets ----

#[test]
fn test_round_targets_layout() {
    let mut world = World::new();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let batch = RoundSpec {
        distances: vec![500.0, 800.0, 1100.0],
    };
    world_setup::spawn_round_targets(&mut world, &mut rng, &batch, 0);

    let mut targets: Vec<Target> = world
        .query::<&Target>()
        .iter()
        .map(|(_, t)| t.clone())
        .collect();
    targets.sort_by_key(|t| t.slot);
    assert_eq!(targets.len(), 3);

    for (target, &distance) in targets.iter().zip(&batch.distances) {
        let side = if target.slot % 2 == 0 { -1.0 } else { 1.0 };
        assert!(target.position.x * side >= 50.0 && target.position.x * side <= 350.0);
        assert!((target.position.y + distance).abs() <= TARGET_DEPTH_JITTER);
        assert!(target.position.z >= TARGET_HEIGHT_MIN && target.position.z <= TARGET_HEIGHT_MAX);
        assert!(target.alive);
    }

    assert_eq!(targets[0].radius, 60.0);
    assert_eq!(targets[0].points, 20);
    assert!((targets[2].radius - (60.0 - 600.0 * 32.0 / 2300.0)).abs() < 1e-9);
    assert_eq!(targets[2].points, 46);
}

#[test]
fn test_far_round_is_wider_and_worth_more() {
    let mut world = World::new();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let batch = RoundSpec {
        distances: vec![2800.0],
    };
    world_setup::spawn_round_targets(&mut world, &mut rng, &batch, 3);

    let target = world.query::<&Target>().iter().map(|(_, t)| t.clone()).next().unwrap();
    assert_eq!(target.radius, 28.0);
    assert_eq!(target.points, 120);
    // Round 3 lateral offset is 200 + 3 * 40.
    assert!(-target.position.x >= 320.0 - 150.0 && -target.position.x <= 320.0 + 150.0);
}

#[test]
fn test_only_nearest_target_sways() {
    let mut world = World::new();
    let near = world_setup::spawn_target(&mut world, 0, DVec3::new(-100.0, -500.0, 50.0), 0.0, 500.0);
    let far = world_setup::spawn_target(&mut world, 1, DVec3::new(100.0, -900.0, 50.0), 0.0, 900.0);
    let camera = DVec3::new(0.0, 100.0, 150.0);

    let mover = target_motion::run(&mut world, camera, std::f64::consts::FRAC_PI_2);
    assert_eq!(mover, Some(0));
    assert!((world.get::<&Target>(near).unwrap().position.x - (-100.0 + 60.0)).abs() < 1e-9);
    assert_eq!(world.get::<&Target>(far).unwrap().position.x, 100.0);

    // Once the near target dies the far one takes over.
    world.get::<&mut Target>(near).unwrap().alive = false;
    let mover = target_motion::run(&mut world, camera, std::f64::consts::FRAC_PI_2);
    assert_eq!(mover, Some(1));
    assert!((world.get::<&Target>(far).unwrap().position.x - 160.0).abs() < 1e-9);
}

#[test]
fn test_nearest_tie_goes_to_lower_slot() {
    let mut world = World::new();
    world_setup::spawn_target(&mut world, 1, DVec3::new(100.0, -500.0, 50.0), 0.0, 500.0);
    world_setup::spawn_target(&mut world, 0, DVec3::new(-100.0, -500.0, 50.0), 0.0, 500.0);
    let mover = target_motion::nearest_slot(&world, DVec3::new(0.0, 100.0, 50.0));
    assert_eq!(mover, Some(0));
}

#[test]
fn test_nearest_uses_swayed_position() {
    let mut world = World::new();
    let swayed = world_setup::spawn_target(&mut world, 0, DVec3::new(0.0, -300.0, 150.0), 0.0, 500.0);
    world_setup::spawn_target(&mut world, 1, DVec3::new(40.0, -300.0, 150.0), 0.0, 500.0);
    let camera = DVec3::new(0.0, 100.0, 150.0);
    assert_eq!(target_motion::nearest_slot(&world, camera), Some(0));

    // Sway carried slot 0 further out than slot 1, though its anchor is nearer.
    world.get::<&mut Target>(swayed).unwrap().position.x = 80.0;
    assert_eq!(target_motion::nearest_slot(&world, camera), Some(1));
}

#[test]
fn test_first_snapshot_already_sways() {
    let (_, snap) = started_engine();
    let swaying: Vec<_> = snap.targets.iter().filter(|t| t.oscillating).collect();
    assert_eq!(swaying.len(), 1, "exactly one target sways");
    assert_eq!(swaying[0].slot, 0, "the 500-unit target is nearest");
}

// ---- Projectiles ----

#[test]
fn test_bullet_gravity_closed_form() {
    let mut world = World::new();
    let mut order = 0;
    let z0 = 150.0;
    world_setup::spawn_projectile(
        &mut world,
        &mut order,
        Projectile::Bullet(Bullet {
            position: DVec3::new(0.0, 0.0, z0),
            velocity: DVec3::ZERO,
            radius: BULLET_RADIUS,
            travel: 0.0,
            max_travel: BULLET_MAX_TRAVEL,
            gravity: true,
            hit: false,
        }),
    );

    let dt = 10.0;
    let s = dt / REFERENCE_FRAME_MS;
    for n in 1..=60 {
        ballistics::run(&mut world, dt);
        let (_, projectile) = world.query_mut::<&Projectile>().into_iter().next().unwrap();
        let Projectile::Bullet(bullet) = projectile else {
            panic!("expected a bullet");
        };
        let nf = n as f64;
        let expected_vz = nf * BULLET_GRAVITY * s;
        let expected_z = z0 + BULLET_GRAVITY * s * s * nf * (nf + 1.0) / 2.0;
        assert!((bullet.velocity.z - expected_vz).abs() < 1e-9);
        assert!((bullet.position.z - expected_z).abs() < 1e-9);
        assert_eq!(bullet.position.x, 0.0);
        assert_eq!(bullet.position.y, 0.0);
    }
}

#[test]
fn test_bullet_expires_after_max_travel() {
    let mut world = World::new();
    let mut order = 0;
    world_setup::spawn_projectile(
        &mut world,
        &mut order,
        Projectile::Bullet(Bullet {
            position: DVec3::ZERO,
            velocity: DVec3::new(0.0, -100.0, 0.0),
            radius: BULLET_RADIUS,
            travel: 0.0,
            max_travel: BULLET_MAX_TRAVEL,
            gravity: false,
            hit: false,
        }),
    );
    let mut buffer = Vec::new();

    // 100 frames reach exactly the bound, which is still in flight.
    for _ in 0..100 {
        ballistics::run(&mut world, REFERENCE_FRAME_MS);
        cleanup::run(&mut world, &mut buffer);
    }
    assert_eq!(world.len(), 1);

    ballistics::run(&mut world, REFERENCE_FRAME_MS);
    cleanup::run(&mut world, &mut buffer);
    assert_eq!(world.len(), 0, "bullet past max travel should be removed");
}

fn collide(world: &mut World, score: &mut MatchState) -> (Vec<SimEvent>, ScreenShake) {
    let mut events = Vec::new();
    let mut alerts = Vec::new();
    let mut shake = ScreenShake::default();
    collision::run(
        world,
        &mut CollisionOutput {
            score,
            events: &mut events,
            alerts: &mut alerts,
            shake: &mut shake,
            now_ms: 0.0,
        },
    );
    (events, shake)
}

fn resting_grenade(position: DVec3) -> Projectile {
    Projectile::Grenade(Grenade {
        position,
        velocity: DVec3::ZERO,
        age_ms: 0.0,
        exploded: false,
        explosion_elapsed_ms: 0.0,
        explosion_position: None,
    })
}

#[test]
fn test_grenade_fuse_detonates_exactly_at_timeout() {
    let mut world = World::new();
    let mut order = 0;
    let grenade = world_setup::spawn_projectile(
        &mut world,
        &mut order,
        resting_grenade(DVec3::new(0.0, 0.0, 100_000.0)),
    );
    let mut score = MatchState::new(1);

    for tick in 1..=18 {
        ballistics::run(&mut world, 100.0);
        let (events, shake) = collide(&mut world, &mut score);
        let exploded = matches!(
            *world.get::<&Projectile>(grenade).unwrap(),
            Projectile::Grenade(Grenade { exploded: true, .. })
        );
        if tick < 18 {
            assert!(!exploded, "grenade exploded early at tick {tick}");
        } else {
            assert!(exploded, "grenade should explode at 1800ms");
            assert!(events.contains(&SimEvent::GrenadeExploded {
                center: match &*world.get::<&Projectile>(grenade).unwrap() {
                    Projectile::Grenade(g) => g.explosion_position.unwrap(),
                    Projectile::Bullet(_) => unreachable!(),
                },
                kills: 0,
            }));
            assert_eq!(shake.remaining_ms, SHAKE_DURATION_MS);
            assert_eq!(shake.strength, SHAKE_STRENGTH);
        }
    }
    assert_eq!(score.score, 0);
}

#[test]
fn test_grenade_blast_kills_two_targets_same_tick() {
    let mut world = World::new();
    let a = world_setup::spawn_target(&mut world, 0, DVec3::new(0.0, -500.0, 50.0), 0.0, 500.0);
    let b = world_setup::spawn_target(&mut world, 1, DVec3::new(150.0, -500.0, 50.0), 0.0, 800.0);
    let c = world_setup::spawn_target(&mut world, 2, DVec3::new(0.0, -1500.0, 50.0), 0.0, 1100.0);
    let mut order = 0;
    world_setup::spawn_projectile(&mut world, &mut order, resting_grenade(DVec3::new(0.0, -500.0, 50.0)));
    let mut score = MatchState::new(1);

    ballistics::run(&mut world, DT);
    let (events, _) = collide(&mut world, &mut score);

    assert!(!world.get::<&Target>(a).unwrap().alive);
    assert!(!world.get::<&Target>(b).unwrap().alive);
    assert!(world.get::<&Target>(c).unwrap().alive, "target outside the blast survives");
    assert_eq!(score.hits, 2);
    assert_eq!(score.score, 20 + 33);

    let destroyed: Vec<usize> = events
        .iter()
        .filter_map(|e| match e {
            SimEvent::TargetDestroyed {
                slot,
                by: ProjectileKind::Grenade,
                ..
            } => Some(*slot),
            _ => None,
        })
        .collect();
    assert_eq!(destroyed, vec![0, 1]);
    assert!(events
        .iter()
        .any(|e| matches!(e, SimEvent::GrenadeExploded { kills: 2, .. })));
}

#[test]
fn test_bullet_hits_at_most_one_target() {
    let mut world = World::new();
    // Two overlapping targets; the lower slot takes the hit.
    let a = world_setup::spawn_target(&mut world, 0, DVec3::new(0.0, -500.0, 50.0), 0.0, 500.0);
    let b = world_setup::spawn_target(&mut world, 1, DVec3::new(10.0, -500.0, 50.0), 0.0, 500.0);
    let mut order = 0;
    world_setup::spawn_projectile(
        &mut world,
        &mut order,
        Projectile::Bullet(Bullet {
            position: DVec3::new(5.0, -500.0, 50.0),
            velocity: DVec3::ZERO,
            radius: BULLET_RADIUS,
            travel: 0.0,
            max_travel: BULLET_MAX_TRAVEL,
            gravity: false,
            hit: false,
        }),
    );
    let mut score = MatchState::new(1);
    let (events, _) = collide(&mut world, &mut score);

    assert!(!world.get::<&Target>(a).unwrap().alive);
    assert!(world.get::<&Target>(b).unwrap().alive);
    assert_eq!(score.hits, 1);
    assert_eq!(events.len(), 1);
}

#[test]
fn test_bullet_cap_drops_oldest() {
    let mut engine = engine_with(SimConfig {
        max_bullets: 5,
        ..Default::default()
    });
    engine.advance(DT, &[InputEvent::AdvanceRound]);
    aim_at_sky(&mut engine);
    engine.advance(
        DT,
        &[
            InputEvent::SelectWeapon {
                kind: WeaponKind::Shotgun,
            },
            InputEvent::Fire,
        ],
    );

    let mut snap = engine.advance(DT, &[]);
    for _ in 0..30 {
        assert!(count_kind(&snap, ProjectileKind::Bullet) <= 5);
        snap = engine.advance(DT, &[]);
    }

    // Three shots of five pellets; only the last shot's pellets remain.
    let ids: Vec<u64> = snap.projectiles.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![10, 11, 12, 13, 14]);
}

// ---- Weapons through the engine ----

#[test]
fn test_aimed_burst_destroys_nearest_target() {
    let (mut engine, snap) = started_engine();
    let nearest = snap.targets.iter().find(|t| t.oscillating).unwrap().clone();
    let offset = nearest.position - engine.state().camera.position;
    let yaw = offset.y.atan2(offset.x);
    let pitch = -(offset.z / offset.length()).asin();
    engine.set_test_orientation(yaw, pitch);

    let mut snap = engine.advance(DT, &[InputEvent::Fire]);
    let mut destroyed = None;
    for _ in 0..120 {
        if let Some(SimEvent::TargetDestroyed { slot, points, .. }) = snap
            .events
            .iter()
            .find(|e| matches!(e, SimEvent::TargetDestroyed { .. }))
        {
            destroyed = Some((*slot, *points));
            break;
        }
        snap = engine.advance(DT, &[]);
    }

    let (slot, points) = destroyed.expect("burst should hit the nearest target");
    assert_eq!(slot, nearest.slot);
    assert_eq!(points, nearest.points);
    assert!(snap.score.score >= nearest.points);
    assert!(has_alert(&snap, &format!("Target hit! +{}", nearest.points)));
}

#[test]
fn test_round_zero_clear_scores_delta() {
    let (mut engine, snap) = started_engine();
    assert_eq!(snap.phase, MatchPhase::InRound);
    assert_eq!(snap.score.round, Some(0));

    // One bullet on the nearest target.
    let nearest = snap.targets.iter().find(|t| t.oscillating).unwrap().clone();
    engine.spawn_test_bullet(nearest.position, DVec3::ZERO, false);
    let snap = engine.advance(DT, &[]);
    assert!(has_event(&snap, |e| matches!(
        e,
        SimEvent::TargetDestroyed { slot, by: ProjectileKind::Bullet, .. } if *slot == nearest.slot
    )));
    assert_eq!(snap.score.score, nearest.points);
    assert_eq!(snap.score.hits, 1);
    assert_eq!(snap.phase, MatchPhase::InRound);

    // Then the rest.
    let remaining: Vec<_> = snap.targets.iter().filter(|t| t.alive).cloned().collect();
    assert_eq!(remaining.len(), 2);
    for target in &remaining {
        engine.spawn_test_bullet(target.position, DVec3::ZERO, false);
    }
    let snap = engine.advance(DT, &[]);

    let total: u32 = nearest.points + remaining.iter().map(|t| t.points).sum::<u32>();
    assert_eq!(snap.phase, MatchPhase::BetweenRounds);
    assert_eq!(snap.score.score, total);
    assert_eq!(snap.score.hits, 3);
    assert_eq!(snap.score.round_scores, vec![total]);
    assert_eq!(snap.score.targets_alive, 0);
    assert!(has_event(&snap, |e| *e
        == SimEvent::RoundEnded {
            round: 0,
            points: total,
            reason: RoundEndReason::Cleared,
        }));
    assert!(has_alert(&snap, &format!("Round 1 complete: +{total}")));
}

#[test]
fn test_empty_magazine_fires_nothing() {
    let (mut engine, _) = started_engine();
    aim_at_sky(&mut engine);

    // Four bursts empty the pistol.
    let mut shots = 0;
    for _ in 0..4 {
        let snap = engine.advance(DT, &[InputEvent::Fire]);
        shots += snap.events.iter().filter(|e| matches!(e, SimEvent::ShotFired { .. })).count();
        for _ in 0..20 {
            let snap = engine.advance(DT, &[]);
            shots += snap.events.iter().filter(|e| matches!(e, SimEvent::ShotFired { .. })).count();
        }
    }
    assert_eq!(shots, 12);
    assert_eq!(engine.state().armory.state(WeaponKind::Pistol).ammo, 0);

    let snap = engine.advance(DT, &[InputEvent::Fire]);
    assert!(!has_event(&snap, |e| matches!(e, SimEvent::ShotFired { .. })));
    assert!(has_alert(&snap, "Out of ammo! Press R to reload."));
    assert_eq!(engine.state().armory.state(WeaponKind::Pistol).ammo, 0);
    assert_eq!(
        engine.state().armory.state(WeaponKind::Pistol).phase,
        WeaponPhase::Ready
    );
}

#[test]
fn test_reload_through_engine() {
    let (mut engine, _) = started_engine();
    aim_at_sky(&mut engine);

    let snap = engine.advance(DT, &[InputEvent::Reload]);
    assert!(has_alert(&snap, "Magazine full."));

    engine.advance(DT, &[InputEvent::Fire]);
    for _ in 0..20 {
        engine.advance(DT, &[]);
    }
    let snap = engine.advance(DT, &[InputEvent::Reload]);
    assert!(has_event(&snap, |e| *e
        == SimEvent::ReloadStarted {
            kind: WeaponKind::Pistol
        }));
    assert!(has_alert(&snap, "Reloading..."));
    assert_eq!(snap.weapons.weapons[0].phase, WeaponPhase::Reloading);

    let mut completed = None;
    for _ in 0..100 {
        let snap = engine.advance(DT, &[]);
        if let Some(SimEvent::ReloadCompleted { loaded, .. }) = snap
            .events
            .iter()
            .find(|e| matches!(e, SimEvent::ReloadCompleted { .. }))
        {
            completed = Some(*loaded);
            break;
        }
    }
    assert_eq!(completed, Some(3));
    let pistol = engine.state().armory.state(WeaponKind::Pistol);
    assert_eq!((pistol.ammo, pistol.reserve), (12, 57));
}

#[test]
fn test_commands_outside_round_are_silent() {
    let mut engine = engine_with(SimConfig::default());
    let snap = engine.advance(
        DT,
        &[
            InputEvent::Fire,
            InputEvent::Reload,
            InputEvent::ThrowGrenade,
        ],
    );
    assert!(snap.alerts.is_empty());
    assert!(snap.events.is_empty());
    assert!(snap.projectiles.is_empty());
    assert_eq!(snap.weapons.grenades_remaining, 1);
}

// ---- Grenades through the engine ----

#[test]
fn test_grenade_supply_runs_out() {
    let (mut engine, _) = started_engine();
    aim_at_sky(&mut engine);

    let snap = engine.advance(DT, &[InputEvent::ThrowGrenade]);
    assert!(has_event(&snap, |e| *e == SimEvent::GrenadeThrown));
    assert_eq!(snap.weapons.grenades_remaining, 0);
    assert_eq!(count_kind(&snap, ProjectileKind::Grenade), 1);

    let snap = engine.advance(DT, &[InputEvent::ThrowGrenade]);
    assert!(!has_event(&snap, |e| *e == SimEvent::GrenadeThrown));
    assert!(has_alert(&snap, "Grenades over."));
    assert_eq!(count_kind(&snap, ProjectileKind::Grenade), 1);
}

#[test]
fn test_exploded_grenade_lingers_then_clears() {
    let (mut engine, _) = started_engine();
    aim_at_sky(&mut engine);
    let mut snap = engine.advance(DT, &[InputEvent::ThrowGrenade]);

    let mut ticks = 1;
    while !has_event(&snap, |e| matches!(e, SimEvent::GrenadeExploded { .. })) {
        snap = engine.advance(DT, &[]);
        ticks += 1;
        assert!(ticks < 200, "grenade never detonated");
    }
    assert!(has_alert(&snap, "Boom! grenade exploded"));
    assert_eq!(snap.camera.shake.remaining_ms, SHAKE_DURATION_MS);
    let grenade = &snap.projectiles[0];
    assert!(grenade.exploded);
    assert!(grenade.explosion_position.is_some());

    // Visible for 500ms, then gone.
    let mut linger = 0.0;
    while count_kind(&snap, ProjectileKind::Grenade) == 1 {
        snap = engine.advance(DT, &[]);
        linger += DT;
        assert!(linger < 1000.0, "exploded grenade never cleared");
    }
    assert!(linger >= EXPLOSION_VISIBLE_MS);
    assert_eq!(snap.camera.shake, ScreenShake::default());
}

// ---- Match flow ----

#[test]
fn test_four_round_timeout_match() {
    let mut engine = engine_with(SimConfig::default());

    for round in 0..4 {
        let snap = engine.advance(1000.0, &[InputEvent::AdvanceRound]);
        assert_eq!(snap.phase, MatchPhase::InRound);
        assert_eq!(snap.score.round, Some(round));
        assert!(has_event(&snap, |e| *e == SimEvent::RoundStarted { round }));

        for tick in 2..=44 {
            let snap = engine.advance(1000.0, &[]);
            assert_eq!(snap.phase, MatchPhase::InRound, "round {round} ended early at tick {tick}");
        }

        let snap = engine.advance(1000.0, &[]);
        assert_eq!(snap.score.round_elapsed_ms, 45_000.0);
        assert_eq!(snap.score.round_remaining_ms, 0.0);
        assert!(has_event(&snap, |e| *e
            == SimEvent::RoundEnded {
                round,
                points: 0,
                reason: RoundEndReason::TimeExpired,
            }));
        if round < 3 {
            assert_eq!(snap.phase, MatchPhase::BetweenRounds);
        } else {
            assert_eq!(snap.phase, MatchPhase::Finished);
            assert!(has_event(&snap, |e| *e
                == SimEvent::MatchFinished { score: 0, hits: 0 }));
        }
    }

    assert_eq!(engine.state().match_state.round_scores, vec![0, 0, 0, 0]);
}

#[test]
fn test_world_frozen_between_rounds() {
    let mut engine = engine_with(SimConfig {
        round_duration_ms: 500.0,
        ..Default::default()
    });
    engine.advance(DT, &[InputEvent::AdvanceRound]);
    aim_at_sky(&mut engine);
    engine.advance(DT, &[InputEvent::Fire]);
    let mut snap = engine.advance(DT, &[]);
    while snap.phase == MatchPhase::InRound {
        snap = engine.advance(DT, &[]);
    }

    let frozen = serde_json::to_string(&(&snap.projectiles, &snap.targets, &snap.weapons)).unwrap();
    for _ in 0..30 {
        snap = engine.advance(DT, &[]);
    }
    let later = serde_json::to_string(&(&snap.projectiles, &snap.targets, &snap.weapons)).unwrap();
    assert_eq!(frozen, later);
}

#[test]
fn test_ammo_carries_across_rounds() {
    let mut engine = engine_with(SimConfig {
        round_duration_ms: 1000.0,
        ..Default::default()
    });
    engine.advance(DT, &[InputEvent::AdvanceRound]);
    aim_at_sky(&mut engine);
    engine.advance(DT, &[InputEvent::Fire]);
    let mut snap = engine.advance(DT, &[]);
    while snap.phase == MatchPhase::InRound {
        snap = engine.advance(DT, &[]);
    }
    assert_eq!(snap.weapons.weapons[0].ammo, 9);

    let snap = engine.advance(DT, &[InputEvent::AdvanceRound]);
    assert_eq!(snap.score.round, Some(1));
    assert_eq!(snap.weapons.weapons[0].ammo, 9);
    assert!(snap.projectiles.is_empty(), "new round clears projectiles");
    assert!(snap.targets.iter().all(|t| t.alive));
}

#[test]
fn test_finished_is_terminal() {
    let mut engine = engine_with(SimConfig {
        rounds: vec![RoundSpec {
            distances: vec![500.0],
        }],
        round_duration_ms: 100.0,
        ..Default::default()
    });
    engine.advance(DT, &[InputEvent::AdvanceRound]);
    let mut snap = engine.advance(DT, &[]);
    while snap.phase == MatchPhase::InRound {
        snap = engine.advance(DT, &[]);
    }
    assert_eq!(snap.phase, MatchPhase::Finished);
    assert!(has_alert(&snap, "Match over! Final score: 0"));

    let snap = engine.advance(
        DT,
        &[
            InputEvent::AdvanceRound,
            InputEvent::Fire,
            InputEvent::ThrowGrenade,
        ],
    );
    assert_eq!(snap.phase, MatchPhase::Finished);
    assert!(!has_event(&snap, |e| matches!(
        e,
        SimEvent::RoundStarted { .. } | SimEvent::GrenadeThrown | SimEvent::ShotFired { .. }
    )));
    assert_eq!(snap.score.round_scores, vec![0]);
}

#[test]
fn test_queued_events_apply_next_tick() {
    let mut engine = engine_with(SimConfig::default());
    engine.queue_event(InputEvent::AdvanceRound);
    engine.queue_events([InputEvent::SelectWeapon {
        kind: WeaponKind::Shotgun,
    }]);
    let snap = engine.advance(DT, &[]);
    assert_eq!(snap.phase, MatchPhase::InRound);
    assert_eq!(snap.weapons.selected, WeaponKind::Shotgun);
    assert!(has_event(&snap, |e| *e
        == SimEvent::WeaponSelected {
            kind: WeaponKind::Shotgun
        }));
}

#[test]
fn test_alerts_expire() {
    let (mut engine, snap) = started_engine();
    assert!(has_alert(&snap, "Round 1 start!"));

    let mut elapsed = 0.0;
    let mut snap = snap;
    while has_alert(&snap, "Round 1 start!") {
        snap = engine.advance(100.0, &[]);
        elapsed += 100.0;
        assert!(elapsed <= ALERT_ROUND_START_MS + 100.0);
    }
}
