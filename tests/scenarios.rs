use glam::Vec2;

use tank_hops::consts::*;
use tank_hops::sim::combat::{self, Effect};
use tank_hops::sim::physics::{self, Contact};
use tank_hops::sim::{
    Category, Entity, EntityKind, GameEvent, GamePhase, GameState, Lifetime, PointerEvent,
    PointerMode, TickInput, tick,
};
use tank_hops::{GameConfig, Variant};

/// Default game with spawning switched off so scenarios place every entity
fn quiet_game() -> GameState {
    let config = GameConfig {
        max_enemies: 0,
        pickup_cadence: None,
        ..GameConfig::default()
    };
    GameState::new(config)
}

fn run(state: &mut GameState, ticks: usize) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        tick(state, &TickInput::default(), SIM_DT);
        events.extend(state.drain_events());
    }
    events
}

fn descending_enemy(state: &mut GameState, x: f32, remaining: f32) -> tank_hops::sim::EntityId {
    let field = state.field();
    let start = Vec2::new(x, field.y + ENEMY_SPAWN_ABOVE);
    let vel = Vec2::new(0.0, (ENEMY_EXIT_Y - start.y) / ENEMY_DESCENT_DURATION);
    state.registry.add(|id| {
        Entity::new(id, EntityKind::EnemyTank { fire_cooldown: None }, start)
            .with_velocity(vel)
            .with_lifetime(Lifetime::Descent(remaining))
    })
}

#[test]
fn restart_resets_session_and_clears_entities() {
    let mut state = quiet_game();
    for i in 0..4 {
        state.registry.spawn(
            EntityKind::EnemyTank { fire_cooldown: None },
            Vec2::new(60.0 + i as f32 * 80.0, 700.0),
        );
    }
    state
        .registry
        .spawn(EntityKind::PlayerProjectile, Vec2::new(100.0, 400.0));
    state
        .registry
        .spawn(EntityKind::EnemyProjectile, Vec2::new(300.0, 400.0));
    state.session.score = 7;
    state.session.lives = 0;
    state.session.health = 0;
    state.registry.get_mut(state.player).unwrap().pos = Vec2::new(50.0, 80.0);

    // Terminal check moves the session to GameOver
    tick(&mut state, &TickInput::default(), SIM_DT);
    assert_eq!(state.phase, GamePhase::GameOver);

    // Tap the restart control, then the next tick performs the reset
    let button = state.restart_button().center;
    tick(
        &mut state,
        &TickInput {
            pointer: vec![PointerEvent::Down(button), PointerEvent::Up],
            ..Default::default()
        },
        SIM_DT,
    );
    assert_eq!(state.phase, GamePhase::Restarting);
    tick(&mut state, &TickInput::default(), SIM_DT);

    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.session.score, 0);
    assert_eq!(state.session.lives, 3);
    assert_eq!(state.session.health, 100);
    assert_eq!(state.registry.count(Category::Enemy), 0);
    assert_eq!(state.registry.count(Category::PlayerProjectile), 0);
    assert_eq!(state.registry.count(Category::EnemyProjectile), 0);
    assert_eq!(state.player_pos(), Some(Vec2::new(195.0, 844.0 * 0.2)));
    assert_eq!(state.removed_last_tick.len(), 6);

    // Play resumes on the following tick
    let ticks = state.time_ticks;
    tick(&mut state, &TickInput::default(), SIM_DT);
    assert_eq!(state.time_ticks, ticks + 1);
}

#[test]
fn projectile_kills_enemy_without_costing_a_life() {
    let mut state = quiet_game();
    let p = Vec2::new(120.0, 600.0);
    let shot = state.registry.spawn(EntityKind::PlayerProjectile, p);
    let enemy = state
        .registry
        .spawn(EntityKind::EnemyTank { fire_cooldown: None }, p);

    let effects = combat::resolve(&state.registry, &Contact::new(enemy, shot));
    assert_eq!(
        effects,
        vec![
            Effect::Destroy(shot),
            Effect::Destroy(enemy),
            Effect::IncrementScore(1)
        ]
    );
    assert!(
        !effects
            .iter()
            .any(|e| matches!(e, Effect::DecrementLives(_)))
    );

    let events = run(&mut state, 1);
    assert_eq!(state.session.score, 1);
    assert_eq!(state.session.lives, START_LIVES);
    assert!(state.registry.get(shot).is_none());
    assert!(state.registry.get(enemy).is_none());
    assert!(events.contains(&GameEvent::ScoreChanged(1)));
}

#[test]
fn breach_costs_exactly_one_life() {
    let mut state = quiet_game();
    // Far from the player's column so the descent never touches the tank
    let enemy = descending_enemy(&mut state, 40.0, ENEMY_DESCENT_DURATION);

    let events = run(&mut state, 450);
    assert_eq!(state.session.lives, START_LIVES - 1);
    assert!(state.registry.get(enemy).is_none());
    assert_eq!(state.registry.count(Category::Enemy), 0);

    let breaches = events
        .iter()
        .filter(|e| matches!(e, GameEvent::Breach { .. }))
        .count();
    assert_eq!(breaches, 1);
    let lives_changes: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, GameEvent::LivesChanged(_)))
        .collect();
    assert_eq!(lives_changes, vec![&GameEvent::LivesChanged(2)]);
    assert_eq!(state.phase, GamePhase::Playing);
}

#[test]
fn game_over_fires_once_when_health_and_lives_drop_together() {
    let mut state = quiet_game();
    state.session.health = ENEMY_PROJECTILE_DAMAGE;
    state.session.lives = 1;

    let tank = state.player_pos().unwrap();
    state.registry.spawn(EntityKind::EnemyProjectile, tank);
    descending_enemy(&mut state, 40.0, SIM_DT * 0.5);

    let events = run(&mut state, 30);
    assert_eq!(state.phase, GamePhase::GameOver);
    assert_eq!(state.session.health, 0);
    assert_eq!(state.session.lives, 0);
    let game_overs = events
        .iter()
        .filter(|e| matches!(e, GameEvent::GameOver))
        .count();
    assert_eq!(game_overs, 1);
}

#[test]
fn medkit_restores_full_health() {
    let mut state = quiet_game();
    state.session.health = 40;
    let tank = state.player_pos().unwrap();
    let medkit = state.registry.add(|id| {
        Entity::new(id, EntityKind::Pickup, tank + Vec2::new(10.0, 0.0))
            .with_lifetime(Lifetime::Ttl(PICKUP_VISIBLE_TIME + PICKUP_FADE_TIME))
    });

    let events = run(&mut state, 1);
    assert_eq!(state.session.health, MAX_HEALTH);
    assert!(state.registry.get(medkit).is_none());
    assert!(events.contains(&GameEvent::HealthChanged(100)));
}

#[test]
fn uncollected_medkit_expires() {
    let mut state = quiet_game();
    let medkit = state.registry.add(|id| {
        Entity::new(id, EntityKind::Pickup, Vec2::new(60.0, 700.0))
            .with_lifetime(Lifetime::Ttl(PICKUP_VISIBLE_TIME + PICKUP_FADE_TIME))
    });

    run(&mut state, 300);
    assert!(state.registry.get(medkit).is_some());
    run(&mut state, 60);
    assert!(state.registry.get(medkit).is_none());
    assert_eq!(state.session.health, MAX_HEALTH);
}

#[test]
fn pause_freezes_everything() {
    let mut state = GameState::with_seed(77);
    run(&mut state, 300);

    tick(
        &mut state,
        &TickInput {
            pause: true,
            ..Default::default()
        },
        SIM_DT,
    );
    assert!(state.snapshot().paused);
    let frozen = serde_json::to_string(&state.snapshot()).unwrap();

    // Pointer input and time do nothing while paused
    for _ in 0..120 {
        tick(
            &mut state,
            &TickInput {
                pointer: vec![PointerEvent::Down(Vec2::new(20.0, 100.0))],
                ..Default::default()
            },
            SIM_DT,
        );
    }
    assert_eq!(serde_json::to_string(&state.snapshot()).unwrap(), frozen);
}

#[test]
fn classic_variant_fires_once_per_tap() {
    let mut state = GameState::new(GameConfig {
        max_enemies: 0,
        ..GameConfig::from_preset(Variant::Classic)
    });
    let tank = state.player_pos().unwrap();

    tick(
        &mut state,
        &TickInput {
            pointer: vec![PointerEvent::Down(tank)],
            ..Default::default()
        },
        SIM_DT,
    );
    assert_eq!(state.registry.count(Category::PlayerProjectile), 1);
    state.drain_events();

    // Keep holding well past the projectile's lifetime
    let events = run(&mut state, 120);
    assert_eq!(state.registry.count(Category::PlayerProjectile), 0);
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, GameEvent::MuzzleFlash { .. }))
    );
    assert_eq!(state.registry.count(Category::Pickup), 0);
}

#[test]
fn body_collision_damages_and_explodes() {
    let mut state = quiet_game();
    let tank = state.player_pos().unwrap();
    let enemy = state.registry.spawn(
        EntityKind::EnemyTank { fire_cooldown: None },
        tank + Vec2::new(10.0, 20.0),
    );

    let events = run(&mut state, 1);
    assert_eq!(state.session.health, MAX_HEALTH - COLLISION_DAMAGE);
    assert!(state.registry.get(enemy).is_none());
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::Explosion {
            size: combat::ExplosionSize::Large,
            ..
        }
    )));
    // No life lost for a body hit
    assert_eq!(state.session.lives, START_LIVES);
}

#[test]
fn contacts_reported_once_per_pair() {
    let mut state = quiet_game();
    let p = Vec2::new(200.0, 600.0);
    for _ in 0..3 {
        state
            .registry
            .spawn(EntityKind::EnemyTank { fire_cooldown: None }, p);
    }
    let contacts = physics::detect_contacts(&state.registry);
    // Enemy-enemy overlaps are still geometric contacts; no rule resolves them
    assert_eq!(contacts.len(), 3);
    for contact in &contacts {
        assert!(combat::resolve(&state.registry, contact).is_empty());
    }
}

#[test]
fn released_pointer_stays_released_across_pause() {
    let mut state = quiet_game();
    let press = |events: Vec<PointerEvent>, pause: bool| TickInput {
        pointer: events,
        pause,
        ..Default::default()
    };

    tick(&mut state, &press(vec![PointerEvent::Down(Vec2::new(40.0, 80.0))], false), SIM_DT);
    tick(&mut state, &press(vec![], true), SIM_DT);
    assert_eq!(state.phase, GamePhase::Paused);

    // Drag and release while frozen
    tick(
        &mut state,
        &press(vec![PointerEvent::Move(Vec2::new(60.0, 90.0)), PointerEvent::Up], false),
        SIM_DT,
    );
    let parked = state.player_pos();

    tick(&mut state, &press(vec![], true), SIM_DT);
    assert_eq!(state.phase, GamePhase::Playing);
    run(&mut state, 30);

    assert_eq!(state.controller.mode, PointerMode::Idle);
    assert_eq!(state.player_pos(), parked);
}
