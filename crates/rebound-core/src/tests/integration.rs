//! End-to-end match behavior through `Simulation`.

use glam::Vec2;
use proptest::prelude::*;

use crate::object::ObjectTag;
use crate::output::MatchEvent;
use crate::player::{AccountId, PlayerId};
use crate::state::MatchPhase;

use super::helpers::{
    ball, init_test_tracing, lives, paddle, place_ball, quad_config, sim, user_vs_ai_config,
    user_vs_user_config,
};

/// Aims the ball past player 0's idle paddle (parked at y 40..60) so it
/// crosses the left goal line within a few ticks.
fn aim_at_left_goal(simulation: &mut crate::simulation::Simulation) {
    place_ball(simulation, Vec2::new(5.0, 10.0), Vec2::new(-3.0, 0.0));
}

#[test]
fn missed_ball_costs_a_life_and_reserves() {
    init_test_tracing();
    let mut simulation = sim(&user_vs_user_config(), 42);
    aim_at_left_goal(&mut simulation);

    let mut all_events = Vec::new();
    for _ in 0..5 {
        simulation.step();
        all_events.extend(simulation.take_events());
    }

    assert_eq!(lives(simulation.state(), PlayerId::new(0)), 2);
    assert!(all_events.iter().any(|r| matches!(
        r.event,
        MatchEvent::LifeLost {
            player,
            lives_left: 2
        } if player == PlayerId::new(0)
    )));

    // The ball was re-served from the center.
    let (center, velocity) = ball(simulation.state());
    let arena_center = Vec2::new(50.0, 50.0);
    assert!(
        (center - arena_center).length() < 20.0,
        "ball should be back near the center, got {center}"
    );
    assert!(velocity.length() > 0.0);
}

#[test]
fn deflected_ball_does_not_score() {
    let mut simulation = sim(&user_vs_user_config(), 42);
    // Straight at the paddle's midpoint: the paddle is parked across the
    // ball's path and must save it.
    place_ball(&mut simulation, Vec2::new(6.0, 50.0), Vec2::new(-3.0, 0.0));

    for _ in 0..5 {
        simulation.step();
    }

    assert_eq!(lives(simulation.state(), PlayerId::new(0)), 3);
    let (_, velocity) = ball(simulation.state());
    assert!(velocity.x > 0.0, "ball should rebound to the right");
}

#[test]
fn elimination_ends_a_two_player_match() {
    let mut simulation = sim(&user_vs_user_config(), 42);
    simulation
        .state_mut()
        .player_mut(PlayerId::new(0))
        .unwrap()
        .lives = 1;
    aim_at_left_goal(&mut simulation);

    let mut all_events = Vec::new();
    for _ in 0..5 {
        simulation.step();
        all_events.extend(simulation.take_events());
    }

    // Loser is fully eliminated: no lives, no objects.
    assert_eq!(lives(simulation.state(), PlayerId::new(0)), 0);
    assert!(!simulation
        .state()
        .board
        .objects_sorted()
        .any(|o| o.owner() == Some(PlayerId::new(0))));

    // Match is over with player 1 as winner.
    assert_eq!(
        simulation.phase(),
        MatchPhase::MatchOver {
            winner: Some(PlayerId::new(1))
        }
    );
    assert!(all_events.iter().any(|r| matches!(
        r.event,
        MatchEvent::PlayerEliminated { player } if player == PlayerId::new(0)
    )));
    assert!(all_events.iter().any(|r| matches!(
        r.event,
        MatchEvent::MatchOver { winner: Some(w) } if w == PlayerId::new(1)
    )));
    assert!(all_events.iter().any(|r| matches!(
        &r.event,
        MatchEvent::AchievementUnlocked { account, key }
            if *account == AccountId::new(1002) && key == "match_winner"
    )));

    // Further stepping is a no-op.
    let tick = simulation.tick();
    simulation.step();
    assert_eq!(simulation.tick(), tick);
}

#[test]
fn unguarded_top_wall_reflects() {
    let mut simulation = sim(&user_vs_user_config(), 42);
    // On the classic map only the left and right sides are guarded.
    place_ball(&mut simulation, Vec2::new(50.0, 95.0), Vec2::new(0.0, 2.0));

    for _ in 0..6 {
        simulation.step();
    }

    let (_, velocity) = ball(simulation.state());
    assert!(velocity.y < 0.0, "top wall should reflect the ball");
    assert_eq!(lives(simulation.state(), PlayerId::new(0)), 3);
    assert_eq!(lives(simulation.state(), PlayerId::new(1)), 3);
}

#[test]
fn quad_match_eliminations_cascade_to_a_winner() {
    // Four local players that never steer: every aimed shot lands.
    let config = crate::config::MatchConfig {
        players: (0..4)
            .map(|i| crate::config::PlayerSpec::Local {
                label: format!("couch-{i}"),
            })
            .collect(),
        difficulty: 5,
        powerups: false,
        map: "quad".to_string(),
        player_lives: 1,
    };
    let mut simulation = sim(&config, 42);

    // Shots offset into the lane each idle paddle does not cover.
    let shots = [
        (Vec2::new(5.0, 10.0), Vec2::new(-3.0, 0.0)),  // left goal
        (Vec2::new(95.0, 10.0), Vec2::new(3.0, 0.0)),  // right goal
        (Vec2::new(10.0, 95.0), Vec2::new(0.0, 3.0)),  // top goal
        (Vec2::new(10.0, 5.0), Vec2::new(0.0, -3.0)),  // bottom goal
    ];
    let mut round = 0;
    while !simulation.state().is_over() && round < 8 {
        let (center, velocity) = shots[round % 4];
        place_ball(&mut simulation, center, velocity);
        for _ in 0..20 {
            simulation.step();
            if simulation.state().is_over() {
                break;
            }
        }
        round += 1;
    }

    assert!(
        simulation.state().is_over(),
        "repeatedly scoring must end a one-life quad match"
    );
    let alive = simulation.state().alive_players();
    assert!(alive.len() <= 1);
    // Every eliminated player's objects are gone from the board.
    for player in simulation.state().players_sorted() {
        if !player.is_alive() {
            assert!(!simulation
                .state()
                .board
                .objects_sorted()
                .any(|o| o.owner() == Some(player.id())));
        }
    }
}

#[test]
fn ai_opponent_actually_plays() {
    let mut simulation = sim(&user_vs_ai_config(8), 42);
    let start = paddle(simulation.state(), PlayerId::new(1)).segment().midpoint();

    let mut moved = false;
    for _ in 0..200 {
        simulation.step();
        if simulation.state().is_over() {
            break;
        }
        let now = paddle(simulation.state(), PlayerId::new(1)).segment().midpoint();
        if (now - start).length() > 1.0 {
            moved = true;
            break;
        }
    }
    assert!(moved, "an AI paddle should chase the ball within 200 ticks");
}

#[test]
fn human_paddles_only_move_on_input() {
    let mut simulation = sim(&user_vs_user_config(), 42);
    let start = paddle(simulation.state(), PlayerId::new(0)).anchor1;

    for _ in 0..50 {
        simulation.step();
    }
    assert_eq!(paddle(simulation.state(), PlayerId::new(0)).anchor1, start);

    simulation.input_handle().steer(PlayerId::new(0), -1.0);
    simulation.step();
    assert!(paddle(simulation.state(), PlayerId::new(0)).anchor1.y < start.y);
}

#[test]
fn paddles_stay_inside_the_arena_forever() {
    let mut simulation = sim(&user_vs_user_config(), 42);
    // Keep both players around for the whole run.
    for slot in 0..2u8 {
        simulation
            .state_mut()
            .player_mut(PlayerId::new(slot))
            .unwrap()
            .lives = 999;
    }
    let input = simulation.input_handle();

    for tick in 0..400 {
        // Hold up for a long stretch, then down.
        input.steer(PlayerId::new(0), if tick < 250 { 1.0 } else { -1.0 });
        simulation.step();

        let p = paddle(simulation.state(), PlayerId::new(0));
        for anchor in [p.anchor1, p.anchor2] {
            assert!(
                (-1e-3..=100.0 + 1e-3).contains(&anchor.y),
                "anchor left the arena at tick {tick}: {anchor}"
            );
            assert!((-1e-3..=100.0 + 1e-3).contains(&anchor.x));
        }
    }
}

#[test]
fn ball_speed_never_exceeds_the_cap() {
    let mut simulation = sim(&user_vs_ai_config(10), 42);
    let cap = simulation.rules().ball_max_speed;

    for tick in 0..1000 {
        simulation.step();
        let (_, velocity) = ball(simulation.state());
        assert!(
            velocity.length() <= cap + 1e-3,
            "speed cap violated at tick {tick}: {}",
            velocity.length()
        );
    }
}

#[test]
fn powerups_spawn_in_enabled_matches() {
    let mut simulation = sim(&quad_config(), 42);
    // Plenty of lives so the match cannot end before the first spawn.
    for slot in 0..4u8 {
        simulation
            .state_mut()
            .player_mut(PlayerId::new(slot))
            .unwrap()
            .lives = 99;
    }
    let interval = simulation.rules().powerup_spawn_interval;

    let mut spawned = false;
    let mut events = Vec::new();
    for _ in 0..=interval + 1 {
        simulation.step();
        events.extend(simulation.take_events());
        if simulation.state().is_over() {
            break;
        }
    }
    for record in &events {
        if matches!(record.event, MatchEvent::PowerupSpawned { .. }) {
            spawned = true;
        }
    }
    assert!(spawned, "a power-up should spawn within one interval");
}

#[test]
fn powerups_never_spawn_when_disabled() {
    let mut simulation = sim(&user_vs_user_config(), 42);
    let interval = simulation.rules().powerup_spawn_interval;

    for _ in 0..=interval + 1 {
        simulation.step();
    }
    assert_eq!(
        simulation
            .state()
            .board
            .objects_tagged(ObjectTag::Powerup)
            .count(),
        0
    );
    assert!(!simulation
        .take_events()
        .iter()
        .any(|r| matches!(r.event, MatchEvent::PowerupSpawned { .. })));
}

#[test]
fn snapshots_serialize_for_broadcast() {
    let mut simulation = sim(&quad_config(), 42);
    for _ in 0..10 {
        simulation.step();
    }
    let json = serde_json::to_string(simulation.state()).unwrap();
    let back: crate::state::MatchState = serde_json::from_str(&json).unwrap();
    assert_eq!(*simulation.state(), back);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn arbitrary_steering_never_breaks_the_clamp(
        seed in 0u64..1000,
        directions in proptest::collection::vec(-2.0f32..2.0, 40),
    ) {
        let mut simulation = sim(&user_vs_user_config(), seed);
        let input = simulation.input_handle();

        for direction in directions {
            input.steer(PlayerId::new(0), direction);
            input.steer(PlayerId::new(1), -direction);
            simulation.step();

            for slot in 0..2u8 {
                let p = paddle(simulation.state(), PlayerId::new(slot));
                for anchor in [p.anchor1, p.anchor2] {
                    prop_assert!(anchor.y >= -1e-3 && anchor.y <= 100.0 + 1e-3);
                    prop_assert!(anchor.x >= -1e-3 && anchor.x <= 100.0 + 1e-3);
                }
            }
        }
    }
}
