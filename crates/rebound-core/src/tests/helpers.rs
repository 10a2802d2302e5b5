//! Shared factories and query utilities for the cross-cutting tests.

use glam::Vec2;

use crate::config::{MatchConfig, PlayerSpec};
use crate::object::{ObjectTag, PaddleState};
use crate::player::{AccountId, PlayerId};
use crate::simulation::Simulation;
use crate::state::MatchState;

/// Two remote humans on the classic map, power-ups off.
pub fn user_vs_user_config() -> MatchConfig {
    MatchConfig {
        players: vec![
            PlayerSpec::User {
                account: AccountId::new(1001),
            },
            PlayerSpec::User {
                account: AccountId::new(1002),
            },
        ],
        difficulty: 5,
        powerups: false,
        map: "classic".to_string(),
        player_lives: 3,
    }
}

/// A remote human against an AI of the given level, power-ups off.
pub fn user_vs_ai_config(level: u8) -> MatchConfig {
    MatchConfig {
        players: vec![
            PlayerSpec::User {
                account: AccountId::new(1001),
            },
            PlayerSpec::Ai { level: Some(level) },
        ],
        difficulty: 5,
        powerups: false,
        map: "classic".to_string(),
        player_lives: 3,
    }
}

/// Four mixed players on the quad map, power-ups on.
pub fn quad_config() -> MatchConfig {
    MatchConfig {
        players: vec![
            PlayerSpec::User {
                account: AccountId::new(1001),
            },
            PlayerSpec::Ai { level: Some(3) },
            PlayerSpec::Ai { level: Some(8) },
            PlayerSpec::Local {
                label: "couch".to_string(),
            },
        ],
        difficulty: 6,
        powerups: true,
        map: "quad".to_string(),
        player_lives: 2,
    }
}

/// Builds a simulation, panicking on configuration errors.
pub fn sim(config: &MatchConfig, seed: u64) -> Simulation {
    Simulation::from_config(config, seed).expect("test config must be valid")
}

/// The lowest-ID ball's (center, velocity).
pub fn ball(state: &MatchState) -> (Vec2, Vec2) {
    let ball = state
        .board
        .objects_tagged(ObjectTag::Ball)
        .next()
        .expect("a ball on the board")
        .as_ball()
        .expect("ball state");
    (ball.center, ball.velocity)
}

/// Repositions the lowest-ID ball with the given velocity.
pub fn place_ball(sim: &mut Simulation, center: Vec2, velocity: Vec2) {
    let state = sim.state_mut();
    let id = state.board.ids_tagged(ObjectTag::Ball)[0];
    let ball = state
        .board
        .get_mut(id)
        .expect("ball exists")
        .as_ball_mut()
        .expect("ball state");
    ball.center = center;
    ball.velocity = velocity;
    ball.paddle_cooldown = 0;
}

/// A player's paddle state.
pub fn paddle(state: &MatchState, player: PlayerId) -> PaddleState {
    state
        .board
        .paddle_of(player)
        .expect("paddle exists")
        .as_paddle()
        .expect("paddle state")
        .clone()
}

/// A player's remaining lives.
pub fn lives(state: &MatchState, player: PlayerId) -> u32 {
    state.player(player).expect("player exists").lives
}

/// The state serialized to JSON for whole-run comparisons.
pub fn serialized(state: &MatchState) -> String {
    serde_json::to_string(state).expect("state serializes")
}

/// Enables test log capture; call at the top of tests that exercise
/// warn/debug paths.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configs_build_valid_simulations() {
        let _ = sim(&user_vs_user_config(), 1);
        let _ = sim(&user_vs_ai_config(5), 1);
        let _ = sim(&quad_config(), 1);
    }

    #[test]
    fn place_ball_moves_the_primary_ball() {
        let mut s = sim(&user_vs_user_config(), 1);
        place_ball(&mut s, Vec2::new(10.0, 20.0), Vec2::new(1.0, 0.0));
        let (center, velocity) = ball(s.state());
        assert_eq!(center, Vec2::new(10.0, 20.0));
        assert_eq!(velocity, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn paddle_and_lives_queries_resolve() {
        let s = sim(&user_vs_user_config(), 1);
        assert_eq!(lives(s.state(), PlayerId::new(0)), 3);
        let p = paddle(s.state(), PlayerId::new(0));
        assert!((p.segment().length() - 20.0).abs() < 1e-6);
    }
}
