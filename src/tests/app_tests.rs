#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy_ecs::prelude::*;

    use crate::app::App;
    use crate::components::{
        Active, Board, GameEvent, GamePhase, GameState, Locked, NextUp, Piece,
    };
    use crate::config::GameConfig;
    use crate::systems::try_descend;

    #[test]
    fn test_new_app_is_idle_with_empty_board() {
        let mut app = App::default();
        assert_eq!(app.phase(), GamePhase::Idle);
        assert_eq!(app.world.resource::<Board>(), &Board::default());

        let mut pieces = app.world.query::<&Piece>();
        assert_eq!(pieces.iter(&app.world).count(), 0);
    }

    #[test]
    fn test_start_primes_active_and_preview() {
        let mut app = App::default();
        app.start();

        assert_eq!(app.phase(), GamePhase::Running);
        let mut active = app.world.query_filtered::<&Piece, With<Active>>();
        assert_eq!(active.iter(&app.world).count(), 1);
        let mut next = app.world.query_filtered::<&Piece, With<NextUp>>();
        assert_eq!(next.iter(&app.world).count(), 1);
        assert!(app.world.resource::<GameState>().just_spawned);
    }

    #[test]
    fn test_start_is_ignored_while_running_or_paused() {
        let mut app = App::default();
        app.start();
        app.start();
        let mut pieces = app.world.query::<&Piece>();
        assert_eq!(pieces.iter(&app.world).count(), 2);

        app.toggle_pause();
        app.start();
        assert_eq!(app.phase(), GamePhase::Paused);
    }

    #[test]
    fn test_pause_resume_round_trip_preserves_state() {
        let mut app = App::default();
        app.start();
        app.drain_events();

        let board_before = app.world.resource::<Board>().clone();
        let (score, level, lines) = {
            let state = app.world.resource::<GameState>();
            (state.score, state.level, state.lines_cleared)
        };
        let masks_before: Vec<_> = {
            let mut pieces = app.world.query::<&Piece>();
            pieces.iter(&app.world).cloned().collect()
        };

        app.toggle_pause();
        assert_eq!(app.phase(), GamePhase::Paused);
        app.toggle_pause();
        assert_eq!(app.phase(), GamePhase::Running);

        assert_eq!(app.world.resource::<Board>(), &board_before);
        let state = app.world.resource::<GameState>();
        assert_eq!(state.score, score);
        assert_eq!(state.level, level);
        assert_eq!(state.lines_cleared, lines);
        let masks_after: Vec<_> = {
            let mut pieces = app.world.query::<&Piece>();
            pieces.iter(&app.world).cloned().collect()
        };
        assert_eq!(masks_after, masks_before);

        assert_eq!(
            app.drain_events(),
            vec![GameEvent::Paused, GameEvent::Resumed]
        );
    }

    #[test]
    fn test_pause_drops_accumulated_fall_time() {
        let mut app = App::default();
        app.start();
        app.world.resource_mut::<GameState>().fall_timer = 0.9;

        app.toggle_pause();
        assert_eq!(app.world.resource::<GameState>().fall_timer, 0.0);
    }

    #[test]
    fn test_pause_ignored_when_idle_or_over() {
        let mut app = App::default();
        app.toggle_pause();
        assert_eq!(app.phase(), GamePhase::Idle);
        assert!(app.drain_events().is_empty());
    }

    #[test]
    fn test_reset_clears_pieces_and_state() {
        let mut app = App::default();
        app.start();
        // Lock something to dirty the board
        {
            let mut state = app.world.resource_mut::<GameState>();
            state.just_spawned = false;
            state.score = 120;
        }
        for _ in 0..30 {
            try_descend(&mut app.world);
        }
        {
            let mut locked = app.world.query_filtered::<&Piece, With<Locked>>();
            assert!(locked.iter(&app.world).count() >= 1);
        }

        app.reset();
        assert_eq!(app.phase(), GamePhase::Idle);
        assert_eq!(app.world.resource::<Board>(), &Board::default());
        assert_eq!(app.world.resource::<GameState>().score, 0);
        let mut pieces = app.world.query::<&Piece>();
        assert_eq!(pieces.iter(&app.world).count(), 0);
    }

    #[test]
    fn test_start_after_game_over_restarts_fresh() {
        let mut app = App::default();
        app.start();
        {
            let mut state = app.world.resource_mut::<GameState>();
            state.phase = GamePhase::GameOver;
            state.score = 999;
        }

        app.start();
        assert_eq!(app.phase(), GamePhase::Running);
        assert_eq!(app.world.resource::<GameState>().score, 0);
        let mut active = app.world.query_filtered::<&Piece, With<Active>>();
        assert_eq!(active.iter(&app.world).count(), 1);
    }

    #[test]
    fn test_tick_interval_tracks_level_and_floor() {
        let mut app = App::default();
        assert_eq!(app.tick_interval(), Duration::from_millis(1000));

        app.world.resource_mut::<GameState>().level = 5;
        assert_eq!(app.tick_interval(), Duration::from_millis(950));

        // Deep into the progression the interval saturates at the floor
        app.world.resource_mut::<GameState>().level = 95;
        assert_eq!(app.tick_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_custom_config_dimensions_flow_into_board() {
        let config = GameConfig {
            board_width: 8,
            board_height: 16,
            ..GameConfig::default()
        };
        let app = App::new(config);
        let board = app.world.resource::<Board>();
        assert_eq!(board.width, 8);
        assert_eq!(board.height, 16);
    }
}
