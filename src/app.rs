#![warn(clippy::all, clippy::pedantic)]

use bevy_ecs::prelude::*;
use log::info;
use std::time::Duration;

use crate::Time;
use crate::components::{
    Board, EventQueue, GameEvent, GamePhase, GameState, Input, Piece,
};
use crate::config::GameConfig;
use crate::systems::spawn_piece;

pub type AppResult<T> = anyhow::Result<T>;

/// Owns the session. All game state lives in the bevy_ecs world; the
/// front-end queries it for rendering and calls the command methods below.
pub struct App {
    pub world: World,
    pub should_quit: bool,
}

impl App {
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        let mut world = World::new();
        world.insert_resource(Time::new());
        world.insert_resource(Input::default());
        world.insert_resource(GameState::default());
        world.insert_resource(EventQueue::default());
        world.insert_resource(Board::new(config.board_width, config.board_height));
        world.insert_resource(config);

        Self {
            world,
            should_quit: false,
        }
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.world.resource::<GameState>().phase
    }

    /// The start command. From idle, primes the spawner twice (active piece
    /// plus preview) and begins ticking. After a game over it resets the
    /// session and starts fresh. Ignored while running or paused.
    pub fn start(&mut self) {
        match self.phase() {
            GamePhase::Idle => {
                spawn_piece(&mut self.world);
                spawn_piece(&mut self.world);
                self.world.resource_mut::<GameState>().phase = GamePhase::Running;
                info!("game started");
            }
            GamePhase::GameOver => {
                self.reset();
                self.start();
            }
            GamePhase::Running | GamePhase::Paused => {}
        }
    }

    /// Pause cancels the pending gravity tick (the accumulated fall time is
    /// dropped) so no stale tick fires across the pause boundary; resume
    /// re-arms the timer at the currently configured interval. Everything
    /// else is left untouched.
    pub fn toggle_pause(&mut self) {
        let event = {
            let mut state = self.world.resource_mut::<GameState>();
            match state.phase {
                GamePhase::Running => {
                    state.phase = GamePhase::Paused;
                    state.fall_timer = 0.0;
                    Some(GameEvent::Paused)
                }
                GamePhase::Paused => {
                    state.phase = GamePhase::Running;
                    Some(GameEvent::Resumed)
                }
                GamePhase::Idle | GamePhase::GameOver => None,
            }
        };
        if let Some(event) = event {
            info!("{event:?}");
            self.world.resource_mut::<EventQueue>().push(event);
        }
    }

    /// Tears down the session back to idle: all pieces despawned, board and
    /// state fresh. The loaded configuration is kept.
    pub fn reset(&mut self) {
        let pieces: Vec<Entity> = {
            let mut query = self.world.query_filtered::<Entity, With<Piece>>();
            query.iter(&self.world).collect()
        };
        for entity in pieces {
            self.world.despawn(entity);
        }

        let config = self.world.resource::<GameConfig>().clone();
        self.world
            .insert_resource(Board::new(config.board_width, config.board_height));
        self.world.insert_resource(GameState::default());
        self.world.insert_resource(Input::default());
        self.world.insert_resource(EventQueue::default());
    }

    /// Current gravity interval, derived from the level.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        let level = self.world.resource::<GameState>().level;
        self.world.resource::<GameConfig>().tick_interval(level)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.world.resource_mut::<EventQueue>().drain()
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}
