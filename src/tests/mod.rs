#![warn(clippy::all, clippy::pedantic)]

// Test modules
pub mod app_tests;
pub mod game_tests;

// Shared test utilities
pub mod test_utils {
    use bevy_ecs::prelude::*;

    use crate::components::{
        Active, Board, EventQueue, GameState, Input, Mask, Piece, PieceKind,
    };
    use crate::config::GameConfig;
    use crate::game::{BOARD_HEIGHT, BOARD_WIDTH};

    /// Creates a world with the standard session resources, default-sized
    /// board, phase Idle.
    #[must_use]
    pub fn create_test_world() -> World {
        let mut world = World::new();
        world.insert_resource(GameConfig::default());
        world.insert_resource(Board::new(BOARD_WIDTH, BOARD_HEIGHT));
        world.insert_resource(GameState::default());
        world.insert_resource(Input::default());
        world.insert_resource(EventQueue::default());
        world.insert_resource(crate::Time::new());
        world
    }

    /// Builds a piece with an explicit absolute mask, bypassing the spawner,
    /// so tests control geometry exactly.
    #[must_use]
    pub fn piece_with_cells(kind: PieceKind, cells: &[(i32, i32)], pivot: (i32, i32)) -> Piece {
        Piece {
            kind,
            mask: Mask::from_cells(BOARD_WIDTH, BOARD_HEIGHT, cells)
                .expect("test cells must be in bounds"),
            pivot,
            rotated: false,
        }
    }

    pub fn spawn_active(world: &mut World, piece: Piece) -> Entity {
        world.spawn((piece, Active)).id()
    }

    /// Marks every cell of `row` occupied except the listed columns.
    pub fn fill_row_except(board: &mut Board, row: usize, holes: &[usize]) {
        for col in 0..board.width {
            if !holes.contains(&col) {
                board.occupied.set(row, col, true);
            }
        }
    }

    pub fn active_piece(world: &mut World) -> Option<Piece> {
        let mut query = world.query_filtered::<&Piece, With<Active>>();
        query.iter(world).next().cloned()
    }
}
