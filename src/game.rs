#![warn(clippy::all, clippy::pedantic)]

// Game board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 23;

// Gravity timing: the descent interval starts at BASE_TICK_MS and shrinks by
// TICK_DECREMENT_MS per level, never dropping below TICK_FLOOR_MS.
pub const BASE_TICK_MS: u64 = 1000;
pub const TICK_DECREMENT_MS: u64 = 10;
pub const TICK_FLOOR_MS: u64 = 100;

// Line clear scoring (multiplied by level + 1)
pub const POINTS_SINGLE: u32 = 40;
pub const POINTS_DOUBLE: u32 = 100;
pub const POINTS_TRIPLE: u32 = 300;
pub const POINTS_TETRIS: u32 = 1200;

// Level progression: a level-up fires when the cleared-line total lands on a
// multiple of this threshold it has not fired on before.
pub const LEVEL_UP_LINES: u32 = 2;
