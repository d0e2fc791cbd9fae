#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow truncation when casting from usize to i32 since board dimensions are always small enough to fit in i32
    clippy::cast_possible_truncation,
    // Allow sign loss when going from signed to unsigned types since we validate values are non-negative before casting
    clippy::cast_sign_loss,
    // Allow potential wrapping when casting between types of same size as we validate values are in range
    clippy::cast_possible_wrap
)]

use bevy_ecs::prelude::*;

use crate::game;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    #[must_use]
    pub fn random() -> Self {
        match fastrand::u8(0..7) {
            0 => PieceKind::I,
            1 => PieceKind::J,
            2 => PieceKind::L,
            3 => PieceKind::O,
            4 => PieceKind::S,
            5 => PieceKind::T,
            _ => PieceKind::Z,
        }
    }

    /// Start cells as (row, col) offsets from the spawn column, rows counted
    /// from the top of the board.
    #[must_use]
    pub fn spawn_cells(self) -> [(i32, i32); 4] {
        match self {
            PieceKind::I => [(0, 0), (0, 1), (0, 2), (0, 3)],
            PieceKind::J => [(0, 0), (0, 1), (0, 2), (1, 2)],
            PieceKind::L => [(0, 0), (0, 1), (0, 2), (1, 0)],
            PieceKind::O => [(0, 1), (0, 2), (1, 1), (1, 2)],
            PieceKind::S => [(0, 1), (0, 2), (1, 0), (1, 1)],
            PieceKind::T => [(0, 0), (0, 1), (0, 2), (1, 1)],
            PieceKind::Z => [(0, 0), (0, 1), (1, 1), (1, 2)],
        }
    }

    /// Rotation reference point, in the same offset frame as `spawn_cells`.
    #[must_use]
    pub fn spawn_pivot(self) -> (i32, i32) {
        match self {
            PieceKind::I => (0, 2),
            PieceKind::J | PieceKind::L | PieceKind::O | PieceKind::T => (0, 1),
            PieceKind::S | PieceKind::Z => (1, 1),
        }
    }

    /// I, S and Z have 180-degree-symmetric silhouettes, so their four
    /// geometric rotations collapse into two distinct orientations.
    #[must_use]
    pub fn two_state(self) -> bool {
        matches!(self, PieceKind::I | PieceKind::S | PieceKind::Z)
    }

    #[must_use]
    pub fn color(self) -> ratatui::style::Color {
        match self {
            PieceKind::I => ratatui::style::Color::Cyan,
            PieceKind::J => ratatui::style::Color::Blue,
            PieceKind::L => ratatui::style::Color::LightYellow,
            PieceKind::O => ratatui::style::Color::Yellow,
            PieceKind::S => ratatui::style::Color::Green,
            PieceKind::T => ratatui::style::Color::Magenta,
            PieceKind::Z => ratatui::style::Color::Red,
        }
    }
}

/// Board-sized boolean occupancy surface. Both the board and every piece use
/// this shape, so collision checks are a straight cell-by-cell comparison in
/// shared absolute coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    pub width: usize,
    pub height: usize,
    rows: Vec<Vec<bool>>,
}

impl Mask {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rows: vec![vec![false; width]; height],
        }
    }

    /// Builds a mask from absolute cells. Returns `None` if any cell falls
    /// outside the board, which rejects the whole candidate.
    #[must_use]
    pub fn from_cells(width: usize, height: usize, cells: &[(i32, i32)]) -> Option<Self> {
        let mut mask = Self::new(width, height);
        for &(row, col) in cells {
            if row < 0 || row >= height as i32 || col < 0 || col >= width as i32 {
                return None;
            }
            mask.rows[row as usize][col as usize] = true;
        }
        Some(mask)
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width && self.rows[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, occupied: bool) {
        if row < self.height && col < self.width {
            self.rows[row][col] = occupied;
        }
    }

    /// All occupied cells as (row, col), top to bottom.
    #[must_use]
    pub fn cells(&self) -> Vec<(usize, usize)> {
        let mut cells = Vec::new();
        for (row, cols) in self.rows.iter().enumerate() {
            for (col, &occupied) in cols.iter().enumerate() {
                if occupied {
                    cells.push((row, col));
                }
            }
        }
        cells
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.rows
            .iter()
            .map(|cols| cols.iter().filter(|&&c| c).count())
            .sum()
    }

    #[must_use]
    pub fn overlaps(&self, other: &Mask) -> bool {
        self.rows
            .iter()
            .zip(&other.rows)
            .any(|(a, b)| a.iter().zip(b).any(|(&x, &y)| x && y))
    }

    pub fn merge(&mut self, other: &Mask) {
        for (a, b) in self.rows.iter_mut().zip(&other.rows) {
            for (x, &y) in a.iter_mut().zip(b) {
                *x |= y;
            }
        }
    }

    /// Splices out `row` and inserts an empty row at the top, so everything
    /// above the removed row drops by one. This is the line-clear primitive
    /// applied to the board and to every locked piece's mask alike.
    pub fn remove_row(&mut self, row: usize) {
        if row >= self.height {
            return;
        }
        self.rows.remove(row);
        self.rows.insert(0, vec![false; self.width]);
    }

    pub fn clear(&mut self) {
        for cols in &mut self.rows {
            cols.fill(false);
        }
    }
}

/// The playfield: the permanent occupancy of locked cells. Mutated only by
/// the lock and line-clear path in `systems`.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub width: usize,
    pub height: usize,
    pub occupied: Mask,
}

impl Board {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            occupied: Mask::new(width, height),
        }
    }

    /// In bounds and not permanently occupied.
    #[must_use]
    pub fn is_legal(&self, row: i32, col: i32) -> bool {
        row >= 0
            && row < self.height as i32
            && col >= 0
            && col < self.width as i32
            && !self.occupied.get(row as usize, col as usize)
    }

    /// Whole-mask collision check against the locked cells. Bounds are
    /// already guaranteed by `Mask::from_cells`.
    #[must_use]
    pub fn fits(&self, mask: &Mask) -> bool {
        !self.occupied.overlaps(mask)
    }

    pub fn merge(&mut self, mask: &Mask) {
        self.occupied.merge(mask);
    }

    #[must_use]
    pub fn is_row_full(&self, row: usize) -> bool {
        row < self.height && (0..self.width).all(|col| self.occupied.get(row, col))
    }

    /// Topmost full row, if any. The clear loop re-scans after every splice
    /// so it stays correct while rows shift.
    #[must_use]
    pub fn first_full_row(&self) -> Option<usize> {
        (0..self.height).find(|&row| self.is_row_full(row))
    }

    pub fn remove_row(&mut self, row: usize) {
        self.occupied.remove_row(row);
    }

    pub fn clear(&mut self) {
        self.occupied.clear();
    }
}

/// A tetromino instance. The mask lives in absolute board coordinates; every
/// move or rotation produces a full candidate mask which is validated as a
/// whole before being committed.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub mask: Mask,
    pub pivot: (i32, i32),
    /// Orientation phase, meaningful only for the two-state kinds (I, S, Z).
    pub rotated: bool,
}

impl Piece {
    /// Creates a piece at its spawn position, horizontally centered.
    #[must_use]
    pub fn spawn(kind: PieceKind, board_width: usize, board_height: usize) -> Self {
        let spawn_col = board_width as i32 / 2 - 2;
        let cells: Vec<(i32, i32)> = kind
            .spawn_cells()
            .iter()
            .map(|&(row, col)| (row, col + spawn_col))
            .collect();
        let (pivot_row, pivot_col) = kind.spawn_pivot();
        let mask = Mask::from_cells(board_width, board_height, &cells)
            .unwrap_or_else(|| Mask::new(board_width, board_height));
        Self {
            kind,
            mask,
            pivot: (pivot_row, pivot_col + spawn_col),
            rotated: false,
        }
    }

    fn transformed(&self, f: impl Fn(i32, i32) -> (i32, i32)) -> Option<Mask> {
        let cells: Vec<(i32, i32)> = self
            .mask
            .cells()
            .into_iter()
            .map(|(row, col)| f(row as i32, col as i32))
            .collect();
        Mask::from_cells(self.mask.width, self.mask.height, &cells)
    }

    /// Candidate mask for a whole-piece shift. `None` if any cell would
    /// leave the board.
    #[must_use]
    pub fn translated(&self, drow: i32, dcol: i32) -> Option<Mask> {
        self.transformed(|row, col| (row + drow, col + dcol))
    }

    /// 90-degree rotation about the pivot, expressed directly in absolute
    /// coordinates. Four applications cycle back to the original mask.
    #[must_use]
    pub fn rotated_left(&self) -> Option<Mask> {
        let (pr, pc) = self.pivot;
        self.transformed(|row, col| (pr - pc + col, pr + pc - row))
    }

    /// Mirror of `rotated_left`; undoes it exactly. Used by the two-state
    /// kinds to toggle back to their spawn orientation.
    #[must_use]
    pub fn rotated_right(&self) -> Option<Mask> {
        let (pr, pc) = self.pivot;
        self.transformed(|row, col| (pc + pr - col, pc - pr + row))
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.mask.cell_count()
    }
}

/// Marker for the piece currently under player control.
#[derive(Component, Debug)]
pub struct Active;

/// Marker for the preview piece shown in the side panel.
#[derive(Component, Debug)]
pub struct NextUp;

/// Marker for pieces that have become part of the permanent stack. Their
/// masks are only ever spliced by line clears, never moved.
#[derive(Component, Debug)]
pub struct Locked;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    #[default]
    Idle,
    Running,
    Paused,
    GameOver,
}

#[derive(Resource, Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub score: u32,
    pub level: u32,
    pub lines_cleared: u32,
    /// Cleared-line total at which the last level-up fired, so the same
    /// total never fires twice.
    pub last_level_up_lines: u32,
    /// Set on spawn, cleared by the first successful descent. Still true at
    /// lock time means the piece never fell: top-out.
    pub just_spawned: bool,
    /// Seconds accumulated toward the next gravity tick.
    pub fall_timer: f32,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            phase: GamePhase::Idle,
            score: 0,
            level: 0,
            lines_cleared: 0,
            last_level_up_lines: 0,
            just_spawned: false,
            fall_timer: 0.0,
        }
    }
}

impl GameState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// One-shot movement commands latched by the key handler and consumed by
/// `systems::input_system`.
#[derive(Resource, Debug, Clone, Default)]
pub struct Input {
    pub left: bool,
    pub right: bool,
    pub rotate: bool,
    pub soft_drop: bool,
}

/// Notifications from the engine to the rendering collaborator. The engine
/// never formats cells or touches the terminal; it pushes these and the
/// front-end drains them each frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    PieceMoved,
    PieceLocked(PieceKind),
    LinesCleared(Vec<usize>),
    ScoreChanged(u32),
    LevelChanged(u32),
    GameOver,
    Paused,
    Resumed,
}

#[derive(Resource, Debug, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

// Default-sized board, convenient for tests and the Default impls.
impl Default for Board {
    fn default() -> Self {
        Self::new(game::BOARD_WIDTH, game::BOARD_HEIGHT)
    }
}
