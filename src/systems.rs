use bevy_ecs::prelude::*;
use log::{debug, info, trace};

use crate::components::{
    Active, Board, EventQueue, GameEvent, GamePhase, GameState, Input, Locked, NextUp, Piece,
    PieceKind,
};
use crate::config::GameConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDir {
    Left,
    Right,
    Down,
}

impl MoveDir {
    fn delta(self) -> (i32, i32) {
        match self {
            MoveDir::Left => (0, -1),
            MoveDir::Right => (0, 1),
            MoveDir::Down => (1, 0),
        }
    }
}

fn active_piece(world: &mut World) -> Option<(Entity, Piece)> {
    let mut query = world.query_filtered::<(Entity, &Piece), With<Active>>();
    query
        .iter(world)
        .next()
        .map(|(entity, piece)| (entity, piece.clone()))
}

/// Attempts to shift the active piece one cell. The candidate mask is
/// validated as a whole; on any illegal cell the piece is left untouched and
/// `false` is returned. On success mask and pivot move together.
pub fn try_move(world: &mut World, dir: MoveDir) -> bool {
    let Some((entity, piece)) = active_piece(world) else {
        return false;
    };
    let (drow, dcol) = dir.delta();
    let Some(candidate) = piece.translated(drow, dcol) else {
        trace!("move {dir:?} rejected: out of bounds");
        return false;
    };
    if !world.resource::<Board>().fits(&candidate) {
        trace!("move {dir:?} rejected: collision");
        return false;
    }
    if let Some(mut active) = world.get_mut::<Piece>(entity) {
        active.mask = candidate;
        active.pivot = (active.pivot.0 + drow, active.pivot.1 + dcol);
    }
    world.resource_mut::<EventQueue>().push(GameEvent::PieceMoved);
    true
}

/// Rotates the active piece. O is a fixed square and always succeeds without
/// changing anything. J, L and T cycle through four orientations with the
/// single rotate-left formula. I, S and Z toggle between two orientations:
/// rotate-left out of the spawn phase, rotate-right back into it. The pivot
/// is never altered by rotation.
pub fn try_rotate(world: &mut World) -> bool {
    let Some((entity, piece)) = active_piece(world) else {
        return false;
    };
    if piece.kind == PieceKind::O {
        return true;
    }
    let (candidate, next_phase) = if piece.kind.two_state() {
        if piece.rotated {
            (piece.rotated_right(), false)
        } else {
            (piece.rotated_left(), true)
        }
    } else {
        (piece.rotated_left(), piece.rotated)
    };
    let Some(candidate) = candidate else {
        trace!("rotation rejected: out of bounds");
        return false;
    };
    if !world.resource::<Board>().fits(&candidate) {
        trace!("rotation rejected: collision");
        return false;
    }
    if let Some(mut active) = world.get_mut::<Piece>(entity) {
        active.mask = candidate;
        active.rotated = next_phase;
    }
    world.resource_mut::<EventQueue>().push(GameEvent::PieceMoved);
    true
}

/// Advances the spawn queue: the preview piece becomes the active piece and a
/// fresh random preview is created. Called twice back to back at game start
/// to prime both slots.
pub fn spawn_piece(world: &mut World) {
    let promoted = {
        let mut query = world.query_filtered::<Entity, With<NextUp>>();
        query.iter(world).next()
    };
    if let Some(entity) = promoted {
        world.entity_mut(entity).remove::<NextUp>().insert(Active);
    }

    let (width, height) = {
        let board = world.resource::<Board>();
        (board.width, board.height)
    };
    let kind = PieceKind::random();
    debug!("next piece: {kind:?}");
    world.spawn((Piece::spawn(kind, width, height), NextUp));

    let mut state = world.resource_mut::<GameState>();
    state.just_spawned = true;

    // Stale movement commands must not carry over to the new piece.
    if let Some(mut input) = world.get_resource_mut::<Input>() {
        *input = Input::default();
    }
}

/// One gravity step: descend if possible, otherwise lock the piece, clear
/// lines, advance progression and either respawn or top out.
pub fn try_descend(world: &mut World) {
    if try_move(world, MoveDir::Down) {
        world.resource_mut::<GameState>().just_spawned = false;
        return;
    }
    lock_piece(world);
}

fn lock_piece(world: &mut World) {
    let Some((entity, piece)) = active_piece(world) else {
        return;
    };
    info!("locking {:?} piece", piece.kind);
    world.entity_mut(entity).remove::<Active>().insert(Locked);
    world.resource_mut::<Board>().merge(&piece.mask);
    world
        .resource_mut::<EventQueue>()
        .push(GameEvent::PieceLocked(piece.kind));

    let cleared = clear_full_rows(world);
    if !cleared.is_empty() {
        let (points, score) = {
            let config = world.resource::<GameConfig>().clone();
            let mut state = world.resource_mut::<GameState>();
            let points = config.line_points(cleared.len(), state.level);
            state.score += points;
            (points, state.score)
        };
        info!("cleared {} lines for {points} points", cleared.len());
        let mut events = world.resource_mut::<EventQueue>();
        events.push(GameEvent::LinesCleared(cleared));
        if points > 0 {
            events.push(GameEvent::ScoreChanged(score));
        }
    }

    after_lock(world);

    let topped_out = world.resource::<GameState>().just_spawned;
    if topped_out {
        // The piece that just locked never managed a single descent.
        info!("top out: freshly spawned piece could not descend");
        world.resource_mut::<GameState>().phase = GamePhase::GameOver;
        world.resource_mut::<EventQueue>().push(GameEvent::GameOver);
    } else {
        spawn_piece(world);
    }
}

/// Removes every full row, splicing the board and every locked piece's mask
/// identically so all masks stay in the shared coordinate system. The board
/// is re-scanned from the top after each removal rather than working from a
/// pre-collected index list, which stays correct while rows shift.
fn clear_full_rows(world: &mut World) -> Vec<usize> {
    let mut cleared = Vec::new();
    loop {
        let Some(row) = world.resource::<Board>().first_full_row() else {
            break;
        };
        world.resource_mut::<Board>().remove_row(row);
        let mut locked = world.query_filtered::<&mut Piece, With<Locked>>();
        for mut piece in locked.iter_mut(world) {
            piece.mask.remove_row(row);
        }
        world.resource_mut::<GameState>().lines_cleared += 1;
        cleared.push(row);
    }
    cleared
}

/// Progression step, run once per lock event: level up when the cleared-line
/// total lands on a threshold multiple it has not fired on before. The new
/// level shortens the gravity interval on the next tick comparison.
fn after_lock(world: &mut World) {
    let threshold = world.resource::<GameConfig>().level_up_lines;
    let leveled_up = {
        let mut state = world.resource_mut::<GameState>();
        if state.lines_cleared != state.last_level_up_lines
            && state.lines_cleared % threshold == 0
        {
            state.level += 1;
            state.last_level_up_lines = state.lines_cleared;
            Some(state.level)
        } else {
            None
        }
    };
    if let Some(level) = leveled_up {
        let interval = world.resource::<GameConfig>().tick_interval(level);
        info!("level up to {level}, gravity interval now {interval:?}");
        world
            .resource_mut::<EventQueue>()
            .push(GameEvent::LevelChanged(level));
    }
}

/// Consumes latched movement commands. Only meaningful while running; the
/// flags are dropped otherwise so a keystroke during pause cannot replay
/// after resume. A successful manual soft drop defers top-out exactly like
/// an automatic descent does.
pub fn input_system(world: &mut World) {
    let input = std::mem::take(&mut *world.resource_mut::<Input>());
    if world.resource::<GameState>().phase != GamePhase::Running {
        return;
    }
    if input.left {
        try_move(world, MoveDir::Left);
    }
    if input.right {
        try_move(world, MoveDir::Right);
    }
    if input.rotate {
        try_rotate(world);
    }
    if input.soft_drop && try_move(world, MoveDir::Down) {
        world.resource_mut::<GameState>().just_spawned = false;
    }
}

/// Accumulates elapsed time and fires one gravity step whenever the
/// level-derived interval has elapsed. Paused and idle sessions accumulate
/// nothing, and the interval is re-read on every comparison so a level change
/// reschedules the next tick without a stale one firing.
pub fn game_tick_system(world: &mut World, delta_seconds: f32) {
    if world.resource::<GameState>().phase != GamePhase::Running {
        return;
    }
    let interval = {
        let config = world.resource::<GameConfig>();
        let level = world.resource::<GameState>().level;
        config.tick_interval(level).as_secs_f32()
    };
    let should_drop = {
        let mut state = world.resource_mut::<GameState>();
        state.fall_timer += delta_seconds;
        if state.fall_timer >= interval {
            state.fall_timer = 0.0;
            true
        } else {
            false
        }
    };
    if should_drop {
        trace!("gravity tick");
        try_descend(world);
    }
}
