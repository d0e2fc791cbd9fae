use crate::app::App;
use crate::components::{Active, Board, GamePhase, GameState, Locked, NextUp, Piece};
use bevy_ecs::prelude::*;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Rendering collaborator: consumes the session snapshot and draws it. The
/// engine never reaches in here.
pub fn render(f: &mut Frame, app: &mut App) {
    let (board_cols, board_rows) = {
        let board = app.world.resource::<Board>();
        (board.width as u16, board.height as u16)
    };

    // Each cell is 2 characters wide and 1 tall
    let cell_width = 2;
    let board_width = board_cols * cell_width + 2; // +2 for borders
    let board_height = board_rows + 2;
    let min_info_width = 20u16;
    let min_total_width = board_width + min_info_width;
    let min_total_height = board_height + 3;

    if f.area().width < min_total_width || f.area().height < min_total_height {
        let warning_text = Paragraph::new(
            "Terminal too small!\nPlease resize your terminal\nto continue playing.",
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Blockfall"));

        let warning_area = centered_rect(50, 30, f.area());
        f.render_widget(warning_text, warning_area);
        return;
    }

    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(board_width),
            Constraint::Min(min_info_width),
        ])
        .split(f.area());

    let game_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),            // Title
            Constraint::Length(board_height), // Game board
            Constraint::Fill(1),
        ])
        .split(main_layout[0]);

    let info_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Length(5), // Score / level / lines
            Constraint::Length(6), // Next piece preview
            Constraint::Min(5),    // Controls
        ])
        .split(main_layout[1]);

    let title = Paragraph::new("BLOCKFALL")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(title, game_layout[0]);

    render_board(f, app, game_layout[1]);

    let info_title = Paragraph::new("INFO")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(info_title, info_layout[0]);

    let game_state = app.world.resource::<GameState>();
    let stats = format!(
        "Score: {}\nLevel: {}\nLines: {}",
        game_state.score, game_state.level, game_state.lines_cleared,
    );
    let stats_widget = Paragraph::new(stats)
        .block(Block::default().borders(Borders::NONE))
        .wrap(Wrap { trim: true });
    f.render_widget(stats_widget, info_layout[1]);

    render_next_preview(f, app, info_layout[2]);

    let controls = Paragraph::new(
        "Controls:\n\
        ←/→: Move left/right\n\
        ↓: Soft drop\n\
        ↑/Space: Rotate\n\
        P: Pause\n\
        Enter: Start\n\
        Q: Quit\n\
        ",
    )
    .block(Block::default().borders(Borders::TOP))
    .wrap(Wrap { trim: true });
    f.render_widget(controls, info_layout[3]);
}

fn render_board(f: &mut Frame, app: &mut App, area: Rect) {
    let cell_width = 2;
    let inner_area = Block::default().borders(Borders::ALL).inner(area);
    f.render_widget(Block::default().borders(Borders::ALL), area);

    let (board_cols, board_rows) = {
        let board = app.world.resource::<Board>();
        (board.width as u16, board.height as u16)
    };

    // Locked pieces first, then the active piece on top. Piece masks are in
    // absolute board coordinates, so rendering is a direct cell walk.
    let mut blocks: Vec<(usize, usize, Color)> = Vec::new();
    {
        let mut locked = app.world.query_filtered::<&Piece, With<Locked>>();
        for piece in locked.iter(&app.world) {
            let color = piece.kind.color();
            for (row, col) in piece.mask.cells() {
                blocks.push((row, col, color));
            }
        }
    }
    {
        let mut active = app.world.query_filtered::<&Piece, With<Active>>();
        for piece in active.iter(&app.world) {
            let color = piece.kind.color();
            for (row, col) in piece.mask.cells() {
                blocks.push((row, col, color));
            }
        }
    }

    for (row, col, color) in blocks {
        let x = col as u16;
        let y = row as u16;
        if x < board_cols && y < board_rows {
            let block_x = inner_area.left() + x * cell_width;
            let block_y = inner_area.top() + y;

            if block_x + 1 < inner_area.right() && block_y < inner_area.bottom() {
                for dx in 0..cell_width {
                    if let Some(cell) = f.buffer_mut().cell_mut((block_x + dx, block_y)) {
                        cell.set_symbol("█");
                        cell.set_fg(color);
                        cell.set_bg(Color::Black);
                    }
                }
            }
        }
    }

    let phase = app.world.resource::<GameState>().phase;
    let overlay = match phase {
        GamePhase::Idle => Some(("Press Enter to start", Color::White)),
        GamePhase::Paused => Some(("PAUSED", Color::Yellow)),
        GamePhase::GameOver => Some(("GAME OVER", Color::Red)),
        GamePhase::Running => None,
    };
    if let Some((text, color)) = overlay {
        let overlay_widget = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD));
        let overlay_area = Rect {
            x: inner_area.x,
            y: inner_area.y + inner_area.height / 2,
            width: inner_area.width,
            height: 1,
        };
        f.render_widget(overlay_widget, overlay_area);
    }
}

fn render_next_preview(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Next");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let preview = {
        let mut next = app.world.query_filtered::<&Piece, With<NextUp>>();
        next.iter(&app.world)
            .next()
            .map(|piece| (piece.kind.color(), piece.mask.cells()))
    };
    let Some((color, cells)) = preview else {
        return;
    };
    if cells.is_empty() {
        return;
    }

    // Normalize the absolute spawn cells into the preview box
    let min_row = cells.iter().map(|&(row, _)| row).min().unwrap_or(0);
    let min_col = cells.iter().map(|&(_, col)| col).min().unwrap_or(0);
    for (row, col) in cells {
        let x = inner.left() + ((col - min_col) as u16) * 2;
        let y = inner.top() + (row - min_row) as u16;
        if x + 1 < inner.right() && y < inner.bottom() {
            for dx in 0..2 {
                if let Some(cell) = f.buffer_mut().cell_mut((x + dx, y)) {
                    cell.set_symbol("█");
                    cell.set_fg(color);
                    cell.set_bg(Color::Black);
                }
            }
        }
    }
}

/// Helper function to create a centered rect using up certain percentage of the available rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
