//! Stateless UI rendering for MASH.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use strictly_mash::{AnyGame, Category, GameState, Phase};

use super::app::App;

/// Renders the whole screen for the current phase.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(8),    // Body
            Constraint::Length(3), // Status
            Constraint::Length(1), // Keys
        ])
        .split(area);

    let state = app.game().state();
    draw_title(frame, chunks[0], state);

    match app.game() {
        AnyGame::Setup(_) => draw_setup(frame, chunks[1], state),
        AnyGame::Playing(game) => draw_board(frame, chunks[1], state, game.next_crossing()),
        AnyGame::Results(results) => {
            let halves = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(chunks[1]);
            draw_board(frame, halves[0], state, None);
            let fortune: Vec<Line> = results
                .fortune()
                .to_string()
                .lines()
                .map(|l| Line::from(l.to_string()))
                .collect();
            let paragraph = Paragraph::new(fortune)
                .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
                .wrap(Wrap { trim: false })
                .block(Block::default().title("Your future").borders(Borders::ALL));
            frame.render_widget(paragraph, halves[1]);
        }
    }

    let status = Paragraph::new(app.status_message())
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, chunks[2]);

    let help = Paragraph::new(help_line(state.phase())).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[3]);
}

fn help_line(phase: Phase) -> &'static str {
    match phase {
        Phase::Setup => "↑/↓ category  Enter add  Tab finish  +/- magic  F5 start  Esc quit",
        Phase::Playing => "Space run/pause  n step  f finish  r rewind  q quit",
        Phase::Results => "a play again  r new game  q quit",
    }
}

fn draw_title(frame: &mut Frame, area: Rect, state: &GameState) {
    let letters: String = state.mash_letters().iter().map(|c| c.letter()).collect();
    let title = Paragraph::new(format!("{}  ·  magic number {}", letters, state.magic_number()))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(title, area);
}

fn draw_setup(frame: &mut Frame, area: Rect, state: &GameState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    let focused = state.selected_category();
    let rows: Vec<Line> = state
        .categories_in_order()
        .map(|category| {
            let marker = if category.all_options_added() { "✓" } else { " " };
            let text = format!(
                "{} {} ({})",
                marker,
                category.display_name(),
                category.options().len()
            );
            let style = if focused == Some(category.name()) {
                Style::default().bg(Color::White).fg(Color::Black)
            } else if category.all_options_added() {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            Line::from(Span::styled(text, style))
        })
        .collect();
    let list = Paragraph::new(rows).block(Block::default().title("Categories").borders(Borders::ALL));
    frame.render_widget(list, columns[0]);

    let Some(category) = focused.and_then(|key| state.category(key)) else {
        let hint = Paragraph::new("Select a category with ↑/↓")
            .alignment(Alignment::Center)
            .block(Block::default().title("Options").borders(Borders::ALL));
        frame.render_widget(hint, columns[1]);
        return;
    };

    let mut lines: Vec<Line> = category
        .options()
        .iter()
        .map(|option| Line::from(format!("  • {}", option)))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("> ", Style::default().fg(Color::Cyan)),
        Span::raw(state.current_input().to_string()),
        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ]));
    let options = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().title(category.display_name().to_string()).borders(Borders::ALL));
    frame.render_widget(options, columns[1]);
}

/// Style for one item: crossed items struck through, survivors bold,
/// the item under the cursor highlighted.
fn item_style(crossed: bool, selected: bool, under_cursor: bool) -> Style {
    let base = if selected {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else if crossed {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default()
    };
    if under_cursor {
        base.bg(Color::White).fg(Color::Black)
    } else {
        base
    }
}

/// Position in `all_items` of the item the last step visited.
fn cursor_item(state: &GameState) -> Option<usize> {
    let len = state.all_items().len();
    if len == 0 || state.phase() != Phase::Playing || state.current_animation_index() == 0 {
        return None;
    }
    Some((state.current_animation_index() - 1) % len)
}

/// Draws the letters and every category; `next` is the item the count will cross.
fn draw_board(frame: &mut Frame, area: Rect, state: &GameState, next: Option<usize>) {
    let cursor = cursor_item(state);
    let mut position = 0;

    let mut letters = Vec::new();
    for cell in state.mash_letters() {
        let style = item_style(cell.crossed(), cell.selected(), cursor == Some(position));
        letters.push(Span::styled(format!(" {} ", cell.letter()), style));
        position += 1;
    }

    let mut lines = vec![Line::from(letters).alignment(Alignment::Center), Line::from("")];
    for category in state.categories_in_order() {
        lines.push(Line::from(Span::styled(
            category.display_name().to_string(),
            Style::default().add_modifier(Modifier::UNDERLINED),
        )));
        lines.push(option_row(category, cursor, &mut position));
    }

    let upcoming = next
        .and_then(|i| state.all_items().get(i))
        .and_then(|item| state.item_label(item));
    let title = match (state.phase(), upcoming) {
        (Phase::Playing, Some(label)) => format!(
            "Counting · tally {}/{} · next out: {}",
            state.tally(),
            state.magic_number(),
            label
        ),
        (Phase::Playing, None) => format!("Counting · tally {}/{}", state.tally(), state.magic_number()),
        _ => "Board".to_string(),
    };
    let board = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(board, area);
}

fn option_row<'a>(category: &'a Category, cursor: Option<usize>, position: &mut usize) -> Line<'a> {
    let spans: Vec<Span> = category
        .options()
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let style = item_style(
                category.is_crossed(i),
                category.selected_index() == Some(i),
                cursor == Some(*position + i),
            );
            Span::styled(format!(" {} ", option), style)
        })
        .collect();
    *position += category.options().len();
    Line::from(spans)
}
