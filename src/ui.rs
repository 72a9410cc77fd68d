use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use quien::game::{Focus, Game, Mode, NoticeKind, BOARD_COLUMNS};

const HORIZONTAL_MARGIN: u16 = 2;
const CELL_PADDING: usize = 2;

/// Wraps the game so the binary can implement `Widget` for it
pub struct GameView<'a>(pub &'a Game);

impl Widget for GameView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let game = self.0;
        match game.mode() {
            Mode::NameEntry => render_name_entry(game, area, buf),
            _ => render_table(game, area, buf),
        }
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn focused_block(title: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title)
}

fn notice_line(game: &Game) -> Line<'_> {
    match game.notice() {
        Some(notice) => {
            let color = match notice.kind {
                NoticeKind::Info => Color::Yellow,
                NoticeKind::Success => Color::Green,
                NoticeKind::Error => Color::Red,
            };
            Line::from(Span::styled(notice.text.as_str(), bold().fg(color)))
        }
        None => Line::default(),
    }
}

fn render_name_entry(game: &Game, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    Paragraph::new(format!("{}_", game.input()))
        .block(Block::default().borders(Borders::ALL).title("Who is playing?"))
        .render(chunks[1], buf);
    Paragraph::new(notice_line(game))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);
}

fn render_table(game: &Game, area: Rect, buf: &mut Buffer) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(8),    // board + questions
            Constraint::Length(3), // score + attempts
            Constraint::Length(3), // guess
            Constraint::Length(1), // notice
            Constraint::Length(1), // help
        ])
        .split(area);

    Paragraph::new(Line::from(vec![
        Span::styled("Playing: ", Style::default().add_modifier(Modifier::DIM)),
        Span::styled(game.player(), bold()),
    ]))
    .render(rows[0], buf);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);
    render_board(game, middle[0], buf);
    render_questions(game, middle[1], buf);

    let status = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(16), Constraint::Min(10)])
        .split(rows[2]);
    Paragraph::new(format!("{} pts", game.round().score()))
        .style(bold())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Score"))
        .render(status[0], buf);
    let progress = game.round().progress().min(100) as u16;
    Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Attempts left"))
        .gauge_style(Style::default().fg(Color::Green).bg(Color::Red))
        .percent(progress)
        .label(game.attempts_label())
        .render(status[1], buf);

    let guess_title = if game.mode() == Mode::FinalGuess {
        "You have to guess the character"
    } else {
        "Dare to guess: who is it?"
    };
    let guess_focused = game.focus() == Focus::Guess && game.mode() != Mode::Finished;
    let cursor = if guess_focused { "_" } else { "" };
    Paragraph::new(format!("{}{cursor}", game.input()))
        .block(focused_block(guess_title, guess_focused))
        .render(rows[3], buf);

    Paragraph::new(notice_line(game))
        .alignment(Alignment::Center)
        .render(rows[4], buf);

    let help = match game.mode() {
        Mode::Finished => "(n)ew round   (q)uit and save score",
        Mode::FinalGuess => "type a name   enter guess",
        _ => "tab switch panel   arrows move   enter/space select   ctrl-r reset   esc quit",
    };
    Paragraph::new(Span::styled(help, Style::default().add_modifier(Modifier::ITALIC)))
        .alignment(Alignment::Center)
        .render(rows[5], buf);
}

fn render_board(game: &Game, area: Rect, buf: &mut Buffer) {
    let names: Vec<&str> = game.catalog().characters.iter().map(|c| c.name()).collect();
    let cell_width = names.iter().map(|n| n.width()).max().unwrap_or(0) + CELL_PADDING;
    let focused = game.focus() == Focus::Board && game.mode() == Mode::Playing;

    let lines: Vec<Line> = names
        .chunks(BOARD_COLUMNS)
        .enumerate()
        .map(|(row, chunk)| {
            let spans = chunk
                .iter()
                .enumerate()
                .map(|(col, name)| {
                    let idx = row * BOARD_COLUMNS + col;
                    let mut style = if game.is_crossed(idx) {
                        Style::default()
                            .add_modifier(Modifier::CROSSED_OUT | Modifier::DIM)
                    } else {
                        bold()
                    };
                    if focused && idx == game.board_cursor() {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    let pad = " ".repeat(cell_width.saturating_sub(name.width()));
                    Span::styled(format!("{name}{pad}"), style)
                })
                .collect::<Vec<Span>>();
            Line::from(spans)
        })
        .collect();

    Paragraph::new(lines)
        .block(focused_block("Characters", focused))
        .render(area, buf);
}

fn render_questions(game: &Game, area: Rect, buf: &mut Buffer) {
    let focused = game.focus() == Focus::Questions && game.mode() == Mode::Playing;
    let lines: Vec<Line> = game
        .catalog()
        .questions
        .iter()
        .enumerate()
        .map(|(idx, q)| {
            let (mark, style) = match game.answer(idx) {
                Some(true) => ("yes", Style::default().fg(Color::Green)),
                Some(false) => ("no ", Style::default().fg(Color::Red)),
                None => ("   ", Style::default()),
            };
            let mut prompt_style = if game.answer(idx).is_some() {
                Style::default().add_modifier(Modifier::DIM)
            } else {
                Style::default()
            };
            if focused && idx == game.question_cursor() {
                prompt_style = prompt_style.add_modifier(Modifier::REVERSED);
            }
            Line::from(vec![
                Span::styled(format!("[{mark}] "), style),
                Span::styled(q.prompt.as_str(), prompt_style),
            ])
        })
        .collect();

    Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(focused_block("Questions", focused))
        .render(area, buf);
}
