use crate::board::{AssignmentBoard, COLUMNS};
use crate::presenter::{self, format_deadline_at, TimeFormat};
use crate::reply::{Reply, Tone};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;

const HELP: &str = "a add · c command · d remove · ←/→ column · ↑/↓ select · r reload · q quit";

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, board: &mut AssignmentBoard) -> io::Result<()> {
    loop {
        terminal.draw(|f| draw(f, board))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Char('a') => {
                    if let Some(name) = prompt("Enter assignment name") {
                        if let Some(deadline) = prompt("Enter deadline (YYYY-MM-DD HH:MM)") {
                            let details = prompt("Enter details (optional)").filter(|d| !d.is_empty());
                            let priority = prompt("Enter priority 1-5 (optional)")
                                .and_then(|p| p.parse::<i64>().ok());
                            board.add(name, deadline, details, priority);
                        }
                    }
                }
                KeyCode::Char('c') => {
                    if let Some(message) = prompt("Enter command (e.g. !help)") {
                        board.send_message(&message);
                    }
                }
                KeyCode::Char('d') => board.remove_selected(),
                KeyCode::Char('r') => {
                    if let Err(e) = board.reload() {
                        board.status = Some(Reply::from_error(&e));
                    }
                }
                KeyCode::Left => board.move_column(-1),
                KeyCode::Right => board.move_column(1),
                KeyCode::Up => board.move_selection(-1),
                KeyCode::Down => board.move_selection(1),
                _ => {}
            }
        }
    }
}

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Success => Color::Green,
        Tone::Info => Color::Blue,
        Tone::Warning => Color::Yellow,
        Tone::Error => Color::Red,
    }
}

pub fn draw(f: &mut Frame, board: &AssignmentBoard) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Min(5), Constraint::Length(6)])
        .split(f.area());
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    let now = presenter::now();
    for (i, title) in COLUMNS.iter().enumerate() {
        let items: Vec<ListItem> = board
            .entries(i)
            .iter()
            .enumerate()
            .map(|(j, (name, assignment))| {
                let style = if board.selected_column == i && board.selected_entry == j {
                    Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(vec![
                    Span::raw(format!("[{}] ", assignment.priority)),
                    Span::styled(name.as_str(), style.fg(Color::White)),
                    Span::raw(format!(
                        " ({})",
                        format_deadline_at(assignment.deadline, TimeFormat::Relative, now)
                    )),
                ]))
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .title(*title)
                .borders(Borders::ALL)
                .border_style(if board.selected_column == i {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default()
                }),
        );

        f.render_widget(list, columns[i]);
    }

    let (text, color) = match &board.status {
        Some(reply) => (reply.to_plain_text(), tone_color(reply.tone)),
        None => (HELP.to_string(), Color::Gray),
    };
    let status = Paragraph::new(text)
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: false })
        .block(Block::default().title("STATUS").borders(Borders::ALL));
    f.render_widget(status, rows[1]);
}

fn prompt(message: &str) -> Option<String> {
    disable_raw_mode().ok();
    println!("{}", message);
    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_ok() {
        enable_raw_mode().ok();
        Some(input.trim().to_string())
    } else {
        enable_raw_mode().ok();
        None
    }
}
