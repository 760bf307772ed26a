use std::io;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use tt_core::{Label, Stats, TERMINAL_LABELS, shares_token};

use crate::app::App;

/// Set up the terminal, run the blocking event loop, restore the terminal
/// on the way out — including through a panic.
pub fn run(app: &mut App) -> Result<()> {
    enable_raw_mode()?;
    crossterm::execute!(io::stdout(), EnterAlternateScreen)?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_terminal();
        original_hook(info);
    }));

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, app);
    restore_terminal();
    result
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(io::stdout(), LeaveAlternateScreen);
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    while !app.should_quit() {
        terminal.draw(|frame| draw(frame, app))?;

        // one key press, one action, one queue recomputation
        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && let KeyCode::Char(c) = key.code
        {
            app.handle_key(c.to_ascii_lowercase())?;
        }
    }
    Ok(())
}

fn draw(frame: &mut ratatui::Frame, app: &App) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(outer[0]);

    draw_label_panels(frame, app, columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Min(3)])
        .split(columns[1]);

    draw_stats(frame, app, right[0]);
    draw_queue(frame, app, right[1]);
    draw_status(frame, app, outer[1]);
}

/// One panel per terminal label, most recent classification on top, the
/// last-classified term highlighted in its panel.
fn draw_label_panels(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, 5); 5])
        .split(area);

    let store = app.session().store();
    let last = store.last_classified();

    for (label, rect) in TERMINAL_LABELS.iter().zip(rows.iter()) {
        let items: Vec<ListItem> = store
            .terms_with_label_ordered(*label)
            .iter()
            .rev()
            .map(|t| {
                let style = if last.is_some_and(|l| l.string == t.string) {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(Span::styled(t.string.clone(), style))
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(label.title()),
        );
        frame.render_widget(list, *rect);
    }
}

fn draw_stats(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let stats = Stats::collect(app.session().store(), app.session().related_count());
    let panel = Paragraph::new(stats.lines().join("\n"))
        .block(Block::default().borders(Borders::ALL).title("Stats"));
    frame.render_widget(panel, area);
}

/// The work queue: head reversed, terms sharing a token with the active
/// anchor in red.
fn draw_queue(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let anchor = app.session().anchor();
    let title = match app.session().review() {
        Label::None => "Terms".to_string(),
        review => format!("Terms [review: {}]", review.name()),
    };

    let items: Vec<ListItem> = app
        .session()
        .queue()
        .iter()
        .enumerate()
        .map(|(i, term)| {
            let mut style = Style::default();
            if !anchor.is_empty() && shares_token(term, anchor) {
                style = style.fg(Color::Red);
            }
            if i == 0 {
                style = style.add_modifier(Modifier::REVERSED);
            }
            ListItem::new(Span::styled(term.clone(), style))
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);
}

fn draw_status(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let line = match app.status() {
        Some(msg) => msg.to_string(),
        None => key_help(),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn key_help() -> String {
    let mut parts: Vec<String> = TERMINAL_LABELS
        .iter()
        .filter_map(|l| l.key().map(|k| format!("{k}={}", l.name())))
        .collect();
    parts.push("u=undo".to_string());
    parts.push("w=write".to_string());
    parts.push("q=quit".to_string());
    parts.join("  ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_help_lists_every_label_key() {
        let help = key_help();
        for label in TERMINAL_LABELS {
            assert!(help.contains(label.key().unwrap()));
            assert!(help.contains(label.name()));
        }
        assert!(help.contains("u=undo"));
    }
}
