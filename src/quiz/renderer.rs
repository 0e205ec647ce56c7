use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::game::QuizGame;
use super::round::{Banner, Phase, RoundController};

const LOGO: &str = r"
  ___        _     _
 / _ \ _   _(_)___| |_ ___ _ __ _ __ ___
| | | | | | | |_  / __/ _ \ '__| '_ ` _ \
| |_| | |_| | |/ /| ||  __/ |  | | | | | |
 \__\_\\__,_|_/___|\__\___|_|  |_| |_| |_|
";

/// Pure rendering function - no game logic
pub fn render(frame: &mut Frame, game: &QuizGame) {
    let rc = game.controller();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Body
            Constraint::Length(3), // Status
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    render_header(frame, chunks[0], game.title(), rc);

    if rc.panels().logo {
        render_logo(frame, chunks[1], rc);
    } else {
        render_question(frame, chunks[1], game);
    }

    render_status(frame, chunks[2], rc);
    render_footer(frame, chunks[3], rc);
}

fn render_header(frame: &mut Frame, area: Rect, title: &str, rc: &RoundController) {
    let errors = format!(
        "Mistakes: {}/{}",
        rc.state().error_count,
        rc.config().max_errors
    );
    let line = Line::from(vec![
        Span::styled(
            format!(" {title} "),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::raw(rc.counter_text().to_string()),
        Span::raw("  "),
        Span::styled(errors, Style::default().fg(Color::Red)),
    ]);
    frame.render_widget(
        Paragraph::new(line)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center),
        area,
    );
}

fn render_logo(frame: &mut Frame, area: Rect, rc: &RoundController) {
    let caption = match rc.phase() {
        Phase::Won => "All questions answered!",
        _ => "Get ready...",
    };
    let text = format!("{LOGO}\n{caption}");
    frame.render_widget(
        Paragraph::new(text)
            .style(Style::default().fg(Color::Cyan))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn render_question(frame: &mut Frame, area: Rect, game: &QuizGame) {
    let rc = game.controller();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Prompt
            Constraint::Length(3), // Hint
            Constraint::Min(0),    // Answers
        ])
        .split(area);

    let prompt = rc
        .current_question()
        .map(|q| q.prompt.as_str())
        .unwrap_or_default();
    frame.render_widget(
        Paragraph::new(prompt)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(" Question ")),
        chunks[0],
    );

    if rc.panels().hint_text {
        let hint = rc
            .current_question()
            .filter(|q| q.has_hint())
            .map(|q| q.hint.as_str())
            .unwrap_or("No hint for this one.");
        frame.render_widget(
            Paragraph::new(hint)
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL).title(" Hint ")),
            chunks[1],
        );
    }

    let items: Vec<ListItem> = rc
        .answers()
        .iter()
        .enumerate()
        .map(|(i, a)| {
            let style = if i == game.cursor() {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let marker = if i == game.cursor() { "»" } else { " " };
            ListItem::new(format!(" {marker} [{}] {}", i + 1, a.label)).style(style)
        })
        .collect();
    frame.render_widget(
        List::new(items).block(Block::default().borders(Borders::ALL).title(" Answers ")),
        chunks[2],
    );
}

fn render_status(frame: &mut Frame, area: Rect, rc: &RoundController) {
    if let Some(banner) = rc.banner() {
        let (text, color) = match banner {
            Banner::Correct => ("Correct!", Color::Green),
            Banner::Incorrect => ("Wrong answer!", Color::Red),
            Banner::GameOver => ("GAME OVER - too many mistakes", Color::Red),
            Banner::Victory => ("YOU WIN!", Color::Green),
        };
        frame.render_widget(
            Paragraph::new(text)
                .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL)),
            area,
        );
        return;
    }

    if rc.state().is_paused {
        let label = match rc.phase() {
            Phase::Intro => "Starting",
            _ => "Next question",
        };
        frame.render_widget(
            Gauge::default()
                .block(Block::default().borders(Borders::ALL))
                .gauge_style(Style::default().fg(Color::Blue))
                .label(label)
                .ratio(f64::from(rc.pause_progress())),
            area,
        );
    }
}

fn render_footer(frame: &mut Frame, area: Rect, rc: &RoundController) {
    let panels = rc.panels();
    let mut keys: Vec<&str> = Vec::new();
    if rc.phase() == Phase::AwaitingAnswer {
        keys.push("[1-9] Answer  [↑/↓ + Enter] Select");
        if panels.hint_button {
            keys.push("[H] Hint");
        }
    }
    if panels.session_controls {
        keys.push("[R] Restart  [Q] Quit");
    }
    keys.push("[Esc] Exit");

    frame.render_widget(
        Paragraph::new(keys.join("  "))
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::game::{Context, Game};
    use crate::quiz::question::{Question, QuestionDeck};
    use crate::quiz::round::RoundConfig;
    use ratatui::{backend::TestBackend, Terminal};

    fn game(questions: usize, max_errors: u32) -> QuizGame {
        let deck = QuestionDeck {
            title: Some("Capitals".into()),
            questions: (0..questions)
                .map(|i| {
                    Question::new(format!("Capital of country {i}?"), vec!["Lima".into(), "Oslo".into()], 1)
                        .with_hint("Norway")
                })
                .collect(),
        };
        let config = RoundConfig {
            max_errors,
            speed_multiplier: 1.0,
            pause_duration: 1.0,
        };
        QuizGame::from_deck(deck, config, Some(1)).unwrap()
    }

    fn screen(game: &QuizGame) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| game.render(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn ctx() -> Context {
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        Context::new(tx)
    }

    #[test]
    fn intro_shows_logo_panel() {
        let mut g = game(2, 3);
        g.on_start(&ctx());
        let text = screen(&g);
        assert!(text.contains("Get ready..."));
        assert!(text.contains("Capitals"));
    }

    #[test]
    fn question_screen_lists_answers_and_counter() {
        let ctx = ctx();
        let mut g = game(2, 3);
        g.on_start(&ctx);
        g.on_tick(1.0, &ctx).unwrap();

        let text = screen(&g);
        assert!(text.contains("Question 1 of 2"));
        assert!(text.contains("[1] Lima"));
        assert!(text.contains("[2] Oslo"));
        assert!(text.contains("[H] Hint"));
        assert!(!text.contains("Norway"));
    }

    #[test]
    fn hint_appears_after_request() {
        let ctx = ctx();
        let mut g = game(1, 3);
        g.on_start(&ctx);
        g.on_tick(1.0, &ctx).unwrap();
        g.handle_input(
            crossterm::event::KeyEvent::new(
                crossterm::event::KeyCode::Char('h'),
                crossterm::event::KeyModifiers::NONE,
            ),
            &ctx,
        );

        assert!(screen(&g).contains("Norway"));
    }

    #[test]
    fn game_over_offers_restart() {
        let ctx = ctx();
        let mut g = game(2, 0);
        g.on_start(&ctx);
        g.on_tick(0.0, &ctx).unwrap();

        let text = screen(&g);
        assert!(text.contains("GAME OVER"));
        assert!(text.contains("[R] Restart"));
    }
}
