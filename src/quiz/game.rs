use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use tracing::info;

use super::question::QuestionDeck;
use super::round::{Phase, RoundConfig, RoundController};
use super::store::QuestionStore;
use crate::core::game::{Context, Game, HostCommand};

/// Terminal front-end for a [`RoundController`]
pub struct QuizGame {
    title: String,
    controller: RoundController,
    cursor: usize,
}

impl QuizGame {
    pub fn new(title: impl Into<String>, controller: RoundController) -> Self {
        Self {
            title: title.into(),
            controller,
            cursor: 0,
        }
    }

    /// New session over a deck. `seed` makes the draw order reproducible.
    pub fn from_deck(deck: QuestionDeck, config: RoundConfig, seed: Option<u64>) -> Result<Self> {
        config.validate()?;
        deck.validate()?;
        let title = deck.title().to_string();
        let store = match seed {
            Some(seed) => QuestionStore::seeded(deck.questions, seed),
            None => QuestionStore::new(deck.questions),
        };
        Ok(Self::new(title, RoundController::new(config, store)))
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn controller(&self) -> &RoundController {
        &self.controller
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Reload the whole session from scratch
    pub fn reset_session(&self, ctx: &Context) {
        info!("player asked for a new session");
        ctx.send_command(HostCommand::ResetSession);
    }

    pub fn exit_application(&self, ctx: &Context) {
        info!("player asked to leave");
        ctx.send_command(HostCommand::Exit);
    }

    fn choose(&mut self, index: usize, ctx: &Context) {
        self.controller.choose(index);
        self.cursor = 0;
        ctx.send_all(self.controller.drain_commands());
    }

    fn handle_question_keys(&mut self, code: KeyCode, ctx: &Context) {
        let options = self.controller.answers().len();
        match code {
            KeyCode::Up => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down => self.cursor = (self.cursor + 1).min(options.saturating_sub(1)),
            KeyCode::Enter => self.choose(self.cursor, ctx),
            KeyCode::Char('h') => self.controller.show_hint(),
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if index < options {
                    self.choose(index, ctx);
                }
            }
            _ => {}
        }
    }
}

impl Game for QuizGame {
    fn on_start(&mut self, ctx: &Context) {
        self.controller.start();
        ctx.send_all(self.controller.drain_commands());
    }

    fn on_tick(&mut self, dt: f32, ctx: &Context) -> Result<()> {
        self.controller.tick(dt)?;
        ctx.send_all(self.controller.drain_commands());
        Ok(())
    }

    fn handle_input(&mut self, event: KeyEvent, ctx: &Context) {
        if self.controller.panels().session_controls {
            match event.code {
                KeyCode::Char('r') => self.reset_session(ctx),
                KeyCode::Char('q') => self.exit_application(ctx),
                _ => {}
            }
            return;
        }

        if self.controller.phase() == Phase::AwaitingAnswer {
            self.handle_question_keys(event.code, ctx);
        }
    }

    fn render(&self, frame: &mut ratatui::Frame) {
        super::renderer::render(frame, self);
    }
}
