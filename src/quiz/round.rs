//! Round controller: the pause / question / end-of-game state machine.
//!
//! The controller never touches the terminal. It exposes what should be on
//! screen (panels, banner, answer choices) and queues [`HostCommand`]s for
//! whatever drives it.

use tracing::{debug, error, info, warn};

use super::error::QuizError;
use super::question::Question;
use super::store::QuestionStore;
use crate::core::game::HostCommand;

const MAX_SPEED: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundConfig {
    /// Mistakes that end the session
    pub max_errors: u32,
    /// Multiplier applied to the pause countdown
    pub speed_multiplier: f32,
    /// Length of every pause, before the multiplier
    pub pause_duration: f32,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            max_errors: 3,
            speed_multiplier: 0.25,
            pause_duration: 1.0,
        }
    }
}

impl RoundConfig {
    pub fn validate(&self) -> Result<(), QuizError> {
        if !(self.speed_multiplier > 0.0 && self.speed_multiplier <= MAX_SPEED) {
            return Err(QuizError::InvalidConfig(format!(
                "speed multiplier must be in (0, {MAX_SPEED}], got {}",
                self.speed_multiplier
            )));
        }
        if !(self.pause_duration > 0.0 && self.pause_duration.is_finite()) {
            return Err(QuizError::InvalidConfig(format!(
                "pause duration must be a positive number, got {}",
                self.pause_duration
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Paused before the first question
    Intro,
    /// A question is on screen, waiting for the player
    AwaitingAnswer,
    /// Paused after an answer
    Feedback,
    Won,
    Lost,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Won | Phase::Lost)
    }
}

/// The one feedback text currently enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Banner {
    Correct,
    Incorrect,
    GameOver,
    Victory,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Panels {
    pub logo: bool,
    pub feedback: bool,
    pub hint_button: bool,
    pub hint_text: bool,
    /// Close and restart controls
    pub session_controls: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerChoice {
    pub label: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundState {
    pub pause_remaining: f32,
    pub error_count: u32,
    pub questions_shown: usize,
    pub total_questions: usize,
    pub is_paused: bool,
}

pub struct RoundController {
    config: RoundConfig,
    store: QuestionStore,
    state: RoundState,
    phase: Phase,
    current: Option<Question>,
    answers: Vec<AnswerChoice>,
    banner: Option<Banner>,
    panels: Panels,
    counter: String,
    commands: Vec<HostCommand>,
}

impl RoundController {
    pub fn new(config: RoundConfig, store: QuestionStore) -> Self {
        Self {
            config,
            store,
            state: RoundState::default(),
            phase: Phase::Intro,
            current: None,
            answers: Vec::new(),
            banner: None,
            panels: Panels::default(),
            counter: String::new(),
            commands: Vec::new(),
        }
    }

    // Lifecycle

    pub fn start(&mut self) {
        self.commands.push(HostCommand::SetTimeScale(1.0));
        self.panels.feedback = false;
        self.pause();
        self.state.total_questions = self.store.remaining_count();
        self.hide_banner();
        self.set_session_controls(false);
        info!(
            total = self.state.total_questions,
            max_errors = self.config.max_errors,
            "round controller started"
        );
    }

    /// Per-frame update. Only fails if the store runs dry behind our back.
    pub fn tick(&mut self, dt: f32) -> Result<(), QuizError> {
        if self.state.error_count >= self.config.max_errors {
            self.lose();
            return Ok(());
        }
        // A zero-length step never ends a pause, even a zero-length one
        if !self.state.is_paused || dt <= 0.0 {
            return Ok(());
        }

        self.state.pause_remaining -= dt * self.config.speed_multiplier;
        if self.state.pause_remaining > 0.0 {
            return Ok(());
        }

        self.resume();
        self.hide_banner();
        if self.store.remaining_count() > 0 {
            self.clear_answers();
            self.load_next_question()
        } else {
            self.win();
            Ok(())
        }
    }

    /// Enter the pause between rounds
    pub fn pause(&mut self) {
        self.state.is_paused = true;
        self.state.pause_remaining = self.config.pause_duration;
        if self.state.questions_shown == 0 {
            self.panels.logo = true;
            self.phase = Phase::Intro;
        } else {
            self.panels.feedback = true;
            self.phase = Phase::Feedback;
        }
    }

    fn resume(&mut self) {
        self.state.is_paused = false;
        self.panels.logo = false;
        self.panels.feedback = false;
    }

    pub fn load_next_question(&mut self) -> Result<(), QuizError> {
        let question = match self.store.take_random() {
            Ok(q) => q,
            Err(e) => {
                error!(error = %e, "asked for a question with an empty store");
                return Err(e);
            }
        };

        self.panels.hint_text = false;
        self.panels.hint_button = true;
        self.answers = question
            .answers
            .iter()
            .enumerate()
            .map(|(i, label)| AnswerChoice {
                label: label.clone(),
                is_correct: question.is_correct(i),
            })
            .collect();
        self.current = Some(question);

        self.state.questions_shown += 1;
        self.counter = format!(
            "Question {} of {}",
            self.state.questions_shown, self.state.total_questions
        );
        self.phase = Phase::AwaitingAnswer;
        debug!(shown = self.state.questions_shown, "question loaded");
        Ok(())
    }

    // Answer events

    /// The player activated answer control `index`
    pub fn choose(&mut self, index: usize) {
        if self.phase != Phase::AwaitingAnswer {
            warn!(index, phase = ?self.phase, "answer chosen while no question is open");
            return;
        }
        let Some(choice) = self.answers.get(index) else {
            warn!(index, options = self.answers.len(), "answer index out of range");
            return;
        };
        let correct = choice.is_correct;

        self.pause();
        if correct {
            self.on_correct_answer();
        } else {
            self.on_incorrect_answer();
        }
        self.clear_answers();
        self.panels.hint_button = false;
    }

    pub fn on_correct_answer(&mut self) {
        self.banner = Some(Banner::Correct);
        debug!("correct answer");
    }

    pub fn on_incorrect_answer(&mut self) {
        self.banner = Some(Banner::Incorrect);
        self.state.error_count += 1;
        debug!(errors = self.state.error_count, "incorrect answer");
    }

    pub fn show_hint(&mut self) {
        if !self.panels.hint_button {
            return;
        }
        self.panels.hint_text = true;
        self.panels.hint_button = false;
    }

    // Terminal states

    fn lose(&mut self) {
        if self.phase == Phase::Lost {
            return;
        }
        self.hide_banner();
        self.clear_answers();
        self.panels.hint_button = false;
        self.banner = Some(Banner::GameOver);
        self.freeze();
        self.phase = Phase::Lost;
        info!(errors = self.state.error_count, "session lost");
    }

    fn win(&mut self) {
        if self.phase == Phase::Won {
            return;
        }
        self.banner = Some(Banner::Victory);
        self.panels.logo = true;
        self.freeze();
        self.phase = Phase::Won;
        info!(
            shown = self.state.questions_shown,
            errors = self.state.error_count,
            "session won"
        );
    }

    fn freeze(&mut self) {
        self.commands.push(HostCommand::SetTimeScale(0.0));
        self.set_session_controls(true);
    }

    // Helpers

    fn hide_banner(&mut self) {
        self.banner = None;
    }

    fn clear_answers(&mut self) {
        self.answers.clear();
    }

    fn set_session_controls(&mut self, enabled: bool) {
        self.panels.session_controls = enabled;
    }

    pub fn drain_commands(&mut self) -> Vec<HostCommand> {
        std::mem::take(&mut self.commands)
    }

    // Accessors

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn panels(&self) -> &Panels {
        &self.panels
    }

    pub fn banner(&self) -> Option<Banner> {
        self.banner
    }

    pub fn answers(&self) -> &[AnswerChoice] {
        &self.answers
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    pub fn counter_text(&self) -> &str {
        &self.counter
    }

    pub fn remaining_questions(&self) -> usize {
        self.store.remaining_count()
    }

    /// Fraction of the current pause still to run, 1.0 right after pausing
    pub fn pause_progress(&self) -> f32 {
        if !self.state.is_paused || self.config.pause_duration <= 0.0 {
            return 0.0;
        }
        (self.state.pause_remaining / self.config.pause_duration).clamp(0.0, 1.0)
    }
}
