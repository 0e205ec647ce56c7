use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use super::error::QuizError;

const BUILTIN_DECK: &str = include_str!("../../assets/questions.json");

/// A single multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub answers: Vec<String>,
    pub correct_index: usize,
    #[serde(default)]
    pub hint: String,
}

impl Question {
    pub fn new(prompt: impl Into<String>, answers: Vec<String>, correct_index: usize) -> Self {
        Self {
            prompt: prompt.into(),
            answers,
            correct_index,
            hint: String::new(),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = hint.into();
        self
    }

    pub fn has_hint(&self) -> bool {
        !self.hint.trim().is_empty()
    }

    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_index
    }

    /// `index` is the question's position in its deck, used for error reporting
    pub fn validate(&self, index: usize) -> Result<(), QuizError> {
        if self.answers.is_empty() {
            return Err(QuizError::InvalidQuestion {
                index,
                reason: "no answers".into(),
            });
        }
        if self.correct_index >= self.answers.len() {
            return Err(QuizError::InvalidQuestion {
                index,
                reason: format!(
                    "correct_index {} out of range for {} answers",
                    self.correct_index,
                    self.answers.len()
                ),
            });
        }
        Ok(())
    }
}

/// The question asset as stored on disk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionDeck {
    #[serde(default)]
    pub title: Option<String>,
    pub questions: Vec<Question>,
}

impl QuestionDeck {
    pub fn from_json(text: &str) -> Result<Self, QuizError> {
        let deck: QuestionDeck = serde_json::from_str(text)?;
        deck.validate()?;
        Ok(deck)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, QuizError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading question deck");
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// The deck compiled into the binary
    pub fn builtin() -> Result<Self, QuizError> {
        Self::from_json(BUILTIN_DECK)
    }

    pub fn validate(&self) -> Result<(), QuizError> {
        self.questions
            .iter()
            .enumerate()
            .try_for_each(|(i, q)| q.validate(i))
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("Quiz")
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
