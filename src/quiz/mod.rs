//! The quiz mini-game: question assets, the round state machine and its
//! terminal front-end.
pub mod error;
pub mod game;
pub mod question;
pub mod renderer;
pub mod round;
pub mod store;

pub use error::QuizError;
pub use game::QuizGame;
pub use question::{Question, QuestionDeck};
pub use round::{AnswerChoice, Banner, Panels, Phase, RoundConfig, RoundController, RoundState};
pub use store::QuestionStore;
