#[derive(thiserror::Error, Debug)]
pub enum QuizError {
    #[error("no questions left to draw")]
    EmptyStore,

    #[error("question {index} is invalid: {reason}")]
    InvalidQuestion { index: usize, reason: String },

    #[error("invalid round config: {0}")]
    InvalidConfig(String),

    #[error("could not read question deck: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse question deck: {0}")]
    Parse(#[from] serde_json::Error),
}
