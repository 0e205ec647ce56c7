use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, Level};

use crate::core::engine::Engine;
use crate::quiz::{QuestionDeck, QuizGame, RoundConfig};

#[derive(Parser)]
#[command(name = "quizterm")]
#[command(about = "❓ A multiple-choice quiz for the terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// File the log is written to (the terminal belongs to the game)
    #[arg(long, global = true, default_value = "quizterm.log")]
    pub log_file: PathBuf,

    /// Log verbosity: error, warn, info, debug or trace
    #[arg(long, global = true, default_value = "info")]
    pub log_level: Level,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Play a quiz session (default)
    Play(PlayArgs),
    /// Validate a question deck and print a summary
    Check {
        /// Path to a JSON question deck
        path: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct PlayArgs {
    /// JSON question deck; the built-in deck is used when omitted
    #[arg(short, long)]
    pub questions: Option<PathBuf>,

    /// Mistakes allowed before the game is lost
    #[arg(short, long, default_value_t = 3)]
    pub max_errors: u32,

    /// Speed of the pause countdown between questions
    #[arg(short, long, default_value_t = 0.25)]
    pub speed: f32,

    /// Length of the pause between questions, before the speed multiplier
    #[arg(long, default_value_t = 1.0)]
    pub pause: f32,

    /// Seed for a reproducible question order
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Default for PlayArgs {
    fn default() -> Self {
        let config = RoundConfig::default();
        Self {
            questions: None,
            max_errors: config.max_errors,
            speed: config.speed_multiplier,
            pause: config.pause_duration,
            seed: None,
        }
    }
}

impl PlayArgs {
    pub fn round_config(&self) -> RoundConfig {
        RoundConfig {
            max_errors: self.max_errors,
            speed_multiplier: self.speed,
            pause_duration: self.pause,
        }
    }

    pub fn load_deck(&self) -> Result<QuestionDeck> {
        match &self.questions {
            Some(path) => QuestionDeck::load(path)
                .with_context(|| format!("loading deck {}", path.display())),
            None => Ok(QuestionDeck::builtin()?),
        }
    }
}

/// Installs the fmt subscriber, writing to `path`
pub fn init_logging(path: &PathBuf, level: Level) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .init();
    Ok(())
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Check { path }) => check_deck(&path),
        Some(Commands::Play(args)) => {
            init_logging(&cli.log_file, cli.log_level)?;
            play(args).await
        }
        None => {
            init_logging(&cli.log_file, cli.log_level)?;
            play(PlayArgs::default()).await
        }
    }
}

fn check_deck(path: &PathBuf) -> Result<()> {
    let deck = QuestionDeck::load(path).with_context(|| format!("checking deck {}", path.display()))?;
    println!("📦 {}", deck.title());
    println!("   {} questions", deck.len());
    let hinted = deck.questions.iter().filter(|q| q.has_hint()).count();
    println!("   {} with hints", hinted);
    for (i, q) in deck.questions.iter().enumerate() {
        println!("   {:>3}. {} ({} answers)", i + 1, q.prompt, q.answers.len());
    }
    Ok(())
}

async fn play(args: PlayArgs) -> Result<()> {
    let deck = args.load_deck()?;
    let config = args.round_config();
    config.validate()?;
    info!(title = deck.title(), questions = deck.len(), ?config, "starting quiz");

    let seed = args.seed;
    let engine: Engine<QuizGame> = Engine::new(Box::new(move || {
        QuizGame::from_deck(deck.clone(), config, seed)
    }));

    let terminal = ratatui::init();
    let result = engine.run(terminal).await;
    ratatui::restore();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_defaults_to_play() {
        let cli = Cli::try_parse_from(["quizterm"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.log_level, Level::INFO);
        assert_eq!(cli.log_file, PathBuf::from("quizterm.log"));
    }

    #[test]
    fn play_flags_become_round_config() {
        let cli = Cli::try_parse_from([
            "quizterm", "play", "--max-errors", "5", "--speed", "1.5", "--pause", "2", "--seed", "11",
        ])
        .unwrap();
        let Some(Commands::Play(args)) = cli.command else {
            panic!("expected play");
        };

        let config = args.round_config();
        assert_eq!(config.max_errors, 5);
        assert_eq!(config.speed_multiplier, 1.5);
        assert_eq!(config.pause_duration, 2.0);
        assert_eq!(args.seed, Some(11));
    }

    #[test]
    fn defaults_match_round_config_defaults() {
        let cli = Cli::try_parse_from(["quizterm", "play"]).unwrap();
        let Some(Commands::Play(args)) = cli.command else {
            panic!("expected play");
        };
        assert_eq!(args.round_config(), RoundConfig::default());
        assert_eq!(PlayArgs::default().round_config(), RoundConfig::default());
    }

    #[test]
    fn builtin_deck_loads_without_path() {
        let deck = PlayArgs::default().load_deck().unwrap();
        assert!(!deck.is_empty());
    }

    #[test]
    fn check_requires_a_path() {
        assert!(Cli::try_parse_from(["quizterm", "check"]).is_err());
    }
}
