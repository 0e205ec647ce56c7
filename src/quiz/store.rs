use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::error::QuizError;
use super::question::Question;

/// Remaining questions of a session. Draws are destructive: a drawn
/// question is never seen again.
#[derive(Debug)]
pub struct QuestionStore {
    questions: Vec<Question>,
    rng: StdRng,
}

impl QuestionStore {
    pub fn new(questions: Vec<Question>) -> Self {
        Self::with_rng(questions, StdRng::from_os_rng())
    }

    /// Same deck, same seed, same draw order
    pub fn seeded(questions: Vec<Question>, seed: u64) -> Self {
        Self::with_rng(questions, StdRng::seed_from_u64(seed))
    }

    fn with_rng(questions: Vec<Question>, rng: StdRng) -> Self {
        Self { questions, rng }
    }

    pub fn remaining_count(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Removes and returns a uniformly random remaining question
    pub fn take_random(&mut self) -> Result<Question, QuizError> {
        if self.questions.is_empty() {
            return Err(QuizError::EmptyStore);
        }
        let index = self.rng.random_range(0..self.questions.len());
        let question = self.questions.remove(index);
        debug!(index, remaining = self.questions.len(), "drew question");
        Ok(question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn deck(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| Question::new(format!("q{i}"), vec!["yes".into(), "no".into()], 0))
            .collect()
    }

    #[test]
    fn draws_every_question_exactly_once() {
        let mut store = QuestionStore::seeded(deck(10), 7);
        let mut seen = HashSet::new();

        for n in 1..=10 {
            let q = store.take_random().unwrap();
            assert!(seen.insert(q.prompt), "question drawn twice");
            assert_eq!(store.remaining_count(), 10 - n);
        }
        assert!(store.is_empty());
    }

    #[test]
    fn empty_store_refuses_to_draw() {
        let mut store = QuestionStore::new(Vec::new());
        assert_eq!(store.remaining_count(), 0);
        assert!(matches!(store.take_random(), Err(QuizError::EmptyStore)));
    }

    #[test]
    fn exhausted_store_refuses_to_draw() {
        let mut store = QuestionStore::seeded(deck(1), 1);
        store.take_random().unwrap();
        assert!(matches!(store.take_random(), Err(QuizError::EmptyStore)));
    }

    #[test]
    fn same_seed_same_order() {
        let mut a = QuestionStore::seeded(deck(6), 42);
        let mut b = QuestionStore::seeded(deck(6), 42);
        for _ in 0..6 {
            assert_eq!(a.take_random().unwrap(), b.take_random().unwrap());
        }
    }

    #[test]
    fn draws_are_uniform() {
        const K: usize = 4;
        const TRIALS: usize = 40_000;
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        let mut counts = [0usize; K];

        for _ in 0..TRIALS {
            let mut store = QuestionStore::with_rng(deck(K), StdRng::seed_from_u64(rng.random()));
            let q = store.take_random().unwrap();
            let i: usize = q.prompt[1..].parse().unwrap();
            counts[i] += 1;
        }

        // expected 10_000 each, std dev ~87
        let expected = TRIALS / K;
        for (i, &c) in counts.iter().enumerate() {
            assert!(
                c.abs_diff(expected) < 500,
                "question {i} drawn {c} times, expected ~{expected}"
            );
        }
    }
}
