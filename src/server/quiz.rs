//! Random question selection for quiz rounds.

use std::collections::HashSet;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};
use tokio::sync::Mutex;

use crate::db::Question;

/// Picks one of `candidates` not listed in `previous` uniformly at random.
/// `None` means the quiz has run out of unseen questions.
pub fn select_question<R>(
    candidates: Vec<Question>,
    previous: &HashSet<i64>,
    rng: &mut R,
) -> Option<Question>
where
    R: Rng + ?Sized,
{
    candidates
        .into_iter()
        .filter(|question| !previous.contains(&question.id))
        .choose(rng)
}

/// Shared random source for quiz rounds.
#[derive(Clone)]
pub struct QuizPicker {
    rng: Arc<Mutex<StdRng>>,
}

impl QuizPicker {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        QuizPicker {
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    pub async fn pick(&self, candidates: Vec<Question>, previous: &HashSet<i64>) -> Option<Question> {
        let mut rng = self.rng.lock().await;
        select_question(candidates, previous, &mut *rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions(ids: impl IntoIterator<Item = i64>) -> Vec<Question> {
        ids.into_iter()
            .map(|id| Question {
                id,
                question: format!("question {id}"),
                answer: "answer".to_owned(),
                category: 1,
                difficulty: 1,
            })
            .collect()
    }

    #[test]
    fn never_returns_previous_questions() {
        let mut rng = StdRng::seed_from_u64(7);
        let previous: HashSet<i64> = [1, 2, 3, 5, 8].into();
        for _ in 0..200 {
            let picked = select_question(questions(1..=10), &previous, &mut rng).unwrap();
            assert!(!previous.contains(&picked.id));
        }
    }

    #[test]
    fn exhausted_pool_returns_none() {
        let mut rng = StdRng::seed_from_u64(7);
        let previous: HashSet<i64> = (1..=4).collect();
        assert!(select_question(questions(1..=4), &previous, &mut rng).is_none());
        assert!(select_question(Vec::new(), &HashSet::new(), &mut rng).is_none());
    }

    #[test]
    fn single_remaining_candidate_is_always_picked() {
        let mut rng = StdRng::seed_from_u64(99);
        let previous: HashSet<i64> = [1, 3].into();
        let picked = select_question(questions(1..=3), &previous, &mut rng).unwrap();
        assert_eq!(picked.id, 2);
    }

    #[test]
    fn same_seed_same_sequence() {
        let previous = HashSet::new();
        let mut a = StdRng::seed_from_u64(11);
        let mut b = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            assert_eq!(
                select_question(questions(1..=10), &previous, &mut a),
                select_question(questions(1..=10), &previous, &mut b)
            );
        }
    }

    #[tokio::test]
    async fn picker_spreads_over_candidates() {
        let picker = QuizPicker::new(None);
        let previous = HashSet::new();
        let mut seen = HashSet::new();
        for _ in 0..100 {
            let picked = picker.pick(questions(1..=5), &previous).await.unwrap();
            seen.insert(picked.id);
        }
        assert!(seen.len() > 1);
    }
}
