//! Ability estimation properties exercised through the public estimator and
//! quiz lifecycle APIs.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use proptest::prelude::*;

use adaptive_quiz_backend::irt::estimator::estimate_theta;
use adaptive_quiz_backend::irt::{
    AbilityEstimator, DifficultyLevel, DiscriminationSampler, IrtConfig, ResponseRecord,
};
use adaptive_quiz_backend::services::item_generator::{
    GenerationError, ItemGenerator, ItemRequest,
};
use adaptive_quiz_backend::services::quiz::RawItem;
use adaptive_quiz_backend::services::quiz_history::QuizHistory;
use adaptive_quiz_backend::services::quiz_lifecycle::{LifecycleSettings, QuizLifecycle};

// ============================================================================
// Fixtures
// ============================================================================

struct UniformGenerator {
    count: usize,
}

#[async_trait]
impl ItemGenerator for UniformGenerator {
    async fn generate(&self, _request: &ItemRequest) -> Result<Vec<RawItem>, GenerationError> {
        Ok((0..self.count)
            .map(|i| RawItem {
                text: format!("Question {i}"),
                item_type: "short".to_string(),
                options: Vec::new(),
                answer: format!("answer-{i}"),
                difficulty: ["basic", "intermediate", "advanced"][i % 3].to_string(),
                marks: 1.0,
                solution: String::new(),
            })
            .collect())
    }
}

fn lifecycle(count: usize) -> QuizLifecycle {
    let irt = IrtConfig::default();
    let sampler = DiscriminationSampler::seeded(irt.discrimination.clone(), 42);
    QuizLifecycle::new(
        Arc::new(AbilityEstimator::new(irt)),
        Arc::new(QuizHistory::new()),
        Arc::new(UniformGenerator { count }),
        sampler,
        LifecycleSettings {
            generation_timeout: Duration::from_secs(5),
            board: "CBSE".to_string(),
            class_name: "10".to_string(),
        },
    )
}

/// Answers the first half of the quiz correctly.
fn half_right(quiz: &adaptive_quiz_backend::services::quiz::QuizSession) -> HashMap<String, String> {
    quiz.questions
        .iter()
        .take(quiz.questions.len() / 2)
        .map(|q| (q.question_id.clone(), q.correct_answer.clone()))
        .collect()
}

// ============================================================================
// Estimator properties
// ============================================================================

#[test]
fn test_repeated_correct_answers_settle_at_the_bound() {
    let estimator = AbilityEstimator::default();
    let mut previous = estimator.get_ability();
    let mut deltas = Vec::new();
    for i in 0..6 {
        let theta = estimator
            .update_ability(&format!("q{i}"), true, 1.2, 0.0)
            .unwrap();
        deltas.push((theta - previous).abs());
        previous = theta;
    }

    for pair in deltas.windows(2) {
        assert!(pair[1] <= pair[0], "deltas grew: {deltas:?}");
    }
    assert_eq!(*deltas.last().unwrap(), 0.0);
}

#[test]
fn test_correct_answers_after_balanced_history_have_diminishing_steps() {
    let config = IrtConfig::default();
    let mut history: Vec<ResponseRecord> = (0..10)
        .flat_map(|i| {
            [
                ResponseRecord::new(format!("right{i}"), true, 1.0, 0.0),
                ResponseRecord::new(format!("wrong{i}"), false, 1.0, 0.0),
            ]
        })
        .collect();
    let mut theta = estimate_theta(0.0, &history, &config);
    assert!(theta.abs() < 1e-9);

    let mut deltas = Vec::new();
    for i in 0..10 {
        history.push(ResponseRecord::new(format!("easy{i}"), true, 0.5, 0.0));
        let next = estimate_theta(theta, &history, &config);
        deltas.push(next - theta);
        theta = next;
    }

    // Interior optimum: well clear of the clamp.
    assert!(theta > 0.0 && theta < 1.0, "theta = {theta}");
    assert!(deltas.iter().all(|d| *d > 0.0), "deltas: {deltas:?}");
    for pair in deltas.windows(2) {
        assert!(pair[1] < pair[0], "deltas did not shrink: {deltas:?}");
    }
}

#[test]
fn test_extreme_responses_stay_clipped() {
    let estimator = AbilityEstimator::default();
    for i in 0..20 {
        estimator.update_ability(&format!("up{i}"), true, 1.5, -3.0).unwrap();
    }
    assert!(estimator.get_ability() <= 10.0);
    assert_eq!(estimator.get_level(), DifficultyLevel::Advanced);

    for i in 0..40 {
        estimator.update_ability(&format!("down{i}"), false, 1.5, 3.0).unwrap();
    }
    let theta = estimator.get_ability();
    assert!((-10.0..=10.0).contains(&theta));
}

#[test]
fn test_pathological_parameters_do_not_overflow() {
    let estimator = AbilityEstimator::default();
    estimator.update_ability("huge", true, 1e6, -1e6).unwrap();
    estimator.update_ability("far", false, 1e-9, 1e9).unwrap();
    estimator.update_ability("steep", true, 1e150, 0.0).unwrap();

    let theta = estimator.get_ability();
    assert!(theta.is_finite());
    assert!((-10.0..=10.0).contains(&theta));
    assert_eq!(estimator.history_len(), 3);
}

#[test]
fn test_invalid_discrimination_leaves_state_unchanged() {
    let estimator = AbilityEstimator::default();
    estimator.update_ability("q0", true, 1.2, 0.0).unwrap();
    let before = estimator.snapshot();

    assert!(estimator.update_ability("bad", true, 0.0, 0.0).is_err());
    assert!(estimator.update_ability("bad", true, -1.0, 0.0).is_err());

    let after = estimator.snapshot();
    assert_eq!(before.ability, after.ability);
    assert_eq!(before.responses, after.responses);
}

// ============================================================================
// Lifecycle properties
// ============================================================================

#[tokio::test]
async fn test_resubmission_appends_every_item_again() {
    let lifecycle = lifecycle(4);
    let quiz = lifecycle.generate_quiz("Mathematics", Some("Algebra")).await.unwrap();
    let responses = half_right(&quiz);

    let first = lifecycle.evaluate_quiz(&quiz.quiz_id, &responses).unwrap();
    assert_eq!(lifecycle.estimator().history_len(), 4);
    let second = lifecycle.evaluate_quiz(&quiz.quiz_id, &responses).unwrap();
    assert_eq!(lifecycle.estimator().history_len(), 8);
    assert_eq!(first.score, second.score);

    // Theta reflects all eight records, not the four of a single submission.
    let history = lifecycle.estimator().history();
    let replay = AbilityEstimator::default();
    let replayed = replay.record_responses(history.clone()).unwrap();
    assert_eq!(replayed, second.updated_ability);

    let single = AbilityEstimator::default();
    single.record_responses(history[..4].to_vec()).unwrap();
    assert_eq!(single.get_ability(), first.updated_ability);
}

#[tokio::test]
async fn test_history_holds_evaluated_score() {
    let lifecycle = lifecycle(4);
    let quiz = lifecycle.generate_quiz("Science", None).await.unwrap();
    assert_eq!(lifecycle.history().get(&quiz.quiz_id).unwrap().score, 0.0);

    let outcome = lifecycle.evaluate_quiz(&quiz.quiz_id, &half_right(&quiz)).unwrap();
    assert_eq!(outcome.score, 2.0);

    let entries = lifecycle.history_entries();
    let entry = &entries[&quiz.quiz_id];
    assert_eq!(entry.score, 2.0);
    assert_eq!(entry.total_marks, 4.0);
    assert_eq!(entry.questions.len(), 4);
}

#[tokio::test]
async fn test_concurrent_evaluations_keep_every_record() {
    let lifecycle = Arc::new(lifecycle(3));
    let mut quizzes = Vec::new();
    for _ in 0..8 {
        quizzes.push(lifecycle.generate_quiz("Science", Some("Physics")).await.unwrap());
    }

    std::thread::scope(|scope| {
        for quiz in &quizzes {
            let lifecycle = Arc::clone(&lifecycle);
            scope.spawn(move || {
                lifecycle.evaluate_quiz(&quiz.quiz_id, &half_right(quiz)).unwrap();
            });
        }
    });

    assert_eq!(lifecycle.estimator().history_len(), 8 * 3);
    let theta = lifecycle.estimator().get_ability();
    assert!(theta.is_finite());
}

// ============================================================================
// Property-based tests
// ============================================================================

fn arb_record() -> impl Strategy<Value = ResponseRecord> {
    (any::<bool>(), 0.01f64..50.0, -20.0f64..20.0)
        .prop_map(|(correct, a, b)| ResponseRecord::new("q", correct, a, b))
}

proptest! {
    #[test]
    fn prop_theta_bounded_and_finite(records in prop::collection::vec(arb_record(), 1..40)) {
        let estimator = AbilityEstimator::default();
        for record in records {
            let theta = estimator
                .update_ability(&record.question_id, record.correct, record.a, record.b)
                .unwrap();
            prop_assert!(theta.is_finite());
            prop_assert!((-10.0..=10.0).contains(&theta));
        }
    }

    #[test]
    fn prop_level_is_function_of_theta(theta in -20.0f64..20.0) {
        let thresholds = IrtConfig::default().levels;
        let level = DifficultyLevel::from_theta(theta, &thresholds);
        let expected = if theta <= 0.0 {
            DifficultyLevel::Basic
        } else if theta < 1.0 {
            DifficultyLevel::Intermediate
        } else {
            DifficultyLevel::Advanced
        };
        prop_assert_eq!(level, expected);
        prop_assert_eq!(DifficultyLevel::from_theta(theta, &thresholds), level);
    }
}
