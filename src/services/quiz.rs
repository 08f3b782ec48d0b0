use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::irt::{DifficultyLevel, ResponseRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionType {
    #[serde(rename = "MCQ")]
    Mcq,
    #[serde(rename = "short")]
    Short,
    #[serde(rename = "true_false")]
    TrueFalse,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mcq => "MCQ",
            Self::Short => "short",
            Self::TrueFalse => "true_false",
        }
    }

    /// Accepts the loose spellings models produce ("MCQ", "true false", "True/False", "short answer").
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "mcq" | "mcqs" | "multiplechoice" => Some(Self::Mcq),
            "short" | "shortanswer" => Some(Self::Short),
            "truefalse" | "tf" | "boolean" => Some(Self::TrueFalse),
            _ => None,
        }
    }
}

/// A candidate question as handed over by the item generator, before it gets
/// an id and IRT parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawItem {
    pub text: String,
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub answer: String,
    pub difficulty: String,
    pub marks: f64,
    #[serde(default)]
    pub solution: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question_id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub difficulty: DifficultyLevel,
    pub marks: f64,
    pub solution_steps: String,
    pub irt_a: f64,
    pub irt_b: f64,
}

impl Question {
    pub fn is_correct(&self, answer: Option<&str>) -> bool {
        answer == Some(self.correct_answer.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizMetadata {
    pub generated_at: DateTime<Utc>,
    pub board: String,
    #[serde(rename = "class")]
    pub class_name: String,
    pub subject: String,
    pub topic: Option<String>,
    pub student_level: DifficultyLevel,
    pub student_ability: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizStatus {
    Created,
    Graded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSession {
    pub quiz_id: String,
    pub metadata: QuizMetadata,
    pub questions: Vec<Question>,
    pub score: f64,
    pub total_marks: f64,
    pub status: QuizStatus,
    pub submissions: u32,
    pub updated_at: DateTime<Utc>,
}

impl QuizSession {
    pub fn new(quiz_id: String, metadata: QuizMetadata, questions: Vec<Question>) -> Self {
        let total_marks = questions.iter().map(|q| q.marks).sum();
        let updated_at = metadata.generated_at;
        Self {
            quiz_id,
            metadata,
            questions,
            score: 0.0,
            total_marks,
            status: QuizStatus::Created,
            submissions: 0,
            updated_at,
        }
    }

    /// Grades `responses` against the stored answers without touching the session.
    /// Records come out in question order.
    pub fn grade(&self, responses: &HashMap<String, String>) -> Grading {
        let mut score = 0.0;
        let mut records = Vec::with_capacity(self.questions.len());
        for question in &self.questions {
            let answer = responses.get(&question.question_id).map(String::as_str);
            let correct = question.is_correct(answer);
            if correct {
                score += question.marks;
            }
            records.push(ResponseRecord::new(
                question.question_id.clone(),
                correct,
                question.irt_a,
                question.irt_b,
            ));
        }
        Grading {
            score,
            total_marks: self.questions.iter().map(|q| q.marks).sum(),
            records,
        }
    }

    pub fn apply_grading(&mut self, score: f64, total_marks: f64, at: DateTime<Utc>) {
        self.score = score;
        self.total_marks = total_marks;
        self.status = QuizStatus::Graded;
        self.submissions += 1;
        self.updated_at = at;
    }
}

#[derive(Debug, Clone)]
pub struct Grading {
    pub score: f64,
    pub total_marks: f64,
    pub records: Vec<ResponseRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationOutcome {
    pub quiz_id: String,
    pub score: f64,
    pub total_marks: f64,
    pub percentage: f64,
    pub updated_ability: f64,
    pub updated_level: DifficultyLevel,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub score: f64,
    pub total_marks: f64,
    pub questions: Vec<Question>,
    pub timestamp: DateTime<Utc>,
}

impl From<&QuizSession> for HistoryEntry {
    fn from(session: &QuizSession) -> Self {
        Self {
            score: session.score,
            total_marks: session.total_marks,
            questions: session.questions.clone(),
            timestamp: session.updated_at,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn question(id: &str, answer: &str, marks: f64) -> Question {
        Question {
            question_id: id.to_string(),
            text: format!("question {id}"),
            question_type: QuestionType::Short,
            options: Vec::new(),
            correct_answer: answer.to_string(),
            difficulty: DifficultyLevel::Intermediate,
            marks,
            solution_steps: String::new(),
            irt_a: 1.2,
            irt_b: 0.0,
        }
    }

    pub fn session(quiz_id: &str, questions: Vec<Question>) -> QuizSession {
        QuizSession::new(
            quiz_id.to_string(),
            QuizMetadata {
                generated_at: Utc::now(),
                board: "SSC Maharashtra".to_string(),
                class_name: "10".to_string(),
                subject: "Mathematics".to_string(),
                topic: Some("Algebra".to_string()),
                student_level: DifficultyLevel::Basic,
                student_ability: 0.0,
            },
            questions,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_question_type_parse() {
        assert_eq!(QuestionType::parse("MCQ"), Some(QuestionType::Mcq));
        assert_eq!(QuestionType::parse("true false"), Some(QuestionType::TrueFalse));
        assert_eq!(QuestionType::parse("True/False"), Some(QuestionType::TrueFalse));
        assert_eq!(QuestionType::parse("Short Answer"), Some(QuestionType::Short));
        assert_eq!(QuestionType::parse("essay"), None);
    }

    #[test]
    fn test_grading_awards_marks_on_exact_match() {
        let session = session(
            "quiz",
            vec![
                question("q0", "A", 1.0),
                question("q1", "B", 2.0),
                question("q2", "C", 3.0),
            ],
        );
        let responses = HashMap::from([
            ("q0".to_string(), "A".to_string()),
            ("q1".to_string(), "X".to_string()),
            ("q2".to_string(), "C".to_string()),
        ]);
        let grading = session.grade(&responses);
        assert_eq!(grading.score, 4.0);
        assert_eq!(grading.total_marks, 6.0);
        let correct: Vec<bool> = grading.records.iter().map(|r| r.correct).collect();
        assert_eq!(correct, vec![true, false, true]);
    }

    #[test]
    fn test_grading_is_case_sensitive_and_missing_is_wrong() {
        let session = session("quiz", vec![question("q0", "Paris", 1.0)]);
        let lower = HashMap::from([("q0".to_string(), "paris".to_string())]);
        assert_eq!(session.grade(&lower).score, 0.0);
        assert_eq!(session.grade(&HashMap::new()).score, 0.0);
        assert_eq!(session.grade(&HashMap::new()).records.len(), 1);
    }

    #[test]
    fn test_apply_grading_transitions_state() {
        let mut session = session("quiz", vec![question("q0", "A", 2.0)]);
        assert_eq!(session.status, QuizStatus::Created);
        assert_eq!(session.score, 0.0);
        assert_eq!(session.total_marks, 2.0);

        session.apply_grading(2.0, 2.0, Utc::now());
        session.apply_grading(0.0, 2.0, Utc::now());
        assert_eq!(session.status, QuizStatus::Graded);
        assert_eq!(session.score, 0.0);
        assert_eq!(session.submissions, 2);
    }

    #[test]
    fn test_question_serializes_wire_names() {
        let value = serde_json::to_value(question("q0", "A", 1.0)).unwrap();
        assert_eq!(value["type"], "short");
        assert_eq!(value["difficulty"], "intermediate");
        assert!(value.get("correct_answer").is_some());
        assert!(value.get("solution_steps").is_some());
    }
}
