//! Multiple-choice quiz.
//!
//! Questions are held in a fixed sequence; the position in that sequence is
//! the quiz's progression order. Nothing is remembered between requests: the
//! client sends the id of the question it answered and receives the next one.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

pub const QUESTION_NOT_FOUND: &str = "Question not found";

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("the question bank is empty")]
    Empty,
    #[error("question id {0} is used more than once")]
    DuplicateId(i64),
    #[error("the answer to question {0} is not one of its options")]
    AnswerNotInOptions(i64),
    #[error("cannot read question bank: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed question bank: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: i64,
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    pub explanation: String,
}

/// Body of `GET /quiz/start`.
#[derive(Debug, Serialize)]
pub struct QuizStart<'a> {
    pub status: &'static str,
    pub question: &'a QuizQuestion,
    pub total_questions: usize,
}

/// Body of `POST /quiz/answer`.
#[derive(Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AnswerResult<'a> {
    Success {
        correct: bool,
        explanation: &'a str,
        next_question: Option<&'a QuizQuestion>,
    },
    Fail {
        error: &'static str,
    },
}

#[derive(Debug)]
pub struct QuizEngine {
    questions: Vec<QuizQuestion>,
}

impl QuizEngine {
    pub fn new(questions: Vec<QuizQuestion>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::Empty);
        }

        let mut seen = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !seen.insert(question.id) {
                return Err(QuizError::DuplicateId(question.id));
            }
            if !question.options.contains(&question.answer) {
                return Err(QuizError::AnswerNotInOptions(question.id));
            }
        }

        debug!("[Quiz] Initialized {} questions.", questions.len());
        Ok(Self { questions })
    }

    pub fn builtin() -> Result<Self, QuizError> {
        Self::new(builtin_questions())
    }

    /// Reads a JSON array of questions.
    pub fn from_file(path: &Path) -> Result<Self, QuizError> {
        info!("[Quiz] Loading questions from {:?}", path);
        let json = std::fs::read_to_string(path)?;
        Self::new(serde_json::from_str(&json)?)
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn start(&self) -> QuizStart<'_> {
        QuizStart {
            status: "success",
            question: &self.questions[0],
            total_questions: self.questions.len(),
        }
    }

    pub fn answer(
        &self,
        question_id: Option<i64>,
        selected_option: Option<&str>,
    ) -> AnswerResult<'_> {
        let found = question_id.and_then(|id| self.questions.iter().position(|q| q.id == id));
        let Some(position) = found else {
            debug!("[Quiz] Unknown question id {:?}", question_id);
            return AnswerResult::Fail {
                error: QUESTION_NOT_FOUND,
            };
        };

        let question = &self.questions[position];
        let correct = selected_option == Some(question.answer.as_str());
        debug!("[Quiz] Question {} answered, correct: {}", question.id, correct);

        AnswerResult::Success {
            correct,
            explanation: &question.explanation,
            next_question: self.questions.get(position + 1),
        }
    }
}

macro_rules! question {
    ($id:expr, $text:expr, [$($opt:expr),+ $(,)?], $answer:expr, $explanation:expr $(,)?) => {
        QuizQuestion {
            id: $id,
            question: $text.to_string(),
            options: vec![$($opt.to_string()),+],
            answer: $answer.to_string(),
            explanation: $explanation.to_string(),
        }
    };
}

pub fn builtin_questions() -> Vec<QuizQuestion> {
    vec![
        question!(
            1,
            "Which herb is best known for calming the mind?",
            ["Tulsi", "Brahmi", "Neem", "Ashwagandha"],
            "Brahmi",
            "Brahmi helps reduce stress and improves mental clarity.",
        ),
        question!(
            2,
            "Which dosha is associated with the fire element?",
            ["Kapha", "Pitta", "Vata", "All of the above"],
            "Pitta",
            "Pitta dosha is linked to fire, governing metabolism and digestion.",
        ),
        question!(
            3,
            "Which dosha is made of air and space?",
            ["Vata", "Pitta", "Kapha", "None of the above"],
            "Vata",
            "Vata combines air and space and governs movement in the body.",
        ),
        question!(
            4,
            "Which spice is called the 'Golden Spice' for its anti-inflammatory action?",
            ["Cumin", "Turmeric", "Clove", "Cardamom"],
            "Turmeric",
            "Turmeric contains curcumin, valued for its anti-inflammatory and antioxidant properties.",
        ),
        question!(
            5,
            "Ashwagandha is best known as what kind of herb?",
            ["Laxative", "Adaptogen", "Diuretic", "Antiseptic"],
            "Adaptogen",
            "Ashwagandha helps the body adapt to stress and supports energy and vitality.",
        ),
        question!(
            6,
            "Which herb is revered as the 'Queen of Herbs'?",
            ["Tulsi", "Neem", "Amla", "Shatavari"],
            "Tulsi",
            "Tulsi (Holy Basil) supports respiratory health and resilience to stress.",
        ),
        question!(
            7,
            "Triphala is a blend of how many fruits?",
            ["Two", "Three", "Four", "Five"],
            "Three",
            "Triphala combines Amalaki, Bibhitaki and Haritaki.",
        ),
        question!(
            8,
            "Which fruit is one of the richest natural sources of vitamin C?",
            ["Amla", "Banana", "Fig", "Date"],
            "Amla",
            "Amla (Indian gooseberry) is rich in vitamin C and supports immunity.",
        ),
        question!(
            9,
            "Neem is traditionally used mainly for what?",
            ["Building muscle", "Purifying the blood and skin", "Improving sleep", "Gaining weight"],
            "Purifying the blood and skin",
            "Neem's bitter, antibacterial nature makes it a classic remedy for skin conditions.",
        ),
        question!(
            10,
            "Which dosha combines earth and water?",
            ["Vata", "Pitta", "Kapha", "Tridosha"],
            "Kapha",
            "Kapha gives structure and lubrication and is formed from earth and water.",
        ),
        question!(
            11,
            "Which warming root is commonly taken for nausea?",
            ["Ginger", "Licorice", "Turmeric", "Guduchi"],
            "Ginger",
            "Ginger kindles digestion and eases nausea and motion sickness.",
        ),
        question!(
            12,
            "What does 'Agni' refer to in Ayurveda?",
            ["Digestive fire", "Breathing practice", "A herbal oil", "Body type"],
            "Digestive fire",
            "Agni is the metabolic fire that digests food, experiences and thoughts.",
        ),
        question!(
            13,
            "What is 'Abhyanga'?",
            ["Fasting", "Self-massage with warm oil", "Herbal steam", "Meditation"],
            "Self-massage with warm oil",
            "Abhyanga nourishes the tissues and calms Vata.",
        ),
        question!(
            14,
            "Giloy (Guduchi) is especially valued for supporting what?",
            ["Immunity", "Hair growth", "Eyesight", "Bone density"],
            "Immunity",
            "Giloy is a well-known immunomodulator often used during fevers.",
        ),
        question!(
            15,
            "In Ayurveda, what is ‘Dinacharya’?",
            ["Daily routine", "Seasonal cleanse", "Yoga practice", "Herbal medicine"],
            "Daily routine",
            "Dinacharya refers to daily lifestyle and habits to maintain balance.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> QuizEngine {
        QuizEngine::builtin().unwrap()
    }

    fn sample(id: i64) -> QuizQuestion {
        question!(id, "Pick one", ["A", "B"], "A", "A is right.")
    }

    #[test]
    fn builtin_bank_is_valid() {
        let engine = engine();

        assert_eq!(engine.questions().len(), 15);
        assert_eq!(engine.questions()[0].id, 1);
    }

    #[test]
    fn start_always_returns_first_question() {
        let engine = engine();
        engine.answer(Some(1), Some("Brahmi"));
        let start = engine.start();

        assert_eq!(start.question.id, 1);
        assert_eq!(start.total_questions, 15);

        let json = serde_json::to_value(&start).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["question"]["answer"], "Brahmi");
        assert_eq!(json["total_questions"], 15);
    }

    #[test]
    fn correct_answer_advances_to_next_position() {
        let engine = engine();

        match engine.answer(Some(1), Some("Brahmi")) {
            AnswerResult::Success {
                correct,
                explanation,
                next_question,
            } => {
                assert!(correct);
                assert_eq!(explanation, "Brahmi helps reduce stress and improves mental clarity.");
                assert_eq!(next_question.unwrap().id, 2);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn comparison_is_case_sensitive() {
        let engine = engine();

        let AnswerResult::Success { correct, .. } = engine.answer(Some(1), Some("brahmi")) else {
            panic!("question 1 exists");
        };
        assert!(!correct);
    }

    #[test]
    fn option_outside_list_is_just_incorrect() {
        let engine = engine();

        let AnswerResult::Success { correct, explanation, .. } =
            engine.answer(Some(2), Some("Fire"))
        else {
            panic!("question 2 exists");
        };
        assert!(!correct);
        assert!(!explanation.is_empty());
    }

    #[test]
    fn missing_selection_is_incorrect() {
        let engine = engine();

        let AnswerResult::Success { correct, .. } = engine.answer(Some(3), None) else {
            panic!("question 3 exists");
        };
        assert!(!correct);
    }

    #[test]
    fn last_question_has_no_next() {
        let engine = engine();
        let result = engine.answer(Some(15), Some("Daily routine"));

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["correct"], true);
        assert!(json["next_question"].is_null());
        assert!(json.as_object().unwrap().contains_key("next_question"));
    }

    #[test]
    fn unknown_or_missing_id_fails_softly() {
        let engine = engine();

        for id in [Some(99), None] {
            let result = engine.answer(id, Some("Brahmi"));
            assert_eq!(result, AnswerResult::Fail { error: QUESTION_NOT_FOUND });

            let json = serde_json::to_value(&result).unwrap();
            assert_eq!(json["status"], "fail");
            assert_eq!(json["error"], QUESTION_NOT_FOUND);
            assert!(json.get("correct").is_none());
            assert!(json.get("explanation").is_none());
        }
    }

    #[test]
    fn next_follows_position_not_id() {
        let engine = QuizEngine::new(vec![sample(10), sample(3), sample(7)]).unwrap();

        let AnswerResult::Success { next_question, .. } = engine.answer(Some(10), Some("A")) else {
            panic!("question 10 exists");
        };
        assert_eq!(next_question.unwrap().id, 3);
    }

    #[test]
    fn rejects_invalid_banks() {
        assert!(matches!(QuizEngine::new(vec![]), Err(QuizError::Empty)));
        assert!(matches!(
            QuizEngine::new(vec![sample(1), sample(1)]),
            Err(QuizError::DuplicateId(1))
        ));

        let mut bad = sample(4);
        bad.answer = "C".to_string();
        assert!(matches!(
            QuizEngine::new(vec![bad]),
            Err(QuizError::AnswerNotInOptions(4))
        ));
    }

    #[test]
    fn loads_bank_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quiz.json");
        std::fs::write(
            &path,
            r#"[{"id": 1, "question": "Pick one", "options": ["A", "B"], "answer": "B", "explanation": "B."}]"#,
        )
        .unwrap();

        let engine = QuizEngine::from_file(&path).unwrap();
        assert_eq!(engine.start().question.answer, "B");
    }
}
