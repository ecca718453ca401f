//! Multiple-choice trivia from the Open Trivia DB.

use crate::errors::{Error, Result};
use rand::{Rng, seq::SliceRandom};
use serde::Deserialize;
use std::fmt;

const API_URL: &str = "https://opentdb.com/api.php";

/// Question difficulty, which also decides the reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Easy question
    Easy,
    /// Medium question
    Medium,
    /// Hard question
    Hard,
}

impl Difficulty {
    /// Scrap metal paid for a correct answer.
    #[must_use]
    pub const fn reward(self) -> i64 {
        match self {
            Self::Easy => 5,
            Self::Medium => 10,
            Self::Hard => 20,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Easy => write!(f, "easy"),
            Self::Medium => write!(f, "medium"),
            Self::Hard => write!(f, "hard"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    response_code: u8,
    #[serde(default)]
    results: Vec<RawQuestion>,
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    category: String,
    difficulty: Difficulty,
    question: String,
    correct_answer: String,
    incorrect_answers: Vec<String>,
}

/// A question ready to be asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Category name
    pub category: String,
    /// Difficulty
    pub difficulty: Difficulty,
    /// Question text
    pub text: String,
    /// Answers in display order
    pub answers: Vec<String>,
    /// Index of the correct answer in `answers`
    pub correct: usize,
}

impl Question {
    /// Whether the answer at `index` is the correct one.
    #[must_use]
    pub const fn is_correct(&self, index: usize) -> bool {
        self.correct == index
    }

    /// The correct answer's text.
    #[must_use]
    pub fn correct_answer(&self) -> &str {
        self.answers.get(self.correct).map_or("", String::as_str)
    }
}

/// Decodes the HTML entities the trivia API escapes its text with.
#[must_use]
pub fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

fn into_question<R: Rng + ?Sized>(rng: &mut R, raw: RawQuestion) -> Question {
    let correct_text = decode_entities(&raw.correct_answer);
    let mut answers: Vec<String> = raw
        .incorrect_answers
        .iter()
        .map(|answer| decode_entities(answer))
        .collect();
    answers.push(correct_text.clone());
    answers.shuffle(rng);
    let correct = answers
        .iter()
        .position(|answer| *answer == correct_text)
        .unwrap_or_default();

    Question {
        category: decode_entities(&raw.category),
        difficulty: raw.difficulty,
        text: decode_entities(&raw.question),
        answers,
        correct,
    }
}

fn parse_response<R: Rng + ?Sized>(rng: &mut R, response: ApiResponse) -> Result<Question> {
    if response.response_code != 0 {
        return Err(Error::ExternalService {
            service: "Trivia",
            message: format!("response code {}", response.response_code),
        });
    }
    response
        .results
        .into_iter()
        .next()
        .map(|raw| into_question(rng, raw))
        .ok_or_else(|| Error::ExternalService {
            service: "Trivia",
            message: "no question returned".to_string(),
        })
}

/// Fetches one multiple-choice question with shuffled answers.
pub async fn fetch_question(client: &reqwest::Client) -> Result<Question> {
    let response: ApiResponse =
        super::get_json(client, "Trivia", API_URL, &[("amount", "1"), ("type", "multiple")]).await?;
    parse_response(&mut rand::thread_rng(), response)
}
