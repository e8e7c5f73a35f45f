use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::db::models::{AnswerOption, Question, Test};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct StartAttemptRequest {
    #[serde(alias = "productId")]
    pub(crate) product_id: String,
    #[serde(default)]
    #[serde(alias = "testIds")]
    #[validate(length(min = 1))]
    pub(crate) test_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StartAttemptResponse {
    pub(crate) allotted_time: i32,
    pub(crate) started: bool,
    pub(crate) tests: Vec<DeliveredTest>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DeliveredTest {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) time_minutes: i32,
    pub(crate) questions: Vec<DeliveredQuestion>,
}

impl DeliveredTest {
    pub(crate) fn from_db(test: Test, questions: Vec<DeliveredQuestion>) -> Self {
        Self { id: test.id, title: test.title, time_minutes: test.time_minutes, questions }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct DeliveredQuestion {
    pub(crate) id: String,
    pub(crate) text: String,
    pub(crate) text2: Option<String>,
    pub(crate) text3: Option<String>,
    pub(crate) image: Option<String>,
    pub(crate) task_type: Option<i32>,
    pub(crate) source_text: Option<String>,
    pub(crate) options: Vec<DeliveredOption>,
}

impl DeliveredQuestion {
    pub(crate) fn from_db(question: Question, options: Vec<DeliveredOption>) -> Self {
        Self {
            id: question.id,
            text: question.text,
            text2: question.text2,
            text3: question.text3,
            image: question.image,
            task_type: question.task_type,
            source_text: question.source_text,
            options,
        }
    }
}

/// Delivery view of an option; the correctness flag never leaves the server.
#[derive(Debug, Serialize)]
pub(crate) struct DeliveredOption {
    pub(crate) id: String,
    pub(crate) text: String,
    pub(crate) image: Option<String>,
}

impl DeliveredOption {
    pub(crate) fn from_db(option: AnswerOption) -> Self {
        Self { id: option.id, text: option.text, image: option.image }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitAttemptRequest {
    #[serde(alias = "productId")]
    pub(crate) product_id: String,
    #[serde(default)]
    pub(crate) tests: Vec<SubmittedTest>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmittedTest {
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) questions: Vec<SubmittedQuestion>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmittedQuestion {
    pub(crate) id: String,
    #[serde(default)]
    #[serde(alias = "optionIds", alias = "option_id", alias = "optionId")]
    #[serde(deserialize_with = "scalar_or_list")]
    pub(crate) option_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmitAttemptResponse {
    pub(crate) completed_test_id: String,
    /// Minutes rounded to two decimal places.
    pub(crate) time_spent_minutes: f64,
}

/// Clients historically sent either a single option id or a list; accept both.
fn scalar_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Ok(Vec::new()),
        Some(OneOrMany::One(value)) => Ok(vec![value]),
        Some(OneOrMany::Many(values)) => Ok(values),
    }
}
