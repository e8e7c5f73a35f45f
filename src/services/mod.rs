pub(crate) mod question_selector;
pub(crate) mod scoring;
