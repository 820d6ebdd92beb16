//! Use cases (application services)

pub mod answer_question;
pub mod reasoning_agent;

#[cfg(test)]
pub(crate) mod test_support;
