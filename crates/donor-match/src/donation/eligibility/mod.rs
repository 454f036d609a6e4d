//! Rule-based donor eligibility screening.
//!
//! The questionnaire is a fixed, ordered list of yes/no questions. Evaluation
//! stops at the first failing answer and reports that question's explanation;
//! later answers never change the result. Two paths exist, the incremental
//! [`Screening`] walker and the batch [`Questionnaire::evaluate`], and they
//! must agree on any complete answer set.

mod questions;

use serde::Serialize;
use std::collections::BTreeMap;

/// Answers keyed by question id. Ephemeral, built by the caller.
pub type EligibilityAnswers = BTreeMap<u8, bool>;

/// Success message returned when no rule fails.
pub const ELIGIBLE_MESSAGE: &str = "You meet the basic eligibility requirements.";

/// One yes/no screening question.
///
/// `disqualifying` encodes the failing polarity: when true, answering "yes"
/// fails; when false, the question is a required-yes baseline check and
/// answering "no" fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: u8,
    pub text: &'static str,
    pub category: &'static str,
    pub disqualifying: bool,
    pub explanation: &'static str,
}

impl Question {
    fn disqualified_by(&self, answer: bool) -> bool {
        // The failing answer is exactly the value of the polarity flag.
        answer == self.disqualifying
    }
}

/// Outcome of an eligibility evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EligibilityResult {
    pub eligible: bool,
    pub reason: String,
}

impl EligibilityResult {
    fn eligible() -> Self {
        Self {
            eligible: true,
            reason: ELIGIBLE_MESSAGE.to_string(),
        }
    }

    fn ineligible(reason: &str) -> Self {
        Self {
            eligible: false,
            reason: reason.to_string(),
        }
    }
}

/// The ordered question set plus its evaluation rules.
#[derive(Debug)]
pub struct Questionnaire {
    questions: Vec<Question>,
}

impl Questionnaire {
    pub fn standard() -> Self {
        Self {
            questions: questions::standard_questions(),
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Batch evaluation over a complete answer set: scan questions in id
    /// order, fail on the first disqualifying answer.
    ///
    /// Unanswered questions do not disqualify; callers gate completeness
    /// before trusting an `eligible` verdict.
    pub fn evaluate(&self, answers: &EligibilityAnswers) -> EligibilityResult {
        for question in &self.questions {
            if let Some(answer) = answers.get(&question.id) {
                if question.disqualified_by(*answer) {
                    return EligibilityResult::ineligible(question.explanation);
                }
            }
        }

        EligibilityResult::eligible()
    }

    /// Start an interactive screening over this question set.
    pub fn screening(&self) -> Screening<'_> {
        Screening {
            questions: &self.questions,
            step: 0,
            outcome: None,
        }
    }
}

impl Default for Questionnaire {
    fn default() -> Self {
        Self::standard()
    }
}

/// Where an in-flight screening currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreeningState<'a> {
    AwaitingAnswer { step: usize, question: &'a Question },
    Eligible,
    Ineligible { reason: &'a str },
}

/// Incremental walker presenting one question at a time.
///
/// Terminates on the first disqualifying answer; once terminal, further
/// answers are ignored.
#[derive(Debug)]
pub struct Screening<'a> {
    questions: &'a [Question],
    step: usize,
    outcome: Option<EligibilityResult>,
}

impl<'a> Screening<'a> {
    pub fn state(&self) -> ScreeningState<'_> {
        match &self.outcome {
            Some(result) if result.eligible => ScreeningState::Eligible,
            Some(result) => ScreeningState::Ineligible {
                reason: &result.reason,
            },
            None => ScreeningState::AwaitingAnswer {
                step: self.step,
                question: &self.questions[self.step],
            },
        }
    }

    pub fn answer(&mut self, value: bool) {
        if self.outcome.is_some() {
            return;
        }

        let question = &self.questions[self.step];
        if question.disqualified_by(value) {
            self.outcome = Some(EligibilityResult::ineligible(question.explanation));
            return;
        }

        self.step += 1;
        if self.step == self.questions.len() {
            self.outcome = Some(EligibilityResult::eligible());
        }
    }

    pub fn outcome(&self) -> Option<&EligibilityResult> {
        self.outcome.as_ref()
    }
}
