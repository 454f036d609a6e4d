//! Integration checks for the eligibility questionnaire through its public
//! facade: the interactive screening and the batch evaluator must tell the
//! same story.

use donor_match::donation::eligibility::{
    EligibilityAnswers, Questionnaire, ScreeningState, ELIGIBLE_MESSAGE,
};

fn answers_passing_everything(questionnaire: &Questionnaire) -> EligibilityAnswers {
    questionnaire
        .questions()
        .iter()
        .map(|question| (question.id, !question.disqualifying))
        .collect()
}

#[test]
fn a_clean_screening_ends_eligible() {
    let questionnaire = Questionnaire::standard();
    let answers = answers_passing_everything(&questionnaire);

    let result = questionnaire.evaluate(&answers);
    assert!(result.eligible);
    assert_eq!(result.reason, ELIGIBLE_MESSAGE);

    let mut screening = questionnaire.screening();
    loop {
        let answer = match screening.state() {
            ScreeningState::AwaitingAnswer { question, .. } => answers[&question.id],
            _ => break,
        };
        screening.answer(answer);
    }
    assert_eq!(screening.state(), ScreeningState::Eligible);
}

#[test]
fn recent_surgery_stops_the_interview_early() {
    let questionnaire = Questionnaire::standard();
    let surgery = questionnaire
        .questions()
        .iter()
        .find(|question| question.category == "surgery")
        .expect("surgery question present");

    let mut screening = questionnaire.screening();
    loop {
        let (id, disqualifying) = match screening.state() {
            ScreeningState::AwaitingAnswer { question, .. } => {
                (question.id, question.disqualifying)
            }
            _ => break,
        };
        // Answer truthfully up to the surgery question, then admit to it.
        screening.answer(if id == surgery.id { true } else { !disqualifying });
    }

    assert_eq!(
        screening.state(),
        ScreeningState::Ineligible {
            reason: surgery.explanation
        }
    );

    // The batch path agrees, whatever the later answers say.
    let mut answers = answers_passing_everything(&questionnaire);
    answers.insert(surgery.id, true);
    answers.insert(12, true);
    let result = questionnaire.evaluate(&answers);
    assert!(!result.eligible);
    assert_eq!(result.reason, surgery.explanation);
}
