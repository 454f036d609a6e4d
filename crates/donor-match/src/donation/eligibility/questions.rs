use super::Question;

/// The fixed pre-donation questionnaire, aligned with NOM-253-SSA1-2012.
///
/// Ids are stable and ordered; evaluation reports the first failing question,
/// so the order here is the order the rules are applied in.
pub(super) fn standard_questions() -> Vec<Question> {
    vec![
        Question {
            id: 1,
            text: "Are you between 18 and 65 years old?",
            category: "age",
            disqualifying: false,
            explanation: "Donors must be at least 18 and at most 65 years old.",
        },
        Question {
            id: 2,
            text: "Do you weigh 50 kilograms or more?",
            category: "weight",
            disqualifying: false,
            explanation: "A minimum weight of 50 kg is required for a safe donation.",
        },
        Question {
            id: 3,
            text: "Do you feel healthy today? (no flu, cough, fever, or general malaise)",
            category: "health",
            disqualifying: false,
            explanation: "You must be fully healthy on the day of donation.",
        },
        Question {
            id: 4,
            text: "Have you consumed alcohol in the last 48 hours?",
            category: "alcohol",
            disqualifying: true,
            explanation: "A 48-hour period without alcohol is required before donating.",
        },
        Question {
            id: 5,
            text: "Have you gotten tattoos, piercings, or acupuncture in the last 12 months?",
            category: "tattoos",
            disqualifying: true,
            explanation: "A 12-month waiting period applies because of infection risk.",
        },
        Question {
            id: 6,
            text: "If you are a woman: are you pregnant or breastfeeding?",
            category: "pregnancy",
            disqualifying: true,
            explanation: "Donation is not possible during pregnancy or breastfeeding.",
        },
        Question {
            id: 7,
            text: "Have you donated blood in the last 2 months (men) or 3 months (women)?",
            category: "prior_donation",
            disqualifying: true,
            explanation: "A minimum recovery period between donations is required.",
        },
        Question {
            id: 8,
            text: "Have you been diagnosed with diabetes, uncontrolled hypertension, heart \
                   disease, hepatitis, HIV/AIDS, or another serious chronic illness?",
            category: "conditions",
            disqualifying: true,
            explanation: "Transmissible or serious chronic illnesses rule out donation.",
        },
        Question {
            id: 9,
            text: "Have you had surgery in the last 6 months?",
            category: "surgery",
            disqualifying: true,
            explanation: "A recovery period is required after surgery.",
        },
        Question {
            id: 10,
            text: "Are you currently taking antibiotics or other prescription medication?",
            category: "medication",
            disqualifying: true,
            explanation: "Certain medications can affect the quality of donated blood.",
        },
        Question {
            id: 11,
            text: "Have you traveled to areas with endemic malaria, zika, or other tropical \
                   diseases in the last 12 months?",
            category: "travel",
            disqualifying: true,
            explanation: "A waiting period applies because of transmissible disease risk.",
        },
        Question {
            id: 12,
            text: "Have you received a blood transfusion in the last year?",
            category: "transfusions",
            disqualifying: true,
            explanation: "A 12-month waiting period applies after receiving a transfusion.",
        },
    ]
}
