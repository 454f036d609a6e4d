use crate::infra::{InMemoryDonationRepository, InMemoryMatchNotifier, StaticGeocoder};
use chrono::Utc;
use clap::Args;
use donor_match::donation::blood::{compatible_donors, BloodType};
use donor_match::donation::clinics;
use donor_match::donation::eligibility::{Questionnaire, ScreeningState};
use donor_match::donation::geocode::{CachingGeocoder, Geocoder};
use donor_match::donation::requests::discovery::DonorContext;
use donor_match::donation::requests::domain::{
    ProfileId, RequestStatus, RequestSubmission, ResponseStatus, ResponseSubmission, Urgency,
};
use donor_match::donation::requests::{BoardError, BoardPolicy, DonationBoard};
use donor_match::error::AppError;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Donor blood type used for the discovery portion of the demo
    #[arg(long, value_parser = crate::infra::parse_blood_type, default_value = "O-")]
    pub(crate) donor_blood_type: BloodType,
    /// Donor latitude for distance annotations
    #[arg(long, default_value_t = 19.4326)]
    pub(crate) donor_lat: f64,
    /// Donor longitude for distance annotations
    #[arg(long, default_value_t = -99.1332)]
    pub(crate) donor_lng: f64,
    /// Skip the eligibility screening portion of the demo
    #[arg(long)]
    pub(crate) skip_eligibility: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ClinicsArgs {
    /// Caller latitude; with a location the directory prints nearest-first
    #[arg(long)]
    pub(crate) lat: Option<f64>,
    /// Caller longitude
    #[arg(long)]
    pub(crate) lng: Option<f64>,
}

pub(crate) fn run_clinic_directory(args: ClinicsArgs) -> Result<(), AppError> {
    let views = clinics::nearby(args.lat.zip(args.lng));

    println!("Blood bank directory ({} entries)", views.len());
    for view in views {
        match view.distance_label {
            Some(label) => println!("  {} | {} ({label})", view.clinic.name, view.clinic.hours),
            None => println!("  {} | {}", view.clinic.name, view.clinic.hours),
        }
        println!("    {}", view.clinic.address);
        println!("    tel. {}", view.clinic.phone);
    }

    Ok(())
}

fn demo_submission(
    patient: &str,
    blood: BloodType,
    urgency: Urgency,
    hospital: (&str, &str, f64, f64),
    max_responses: u32,
) -> RequestSubmission {
    RequestSubmission {
        requester_id: ProfileId("requester-demo".to_string()),
        patient_name: patient.to_string(),
        patient_blood_type: blood,
        units_needed: 2,
        hospital_name: hospital.0.to_string(),
        hospital_address: hospital.1.to_string(),
        hospital_city: "Ciudad de México".to_string(),
        hospital_state: "CDMX".to_string(),
        hospital_lat: hospital.2,
        hospital_lng: hospital.3,
        contact_phone: "5512345678".to_string(),
        medical_condition: None,
        additional_notes: None,
        urgency,
        max_responses,
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let repository = Arc::new(InMemoryDonationRepository::default());
    let notifier = Arc::new(InMemoryMatchNotifier::default());
    let board = DonationBoard::new(repository, notifier.clone(), BoardPolicy::default());
    let now = Utc::now();
    let requester = ProfileId("requester-demo".to_string());

    println!("Donation matching demo");
    println!("\n== Opening requests as {} ==", requester.0);

    let general = (
        "Hospital General de México",
        "Dr. Balmis 148, Doctores",
        19.4132,
        -99.1517,
    );
    let juarez = (
        "Hospital Juárez de México",
        "Av. Instituto Politécnico Nacional 5160",
        19.4912,
        -99.1265,
    );
    let cardiologia = (
        "Instituto Nacional de Cardiología",
        "Juan Badiano 1, Tlalpan",
        19.2889,
        -99.1600,
    );

    let urgent = board.create_request(
        demo_submission("Ana Torres", BloodType::APositive, Urgency::Urgent, general, 5),
        now,
    )?;
    let scarce = board.create_request(
        demo_submission("Luis Vega", BloodType::OPositive, Urgency::High, juarez, 1),
        now,
    )?;
    board.create_request(
        demo_submission("Elena Ríos", BloodType::AbPositive, Urgency::Medium, cardiologia, 5),
        now,
    )?;
    println!("  opened 3 requests (urgent, high, medium)");

    match board.create_request(
        demo_submission("Cuarto Paciente", BloodType::BNegative, Urgency::Low, general, 5),
        now,
    ) {
        Err(BoardError::QuotaExceeded { limit }) => {
            println!("  a 4th request is rejected: quota of {limit} active requests");
        }
        other => println!("  unexpected quota outcome: {other:?}"),
    }

    println!(
        "\n== Discovery for an {} donor ==",
        args.donor_blood_type
    );
    println!("  {}", args.donor_blood_type.description());
    println!(
        "  ({} can supply patients of type {:?})",
        args.donor_blood_type,
        args.donor_blood_type
            .recipients()
            .iter()
            .map(|blood| blood.symbol())
            .collect::<Vec<_>>()
    );
    println!(
        "  (an {} patient can receive from {:?})",
        args.donor_blood_type,
        compatible_donors(args.donor_blood_type)
            .iter()
            .map(|blood| blood.symbol())
            .collect::<Vec<_>>()
    );

    let context = DonorContext {
        blood_type: args.donor_blood_type,
        location: Some((args.donor_lat, args.donor_lng)),
    };
    let open = board.discover(&context, now)?;
    for entry in &open {
        println!(
            "  [{}] {} needs {} | {} | {} | {}/{} slots taken",
            entry.request.urgency.label(),
            entry.request.patient_name,
            entry.request.patient_blood_type,
            entry.request.hospital_name,
            entry.distance_label.as_deref().unwrap_or("distance unknown"),
            entry.response_count,
            entry.request.max_responses,
        );
    }

    println!("\n== Responses ==");
    let maria = ProfileId("donor-maria".to_string());
    let response = board.respond(
        &urgent.id,
        ResponseSubmission {
            donor_id: maria.clone(),
            message: Some("Available after 5pm today".to_string()),
        },
        now,
    )?;
    println!("  donor-maria registered for {}", urgent.patient_name);

    match board.respond(
        &urgent.id,
        ResponseSubmission {
            donor_id: maria.clone(),
            message: None,
        },
        now,
    ) {
        Err(BoardError::DuplicateResponse) => {
            println!("  a second attempt by donor-maria is rejected as a duplicate");
        }
        other => println!("  unexpected duplicate outcome: {other:?}"),
    }

    board.respond(
        &scarce.id,
        ResponseSubmission {
            donor_id: ProfileId("donor-jorge".to_string()),
            message: None,
        },
        now,
    )?;
    match board.respond(
        &scarce.id,
        ResponseSubmission {
            donor_id: ProfileId("donor-lucia".to_string()),
            message: None,
        },
        now,
    ) {
        Err(BoardError::CapacityReached) => {
            println!(
                "  {}'s request filled its single slot; donor-lucia is turned away",
                scarce.patient_name
            );
        }
        other => println!("  unexpected capacity outcome: {other:?}"),
    }

    println!("\n== Coordination ==");
    board.update_response_status(&response.id, &requester, ResponseStatus::Confirmed)?;
    board.update_response_status(&response.id, &maria, ResponseStatus::Completed)?;
    board.update_request_status(&urgent.id, &requester, RequestStatus::Fulfilled)?;
    println!("  donor-maria's donation confirmed, completed, request fulfilled");

    let overview = board.requester_overview(&requester, now)?;
    println!(
        "  requester dashboard: {} active, {} in history",
        overview.active.len(),
        overview.history.len()
    );
    println!("  {} match events dispatched", notifier.events().len());

    if !args.skip_eligibility {
        println!("\n== Eligibility screening ==");
        let questionnaire = Questionnaire::standard();
        let mut screening = questionnaire.screening();
        loop {
            // A donor with nothing to disclose: yes to the baseline checks,
            // no to everything disqualifying.
            let answer = match screening.state() {
                ScreeningState::AwaitingAnswer { question, .. } => !question.disqualifying,
                _ => break,
            };
            screening.answer(answer);
        }
        match screening.state() {
            ScreeningState::Eligible => println!("  clean answers: eligible"),
            other => println!("  unexpected screening outcome: {other:?}"),
        }

        let mut screening = questionnaire.screening();
        loop {
            // Same honest donor, except they had a drink yesterday.
            let answer = match screening.state() {
                ScreeningState::AwaitingAnswer { question, .. } => {
                    question.category == "alcohol" || !question.disqualifying
                }
                _ => break,
            };
            screening.answer(answer);
        }
        if let ScreeningState::Ineligible { reason } = screening.state() {
            println!("  alcohol in the last 48h: ineligible ({reason})");
        }
    }

    println!("\n== Nearby blood banks ==");
    for view in clinics::nearby(Some((args.donor_lat, args.donor_lng))).into_iter().take(3) {
        println!(
            "  {} ({})",
            view.clinic.name,
            view.distance_label.as_deref().unwrap_or("-"),
        );
    }

    println!("\n== Hospital search ==");
    let geocoder = CachingGeocoder::new(StaticGeocoder);
    for candidate in geocoder.search("hospital").into_iter().flatten() {
        println!("  {} ({:.4}, {:.4})", candidate.name, candidate.lat, candidate.lng);
    }

    Ok(())
}
