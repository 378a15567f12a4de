//! Procedural treatment histories.
//!
//! Invents the treatments a patient received before reaching the player's
//! botica. The first visit was most likely to a physician; later visits
//! drift toward folk healers. Most treatments neither help nor harm.
//!
//! Randomness always comes from the caller's RNG so histories can be
//! replayed from a seed.

use crate::knowledge::{generic_treatments, practitioner_profile, KnowledgeBase, TreatmentTemplate};
use crate::symptoms::extract_symptoms;
use crate::{
    Outcome, Patient, PlayerTreatment, Practitioner, PractitionerType, SymptomKey,
    TreatmentEntry, TreatmentSummary,
};
use chrono::{Days, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;

/// The player character
pub const PLAYER_NAME: &str = "Maria de Lima";

/// Number of past treatments generated when the caller doesn't say
pub const DEFAULT_HISTORY_LENGTH: usize = 3;

/// Longest history the CLI and config will ask for
pub const MAX_HISTORY_LENGTH: usize = 100;

const PRACTITIONER_ORDER: [PractitionerType; 4] = [
    PractitionerType::Physician,
    PractitionerType::Curandera,
    PractitionerType::BarberSurgeon,
    PractitionerType::Apothecary,
];

/// Practitioner weights for the first visit
const FIRST_VISIT_WEIGHTS: [f64; 4] = [0.6, 0.2, 0.1, 0.1];

/// Practitioner weights once the physician has failed
const LATER_VISIT_WEIGHTS: [f64; 4] = [0.4, 0.3, 0.15, 0.15];

/// Positive, neutral, negative
const OUTCOME_WEIGHTS: [f64; 3] = [0.3, 0.5, 0.2];

/// Formats a date the way the game prints it, e.g. "July 28, 1680"
pub fn format_game_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Pick one of `items` with probability proportional to its weight.
///
/// Returns `None` only when `items` is empty. If rounding leaves the draw
/// unmatched after the walk, the last item is returned.
pub fn weighted_random<'a, T>(
    items: &'a [T],
    weights: &[f64],
    rng: &mut impl Rng,
) -> Option<&'a T> {
    let total: f64 = weights.iter().sum();
    let mut draw = rng.gen::<f64>() * total;

    for (item, weight) in items.iter().zip(weights) {
        if draw < *weight {
            return Some(item);
        }
        draw -= weight;
    }

    items.last()
}

/// Generates past treatments against a knowledge base as of a game date
#[derive(Clone, Copy, Debug)]
pub struct TreatmentGenerator<'a> {
    knowledge: &'a KnowledgeBase,
    current_date: NaiveDate,
}

impl<'a> TreatmentGenerator<'a> {
    pub fn new(knowledge: &'a KnowledgeBase, current_date: NaiveDate) -> Self {
        Self {
            knowledge,
            current_date,
        }
    }

    /// `count` past treatments for `patient`, oldest first
    pub fn generate_treatment_history(
        &self,
        patient: &Patient,
        count: usize,
        rng: &mut impl Rng,
    ) -> Vec<TreatmentEntry> {
        let symptoms = extract_symptoms(patient);
        let mut history = Vec::with_capacity(count.min(MAX_HISTORY_LENGTH));

        for index in 0..count {
            let visit = u32::try_from(index).unwrap_or(u32::MAX).saturating_add(1);
            let days_ago = visit.saturating_mul(2).saturating_add(rng.gen_range(0..=2));
            history.push(self.generate_single_treatment(&symptoms, days_ago, index, rng));
        }

        // Generated most recent first
        history.reverse();

        tracing::info!(
            "Generated {} past treatments for symptoms {:?}",
            history.len(),
            symptoms
        );
        history
    }

    /// One past treatment for a patient with `symptoms`.
    ///
    /// `index` is the visit number counting back from today; visit 0 favours
    /// a physician.
    pub fn generate_single_treatment(
        &self,
        symptoms: &[SymptomKey],
        days_ago: u32,
        index: usize,
        rng: &mut impl Rng,
    ) -> TreatmentEntry {
        let Some(&symptom) = symptoms.choose(rng) else {
            return self.generate_generic_treatment(days_ago, rng);
        };

        let weights = if index == 0 {
            &FIRST_VISIT_WEIGHTS
        } else {
            &LATER_VISIT_WEIGHTS
        };
        let practitioner = weighted_random(&PRACTITIONER_ORDER, weights, rng)
            .copied()
            .unwrap_or(PractitionerType::Physician);

        let Some(template) = self
            .knowledge
            .treatments_for(symptom, practitioner)
            .choose(rng)
        else {
            tracing::debug!(
                "No {:?} treatments for {:?}, using generic pool",
                practitioner,
                symptom
            );
            return self.generate_generic_treatment(days_ago, rng);
        };

        self.build_entry(practitioner, template, days_ago, rng)
    }

    /// A treatment from the generic pool, for complaints nothing else covers
    pub fn generate_generic_treatment(&self, days_ago: u32, rng: &mut impl Rng) -> TreatmentEntry {
        let pool = generic_treatments();
        let generic = &pool[rng.gen_range(0..pool.len())];
        self.build_entry(generic.practitioner, &generic.template, days_ago, rng)
    }

    fn build_entry(
        &self,
        kind: PractitionerType,
        template: &TreatmentTemplate,
        days_ago: u32,
        rng: &mut impl Rng,
    ) -> TreatmentEntry {
        let profile = practitioner_profile(kind);
        let name = profile.names.choose(rng).copied().unwrap_or(profile.title);
        let outcome = weighted_random(&Outcome::ALL, &OUTCOME_WEIGHTS, rng)
            .copied()
            .unwrap_or(Outcome::Neutral);
        let notes = profile.notes[rng.gen_range(0..profile.notes.len())];

        let date = self
            .current_date
            .checked_sub_days(Days::new(u64::from(days_ago)))
            .unwrap_or(self.current_date);

        TreatmentEntry {
            date: format_game_date(date),
            days_ago,
            practitioner: Practitioner {
                name: name.to_string(),
                kind,
                title: profile.title.to_string(),
                education: profile.education.to_string(),
                is_player: false,
            },
            treatment: TreatmentSummary {
                name: template.name.to_string(),
                method: template.method.to_string(),
                theory: template.theory.to_string(),
            },
            outcome: template.outcome_text(outcome).to_string(),
            notes: notes.to_string(),
        }
    }
}

/// A copy of `existing_history` with the player's own treatment appended
pub fn add_player_treatment(
    existing_history: &[TreatmentEntry],
    treatment: &PlayerTreatment,
    current_date: &str,
) -> Vec<TreatmentEntry> {
    let mut history = Vec::with_capacity(existing_history.len() + 1);
    history.extend_from_slice(existing_history);
    history.push(TreatmentEntry {
        date: current_date.to_string(),
        days_ago: 0,
        practitioner: Practitioner {
            name: PLAYER_NAME.to_string(),
            kind: PractitionerType::Apothecary,
            title: "Boticaria".to_string(),
            education: "Trained at her father's side in the apothecary's art".to_string(),
            is_player: true,
        },
        treatment: TreatmentSummary {
            name: treatment.name.clone(),
            method: treatment.method.clone(),
            theory: treatment.theory.clone(),
        },
        outcome: "Treatment in progress".to_string(),
        notes: format!("Prescribed and prepared by {} herself.", PLAYER_NAME),
    });
    history
}
