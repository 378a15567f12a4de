//! Keyword-based symptom extraction.
//!
//! Two independent signals are combined: phrases in the free-text diagnosis
//! and the labels in the patient's symptom list. Matching is plain lowercase
//! substring search.

use crate::{Patient, SymptomKey};

/// Diagnosis phrases, checked in order
const DIAGNOSIS_KEYWORDS: &[(&[&str], SymptomKey)] = &[
    (&["headache"], SymptomKey::Headache),
    (&["fever"], SymptomKey::Fever),
    (&["joint pain", "joints"], SymptomKey::JointPain),
    (&["lesion", "rash", "skin"], SymptomKey::SkinLesions),
    (&["abdominal", "stomach"], SymptomKey::AbdominalPain),
    (&["chest pain", "breathing"], SymptomKey::ChestPain),
];

/// Symptom-label keywords, checked in order. Generic "pain" comes last.
const SYMPTOM_KEYWORDS: &[(&[&str], SymptomKey)] = &[
    (&["headache"], SymptomKey::Headache),
    (&["fever"], SymptomKey::Fever),
    (&["joint"], SymptomKey::JointPain),
    (&["skin", "lesion"], SymptomKey::SkinLesions),
    (&["vision", "eye"], SymptomKey::VisionProblems),
    (&["cough", "throat"], SymptomKey::Cough),
    (&["pain"], SymptomKey::GeneralPain),
];

/// Canonical symptom keys for `patient`, deduplicated in first-seen order
pub fn extract_symptoms(patient: &Patient) -> Vec<SymptomKey> {
    let mut keys = Vec::new();

    let diagnosis = patient.diagnosis.to_lowercase();
    collect_matches(&diagnosis, DIAGNOSIS_KEYWORDS, &mut keys);

    for symptom in &patient.symptoms {
        let label = symptom.name().to_lowercase();
        collect_matches(&label, SYMPTOM_KEYWORDS, &mut keys);
    }

    tracing::debug!("Extracted symptoms {:?}", keys);
    keys
}

fn collect_matches(text: &str, table: &[(&[&str], SymptomKey)], keys: &mut Vec<SymptomKey>) {
    for (phrases, key) in table {
        if phrases.iter().any(|p| text.contains(p)) && !keys.contains(key) {
            keys.push(*key);
        }
    }
}
