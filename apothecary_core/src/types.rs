//! Core domain types for the apothecary simulation.
//!
//! This module defines the fundamental types used throughout the system:
//! - Player actions and their modifiers
//! - Player resource state (health, energy, wealth)
//! - Derived results (warnings, meals, sleep, health decline)
//! - Patients, symptoms and treatment history entries
//!
//! Everything serializes with camelCase field names so the records can be
//! handed to the browser front end unchanged.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Actions
// ============================================================================

/// Something the player spends a turn doing
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    Study,
    Forage,
    Mix,
    SeePatients,
    Travel,
    Chat,
    Prescribe,
    Buy,
    Sleep,
    Eat,
}

impl Action {
    pub const ALL: [Action; 10] = [
        Action::Study,
        Action::Forage,
        Action::Mix,
        Action::SeePatients,
        Action::Travel,
        Action::Chat,
        Action::Prescribe,
        Action::Buy,
        Action::Sleep,
        Action::Eat,
    ];

    /// Identifier used by the front end for this action
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Study => "study",
            Action::Forage => "forage",
            Action::Mix => "mix",
            Action::SeePatients => "seePatients",
            Action::Travel => "travel",
            Action::Chat => "chat",
            Action::Prescribe => "prescribe",
            Action::Buy => "buy",
            Action::Sleep => "sleep",
            Action::Eat => "eat",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    /// Accepts the front-end identifiers as well as `see_patients` /
    /// `see-patients`, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();

        Action::ALL
            .into_iter()
            .find(|a| a.as_str().to_lowercase() == normalized)
            .ok_or_else(|| Error::UnknownAction(s.to_string()))
    }
}

/// Equipment and skill adjustments applied to an action
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ActionModifiers {
    /// Multiplier on the base energy cost
    pub energy_cost_modifier: f64,
    /// Flat energy regained alongside the action
    pub energy_regen: i32,
    /// Flat energy bonus (food, tonics)
    pub energy_bonus: i32,
    /// Probability in [0, 1) of catching something during the action
    pub health_risk: Option<f64>,
}

impl Default for ActionModifiers {
    fn default() -> Self {
        Self {
            energy_cost_modifier: 1.0,
            energy_regen: 0,
            energy_bonus: 0,
            health_risk: None,
        }
    }
}

// ============================================================================
// Player Resources
// ============================================================================

/// The player's resource levels. Owned by the caller, never by the core.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResourceState {
    pub health: i32,
    pub energy: i32,
    /// Reales on hand
    pub wealth: u32,
    #[serde(default)]
    pub consecutive_low_energy_turns: u32,
}

impl PlayerResourceState {
    /// Fresh game: full health and energy, the given purse
    pub fn new_game(starting_wealth: u32) -> Self {
        Self {
            health: 100,
            energy: 100,
            wealth: starting_wealth,
            consecutive_low_energy_turns: 0,
        }
    }
}

impl Default for PlayerResourceState {
    fn default() -> Self {
        Self::new_game(10)
    }
}

/// Severity tier of a resource warning, least severe first
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum WarningLevel {
    Caution,
    Warning,
    Critical,
}

impl fmt::Display for WarningLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WarningLevel::Caution => "caution",
            WarningLevel::Warning => "warning",
            WarningLevel::Critical => "critical",
        };
        f.write_str(s)
    }
}

/// A warning shown when energy or health runs low
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ResourceWarning {
    pub level: WarningLevel,
    pub message: &'static str,
    pub icon: &'static str,
}

/// Quality tier of a meal the player can afford
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MealQuality {
    Good,
    Adequate,
    Poor,
}

/// Effects of eating, derived from the player's wealth
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct MealOption {
    pub energy: i32,
    pub health: i32,
    pub cost: u32,
    pub quality: MealQuality,
    pub message: &'static str,
}

/// Energy and health regained from a night's sleep
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SleepRegeneration {
    pub energy: i32,
    pub health: i32,
    pub well_rested: bool,
}

/// Result of the per-turn health check
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HealthDecrease {
    pub new_health: i32,
    pub decrease: i32,
    pub reasons: Vec<&'static str>,
}

// ============================================================================
// Patients and Symptoms
// ============================================================================

/// A symptom as recorded on a patient: either a bare label or an object
/// with a `name` and arbitrary extra fields.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Symptom {
    Named(String),
    Detailed {
        name: String,
        #[serde(flatten)]
        details: serde_json::Map<String, serde_json::Value>,
    },
}

impl Symptom {
    pub fn name(&self) -> &str {
        match self {
            Symptom::Named(name) => name,
            Symptom::Detailed { name, .. } => name,
        }
    }
}

impl From<&str> for Symptom {
    fn from(name: &str) -> Self {
        Symptom::Named(name.to_string())
    }
}

/// The parts of a patient the treatment generator reads
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct Patient {
    #[serde(default)]
    pub diagnosis: String,
    #[serde(default)]
    pub symptoms: Vec<Symptom>,
}

/// Canonical symptom families the knowledge base is keyed on
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SymptomKey {
    Headache,
    Fever,
    JointPain,
    SkinLesions,
    AbdominalPain,
    ChestPain,
    VisionProblems,
    Cough,
    GeneralPain,
}

// ============================================================================
// Practitioners and Treatment History
// ============================================================================

/// Kinds of healer practising in 1680s Mexico City
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PractitionerType {
    Physician,
    Curandera,
    BarberSurgeon,
    Apothecary,
}

impl PractitionerType {
    pub const ALL: [PractitionerType; 4] = [
        PractitionerType::Physician,
        PractitionerType::Curandera,
        PractitionerType::BarberSurgeon,
        PractitionerType::Apothecary,
    ];
}

/// How a past treatment turned out
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Positive,
    Neutral,
    Negative,
}

impl Outcome {
    pub const ALL: [Outcome; 3] = [Outcome::Positive, Outcome::Neutral, Outcome::Negative];
}

/// Who administered a treatment
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Practitioner {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: PractitionerType,
    pub title: String,
    pub education: String,
    pub is_player: bool,
}

/// What was done to the patient
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TreatmentSummary {
    pub name: String,
    pub method: String,
    pub theory: String,
}

/// One line of a patient's treatment history
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentEntry {
    pub date: String,
    /// Days before the current game date; 0 for the player's own work
    #[serde(default)]
    pub days_ago: u32,
    pub practitioner: Practitioner,
    pub treatment: TreatmentSummary,
    pub outcome: String,
    pub notes: String,
}

/// A remedy the player has just administered
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerTreatment {
    pub name: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub theory: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parses_front_end_ids() {
        assert_eq!("seePatients".parse::<Action>().unwrap(), Action::SeePatients);
        assert_eq!("see_patients".parse::<Action>().unwrap(), Action::SeePatients);
        assert_eq!("SLEEP".parse::<Action>().unwrap(), Action::Sleep);
        assert!(matches!(
            "dance".parse::<Action>(),
            Err(Error::UnknownAction(_))
        ));
    }

    #[test]
    fn test_action_display_matches_serde() {
        for action in Action::ALL {
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{}\"", action));
        }
    }

    #[test]
    fn test_symptom_accepts_strings_and_objects() {
        let symptoms: Vec<Symptom> =
            serde_json::from_str(r#"["fever", {"name": "dry cough", "severity": "mild"}]"#)
                .unwrap();

        assert_eq!(symptoms[0].name(), "fever");
        assert_eq!(symptoms[1].name(), "dry cough");
        match &symptoms[1] {
            Symptom::Detailed { details, .. } => {
                assert_eq!(details.get("severity").unwrap(), "mild");
            }
            Symptom::Named(_) => panic!("expected detailed symptom"),
        }
    }

    #[test]
    fn test_modifiers_default_from_empty_json() {
        let modifiers: ActionModifiers = serde_json::from_str("{}").unwrap();
        assert_eq!(modifiers, ActionModifiers::default());
    }

    #[test]
    fn test_treatment_entry_uses_front_end_field_names() {
        let entry = TreatmentEntry {
            date: "July 28, 1680".into(),
            days_ago: 4,
            practitioner: Practitioner {
                name: "Maria de Lima".into(),
                kind: PractitionerType::BarberSurgeon,
                title: "Apothecary".into(),
                education: "Apprenticed".into(),
                is_player: true,
            },
            treatment: TreatmentSummary {
                name: "Theriac".into(),
                method: "Oral".into(),
                theory: "Galenic".into(),
            },
            outcome: "Pending".into(),
            notes: "".into(),
        };

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["practitioner"]["type"], "barber_surgeon");
        assert_eq!(value["practitioner"]["isPlayer"], true);
        assert_eq!(value["daysAgo"], 4);
    }
}
