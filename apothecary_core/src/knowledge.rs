//! Period medical knowledge used to invent a patient's past treatments.
//!
//! Practitioner profiles, their case-note voices, treatment templates keyed
//! by (symptom, practitioner) and a generic pool for when nothing matches.

use crate::{Outcome, PractitionerType, SymptomKey};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// A treatment a practitioner might have tried, with the canned text for
/// each way it could have gone
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct TreatmentTemplate {
    pub name: &'static str,
    pub method: &'static str,
    pub theory: &'static str,
    pub positive: &'static str,
    pub neutral: &'static str,
    pub negative: &'static str,
}

impl TreatmentTemplate {
    pub fn outcome_text(&self, outcome: Outcome) -> &'static str {
        match outcome {
            Outcome::Positive => self.positive,
            Outcome::Neutral => self.neutral,
            Outcome::Negative => self.negative,
        }
    }
}

/// How a kind of practitioner presents in the records
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct PractitionerProfile {
    pub names: &'static [&'static str],
    pub title: &'static str,
    pub education: &'static str,
    /// Case notes in this practitioner's voice, chosen regardless of outcome
    pub notes: [&'static str; 3],
}

/// A fallback treatment together with who gave it
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct GenericTreatment {
    pub practitioner: PractitionerType,
    pub template: TreatmentTemplate,
}

// ============================================================================
// Practitioners
// ============================================================================

static PHYSICIAN: PractitionerProfile = PractitionerProfile {
    names: &[
        "Dr. Alonso de Villanueva",
        "Dr. Juan de Torres y Cervantes",
        "Dr. Diego Osorio de Peralta",
        "Dr. Francisco Hernández de la Fuente",
    ],
    title: "Médico",
    education: "Doctor of Medicine, Royal and Pontifical University of Mexico",
    notes: [
        "The urine was examined and judged to be of a choleric colour.",
        "The humours appear much disordered; further evacuation advised.",
        "Patient instructed to keep to a cooling diet and avoid the night air.",
    ],
};

static CURANDERA: PractitionerProfile = PractitionerProfile {
    names: &[
        "Doña Xóchitl",
        "Tía Juana la Yerbera",
        "Doña Catalina Tlapalli",
        "Mariana de los Remedios",
    ],
    title: "Curandera",
    education: "Taught the old remedies of the Nahua by her grandmother",
    notes: [
        "An egg was passed over the body; it showed dark threads when cracked.",
        "The family was told the illness came from a cold wind at the crossroads.",
        "Copal was burned and prayers said to the Virgin and the old ones alike.",
    ],
};

static BARBER_SURGEON: PractitionerProfile = PractitionerProfile {
    names: &[
        "Maese Pedro Gutiérrez",
        "Maese Andrés Calderón",
        "Maese Tomás de Ávila",
    ],
    title: "Barbero Sangrador",
    education: "Apprenticed in a barbershop on the Calle de Tacuba, examined by the Protomedicato",
    notes: [
        "Patient bore the procedure without complaint.",
        "The blood ran thick and dark, a sign of corrupted humours.",
        "Fee of two reales paid in advance.",
    ],
};

static APOTHECARY: PractitionerProfile = PractitionerProfile {
    names: &[
        "Don Gaspar Ruiz",
        "Don Luis de Arellano",
        "Doña Isabel de Mendoza",
    ],
    title: "Boticario",
    education: "Licensed apothecary, examined by the Royal Protomedicato",
    notes: [
        "Compound prepared according to the Pharmacopoeia Augustana.",
        "Patient advised to take the remedy at dawn and again at dusk.",
        "Ingredients were dear; the family will pay in instalments.",
    ],
};

/// Profile for a kind of practitioner
pub fn practitioner_profile(kind: PractitionerType) -> &'static PractitionerProfile {
    match kind {
        PractitionerType::Physician => &PHYSICIAN,
        PractitionerType::Curandera => &CURANDERA,
        PractitionerType::BarberSurgeon => &BARBER_SURGEON,
        PractitionerType::Apothecary => &APOTHECARY,
    }
}

// ============================================================================
// Generic fallback pool
// ============================================================================

static GENERIC_TREATMENTS: [GenericTreatment; 4] = [
    GenericTreatment {
        practitioner: PractitionerType::Physician,
        template: TreatmentTemplate {
            name: "General Bloodletting",
            method: "Phlebotomy from the arm on the side opposite the complaint",
            theory: "Draws off the excess humour that is the root of all distempers",
            positive: "The patient felt lighter and slept soundly afterward.",
            neutral: "No change in the patient's condition was observed.",
            negative: "The patient grew faint and pale, and has been weaker since.",
        },
    },
    GenericTreatment {
        practitioner: PractitionerType::Apothecary,
        template: TreatmentTemplate {
            name: "Theriac",
            method: "A spoonful of Venice treacle dissolved in wine",
            theory: "The universal antidote strengthens the vital spirits against any poison",
            positive: "The patient reported renewed strength for some days.",
            neutral: "The remedy was taken without any evident effect.",
            negative: "The patient vomited the dose and refused a second.",
        },
    },
    GenericTreatment {
        practitioner: PractitionerType::Curandera,
        template: TreatmentTemplate {
            name: "Limpia",
            method: "Sweeping the body with bundles of rue and pirul, then an egg",
            theory: "Removes the aire and restores the balance of the tonalli",
            positive: "The patient's spirits rose markedly after the cleansing.",
            neutral: "The family felt comforted, though the illness remained.",
            negative: "The illness returned within days, worse than before.",
        },
    },
    GenericTreatment {
        practitioner: PractitionerType::BarberSurgeon,
        template: TreatmentTemplate {
            name: "Purge and Clyster",
            method: "An enema of mallow and oil followed by a senna purge",
            theory: "Empties the bowels of corrupted matter feeding the disease",
            positive: "The patient's colour improved after the evacuation.",
            neutral: "The bowels were emptied but the complaint persists.",
            negative: "The purge left the patient griping and dehydrated.",
        },
    },
];

/// Treatments used when a patient's complaint matches nothing specific
pub fn generic_treatments() -> &'static [GenericTreatment; 4] {
    &GENERIC_TREATMENTS
}

// ============================================================================
// Treatments by symptom
// ============================================================================

/// Treatment templates keyed by symptom and practitioner
#[derive(Clone, Debug, Default)]
pub struct KnowledgeBase {
    treatments: HashMap<(SymptomKey, PractitionerType), Vec<TreatmentTemplate>>,
}

/// Cached default knowledge base, built once
static DEFAULT_KNOWLEDGE: Lazy<KnowledgeBase> = Lazy::new(build_default_knowledge);

/// Get a reference to the cached default knowledge base
pub fn get_default_knowledge() -> &'static KnowledgeBase {
    &DEFAULT_KNOWLEDGE
}

impl KnowledgeBase {
    /// A knowledge base with no specific treatments; everything falls back
    /// to the generic pool
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        symptom: SymptomKey,
        practitioner: PractitionerType,
        template: TreatmentTemplate,
    ) {
        self.treatments
            .entry((symptom, practitioner))
            .or_default()
            .push(template);
    }

    /// Templates for the pair; empty when the pair is unknown
    pub fn treatments_for(
        &self,
        symptom: SymptomKey,
        practitioner: PractitionerType,
    ) -> &[TreatmentTemplate] {
        self.treatments
            .get(&(symptom, practitioner))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn template_count(&self) -> usize {
        self.treatments.values().map(Vec::len).sum()
    }

    /// Self-check of the tables. Returns a list of problems, empty if sound.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for ((symptom, practitioner), templates) in &self.treatments {
            for t in templates {
                let texts = [t.name, t.method, t.theory, t.positive, t.neutral, t.negative];
                if texts.iter().any(|s| s.trim().is_empty()) {
                    errors.push(format!(
                        "Treatment '{}' for {:?}/{:?} has an empty field",
                        t.name, symptom, practitioner
                    ));
                }
            }
        }

        for kind in PractitionerType::ALL {
            let profile = practitioner_profile(kind);
            if profile.names.is_empty() {
                errors.push(format!("Practitioner {:?} has no names", kind));
            }
            if profile.notes.iter().any(|n| n.trim().is_empty()) {
                errors.push(format!("Practitioner {:?} has an empty note", kind));
            }
        }

        for generic in generic_treatments() {
            let t = &generic.template;
            if [t.name, t.positive, t.neutral, t.negative]
                .iter()
                .any(|s| s.trim().is_empty())
            {
                errors.push(format!("Generic treatment '{}' has an empty field", t.name));
            }
        }

        errors
    }
}

/// Builds the default knowledge base.
///
/// Not every (symptom, practitioner) pair has entries: nobody sends for a
/// barber to treat failing eyesight. Missing pairs fall back to the generic
/// pool.
pub fn build_default_knowledge() -> KnowledgeBase {
    use PractitionerType::*;
    use SymptomKey::*;

    let mut kb = KnowledgeBase::empty();

    // Headache
    kb.insert(
        Headache,
        Physician,
        TreatmentTemplate {
            name: "Bleeding from the Forehead Vein",
            method: "A small incision at the frontal vein to release blood from the head",
            theory: "Relieves the plethora of blood pressing upon the brain",
            positive: "The pain eased within the hour and did not return that day.",
            neutral: "The pain lessened briefly, then returned by evening.",
            negative: "The patient swooned and the headache was worse on waking.",
        },
    );
    kb.insert(
        Headache,
        Curandera,
        TreatmentTemplate {
            name: "Poultice of Rue and Tobacco",
            method: "Crushed rue and picietl bound to the temples with a cloth",
            theory: "Draws the heat and the bad air out through the skin",
            positive: "The patient slept deeply and woke clear-headed.",
            neutral: "The smell was strong; the pain remained much the same.",
            negative: "The skin of the temples blistered and the pain persisted.",
        },
    );
    kb.insert(
        Headache,
        Apothecary,
        TreatmentTemplate {
            name: "Oil of Roses and Vinegar",
            method: "Rubbed into the brow and nape twice daily",
            theory: "The cold quality of roses tempers a hot, choleric head",
            positive: "The throbbing subsided over two days.",
            neutral: "A pleasant remedy, though of little lasting effect.",
            negative: "The vinegar stung the eyes and brought on weeping and worse pain.",
        },
    );

    // Fever
    kb.insert(
        Fever,
        Physician,
        TreatmentTemplate {
            name: "Bloodletting and Cooling Diet",
            method: "Eight ounces of blood taken from the arm, then barley water and chicken broth",
            theory: "Fever is putrefaction of the blood; letting it cools the body",
            positive: "The fever broke on the third day.",
            neutral: "The fever continued its tertian course unchanged.",
            negative: "The patient weakened greatly and the fever rose higher.",
        },
    );
    kb.insert(
        Fever,
        Physician,
        TreatmentTemplate {
            name: "Jesuit's Bark",
            method: "Powdered quina bark steeped in wine, taken before the paroxysm",
            theory: "A hot and dry remedy from Peru that checks the intermittent fever",
            positive: "The fits ceased entirely after the second dose.",
            neutral: "The fits came later each day but did not stop.",
            negative: "The bitter draught was vomited and the fever held.",
        },
    );
    kb.insert(
        Fever,
        Curandera,
        TreatmentTemplate {
            name: "Temazcal Sweat Bath",
            method: "A session in the steam bath with herbs cast upon the hot stones",
            theory: "Sweating drives the cold illness out of the body",
            positive: "The patient sweated freely and the fever fell by morning.",
            neutral: "The patient rested well but remained feverish.",
            negative: "The patient fainted in the heat and had to be carried out.",
        },
    );
    kb.insert(
        Fever,
        BarberSurgeon,
        TreatmentTemplate {
            name: "Wet Cupping",
            method: "Scarification of the back followed by heated cupping glasses",
            theory: "Draws corrupt blood to the surface and out of the body",
            positive: "The patient reported relief and the heat lessened.",
            neutral: "Marks remained on the back; the fever did not change.",
            negative: "The cuts festered and the fever grew worse.",
        },
    );
    kb.insert(
        Fever,
        Apothecary,
        TreatmentTemplate {
            name: "Syrup of Violets",
            method: "Two spoonfuls in water every four hours",
            theory: "Cold and moist, it tempers the heat of a burning fever",
            positive: "The fever abated and the patient took food again.",
            neutral: "The syrup was pleasant but the fever continued.",
            negative: "The patient's bowels loosened badly and the fever held.",
        },
    );

    // Joint pain
    kb.insert(
        JointPain,
        Physician,
        TreatmentTemplate {
            name: "Purge with Hermodactyl",
            method: "A draught of hermodactyl and senna to evacuate phlegm",
            theory: "Gout and joint pains are phlegm flowing down into the limbs",
            positive: "The swelling in the joints went down after the purge.",
            neutral: "The patient was purged thoroughly, but the ache remains.",
            negative: "The purge weakened the patient and the joints still burn.",
        },
    );
    kb.insert(
        JointPain,
        Curandera,
        TreatmentTemplate {
            name: "Árnica in Aguardiente",
            method: "Árnica flowers macerated in cane spirit, rubbed into the joints at night",
            theory: "The warm remedy loosens what the cold has stiffened",
            positive: "The patient moved more freely within a week.",
            neutral: "Brief warmth and comfort, but the stiffness returned.",
            negative: "The skin reddened and cracked; the stiffness remained.",
        },
    );
    kb.insert(
        JointPain,
        BarberSurgeon,
        TreatmentTemplate {
            name: "Leeches to the Knee",
            method: "Six leeches applied around the swollen joint",
            theory: "Draws off the stagnant blood settled in the joint",
            positive: "The swelling subsided considerably.",
            neutral: "The leeches fed but the pain was unchanged.",
            negative: "One bite became inflamed and the knee is now hotter than before.",
        },
    );

    // Skin lesions
    kb.insert(
        SkinLesions,
        Physician,
        TreatmentTemplate {
            name: "Mercurial Ointment",
            method: "Quicksilver salve rubbed into the sores, the patient kept warm to salivate",
            theory: "Mercury drives out the French pox through spittle and sweat",
            positive: "The sores dried and began to heal.",
            neutral: "The sores neither spread nor healed.",
            negative: "The gums became swollen and the teeth loosened.",
        },
    );
    kb.insert(
        SkinLesions,
        Curandera,
        TreatmentTemplate {
            name: "Aloe and Tepezcohuite Wash",
            method: "Sores washed with a decoction of tepezcohuite bark, then aloe applied",
            theory: "The bark closes wounds; aloe cools the burning flesh",
            positive: "The lesions closed cleanly within days.",
            neutral: "The sores stopped weeping but did not close.",
            negative: "New sores appeared beside the old ones.",
        },
    );
    kb.insert(
        SkinLesions,
        BarberSurgeon,
        TreatmentTemplate {
            name: "Lancing and Cautery",
            method: "The swelling opened with a lancet and seared with a hot iron",
            theory: "Releases the trapped pus and seals the corruption",
            positive: "The wound drained and healed over cleanly.",
            neutral: "The wound drained but left an angry scar.",
            negative: "The burn festered and a fever followed.",
        },
    );
    kb.insert(
        SkinLesions,
        Apothecary,
        TreatmentTemplate {
            name: "Unguentum Album",
            method: "White lead ointment spread thinly over the rash",
            theory: "Dries and cools the inflamed skin",
            positive: "The rash faded over the following week.",
            neutral: "The itching eased though the rash remained.",
            negative: "The skin broke out further where the ointment was applied.",
        },
    );

    // Abdominal pain
    kb.insert(
        AbdominalPain,
        Physician,
        TreatmentTemplate {
            name: "Clyster of Chamomile",
            method: "An enema of chamomile and oil of dill",
            theory: "Dissolves the wind and relaxes the griping bowels",
            positive: "The cramps ceased after the bowels were moved.",
            neutral: "The patient was relieved of wind only.",
            negative: "The cramps grew sharper through the night.",
        },
    );
    kb.insert(
        AbdominalPain,
        Curandera,
        TreatmentTemplate {
            name: "Epazote Tea",
            method: "A strong infusion of epazote drunk on an empty stomach",
            theory: "Expels worms and the cold lodged in the belly",
            positive: "Worms were passed and the pain subsided.",
            neutral: "The tea settled the stomach for a time.",
            negative: "The patient vomited repeatedly and was dizzy.",
        },
    );
    kb.insert(
        AbdominalPain,
        Apothecary,
        TreatmentTemplate {
            name: "Confection of Hyacinth",
            method: "A dram of the confection in rosewater after meals",
            theory: "Fortifies the stomach and heart against corrupt vapours",
            positive: "Digestion improved and the pain eased.",
            neutral: "No clear change in the patient's belly.",
            negative: "The costly remedy brought on a looseness of the bowels.",
        },
    );

    // Chest pain / breathing
    kb.insert(
        ChestPain,
        Physician,
        TreatmentTemplate {
            name: "Pleuritic Bleeding",
            method: "Blood let from the arm on the side of the pain",
            theory: "Relieves the inflammation of the pleura by revulsion",
            positive: "The stitch in the side eased and breathing came easier.",
            neutral: "Breathing remained laboured but no worse.",
            negative: "The patient became short of breath and pale.",
        },
    );
    kb.insert(
        ChestPain,
        Curandera,
        TreatmentTemplate {
            name: "Mustard and Lard Plaster",
            method: "A hot plaster of ground mustard seed and lard upon the chest",
            theory: "The heat loosens the congestion binding the chest",
            positive: "The patient coughed up much phlegm and breathed freely.",
            neutral: "The chest was warmed but the tightness continued.",
            negative: "The plaster burned the skin and the breathing did not ease.",
        },
    );
    kb.insert(
        ChestPain,
        BarberSurgeon,
        TreatmentTemplate {
            name: "Dry Cupping of the Chest",
            method: "Heated glasses set upon the breast and back without cutting",
            theory: "Draws the humour away from the lungs",
            positive: "The patient breathed more deeply afterward.",
            neutral: "Round bruises marked the chest; no change otherwise.",
            negative: "The patient's cough worsened after the cupping.",
        },
    );

    // Vision problems
    kb.insert(
        VisionProblems,
        Physician,
        TreatmentTemplate {
            name: "Fennel Eye Water",
            method: "Distilled fennel water dropped into the eyes thrice daily",
            theory: "Fennel clears the gross vapours clouding the sight",
            positive: "The patient reports seeing more clearly.",
            neutral: "The eyes were soothed but the sight is unchanged.",
            negative: "The eyes reddened and wept for days.",
        },
    );
    kb.insert(
        VisionProblems,
        Curandera,
        TreatmentTemplate {
            name: "Breast Milk Drops",
            method: "A few drops of a nursing mother's milk in each eye",
            theory: "Mother's milk soothes and cleans the eye",
            positive: "The redness cleared within a few days.",
            neutral: "The eyes felt cooler but looked the same.",
            negative: "The eyes became crusted and inflamed.",
        },
    );
    kb.insert(
        VisionProblems,
        Apothecary,
        TreatmentTemplate {
            name: "Tutty Collyrium",
            method: "Prepared zinc calx in rosewater bathed over the eyes",
            theory: "Dries the rheum that flows down into the eyes",
            positive: "The rheum dried and the sight sharpened.",
            neutral: "The weeping slowed, the sight did not improve.",
            negative: "The eyes stung fiercely and the patient refused more.",
        },
    );

    // Cough
    kb.insert(
        Cough,
        Physician,
        TreatmentTemplate {
            name: "Syrup of Horehound",
            method: "Horehound syrup with honey, a spoonful morning and night",
            theory: "Cuts and expels the thick phlegm from the lungs",
            positive: "The cough loosened and quieted over a week.",
            neutral: "The cough continues, if somewhat easier.",
            negative: "The cough deepened and blood appeared in the spittle.",
        },
    );
    kb.insert(
        Cough,
        Curandera,
        TreatmentTemplate {
            name: "Gordolobo and Honey Tea",
            method: "Mullein flowers boiled with honey and lime, drunk hot",
            theory: "Warms the throat and softens the dry cough",
            positive: "The throat soothed and the cough subsided.",
            neutral: "The tea gave comfort at night only.",
            negative: "The cough grew harsher despite the remedy.",
        },
    );
    kb.insert(
        Cough,
        Apothecary,
        TreatmentTemplate {
            name: "Lohoch of Squills",
            method: "A thick linctus of squill and honey licked from a spoon",
            theory: "Squill incises the tough phlegm so it can be brought up",
            positive: "Phlegm came up readily and the chest cleared.",
            neutral: "The linctus eased the throat but not the cough.",
            negative: "The squill provoked vomiting and the cough remained.",
        },
    );

    // General pain
    kb.insert(
        GeneralPain,
        Physician,
        TreatmentTemplate {
            name: "Laudanum",
            method: "Ten drops of tincture of opium in wine at bedtime",
            theory: "Opium numbs the sense of pain and brings sleep",
            positive: "The patient slept and woke with much less pain.",
            neutral: "The patient slept, but the pain returned with the day.",
            negative: "The patient was stupefied for a day and constipated after.",
        },
    );
    kb.insert(
        GeneralPain,
        BarberSurgeon,
        TreatmentTemplate {
            name: "Bleeding at the Ankle",
            method: "Blood let from the saphenous vein",
            theory: "Revulsion draws the painful humour downward and away",
            positive: "The pain lifted after the bleeding.",
            neutral: "The patient felt no different afterward.",
            negative: "The patient was left weak and dizzy for days.",
        },
    );
    kb.insert(
        GeneralPain,
        Apothecary,
        TreatmentTemplate {
            name: "Plaster of Henbane",
            method: "A plaster of henbane and wax applied over the seat of pain",
            theory: "Henbane is cold in the fourth degree and stupefies pain",
            positive: "The pain was numbed and the patient could work again.",
            neutral: "Little effect beyond some drowsiness.",
            negative: "The patient became confused and agitated.",
        },
    );

    tracing::debug!("Built knowledge base with {} templates", kb.template_count());
    kb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_knowledge_validates() {
        let errors = build_default_knowledge().validate();
        assert!(errors.is_empty(), "Knowledge base errors: {:?}", errors);
    }

    #[test]
    fn test_every_symptom_has_some_treatment() {
        let kb = get_default_knowledge();
        for symptom in [
            SymptomKey::Headache,
            SymptomKey::Fever,
            SymptomKey::JointPain,
            SymptomKey::SkinLesions,
            SymptomKey::AbdominalPain,
            SymptomKey::ChestPain,
            SymptomKey::VisionProblems,
            SymptomKey::Cough,
            SymptomKey::GeneralPain,
        ] {
            let total: usize = PractitionerType::ALL
                .iter()
                .map(|p| kb.treatments_for(symptom, *p).len())
                .sum();
            assert!(total > 0, "No treatments for {:?}", symptom);
        }
    }

    #[test]
    fn test_missing_pair_is_empty() {
        let kb = get_default_knowledge();
        assert!(kb
            .treatments_for(SymptomKey::VisionProblems, PractitionerType::BarberSurgeon)
            .is_empty());
        assert!(KnowledgeBase::empty()
            .treatments_for(SymptomKey::Fever, PractitionerType::Physician)
            .is_empty());
    }

    #[test]
    fn test_every_practitioner_has_three_notes() {
        for kind in PractitionerType::ALL {
            let profile = practitioner_profile(kind);
            assert!(!profile.names.is_empty());
            assert_eq!(profile.notes.len(), 3);
        }
    }

    #[test]
    fn test_outcome_text_lookup() {
        let template = &generic_treatments()[0].template;
        assert_eq!(template.outcome_text(Outcome::Positive), template.positive);
        assert_eq!(template.outcome_text(Outcome::Neutral), template.neutral);
        assert_eq!(template.outcome_text(Outcome::Negative), template.negative);
    }

    #[test]
    fn test_validate_flags_empty_fields() {
        let mut kb = KnowledgeBase::empty();
        kb.insert(
            SymptomKey::Fever,
            PractitionerType::Physician,
            TreatmentTemplate {
                name: "Nothing",
                method: "",
                theory: "x",
                positive: "x",
                neutral: "x",
                negative: "x",
            },
        );
        assert_eq!(kb.validate().len(), 1);
    }
}
