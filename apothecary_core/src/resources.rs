//! Energy, health and wealth accounting.
//!
//! Translates a requested action into resource deltas, decides whether the
//! player can afford it, and classifies resource levels into warning tiers.
//! Nothing here fails: unknown action names cost nothing and missing
//! modifiers fall back to their defaults.

use crate::{
    Action, ActionModifiers, HealthDecrease, MealOption, MealQuality, PlayerResourceState,
    ResourceWarning, SleepRegeneration, WarningLevel,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Energy below which no strenuous action may be attempted
pub const MIN_ACTION_ENERGY: i32 = 10;

/// Energy below which a turn counts toward the low-energy streak
pub const LOW_ENERGY_THRESHOLD: i32 = 20;

/// Ceiling on a single night's regeneration
const SLEEP_REGEN_CAP: i32 = 100;

/// Base energy cost of an action. Negative costs restore energy.
pub fn base_energy_cost(action: Action) -> i32 {
    match action {
        Action::Study => 15,
        Action::Forage => 20,
        Action::Mix => 10,
        Action::SeePatients => 20,
        Action::Travel => 15,
        Action::Chat => 1,
        Action::Prescribe => 5,
        Action::Buy => 3,
        Action::Sleep => -60,
        Action::Eat => -15,
    }
}

/// Base energy cost looked up by front-end identifier; unknown names cost 0
pub fn action_energy_cost_by_name(name: &str) -> i32 {
    match name.parse::<Action>() {
        Ok(action) => base_energy_cost(action),
        Err(_) => {
            tracing::debug!("Unknown action '{}', treating as free", name);
            0
        }
    }
}

/// Upper bounds on the player's resources
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResourceLimits {
    pub max_health: i32,
    pub max_energy: i32,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_health: 100,
            max_energy: 100,
        }
    }
}

/// Resource rules for one game. Holds nothing but its limits, so it is
/// cheap to copy and safe to share.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResourceManager {
    limits: ResourceLimits,
}

impl ResourceManager {
    pub fn new(limits: ResourceLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> ResourceLimits {
        self.limits
    }

    /// Energy cost of `action` after the cost modifier, rounded half-up.
    ///
    /// Saturates at the `i32` range; a NaN modifier costs nothing.
    pub fn get_energy_cost(&self, action: Action, modifiers: &ActionModifiers) -> i32 {
        let scaled = f64::from(base_energy_cost(action)) * modifiers.energy_cost_modifier;
        // Float-to-int `as` saturates and maps NaN to 0
        (scaled + 0.5).floor() as i32
    }

    /// Energy after performing `action`, always within `[0, max_energy]`
    pub fn calculate_energy_change(
        &self,
        current_energy: i32,
        action: Action,
        modifiers: &ActionModifiers,
    ) -> i32 {
        let cost = self.get_energy_cost(action, modifiers);
        let new_energy = i64::from(current_energy) - i64::from(cost)
            + i64::from(modifiers.energy_regen)
            + i64::from(modifiers.energy_bonus);
        let clamped = new_energy.clamp(0, i64::from(self.limits.max_energy.max(0)));
        i32::try_from(clamped).unwrap_or(self.limits.max_energy)
    }

    /// Whether the player has the energy to attempt `action`.
    ///
    /// Restorative actions are always allowed. Anything else needs at least
    /// [`MIN_ACTION_ENERGY`] and at least the action's own cost.
    pub fn can_perform_action(
        &self,
        current_energy: i32,
        action: Action,
        modifiers: &ActionModifiers,
    ) -> bool {
        let cost = self.get_energy_cost(action, modifiers);
        if cost < 0 {
            return true;
        }
        current_energy >= MIN_ACTION_ENERGY && current_energy >= cost
    }

    pub fn get_energy_warning(&self, current_energy: i32) -> Option<ResourceWarning> {
        if current_energy < 10 {
            Some(ResourceWarning {
                level: WarningLevel::Critical,
                message: "You are utterly exhausted and can barely stand. You must rest.",
                icon: "😵",
            })
        } else if current_energy < 25 {
            Some(ResourceWarning {
                level: WarningLevel::Warning,
                message: "You are very tired. Strenuous work may soon be beyond you.",
                icon: "😫",
            })
        } else if current_energy < 40 {
            Some(ResourceWarning {
                level: WarningLevel::Caution,
                message: "You are growing weary. Consider resting soon.",
                icon: "😓",
            })
        } else {
            None
        }
    }

    /// Health lost this turn from poverty, overwork and disease.
    ///
    /// `rng` is only drawn from when `modifiers.health_risk` is set.
    pub fn calculate_health_decrease(
        &self,
        current_health: i32,
        state: &PlayerResourceState,
        modifiers: &ActionModifiers,
        rng: &mut impl Rng,
    ) -> HealthDecrease {
        let mut total_decrease = 0;
        let mut reasons = Vec::new();

        if state.wealth < 5 {
            total_decrease += 3;
            reasons.push("Poor living conditions");
        }

        if state.energy < LOW_ENERGY_THRESHOLD && state.consecutive_low_energy_turns >= 3 {
            total_decrease += 5;
            reasons.push("Severe overwork");
        }

        if let Some(risk) = modifiers.health_risk {
            let roll: f64 = rng.gen();
            if roll < risk {
                total_decrease += 10;
                if total_decrease > 0 {
                    reasons.push("Disease exposure");
                }
            }
        }

        let new_health = current_health.saturating_sub(total_decrease).max(0);

        if total_decrease > 0 {
            tracing::debug!(
                "Health decreased by {} ({:?}): {} -> {}",
                total_decrease,
                reasons,
                current_health,
                new_health
            );
        }

        HealthDecrease {
            new_health,
            decrease: total_decrease,
            reasons,
        }
    }

    pub fn get_health_warning(&self, current_health: i32) -> Option<ResourceWarning> {
        if current_health < 20 {
            Some(ResourceWarning {
                level: WarningLevel::Critical,
                message: "You are gravely ill. Without rest and care you may not recover.",
                icon: "🤒",
            })
        } else if current_health < 40 {
            Some(ResourceWarning {
                level: WarningLevel::Warning,
                message: "You feel feverish and weak. Your work is suffering.",
                icon: "🤕",
            })
        } else if current_health < 60 {
            Some(ResourceWarning {
                level: WarningLevel::Caution,
                message: "You feel slightly unwell.",
                icon: "😷",
            })
        } else {
            None
        }
    }

    /// Regeneration from `sleep_hours` of sleep.
    ///
    /// Each increment is capped at 100 on its own; the caller still has to
    /// clamp the resulting totals.
    pub fn calculate_sleep_regeneration(&self, sleep_hours: f64) -> SleepRegeneration {
        let mut energy_regen = sleep_hours * 8.0;
        let mut health_regen = sleep_hours * 2.0;
        let well_rested = sleep_hours >= 7.0;

        if well_rested {
            energy_regen += 10.0;
            health_regen += 5.0;
        }

        SleepRegeneration {
            energy: (energy_regen.round() as i32).min(SLEEP_REGEN_CAP),
            health: (health_regen.round() as i32).min(SLEEP_REGEN_CAP),
            well_rested,
        }
    }

    /// What the player can afford to eat with `wealth` reales
    pub fn calculate_meal_effects(&self, wealth: u32) -> MealOption {
        if wealth >= 5 {
            MealOption {
                energy: 20,
                health: 5,
                cost: 3,
                quality: MealQuality::Good,
                message: "A hearty meal of tortillas, beans and stewed meat restores your strength.",
            }
        } else if wealth >= 2 {
            MealOption {
                energy: 15,
                health: 2,
                cost: 2,
                quality: MealQuality::Adequate,
                message: "A simple meal of tortillas and beans fills your belly.",
            }
        } else {
            MealOption {
                energy: 10,
                health: 0,
                cost: 1,
                quality: MealQuality::Poor,
                message: "A meagre bowl of atole is all you can afford.",
            }
        }
    }

    /// Next value of the low-energy streak; any rested turn resets it
    pub fn update_low_energy_streak(&self, current_energy: i32, previous_streak: u32) -> u32 {
        if current_energy < LOW_ENERGY_THRESHOLD {
            previous_streak.saturating_add(1)
        } else {
            0
        }
    }

    /// One-word description of how the player feels. Health dominates,
    /// then low energy, then the good states.
    pub fn get_status_description(&self, health: i32, energy: i32) -> &'static str {
        if health < 20 {
            return "critically ill";
        }
        if health < 40 {
            return "unwell";
        }
        if energy < 10 {
            return "exhausted";
        }
        if energy < 25 {
            return "tired";
        }
        if energy < 40 {
            return "weary";
        }
        if health > 80 && energy > 70 {
            return "vigorous";
        }
        if health > 60 && energy > 50 {
            return "rested";
        }
        "adequate"
    }
}
