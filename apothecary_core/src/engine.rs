//! Turn engine: applies the resource rules to a player's state.
//!
//! The resource manager only computes deltas. This module does what the
//! game's event handlers do with them:
//! - Refuse actions the player is too tired for
//! - Apply the energy change, then the low-energy streak, then health decline
//! - Apply meals and sleep, keeping totals within the limits

use crate::resources::ResourceManager;
use crate::{
    Action, ActionModifiers, HealthDecrease, MealOption, PlayerResourceState, ResourceWarning,
    SleepRegeneration,
};
use rand::Rng;
use serde::Serialize;

/// What happened when the player tried an action
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ActionReport {
    /// Not enough energy; state is untouched
    Refused {
        action: Action,
        energy: i32,
        cost: i32,
        warning: Option<ResourceWarning>,
    },
    Performed {
        action: Action,
        energy_before: i32,
        energy_after: i32,
        health: HealthDecrease,
        low_energy_turns: u32,
        warnings: Vec<ResourceWarning>,
    },
}

/// Result of eating
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct MealReport {
    pub meal: MealOption,
    pub wealth_before: u32,
    pub wealth_after: u32,
}

/// Result of sleeping
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SleepReport {
    pub hours: f64,
    pub regeneration: SleepRegeneration,
    pub energy_after: i32,
    pub health_after: i32,
}

/// Current warnings for `state`, health first
pub fn current_warnings(
    manager: &ResourceManager,
    state: &PlayerResourceState,
) -> Vec<ResourceWarning> {
    manager
        .get_health_warning(state.health)
        .into_iter()
        .chain(manager.get_energy_warning(state.energy))
        .collect()
}

/// Spend a turn on `action`
pub fn perform_action(
    manager: &ResourceManager,
    state: &mut PlayerResourceState,
    action: Action,
    modifiers: &ActionModifiers,
    rng: &mut impl Rng,
) -> ActionReport {
    if !manager.can_perform_action(state.energy, action, modifiers) {
        let cost = manager.get_energy_cost(action, modifiers);
        tracing::info!(
            "Refused {}: energy {} against cost {}",
            action,
            state.energy,
            cost
        );
        return ActionReport::Refused {
            action,
            energy: state.energy,
            cost,
            warning: manager.get_energy_warning(state.energy),
        };
    }

    let energy_before = state.energy;
    state.energy = manager.calculate_energy_change(state.energy, action, modifiers);
    state.consecutive_low_energy_turns =
        manager.update_low_energy_streak(state.energy, state.consecutive_low_energy_turns);

    let health = manager.calculate_health_decrease(state.health, state, modifiers, rng);
    state.health = health.new_health;

    tracing::info!(
        "Performed {}: energy {} -> {}, health -{} ({:?})",
        action,
        energy_before,
        state.energy,
        health.decrease,
        health.reasons
    );

    ActionReport::Performed {
        action,
        energy_before,
        energy_after: state.energy,
        health,
        low_energy_turns: state.consecutive_low_energy_turns,
        warnings: current_warnings(manager, state),
    }
}

/// Eat the best meal the player's purse allows
pub fn eat_meal(manager: &ResourceManager, state: &mut PlayerResourceState) -> MealReport {
    let limits = manager.limits();
    let meal = manager.calculate_meal_effects(state.wealth);
    let wealth_before = state.wealth;

    state.wealth = state.wealth.saturating_sub(meal.cost);
    state.energy = state.energy.saturating_add(meal.energy).clamp(0, limits.max_energy);
    state.health = state.health.saturating_add(meal.health).clamp(0, limits.max_health);

    tracing::info!(
        "Ate a {:?} meal for {} reales: energy {}, health {}",
        meal.quality,
        meal.cost,
        state.energy,
        state.health
    );

    MealReport {
        meal,
        wealth_before,
        wealth_after: state.wealth,
    }
}

/// Sleep for `hours`
pub fn sleep(
    manager: &ResourceManager,
    state: &mut PlayerResourceState,
    hours: f64,
) -> SleepReport {
    let limits = manager.limits();
    let regeneration = manager.calculate_sleep_regeneration(hours);

    state.energy = state
        .energy
        .saturating_add(regeneration.energy)
        .clamp(0, limits.max_energy);
    state.health = state
        .health
        .saturating_add(regeneration.health)
        .clamp(0, limits.max_health);
    state.consecutive_low_energy_turns =
        manager.update_low_energy_streak(state.energy, state.consecutive_low_energy_turns);

    tracing::info!(
        "Slept {} hours{}: energy {}, health {}",
        hours,
        if regeneration.well_rested { " (well rested)" } else { "" },
        state.energy,
        state.health
    );

    SleepReport {
        hours,
        energy_after: state.energy,
        health_after: state.health,
        regeneration,
    }
}
