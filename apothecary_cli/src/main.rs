use apothecary_core::engine::current_warnings;
use apothecary_core::treatment::{format_game_date, MAX_HISTORY_LENGTH};
use apothecary_core::*;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "botica")]
#[command(about = "An apothecary's ledger for 1680s Mexico City", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use this config file instead of the default
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed the random source for a reproducible turn
    #[arg(long, global = true)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show health, energy and wealth (default)
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start a new game
    New {
        /// Reales in the purse at the start
        #[arg(long)]
        wealth: Option<u32>,
    },

    /// Spend a turn on an action (study, forage, mix, seePatients, travel,
    /// chat, prescribe, buy, sleep, eat)
    Act {
        action: Action,

        /// Multiplier on the action's energy cost
        #[arg(long, default_value_t = 1.0)]
        cost_modifier: f64,

        /// Energy regained alongside the action
        #[arg(long, default_value_t = 0)]
        regen: i32,

        /// Flat energy bonus
        #[arg(long, default_value_t = 0)]
        bonus: i32,

        /// Chance of catching a disease during the action (0.0 - 1.0)
        #[arg(long)]
        health_risk: Option<f64>,
    },

    /// Eat the best meal you can afford
    Eat,

    /// Sleep for a number of hours
    Sleep {
        #[arg(long, default_value_t = 8.0)]
        hours: f64,
    },

    /// Invent a patient's past treatments and record them
    History {
        /// Patient id (letters, digits, '-' and '_')
        #[arg(long)]
        patient: String,

        /// Free-text diagnosis
        #[arg(long, default_value = "")]
        diagnosis: String,

        /// A symptom; repeat for several
        #[arg(long = "symptom")]
        symptoms: Vec<String>,

        /// Number of past treatments (defaults to the config value)
        #[arg(long, value_parser = clap::value_parser!(u64).range(0..=MAX_HISTORY_LENGTH as u64))]
        count: Option<u64>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record your own treatment of a patient and show their timeline
    Treat {
        #[arg(long)]
        patient: String,

        /// Name of the remedy
        #[arg(long)]
        remedy: String,

        #[arg(long, default_value = "")]
        method: String,

        #[arg(long, default_value = "")]
        theory: String,

        /// Date to record (defaults to the current game date)
        #[arg(long)]
        date: Option<String>,
    },

    /// Show a patient's recorded treatments
    Show {
        #[arg(long)]
        patient: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    apothecary_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);
    let manager = ResourceManager::new(config.limits);
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    match cli.command {
        Some(Commands::Status { json }) => cmd_status(&data_dir, &manager, &config, json),
        Some(Commands::New { wealth }) => cmd_new(
            &data_dir,
            wealth.unwrap_or(config.player.starting_wealth),
        ),
        Some(Commands::Act {
            action,
            cost_modifier,
            regen,
            bonus,
            health_risk,
        }) => {
            let modifiers = ActionModifiers {
                energy_cost_modifier: cost_modifier,
                energy_regen: regen,
                energy_bonus: bonus,
                health_risk,
            };
            cmd_act(&data_dir, &manager, &config, action, &modifiers, &mut rng)
        }
        Some(Commands::Eat) => cmd_eat(&data_dir, &manager, &config),
        Some(Commands::Sleep { hours }) => cmd_sleep(&data_dir, &manager, &config, hours),
        Some(Commands::History {
            patient,
            diagnosis,
            symptoms,
            count,
            json,
        }) => {
            let record = Patient {
                diagnosis,
                symptoms: symptoms.into_iter().map(Symptom::Named).collect(),
            };
            let count = count
                .and_then(|c| usize::try_from(c).ok())
                .unwrap_or(config.history.default_count);
            cmd_history(&data_dir, &config, &patient, &record, count, json, &mut rng)
        }
        Some(Commands::Treat {
            patient,
            remedy,
            method,
            theory,
            date,
        }) => {
            let treatment = PlayerTreatment {
                name: remedy,
                method,
                theory,
            };
            let date = date.unwrap_or_else(|| format_game_date(config.calendar.current_date));
            cmd_treat(&data_dir, &patient, &treatment, &date)
        }
        Some(Commands::Show { patient, json }) => cmd_show(&data_dir, &patient, json),
        None => cmd_status(&data_dir, &manager, &config, false),
    }
}

fn state_path(data_dir: &Path) -> PathBuf {
    data_dir.join("state.json")
}

fn cmd_status(data_dir: &Path, manager: &ResourceManager, config: &Config, json: bool) -> Result<()> {
    let state =
        PlayerResourceState::load_or_new(&state_path(data_dir), config.player.starting_wealth)?;
    let status = manager.get_status_description(state.health, state.energy);
    let warnings = current_warnings(manager, &state);

    if json {
        let value = serde_json::json!({
            "state": state,
            "status": status,
            "warnings": warnings,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    display_state(manager, &state);
    Ok(())
}

fn cmd_new(data_dir: &Path, wealth: u32) -> Result<()> {
    let state = PlayerResourceState::new_game(wealth);
    state.save(&state_path(data_dir))?;
    println!("✓ New game started with {} reales.", wealth);
    Ok(())
}

fn cmd_act(
    data_dir: &Path,
    manager: &ResourceManager,
    config: &Config,
    action: Action,
    modifiers: &ActionModifiers,
    rng: &mut StdRng,
) -> Result<()> {
    let (state, report) = PlayerResourceState::update(
        &state_path(data_dir),
        config.player.starting_wealth,
        |state| perform_action(manager, state, action, modifiers, rng),
    )?;

    match report {
        ActionReport::Refused {
            action,
            energy,
            cost,
            warning,
        } => {
            println!(
                "You are too tired to {} (energy {}, needs {}).",
                action, energy, cost
            );
            if let Some(w) = warning {
                println!("  {} {}", w.icon, w.message);
            }
        }
        ActionReport::Performed {
            action,
            energy_before,
            energy_after,
            health,
            ..
        } => {
            println!("✓ {}: energy {} → {}", action, energy_before, energy_after);
            for reason in &health.reasons {
                println!("  {}", reason);
            }
            if health.decrease > 0 {
                println!("  Health -{}", health.decrease);
            }
            println!();
            display_state(manager, &state);
        }
    }

    Ok(())
}

fn cmd_eat(data_dir: &Path, manager: &ResourceManager, config: &Config) -> Result<()> {
    let (state, report) = PlayerResourceState::update(
        &state_path(data_dir),
        config.player.starting_wealth,
        |state| eat_meal(manager, state),
    )?;

    println!("{}", report.meal.message);
    println!(
        "  Cost {} reales ({} → {})",
        report.meal.cost, report.wealth_before, report.wealth_after
    );
    println!();
    display_state(manager, &state);
    Ok(())
}

fn cmd_sleep(data_dir: &Path, manager: &ResourceManager, config: &Config, hours: f64) -> Result<()> {
    let (state, report) = PlayerResourceState::update(
        &state_path(data_dir),
        config.player.starting_wealth,
        |state| sleep(manager, state, hours),
    )?;

    if report.regeneration.well_rested {
        println!("You slept {} hours and wake well rested.", report.hours);
    } else {
        println!("You slept {} hours.", report.hours);
    }
    println!(
        "  +{} energy, +{} health",
        report.regeneration.energy, report.regeneration.health
    );
    println!();
    display_state(manager, &state);
    Ok(())
}

fn cmd_history(
    data_dir: &Path,
    config: &Config,
    patient_id: &str,
    patient: &Patient,
    count: usize,
    json: bool,
    rng: &mut StdRng,
) -> Result<()> {
    let knowledge = get_default_knowledge();
    let errors = knowledge.validate();
    if !errors.is_empty() {
        eprintln!("Knowledge base validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::Other("Invalid knowledge base".into()));
    }

    let mut journal = JsonlJournal::for_patient(data_dir, patient_id)?;
    let generator = TreatmentGenerator::new(knowledge, config.calendar.current_date);
    let history = generator.generate_treatment_history(patient, count, rng);
    journal.append_all(&history)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&history)?);
    } else {
        for entry in &history {
            display_entry(entry);
        }
    }
    Ok(())
}

fn cmd_treat(
    data_dir: &Path,
    patient_id: &str,
    treatment: &PlayerTreatment,
    date: &str,
) -> Result<()> {
    let mut journal = JsonlJournal::for_patient(data_dir, patient_id)?;
    let existing = journal.read_all()?;
    let timeline = add_player_treatment(&existing, treatment, date);

    // The journal is append-only, so only the new entry is written
    if let Some(entry) = timeline.last() {
        journal.append(entry)?;
        println!("✓ Recorded {} for {}", entry.treatment.name, patient_id);
    }

    println!();
    for entry in &timeline {
        display_entry(entry);
    }
    Ok(())
}

fn cmd_show(data_dir: &Path, patient_id: &str, json: bool) -> Result<()> {
    let journal = JsonlJournal::for_patient(data_dir, patient_id)?;
    let entries = journal.read_all()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No treatments recorded for {}.", patient_id);
    }
    for entry in &entries {
        display_entry(entry);
    }
    Ok(())
}

fn display_state(manager: &ResourceManager, state: &PlayerResourceState) {
    let limits = manager.limits();
    println!("  Health: {}/{}", state.health, limits.max_health);
    println!("  Energy: {}/{}", state.energy, limits.max_energy);
    println!("  Wealth: {} reales", state.wealth);
    println!(
        "  You feel {}.",
        manager.get_status_description(state.health, state.energy)
    );

    for warning in current_warnings(manager, state) {
        println!("  {} [{}] {}", warning.icon, warning.level, warning.message);
    }
}

fn display_entry(entry: &TreatmentEntry) {
    let marker = if entry.practitioner.is_player { " (you)" } else { "" };
    println!(
        "{}: {} {}{}",
        entry.date, entry.practitioner.title, entry.practitioner.name, marker
    );
    println!("  {}: {}", entry.treatment.name, entry.treatment.method);
    println!("  Outcome: {}", entry.outcome);
    println!("  Notes: {}", entry.notes);
    println!();
}
