//! Affective regulator simulator
//!
//! Replays a scripted feedback sequence through the regulator and prints the
//! per-turn diagnostics, for tuning thresholds without a live conversation.

use anyhow::{bail, Context};
use chrono::{Duration, Utc};
use clap::{Parser, ValueEnum};
use zoey_affect::{load_env, Regulator, RegulatorConfig, TurnOutcome, UserProfile};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// User profile (resilient, neurotic, neutral); defaults to AFFECT_PROFILE
    #[arg(short, long)]
    profile: Option<UserProfile>,

    /// Channel (strategy) the feedback applies to
    #[arg(short, long, default_value = "reflective_listening")]
    channel: String,

    /// Canned distress scenario
    #[arg(long, value_enum, conflicts_with = "scores")]
    preset: Option<Preset>,

    /// Comma-separated feedback scores, e.g. -1,-0.5,0.2
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    scores: Vec<f64>,

    /// Simulated seconds between turns
    #[arg(long, default_value_t = 5)]
    interval_secs: i64,

    /// Style switch cooldown override, in seconds
    #[arg(long)]
    cooldown_secs: Option<u64>,

    /// Emit one JSON object per turn instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Preset {
    /// Three hostile turns at moderate energy
    Mild,
    /// Five hostile turns at low energy
    Moderate,
    /// Seven hostile turns near exhaustion
    Severe,
}

impl Preset {
    fn turns(self) -> usize {
        match self {
            Preset::Mild => 3,
            Preset::Moderate => 5,
            Preset::Severe => 7,
        }
    }

    fn energy(self) -> f64 {
        match self {
            Preset::Mild => 0.6,
            Preset::Moderate => 0.4,
            Preset::Severe => 0.2,
        }
    }
}

fn print_row(turn: usize, score: f64, outcome: &TurnOutcome) {
    println!(
        "{:>4} {:>6.2} {:<16} {:<11} {:<9} {:<9} {:>6.2} {:>6.2} {:>6.2} {:>4}{}",
        turn,
        score,
        outcome.style,
        outcome.tone,
        outcome.tier,
        outcome.pressure,
        outcome.emotion_debt,
        outcome.energy,
        outcome.resilience,
        outcome.cooling_period,
        if outcome.recovery_applied { "  recovered" } else { "" }
    );
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(
                    "zoey_affect=info"
                        .parse::<tracing_subscriber::filter::Directive>()
                        .context("invalid log directive")?,
                ),
        )
        .with_writer(std::io::stderr)
        .init();

    load_env().context("failed to load environment")?;

    let cli = Cli::parse();

    let mut config = RegulatorConfig::from_env();
    if let Some(profile) = cli.profile {
        config = config.with_profile(profile);
    }
    if let Some(secs) = cli.cooldown_secs {
        config = config.with_style_cooldown_secs(secs);
    }
    config.validate()?;

    let (scores, external_energy) = match cli.preset {
        Some(preset) => (vec![-1.0; preset.turns()], Some(preset.energy())),
        None if !cli.scores.is_empty() => (cli.scores.clone(), None),
        None => bail!("nothing to simulate: pass --preset or --scores"),
    };

    let profile: UserProfile = config.profile;
    let regulator = Regulator::new(config);
    let mut state = regulator.new_state();
    tracing::info!(profile = %profile, turns = scores.len(), channel = %cli.channel, "Starting simulation");

    if !cli.json {
        println!(
            "{:>4} {:>6} {:<16} {:<11} {:<9} {:<9} {:>6} {:>6} {:>6} {:>4}",
            "turn", "score", "style", "tone", "tier", "pressure", "debt", "energy", "resil", "cool"
        );
    }

    let start = Utc::now();
    let mut last = None;
    for (i, score) in scores.iter().enumerate() {
        let at = start + Duration::seconds(i as i64 * cli.interval_secs.max(0));
        let outcome = regulator.process_turn_at(&mut state, &cli.channel, *score, at, external_energy);

        if cli.json {
            let mut data = outcome.to_data();
            data.insert("turn".to_string(), serde_json::json!(i + 1));
            data.insert("score".to_string(), serde_json::json!(score));
            println!("{}", serde_json::to_string(&data)?);
        } else {
            print_row(i + 1, *score, &outcome);
        }
        last = Some(outcome);
    }

    if let Some(outcome) = last {
        if cli.json {
            println!("{}", serde_json::json!({ "prompt": &*outcome.prompt }));
        } else {
            println!();
            println!("{}", outcome.prompt);
        }
    }

    Ok(())
}
