//! Match simulator CLI: plays Ishema Ryanjye matches in memory.
//!
//! A local authority deals and validates; four seat clients see only their own
//! reconciled snapshots and play random legal cards. Any divergence between a
//! client view and the authority fails the match.

mod authority;
mod output;
mod simulator;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use ishema_engine::{EngineConfig, FollowSuitPolicy, RuleConfig, TieBreak};
use output::OutputWriter;
use simulator::{MatchSummary, Simulator};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "match-simulator")]
#[command(about = "In-memory Ishema Ryanjye match simulator")]
struct Args {
    /// Number of matches to simulate
    #[arg(short, long, default_value = "1")]
    matches: u32,

    /// Rounds per match
    #[arg(short, long, default_value = "3")]
    rounds: u32,

    /// Base seed; match N uses seed + N. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Follow-suit rule (overrides ISHEMA_FOLLOW_SUIT)
    #[arg(long)]
    follow_suit: Option<FollowSuitArg>,

    /// Tie-break rule (overrides ISHEMA_TIE_BREAK)
    #[arg(long)]
    tie_break: Option<TieBreakArg>,

    /// Output directory for JSONL results
    #[arg(long, default_value = "./simulation-results")]
    output_dir: PathBuf,

    /// Gzip the JSONL output
    #[arg(long)]
    compress: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FollowSuitArg {
    Enforced,
    Relaxed,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TieBreakArg {
    Earliest,
    FaceRank,
}

fn rules_from(args: &Args) -> Result<RuleConfig, Box<dyn std::error::Error>> {
    let mut rules = EngineConfig::from_env()?.rules;
    match args.follow_suit {
        Some(FollowSuitArg::Enforced) => rules.follow_suit = FollowSuitPolicy::Enforced,
        Some(FollowSuitArg::Relaxed) => rules.follow_suit = FollowSuitPolicy::Relaxed,
        None => {}
    }
    match args.tie_break {
        Some(TieBreakArg::Earliest) => rules.tie_break = TieBreak::EarliestPlay,
        Some(TieBreakArg::FaceRank) => rules.tie_break = TieBreak::FaceRank,
        None => {}
    }
    Ok(rules)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "warn" };
    ishema_engine::telemetry::init_tracing_with(filter);

    if args.rounds == 0 {
        return Err("--rounds must be at least 1".into());
    }
    let rules = rules_from(&args)?;
    info!(?rules, matches = args.matches, rounds = args.rounds, "starting simulator");

    let mut writer = OutputWriter::new(&args.output_dir, args.compress)?;
    let mut sim = Simulator::new(rules);
    let base_seed = args.seed.unwrap_or_else(rand::random);

    let start = Instant::now();
    let mut results = Vec::new();
    let mut errors = 0u32;

    for match_no in 1..=args.matches {
        let seed = base_seed.wrapping_add(u64::from(match_no));
        match sim.run_match(match_no, seed, args.rounds) {
            Ok(summary) => {
                if let Err(e) = writer.write_match(&summary) {
                    warn!("Failed to write match {}: {}", match_no, e);
                }
                results.push(summary);
            }
            Err(e) => {
                errors += 1;
                warn!("Match {} failed: {}", match_no, e);
            }
        }
    }

    let (path, written) = writer.finish()?;
    info!(path = %path.display(), written, "results written");
    print_summary(&results, errors, start.elapsed(), args.matches);
    println!("Results: {}", path.display());

    if errors > 0 {
        return Err(format!("{errors} match(es) diverged").into());
    }
    Ok(())
}

fn print_summary(results: &[MatchSummary], errors: u32, elapsed: std::time::Duration, total: u32) {
    println!("\n=== Simulation Summary ===");
    println!("Matches completed: {}/{}", results.len(), total);
    if errors > 0 {
        println!("Errors: {}", errors);
    }
    println!("Total time: {:?}", elapsed);
    if results.is_empty() {
        return;
    }

    let mut wins: std::collections::BTreeMap<String, u32> = Default::default();
    let mut draws = 0u32;
    let mut points: std::collections::BTreeMap<String, u64> = Default::default();
    for result in results {
        match &result.winner {
            Some(team) => *wins.entry(team.clone()).or_default() += 1,
            None => draws += 1,
        }
        for (team, pts) in &result.total_points {
            *points.entry(team.clone()).or_default() += u64::from(*pts);
        }
    }

    println!("\n=== Results by Team ===");
    for (team, pts) in &points {
        let won = wins.get(team).copied().unwrap_or(0);
        println!(
            "{}: avg points={:.1}, match wins={} ({:.1}%)",
            team,
            *pts as f64 / results.len() as f64,
            won,
            f64::from(won) / results.len() as f64 * 100.0
        );
    }
    println!("Drawn matches: {}", draws);
}
