//! # Mandotab - Notes to Mandolin Tab
//!
//! Command-line front end for `mandotab-core`. Reads detected notes from a
//! JSON file (an array of `{start_time, end_time, pitch, confidence}`
//! objects), places them on the fretboard and prints ASCII tab.
//!
//! Usage:
//!   mandotab [notes.json] [--tuning NAME] [--max-fret N]
//!            [--profile PATH] [--save-profile PATH] [--json]
//!
//! Without a notes file a short demo phrase (A4 B4 C5 D5) is rendered.
//! Set `RUST_LOG=debug` to see which notes were skipped.

use anyhow::{Context, Result, anyhow};
use mandotab_core::fretboard::{load_fretboard, save_fretboard};
use mandotab_core::position::phrase_cost;
use mandotab_core::{Fretboard, PitchedNote, PositionResolver, Tuning, render_ascii_tab};
use std::fs;
use std::str::FromStr;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let fretboard = build_fretboard(&args)?;

    if let Some(path) = flag_value(&args, "--save-profile")? {
        save_fretboard(&fretboard, path)?;
    }

    let notes = match notes_path(&args) {
        Some(path) => read_notes(path)?,
        None => {
            log::info!("[CLI] No notes file given, rendering demo phrase");
            demo_notes()
        }
    };

    let resolver = PositionResolver::new(fretboard);
    let tabs = resolver.resolve(&notes);
    log::info!(
        "[CLI] Placed {} of {} notes on '{}' (hand travel {:.1})",
        tabs.len(),
        notes.len(),
        resolver.fretboard().tuning.name,
        phrase_cost(&tabs, resolver.strategy())
    );

    if args.iter().any(|a| a == "--json") {
        let json = serde_json::to_string_pretty(&tabs).context("failed to serialize tab")?;
        println!("{}", json);
    } else {
        println!("{}", render_ascii_tab(&tabs, &resolver.fretboard().tuning));
    }
    Ok(())
}

/// Starts from a saved profile (or the default) and applies CLI overrides.
fn build_fretboard(args: &[String]) -> Result<Fretboard> {
    let mut fretboard = match flag_value(args, "--profile")? {
        Some(path) => load_fretboard(path)?,
        None => Fretboard::default(),
    };
    if let Some(name) = flag_value(args, "--tuning")? {
        fretboard.tuning = Tuning::preset(name).ok_or_else(|| {
            let known: Vec<&str> = Tuning::presets().iter().map(|t| t.name.as_str()).collect();
            anyhow!("unknown tuning '{}' (known: {})", name, known.join(", "))
        })?;
    }
    if let Some(ceiling) = parse_flag::<u32>(args, "--max-fret")? {
        fretboard.fret_ceiling = ceiling;
    }
    Ok(fretboard)
}

fn read_notes(path: &str) -> Result<Vec<PitchedNote>> {
    let data = fs::read_to_string(path).with_context(|| format!("failed to read notes file {}", path))?;
    let notes: Vec<PitchedNote> =
        serde_json::from_str(&data).with_context(|| format!("invalid notes JSON in {}", path))?;
    log::info!("[CLI] Read {} notes from {}", notes.len(), path);
    Ok(notes)
}

/// A4 B4 C5 D5, half a second each.
fn demo_notes() -> Vec<PitchedNote> {
    [69, 71, 72, 74]
        .iter()
        .enumerate()
        .map(|(i, &pitch)| {
            let start = i as f64 * 0.5;
            PitchedNote::new(start, start + 0.5, pitch)
        })
        .collect()
}

const VALUE_FLAGS: [&str; 4] = ["--tuning", "--max-fret", "--profile", "--save-profile"];

/// The first argument that is neither a flag nor a flag's value.
fn notes_path(args: &[String]) -> Option<&str> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            iter.next();
        } else if !arg.starts_with("--") {
            return Some(arg);
        }
    }
    None
}

/// Value following `flag`, or an error when the flag is last on the line.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Result<Option<&'a str>> {
    match args.iter().position(|a| a == flag) {
        Some(i) => args
            .get(i + 1)
            .map(|s| Some(s.as_str()))
            .ok_or_else(|| anyhow!("missing value for {}", flag)),
        None => Ok(None),
    }
}

fn parse_flag<T>(args: &[String], flag: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    flag_value(args, flag)?
        .map(|v| v.parse::<T>().with_context(|| format!("invalid value '{}' for {}", v, flag)))
        .transpose()
}
