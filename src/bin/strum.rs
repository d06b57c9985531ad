//! Render a chord progression to a WAV file
//!
//! Usage: strum <progression> [output.wav]

use plectrum::player::{plucked, Direction, GuitarStrummer};
use plectrum::render::{RenderConfig, StreamFiller};
use plectrum::wav::write_wav_16bit;
use std::env;
use std::process;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: strum <progression> [output.wav]

Strum a chord progression on a plucked guitar and write it as WAV.

Arguments:
  progression   Space-separated steps of the form CHORD[:down|:up]
  output.wav    Output WAV file path (optional, defaults to strum.wav)

Examples:
  strum \"C:down G:down Am:up F:down\"
  strum \"D:down D:up\" out.wav

Set RUST_LOG=debug to trace each strum.
";

/// Time between strums
const BEAT_SECS: f32 = 0.5;
/// Time the last chord is left to ring
const TAIL_SECS: f32 = 2.0;
/// Fundamental decay time of each string
const DECAY_SECS: f32 = 0.8;

fn parse_progression(input: &str) -> Result<Vec<(String, Direction)>, String> {
    input
        .split_whitespace()
        .map(|step| match step.split_once(':') {
            Some((chord, direction)) => Ok((chord.to_string(), direction.parse()?)),
            None => Ok((step.to_string(), Direction::Down)),
        })
        .collect()
}

fn run(progression: &str, output_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let steps = parse_progression(progression)?;
    if steps.is_empty() {
        return Err("empty progression".into());
    }

    let config = RenderConfig::default();
    let beat = config.frames(BEAT_SECS) as usize;
    let tail = config.frames(TAIL_SECS) as usize;

    println!("Configuration:");
    println!("  Sample rate: {} Hz", config.sample_rate);
    println!("  Frame size: {} samples", config.frame_size);
    println!("  Beat: {} samples", beat);
    println!();

    let strummer = GuitarStrummer::new(plucked(config.sample_rate, DECAY_SECS));
    let mut filler = StreamFiller::new(strummer);
    let mut buffer = vec![0.0f32; config.frame_size];
    let mut samples = Vec::new();

    for (i, (chord, direction)) in steps.iter().enumerate() {
        println!("  {:>3}: {} {}", i + 1, chord, direction);
        filler.source_mut().strum_default(chord, *direction)?;

        let target = samples.len() + if i + 1 == steps.len() { tail } else { beat };
        while samples.len() < target {
            filler.fill(&mut buffer);
            samples.extend_from_slice(&buffer);
        }
    }

    write_wav_16bit(output_path, &samples, config.sample_rate)?;
    println!();
    println!(
        "✓ Generated {} ({:.2}s)",
        output_path,
        samples.len() as f32 / config.sample_rate as f32
    );
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("{}", USAGE);
        process::exit(1);
    }

    let output_path = args.get(2).map(String::as_str).unwrap_or("strum.wav");
    if let Err(e) = run(&args[1], output_path) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
