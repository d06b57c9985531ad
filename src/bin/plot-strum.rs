use plectrum::player::{plucked, Callback, Direction, GuitarStrummer};
use plectrum::render::{render, RenderConfig};
use plectrum::signal::Frame;
use plotters::prelude::*;
use tracing_subscriber::EnvFilter;

const DECAY_SECS: f32 = 0.8;
/// Length of the plotted window
const WINDOW_MS: f32 = 60.0;

struct Args {
    chord: String,
    direction: Direction,
    output_path: String,
}

/// A scheduled string event: onset or damping
struct Marker {
    frame: Frame,
    string: usize,
    damp: bool,
}

fn print_usage() {
    eprintln!("Usage: plot-strum <chord> <down|up> <output.svg>");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  plot-strum C down c-down.svg");
    eprintln!("  plot-strum D up d-up.svg      # low E is damped, not struck");
}

fn parse_args() -> Result<Args, Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() != 4 {
        print_usage();
        return Err("Invalid number of arguments".into());
    }

    Ok(Args {
        chord: args[1].clone(),
        direction: args[2].parse()?,
        output_path: args[3].clone(),
    })
}

fn render_strum(
    args: &Args,
    config: &RenderConfig,
) -> Result<(Vec<f32>, Vec<Marker>), Box<dyn std::error::Error>> {
    let mut strummer = GuitarStrummer::new(plucked(config.sample_rate, DECAY_SECS));
    strummer.strum_default(&args.chord, args.direction)?;

    let markers: Vec<Marker> = strummer
        .keyed()
        .scheduler()
        .queued()
        .into_iter()
        .filter_map(|(frame, callback)| match callback {
            Callback::Play((string, _)) => Some(Marker {
                frame,
                string: *string,
                damp: false,
            }),
            Callback::InvokeWith(_, string) => Some(Marker {
                frame,
                string: *string,
                damp: true,
            }),
            Callback::Invoke(_) => None,
        })
        .collect();

    let length = config.frames(WINDOW_MS / 1000.0);
    let samples = render(&mut strummer, Some(length))?;
    Ok((samples, markers))
}

fn create_plot(
    args: &Args,
    config: &RenderConfig,
    samples: &[f32],
    markers: &[Marker],
) -> Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(&args.output_path, (800, 400)).into_drawing_area();
    root.fill(&WHITE)?;

    let ms_per_frame = 1000.0 / config.sample_rate as f32;
    let peak = samples.iter().fold(0.1f32, |m, s| m.max(s.abs())) * 1.1;

    let title = format!("Strum: {} {}", args.chord, args.direction);
    let mut chart = ChartBuilder::on(&root)
        .caption(&title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0f32..WINDOW_MS, -peak..peak)?;

    chart
        .configure_mesh()
        .x_desc("Time (ms)")
        .y_desc("Amplitude")
        .x_labels(10)
        .y_labels(10)
        .draw()?;

    chart.draw_series(LineSeries::new(
        samples
            .iter()
            .enumerate()
            .map(|(i, &s)| (i as f32 * ms_per_frame, s)),
        BLUE.stroke_width(1),
    ))?;

    // Onsets as circles, dampings as crosses, stacked by string
    for marker in markers {
        let x = marker.frame as f32 * ms_per_frame;
        let y = -peak + peak * 0.1 * (marker.string + 1) as f32;
        if marker.damp {
            chart.draw_series(std::iter::once(Cross::new((x, y), 6, BLACK.filled())))?;
        } else {
            chart.draw_series(std::iter::once(Circle::new((x, y), 4, RED.filled())))?;
        }
    }

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = parse_args()?;
    let config = RenderConfig::default();

    println!("Strum Plot Generator");
    println!("====================");
    println!("  Chord: {}", args.chord);
    println!("  Direction: {}", args.direction);
    println!();

    print!("  Rendering strum... ");
    let (samples, markers) = render_strum(&args, &config)?;
    println!("done ({} samples, {} events)", samples.len(), markers.len());

    for marker in &markers {
        println!(
            "  string {} {} at frame {}",
            marker.string,
            if marker.damp { "damped" } else { "struck" },
            marker.frame
        );
    }

    print!("  Creating plot... ");
    create_plot(&args, &config, &samples, &markers)?;
    println!("done");

    println!();
    println!("Output: {}", args.output_path);

    Ok(())
}
