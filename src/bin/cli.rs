//! CLI for facial measurement and FAS scoring of a saved detection.
//!
//! Usage:
//!   fas-report <detection.json>                  # Human-readable report
//!   fas-report <detection.json> --json           # JSON output
//!   fas-report <detection.json> -o report.json   # Save to file
//!
//! The detection file holds `landmarks` (`[{x, y, z}]`), optional
//! `blendshapes` (`[{name | categoryName, score}]`) and an optional
//! `skin_quality` score.

use std::fmt::Write as _;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::Parser;
use fas_face::{Engine, EngineConfig, FrameAnalysis, FrameInput, IdealStatus, LandmarkAccess};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fas-report")]
#[command(
    author,
    version,
    about = "Facial measurements and FAS score from a face-mesh detection",
    long_about = None
)]
struct Args {
    /// Detection file (JSON)
    #[arg(required = true)]
    detection: PathBuf,

    /// Output as JSON
    #[arg(short, long)]
    json: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Engine configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Reference interpupillary distance in mm
    #[arg(long)]
    reference_ipd: Option<f64>,

    /// Show debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr. `FAS_LOG` overrides the level, e.g. `FAS_LOG=fas_face=trace`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("FAS_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => {
            debug!(path = %path.display(), "loading configuration");
            EngineConfig::load(path)?
        }
        None => EngineConfig::default(),
    };
    if let Some(ipd) = args.reference_ipd {
        config = EngineConfig::builder()
            .reference_ipd_mm(ipd)
            .activity_threshold(config.activity_threshold)
            .hyperactivity_threshold(config.hyperactivity_threshold)
            .build()?;
    }

    let frame: FrameInput = serde_json::from_reader(BufReader::new(File::open(&args.detection)?))?;
    info!(
        landmarks = frame.landmarks.len(),
        blendshapes = frame.blendshapes.as_ref().map_or(0, |b| b.len()),
        "detection loaded"
    );

    let analysis = Engine::new(config)?.analyze(&frame);

    let output_str = if args.json {
        serde_json::to_string_pretty(&analysis)?
    } else {
        format_human_readable(&args.detection.display().to_string(), &analysis)?
    };

    if let Some(ref path) = args.output {
        std::fs::write(path, &output_str)?;
        info!(path = %path.display(), "report written");
    } else {
        println!("{}", output_str);
    }

    Ok(())
}

fn format_human_readable(source: &str, a: &FrameAnalysis) -> Result<String, std::fmt::Error> {
    let mut s = String::new();

    writeln!(s, "Detection: {}", source)?;
    match &a.calibration {
        Some(c) => writeln!(
            s,
            "Calibration: {:.1} mm/unit (IPD {:.4} units, confidence {:.2})",
            c.scale_factor, c.normalized_ipd, c.confidence
        )?,
        None => writeln!(s, "Calibration: unavailable (incomplete landmarks)")?,
    }

    if let Some(m) = &a.measurements {
        writeln!(s, "\nMeasurements (mm):")?;
        writeln!(s, "  IPD:          {:.1}", m.interpupillary_distance)?;
        writeln!(s, "  Bizygomatic:  {:.1}", m.bizygomatic_width)?;
        writeln!(s, "  Bigonial:     {:.1}", m.bigonial_width)?;
        writeln!(s, "  Face height:  {:.1} (total {:.1})", m.facial_height, m.face_height_total)?;
        writeln!(s, "  Nose:         {:.1} x {:.1}", m.nasal_width, m.nasal_height)?;
        writeln!(s, "  Mouth width:  {:.1}", m.mouth_width)?;
        writeln!(s, "  Malar depth:  {:.1}", m.malar_depth)?;

        writeln!(
            s,
            "\nThirds: {:.1}% / {:.1}% / {:.1}%",
            m.third_upper_pct, m.third_middle_pct, m.third_lower_pct
        )?;
        let fifths: Vec<String> = m.fifths().iter().map(|f| format!("{:.1}%", f)).collect();
        writeln!(s, "Fifths: {}", fifths.join(" / "))?;
    }

    if !a.ideal_checks.is_empty() {
        writeln!(s, "\nIdeal ranges:")?;
        for c in &a.ideal_checks {
            let mark = match c.status {
                IdealStatus::Within => "ok",
                IdealStatus::Outside => "!!",
                IdealStatus::Info => "--",
            };
            writeln!(s, "  [{}] {:<45} {:>8.2}", mark, c.description, c.measured)?;
        }
    }

    if let Some(shape) = &a.face_shape {
        writeln!(
            s,
            "\nFace shape: {} (regularity {:.0})",
            shape.shape.name(),
            shape.regularity
        )?;
    }

    if let Some(sym) = &a.symmetry {
        writeln!(s, "\nSymmetry (mm, index):")?;
        for p in &sym.pairs {
            writeln!(s, "  {:<14} {:>6.2}  {:.3}", p.pair.name(), p.distance, p.asymmetry_index)?;
        }
        writeln!(s, "  Vertical imbalance: {:.2} mm", sym.global_vertical_asymmetry)?;
    }

    if !a.volumes.is_empty() {
        writeln!(s, "\nVolumes:")?;
        for v in &a.volumes {
            writeln!(
                s,
                "  {:<17} {:>5.2} mL  {:>5.0}% of reference",
                v.region.label(),
                v.volume_ml,
                v.percent_of_reference
            )?;
        }
    }

    writeln!(s, "\nExpression: {}", a.discord.summary)?;
    for z in a.discord.zones.iter().filter(|z| z.is_active) {
        let flag = if z.is_hyperactive { " (hyperactive)" } else { "" };
        writeln!(s, "  {:<18} {:.2}{}", z.zone.label(), z.score, flag)?;
    }

    writeln!(
        s,
        "\nFAS: {} ({})",
        a.fas.global_score,
        a.fas.global_grade.label()
    )?;
    for d in &a.fas.domains {
        if d.has_real_data() {
            writeln!(s, "  {:<13} {:>5.1}  {}", d.domain.label(), d.score(), d.interpretation)?;
        } else {
            writeln!(s, "  {:<13}   n/a  {}", d.domain.label(), d.interpretation)?;
        }
    }
    writeln!(s, "  {}", a.fas.summary)?;

    Ok(s)
}
