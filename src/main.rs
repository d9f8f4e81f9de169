use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use log::{LevelFilter, Log, Metadata, Record};

use simpleseq::pitch::REST;
use simpleseq::{Config, NotationStyle, Score, Sequencer, export, playback, score};

#[derive(Parser)]
#[command(name = "simpleseq", about = "Render note-name scores to audio")]
#[command(version)]
struct Cli {
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

/// Settings shared by the commands that render a score.
#[derive(Args)]
struct RenderArgs {
    /// Path to a score file
    file: PathBuf,

    /// Config file with default settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override tempo (BPM)
    #[arg(long)]
    bpm: Option<f64>,

    /// Override notation style (international | yamaha)
    #[arg(long)]
    style: Option<NotationStyle>,

    /// Override sample rate (Hz)
    #[arg(long)]
    sample_rate: Option<u32>,
}

#[derive(Subcommand)]
enum Command {
    /// Play a score through speakers
    Play(RenderArgs),

    /// Render a score to a WAV file
    Render {
        #[command(flatten)]
        args: RenderArgs,

        /// Output WAV path
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Parse a score and display its tracks
    Parse(RenderArgs),

    /// Print the semitone number and frequency of note names
    Resolve {
        /// Note names, e.g. C3 G#-1 R
        #[arg(required = true)]
        names: Vec<String>,

        /// Notation style (international | yamaha)
        #[arg(long, default_value_t = NotationStyle::default())]
        style: NotationStyle,
    },
}

/// Writes log records to stderr.
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Play(args) => {
            let score = load_score(&args);
            let seq = sequence(&score);
            println!(
                "Playing: {} tracks, {} BPM, {:.2} s",
                seq.track_count(),
                seq.bpm(),
                seq.duration_secs()
            );
            if let Err(e) = playback::play(&seq.mix_f32(), seq.sample_rate()) {
                eprintln!("Playback error: {}", e);
                std::process::exit(1);
            }
        }
        Command::Render { args, out } => {
            let score = load_score(&args);
            let seq = sequence(&score);
            if let Err(e) = export::write_wav(&out, &seq.mix_f32(), seq.sample_rate()) {
                eprintln!("Export error: {}", e);
                std::process::exit(1);
            }
            println!(
                "Wrote {} ({} samples, {:.2} s)",
                out.display(),
                seq.len(),
                seq.duration_secs()
            );
        }
        Command::Parse(args) => {
            let score = load_score(&args);
            print_score(&score);
        }
        Command::Resolve { names, style } => {
            let resolver = simpleseq::PitchResolver::new(style);
            let mut failed = false;
            for name in &names {
                if name == REST {
                    println!("{:<5} rest     0.000 Hz", name);
                    continue;
                }
                match resolver.semitone(name) {
                    Ok(semitone) => println!(
                        "{:<5} {:>4}  {:>9.3} Hz",
                        name,
                        semitone,
                        simpleseq::semitone_to_frequency(semitone)
                    ),
                    Err(e) => {
                        eprintln!("{}", e);
                        failed = true;
                    }
                }
            }
            if failed {
                std::process::exit(1);
            }
        }
    }
}

fn load_config(path: Option<&Path>) -> Config {
    match path {
        Some(path) => Config::load(path).unwrap_or_else(|e| {
            eprintln!("Config error in {}: {}", path.display(), e);
            std::process::exit(1);
        }),
        None => Config::default(),
    }
}

fn load_score(args: &RenderArgs) -> Score {
    let base = load_config(args.config.as_deref());

    let mut score = score::load_with_style(&args.file, base, args.style).unwrap_or_else(|e| {
        eprintln!("Error in {}: {}", args.file.display(), e);
        std::process::exit(1);
    });

    // Command-line flags win over the score header
    if let Some(bpm) = args.bpm {
        score.config.bpm = bpm;
    }
    if let Some(rate) = args.sample_rate {
        score.config.sample_rate = rate;
    }
    score
}

fn sequence(score: &Score) -> Sequencer {
    score.sequencer().unwrap_or_else(|e| {
        eprintln!("Sequencer error: {}", e);
        std::process::exit(1);
    })
}

fn print_score(score: &Score) {
    let config = &score.config;
    println!("Tempo: {} BPM", config.bpm);
    println!("Resolution: {} ticks per quarter note", config.ticks_per_quarter_note);
    println!("Notation: {}", config.notation_style);
    println!("Sample rate: {} Hz", config.sample_rate);
    println!("Tracks: {}", score.tracks.len());
    println!();
    for track in &score.tracks {
        println!(
            "--- Track: {} (gain {}, phase {}) ---",
            track.name(),
            track.gain(),
            track.phase_policy()
        );
        for note in track.notes() {
            if note.is_rest() {
                println!("  Rest ({} ticks)", note.ticks());
            } else {
                println!("  {:.3} Hz ({} ticks)", note.freq(), note.ticks());
            }
        }
        println!(
            "  = {} ticks, {} samples",
            track.ticks(),
            track.sample_count(config.bpm, config.ticks_per_quarter_note, config.sample_rate)
        );
        println!();
    }
}
