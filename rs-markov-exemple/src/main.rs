use std::path::PathBuf;

use clap::Parser;

use rs_markov_core::io::build_output_path;
use rs_markov_core::{MarkovConfig, MarkovGenerator};

/// Trains a Markov chain on a text file and prints generated texts.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Training text file.
    #[arg(default_value = "./data/sample.txt")]
    input: PathBuf,

    /// Number of preceding tokens forming a state.
    #[arg(short, long, default_value_t = 2)]
    order: usize,

    /// Number of texts to generate.
    #[arg(short = 'n', long, default_value_t = 10)]
    count: usize,

    /// Maximum number of tokens per text.
    #[arg(short, long, default_value_t = 50)]
    max_length: usize,

    /// Text to start generating from.
    #[arg(short, long)]
    start_with: Option<String>,

    /// Seed of the random source, for reproducible output.
    #[arg(long)]
    seed: Option<u64>,

    /// Train on each line separately instead of the whole file.
    #[arg(long)]
    lines: bool,

    /// Save the trained chain next to the input (`.json` or `.bin`).
    #[arg(long)]
    save: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    // Everything not set on the command line keeps its default:
    // case folding, '.', '!' and '?' as sentence enders, no probability threshold
    let config = MarkovConfig {
        order: args.order,
        seed: args.seed,
        ..MarkovConfig::default()
    };
    let mut generator = MarkovGenerator::new(config)?;

    if args.lines {
        generator.train_lines_from_file(&args.input)?;
    } else {
        generator.train_from_file(&args.input)?;
    }

    let stats = generator.statistics();
    println!(
        "{} states, {} starting states, {} transitions ({:.2} per state)",
        stats.state_count,
        stats.starting_state_count,
        stats.total_transitions,
        stats.average_transitions_per_state
    );
    for info in stats.most_common_states.iter().take(3) {
        println!("  '{}': {} transitions, {} next tokens", info.state, info.transition_count, info.next_tokens);
    }

    // Each text is an independent draw
    let start_with = args.start_with.as_deref();
    for (i, text) in generator.generate_texts(args.count, args.max_length, start_with).enumerate() {
        println!("Generated text {}: {}", i + 1, text?);
    }

    if let Some(extension) = &args.save {
        let output = build_output_path(&args.input, extension)?;
        generator.save_to_file(&output)?;
        println!("Chain saved to {}", output.display());
    }

    Ok(())
}
