use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;
use simple_logger::SimpleLogger;

use text_file_split::generator::Generator;

/// Generate a random sample employee file
#[derive(Parser, Debug)]
#[command(name = "generate", version, about)]
struct Args {
    /// Number of employee records to generate
    records: usize,

    /// Output file
    #[arg(short, long, default_value = "./employee.csv")]
    output: PathBuf,

    /// Seed for reproducible output
    #[arg(short, long)]
    seed: Option<u64>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = SimpleLogger::new().with_level(LevelFilter::Info).init() {
        eprintln!("generate: {}", e);
    }

    let mut generator = Generator::new(args.output, args.records);
    if let Some(seed) = args.seed {
        generator.with_seed(seed);
    }
    match generator.generate() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
