use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;
use simple_logger::SimpleLogger;

use text_file_split::line_ending::LineEnding;
use text_file_split::split::Split;

/// Split an employee file into one file per department, sorted by employee number
#[derive(Parser, Debug)]
#[command(name = "split", version, about)]
struct Args {
    /// Input file, the first line is a header
    #[arg(short, long, default_value = "./employee.csv")]
    input: PathBuf,

    /// Directory for the per department files, created when missing
    #[arg(short, long, default_value = "post")]
    output_dir: PathBuf,

    /// Field separator
    #[arg(short, long, default_value_t = ',')]
    separator: char,

    /// Extension of the output files
    #[arg(short, long, default_value = "csv")]
    extension: String,

    /// End output lines with CRLF instead of LF
    #[arg(long)]
    crlf: bool,

    /// Log every phase and every output file
    #[arg(short, long)]
    verbose: bool,
}

fn run(args: Args) -> Result<(), anyhow::Error> {
    let mut split = Split::new(args.input, args.output_dir);
    split.with_field_separator(args.separator);
    split.with_extension(args.extension.as_str());
    if args.crlf {
        split.with_line_ending(LineEnding::CrLf);
    }
    let report = split.split()?;
    if report.close_failures() > 0 {
        log::warn!("{} output files failed to close", report.close_failures());
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    let level = if args.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    if let Err(e) = SimpleLogger::new().with_level(level).init() {
        eprintln!("split: {}", e);
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
