use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use laudo_pdf::{RenderContext, ReportConfig};

#[derive(Parser)]
#[command(name = "laudo-pdf")]
#[command(version)]
#[command(about = "Generate paginated case and laudo reports as PDF", long_about = None)]
struct Cli {
    /// Directory the PDF is written to (named after the record)
    #[arg(short, long, value_name = "DIR", default_value = ".", global = true)]
    output_dir: PathBuf,

    /// JSON file overriding page geometry, typography or fallback literals
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Case report from a JSON bundle: {"caso", "evidencias", "vitima", "laudos"}
    Case {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },
    /// Laudo report from a JSON bundle: {"evidencia", "laudo", "caso", "vitima"}
    Laudo {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },
}

fn run(cli: Cli) -> laudo_pdf::Result<PathBuf> {
    let config = match &cli.config {
        Some(path) => ReportConfig::from_json_file(path)?,
        None => ReportConfig::default(),
    };
    let ctx = RenderContext::now(config);

    let generated = match &cli.command {
        Command::Case { input } => laudo_pdf::build_case_report_from_json(input, &ctx)?,
        Command::Laudo { input } => laudo_pdf::build_laudo_report_from_json(input, &ctx)?,
    };
    std::fs::create_dir_all(&cli.output_dir)?;
    generated.write_to_dir(&cli.output_dir)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(Cli::parse()) {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
