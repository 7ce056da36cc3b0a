use clap::Parser;
use std::path::PathBuf;

use crate::logger::DEFAULT_LOG_FILE;

#[derive(Parser, Debug)]
#[command(
    name = "practice-exam",
    version,
    about = "Data Annotation practice exam in the terminal"
)]
pub struct Cli {
    #[arg(long, help = "Load questions from a JSON file instead of the built-in bank")]
    pub bank: Option<PathBuf>,
    #[arg(
        long,
        env = "PRACTICE_EXAM_LOG",
        default_value = DEFAULT_LOG_FILE,
        help = "File that receives debug logging"
    )]
    pub log_file: PathBuf,
    #[arg(long, help = "Print the question list and exit")]
    pub list: bool,
}
