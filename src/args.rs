use clap::{Parser, Subcommand};

/// This is a questionnaire program for Technology Acceptance Model surveys.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file describing the questionnaire, the admin account and the data file.
    /// Every key is optional and falls back to the built-in questionnaire.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path, optional) The CSV file holding the answers. Setting this option overrides the path
    /// that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub data: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard error.
    #[clap(long, takes_value = false)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Prints the questionnaire without collecting any answer.
    Questions,
    /// Fills in the questionnaire and stores the answers. This is the default command.
    Submit(SubmitArgs),
    /// Shows the stored answers, their averages and a chart (admin only).
    Report(ReportArgs),
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct SubmitArgs {
    /// (optional) The name of the respondent. If not provided, it is asked interactively
    /// (and may be left empty).
    #[clap(short, long, value_parser)]
    pub name: Option<String>,

    /// (file path, optional) A JSON file with the answers. If not provided, the questions are
    /// asked one by one on the terminal.
    #[clap(short, long, value_parser)]
    pub answers: Option<String>,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct ReportArgs {
    #[clap(short, long, value_parser)]
    pub username: Option<String>,

    #[clap(short, long, value_parser)]
    pub password: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the averages will be written in JSON format to the given
    /// location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing a summary in JSON format. If provided, tamsurvey will
    /// check that the computed averages match the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path) Writes the bar chart of the averages as an SVG image.
    #[clap(long, value_parser)]
    pub chart: Option<String>,

    /// (file path) Writes the stored answers as CSV.
    #[clap(long, value_parser)]
    pub export_csv: Option<String>,

    /// (file path) Writes the stored answers as an Excel (.xlsx) workbook.
    #[clap(long, value_parser)]
    pub export_xlsx: Option<String>,
}
