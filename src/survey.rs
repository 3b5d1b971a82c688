use log::{debug, info, warn};

use likert_tally::*;
use snafu::{prelude::*, ErrorCompat, Snafu};

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::{Args, Command, ReportArgs, SubmitArgs};
use crate::survey::config_reader::*;
use crate::survey::io_store::ResponseTable;

mod config_reader;
mod io_chart;
mod io_common;
mod io_export;
mod io_form;
mod io_store;

#[derive(Debug, Snafu)]
pub enum SurveyError {
    #[snafu(display("Error opening file {path}: {source}"))]
    OpeningStore { source: io::Error, path: String },
    #[snafu(display("Error reading CSV file {path}: {source}"))]
    ReadingCsv { source: csv::Error, path: String },
    #[snafu(display("Error writing CSV file {path}: {source}"))]
    WritingCsv { source: csv::Error, path: String },
    #[snafu(display("Cannot read score {content:?} in column {column:?} at line {lineno}"))]
    ParsingScore {
        column: String,
        lineno: usize,
        content: String,
    },
    #[snafu(display("Error opening JSON file {path}: {source}"))]
    OpeningJson { source: io::Error, path: String },
    #[snafu(display("Error parsing JSON: {source}"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("{source}"))]
    Tally { source: TallyError },
    #[snafu(display("Error building the spreadsheet: {source}"))]
    Workbook {
        source: rust_xlsxwriter::XlsxError,
    },
    #[snafu(display("Error drawing the chart: {message}"))]
    Chart { message: String },
    #[snafu(display("Error writing file {path}: {source}"))]
    WritingFile { source: io::Error, path: String },
    #[snafu(display("Error reading the answers: {source}"))]
    ReadingInput { source: io::Error },
    #[snafu(display("Error writing the output: {source}"))]
    WritingOutput { source: io::Error },
    #[snafu(display("Login admin diperlukan untuk melihat hasil."))]
    Unauthorized {},
    #[snafu(display("Terjadi error saat membaca data: {source}"))]
    Report {
        #[snafu(source(from(SurveyError, Box::new)))]
        source: Box<SurveyError>,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SurveyResult<T> = Result<T, SurveyError>;

/// What the current user is allowed to see.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Access {
    /// Only the questionnaire.
    Respondent,
    /// The questionnaire and the results.
    Admin,
}

/// Compares the submitted pair with the configured one. Anything missing or different gives
/// `Access::Respondent`.
pub fn check_credentials(
    username: Option<&str>,
    password: Option<&str>,
    expected: &Credentials,
) -> Access {
    match (username, password) {
        (Some(u), Some(p)) if u == expected.username && p == expected.password => Access::Admin,
        _ => Access::Respondent,
    }
}

/// How a report ended.
#[derive(PartialEq, Debug, Clone)]
pub enum ReportOutcome {
    /// The data file is missing or empty: nothing to show.
    EmptyStore,
    Shown {
        respondents: usize,
        averages: Vec<IndicatorAverage>,
    },
}

fn say(out: &mut dyn Write, text: &str) -> SurveyResult<()> {
    writeln!(out, "{}", text).context(WritingOutputSnafu {})
}

pub fn run_questions(config: &SurveyConfig, out: &mut dyn Write) -> SurveyResult<()> {
    io_form::render_questionnaire(out, config).context(WritingOutputSnafu {})
}

/// Collects one sheet of answers and stores it.
///
/// Nothing is written when a question is left unanswered.
pub fn run_submit(
    config: &SurveyConfig,
    args: &SubmitArgs,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> SurveyResult<ResponseRecord> {
    let (sheet, file_name) = match &args.answers {
        Some(p) => io_form::read_answers_file(p, &config.schema)?,
        None => io_form::read_answers_interactive(input, out, config, args.name.is_none())?,
    };
    let name = args.name.clone().or(file_name);
    debug!("run_submit: name: {:?} sheet: {:?}", name, sheet);

    let stamp = io_common::timestamp_now();
    let record = build_record(&sheet, name.as_deref(), &stamp).context(TallySnafu {})?;

    io_store::append_record(&config.data_file, &record)?;
    info!(
        "run_submit: stored {:?} in {:?}",
        record.name,
        config.data_file.display()
    );
    say(
        out,
        "Jawaban berhasil disimpan! Terima kasih sudah berpartisipasi.",
    )?;
    Ok(record)
}

/// Shows the stored answers to an admin.
///
/// Every failure after the credential check is reported as one error reading the data.
pub fn run_report(
    config: &SurveyConfig,
    args: &ReportArgs,
    out: &mut dyn Write,
) -> SurveyResult<ReportOutcome> {
    let access = check_credentials(
        args.username.as_deref(),
        args.password.as_deref(),
        &config.credentials,
    );
    if access != Access::Admin {
        warn!("run_report: refused access for user {:?}", args.username);
        return UnauthorizedSnafu {}.fail();
    }
    report_pipeline(config, args, out).context(ReportSnafu {})
}

fn report_pipeline(
    config: &SurveyConfig,
    args: &ReportArgs,
    out: &mut dyn Write,
) -> SurveyResult<ReportOutcome> {
    say(out, "Dashboard Hasil Kuesioner TAM")?;
    say(out, "")?;

    let table: ResponseTable = match io_store::read_table(&config.data_file)? {
        Some(t) => t,
        None => {
            say(out, "File data kosong, belum ada jawaban tersimpan.")?;
            return Ok(ReportOutcome::EmptyStore);
        }
    };
    info!(
        "report: {} rows, columns: {:?}",
        table.rows.len(),
        table.columns
    );

    say(out, "Data Responden")?;
    say(out, &table.render_text())?;

    let columns = table.score_columns(&config.schema.group_names())?;
    let averages = indicator_averages(&config.schema, &columns);

    match BarChart::from_averages(&averages) {
        Some(chart) => {
            say(out, "Rata-rata Skor per Indikator TAM")?;
            for a in averages.iter() {
                say(out, &format!("  {:<40} {:.6}", a.indicator, a.mean))?;
            }
            say(out, "")?;
            say(out, &chart.render_text(8))?;
            if let Some(p) = &args.chart {
                let svg = io_chart::render_svg(&chart, "Rata-rata Skor per Indikator TAM")?;
                io_common::write_bytes(p, svg.as_bytes())?;
                info!("report: chart written to {:?}", p);
            }
        }
        None if columns.is_empty() => {
            warn!("report: no indicator column in {:?}", table.columns);
            say(out, "Belum ada data indikator yang sesuai.")?;
        }
        None => {
            info!("report: indicator columns without any score");
            say(out, "Kolom indikator tersedia, tetapi belum ada skor yang tersimpan.")?;
        }
    }

    if let Some(p) = &args.export_csv {
        let bytes = io_export::table_to_csv(&table)?;
        io_common::write_bytes(p, &bytes)?;
        say(out, &format!("Data CSV disimpan ke {}", p))?;
    }
    if let Some(p) = &args.export_xlsx {
        let bytes = io_export::table_to_xlsx(&table, SHEET_NAME)?;
        io_common::write_bytes(p, &bytes)?;
        say(out, &format!("Data Excel disimpan ke {}", p))?;
    }

    let summary_js = build_summary_js(config, table.rows.len(), &averages);
    let pretty_js_summary =
        serde_json::to_string_pretty(&summary_js).context(ParsingJsonSnafu {})?;
    match args.out.as_deref() {
        None => {}
        Some("") | Some("stdout") => say(out, &pretty_js_summary)?,
        Some(p) => io_common::write_bytes(p, pretty_js_summary.as_bytes())?,
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = &args.reference {
        check_reference(summary_p, &summary_js)?;
    }

    Ok(ReportOutcome::Shown {
        respondents: table.rows.len(),
        averages,
    })
}

fn build_summary_js(config: &SurveyConfig, respondents: usize, averages: &[IndicatorAverage]) -> JSValue {
    let avgs: Vec<JSValue> = averages
        .iter()
        .map(|a| json!({"indicator": a.indicator, "mean": a.mean, "responses": a.responses}))
        .collect();
    json!({
        "config": {
            "title": config.title,
            "dataFile": config.data_file.display().to_string(),
        },
        "respondents": respondents,
        "averages": avgs,
    })
}

/// The part of a summary that depends on the data only.
fn comparable_summary(js: &JSValue) -> JSValue {
    json!({
        "respondents": js["respondents"],
        "averages": js["averages"],
    })
}

pub fn read_summary(path: &str) -> SurveyResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(comparable_summary(&js))
}

fn check_reference(summary_p: &str, summary_js: &JSValue) -> SurveyResult<()> {
    let summary_ref = read_summary(summary_p)?;
    debug!("check_reference: reference: {:?}", summary_ref);
    let pretty_ref = serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    let pretty_stats = serde_json::to_string_pretty(&comparable_summary(summary_js))
        .context(ParsingJsonSnafu {})?;
    if pretty_ref != pretty_stats {
        warn!("Found differences with the reference summary");
        print_diff(pretty_ref.as_str(), pretty_stats.as_str(), "\n");
        whatever!("Difference detected between calculated summary and reference summary")
    }
    Ok(())
}

/// Entry point of the command line.
pub fn run(args: &Args) -> SurveyResult<()> {
    let mut config = match &args.config {
        Some(p) => read_config(p)?,
        None => SurveyConfig::default(),
    };
    if let Some(d) = &args.data {
        config.data_file = Path::new(d).to_path_buf();
    }
    debug!("run: config: {:?}", config);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut input = stdin.lock();
    let mut out = stdout.lock();

    let res = match args.command.clone() {
        Some(Command::Questions) => run_questions(&config, &mut out),
        Some(Command::Report(report_args)) => run_report(&config, &report_args, &mut out).map(|_| ()),
        Some(Command::Submit(submit_args)) => {
            run_submit(&config, &submit_args, &mut input, &mut out).map(|_| ())
        }
        None => run_submit(&config, &SubmitArgs::default(), &mut input, &mut out).map(|_| ()),
    };
    if let Err(e) = &res {
        warn!("Error occured {:?}", e);
        if let Some(bt) = ErrorCompat::backtrace(e) {
            debug!("trace: {}", bt);
        }
    }
    res
}
