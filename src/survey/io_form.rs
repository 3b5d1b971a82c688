use crate::survey::*;

use likert_tally::builder::Builder;
use serde::Deserialize;
use std::collections::BTreeMap;

const INTRO: &str = "Silakan isi kuesioner berikut berdasarkan pengalaman Anda menggunakan \
Grup FB Jual Beli Area Lede dan sekitarnya.";

/// The answers of one respondent, as written in an answers file.
#[derive(Debug, Deserialize)]
struct AnswersFile {
    name: Option<String>,
    #[serde(default)]
    answers: BTreeMap<String, Vec<Option<i64>>>,
}

fn write_header(out: &mut dyn Write, config: &SurveyConfig) -> io::Result<()> {
    writeln!(out, "{}", config.title)?;
    writeln!(out)?;
    writeln!(out, "Petunjuk Pengisian")?;
    writeln!(out, "{}", INTRO)?;
    writeln!(out, "Gunakan skala berikut untuk menjawab setiap pertanyaan:")?;
    for s in LikertScore::ALL.iter() {
        writeln!(out, "  - {}", s.label())?;
    }
    Ok(())
}

/// Prints the whole questionnaire: the title, the instructions and every question.
pub fn render_questionnaire(out: &mut dyn Write, config: &SurveyConfig) -> io::Result<()> {
    write_header(out, config)?;
    for group in config.schema.groups() {
        writeln!(out)?;
        writeln!(out, "{}", group.name)?;
        for (idx, q) in group.questions.iter().enumerate() {
            writeln!(out, "  {}. {}", idx + 1, q)?;
        }
    }
    out.flush()
}

/// One line of input without its line ending, or `None` at the end of the input.
fn read_line(input: &mut dyn BufRead) -> SurveyResult<Option<String>> {
    let mut buf = String::new();
    let n = input.read_line(&mut buf).context(ReadingInputSnafu {})?;
    if n == 0 {
        return Ok(None);
    }
    Ok(Some(buf.trim_end_matches(&['\r', '\n'][..]).to_string()))
}

fn prompt(out: &mut dyn Write, text: &str) -> SurveyResult<()> {
    write!(out, "{}", text).context(WritingOutputSnafu {})?;
    out.flush().context(WritingOutputSnafu {})
}

/// Asks every question on the terminal.
///
/// A blank line leaves the question unanswered and anything that is not a score is asked again.
/// When the input ends, the remaining questions stay unanswered.
pub fn read_answers_interactive(
    input: &mut dyn BufRead,
    out: &mut dyn Write,
    config: &SurveyConfig,
    ask_name: bool,
) -> SurveyResult<(ResponseSheet, Option<String>)> {
    write_header(out, config).context(WritingOutputSnafu {})?;
    writeln!(out).context(WritingOutputSnafu {})?;

    let mut builder = Builder::new(&config.schema);
    let mut ended = false;
    if ask_name {
        prompt(out, "Nama Responden (opsional): ")?;
        match read_line(input)? {
            Some(n) if !n.trim().is_empty() => builder = builder.name(n.trim()),
            Some(_) => {}
            None => ended = true,
        }
    }

    for group in config.schema.groups() {
        if ended {
            break;
        }
        writeln!(out).context(WritingOutputSnafu {})?;
        writeln!(out, "{}", group.name).context(WritingOutputSnafu {})?;
        for (idx, q) in group.questions.iter().enumerate() {
            writeln!(out, "  {}. {}", idx + 1, q).context(WritingOutputSnafu {})?;
            loop {
                prompt(out, "     Jawaban (1-5, kosong untuk dilewati): ")?;
                let line = match read_line(input)? {
                    Some(l) => l,
                    None => {
                        ended = true;
                        break;
                    }
                };
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    break;
                }
                let accepted = match trimmed.parse::<i64>() {
                    Ok(v) => builder.answer(&group.name, idx, v).is_ok(),
                    Err(_) => false,
                };
                if accepted {
                    break;
                }
                debug!("read_answers_interactive: rejected {:?}", trimmed);
                writeln!(out, "     Jawaban harus berupa angka 1 sampai 5.")
                    .context(WritingOutputSnafu {})?;
            }
            if ended {
                break;
            }
        }
    }
    if ended {
        info!("read_answers_interactive: input ended before the last question");
    }
    Ok(builder.build())
}

/// Reads the answers from a JSON file.
///
/// Groups that are not in the file stay unanswered. Unknown groups and lists of the wrong
/// length are errors.
pub fn read_answers_file(
    path: &str,
    schema: &QuestionnaireSchema,
) -> SurveyResult<(ResponseSheet, Option<String>)> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let answers_file: AnswersFile =
        serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    debug!("read_answers_file: {:?}", answers_file);

    let mut builder = Builder::new(schema);
    if let Some(n) = answers_file.name.as_deref() {
        builder = builder.name(n);
    }
    for (group, scores) in answers_file.answers.iter() {
        builder
            .answer_group(group, scores)
            .context(TallySnafu {})?;
    }
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn small_config() -> SurveyConfig {
        let schema = QuestionnaireSchema::new(vec![
            IndicatorGroup::new("Usefulness (U)", &["useful", "fast"]),
            IndicatorGroup::new("Ease (E)", &["easy"]),
        ])
        .unwrap();
        SurveyConfig {
            schema,
            ..SurveyConfig::default()
        }
    }

    #[test]
    fn questionnaire_layout() {
        let mut out: Vec<u8> = Vec::new();
        render_questionnaire(&mut out, &small_config()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with(DEFAULT_TITLE));
        assert!(text.contains("  - 1 - Sangat Tidak Setuju\n"));
        assert!(text.contains("  - 5 - Sangat Setuju\n"));
        assert!(text.contains("\nUsefulness (U)\n  1. useful\n  2. fast\n"));
        assert!(text.ends_with("\nEase (E)\n  1. easy\n"));
    }

    #[test]
    fn interactive_answers() {
        let config = small_config();
        // Name, then "x" and "7" are asked again, then a blank answer.
        let mut input = Cursor::new("  Ani \n4\nx\n7\n5\n\n");
        let mut out: Vec<u8> = Vec::new();
        let (sheet, name) = read_answers_interactive(&mut input, &mut out, &config, true).unwrap();
        assert_eq!(name.as_deref(), Some("Ani"));
        assert_eq!(
            sheet.answers("Usefulness (U)").unwrap().to_vec(),
            vec![
                Some(LikertScore::new(4).unwrap()),
                Some(LikertScore::new(5).unwrap())
            ]
        );
        assert_eq!(sheet.answers("Ease (E)").unwrap().to_vec(), vec![None]);
        assert!(!sheet.is_complete());
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Jawaban harus berupa angka").count(), 2);
    }

    #[test]
    fn interactive_input_ends_early() {
        let config = small_config();
        let mut input = Cursor::new("3\n");
        let mut out: Vec<u8> = Vec::new();
        let (sheet, name) = read_answers_interactive(&mut input, &mut out, &config, false).unwrap();
        assert_eq!(name, None);
        assert_eq!(sheet.missing_answers().len(), 2);
    }

    #[test]
    fn answers_file() {
        let dir = TempDir::new().unwrap();
        let config = small_config();
        let p = dir.path().join("a.json");
        fs::write(&p, r#"{"name": "Budi", "answers": {"Usefulness (U)": [2, null]}}"#).unwrap();
        let (sheet, name) = read_answers_file(&p.display().to_string(), &config.schema).unwrap();
        assert_eq!(name.as_deref(), Some("Budi"));
        assert_eq!(sheet.missing_answers().len(), 2);

        fs::write(&p, r#"{"answers": {"Other (O)": [1]}}"#).unwrap();
        assert!(matches!(
            read_answers_file(&p.display().to_string(), &config.schema),
            Err(SurveyError::Tally {
                source: TallyError::UnknownGroup(_)
            })
        ));

        fs::write(&p, r#"{"answers": {"Ease (E)": [1, 2]}}"#).unwrap();
        assert!(matches!(
            read_answers_file(&p.display().to_string(), &config.schema),
            Err(SurveyError::Tally {
                source: TallyError::QuestionCountMismatch { .. }
            })
        ));

        fs::write(&p, r#"{"answers": {"Ease (E)": [9]}}"#).unwrap();
        assert!(matches!(
            read_answers_file(&p.display().to_string(), &config.schema),
            Err(SurveyError::Tally {
                source: TallyError::ScoreOutOfRange(9)
            })
        ));
    }
}
