pub mod builder;
mod chart;
mod config;
pub mod manual;

use log::{debug, info};

use std::ops::AddAssign;

pub use crate::chart::*;
pub use crate::config::*;

// **** Private structures ****

#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord)]
struct ScoreSum(u32);

impl ScoreSum {
    const EMPTY: ScoreSum = ScoreSum(0);
}

impl AddAssign for ScoreSum {
    fn add_assign(&mut self, rhs: ScoreSum) {
        self.0 += rhs.0;
    }
}

impl From<LikertScore> for ScoreSum {
    fn from(s: LikertScore) -> Self {
        ScoreSum(s.value() as u32)
    }
}

// **** Answer sheets ****

/// The answers of one respondent, laid out like the questionnaire.
///
/// A question that has not been answered is `None`. There is no default answer.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ResponseSheet {
    groups: Vec<(String, Vec<Option<LikertScore>>)>,
}

impl ResponseSheet {
    /// A sheet with every question unanswered.
    pub fn blank(schema: &QuestionnaireSchema) -> ResponseSheet {
        ResponseSheet {
            groups: schema
                .groups()
                .iter()
                .map(|g| (g.name.clone(), vec![None; g.questions.len()]))
                .collect(),
        }
    }

    /// Sets (or clears with `None`) the answer to a question. `question` starts at 0.
    pub fn set_answer(
        &mut self,
        group: &str,
        question: usize,
        score: Option<LikertScore>,
    ) -> Result<(), TallyError> {
        let answers = self.answers_mut(group)?;
        let expected = answers.len();
        let slot = answers
            .get_mut(question)
            .ok_or_else(|| TallyError::QuestionCountMismatch {
                group: group.to_string(),
                expected,
                found: question + 1,
            })?;
        *slot = score;
        Ok(())
    }

    /// Replaces all the answers of a group at once.
    pub fn set_group(
        &mut self,
        group: &str,
        scores: &[Option<LikertScore>],
    ) -> Result<(), TallyError> {
        let answers = self.answers_mut(group)?;
        if answers.len() != scores.len() {
            return Err(TallyError::QuestionCountMismatch {
                group: group.to_string(),
                expected: answers.len(),
                found: scores.len(),
            });
        }
        answers.copy_from_slice(scores);
        Ok(())
    }

    pub fn answers(&self, group: &str) -> Option<&[Option<LikertScore>]> {
        self.groups
            .iter()
            .find(|(name, _)| name == group)
            .map(|(_, a)| a.as_slice())
    }

    fn answers_mut(&mut self, group: &str) -> Result<&mut Vec<Option<LikertScore>>, TallyError> {
        self.groups
            .iter_mut()
            .find(|(name, _)| name == group)
            .map(|(_, a)| a)
            .ok_or_else(|| TallyError::UnknownGroup(group.to_string()))
    }

    /// All the unanswered questions, in questionnaire order.
    pub fn missing_answers(&self) -> Vec<MissingAnswer> {
        let mut res: Vec<MissingAnswer> = Vec::new();
        for (group, answers) in self.groups.iter() {
            for (idx, a) in answers.iter().enumerate() {
                if a.is_none() {
                    res.push(MissingAnswer {
                        group: group.clone(),
                        question: idx + 1,
                    });
                }
            }
        }
        res
    }

    pub fn is_complete(&self) -> bool {
        self.groups
            .iter()
            .all(|(_, answers)| answers.iter().all(|a| a.is_some()))
    }
}

/// Checks that every question of the sheet has an answer.
///
/// Returns the answers group by group, in schema order.
pub fn validate_sheet(sheet: &ResponseSheet) -> Result<Vec<(String, Vec<LikertScore>)>, TallyError> {
    let missing = sheet.missing_answers();
    if !missing.is_empty() {
        debug!("validate_sheet: {} unanswered questions", missing.len());
        return Err(TallyError::IncompleteSubmission { missing });
    }
    Ok(sheet
        .groups
        .iter()
        .map(|(name, answers)| (name.clone(), answers.iter().flatten().cloned().collect()))
        .collect())
}

/// The arithmetic mean of the answers of one group.
///
/// Returns `None` for an empty slice.
pub fn mean_score(scores: &[LikertScore]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let mut total = ScoreSum::EMPTY;
    for s in scores.iter() {
        total += ScoreSum::from(*s);
    }
    Some(total.0 as f64 / scores.len() as f64)
}

/// The mean score of every group of a complete sheet, in schema order.
pub fn group_means(sheet: &ResponseSheet) -> Result<Vec<(String, f64)>, TallyError> {
    let validated = validate_sheet(sheet)?;
    let mut res: Vec<(String, f64)> = Vec::new();
    for (name, scores) in validated.into_iter() {
        let m = mean_score(&scores).ok_or_else(|| TallyError::EmptyGroup(name.clone()))?;
        res.push((name, m));
    }
    Ok(res)
}

/// The name stored for a respondent: the given one without surrounding spaces, or the prefix
/// followed by `stamp` when the name is missing or blank.
pub fn respondent_name(name: Option<&str>, stamp: &str) -> String {
    match name.map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => format!("{}{}", RESPONDENT_PREFIX, stamp),
    }
}

/// Scores a complete sheet into the record that gets stored.
///
/// Arguments:
/// * `sheet` the answers, which must all be filled
/// * `name` the name typed by the respondent, if any
/// * `stamp` the timestamp used to make up a name when none is given
pub fn build_record(
    sheet: &ResponseSheet,
    name: Option<&str>,
    stamp: &str,
) -> Result<ResponseRecord, TallyError> {
    let scores = group_means(sheet)?;
    let record = ResponseRecord {
        name: respondent_name(name, stamp),
        scores,
    };
    info!("build_record: {:?}", record);
    Ok(record)
}

/// The column-wise mean of the indicator columns found in the loaded data.
///
/// Only the groups of the schema are considered, in schema order, and only those that appear
/// among `columns`. A column without any value is left out.
pub fn indicator_averages(
    schema: &QuestionnaireSchema,
    columns: &[ScoreColumn],
) -> Vec<IndicatorAverage> {
    let mut res: Vec<IndicatorAverage> = Vec::new();
    for g in schema.groups() {
        let column = match columns.iter().find(|c| c.name == g.name) {
            Some(c) => c,
            None => {
                debug!("indicator_averages: column {:?} not present", g.name);
                continue;
            }
        };
        if column.values.is_empty() {
            debug!("indicator_averages: column {:?} has no value", g.name);
            continue;
        }
        let total: f64 = column.values.iter().sum();
        res.push(IndicatorAverage {
            indicator: g.name.clone(),
            mean: total / column.values.len() as f64,
            responses: column.values.len(),
        });
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn small_schema() -> QuestionnaireSchema {
        QuestionnaireSchema::new(vec![
            IndicatorGroup::new("Usefulness (U)", &["q1", "q2", "q3"]),
            IndicatorGroup::new("Ease (E)", &["q1", "q2"]),
        ])
        .unwrap()
    }

    fn scores(xs: &[i64]) -> Vec<Option<LikertScore>> {
        xs.iter().map(|x| Some(LikertScore::new(*x).unwrap())).collect()
    }

    #[test]
    fn score_range() {
        assert!(LikertScore::new(0).is_err());
        assert!(LikertScore::new(6).is_err());
        assert_eq!(LikertScore::new(5).unwrap().value(), 5);
        assert_eq!(LikertScore::new(3).unwrap().label(), "3 - Netral");
    }

    #[test]
    fn schema_invariants() {
        assert_eq!(QuestionnaireSchema::new(vec![]), Err(TallyError::EmptySchema));
        assert_eq!(
            QuestionnaireSchema::new(vec![IndicatorGroup::new("A", &[])]),
            Err(TallyError::EmptyGroup("A".to_string()))
        );
        assert_eq!(
            QuestionnaireSchema::new(vec![
                IndicatorGroup::new("A", &["x"]),
                IndicatorGroup::new("A", &["y"])
            ]),
            Err(TallyError::DuplicateGroup("A".to_string()))
        );
    }

    #[test]
    fn default_schema_shape() {
        let schema = QuestionnaireSchema::tam_default();
        let sizes: Vec<usize> = schema.groups().iter().map(|g| g.questions.len()).collect();
        assert_eq!(sizes, vec![5, 5, 4, 4, 4]);
        assert_eq!(schema.group_names()[0], "Perceived Usefulness (PU)");
        assert_eq!(schema.groups()[4].short_label(), "ATU-Real");
        assert_eq!(short_label("No code"), "No code");
    }

    #[test]
    fn mean_is_sum_over_count() {
        init();
        let mut sheet = ResponseSheet::blank(&small_schema());
        sheet.set_group("Usefulness (U)", &scores(&[1, 2, 4])).unwrap();
        sheet.set_group("Ease (E)", &scores(&[5, 4])).unwrap();
        let means = group_means(&sheet).unwrap();
        assert_eq!(
            means,
            vec![
                ("Usefulness (U)".to_string(), 7.0 / 3.0),
                ("Ease (E)".to_string(), 4.5)
            ]
        );
    }

    #[test]
    fn all_threes() {
        let schema = QuestionnaireSchema::tam_default();
        let mut sheet = ResponseSheet::blank(&schema);
        for g in schema.groups() {
            sheet
                .set_group(&g.name, &vec![Some(LikertScore::new(3).unwrap()); g.questions.len()])
                .unwrap();
        }
        let record = build_record(&sheet, Some("Budi"), "20240101120000").unwrap();
        assert_eq!(record.name, "Budi");
        assert_eq!(record.scores.len(), 5);
        assert!(record.scores.iter().all(|(_, s)| *s == 3.0));
    }

    #[test]
    fn one_missing_answer_rejects() {
        init();
        let mut sheet = ResponseSheet::blank(&small_schema());
        sheet.set_group("Usefulness (U)", &scores(&[1, 2, 4])).unwrap();
        sheet
            .set_answer("Ease (E)", 0, Some(LikertScore::new(2).unwrap()))
            .unwrap();
        assert!(!sheet.is_complete());
        let err = build_record(&sheet, None, "20240101120000").unwrap_err();
        assert_eq!(
            err,
            TallyError::IncompleteSubmission {
                missing: vec![MissingAnswer {
                    group: "Ease (E)".to_string(),
                    question: 2
                }]
            }
        );
        assert!(err.to_string().contains("E #2"));
    }

    #[test]
    fn wrong_shapes() {
        let mut sheet = ResponseSheet::blank(&small_schema());
        assert_eq!(
            sheet.set_group("Nope", &scores(&[1])),
            Err(TallyError::UnknownGroup("Nope".to_string()))
        );
        assert!(matches!(
            sheet.set_group("Ease (E)", &scores(&[1, 2, 3])),
            Err(TallyError::QuestionCountMismatch { expected: 2, found: 3, .. })
        ));
        assert!(sheet.set_answer("Ease (E)", 2, None).is_err());
    }

    #[test]
    fn generated_name() {
        assert_eq!(respondent_name(None, "20240102030405"), "Responden_20240102030405");
        assert_eq!(respondent_name(Some(""), "20240102030405"), "Responden_20240102030405");
        assert_eq!(respondent_name(Some("  "), "1"), "Responden_1");
        assert_eq!(respondent_name(Some("Sari"), "1"), "Sari");
        assert_eq!(respondent_name(Some(" Ani \t"), "1"), "Ani");
    }

    #[test]
    fn averages_over_present_columns() {
        let schema = QuestionnaireSchema::tam_default();
        let columns = vec![
            ScoreColumn {
                name: "Behavioral Intention (BI)".to_string(),
                values: vec![5.0, 4.0, 3.0],
            },
            ScoreColumn {
                name: "Perceived Usefulness (PU)".to_string(),
                values: vec![2.0, 4.0],
            },
            ScoreColumn {
                name: "Something else".to_string(),
                values: vec![1.0],
            },
            ScoreColumn {
                name: "Attitude Toward Using (ATU)".to_string(),
                values: vec![],
            },
        ];
        let avgs = indicator_averages(&schema, &columns);
        assert_eq!(
            avgs,
            vec![
                IndicatorAverage {
                    indicator: "Perceived Usefulness (PU)".to_string(),
                    mean: 3.0,
                    responses: 2
                },
                IndicatorAverage {
                    indicator: "Behavioral Intention (BI)".to_string(),
                    mean: 4.0,
                    responses: 3
                },
            ]
        );
        assert!(indicator_averages(&schema, &[]).is_empty());
    }
}
