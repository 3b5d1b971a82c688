pub use crate::config::*;
use crate::ResponseSheet;

/// A builder for filling in an answer sheet from raw numbers.
///
/// ```
/// use likert_tally::builder::Builder;
/// use likert_tally::{IndicatorGroup, QuestionnaireSchema};
/// # use likert_tally::TallyError;
///
/// let schema = QuestionnaireSchema::new(vec![
///     IndicatorGroup::new("Perceived Usefulness (PU)", &["fast", "useful"]),
/// ])?;
///
/// let mut builder = Builder::new(&schema).name("Ani");
/// builder.answer("Perceived Usefulness (PU)", 0, 4)?;
/// builder.answer("Perceived Usefulness (PU)", 1, 5)?;
/// let record = builder.record("20240101000000")?;
/// assert_eq!(record.score("Perceived Usefulness (PU)"), Some(4.5));
///
/// # Ok::<(), TallyError>(())
/// ```
pub struct Builder {
    pub(crate) _sheet: ResponseSheet,
    pub(crate) _name: Option<String>,
}

impl Builder {
    pub fn new(schema: &QuestionnaireSchema) -> Builder {
        Builder {
            _sheet: ResponseSheet::blank(schema),
            _name: None,
        }
    }

    pub fn name(self, name: &str) -> Builder {
        Builder {
            _sheet: self._sheet,
            _name: Some(name.to_string()),
        }
    }

    /// Answers one question. `question` starts at 0.
    pub fn answer(&mut self, group: &str, question: usize, score: i64) -> Result<(), TallyError> {
        let s = LikertScore::new(score)?;
        self._sheet.set_answer(group, question, Some(s))
    }

    /// Answers all the questions of a group. A `None` leaves the question unanswered.
    pub fn answer_group(&mut self, group: &str, scores: &[Option<i64>]) -> Result<(), TallyError> {
        let mut parsed: Vec<Option<LikertScore>> = Vec::new();
        for s in scores {
            parsed.push(s.map(LikertScore::new).transpose()?);
        }
        self._sheet.set_group(group, &parsed)
    }

    pub fn build(self) -> (ResponseSheet, Option<String>) {
        (self._sheet, self._name)
    }

    /// Validates the answers and scores them.
    pub fn record(&self, stamp: &str) -> Result<ResponseRecord, TallyError> {
        crate::build_record(&self._sheet, self._name.as_deref(), stamp)
    }
}
