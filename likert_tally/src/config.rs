// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// Prefix of the respondent name generated when none is given.
pub const RESPONDENT_PREFIX: &str = "Responden_";

/// The name of the column holding the respondent name.
pub const NAME_COLUMN: &str = "Nama";

/// One answer on the 5-point agreement scale.
///
/// The only way to build one is through [`LikertScore::new`], so a value of this type is always
/// within `1..=5`.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct LikertScore(u8);

impl LikertScore {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub const ALL: [LikertScore; 5] = [
        LikertScore(1),
        LikertScore(2),
        LikertScore(3),
        LikertScore(4),
        LikertScore(5),
    ];

    pub fn new(value: i64) -> Result<LikertScore, TallyError> {
        if value < LikertScore::MIN as i64 || value > LikertScore::MAX as i64 {
            return Err(TallyError::ScoreOutOfRange(value));
        }
        Ok(LikertScore(value as u8))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// The label shown next to the choice in the questionnaire.
    pub fn label(&self) -> &'static str {
        match self.0 {
            1 => "1 - Sangat Tidak Setuju",
            2 => "2 - Tidak Setuju",
            3 => "3 - Netral",
            4 => "4 - Setuju",
            _ => "5 - Sangat Setuju",
        }
    }
}

/// One construct of the acceptance model, with its questions in display order.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct IndicatorGroup {
    pub name: String,
    pub questions: Vec<String>,
}

impl IndicatorGroup {
    pub fn new(name: &str, questions: &[&str]) -> IndicatorGroup {
        IndicatorGroup {
            name: name.to_string(),
            questions: questions.iter().map(|q| q.to_string()).collect(),
        }
    }

    /// The code in parentheses at the end of the name (`PU` for
    /// `Perceived Usefulness (PU)`), or the full name when there is none.
    pub fn short_label(&self) -> String {
        short_label(&self.name)
    }
}

pub fn short_label(name: &str) -> String {
    match (name.rfind('('), name.rfind(')')) {
        (Some(start), Some(end)) if start + 1 < end => name[start + 1..end].to_string(),
        _ => name.to_string(),
    }
}

/// The ordered list of indicator groups of a questionnaire.
///
/// Invariants checked at construction: at least one group, no empty group, no duplicate names.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct QuestionnaireSchema {
    groups: Vec<IndicatorGroup>,
}

impl QuestionnaireSchema {
    pub fn new(groups: Vec<IndicatorGroup>) -> Result<QuestionnaireSchema, TallyError> {
        if groups.is_empty() {
            return Err(TallyError::EmptySchema);
        }
        for (idx, g) in groups.iter().enumerate() {
            if g.questions.is_empty() {
                return Err(TallyError::EmptyGroup(g.name.clone()));
            }
            if groups[..idx].iter().any(|other| other.name == g.name) {
                return Err(TallyError::DuplicateGroup(g.name.clone()));
            }
        }
        Ok(QuestionnaireSchema { groups })
    }

    pub fn groups(&self) -> &[IndicatorGroup] {
        &self.groups
    }

    pub fn group_names(&self) -> Vec<String> {
        self.groups.iter().map(|g| g.name.clone()).collect()
    }

    /// The questionnaire about buying and selling in the "Grup FB Jual Beli Area Lede" group.
    pub fn tam_default() -> QuestionnaireSchema {
        QuestionnaireSchema {
            groups: vec![
                IndicatorGroup::new(
                    "Perceived Usefulness (PU)",
                    &[
                        "Grup FB Jual Beli Area Lede membantu saya bertransaksi lebih cepat",
                        "Grup FB Jual Beli Area Lede meningkatkan efektivitas saya dalam jual beli",
                        "Grup FB Jual Beli Area Lede membuat aktivitas jual beli lebih efisien",
                        "Grup FB Jual Beli Area Lede meningkatkan performa saya dalam berjualan atau membeli",
                        "Grup FB Jual Beli Area Lede mempermudah interaksi dan komunikasi",
                    ],
                ),
                IndicatorGroup::new(
                    "Perceived Ease of Use (PEOU)",
                    &[
                        "Grup FB Jual Beli Area Lede mudah digunakan untuk aktivitas jual beli",
                        "Proses interaksi di Grup FB Jual Beli Area Lede sederhana dan mudah dipahami",
                        "Grup FB Jual Beli Area Lede membantu saya mencapai tujuan jual beli",
                        "Fitur dalam Grup FB Jual Beli Area Lede mudah dipelajari",
                        "Grup FB Jual Beli Area Lede mudah diakses kapan saja",
                    ],
                ),
                IndicatorGroup::new(
                    "Attitude Toward Using (ATU)",
                    &[
                        "Saya merasa nyaman menggunakan Grup FB Jual Beli Area Lede untuk jual beli",
                        "Saya merasa senang melakukan aktivitas jual beli di Grup FB Jual Beli Area Lede",
                        "Saya menilai menggunakan Grup FB Jual Beli Area Lede adalah ide yang baik",
                        "Saya memiliki keinginan untuk terus menggunakan Grup FB Jual Beli Area Lede",
                    ],
                ),
                IndicatorGroup::new(
                    "Behavioral Intention (BI)",
                    &[
                        "Saya berniat untuk terus menggunakan Grup FB Jual Beli Area Lede",
                        "Saya berniat merekomendasikan Grup FB Jual Beli Area Lede kepada orang lain",
                        "Saya berencana untuk lebih sering bertransaksi melalui Grup FB Jual Beli Area Lede",
                        "Saya memiliki rencana untuk tetap aktif dalam Grup FB Jual Beli Area Lede",
                    ],
                ),
                IndicatorGroup::new(
                    "Actual Technology Use (ATU-Real)",
                    &[
                        "Saya sering menggunakan Grup FB Jual Beli Area Lede",
                        "Saya menggunakan Grup FB Jual Beli Area Lede dalam waktu yang cukup lama",
                        "Saya merasa puas terhadap pengalaman menggunakan Grup FB Jual Beli Area Lede",
                        "Saya benar-benar menggunakan Grup FB Jual Beli Area Lede untuk aktivitas jual beli online",
                    ],
                ),
            ],
        }
    }
}

/// The username and password pair that opens the results.
///
/// Compared as plain strings.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Credentials {
        Credentials {
            username: username.to_string(),
            password: password.to_string(),
        }
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Credentials::new("admin", "12345")
    }
}

// ******** Output data structures *********

/// One stored submission: the respondent name and the mean score of each group.
#[derive(PartialEq, Debug, Clone)]
pub struct ResponseRecord {
    pub name: String,
    /// In schema order.
    pub scores: Vec<(String, f64)>,
}

impl ResponseRecord {
    pub fn score(&self, group: &str) -> Option<f64> {
        self.scores
            .iter()
            .find(|(name, _)| name == group)
            .map(|(_, s)| *s)
    }
}

/// The values read back from one stored column.
#[derive(PartialEq, Debug, Clone)]
pub struct ScoreColumn {
    pub name: String,
    pub values: Vec<f64>,
}

/// The mean of one indicator column across all respondents.
#[derive(PartialEq, Debug, Clone)]
pub struct IndicatorAverage {
    pub indicator: String,
    pub mean: f64,
    pub responses: usize,
}

/// A question left without an answer. `question` starts at 1.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct MissingAnswer {
    pub group: String,
    pub question: usize,
}

/// Errors that prevent a sheet from being scored.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TallyError {
    EmptySchema,
    EmptyGroup(String),
    DuplicateGroup(String),
    UnknownGroup(String),
    QuestionCountMismatch {
        group: String,
        expected: usize,
        found: usize,
    },
    ScoreOutOfRange(i64),
    IncompleteSubmission {
        missing: Vec<MissingAnswer>,
    },
}

impl Error for TallyError {}

impl Display for TallyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TallyError::EmptySchema => write!(f, "the questionnaire has no indicator group"),
            TallyError::EmptyGroup(g) => write!(f, "indicator group {:?} has no question", g),
            TallyError::DuplicateGroup(g) => {
                write!(f, "indicator group {:?} is declared twice", g)
            }
            TallyError::UnknownGroup(g) => write!(f, "unknown indicator group {:?}", g),
            TallyError::QuestionCountMismatch {
                group,
                expected,
                found,
            } => write!(
                f,
                "indicator group {:?} has {} questions but {} answers were given",
                group, expected, found
            ),
            TallyError::ScoreOutOfRange(v) => write!(
                f,
                "score {} is outside of the scale {}..{}",
                v,
                LikertScore::MIN,
                LikertScore::MAX
            ),
            TallyError::IncompleteSubmission { missing } => {
                write!(
                    f,
                    "Harap isi semua pertanyaan sebelum menyimpan ({} belum dijawab",
                    missing.len()
                )?;
                for m in missing.iter() {
                    write!(f, "; {} #{}", short_label(&m.group), m.question)?;
                }
                write!(f, ")")
            }
        }
    }
}
