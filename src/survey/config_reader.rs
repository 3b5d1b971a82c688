use crate::survey::*;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_TITLE: &str = "Kuesioner TAM - Jual Beli Online di Grup FB Area Lede";
pub const DEFAULT_DATA_FILE: &str = "data/hasil_responden.csv";
/// The name of the worksheet in the Excel export.
pub const SHEET_NAME: &str = "Hasil Responden";

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct AdminAccount {
    pub username: String,
    pub password: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorEntry {
    pub name: String,
    pub questions: Vec<String>,
}

/// The configuration file, as written by the user. All the keys are optional.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyConfigFile {
    #[serde(rename = "title")]
    pub title: Option<String>,
    #[serde(rename = "dataFile")]
    pub data_file: Option<String>,
    #[serde(rename = "admin")]
    pub admin: Option<AdminAccount>,
    #[serde(rename = "indicators")]
    pub indicators: Option<Vec<IndicatorEntry>>,
}

/// Everything the commands need to know, fixed for the whole run.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SurveyConfig {
    pub title: String,
    pub data_file: PathBuf,
    pub schema: QuestionnaireSchema,
    pub credentials: Credentials,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        SurveyConfig {
            title: DEFAULT_TITLE.to_string(),
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            schema: QuestionnaireSchema::tam_default(),
            credentials: Credentials::default(),
        }
    }
}

impl SurveyConfigFile {
    /// Fills the missing keys with the built-in values.
    pub fn resolve(self) -> SurveyResult<SurveyConfig> {
        let default = SurveyConfig::default();
        let schema = match self.indicators {
            Some(entries) => {
                let groups: Vec<IndicatorGroup> = entries
                    .into_iter()
                    .map(|e| IndicatorGroup {
                        name: e.name,
                        questions: e.questions,
                    })
                    .collect();
                QuestionnaireSchema::new(groups).context(TallySnafu {})?
            }
            None => default.schema,
        };
        let credentials = match self.admin {
            Some(a) => Credentials {
                username: a.username,
                password: a.password,
            },
            None => default.credentials,
        };
        if let Some(g) = schema.groups().iter().find(|g| g.name == NAME_COLUMN) {
            whatever!(
                "indicator {:?} cannot use the name of the respondent column",
                g.name
            )
        }
        Ok(SurveyConfig {
            title: self.title.unwrap_or(default.title),
            data_file: self.data_file.map(PathBuf::from).unwrap_or(default.data_file),
            schema,
            credentials,
        })
    }
}

pub fn read_config(path: &str) -> SurveyResult<SurveyConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config_file: SurveyConfigFile =
        serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    info!("read_config: {:?}", config_file);
    config_file.resolve()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_the_default() {
        let c: SurveyConfigFile = serde_json::from_str("{}").unwrap();
        assert_eq!(c.resolve().unwrap(), SurveyConfig::default());
    }

    #[test]
    fn fixture_schema_and_credentials() {
        let c: SurveyConfigFile = serde_json::from_str(
            r#"{
                "dataFile": "fixtures/answers.csv",
                "admin": {"username": "root", "password": "pw"},
                "indicators": [
                    {"name": "Usefulness (U)", "questions": ["a", "b"]},
                    {"name": "Ease (E)", "questions": ["c"]}
                ]
            }"#,
        )
        .unwrap();
        let config = c.resolve().unwrap();
        assert_eq!(config.title, DEFAULT_TITLE);
        assert_eq!(config.data_file, PathBuf::from("fixtures/answers.csv"));
        assert_eq!(config.credentials, Credentials::new("root", "pw"));
        assert_eq!(config.schema.group_names(), vec!["Usefulness (U)", "Ease (E)"]);
    }

    #[test]
    fn invalid_schemas() {
        let empty: SurveyConfigFile = serde_json::from_str(r#"{"indicators": []}"#).unwrap();
        assert!(matches!(
            empty.resolve(),
            Err(SurveyError::Tally {
                source: TallyError::EmptySchema
            })
        ));
        let clash: SurveyConfigFile =
            serde_json::from_str(r#"{"indicators": [{"name": "Nama", "questions": ["a"]}]}"#)
                .unwrap();
        assert!(clash.resolve().is_err());
    }
}
