use std::path::Path;

use log::debug;
use regex::Regex;
use url::Url;

use crate::utils::constants::URL;
use crate::utils::conversion::decode_form_value;
use crate::Error;

/// Everything the portal needs to know about a student
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Credentials {
    /// The display name as the portal knows it (already decoded)
    pub name: String,
    pub password: String,
    /// The class period code
    pub period: String,
    pub student_id: String,
    pub teacher: String,
    /// e.g. `spring2016`
    pub term: String,
}

const SETTINGS_LINES: [&str; 6] = ["name", "password", "period", "student id", "teacher", "term"];

impl Credentials {
    /// Reads the settings file at `path`
    pub async fn load(path: &Path) -> Result<Self, Error> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::Config(format!("failed to read '{}': {}", path.display(), e)))?;
        debug!("loaded settings from '{}'", path.display());
        Self::from_settings(&text)
    }

    /// Parses the settings file format: six lines, each carrying one value in double quotes
    /// <br> The order is name (form encoded), password, period, student id, teacher, term
    pub fn from_settings(text: &str) -> Result<Self, Error> {
        let quoted = Regex::new(r#""([^"]*)""#).map_err(|e| Error::Config(format!("failed to build settings regex '{}'", e)))?;
        let mut lines = text.lines();

        let mut values = Vec::with_capacity(SETTINGS_LINES.len());
        for (index, field) in SETTINGS_LINES.iter().enumerate() {
            let line = lines
                .next()
                .ok_or_else(|| Error::Config(format!("line {} ({}) is missing", index + 1, field)))?;
            let value = quoted
                .captures(line)
                .and_then(|captures| captures.get(1))
                .ok_or_else(|| Error::Config(format!("line {} ({}) has no quoted value", index + 1, field)))?;
            values.push(value.as_str().to_string());
        }

        let [name, password, period, student_id, teacher, term]: [String; 6] = values
            .try_into()
            .map_err(|_| Error::Config(String::from("expected six settings")))?;

        let name = decode_form_value(&name).map_err(|e| Error::Config(format!("failed to decode name: {}", e)))?;

        Ok(Self { name, password, period, student_id, teacher, term })
    }

    /// The portal endpoint of this student's teacher and term
    pub fn endpoint(&self) -> Result<Endpoint, Error> {
        Endpoint::new(URL::BASE, &self.teacher, &self.term)
    }
}

/// The single `pages.py` URL every request goes to
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Endpoint {
    url: Url,
}

impl Endpoint {
    pub fn new(base: &str, teacher: &str, term: &str) -> Result<Self, Error> {
        let raw = format!("{}/{}/{}/{}", base.trim_end_matches('/'), teacher, term, URL::PAGES);
        let url = Url::parse(&raw).map_err(|e| Error::Config(format!("failed to build endpoint '{}': {}", raw, e)))?;
        Ok(Self { url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Resolves a link from a portal page against the directory of the endpoint
    /// <br> Absolute links are returned as they are
    pub fn resolve(&self, link: &str) -> Result<Url, Error> {
        self.url
            .join(link)
            .map_err(|e| Error::Parsing(format!("failed to resolve link '{}': {}", link, e)))
    }
}
