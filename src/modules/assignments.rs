use std::collections::BTreeMap;
use std::fmt::Display;

use chrono::{Local, NaiveDateTime};
use log::debug;
use scraper::{Html, Selector};

use crate::utils::datetime::{lateness_at, parse_due_date};
use crate::Error;

/// Title → [Assignment] of every assignment the portal offers for submission
pub type Assignments = BTreeMap<String, Assignment>;

/// The due date starts this many characters after the start of `" ("` (`" (due: "`)
const DUE_DATE_OFFSET: usize = 7;

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct Assignment {
    pub title: String,
    /// The due date as the portal shows it (e.g. `3/4/16 8p`)
    pub due: String,
    pub due_at: NaiveDateTime,
    /// `"- Late"` if the deadline has passed, empty otherwise
    pub lateness: &'static str,
}

impl Assignment {
    pub fn is_late(&self) -> bool {
        !self.lateness.is_empty()
    }

    /// Splits the text of an `<option>` (`"<title> (due: <date>)"`) and checks the due date against `now`
    pub fn from_option(text: &str, now: &NaiveDateTime) -> Result<Self, Error> {
        let start = text
            .find(" (")
            .ok_or_else(|| Error::Parsing(format!("assignment '{}' has no due date", text)))?;
        let title = text[..start].to_string();

        let due = text
            .get(start + DUE_DATE_OFFSET..)
            .ok_or_else(|| Error::Parsing(format!("assignment '{}' has no due date", text)))?
            .trim_matches(')')
            .to_string();

        let due_at = parse_due_date(&due)?;
        let lateness = lateness_at(&due_at, now);

        Ok(Self { title, due, due_at, lateness })
    }
}

/// Display value next to the title: `"<date> <marker>"`
impl Display for Assignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.due, self.lateness)
    }
}

/// Parses the `submit_homework2` page, lateness is decided against the current local time
pub fn parse_assignments(html: &str) -> Result<Assignments, Error> {
    parse_assignments_at(html, &Local::now().naive_local())
}

pub fn parse_assignments_at(html: &str, now: &NaiveDateTime) -> Result<Assignments, Error> {
    let document = Html::parse_document(html);
    let option_selector = Selector::parse("option").unwrap();

    let options = document
        .select(&option_selector)
        .map(|option| option.text().collect::<String>())
        .collect::<Vec<String>>();

    if options.is_empty() {
        return Err(Error::EmptyResult(String::from("Could not fetch assignments")));
    }
    debug!("found {} assignments", options.len());

    let mut assignments = Assignments::new();
    for option in options {
        let assignment = Assignment::from_option(&option, now)?;
        assignments.insert(assignment.title.clone(), assignment);
    }

    Ok(assignments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::constants::LATE_MARKER;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2016, 3, 10).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    const PAGE: &str = r#"
        <html><body><form>
            <select name="assignmentid">
                <option value="12">Recursion (due: 3/14/16 8a)</option>
                <option value="10">Arrays (due: 3/2/16 11:59p)</option>
                <option value="11">Loops (due: 3/10/16 12p)</option>
            </select>
        </form></body></html>
    "#;

    #[test]
    fn parses_and_sorts_by_title() {
        let assignments = parse_assignments_at(PAGE, &now()).unwrap();
        assert_eq!(assignments.keys().collect::<Vec<_>>(), vec!["Arrays", "Loops", "Recursion"]);
    }

    #[test]
    fn marks_late_assignments() {
        let assignments = parse_assignments_at(PAGE, &now()).unwrap();

        assert_eq!(assignments["Arrays"].due, "3/2/16 11:59p");
        assert!(assignments["Arrays"].is_late());
        assert_eq!(assignments["Arrays"].to_string(), format!("3/2/16 11:59p {}", LATE_MARKER));

        // due exactly now
        assert!(!assignments["Loops"].is_late());
        assert_eq!(assignments["Recursion"].to_string(), "3/14/16 8a ");
    }

    #[test]
    fn no_options_is_an_empty_result() {
        let result = parse_assignments_at("<html><body><select></select></body></html>", &now());
        assert!(matches!(result, Err(Error::EmptyResult(_))));
    }

    #[test]
    fn malformed_due_date_fails() {
        let result = parse_assignments_at("<option>Essay (due: someday)</option>", &now());
        assert!(matches!(result, Err(Error::DateTime(_))));
    }

    #[test]
    fn option_without_due_date_fails() {
        let result = parse_assignments_at("<option>Essay</option>", &now());
        assert!(matches!(result, Err(Error::Parsing(_))));
    }

    #[test]
    fn title_stops_at_first_parenthesis() {
        let error = Assignment::from_option("Lab (part 2) (due: 3/4/16 8p)", &now()).unwrap_err();
        // the text after the first " (" is not a date
        assert!(matches!(error, Error::DateTime(_)));

        let assignment = Assignment::from_option("Lab 2 (due: 3/4/16 8p)", &now()).unwrap();
        assert_eq!(assignment.title, "Lab 2");
        assert_eq!(assignment.due, "3/4/16 8p");
    }
}
