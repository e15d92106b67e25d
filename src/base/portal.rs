use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Ways in which the portal refuses a request while still answering with a page
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
pub enum Rejection {
    PageNotFound,
    InvalidCredentials,
    InvalidPeriod,
}

impl Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::PageNotFound => write!(f, "Page not found"),
            Rejection::InvalidCredentials => write!(f, "Invalid credentials"),
            Rejection::InvalidPeriod => write!(f, "Invalid period"),
        }
    }
}

#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum PageStatus {
    Ok,
    Rejected(Rejection),
    /// The school filter answered instead of the portal
    Blocked,
}

const NOT_FOUND: &str = "not found";
const INCORRECT_PASSWORD: &str = "Incorrect password";
const UNKNOWN_CLASS: &str = "Cannot find class";
const BLOCKED: &str = "Access to this site is blocked";

/// Classifies a page returned by the portal. The checks run in a fixed order, the first match wins
pub fn classify(html: &str) -> PageStatus {
    if let Some(rejection) = rejection(html) {
        PageStatus::Rejected(rejection)
    } else if html.contains(BLOCKED) {
        PageStatus::Blocked
    } else {
        PageStatus::Ok
    }
}

/// Only the rejection part of [classify]
pub fn rejection(html: &str) -> Option<Rejection> {
    if html.contains(NOT_FOUND) {
        Some(Rejection::PageNotFound)
    } else if html.contains(INCORRECT_PASSWORD) {
        Some(Rejection::InvalidCredentials)
    } else if html.contains(UNKNOWN_CLASS) {
        Some(Rejection::InvalidPeriod)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_sentinels() {
        assert_eq!(classify("<html>404 not found</html>"), PageStatus::Rejected(Rejection::PageNotFound));
        assert_eq!(classify("<p>Incorrect password for Jane Doe</p>"), PageStatus::Rejected(Rejection::InvalidCredentials));
        assert_eq!(classify("<p>Cannot find class 4</p>"), PageStatus::Rejected(Rejection::InvalidPeriod));
        assert_eq!(classify("<h1>Access to this site is blocked</h1>"), PageStatus::Blocked);
        assert_eq!(classify("<select><option>Lab 1 (due: 3/4/16 8p)</option></select>"), PageStatus::Ok);
    }

    #[test]
    fn rejections_take_precedence_over_block() {
        assert_eq!(
            classify("Access to this site is blocked. Incorrect password"),
            PageStatus::Rejected(Rejection::InvalidCredentials)
        );
        assert_eq!(classify("not found / Cannot find class"), PageStatus::Rejected(Rejection::PageNotFound));
    }

    #[test]
    fn sentinels_are_case_sensitive() {
        assert_eq!(classify("incorrect PASSWORD"), PageStatus::Ok);
    }
}
