//! The interactive submit and view flows

use std::collections::BTreeMap;
use std::path::Path;

use dialoguer::{Confirm, Input};
use log::debug;

use crate::base::session::Session;
use crate::modules::assignments::parse_assignments;
use crate::modules::homework::parse_submitted;
use crate::utils::constants::Page;
use crate::Error;

/// Where the view flow keeps a file while showing it
const SCRATCH_FILE: &str = "homeworkserver";

/// Looks `input` up in `choices`, falling back to the key with a leading zero (so `6` finds `06`)
pub fn resolve_choice<V>(input: &str, choices: &BTreeMap<String, V>) -> Option<String> {
    let input = input.trim();
    if choices.contains_key(input) {
        return Some(input.to_string());
    }

    let padded = format!("0{}", input);
    choices.contains_key(&padded).then_some(padded)
}

/// The file name a link is saved under (its last path segment)
pub fn download_name(link: &str) -> String {
    let path = link.split(|c| c == '?' || c == '#').next().unwrap_or_default();
    match path.rsplit('/').next() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => String::from("homework"),
    }
}

/// Runs a blocking prompt off the runtime thread so the interrupt handler stays responsive
async fn prompt<T, F>(ask: F) -> Result<T, Error>
where
    F: FnOnce() -> dialoguer::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(ask)
        .await
        .map_err(|e| Error::InvalidInput(format!("prompt failed '{}'", e)))?
        .map_err(answer_error)
}

/// Ctrl-C in a prompt arrives as an interrupted read, not as a signal, because the terminal is in raw mode
fn answer_error(e: dialoguer::Error) -> Error {
    match e {
        dialoguer::Error::IO(e) if e.kind() == std::io::ErrorKind::Interrupted => Error::Interrupted,
        e => Error::InvalidInput(format!("failed to read answer '{}'", e)),
    }
}

async fn choose<V>(question: &'static str, choices: &BTreeMap<String, V>) -> Result<String, Error> {
    loop {
        let input = prompt(move || Input::<String>::new().with_prompt(question).interact_text()).await?;
        match resolve_choice(&input, choices) {
            Some(choice) => return Ok(choice),
            None => println!("Invalid choice"),
        }
    }
}

/// Lists the open assignments, lets the student pick one and submits the file at `path` for it
pub async fn submit_homework(session: &mut Session, path: &Path) -> Result<(), Error> {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Err(Error::FileSystem(format!("'{}' does not exist", path.display())));
    }

    let page = session.fetch(Page::SubmitHomework).await?;
    let assignments = parse_assignments(&page)?;

    for (title, assignment) in &assignments {
        println!("[{}] {}", title, assignment);
    }

    let assignment_id = choose("Please select a homework to submit", &assignments).await?;

    let wants_comment = prompt(|| {
        Confirm::new()
            .with_prompt("Would you like to write a comment to the teacher?")
            .default(false)
            .interact()
    })
    .await?;
    let comment = match wants_comment {
        true => Some(
            prompt(|| {
                Input::<String>::new()
                    .with_prompt("Please enter your comment")
                    .allow_empty(true)
                    .interact_text()
            })
            .await?,
        ),
        false => None,
    };

    session.submit(&assignment_id, path, comment.as_deref()).await?;
    println!("Homework successfully submitted");
    Ok(())
}

/// Lists the submitted homework, shows the chosen file and optionally saves a copy in the working directory
pub async fn view_homework(session: &mut Session) -> Result<(), Error> {
    let page = session.fetch(Page::HomeworkView).await?;
    let homework = parse_submitted(&page);
    if homework.is_empty() {
        return Err(Error::EmptyResult(String::from("Could not fetch homeworks")));
    }

    for (label, link) in &homework {
        println!("[{}]: {}", label, link);
    }

    let label = choose("Which homework would you like to view?", &homework).await?;
    let link = homework[&label].as_str();

    let scratch = std::env::temp_dir().join(SCRATCH_FILE);
    let result = show_and_keep(session, link, &scratch).await;
    if let Err(e) = tokio::fs::remove_file(&scratch).await {
        debug!("failed to remove '{}': {}", scratch.display(), e);
    }
    result
}

async fn show_and_keep(session: &Session, link: &str, scratch: &Path) -> Result<(), Error> {
    session.download(link, scratch).await?;
    let contents = tokio::fs::read(scratch)
        .await
        .map_err(|e| Error::FileSystem(format!("failed to read '{}' with error '{}'", scratch.display(), e)))?;
    println!("{}", String::from_utf8_lossy(&contents));

    let keep = prompt(|| {
        Confirm::new()
            .with_prompt("Would you like to download this file?")
            .default(false)
            .interact()
    })
    .await?;
    if keep {
        let name = download_name(link);
        session.download(link, Path::new(&name)).await?;
        println!("File downloaded as {}", name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choices(keys: &[&str]) -> BTreeMap<String, String> {
        keys.iter().map(|key| (key.to_string(), format!("hw/{}.py", key))).collect()
    }

    #[test]
    fn exact_choice_wins() {
        let homework = choices(&["06", "6"]);
        assert_eq!(resolve_choice("6", &homework), Some(String::from("6")));
        assert_eq!(resolve_choice(" 06\n", &homework), Some(String::from("06")));
    }

    #[test]
    fn falls_back_to_leading_zero() {
        let homework = choices(&["05", "06", "10"]);
        assert_eq!(resolve_choice("6", &homework), Some(String::from("06")));
        assert_eq!(resolve_choice("10", &homework), Some(String::from("10")));
    }

    #[test]
    fn unknown_choice_is_none() {
        let homework = choices(&["06"]);
        assert_eq!(resolve_choice("7", &homework), None);
        assert_eq!(resolve_choice("006", &homework), None);
        assert_eq!(resolve_choice("", &homework), None);
    }

    #[test]
    fn download_names() {
        assert_eq!(download_name("hw/jdoe_06.py"), "jdoe_06.py");
        assert_eq!(download_name("http://bert.stuy.edu/dholmes/hw/a.txt?x=1"), "a.txt");
        assert_eq!(download_name("06.txt"), "06.txt");
        assert_eq!(download_name("hw/"), "homework");
    }

    #[test]
    fn ctrl_c_in_prompt_is_an_interrupt() {
        let error = dialoguer::Error::IO(std::io::Error::from(std::io::ErrorKind::Interrupted));
        assert_eq!(answer_error(error), Error::Interrupted);
    }

    #[test]
    fn other_prompt_failures_are_invalid_input() {
        let error = dialoguer::Error::IO(std::io::Error::from(std::io::ErrorKind::UnexpectedEof));
        assert!(matches!(answer_error(error), Error::InvalidInput(_)));
    }
}
