//! Line commands accepted by the terminal front end.

use patient_chart_core::app::{Tab, UnknownTab};
use patient_chart_core::models::NewRecord;
use patient_chart_core::views::{FormField, UnknownField};
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  view                          show the patient list
  add                           show the add-patient form
  set <name|age|gender> [text]  edit a form field (no text clears it)
  submit                        submit the add-patient form
  show <patient_id>             re-read one patient and print its card
  record <patient_id> symptoms=<text> [bp=<text>] [temp=<text>] [key=<text>...]
                                attach a medical record
  help                          this text
  quit                          exit
";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Tab(Tab),
    Set(FormField, String),
    Submit,
    Show(String),
    Record { patient_id: String, record: NewRecord },
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error(transparent)]
    Field(#[from] UnknownField),

    #[error(transparent)]
    Tab(#[from] UnknownTab),

    #[error("a record needs symptoms=<text>")]
    MissingSymptoms,
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "view" | "add" => Command::Tab(word.parse()?),
        "tab" => Command::Tab(rest.parse()?),
        "set" => {
            if rest.is_empty() {
                return Err(CommandError::Usage("set <name|age|gender> [text]"));
            }
            let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            Command::Set(field.parse()?, value.trim().to_string())
        }
        "submit" => Command::Submit,
        "show" => {
            if rest.is_empty() {
                return Err(CommandError::Usage("show <patient_id>"));
            }
            Command::Show(rest.to_string())
        }
        "record" => parse_record(rest)?,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

/// `<patient_id> key=value ...`; a word without `=` continues the previous
/// value, so `symptoms=sore throat` keeps both words.
fn parse_record(rest: &str) -> Result<Command, CommandError> {
    let mut words = rest.split_whitespace();
    let patient_id = words
        .next()
        .ok_or(CommandError::Usage("record <patient_id> symptoms=<text>"))?
        .to_string();

    let mut pairs: Vec<(String, String)> = Vec::new();
    for word in words {
        match word.split_once('=') {
            Some((key, value)) => pairs.push((key.to_lowercase(), value.to_string())),
            None => match pairs.last_mut() {
                Some((_, value)) => {
                    value.push(' ');
                    value.push_str(word);
                }
                None => return Err(CommandError::Usage("record <patient_id> symptoms=<text>")),
            },
        }
    }

    let mut record = NewRecord::default();
    for (key, value) in pairs {
        match key.as_str() {
            "symptoms" => record.symptoms = value,
            "bp" => record.bp = Some(value),
            "temp" => record.temp = Some(value),
            _ => {
                record.extra_info.insert(key, value);
            }
        }
    }

    if record.symptoms.trim().is_empty() {
        return Err(CommandError::MissingSymptoms);
    }
    Ok(Command::Record { patient_id, record })
}
