//! Read commands, drive the shell, print the screen.

use std::io::{self, BufRead, Write};

use log::debug;
use patient_chart_core::api::PatientApi;
use patient_chart_core::app::AppShell;
use patient_chart_core::views::render_patient_card;

use crate::commands::{parse_command, Command, HELP};

const PROMPT: &str = "> ";

/// Whether the loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Run until `quit` or end of input.
pub fn run<R, W>(shell: &mut AppShell, api: &dyn PatientApi, input: R, out: &mut W) -> io::Result<()>
where
    R: BufRead,
    W: Write,
{
    write!(out, "{}", PROMPT)?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        let flow = match parse_command(&line) {
            Ok(Some(command)) => execute(shell, api, command, out)?,
            Ok(None) => Flow::Continue,
            Err(e) => {
                writeln!(out, "error: {}", e)?;
                Flow::Continue
            }
        };
        if flow == Flow::Quit {
            return Ok(());
        }
        write!(out, "{}", PROMPT)?;
        out.flush()?;
    }
    Ok(())
}

/// Apply one command and print what changed.
pub fn execute<W: Write>(
    shell: &mut AppShell,
    api: &dyn PatientApi,
    command: Command,
    out: &mut W,
) -> io::Result<Flow> {
    debug!("command: {:?}", command);

    match command {
        Command::Tab(tab) => {
            shell.select_tab(tab);
            write!(out, "{}", shell.render())?;
        }
        Command::Set(field, value) => {
            shell.form_mut().set(field, value);
            write!(out, "{}", shell.render())?;
        }
        Command::Submit => {
            if let Err(e) = shell.submit_form(api) {
                writeln!(out, "error: {}", e)?;
            }
            write!(out, "{}", shell.render())?;
        }
        Command::Show(patient_id) => match shell.refresh_patient(api, &patient_id) {
            Ok(()) => {
                if let Some(patient) = shell.state().find(&patient_id) {
                    write!(out, "{}", render_patient_card(patient))?;
                }
            }
            Err(e) => writeln!(out, "error: {}", e)?,
        },
        Command::Record { patient_id, record } => {
            if let Err(e) = shell.add_record(api, &patient_id, &record) {
                writeln!(out, "error: {}", e)?;
            }
            write!(out, "{}", shell.render())?;
        }
        Command::Help => write!(out, "{}", HELP)?,
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}
