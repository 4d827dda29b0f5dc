use std::fmt;

use anyhow::Result;
use inquire::{InquireError, Select, Text};
use weather_core::TemperatureUnit;

use crate::{cli::Controller, render};

#[derive(Debug, Clone)]
enum Action {
    Search,
    Recent(String),
    ToggleUnit(TemperatureUnit),
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Search => f.write_str("Search a city"),
            Action::Recent(city) => write!(f, "Recent: {city}"),
            Action::ToggleUnit(current) => write!(f, "Switch to {}", current.toggled()),
            Action::Quit => f.write_str("Quit"),
        }
    }
}

fn actions(ctl: &Controller) -> Vec<Action> {
    let mut items = vec![Action::Search];
    items.extend(ctl.history().entries().iter().cloned().map(Action::Recent));
    items.push(Action::ToggleUnit(ctl.unit()));
    items.push(Action::Quit);
    items
}

/// Menu loop until the user quits or cancels a prompt with Esc / Ctrl-C.
pub async fn run(ctl: &mut Controller) -> Result<()> {
    loop {
        let action = match Select::new("What next?", actions(ctl)).prompt() {
            Ok(action) => action,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err.into()),
        };

        match action {
            Action::Search => {
                let input = match Text::new("City:")
                    .with_placeholder("Enter city name...")
                    .prompt()
                {
                    Ok(input) => input,
                    Err(InquireError::OperationCanceled) => continue,
                    Err(InquireError::OperationInterrupted) => break,
                    Err(err) => return Err(err.into()),
                };
                if !input.trim().is_empty() {
                    println!("Loading...");
                }
                ctl.set_query(input);
                ctl.submit_query().await;
            }
            Action::Recent(city) => {
                println!("Loading...");
                ctl.select_recent(&city).await;
            }
            Action::ToggleUnit(_) => {
                let unit = ctl.toggle_unit();
                println!("Temperature unit: {unit}");
            }
            Action::Quit => break,
        }

        show(ctl);
    }

    Ok(())
}

/// Error banner (if any) above the current result panel.
fn show(ctl: &Controller) {
    if let Some(message) = ctl.error() {
        eprintln!("Error: {message}");
    }

    if let Some(record) = ctl.record() {
        println!();
        print!("{}", render::RecordPanel::new(record, ctl.unit()));
        println!();
    }
}
