use std::io::{self, IsTerminal, Write};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

/// Resolves the password for account commands: the flag value when given,
/// otherwise a hidden prompt on the terminal. Registration prompts twice.
pub(super) fn resolve_password(flag: Option<String>, confirm: bool) -> Result<String> {
    if let Some(password) = flag {
        return Ok(password);
    }
    if !io::stdin().is_terminal() {
        anyhow::bail!("no terminal to prompt on (pass `--password`)");
    }

    let password = read_hidden("Password: ")?;
    if confirm {
        let again = read_hidden("Confirm password: ")?;
        if password != again {
            anyhow::bail!("passwords do not match");
        }
    }
    Ok(password)
}

fn read_hidden(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush().context("flush prompt")?;

    enable_raw_mode().context("enable raw mode")?;
    let entered = read_line_raw();
    disable_raw_mode().ok();
    println!();

    entered
}

fn read_line_raw() -> Result<String> {
    let mut out = String::new();
    loop {
        match event::read().context("read event")? {
            Event::Key(k) if k.kind == KeyEventKind::Press => match k.code {
                KeyCode::Enter => break,
                KeyCode::Backspace => {
                    out.pop();
                }
                KeyCode::Char('c') if k.modifiers.contains(KeyModifiers::CONTROL) => {
                    anyhow::bail!("cancelled");
                }
                KeyCode::Char(c) => out.push(c),
                _ => {}
            },
            _ => {}
        }
    }
    Ok(out)
}
