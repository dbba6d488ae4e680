use std::io::{self, Write};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Define(String),
    Save,
    Saved,
    /// Zero based index into the audio items.
    Play(usize),
    Theme,
    Help,
    Quit,
    Unknown(String),
    Empty,
}

pub fn prompt(prompt: &str) -> io::Result<()> {
    print!("{prompt}");
    io::stdout().flush()
}

/// Anything that isn't a known command is searched for as is.
pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let mut command_parts = line.split_ascii_whitespace();
    let Some(command) = command_parts.next() else {
        return Command::Empty;
    };
    let rest = command_parts.collect::<Vec<&str>>().join(" ");
    match command {
        "exit" | "quit" | "e" | "q" => Command::Quit,
        "define" | "find" => Command::Define(rest),
        "save" if rest.is_empty() => Command::Save,
        "saved" if rest.is_empty() => Command::Saved,
        "theme" if rest.is_empty() => Command::Theme,
        "help" | "?" if rest.is_empty() => Command::Help,
        "play" if rest.is_empty() => Command::Play(0),
        "play" => match rest.parse::<usize>() {
            Ok(number) if number >= 1 => Command::Play(number - 1),
            _ => Command::Unknown(line.to_owned()),
        },
        _ => Command::Define(line.to_owned()),
    }
}
