//! Terminal presentation of a [`DisplayModel`].

use crate::render::{DisplayModel, EntryView, Panel, ThemeIcon};

const WELCOME: &str = "Type a word to look it up, or 'help' for the list of commands.";
const HELP: &str = "\
Commands:
    define <word> | <word>   look a word up
    save                     save the displayed word
    saved                    list saved words
    play [n]                 play the n-th pronunciation
    theme                    toggle dark mode
    quit                     leave";

pub fn help() -> &'static str {
    HELP
}

pub fn draw(model: &DisplayModel) {
    println!("{}", format_model(model));
}

pub fn format_model(model: &DisplayModel) -> String {
    let mut lines = Vec::new();
    let icon = match model.theme.icon() {
        ThemeIcon::Sun => "☀",
        ThemeIcon::Moon => "☾",
    };
    lines.push(format!("{icon} [{}]", model.search.label));
    if let Some(notice) = &model.notice {
        lines.push(format!("! {notice}"));
    }
    match &model.panel {
        Panel::Welcome => lines.push(WELCOME.to_owned()),
        Panel::Loading => lines.push("Loading...".to_owned()),
        Panel::Error(message) => lines.push(format!("Error: {message}")),
        Panel::Entry(view) => format_entry(view, &mut lines),
    }
    if let Some(saved) = &model.saved_words {
        lines.push(format!("Saved words: {}", saved.join(", ")));
    }
    lines.join("\n")
}

fn format_entry(view: &EntryView, lines: &mut Vec<String>) {
    let marker = if view.highlighted { "★ " } else { "" };
    match &view.phonetic {
        Some(phonetic) => lines.push(format!("{marker}{} {phonetic}", view.title)),
        None => lines.push(format!("{marker}{}", view.title)),
    }
    lines.push(format!(
        "    [{}]{}",
        view.save_button.label,
        if view.save_button.enabled { " (type 'save')" } else { "" }
    ));
    if let Some(audio) = &view.audio {
        for (index, button) in audio.iter().enumerate() {
            lines.push(format!("    ♪ {}: {} (play {})", index + 1, button.label, index + 1));
        }
    }
    for meaning in &view.meanings {
        lines.push(format!("    {}:", meaning.part_of_speech));
        if let Some(definitions) = &meaning.definitions {
            lines.push("      Definitions:".to_owned());
            for definition in definitions {
                lines.push(format!("        • {}", definition.text));
                if let Some(example) = &definition.example {
                    lines.push(format!("          Example: \"{example}\""));
                }
            }
        }
        if let Some(synonyms) = &meaning.synonyms {
            lines.push(format!("      Synonyms: {}", synonyms.join(", ")));
        }
        if let Some(antonyms) = &meaning.antonyms {
            lines.push(format!("      Antonyms: {}", antonyms.join(", ")));
        }
    }
    if let Some(sources) = &view.sources {
        lines.push("    Source:".to_owned());
        for source in sources {
            lines.push(format!("      {}", source.url));
        }
    }
}
