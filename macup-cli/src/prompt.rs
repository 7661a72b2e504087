//! Terminal selection prompt.
//!
//! Lists the catalog with the saved selection marked, then reads one line:
//! numbers and/or names separated by commas or spaces, `all`, or nothing to
//! keep the saved selection.

use std::io::{BufRead, Write};

use macup_core::Config;
use macup_runner::{SelectionError, SelectionReason, SelectionSource};

pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> SelectionSource for TerminalPrompt<R, W> {
    fn select(
        &mut self,
        config: &Config,
        available: &[&'static str],
        reason: SelectionReason,
    ) -> Result<Vec<String>, SelectionError> {
        let out = &mut self.output;
        if reason == SelectionReason::NoPreviousSelection {
            writeln!(out, "No previous updates selected. Prompting for selection.")?;
        }
        writeln!(out, "Select updates to install:")?;
        for (i, name) in available.iter().enumerate() {
            let mark = if config.selected_updates.iter().any(|s| s == name) {
                "x"
            } else {
                " "
            };
            writeln!(out, "  [{mark}] {}. {name}", i + 1)?;
        }
        let keep_hint = if config.has_selection() {
            ", empty keeps [x]"
        } else {
            ""
        };
        write!(out, "Numbers or names, or 'all'{keep_hint}: ")?;
        out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(SelectionError::InputClosed);
        }
        parse_selection(&line, available, &config.selected_updates)
    }
}

/// Used with `--non-interactive`: there is never anyone to ask.
pub struct NonInteractive;

impl SelectionSource for NonInteractive {
    fn select(
        &mut self,
        _config: &Config,
        _available: &[&'static str],
        _reason: SelectionReason,
    ) -> Result<Vec<String>, SelectionError> {
        Err(SelectionError::NothingToReuse)
    }
}

/// Resolve one line of prompt input to task names, in the order typed.
pub fn parse_selection(
    line: &str,
    available: &[&'static str],
    previous: &[String],
) -> Result<Vec<String>, SelectionError> {
    let tokens: Vec<&str> = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.is_empty() {
        return Ok(previous.to_vec());
    }
    if tokens.len() == 1 && tokens[0].eq_ignore_ascii_case("all") {
        return Ok(available.iter().map(|n| n.to_string()).collect());
    }

    let mut selected: Vec<String> = Vec::new();
    for token in tokens {
        let name = match token.parse::<usize>() {
            Ok(n) if (1..=available.len()).contains(&n) => available[n - 1],
            Ok(_) => return Err(SelectionError::Invalid(token.to_string())),
            Err(_) => available
                .iter()
                .find(|a| a.eq_ignore_ascii_case(token))
                .copied()
                .ok_or_else(|| SelectionError::Invalid(token.to_string()))?,
        };
        if !selected.iter().any(|s| s == name) {
            selected.push(name.to_string());
        }
    }
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;

    const AVAILABLE: [&str; 7] = [
        "Homebrew", "VSCode", "Gem", "Node", "Cargo", "AppStore", "MacOS",
    ];

    #[test]
    fn numbers_and_names_mix() {
        let got = parse_selection("1, vscode 7\n", &AVAILABLE, &[]).unwrap();
        assert_eq!(got, vec!["Homebrew", "VSCode", "MacOS"]);
    }

    #[test]
    fn repeated_entries_collapse() {
        let got = parse_selection("2 2 VSCode", &AVAILABLE, &[]).unwrap();
        assert_eq!(got, vec!["VSCode"]);
    }

    #[test]
    fn empty_line_keeps_previous() {
        let previous = vec!["Gem".to_string(), "Cargo".to_string()];
        let got = parse_selection("   \n", &AVAILABLE, &previous).unwrap();
        assert_eq!(got, previous);
    }

    #[test]
    fn all_selects_catalog_order() {
        let got = parse_selection("ALL\n", &AVAILABLE, &[]).unwrap();
        assert_eq!(got.len(), 7);
        assert_eq!(got[0], "Homebrew");
    }

    #[test]
    fn out_of_range_and_unknown_are_rejected() {
        assert!(matches!(
            parse_selection("0", &AVAILABLE, &[]),
            Err(SelectionError::Invalid(t)) if t == "0"
        ));
        assert!(matches!(
            parse_selection("8", &AVAILABLE, &[]),
            Err(SelectionError::Invalid(_))
        ));
        assert!(matches!(
            parse_selection("1 pip", &AVAILABLE, &[]),
            Err(SelectionError::Invalid(t)) if t == "pip"
        ));
    }

    #[test]
    fn prompt_marks_saved_selection_and_reads_answer() {
        let mut out = Vec::new();
        let mut prompt = TerminalPrompt::new("3\n".as_bytes(), &mut out);
        let config = Config::with_selection(["VSCode"]);

        let got = prompt
            .select(&config, &AVAILABLE, SelectionReason::Requested)
            .unwrap();

        assert_eq!(got, vec!["Gem"]);
        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("  [x] 2. VSCode"));
        assert!(shown.contains("  [ ] 1. Homebrew"));
        assert!(!shown.contains("No previous updates selected"));
    }

    #[test]
    fn prompt_explains_fallback_from_yes() {
        let mut out = Vec::new();
        let mut prompt = TerminalPrompt::new("all\n".as_bytes(), &mut out);
        prompt
            .select(&Config::default(), &AVAILABLE, SelectionReason::NoPreviousSelection)
            .unwrap();
        let shown = String::from_utf8(out).unwrap();
        assert!(shown.starts_with("No previous updates selected. Prompting for selection."));
    }

    #[test]
    fn closed_input_is_an_error() {
        let mut prompt = TerminalPrompt::new("".as_bytes(), Vec::new());
        assert!(matches!(
            prompt.select(&Config::default(), &AVAILABLE, SelectionReason::Requested),
            Err(SelectionError::InputClosed)
        ));
    }

    #[test]
    fn non_interactive_never_selects() {
        assert!(matches!(
            NonInteractive.select(&Config::default(), &AVAILABLE, SelectionReason::NoPreviousSelection),
            Err(SelectionError::NothingToReuse)
        ));
    }
}
