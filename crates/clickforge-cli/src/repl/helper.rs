//! rustyline helper providing completion, hints and highlighting.

use std::borrow::Cow::{self, Borrowed, Owned};

use clickforge_core::ParamField;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use strum::IntoEnumIterator;

use super::command::COMMANDS;

#[derive(Clone, Default)]
pub struct StudioHelper;

impl StudioHelper {
    /// Candidates for the word ending at the end of `line`, with its start offset.
    fn candidates(line: &str) -> (usize, Vec<String>) {
        let word_start = line.rfind(char::is_whitespace).map_or(0, |i| i + 1);
        let word = &line[word_start..];
        let previous: Vec<&str> = line[..word_start].split_whitespace().collect();

        let pool: Vec<String> = match previous.as_slice() {
            [] => COMMANDS.iter().map(|(name, _, _)| name.to_string()).collect(),
            ["set"] => ParamField::iter().map(|field| field.to_string()).collect(),
            ["set", field] => field
                .parse::<ParamField>()
                .map(|field| field.presets().iter().map(|p| p.to_string()).collect())
                .unwrap_or_default(),
            ["ratio"] => ParamField::Ratio.presets().iter().map(|p| p.to_string()).collect(),
            ["viral"] => vec!["on".into(), "off".into()],
            ["reference"] => vec!["clear".into()],
            _ => Vec::new(),
        };

        let lowered = word.to_ascii_lowercase();
        let matches = pool
            .into_iter()
            .filter(|candidate| candidate.to_ascii_lowercase().starts_with(&lowered))
            .collect();
        (word_start, matches)
    }
}

impl Helper for StudioHelper {}

impl Completer for StudioHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, matches) = Self::candidates(&line[..pos]);
        let pairs = matches
            .into_iter()
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: candidate,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Highlighter for StudioHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let name = line.split_whitespace().next().unwrap_or_default();
        if COMMANDS.iter().any(|(command, _, _)| *command == name) {
            Owned(line.replacen(name, &name.bright_cyan().to_string(), 1))
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for StudioHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if line.is_empty() {
            return None;
        }

        if !line.contains(' ') {
            return COMMANDS
                .iter()
                .find(|(name, _, _)| name.starts_with(line) && name.len() > line.len())
                .map(|(name, _, _)| name[line.len()..].to_string());
        }

        // After "<command> " show the remaining usage
        let name = line.strip_suffix(' ')?;
        COMMANDS
            .iter()
            .find(|(command, _, _)| *command == name)
            .and_then(|(_, usage, _)| usage.strip_prefix(name))
            .map(|args| args.trim_start().to_string())
            .filter(|args| !args.is_empty())
    }
}

impl Validator for StudioHelper {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completes_command_names() {
        let (start, matches) = StudioHelper::candidates("cl");
        assert_eq!(start, 0);
        assert_eq!(matches, vec!["close", "clear-vault"]);
    }

    #[test]
    fn test_completes_fields_and_presets() {
        let (start, fields) = StudioHelper::candidates("set li");
        assert_eq!(start, 4);
        assert_eq!(fields, vec!["lighting"]);

        let (_, presets) = StudioHelper::candidates("set style ");
        assert!(presets.contains(&"Gritty".to_string()));

        let (_, ratios) = StudioHelper::candidates("ratio 9");
        assert_eq!(ratios, vec!["9:16"]);
    }

    #[test]
    fn test_no_candidates_for_free_text() {
        let (_, matches) = StudioHelper::candidates("topic Scaling a");
        assert!(matches.is_empty());
    }
}
