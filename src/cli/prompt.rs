use crate::{
    collector::{CollectorInfo, SearchResult},
    manifest::{ImportItem, PlaySourceGroup},
    pipeline::{Answer, EpisodeRange, MAX_INPUT_ATTEMPTS, Selector, ValidationError},
};
use std::io::{self, BufRead, StdinLock, Stdout, Write};

/// Episodes listed before the import confirmation
pub const PREVIEW_LIMIT: usize = 5;

/// Characters of the synopsis shown in the detail card
pub const SYNOPSIS_LIMIT: usize = 100;

const RULE_WIDTH: usize = 70;

/// Line based terminal UI
///
/// Reads answers from `input` and writes menus to `output`. End of input and
/// write failures are treated as the user cancelling.
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
    assume_yes: bool,
}

impl TerminalPrompter<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            assume_yes: false,
        }
    }

    /// Answer the final confirmation with yes without asking
    pub const fn assume_yes(mut self, assume_yes: bool) -> Self {
        self.assume_yes = assume_yes;
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Write a line of output
    pub fn say(&mut self, line: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.output, "{}", line.as_ref())
    }

    /// Print `prompt` and read one trimmed line, `None` at end of input
    pub fn ask(&mut self, prompt: &str) -> Option<String> {
        write!(self.output, "{prompt}").ok()?;
        self.output.flush().ok()?;

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }

    /// Ask with a default taken on empty input
    pub fn ask_with_default(&mut self, label: &str, default: &str) -> Option<String> {
        let answer = if default.is_empty() {
            self.ask(&format!("{label}: "))?
        } else {
            self.ask(&format!("{label} (default: {default}): "))?
        };

        Some(if answer.is_empty() {
            default.to_string()
        } else {
            answer
        })
    }

    /// Ask until a non-empty answer is given
    pub fn ask_required(&mut self, label: &str) -> Option<String> {
        for _ in 0..MAX_INPUT_ATTEMPTS {
            let answer = self.ask(&format!("{label}: "))?;
            if !answer.is_empty() {
                return Some(answer);
            }
            self.say(format!("{label} must not be empty")).ok()?;
        }
        None
    }

    /// Yes/no question defaulting to no
    pub fn ask_yes_no(&mut self, question: &str) -> Option<bool> {
        let answer = self.ask(&format!("{question} (y/N): "))?;
        Some(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
    }

    /// Ask once for a menu number; `0`, empty input and end of input cancel
    fn ask_number(&mut self, prompt: &str) -> Answer<usize> {
        let Some(answer) = self.ask(prompt) else {
            return Ok(None);
        };
        if answer.is_empty() || answer == "0" {
            return Ok(None);
        }
        answer
            .parse::<usize>()
            .map(Some)
            .map_err(|_| ValidationError::Malformed(answer))
    }

    pub fn show_collectors<'a>(
        &mut self,
        collectors: impl IntoIterator<Item = &'a CollectorInfo>,
    ) -> io::Result<()> {
        self.say("Available collectors:")?;
        for info in collectors {
            let marker = if info.custom { " (custom)" } else { "" };
            self.say(format!(
                "  [{}] {}{}  {}",
                info.id,
                info.name,
                marker,
                info.endpoint.primary()
            ))?;
        }
        Ok(())
    }

    fn show_results(&mut self, results: &[SearchResult]) -> io::Result<()> {
        self.say(format!("\nFound {} results:", results.len()))?;
        self.say("-".repeat(RULE_WIDTH))?;
        for (index, result) in results.iter().enumerate() {
            self.say(format!(
                "[{:>2}] {}  ({} | {})",
                index + 1,
                result.name(),
                result.category(),
                result.year()
            ))?;
        }
        self.say("-".repeat(RULE_WIDTH))
    }

    fn show_card(&mut self, result: &SearchResult, groups: &[PlaySourceGroup]) -> io::Result<()> {
        self.say(format!("\n{}", "=".repeat(RULE_WIDTH)))?;
        self.say(result.name())?;
        self.say("=".repeat(RULE_WIDTH))?;
        self.say(format!("Category: {}", result.category()))?;
        self.say(format!("Year:     {}", result.year()))?;
        self.say(format!("Region:   {}", result.area()))?;
        self.say(format!("Director: {}", result.director()))?;
        self.say(format!("Cast:     {}", result.actor()))?;
        self.say(format!("Synopsis: {}", synopsis(result.content())))?;

        self.say(format!("\nPlay sources ({}):", groups.len()))?;
        for (index, group) in groups.iter().enumerate() {
            self.say(format!(
                "  [{}] {} - {} episodes",
                index + 1,
                group.source,
                group.len()
            ))?;
        }
        Ok(())
    }

    fn show_preview(&mut self, items: &[ImportItem]) -> io::Result<()> {
        self.say(format!("\nReady to import {} episodes:", items.len()))?;
        for item in items.iter().take(PREVIEW_LIMIT) {
            self.say(format!("  - {}", item.name))?;
        }
        if items.len() > PREVIEW_LIMIT {
            self.say(format!("  ... {} more", items.len() - PREVIEW_LIMIT))?;
        }
        Ok(())
    }

    /// Offer a new name for every item, keeping the old one on empty input
    pub fn rename(&mut self, items: Vec<ImportItem>) -> Option<Vec<ImportItem>> {
        let mut renamed = Vec::with_capacity(items.len());
        for (index, mut item) in items.into_iter().enumerate() {
            let answer = self.ask(&format!(
                "  [{}] {} -> new name (enter to keep): ",
                index + 1,
                item.name
            ))?;
            if !answer.is_empty() {
                item.name = answer;
            }
            renamed.push(item);
        }
        Some(renamed)
    }
}

impl<R: BufRead, W: Write> Selector for TerminalPrompter<R, W> {
    fn choose_result(&mut self, results: &[SearchResult]) -> Answer<usize> {
        if self.show_results(results).is_err() {
            return Ok(None);
        }
        self.ask_number(&format!("Choose a result [1-{}] (0 to quit): ", results.len()))
    }

    fn show_detail(&mut self, result: &SearchResult, groups: &[PlaySourceGroup]) {
        let _ = self.show_card(result, groups);
    }

    fn choose_source(&mut self, groups: &[PlaySourceGroup]) -> Answer<usize> {
        self.ask_number(&format!("\nChoose a play source [1-{}]: ", groups.len()))
    }

    fn choose_range(&mut self, group: &PlaySourceGroup) -> Answer<EpisodeRange> {
        if self
            .say(format!("\n{} episodes in {}", group.len(), group.source))
            .is_err()
        {
            return Ok(None);
        }

        let prompt = format!(
            "Episodes to import (1-{}, 'all', or a range like '1-10'): ",
            group.len()
        );
        match self.ask(&prompt) {
            Some(answer) if !answer.is_empty() => answer.parse().map(Some),
            _ => Ok(None),
        }
    }

    fn confirm(&mut self, items: &[ImportItem]) -> bool {
        if self.show_preview(items).is_err() {
            return false;
        }
        if self.assume_yes {
            return true;
        }
        self.ask_yes_no(&format!("\nImport {} episodes into the room?", items.len()))
            .unwrap_or(false)
    }

    fn report_invalid(&mut self, error: &ValidationError) {
        let _ = self.say(format!("✗ {error}"));
    }
}

/// First `SYNOPSIS_LIMIT` characters of `content`, whitespace collapsed
fn synopsis(content: &str) -> String {
    let flat = content.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = flat.chars();
    let head: String = chars.by_ref().take(SYNOPSIS_LIMIT).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
