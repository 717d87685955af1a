//! Numbered stdin menus implementing the engine's interaction boundary.

use crate::display::{self, paint, GREY, RED};
use retag_core::{Interaction, Result, RetagError, SongTags};
use std::io::{self, BufRead, Write};

/// Plain terminal menus: numbered items on stdout, answers on stdin.
///
/// An empty line or `q` declines a question, which the engine maps to
/// "go back" or "abort" depending on context.
#[derive(Debug, Default)]
pub struct TermMenu;

impl TermMenu {
    /// Create a new menu front end
    pub fn new() -> Self {
        Self
    }
}

fn interaction_failed(err: &io::Error) -> RetagError {
    RetagError::interaction(format!("terminal unavailable: {err}"))
}

fn read_line() -> Result<String> {
    let mut buffer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut buffer)
        .map_err(|err| interaction_failed(&err))?;
    Ok(buffer.trim().to_string())
}

fn prompt() -> Result<String> {
    print!("> ");
    io::stdout().flush().map_err(|err| interaction_failed(&err))?;
    read_line()
}

fn print_items(title: &str, items: &[String]) {
    println!("\n{title}");
    for (index, item) in items.iter().enumerate() {
        println!("  [{}] {item}", index + 1);
    }
}

/// Parse a comma-separated list of 1-based indices.
///
/// Returns `None` when anything is out of range or not a number; an empty
/// line is a deliberate empty selection.
fn parse_selection(line: &str, item_count: usize) -> Option<Vec<usize>> {
    if line.is_empty() {
        return Some(Vec::new());
    }
    line.split(',')
        .map(|part| match part.trim().parse::<usize>() {
            Ok(number) if (1..=item_count).contains(&number) => Some(number - 1),
            _ => None,
        })
        .collect()
}

impl Interaction for TermMenu {
    fn choose_one(&mut self, title: &str, items: &[String]) -> Result<Option<usize>> {
        print_items(title, items);
        loop {
            let line = prompt()?;
            if line.is_empty() || line.eq_ignore_ascii_case("q") {
                return Ok(None);
            }
            match line.parse::<usize>() {
                Ok(number) if (1..=items.len()).contains(&number) => {
                    return Ok(Some(number - 1));
                }
                _ => println!("{}", paint("Invalid choice, try again", RED)),
            }
        }
    }

    fn choose_many(&mut self, title: &str, items: &[String]) -> Result<Option<Vec<usize>>> {
        print_items(title, items);
        println!(
            "{}",
            paint("Numbers separated by commas, empty for none, q to cancel", GREY)
        );
        let line = prompt()?;
        if line.eq_ignore_ascii_case("q") {
            return Ok(None);
        }
        Ok(parse_selection(&line, items.len()))
    }

    fn prompt_text(&mut self, label: &str) -> Result<String> {
        print!("{label}: ");
        io::stdout().flush().map_err(|err| interaction_failed(&err))?;
        read_line()
    }

    fn show_text(&mut self, text: &str) {
        println!("{text}");
    }

    fn show_tags(&mut self, tags: &SongTags) {
        display::print_sources(tags);
    }
}
