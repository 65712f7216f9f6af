//! Text rendering for listings, rolls, and errors.

use std::fmt::Write;

use dicebag_foundation::format_modifier;
use dicebag_storage::{Collection, Die, Registry, RollBreakdown, RollOutcome, Rollable};

use crate::command::HELP;
use crate::session::{Failure, Response};

/// Faces shown before a die listing is elided.
pub const FACE_PRINT_CAP: usize = 25;

const RESET: &str = "\x1b[0m";
const RED: &str = "\x1b[31m";
const SUBTOTAL: &str = "\x1b[30;46m";
const TOTAL: &str = "\x1b[1;30;46m";

fn paint(text: &str, style: &str, color: bool) -> String {
    if color {
        format!("{style}{text}{RESET}")
    } else {
        text.to_string()
    }
}

/// Formats a modifier in parentheses: `(+2)`.
#[must_use]
pub fn modifier(value: i64) -> String {
    format!("({})", format_modifier(value))
}

/// Renders a die as `name (+m) f1 f2 ...`.
///
/// Past [`FACE_PRINT_CAP`] faces the listing stops and ends with
/// `... <last face>`.
#[must_use]
pub fn die(die: &Die) -> String {
    let mut out = format!("{} {}", die.name(), modifier(die.modifier()));
    for face in die.faces().iter().take(FACE_PRINT_CAP) {
        let _ = write!(out, " {face}");
    }
    if die.faces().len() > FACE_PRINT_CAP {
        if let Some(last) = die.faces().last() {
            let _ = write!(out, "... {last}");
        }
    }
    out
}

/// Renders a collection and, recursively, its members.
///
/// Direct dice are listed first, one tab deeper than the collection's
/// header; nested collections follow, each indented one level further.
#[must_use]
pub fn collection(registry: &Registry, collection: &Collection) -> String {
    let mut out = String::new();
    collection_into(&mut out, registry, collection, 1);
    out.truncate(out.trim_end_matches('\n').len());
    out
}

fn collection_into(out: &mut String, registry: &Registry, collection: &Collection, depth: usize) {
    let indent = "\t".repeat(depth);
    let _ = writeln!(out, "{} {}:", collection.name(), modifier(collection.modifier()));

    let members: Vec<&Rollable> = collection
        .contents()
        .iter()
        .filter_map(|name| registry.lookup(name))
        .collect();

    for member in &members {
        if let Rollable::Die(d) = member {
            let _ = writeln!(out, "{indent}{}", die(d));
        }
    }
    for member in &members {
        if let Rollable::Collection(c) = member {
            out.push_str(&indent);
            collection_into(out, registry, c, depth + 1);
        }
    }
}

/// Renders any entity.
#[must_use]
pub fn rollable(registry: &Registry, object: &Rollable) -> String {
    match object {
        Rollable::Die(d) => die(d),
        Rollable::Collection(c) => collection(registry, c),
    }
}

/// Renders every entity in creation order, separated by blank lines.
#[must_use]
pub fn registry(registry: &Registry) -> String {
    if registry.is_empty() {
        return "No objects".to_string();
    }
    registry
        .iter()
        .map(|object| rollable(registry, object))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Renders a list of stored file names.
#[must_use]
pub fn files(names: &[String]) -> String {
    if names.is_empty() {
        "No saved files".to_string()
    } else {
        names.join("\n")
    }
}

/// Renders a collection breakdown, one entry per line.
///
/// Parts are tab-indented; subtotals stand out, and the closing total
/// stands out more.
#[must_use]
pub fn breakdown(breakdown: &RollBreakdown, color: bool) -> String {
    let last = breakdown.len().saturating_sub(1);
    breakdown
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            if entry.is_subtotal {
                let style = if i == last { TOTAL } else { SUBTOTAL };
                paint(&entry.to_string(), style, color)
            } else {
                format!("\t{entry}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders a roll result; a die roll is just its value.
#[must_use]
pub fn roll(outcome: &RollOutcome, color: bool) -> String {
    match outcome {
        RollOutcome::Die { value, .. } => value.to_string(),
        RollOutcome::Collection(b) => breakdown(b, color),
    }
}

/// Renders a failed step and, if steps were skipped, the abort notice.
#[must_use]
pub fn failure(failure: &Failure, color: bool) -> String {
    let mut out = paint(&format!("Error - {}", failure.error), RED, color);
    if failure.skipped > 0 {
        let _ = write!(
            out,
            "\n{}",
            paint(
                &format!(
                    "Remaining command sequence aborted - '{}' execution failed",
                    failure.step
                ),
                RED,
                color
            )
        );
    }
    out
}

/// Renders a step's response; `None` for steps that print nothing.
#[must_use]
pub fn response(response: &Response, color: bool) -> Option<String> {
    match response {
        Response::Done => None,
        Response::Text(text) => Some(text.clone()),
        Response::Roll(outcome) => Some(roll(outcome, color)),
        Response::Total(total) => Some(total.to_string()),
        Response::Files(names) => Some(files(names)),
        Response::Help => Some(HELP.to_string()),
    }
}
