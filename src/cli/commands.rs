//! CLI Command Implementations
//!
//! Each one-shot command builds a fresh [`Session`], performs one operation
//! and prints the result.

use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::Path;

use log::{info, warn};

use crate::cli::ContentSource;
use crate::error::{NarrativeError, Result};
use crate::state::{
    BufferId, Category, Clipboard, ExportOutcome, MemoryClipboard, Session, SystemClipboard,
};

/// Resolve resource text from `--content`, `--file`, or stdin.
///
/// Surrounding whitespace is trimmed, as a text widget would leave it.
pub fn read_content(source: &ContentSource) -> Result<String> {
    let raw = match (&source.content, &source.file) {
        (Some(content), _) => content.clone(),
        (None, Some(path)) => {
            fs::read_to_string(path).map_err(|e| NarrativeError::io("read", path, e))?
        }
        (None, None) => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| NarrativeError::io("read", "<stdin>", e))?;
            buf
        }
    };
    Ok(raw.trim().to_string())
}

/// Ask a yes/no question on stdin. Anything but `y`/`yes` is a no.
pub fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout()
        .flush()
        .map_err(|e| NarrativeError::io("write", "<stdout>", e))?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|e| NarrativeError::io("read", "<stdin>", e))?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Platform clipboard, or an in-memory stand-in when none is available.
pub fn open_clipboard() -> Box<dyn Clipboard> {
    match SystemClipboard::new() {
        Ok(clipboard) => Box::new(clipboard),
        Err(e) => {
            warn!("System clipboard unavailable ({}), copies stay in memory", e);
            Box::new(MemoryClipboard::new())
        }
    }
}

/// Split a `category/name` remix item.
pub fn parse_item(item: &str) -> Result<(Category, &str)> {
    let (category, name) = item.split_once('/').ok_or_else(|| NarrativeError::InvalidInput {
        what: "remix item",
        name: item.to_string(),
        reason: "expected category/name",
    })?;
    Ok((category.parse()?, name))
}

pub fn list_projects(session: &Session) -> Result<()> {
    let projects = session.list_projects()?;
    if projects.is_empty() {
        println!("No projects in {}.", session.store().root().display());
    }
    for name in projects {
        println!("{}", name);
    }
    Ok(())
}

pub fn create_project(session: &mut Session, name: &str) -> Result<()> {
    let project = session.create_project(name)?;
    println!("Project '{}' created.", project.name);
    Ok(())
}

pub fn rename_project(session: &mut Session, old: &str, new: &str) -> Result<()> {
    let project = session.rename_project(old, new)?;
    println!("Project '{}' renamed to '{}'.", old.trim(), project.name);
    Ok(())
}

/// Delete a project once `confirm` agrees. Returns whether it was deleted.
pub fn delete_project(
    session: &mut Session,
    name: &str,
    confirm: impl FnOnce(&str) -> Result<bool>,
) -> Result<bool> {
    if !confirm(&format!("Are you sure you want to delete the project '{}'?", name.trim()))? {
        println!("Cancelled.");
        return Ok(false);
    }

    let report = session.delete_project(name)?;
    println!(
        "Project '{}' deleted ({} resources removed).",
        report.name, report.resources_removed
    );
    Ok(true)
}

/// Print resource names grouped by category; every category when `only` is unset.
pub fn list_resources(
    session: &mut Session,
    project: &str,
    only: Option<Category>,
) -> Result<Vec<(Category, Vec<String>)>> {
    session.open_project(project)?;

    let categories = match only {
        Some(category) => vec![category],
        None => Category::ALL.to_vec(),
    };
    let mut listing = Vec::with_capacity(categories.len());
    for category in categories {
        let names = session.list_resources(category)?;
        println!("{}:", category.title());
        for name in &names {
            println!("  {}", name);
        }
        listing.push((category, names));
    }
    Ok(listing)
}

pub fn add_resource(
    session: &mut Session,
    project: &str,
    category: Category,
    name: &str,
    source: &ContentSource,
) -> Result<()> {
    session.open_project(project)?;
    let content = read_content(source)?;
    session.create_resource(category, name, &content)?;
    println!("{} '{}' created.", capitalize(category.singular()), name.trim());
    Ok(())
}

pub fn show_resource(session: &mut Session, project: &str, category: Category, name: &str) -> Result<()> {
    session.open_project(project)?;
    let content = session.select_resource(category, name)?;
    println!("{}", content);
    Ok(())
}

pub fn update_resource(
    session: &mut Session,
    project: &str,
    category: Category,
    name: &str,
    source: &ContentSource,
) -> Result<()> {
    session.open_project(project)?;
    session.select_resource(category, name)?;
    let content = read_content(source)?;
    session.update_resource(&content)?;
    println!("Resource content updated successfully.");
    Ok(())
}

pub fn rename_resource(
    session: &mut Session,
    project: &str,
    category: Category,
    old: &str,
    new: &str,
) -> Result<()> {
    session.open_project(project)?;
    session.rename_resource(category, old, new)?;
    println!(
        "{} '{}' renamed to '{}'.",
        capitalize(category.singular()),
        old.trim(),
        new.trim()
    );
    Ok(())
}

pub fn delete_resource(
    session: &mut Session,
    project: &str,
    category: Category,
    name: &str,
    confirm: impl FnOnce(&str) -> Result<bool>,
) -> Result<bool> {
    session.open_project(project)?;
    let question = format!(
        "Are you sure you want to delete the {} '{}'?",
        category.singular(),
        name.trim()
    );
    if !confirm(&question)? {
        println!("Cancelled.");
        return Ok(false);
    }

    session.delete_resource(category, name)?;
    println!("{} '{}' deleted.", capitalize(category.singular()), name.trim());
    Ok(true)
}

/// Build a remix from `category/name` items. The result goes to `output`,
/// to `clipboard`, or to stdout when neither is given.
pub fn remix(
    session: &mut Session,
    project: &str,
    items: &[String],
    output: Option<&Path>,
    clipboard: Option<&mut dyn Clipboard>,
) -> Result<()> {
    session.open_project(project)?;
    for item in items {
        let (category, name) = parse_item(item)?;
        session.append_to_remix(category, name)?;
    }
    info!("Remixed {} resources from '{}'", items.len(), project);

    let copied = match clipboard {
        Some(clipboard) => {
            session.copy_to_clipboard(BufferId::Remix, clipboard)?;
            println!("Content copied to clipboard!");
            true
        }
        None => false,
    };

    match output {
        Some(path) => report_export(session.export_remix(path)?),
        None if !copied => print!("{}", session.remix().text()),
        None => {}
    }
    Ok(())
}

/// Print the outcome of a remix export.
pub fn report_export(outcome: ExportOutcome) {
    match outcome {
        ExportOutcome::Empty => println!("Remix is empty. Nothing to export."),
        ExportOutcome::Written { path, bytes } => {
            println!("Exported {} bytes to '{}'.", bytes, path.display())
        }
    }
}

pub(crate) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
