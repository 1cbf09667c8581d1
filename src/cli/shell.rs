//! Interactive shell
//!
//! Keeps one [`Session`] alive across commands so the Preview and Remix
//! buffers behave like the panes of the desktop tool. Store failures are
//! printed and control returns to the prompt; failing to write output ends
//! the shell.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::cli::commands::capitalize;
use crate::error::NarrativeError;
use crate::state::{BufferId, Category, Clipboard, ExportOutcome, Session};
use crate::state::session::DEFAULT_EXPORT_FILE;

/// One line of shell input.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    action: ShellAction,
}

#[derive(Subcommand, Debug)]
enum ShellAction {
    /// Open a project
    Open { name: String },
    /// Close the current project
    Close,
    /// List projects
    Projects,
    /// Create a project and open it
    NewProject { name: String },
    /// Rename a project
    RenameProject { old: String, new: String },
    /// Delete a project and all of its resources
    DeleteProject {
        name: String,
        #[arg(short, long)]
        yes: bool,
    },
    /// List resources of the open project
    List { category: Option<Category> },
    /// Create a resource; content is the rest of the line
    Add {
        category: Category,
        name: String,
        #[arg(trailing_var_arg = true)]
        content: Vec<String>,
    },
    /// Load a resource into the preview
    Select { category: Category, name: String },
    /// Print the preview
    Preview,
    /// Save new content to the previewed resource
    Update {
        #[arg(trailing_var_arg = true, required = true)]
        content: Vec<String>,
    },
    /// Rename a resource
    Rename {
        category: Category,
        old: String,
        new: String,
    },
    /// Delete a resource
    Delete {
        category: Category,
        name: String,
        #[arg(short, long)]
        yes: bool,
    },
    /// Append a resource to the remix
    Append { category: Category, name: String },
    /// Print the remix
    Remix,
    /// Empty the remix
    ClearRemix,
    /// Write the remix to a file
    Export { path: Option<PathBuf> },
    /// Copy a buffer (preview or remix) to the clipboard
    Copy { buffer: BufferId },
    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

/// Split a line into words, keeping double-quoted runs together.
pub fn split_words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_word = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                has_word = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_word {
                    words.push(std::mem::take(&mut current));
                    has_word = false;
                }
            }
            c => {
                current.push(c);
                has_word = true;
            }
        }
    }
    if has_word {
        words.push(current);
    }
    words
}

enum Flow {
    Continue,
    Quit,
}

/// Run the shell until `quit` or end of input.
pub fn run_shell<R: BufRead, W: Write>(
    session: &mut Session,
    input: R,
    out: &mut W,
    clipboard: &mut dyn Clipboard,
) -> anyhow::Result<()> {
    writeln!(out, "Narrative shell. Type 'help' for commands.")?;
    prompt(session, out)?;

    for line in input.lines() {
        let line = line.context("reading shell input")?;
        let words = split_words(&line);
        if words.is_empty() {
            prompt(session, out)?;
            continue;
        }

        match ShellLine::try_parse_from(words) {
            Ok(parsed) => match execute(session, parsed.action, out, clipboard) {
                Ok(Flow::Quit) => return Ok(()),
                Ok(Flow::Continue) => {}
                Err(e) => {
                    let e = e.downcast::<NarrativeError>()?;
                    writeln!(out, "Error: {}", e)?;
                    if let Some(hint) = e.recovery_suggestion() {
                        writeln!(out, "  {}", hint)?;
                    }
                }
            },
            Err(e) => write!(out, "{}", e)?,
        }
        prompt(session, out)?;
    }
    Ok(())
}

fn prompt<W: Write>(session: &Session, out: &mut W) -> anyhow::Result<()> {
    match session.active_project() {
        Some(project) => write!(out, "{}> ", project.name)?,
        None => write!(out, "> ")?,
    }
    out.flush()?;
    Ok(())
}

fn execute<W: Write>(
    session: &mut Session,
    action: ShellAction,
    out: &mut W,
    clipboard: &mut dyn Clipboard,
) -> anyhow::Result<Flow> {
    macro_rules! say {
        ($($arg:tt)*) => {
            writeln!(out, $($arg)*)?
        };
    }

    match action {
        ShellAction::Open { name } => {
            let project = session.open_project(&name)?;
            say!("Opened '{}'.", project.name);
        }
        ShellAction::Close => session.close_project(),
        ShellAction::Projects => {
            for name in session.list_projects()? {
                say!("{}", name);
            }
        }
        ShellAction::NewProject { name } => {
            let project = session.create_project(&name)?;
            say!("Project '{}' created.", project.name);
        }
        ShellAction::RenameProject { old, new } => {
            let project = session.rename_project(&old, &new)?;
            say!("Project '{}' renamed to '{}'.", old.trim(), project.name);
        }
        ShellAction::DeleteProject { name, yes } => {
            if !yes {
                say!("Pass --yes to delete the project '{}'.", name.trim());
                return Ok(Flow::Continue);
            }
            let report = session.delete_project(&name)?;
            say!(
                "Project '{}' deleted ({} resources removed).",
                report.name,
                report.resources_removed
            );
        }
        ShellAction::List { category } => {
            let categories = match category {
                Some(category) => vec![category],
                None => Category::ALL.to_vec(),
            };
            for category in categories {
                say!("{}:", category.title());
                for name in session.list_resources(category)? {
                    say!("  {}", name);
                }
            }
        }
        ShellAction::Add {
            category,
            name,
            content,
        } => {
            session.create_resource(category, &name, content.join(" ").trim())?;
            say!("{} '{}' created.", capitalize(category.singular()), name.trim());
        }
        ShellAction::Select { category, name } => {
            let text = session.select_resource(category, &name)?;
            say!("{}", text);
        }
        ShellAction::Preview => match session.preview().staged() {
            Some(staged) => {
                say!("[{} / {}]", staged.category.title(), staged.name);
                say!("{}", session.preview().text());
            }
            None => {
                say!("Preview is empty.");
            }
        },
        ShellAction::Update { content } => {
            session.update_resource(content.join(" ").trim())?;
            say!("Resource content updated successfully.");
        }
        ShellAction::Rename { category, old, new } => {
            session.rename_resource(category, &old, &new)?;
            say!("Renamed '{}' to '{}'.", old.trim(), new.trim());
        }
        ShellAction::Delete {
            category,
            name,
            yes,
        } => {
            if !yes {
                say!(
                    "Pass --yes to delete the {} '{}'.",
                    category.singular(),
                    name.trim()
                );
                return Ok(Flow::Continue);
            }
            session.delete_resource(category, &name)?;
            say!("{} '{}' deleted.", capitalize(category.singular()), name.trim());
        }
        ShellAction::Append { category, name } => {
            session.append_to_remix(category, &name)?;
            say!("Appended '{}' to remix.", name.trim());
        }
        ShellAction::Remix => {
            write!(out, "{}", session.remix().text())?;
        }
        ShellAction::ClearRemix => {
            session.remix_mut().clear();
            say!("Remix cleared.");
        }
        ShellAction::Export { path } => {
            let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILE));
            match session.export_remix(&path)? {
                ExportOutcome::Empty => {
                    say!("Remix is empty. Nothing to export.");
                }
                ExportOutcome::Written { path, bytes } => {
                    say!("Exported {} bytes to '{}'.", bytes, path.display());
                }
            }
        }
        ShellAction::Copy { buffer } => {
            session.copy_to_clipboard(buffer, clipboard)?;
            say!("Content copied to clipboard!");
        }
        ShellAction::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}
