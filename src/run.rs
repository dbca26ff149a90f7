use anyhow::Result;
use std::io::{self, BufRead, Write};

use crate::db::Database;
use crate::error::TasError;
use crate::ops;

/// The commands requested by one invocation. Flags combine freely; execution
/// order is fixed: add, create_user, default_user, view, delete.
#[derive(Debug, Default)]
pub(crate) struct Invocation {
    add: Option<String>,
    category: Option<String>,
    create_user: Option<Option<String>>,
    default_user: bool,
    view: bool,
    delete: bool,
}

pub(crate) fn as_cli(args: &[String], db: &Database) -> Result<()> {
    let Some(inv) = parse(&args[1..])? else {
        return Ok(());
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();
    run_invocation(db, &inv, &mut input, &mut out)
}

/// Run the requested commands in the fixed order. A command's failure is
/// reported and does not stop later commands; the store stays consistent
/// because every write is a single committed statement.
fn run_invocation(
    db: &Database,
    inv: &Invocation,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<()> {
    if let Some(content) = &inv.add {
        match ops::add_note(db, content, inv.category.as_deref()) {
            Ok(note) => writeln!(out, "Added note {}: {}", note.id.unwrap_or(0), note.content)?,
            Err(e) => {
                if matches!(e.downcast_ref::<TasError>(), Some(TasError::UnknownCategory(_))) {
                    if let Ok(cats) = db.get_categories() {
                        let names: Vec<String> = cats.iter().map(|c| c.to_string()).collect();
                        eprintln!("Known categories: {}", names.join(", "));
                    }
                }
                report(&e);
            }
        }
    }

    if let Some(candidate) = &inv.create_user {
        match ops::create_user(db, candidate.as_deref(), input, out) {
            Ok(user) => writeln!(out, "Created user '{}'", user.username)?,
            Err(e) => report(&e),
        }
    }

    if inv.default_user {
        match ops::default_user(db, input, out) {
            Ok(Some(user)) => writeln!(out, "Default user: {}", user.username)?,
            Ok(None) => {}
            Err(e) => report(&e),
        }
    }

    if inv.view {
        if let Err(e) = ops::view(db, out) {
            report(&e);
        }
    }

    if inv.delete {
        if let Err(e) = ops::delete(db, input, out) {
            report(&e);
        }
    }

    Ok(())
}

fn report(err: &anyhow::Error) {
    eprintln!("error: {err:#}");
}

/// Hand-rolled flag parsing; `Ok(None)` means help/version was printed and
/// no commands should run.
fn parse(args: &[String]) -> Result<Option<Invocation>> {
    let mut inv = Invocation::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--add" | "-a" => {
                i += 1;
                match args.get(i) {
                    Some(text) => inv.add = Some(text.clone()),
                    None => {
                        print_usage();
                        anyhow::bail!("--add requires <text>");
                    }
                }
            }
            "--category" => {
                i += 1;
                match args.get(i) {
                    Some(name) => inv.category = Some(name.clone()),
                    None => {
                        print_usage();
                        anyhow::bail!("--category requires <name>");
                    }
                }
            }
            "--create_user" => {
                // Optional value: the next arg, unless it is another flag.
                if let Some(name) = args.get(i + 1).filter(|a| !a.starts_with('-')) {
                    inv.create_user = Some(Some(name.clone()));
                    i += 1;
                } else {
                    inv.create_user = Some(None);
                }
            }
            "--default_user" => inv.default_user = true,
            "--view" | "-v" => inv.view = true,
            "--delete" | "-d" => inv.delete = true,
            "--help" | "-h" | "help" => {
                print_usage();
                return Ok(None);
            }
            "--version" | "-V" | "version" => {
                println!("tas {}", env!("CARGO_PKG_VERSION"));
                return Ok(None);
            }
            other => {
                print_usage();
                anyhow::bail!("Unknown flag: {other}");
            }
        }
        i += 1;
    }

    if inv.category.is_some() && inv.add.is_none() {
        anyhow::bail!("--category requires --add");
    }

    Ok(Some(inv))
}

fn print_usage() {
    println!("tas — local-only note and task tracker");
    println!();
    println!("Usage: tas [flags]");
    println!();
    println!("Flags (combine freely; run in the order add, create_user, default_user, view, delete):");
    println!("  --add <text>, -a <text>       Add a note for the default user");
    println!("    --category <name>           Category for the note (default: idea)");
    println!("  --create_user [name]          Create a user; omitted name prompts for one");
    println!("  --default_user                List users and pick the default user");
    println!("  --view, -v                    List open notes");
    println!("  --delete, -d                  List open notes and mark one done");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}
