use std::io::{BufRead, Write};

use anyhow::Result;

use crate::db::Database;
use crate::error::TasError;
use crate::models::{Category, Note, OpenNote, User};

/// Write `msg` as a prompt and read one trimmed line from `input`.
/// EOF means no interactive channel is available.
fn prompt(input: &mut dyn BufRead, out: &mut dyn Write, msg: &str) -> Result<String> {
    write!(out, "{msg}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(TasError::InputRequired.into());
    }
    Ok(line.trim().to_string())
}

/// Create a user. A candidate name is confirmed first; declining falls
/// through to the interactive name prompt instead of aborting.
pub(crate) fn create_user(
    db: &Database,
    candidate: Option<&str>,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<User> {
    let mut candidate = candidate.map(str::to_string);
    let username = loop {
        match candidate.take() {
            Some(name) => {
                let answer = prompt(input, out, &format!("Create user '{name}'? [Y/n] "))?;
                if answer.is_empty() || answer.eq_ignore_ascii_case("y") {
                    break name;
                }
            }
            None => {
                let name = prompt(input, out, "Username: ")?;
                if !name.is_empty() {
                    break name;
                }
            }
        }
    };

    let mut user = User::new(username);
    user.id = Some(db.insert_user(&user)?);
    Ok(user)
}

/// List the user roster and persist the picked id as the default user.
/// Returns `Ok(None)` when there are no users yet.
pub(crate) fn default_user(
    db: &Database,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<Option<User>> {
    let users = db.get_users()?;
    if users.is_empty() {
        writeln!(out, "No users yet. Use --create_user to add one.")?;
        return Ok(None);
    }

    writeln!(out, "{:<4} {:<16} Created", "ID", "Username")?;
    writeln!(out, "{}", "-".repeat(32))?;
    for user in &users {
        writeln!(
            out,
            "{:<4} {:<16} {}",
            user.id.unwrap_or(0),
            user.username,
            user.created_date(),
        )?;
    }

    let ids: Vec<String> = users
        .iter()
        .filter_map(|u| u.id)
        .map(|id| id.to_string())
        .collect();
    let raw = prompt(input, out, &format!("Default user [{}]: ", ids.join(", ")))?;
    let id: i64 = raw.parse().map_err(|_| TasError::InvalidId(raw.clone()))?;
    // Validate before persisting; the raw upsert accepts anything.
    let user = users
        .into_iter()
        .find(|u| u.id == Some(id))
        .ok_or(TasError::UnknownUser(id))?;

    db.set_default_user(id)?;
    Ok(Some(user))
}

/// Add a note attributed to the default user. Without a category name the
/// seeded category is used directly; an unresolvable name writes nothing.
pub(crate) fn add_note(
    db: &Database,
    content: &str,
    category_name: Option<&str>,
) -> Result<Note> {
    let user_id = db.get_default_user_id()?.ok_or(TasError::NoDefaultUser)?;
    if db.get_user_by_id(user_id)?.is_none() {
        return Err(TasError::UnknownUser(user_id).into());
    }

    let category_id = match category_name {
        None => Category::SEED_ID,
        Some(name) => db
            .get_category_by_name(name)?
            .and_then(|c| c.id)
            .ok_or_else(|| TasError::UnknownCategory(name.to_string()))?,
    };

    let mut note = Note::new(user_id, category_id, content.to_string());
    note.id = Some(db.insert_note(&note)?);
    Ok(note)
}

pub(crate) fn view(db: &Database, out: &mut dyn Write) -> Result<()> {
    let notes = db.get_open_notes()?;
    write_note_table(out, &notes)?;
    Ok(())
}

fn write_note_table(out: &mut dyn Write, notes: &[OpenNote]) -> Result<()> {
    writeln!(out, "{:<4} {:<12} {:<10} Content", "ID", "User", "Category")?;
    writeln!(out, "{}", "-".repeat(50))?;
    for note in notes {
        writeln!(
            out,
            "{:<4} {:<12} {:<10} {}",
            note.id, note.username, note.category, note.content,
        )?;
    }
    Ok(())
}

/// List open notes, prompt for an id, mark it done. Soft delete: the row
/// stays, `is_done` flips.
pub(crate) fn delete(
    db: &Database,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<i64> {
    view(db, out)?;
    let raw = prompt(input, out, "Note id: ")?;
    let id: i64 = raw.parse().map_err(|_| TasError::InvalidId(raw.clone()))?;
    db.complete_note(id)?;
    writeln!(out, "Marked note {id} done")?;
    Ok(id)
}
