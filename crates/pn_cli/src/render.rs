use anyhow::Result;
use pn_notes::{DecryptedNote, Note, NoteBody};
use pn_store::NoteRecord;
use serde::Serialize;

const SEALED: &str = "[encrypted]";

pub fn records(notes: Vec<Note>) -> Vec<NoteRecord> {
    notes.into_iter().map(NoteRecord::from).collect()
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_list(notes: &[Note]) {
    if notes.is_empty() {
        println!("No notes.");
        return;
    }
    for note in notes {
        println!(
            "{}  {}  {}{}",
            note.id,
            note.updated_at.format("%Y-%m-%d %H:%M"),
            note.plain_title().unwrap_or(SEALED),
            tag_suffix(&note.tags),
        );
    }
}

pub fn print_tags(tags: &[String]) {
    if tags.is_empty() {
        println!("No tags.");
        return;
    }
    for tag in tags {
        println!("{tag}");
    }
}

pub fn print_note(note: &Note) {
    let (title, content) = match &note.body {
        NoteBody::Plain { title, content } => (title.as_str(), content.as_str()),
        NoteBody::Encrypted { .. } => (SEALED, SEALED),
    };
    print_fields(&note.id, title, content, &note.tags);
}

pub fn print_decrypted(note: &DecryptedNote) {
    print_fields(&note.id, &note.title, &note.content, &note.tags);
}

fn print_fields(id: &str, title: &str, content: &str, tags: &[String]) {
    println!("id:    {id}");
    println!("title: {title}");
    if !tags.is_empty() {
        println!("tags:  {}", tags.join(", "));
    }
    println!();
    println!("{content}");
}

fn tag_suffix(tags: &[String]) -> String {
    if tags.is_empty() {
        String::new()
    } else {
        format!("  [{}]", tags.join(", "))
    }
}
