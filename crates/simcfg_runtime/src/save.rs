//! Delta save and the input report.
//!
//! A save does not re-dump the model. It writes a small file that includes
//! the original configuration and then replays only what changed during the
//! session:
//!
//! ```text
//! Include 'model.cfg'
//!
//! " *** Added Records ***
//! Define Server { S2 S3 }
//! S1 Speed { 5 }
//! S2 Tags { }
//! S2 Tags { { a } { b } }
//! ```
//!
//! Appendable inputs are reset before their value is written, so reloading
//! the file does not append twice. Changes that the loaded file already
//! carried in its own added-records section are covered by the `Include`
//! and are not written again.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use simcfg_foundation::literal::quote_if_needed;
use simcfg_foundation::{Error, Result, TypeId};
use simcfg_storage::{Entity, Model};

use crate::source::Location;

fn write_failed(target: &str) -> impl Fn(io::Error) -> Error + '_ {
    move |e| Error::io(format!("failed to write '{target}': {e}"))
}

fn keyword_line(entity: &str, keyword: &str, value: &str) -> String {
    if value.is_empty() {
        format!("{entity} {keyword} {{ }}")
    } else {
        format!("{entity} {keyword} {{ {value} }}")
    }
}

fn entity_name(entity: &Entity) -> String {
    quote_if_needed(&entity.qualified_name())
}

/// Writes the session delta.
///
/// `include` is the path written in the leading `Include` record.
///
/// # Errors
///
/// Returns an I/O error if writing fails.
pub fn write_delta(model: &Model, include: &str, marker: &str, out: &mut impl Write) -> Result<()> {
    let fail = write_failed(include);
    writeln!(out, "Include '{include}'").map_err(&fail)?;
    writeln!(out).map_err(&fail)?;
    writeln!(out, "{marker}").map_err(&fail)?;

    // Added entities, consecutive runs of one type in one block.
    let mut run: Option<(TypeId, Vec<String>)> = None;
    for entity in model.pending_added() {
        if let Some((type_id, names)) = &mut run {
            if *type_id == entity.type_id() {
                names.push(entity_name(entity));
                continue;
            }
        }
        if let Some((type_id, names)) = run.take() {
            write_define(model, type_id, &names, out).map_err(&fail)?;
        }
        run = Some((entity.type_id(), vec![entity_name(entity)]));
    }
    if let Some((type_id, names)) = run {
        write_define(model, type_id, &names, out).map_err(&fail)?;
    }

    for entity in model.pending_edited() {
        let name = entity_name(entity);
        for input in entity.pending_inputs() {
            if input.is_appendable() {
                writeln!(out, "{}", keyword_line(&name, input.keyword(), "")).map_err(&fail)?;
            }
            writeln!(out, "{}", keyword_line(&name, input.keyword(), input.value()))
                .map_err(&fail)?;
        }
    }
    Ok(())
}

fn write_define(model: &Model, type_id: TypeId, names: &[String], out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Define {} {{ {} }}", model.registry().name(type_id), names.join(" "))
}

/// Saves the session delta to `target`, including the root file.
///
/// The include path is the root's file name when both files share a
/// directory, and the full root location otherwise.
///
/// # Errors
///
/// Returns an I/O error if `target` is the root file itself or cannot be
/// written.
pub fn save_delta(model: &Model, root: &Location, target: &Path, marker: &str) -> Result<()> {
    if root.container().is_none() && same_file(root.path(), target) {
        return Err(Error::io(format!(
            "refusing to overwrite the original configuration '{root}'"
        )));
    }

    let include = match (root.container(), root.path().parent(), target.parent()) {
        (None, Some(a), Some(b)) if a == b => root.file_name(),
        _ => root.to_string(),
    };

    let shown = target.display().to_string();
    let file = File::create(target)
        .map_err(|e| Error::io(format!("failed to create '{shown}': {e}")))?;
    let mut writer = BufWriter::new(file);
    write_delta(model, &include, marker, &mut writer)?;
    writer.flush().map_err(write_failed(&shown))
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Writes every non-default value, grouped by entity type in registration
/// order.
///
/// # Errors
///
/// Returns an I/O error if writing fails.
pub fn write_report(model: &Model, out: &mut impl Write) -> Result<()> {
    let fail = write_failed("input report");
    for (type_id, entity_type) in model.registry().iter() {
        let mut header = false;
        for entity in model.entities().filter(|e| e.type_id() == type_id) {
            let name = entity_name(entity);
            for input in entity.inputs().iter().filter(|i| !i.is_default()) {
                if !header {
                    writeln!(out, "\" {}", entity_type.name()).map_err(&fail)?;
                    header = true;
                }
                writeln!(out, "{}", keyword_line(&name, input.keyword(), input.value()))
                    .map_err(&fail)?;
            }
        }
        if header {
            writeln!(out).map_err(&fail)?;
        }
    }
    Ok(())
}

/// Writes the input report to a file.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be written.
pub fn save_report(model: &Model, path: &Path) -> Result<()> {
    let shown = path.display().to_string();
    let file = File::create(path)
        .map_err(|e| Error::io(format!("failed to create '{shown}': {e}")))?;
    let mut writer = BufWriter::new(file);
    write_report(model, &mut writer)?;
    writer.flush().map_err(write_failed(&shown))
}
