//! Export and import of the symptom log.

use std::path::{Path, PathBuf};

use blossom_core::export;
use blossom_core::ExportFormat;

use super::{CmdResult, Store};

pub fn export(format: ExportFormat, output: Option<PathBuf>) -> CmdResult {
    let store = Store::open()?;
    let content = export::export(store.session.log.entries(), format)?;

    match output {
        Some(path) => {
            std::fs::write(&path, content)?;
            println!(
                "Exported {} entries to {}",
                store.session.log.len(),
                path.display()
            );
        }
        None => print!("{content}"),
    }
    Ok(())
}

pub fn import(path: &Path, format: Option<ExportFormat>) -> CmdResult {
    let format = match format {
        Some(format) => format,
        None => path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .parse::<ExportFormat>()?,
    };

    let content = std::fs::read_to_string(path)?;
    let entries = export::import(&content, format)?;
    let count = entries.len();

    let mut store = Store::open()?;
    for entry in entries {
        store.session.log.push(entry);
    }
    store.save()?;
    println!("Imported {count} entries from {}", path.display());
    Ok(())
}
