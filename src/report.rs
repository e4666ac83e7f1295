//! Console rendering and JSON export of an [`Inventory`].

use crate::error::Result;
use crate::inventory::{Inventory, ViewSection};
use colored::Colorize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::info;

const UNSPECIFIED: &str = "Unspecified";

fn or_unspecified(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => UNSPECIFIED.red().to_string(),
    }
}

fn heading<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out, "{}", title.yellow())
}

fn warning<W: Write>(out: &mut W, label: &str, message: &str) -> io::Result<()> {
    writeln!(out, "{}: {}", label.magenta(), message.yellow())
}

fn sections<T, W, F>(out: &mut W, sections: &[ViewSection<T>], mut entry: F) -> io::Result<()>
where
    W: Write,
    F: FnMut(&mut W, &str, &T) -> io::Result<()>,
{
    for section in sections {
        let label = section.view.label();
        for item in &section.entries {
            entry(out, label, item)?;
            writeln!(out)?;
        }
        if let Some(message) = &section.warning {
            warning(out, label, message)?;
        }
    }
    Ok(())
}

/// Writes the human-readable report.
///
/// Coloring follows `colored`'s global override; call
/// `colored::control::set_override(false)` for plain text.
pub fn render<W: Write>(inventory: &Inventory, out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "{}",
        format!("Python on Windows Inventory v{}", crate::VERSION).cyan()
    )?;
    writeln!(out)?;

    heading(out, "Install Entries from 'Python Software Foundation'")?;
    sections(out, &inventory.uninstall, |out, label, e| {
        writeln!(
            out,
            "{}: {}",
            label.magenta(),
            or_unspecified(e.display_name.as_deref()).cyan()
        )?;
        writeln!(
            out,
            "{}: {}",
            "Installed at".bold(),
            or_unspecified(e.install_source.as_deref())
        )?;
        writeln!(out, "{}: {}", "Registry Key".bold(), e.registry_path)
    })?;
    writeln!(out)?;

    heading(out, "PythonCore entries via PEP 514 registry")?;
    sections(out, &inventory.pep514, |out, label, e| {
        writeln!(
            out,
            "{}: {}",
            label.magenta(),
            or_unspecified(e.display_name.as_deref())
        )?;
        writeln!(
            out,
            "{}: {}",
            "Installed At".bold(),
            or_unspecified(Some(e.install_path.as_str()))
        )?;
        writeln!(out, "{}: {}", "Registry Key".bold(), e.registry_path)
    })?;
    writeln!(out)?;

    heading(out, "Store packages from 'Python Software Foundation'")?;
    for package in &inventory.store.packages {
        writeln!(
            out,
            "{} ({} {})",
            package.display_name.cyan(),
            package.package_identifier,
            package.package_version
        )?;
    }
    if let Some(message) = &inventory.store.warning {
        warning(out, "Store", message)?;
    }
    writeln!(out)?;

    heading(out, "PATH entries with Python-named executables")?;
    for entry in &inventory.path {
        let status = if entry.exists {
            "path exists".green()
        } else {
            "path does not exist".red()
        };
        writeln!(out, "{} ({})", entry.directory.display(), status)?;
    }

    Ok(())
}

/// Writes the inventory as pretty-printed JSON.
pub fn export_json(inventory: &Inventory, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, inventory)?;
    writer.flush()?;
    info!(path = %path.display(), "Exported inventory");
    Ok(())
}

/// Final line pointing the user at the export.
pub fn render_export_notice<W: Write>(path: &Path, out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "{}",
        format!("Log file output to {}", path.display()).green()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::StoreSection;
    use crate::scan::{PathEntry, Pep514Entry, UninstallEntry};
    use crate::view::{Bitness, RegistryView};
    use std::path::PathBuf;

    fn inventory() -> Inventory {
        Inventory {
            generated_at: "2026-01-01T00:00:00+00:00".to_string(),
            uninstall: vec![ViewSection {
                view: RegistryView::local_machine(Bitness::Bits64),
                entries: vec![UninstallEntry {
                    display_name: Some("Python 3.12.1 (64-bit)".to_string()),
                    install_source: None,
                    registry_path: r"HKEY_LOCAL_MACHINE\SOFTWARE\x".to_string(),
                }],
                warning: None,
            }],
            pep514: vec![ViewSection {
                view: RegistryView::local_machine(Bitness::Bits32),
                entries: Vec::<Pep514Entry>::new(),
                warning: Some("SOFTWARE\\Python not present in Machine (x86) view".to_string()),
            }],
            store: StoreSection {
                packages: Vec::new(),
                warning: Some("Permission denied".to_string()),
            },
            path: vec![PathEntry {
                directory: PathBuf::from("Python312"),
                exists: false,
            }],
        }
    }

    #[test]
    fn test_render_plain() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        render(&inventory(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Machine (x64): Python 3.12.1 (64-bit)"));
        assert!(text.contains("Installed at: Unspecified"));
        assert!(text.contains(r"Registry Key: HKEY_LOCAL_MACHINE\SOFTWARE\x"));
        assert!(text.contains("Machine (x86): SOFTWARE\\Python not present"));
        assert!(text.contains("Store: Permission denied"));
        assert!(text.contains("Python312 (path does not exist)"));
    }

    #[test]
    fn test_export_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.json");
        export_json(&inventory(), &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            value["uninstall"][0]["entries"][0]["display_name"],
            "Python 3.12.1 (64-bit)"
        );
        assert_eq!(value["path"][0]["exists"], false);
        assert_eq!(value["uninstall"][0]["view"]["bitness"], "Bits64");
    }
}
