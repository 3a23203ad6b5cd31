use std::io::{self, Write};

use bookmark_core::{AuditSettings, AuditViewModel, DeleteFailure, FolderEntry};

pub fn write_folders(out: &mut impl Write, folders: &[FolderEntry]) -> io::Result<()> {
    for folder in folders {
        let indent = "  ".repeat(folder.depth);
        let title = if folder.title.is_empty() {
            "(untitled)"
        } else {
            folder.title.as_str()
        };
        writeln!(out, "{indent}{title} [{}]", folder.id)?;
    }
    Ok(())
}

/// Result groups in index order, or the empty-result message.
pub fn write_groups(out: &mut impl Write, view: &AuditViewModel) -> io::Result<()> {
    if let Some(message) = &view.empty_message {
        return writeln!(out, "{message}");
    }
    for group in &view.groups {
        writeln!(out, "{} ({})", group.label, group.nodes.len())?;
        for node in &group.nodes {
            writeln!(
                out,
                "  [{}] {} <{}>",
                node.id,
                node.title,
                node.url.as_deref().unwrap_or_default()
            )?;
        }
    }
    Ok(())
}

pub fn write_errors(out: &mut impl Write, errors: &[DeleteFailure]) -> io::Result<()> {
    for failure in errors {
        writeln!(out, "could not remove {}: {}", failure.id, failure.reason)?;
    }
    Ok(())
}

pub fn write_settings(out: &mut impl Write, settings: &AuditSettings) -> io::Result<()> {
    writeln!(out, "max requests:     {}", settings.max_requests)?;
    writeln!(out, "request timeout:  {}s", settings.request_timeout_secs)?;
    writeln!(
        out,
        "group by domain:  {}",
        settings.use_domain_for_duplication_check
    )
}

pub fn progress_line(view: &AuditViewModel) -> String {
    format!(
        "checking links: {}/{} ({:.0}%)",
        view.processed, view.total, view.progress_percent
    )
}
