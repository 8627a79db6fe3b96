// src/console.rs

//! Terminal presentation: the console sinks handed to the runner and the
//! project tree.

use std::fmt::Write as _;
use std::io::Write as _;
use std::sync::Arc;

use tracing::debug;

use crate::exec::{LineKind, LineSink, OutputLine, RunStatus, StatusSink};
use crate::manager::ProjectInfo;

/// Render one line the way the console shows it.
pub fn format_line(line: &OutputLine) -> String {
    match line.kind {
        LineKind::Command => format!("\n{}", line.text),
        LineKind::Output => format!("  {}", line.text),
        LineKind::Success | LineKind::Error => line.text.clone(),
    }
}

/// Sink printing every line to stdout (errors to stderr).
pub fn line_sink() -> LineSink {
    Arc::new(|line: OutputLine| {
        let text = format_line(&line);
        if line.kind == LineKind::Error {
            eprintln!("{text}");
        } else {
            let mut out = std::io::stdout().lock();
            let _ = writeln!(out, "{text}");
            let _ = out.flush();
        }
    })
}

pub fn status_sink() -> StatusSink {
    Arc::new(|status: RunStatus| debug!(%status, "runner status"))
}

/// Projects, their environments and folders as an indented tree.
pub fn render_tree(projects: &[ProjectInfo]) -> String {
    if projects.is_empty() {
        return "(no projects)\n".to_string();
    }

    let mut out = String::new();
    for project in projects {
        let _ = writeln!(out, "{}/", project.name);

        let children = project
            .environments
            .iter()
            .map(|e| format!("{} (venv)", e.name))
            .chain(project.folders.iter().map(|f| format!("{}/", f.name)))
            .collect::<Vec<_>>();

        for (i, child) in children.iter().enumerate() {
            let branch = if i + 1 == children.len() { "└──" } else { "├──" };
            let _ = writeln!(out, "{branch} {child}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::{EnvironmentInfo, FolderInfo};
    use std::path::PathBuf;

    #[test]
    fn output_lines_are_indented() {
        assert_eq!(format_line(&OutputLine::output("Collecting six")), "  Collecting six");
        assert_eq!(format_line(&OutputLine::command("$ pip list")), "\n$ pip list");
    }

    #[test]
    fn tree_lists_environments_before_folders() {
        let projects = vec![ProjectInfo {
            name: "demo".to_string(),
            path: PathBuf::from("/p/demo"),
            environments: vec![EnvironmentInfo {
                name: "dev".to_string(),
                path: PathBuf::from("/p/demo/venvs/dev"),
            }],
            folders: vec![FolderInfo {
                name: "src".to_string(),
                path: PathBuf::from("/p/demo/src"),
            }],
        }];

        assert_eq!(render_tree(&projects), "demo/\n├── dev (venv)\n└── src/\n");
        assert_eq!(render_tree(&[]), "(no projects)\n");
    }
}
