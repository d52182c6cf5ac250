use std::io;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use meson_analyze::{
    AnalysisOptions, Diagnostic, DiagnosticLevel, MesonTree, NodeKind, Project,
};
use pathdiff::diff_paths;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "meson-analyze",
    version,
    about = "Type-check a Meson project without configuring it.",
    long_about = "Load every build file reachable from the project root, infer the types \
                  of all expressions and report what looks wrong."
)]
struct Cli {
    /// Directory holding the root `meson.build`.
    project_dir: PathBuf,

    /// Print the variables bound at the end of the root build file.
    #[arg(long)]
    types: bool,

    /// Emit diagnostics as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Describe what is at a 1-based position, e.g. `src/meson.build:3:7`.
    #[arg(long, value_name = "FILE:LINE:COL")]
    at: Option<String>,

    /// YAML file with analysis options.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log filter directive (defaults to `RUST_LOG`, then `warn`).
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref())?;

    let config = match &cli.config {
        Some(path) => AnalysisOptions::load(path)?,
        None => AnalysisOptions::default(),
    };

    let dir_display = cli.project_dir.display().to_string();
    let mut project = Project::load(&cli.project_dir, config)
        .map_err(|err| anyhow!(meson_support::cli_target_error("load", &dir_display, err)))?;
    project.analyze();

    if cli.json {
        let report = project.metadata().diagnostics_json(project.dir());
        let rendered = serde_json::to_string_pretty(&report)
            .map_err(|err| anyhow!(meson_support::cli_error("json", err)))?;
        println!("{rendered}");
    } else {
        print_all_diagnostics(&project);
    }

    if cli.types {
        print_types(&project);
    }

    if let Some(position) = &cli.at {
        describe_position(&project, position)?;
    }

    let errors = count_errors(&project);
    if errors > 0 {
        bail!("analysis found {errors} error(s)");
    }
    Ok(())
}

fn init_logging(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(directive) => EnvFilter::try_new(directive)
            .map_err(|err| anyhow!(meson_support::cli_target_error("log-level", directive, err)))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    Ok(())
}

fn count_errors(project: &Project) -> usize {
    project
        .metadata()
        .files()
        .flat_map(|(_, file)| file.diagnostics.entries())
        .filter(|diagnostic| diagnostic.level == DiagnosticLevel::Error)
        .count()
}

fn display_path(project: &Project, path: &Path) -> String {
    diff_paths(path, project.dir())
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}

fn print_all_diagnostics(project: &Project) {
    for tree in project.tree().walk() {
        let Some(diagnostics) = project.diagnostics_for(&tree.path) else {
            continue;
        };
        for diagnostic in diagnostics.entries() {
            print_diagnostic(project, tree, diagnostic);
        }
    }
}

fn print_diagnostic(project: &Project, tree: &MesonTree, diagnostic: &Diagnostic) {
    let level = match diagnostic.level {
        DiagnosticLevel::Error => "error",
        DiagnosticLevel::Warning => "warning",
    };
    let location = diagnostic.location;
    eprintln!("{level}: {}", diagnostic.message);
    eprintln!(
        "  --> {}:{}:{}",
        display_path(project, &tree.path),
        location.start_line + 1,
        location.start_column + 1
    );

    let Some(raw_line) = tree.source.line(location.start_line) else {
        return;
    };
    let display_line = raw_line.replace('\t', "    ");
    eprintln!("   | {display_line}");

    let mut caret_line = String::from("   | ");
    for ch in raw_line.chars().take(location.start_column) {
        match ch {
            '\t' => caret_line.push_str("    "),
            _ => caret_line.push(' '),
        }
    }
    let line_length = raw_line.chars().count();
    let highlight_len = if location.end_line == location.start_line {
        location.end_column.saturating_sub(location.start_column)
    } else {
        line_length.saturating_sub(location.start_column)
    };
    caret_line.push_str(&"^".repeat(highlight_len.max(1)));
    eprintln!("{caret_line}");
}

fn print_types(project: &Project) {
    let mut bindings: Vec<_> = project.root_bindings().collect();
    bindings.sort_by(|a, b| a.0.cmp(b.0));
    for (name, types) in bindings {
        println!("{name}: {types}");
    }
}

/// Splits `FILE:LINE:COL`, taking the last two separators so that file
/// names may contain colons.
fn parse_position(position: &str) -> Result<(PathBuf, usize, usize)> {
    let mut parts = position.rsplitn(3, ':');
    let (Some(column), Some(line), Some(file)) = (parts.next(), parts.next(), parts.next()) else {
        bail!(meson_support::cli_target_error("at", position, "expected FILE:LINE:COL"));
    };
    let line: usize = line
        .parse()
        .with_context(|| meson_support::cli_target_error("at", position, "bad line"))?;
    let column: usize = column
        .parse()
        .with_context(|| meson_support::cli_target_error("at", position, "bad column"))?;
    if line == 0 || column == 0 {
        bail!(meson_support::cli_target_error("at", position, "positions are 1-based"));
    }
    Ok((PathBuf::from(file), line - 1, column - 1))
}

fn describe_position(project: &Project, position: &str) -> Result<()> {
    let (file, line, column) = parse_position(position)?;
    if project.find_subtree(&file).is_none() {
        bail!(meson_support::cli_target_error(
            "at",
            &file.display().to_string(),
            "not a build file of this project"
        ));
    }
    let ast = project.ast();

    if let Some(id) = project.find_identifier_at(&file, line, column) {
        let name = ast.identifier_name(id).unwrap_or_default();
        println!("identifier {name}: {}", ast.types(id));
    } else if let Some((_, callee)) = project.find_kwarg_at(&file, line, column) {
        println!("keyword argument of {}", callee.display_name());
    } else if let Some(call) = project.find_method_call_at(&file, line, column) {
        match ast.kind(call) {
            NodeKind::MethodCall { method: Some(method), .. } => {
                println!("method {}: {}", method.id(), ast.types(call));
            }
            _ => println!("unresolved method call: {}", ast.types(call)),
        }
    } else if let Some(inclusion) = project.find_inclusion_at(&file, line, column) {
        match ast.kind(inclusion) {
            NodeKind::SubdirCall { subdir, .. } => println!("subdir {subdir}"),
            NodeKind::MultiSubdirCall { subdirs, .. } => {
                println!("subdir {}", subdirs.join(", "));
            }
            _ => println!("subdir call"),
        }
    } else if let Some(call) = project.find_function_call_at(&file, line, column) {
        let name = match ast.kind(call) {
            NodeKind::FunctionCall { id, .. } => ast.identifier_name(*id).unwrap_or_default(),
            _ => "",
        };
        println!("function {name}: {}", ast.types(call));
    } else if let Some(literal) = project.find_string_literal_at(&file, line, column) {
        println!("string '{}'", ast.string_value(literal).unwrap_or_default());
    } else {
        println!("nothing at {position}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_converted_to_zero_based() {
        let (file, line, column) = parse_position("src/meson.build:3:7").unwrap();
        assert_eq!(file, PathBuf::from("src/meson.build"));
        assert_eq!((line, column), (2, 6));
    }

    #[test]
    fn malformed_positions_are_rejected() {
        for position in ["meson.build", "meson.build:x:1", "meson.build:0:1"] {
            assert!(parse_position(position).is_err(), "{position}");
        }
    }
}
