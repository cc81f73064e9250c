use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{debug, info};

use super::{
    CommandResult, CommandSummary, ExtractSummary, ReportedDiagnostic, helper::finish,
};
use crate::cli::args::ExtractCommand;
use crate::cli::scanner::scan_files;
use crate::config::{CONFIG_FILE_NAME, load_config};
use crate::core::catalog;
use crate::core::host::{FileKind, Session};
use crate::issues::Diagnostic;

/// A scanned file read from disk.
struct SourceFile {
    path: PathBuf,
    resource: String,
    kind: FileKind,
    content: Result<String>,
}

/// Resource name of `path`: relative to the source root, `/`-separated.
fn resource_name(base_dir: &Path, path: &Path) -> String {
    path.strip_prefix(base_dir)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

pub fn extract(cmd: ExtractCommand) -> Result<CommandResult> {
    let ExtractCommand {
        source_root,
        output,
        emit_dir,
        verbose,
    } = cmd;

    let start_dir = source_root.clone().unwrap_or_else(|| PathBuf::from("."));
    let config_result = load_config(&start_dir)?;
    if verbose && !config_result.from_file() {
        eprintln!(
            "Note: No {} found, using default configuration",
            CONFIG_FILE_NAME
        );
    }

    // Paths in the config file are relative to the directory holding it.
    let config_dir = config_result
        .path
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| start_dir.clone());
    let config = config_result.config;
    let base_dir = source_root.unwrap_or_else(|| config_dir.join(&config.source_root));
    let output = output.unwrap_or_else(|| config_dir.join(&config.output));
    let options = config.session_options()?;

    let scan_result = scan_files(&base_dir, &config, verbose);
    if scan_result.skipped_count > 0 {
        eprintln!(
            "Warning: {} path(s) skipped due to access errors{}",
            scan_result.skipped_count,
            if verbose { "" } else { " (use -v for details)" }
        );
    }

    let paths: Vec<&PathBuf> = scan_result.files.iter().collect();
    let sources: Vec<SourceFile> = paths
        .par_iter()
        .filter_map(|path| {
            let kind = config.file_kind(path)?;
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {}", path.display()));
            Some(SourceFile {
                path: path.to_path_buf(),
                resource: resource_name(&base_dir, path),
                kind,
                content,
            })
        })
        .collect();
    debug!(files = sources.len(), base_dir = %base_dir.display(), "read source files");

    let mut session = Session::new(options);
    let mut diagnostics = Vec::new();
    let mut emitted = Vec::new();
    let (mut markup_files, mut script_files) = (0, 0);

    for file in sources {
        let text = match file.content {
            Ok(text) => text,
            Err(err) => {
                diagnostics.push(ReportedDiagnostic::new(Diagnostic::error(
                    &file.resource,
                    None,
                    format!("{:#}", err),
                )));
                continue;
            }
        };

        if verbose {
            eprintln!("Extracting {}", file.path.display());
        }
        match file.kind {
            FileKind::Markup => markup_files += 1,
            FileKind::Script => script_files += 1,
        }

        let extraction = session.process_file(&file.resource, &text, file.kind)?;
        diagnostics.extend(
            session
                .take_diagnostics()
                .into_iter()
                .map(|d| ReportedDiagnostic::with_source(d, &text)),
        );

        if let Some(dir) = &emit_dir
            && let Some(extraction) = extraction
            && extraction.changed
        {
            let target = dir.join(&file.resource);
            write_file(&target, &extraction.code)?;
            emitted.push(target);
        }
    }

    catalog::write(session.registry(), &output)?;
    info!(
        translations = session.registry().len(),
        output = %output.display(),
        "wrote catalog"
    );

    let summary = ExtractSummary {
        markup_files,
        script_files,
        translation_count: session.registry().len(),
        output,
        emitted,
    };

    Ok(finish(
        CommandSummary::Extract(summary),
        diagnostics,
        scan_result.skipped_count,
    ))
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))
}
