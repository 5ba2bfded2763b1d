use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ast_session::lang::{lang_from_name, lang_from_path, SupportLang};
use ast_session::{NodeEdit, NodeEditOptions, SessionStore};
use clap::{Parser, Subcommand};
use colored::Colorize;
use similar::{ChangeTag, TextDiff};

#[derive(Parser)]
#[command(name = "ast-session")]
#[command(about = "Live syntax-tree sessions with structural queries and edits", long_about = None)]
#[command(version)]
struct Cli {
    /// Grammar to parse with (inferred from the file extension if omitted)
    #[arg(short, long, global = true)]
    lang: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a file for syntax errors
    Validate {
        /// File to check
        file: PathBuf,
    },

    /// Run a tree-sitter query against a file, printing matches as JSON
    Query {
        /// File to query
        file: PathBuf,

        /// Query pattern in tree-sitter S-expression syntax
        pattern: String,
    },

    /// Print a file's parse tree in S-expression form
    Tree {
        /// File to parse
        file: PathBuf,
    },

    /// Apply snippet edits from a JSON file
    Patch {
        /// File to edit
        file: PathBuf,

        /// JSON file holding the edit list
        #[arg(short, long)]
        edits: PathBuf,

        /// Preview without writing the file back
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Reject the batch if it would introduce parse errors
        #[arg(long)]
        strict: bool,

        /// Leave replacement text exactly as written
        #[arg(long)]
        no_auto_indent: bool,

        /// Show a unified diff of the change
        #[arg(short, long)]
        diff: bool,
    },

    /// Show a unified diff between two files
    Diff {
        /// Original file
        old: PathBuf,

        /// Modified file
        new: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { file } => cmd_validate(cli.lang.as_deref(), &file),
        Commands::Query { file, pattern } => cmd_query(cli.lang.as_deref(), &file, &pattern),
        Commands::Tree { file } => cmd_tree(cli.lang.as_deref(), &file),
        Commands::Patch {
            file,
            edits,
            dry_run,
            strict,
            no_auto_indent,
            diff,
        } => cmd_patch(
            cli.lang.as_deref(),
            &file,
            &edits,
            NodeEditOptions {
                dry_run,
                auto_indent: !no_auto_indent,
                fail_on_parse_error: strict,
            },
            diff,
        ),
        Commands::Diff { old, new } => cmd_diff(&old, &new),
    }
}

/// Resolve the grammar from --lang or the file extension.
fn resolve_lang(flag: Option<&str>, file: &Path) -> Result<SupportLang> {
    if let Some(name) = flag {
        return lang_from_name(name)
            .with_context(|| format!("unknown language: {name}"));
    }
    lang_from_path(file).with_context(|| {
        format!(
            "cannot infer a grammar for {}; pass --lang",
            file.display()
        )
    })
}

fn open_file(lang: SupportLang, file: &Path) -> Result<(SessionStore, String, String)> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let id = file.display().to_string();
    let mut store = SessionStore::new(lang)?;
    store.open(&id, content.as_str())?;
    Ok((store, id, content))
}

fn cmd_validate(lang: Option<&str>, file: &Path) -> Result<()> {
    let lang = resolve_lang(lang, file)?;
    let content = fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let mut store = SessionStore::new(lang)?;
    let report = store.validate(&content);

    if report.valid {
        println!("{} {}: no syntax errors", "✓".green(), file.display());
        return Ok(());
    }

    eprintln!(
        "{} {}: {} syntax error(s)",
        "✗".red(),
        file.display(),
        report.error_count
    );
    for issue in &report.errors {
        eprintln!(
            "  {} at {}:{} ({})",
            issue.node_kind.red(),
            issue.start_row + 1,
            issue.start_col + 1,
            issue.context.trim_end().dimmed()
        );
    }
    std::process::exit(1);
}

fn cmd_query(lang: Option<&str>, file: &Path, pattern: &str) -> Result<()> {
    let lang = resolve_lang(lang, file)?;
    let (store, id, _) = open_file(lang, file)?;

    let matches = store.run_query(&id, pattern)?;
    println!("{}", serde_json::to_string_pretty(&matches)?);
    Ok(())
}

fn cmd_tree(lang: Option<&str>, file: &Path) -> Result<()> {
    let lang = resolve_lang(lang, file)?;
    let (store, id, _) = open_file(lang, file)?;

    println!("{}", store.debug_tree(&id)?);
    Ok(())
}

fn cmd_patch(
    lang: Option<&str>,
    file: &Path,
    edits_file: &Path,
    options: NodeEditOptions,
    show_diff: bool,
) -> Result<()> {
    let lang = resolve_lang(lang, file)?;
    let (mut store, id, original) = open_file(lang, file)?;

    let edits_json = fs::read_to_string(edits_file)
        .with_context(|| format!("failed to read {}", edits_file.display()))?;
    let edits: Vec<NodeEdit> = serde_json::from_str(&edits_json)
        .with_context(|| format!("failed to parse edits from {}", edits_file.display()))?;

    let dry_run = options.dry_run;
    let report = store.apply_node_edits(&id, &edits, &options)?;

    if show_diff && report.new_source != original {
        display_diff(file, &original, &report.new_source);
    }

    if report.has_error {
        println!(
            "{} {} edit(s) applied, result has {} parse error(s)",
            "⊙".yellow(),
            report.edits_applied,
            report.error_count
        );
    } else {
        println!("{} {} edit(s) applied", "✓".green(), report.edits_applied);
    }

    if dry_run {
        println!("{}", "[dry run - file not modified]".cyan());
    } else {
        atomic_write(file, report.new_source.as_bytes())?;
    }

    Ok(())
}

fn cmd_diff(old: &Path, new: &Path) -> Result<()> {
    let old_text = fs::read_to_string(old)
        .with_context(|| format!("failed to read {}", old.display()))?;
    let new_text = fs::read_to_string(new)
        .with_context(|| format!("failed to read {}", new.display()))?;

    let name = new
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| new.display().to_string());
    print!("{}", ast_session::unified_diff(&old_text, &new_text, &name));
    Ok(())
}

/// Helper: Show a colored line diff between original and modified content
fn display_diff(file: &Path, original: &str, modified: &str) {
    println!(
        "\n{}",
        format!("--- {} (original)", file.display()).dimmed()
    );
    println!("{}", format!("+++ {} (patched)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, modified);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", sign);
    }
}

/// Atomic file write: tempfile + fsync + rename.
fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}
