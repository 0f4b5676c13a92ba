use std::fmt::Write as _;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use colored::Colorize;
use serde_json::Value;
use tracing::debug;

use jsondiff_core::{parse_document, DiffOptions, Differ, Side};
use jsondiff_hash::ValueHasher;
use jsondiff_types::{Op, Patch, PatchList};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Command::Diff(args) => cmd_diff(args, cli.format),
        Command::Digest(args) => cmd_digest(args, cli.format),
    }
}

fn cmd_diff(args: DiffArgs, format: OutputFormat) -> anyhow::Result<ExitCode> {
    let options = build_options(&args)?;
    let src = load_document(&args.src, Side::Source)?;
    let dst = load_document(&args.dst, Side::Destination)?;

    let mut differ = Differ::new(options);
    differ.compare(&src, &dst);
    let patches = differ.patches();

    match format {
        OutputFormat::Json => {
            if !patches.is_empty() {
                println!("{patches}");
            }
        }
        OutputFormat::Text => print!("{}", format_text(patches)),
    }

    if args.exit_code && !patches.is_empty() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn cmd_digest(args: DigestArgs, format: OutputFormat) -> anyhow::Result<ExitCode> {
    let doc = load_document(&args.file, Side::Source)?;
    let value = match &args.pointer {
        Some(ptr) => doc
            .pointer(ptr)
            .with_context(|| format!("no value at pointer {ptr:?} in {}", args.file.display()))?,
        None => &doc,
    };

    let digest = ValueHasher::DEFAULT.digest(value);
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "digest": format!("{digest:016x}") }))
        }
        OutputFormat::Text => println!("{}", format!("{digest:016x}").yellow()),
    }
    Ok(ExitCode::SUCCESS)
}

/// Options from the config file (if any) merged with command-line flags.
fn build_options(args: &DiffArgs) -> anyhow::Result<DiffOptions> {
    let base = match &args.config {
        Some(path) => DiffOptions::from_toml_file(path)
            .with_context(|| format!("loading options from {}", path.display()))?,
        None => DiffOptions::default(),
    };

    let flags = DiffOptions::new()
        .with_ignores(args.ignores.iter().cloned())
        .with_slice_orders(args.slice_orders.iter().cloned())
        .with_multiset(args.multiset);

    let options = base.merge(flags);
    debug!(
        ignores = options.ignores.len(),
        slice_orders = options.slice_orders.len(),
        multiset = options.multiset,
        "diff options"
    );
    Ok(options)
}

fn load_document(path: &Path, side: Side) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {side} document {}", path.display()))?;
    parse_document(&text, side).with_context(|| format!("in {}", path.display()))
}

fn format_text(patches: &PatchList) -> String {
    if patches.is_empty() {
        return "No differences.\n".to_string();
    }

    let mut out = String::new();
    for patch in patches {
        let _ = writeln!(out, "{}", format_patch(patch));
    }
    let _ = writeln!(
        out,
        "\n{} added, {} removed, {} replaced",
        patches.additions().to_string().green(),
        patches.removals().to_string().red(),
        patches.replacements().to_string().yellow(),
    );
    out
}

fn format_patch(patch: &Patch) -> String {
    let path = display_path(&patch.path);
    match patch.op {
        Op::Add => format!("{} {} {}", "+".green().bold(), path, render(&patch.dst_value)),
        Op::Remove => format!("{} {} {}", "-".red().bold(), path, render(&patch.src_value)),
        Op::Replace => format!(
            "{} {} {} -> {}",
            "~".yellow().bold(),
            path,
            render(&patch.src_value).dimmed(),
            render(&patch.dst_value),
        ),
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "/"
    } else {
        path
    }
}

fn render(value: &Option<Value>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "null".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use std::path::PathBuf;

    fn diff_args(src: PathBuf, dst: PathBuf) -> DiffArgs {
        DiffArgs {
            src,
            dst,
            ignores: Vec::new(),
            slice_orders: Vec::new(),
            config: None,
            multiset: false,
            exit_code: false,
        }
    }

    fn write_json(dir: &tempfile::TempDir, name: &str, value: &Value) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, value.to_string()).unwrap();
        path
    }

    #[test]
    fn flags_merge_with_config_file() {
        let mut config = tempfile::NamedTempFile::new().unwrap();
        writeln!(config, "ignores = [\"/meta\"]").unwrap();

        let mut args = diff_args("a".into(), "b".into());
        args.config = Some(config.path().to_path_buf());
        args.slice_orders = vec!["/slice".into()];

        let opts = build_options(&args).unwrap();
        assert!(opts.is_ignored("/meta"));
        assert!(opts.is_slice_order("/slice"));
    }

    #[test]
    fn bad_config_is_reported() {
        let mut config = tempfile::NamedTempFile::new().unwrap();
        writeln!(config, "ignores = 3").unwrap();

        let mut args = diff_args("a".into(), "b".into());
        args.config = Some(config.path().to_path_buf());
        let err = build_options(&args).unwrap_err();
        assert!(err.to_string().contains("loading options"));
    }

    #[test]
    fn load_document_reads_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_json(&dir, "doc.json", &json!({"a": [1, 2]}));
        assert_eq!(load_document(&path, Side::Source).unwrap(), json!({"a": [1, 2]}));
    }

    #[test]
    fn load_document_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{oops").unwrap();
        assert!(load_document(&path, Side::Destination).is_err());
    }

    #[test]
    fn load_document_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_document(&dir.path().join("none.json"), Side::Source).unwrap_err();
        assert!(err.to_string().contains("reading source document"));
    }

    #[test]
    fn diff_exit_code_reflects_differences() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_json(&dir, "a.json", &json!({"x": 1}));
        let b = write_json(&dir, "b.json", &json!({"x": 2}));

        let mut args = diff_args(a.clone(), b);
        args.exit_code = true;
        assert_eq!(cmd_diff(args, OutputFormat::Json).unwrap(), ExitCode::FAILURE);

        let mut same = diff_args(a.clone(), a);
        same.exit_code = true;
        assert_eq!(cmd_diff(same, OutputFormat::Text).unwrap(), ExitCode::SUCCESS);
    }

    #[test]
    fn ignored_difference_does_not_fail() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_json(&dir, "a.json", &json!({"x": 1}));
        let b = write_json(&dir, "b.json", &json!({"x": 2}));

        let mut args = diff_args(a, b);
        args.exit_code = true;
        args.ignores = vec!["/x".into()];
        assert_eq!(cmd_diff(args, OutputFormat::Text).unwrap(), ExitCode::SUCCESS);
    }

    #[test]
    fn digest_pointer_must_resolve() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_json(&dir, "doc.json", &json!({"a": [1]}));

        let ok = DigestArgs { file: path.clone(), pointer: Some("/a/0".into()) };
        assert!(cmd_digest(ok, OutputFormat::Json).is_ok());

        let missing = DigestArgs { file: path, pointer: Some("/b".into()) };
        assert!(cmd_digest(missing, OutputFormat::Text).is_err());
    }

    #[test]
    fn text_output_lists_each_patch() {
        let patches = PatchList::from(vec![
            Patch::add("/x", json!(1)),
            Patch::remove("/y", json!("old")),
            Patch::replace("", json!(1), json!(2)),
        ]);
        let text = format_text(&patches);
        assert!(text.contains("/x"));
        assert!(text.contains("\"old\""));
        assert!(text.contains("->"));
        assert_eq!(text.lines().filter(|l| !l.is_empty()).count(), 4);
    }

    #[test]
    fn text_output_for_no_differences() {
        assert_eq!(format_text(&PatchList::new()), "No differences.\n");
    }
}
