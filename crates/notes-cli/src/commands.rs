use std::path::Path;

use anyhow::{bail, Context as _};
use colored::Colorize;
use notes_codec::PackageCodec;
use notes_package::{DirectoryPackageStore, Package, PackageFilename, PackageStore, PackageTree};
use notes_rtf::{StyledText, TextAttributes};
use notes_sdk::{Document, DocumentConfig};
use serde_json::json;
use tracing::debug;

use crate::cli::*;

/// Settings shared by every command.
struct Context {
    config: DocumentConfig,
    format: OutputFormat,
}

impl Context {
    fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let config = match &cli.config {
            Some(path) => DocumentConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => DocumentConfig::default(),
        };
        debug!(?config, "configuration loaded");
        Ok(Self {
            config,
            format: cli.format,
        })
    }

    fn new_document(&self) -> Document {
        Document::new(
            PackageCodec::rtf(),
            DirectoryPackageStore::new(),
            self.config.clone(),
        )
    }

    fn open(&self, path: &Path) -> anyhow::Result<Document> {
        Document::open_at(
            PackageCodec::rtf(),
            DirectoryPackageStore::new(),
            self.config.clone(),
            path,
        )
        .with_context(|| format!("opening {}", path.display()))
    }

    fn load_package(&self, path: &Path) -> anyhow::Result<Package> {
        DirectoryPackageStore::new()
            .load(path)
            .with_context(|| format!("reading {}", path.display()))
    }

    fn json(&self) -> bool {
        self.format == OutputFormat::Json
    }
}

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let ctx = Context::from_cli(&cli)?;
    match cli.command {
        Command::New(args) => cmd_new(&ctx, args),
        Command::Cat(args) => cmd_cat(&ctx, args),
        Command::Write(args) => cmd_write(&ctx, args),
        Command::Append(args) => cmd_append(&ctx, args),
        Command::Ls(args) => cmd_ls(&ctx, args),
        Command::Info(args) => cmd_info(&ctx, args),
        Command::Export(args) => cmd_export(&ctx, args),
    }
}

fn cmd_new(ctx: &Context, args: NewArgs) -> anyhow::Result<()> {
    if DirectoryPackageStore::new().exists(&args.path)? {
        bail!("{} already exists", args.path.display());
    }
    let mut doc = ctx.new_document();
    if let Some(text) = args.text {
        doc.set_text(StyledText::plain(text));
    }
    doc.save_as(&args.path)
        .with_context(|| format!("creating {}", args.path.display()))?;
    println!("{} Created {}", "✓".green().bold(), args.path.display().to_string().bold());
    Ok(())
}

fn cmd_cat(ctx: &Context, args: PathArgs) -> anyhow::Result<()> {
    let doc = ctx.open(&args.path)?;
    if ctx.json() {
        let out = json!({
            "text": doc.text().plain_text(),
            "runs": doc.text().runs(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{}", doc.text().plain_text());
        if !doc.text().plain_text().ends_with('\n') {
            println!();
        }
    }
    Ok(())
}

fn cmd_write(ctx: &Context, args: TextArgs) -> anyhow::Result<()> {
    let mut doc = ctx.open(&args.path)?;
    doc.set_text(StyledText::plain(args.text));
    doc.save()?;
    println!("{} Wrote {}", "✓".green().bold(), args.path.display().to_string().bold());
    Ok(())
}

fn cmd_append(ctx: &Context, args: TextArgs) -> anyhow::Result<()> {
    let mut doc = ctx.open(&args.path)?;
    doc.edit_text(|text| text.push(&args.text, TextAttributes::plain()));
    doc.save()?;
    println!(
        "{} Appended {} chars to {}",
        "✓".green().bold(),
        args.text.chars().count(),
        args.path.display().to_string().bold()
    );
    Ok(())
}

fn cmd_ls(ctx: &Context, args: PathArgs) -> anyhow::Result<()> {
    let package = ctx.load_package(&args.path)?;
    let entries = package.walk();
    if ctx.json() {
        let out: Vec<_> = entries
            .iter()
            .map(|(path, entry)| {
                json!({
                    "path": path,
                    "kind": entry.kind().to_string(),
                    "bytes": entry.total_bytes(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    for (path, entry) in &entries {
        if entry.is_directory() {
            println!("{:>10}  {}/", "-".dimmed(), path.blue().bold());
        } else {
            println!("{:>10}  {}", entry.total_bytes(), path);
        }
    }
    Ok(())
}

fn cmd_info(ctx: &Context, args: PathArgs) -> anyhow::Result<()> {
    let package = ctx.load_package(&args.path)?;
    let digest = package.digest();
    let entry_count = package.walk().len();
    let attachments = attachment_names(&package);
    let text = PackageCodec::rtf()
        .decode(package)
        .with_context(|| format!("decoding {}", args.path.display()))?;
    let chars = text.text().len();

    if ctx.json() {
        let out = json!({
            "path": args.path.display().to_string(),
            "digest": digest.to_hex(),
            "entries": entry_count,
            "chars": chars,
            "attachments": attachments,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    println!("Bundle {}", args.path.display().to_string().bold());
    println!("  Digest: {}", digest.short_hex().yellow());
    println!("  Entries: {}", entry_count);
    println!("  Text: {} chars", chars);
    if attachments.is_empty() {
        println!("  Attachments: {}", "none".dimmed());
    } else {
        println!("  Attachments: {}", attachments.join(", ").cyan());
    }
    Ok(())
}

fn cmd_export(ctx: &Context, args: ExportArgs) -> anyhow::Result<()> {
    let package = ctx.load_package(&args.path)?;
    let text_file = PackageFilename::TextFile.as_str();
    let Some(payload) = package.child(text_file).and_then(|e| e.regular_file_contents()) else {
        bail!("{} has no {}", args.path.display(), text_file);
    };
    std::fs::write(&args.out, payload)
        .with_context(|| format!("writing {}", args.out.display()))?;
    println!(
        "{} Exported {} bytes to {}",
        "✓".green().bold(),
        payload.len(),
        args.out.display().to_string().bold()
    );
    Ok(())
}

/// Names of the entries under `Attachments/`, if present.
fn attachment_names(package: &Package) -> Vec<String> {
    package
        .child(PackageFilename::AttachmentsDirectory.as_str())
        .map(|dir| dir.entries().map(|(name, _)| name.to_string()).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> Context {
        Context {
            config: DocumentConfig::default(),
            format: OutputFormat::Text,
        }
    }

    fn read_text(path: &Path) -> String {
        ctx().open(path).unwrap().text().plain_text()
    }

    #[test]
    fn new_then_edit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.notes");

        cmd_new(&ctx(), NewArgs { path: path.clone(), text: Some("one".into()) }).unwrap();
        assert_eq!(read_text(&path), "one");

        cmd_append(&ctx(), TextArgs { path: path.clone(), text: " two".into() }).unwrap();
        assert_eq!(read_text(&path), "one two");

        cmd_write(&ctx(), TextArgs { path: path.clone(), text: "three".into() }).unwrap();
        assert_eq!(read_text(&path), "three");
    }

    #[test]
    fn new_refuses_existing_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.notes");
        cmd_new(&ctx(), NewArgs { path: path.clone(), text: None }).unwrap();
        assert!(cmd_new(&ctx(), NewArgs { path, text: None }).is_err());
    }

    #[test]
    fn export_copies_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.notes");
        let out = dir.path().join("out.rtf");
        cmd_new(&ctx(), NewArgs { path: path.clone(), text: Some("hi".into()) }).unwrap();
        cmd_export(&ctx(), ExportArgs { path: path.clone(), out: out.clone() }).unwrap();
        assert_eq!(
            std::fs::read(&out).unwrap(),
            std::fs::read(path.join("Text.rtf")).unwrap()
        );
    }

    #[test]
    fn attachment_names_lists_directory() {
        let mut package = Package::directory();
        assert!(attachment_names(&package).is_empty());
        package
            .ensure_directory(&["Attachments"])
            .unwrap()
            .add_regular_file("photo.jpg", vec![1])
            .unwrap();
        assert_eq!(attachment_names(&package), vec!["photo.jpg"]);
    }

    #[test]
    fn open_missing_bundle_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ctx().open(&dir.path().join("missing.notes")).is_err());
    }
}
