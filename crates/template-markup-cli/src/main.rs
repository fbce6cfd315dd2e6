use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use relative_path::RelativePath;
use template_markup_config::Config;
use template_markup_engine::{
    Document, MarkupOptions, io, model::check, parse_markup, serialize_with, to_html,
};

#[derive(Parser)]
#[command(name = "tmpl", version, about = "Template markup tools")]
struct Cli {
    /// Templates directory; defaults to the configured one
    #[arg(long, global = true)]
    templates: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the canonical serialization
    Normalize {
        file: PathBuf,
        /// Write the result back instead of printing it
        #[arg(short, long)]
        write: bool,
    },
    /// Report document invariants and round-trip stability
    Check { file: PathBuf },
    /// Print the document tree as JSON
    Tree { file: PathBuf },
    /// Print the HTML projection
    Html { file: PathBuf },
    /// List templates in the templates directory
    List,
}

/// Where template files are looked up, and how they are written.
struct Workspace {
    templates: Option<PathBuf>,
    options: MarkupOptions,
}

impl Workspace {
    fn new(templates: Option<PathBuf>) -> Result<Self> {
        let config_path = Config::config_path();
        log::debug!("Config path: {}", config_path.display());
        let config = Config::load_from_path(&config_path)?;
        let options = config
            .as_ref()
            .map(Config::markup_options)
            .unwrap_or_default();
        let templates = templates.or_else(|| config.map(|c| c.templates_path));
        Ok(Self { templates, options })
    }

    /// Reads `file` as given, or relative to the templates directory.
    fn read(&self, file: &Path) -> Result<String> {
        if file.exists() {
            return std::fs::read_to_string(file)
                .with_context(|| format!("reading {}", file.display()));
        }
        let root = self
            .templates
            .as_deref()
            .with_context(|| format!("{} not found and no templates directory set", file.display()))?;
        let relative = RelativePath::from_path(file)
            .with_context(|| format!("{} is not a relative path", file.display()))?;
        Ok(io::read_template(relative, root)?)
    }

    fn write(&self, file: &Path, content: &str) -> Result<()> {
        if file.exists() || self.templates.is_none() {
            return std::fs::write(file, content)
                .with_context(|| format!("writing {}", file.display()));
        }
        let relative = RelativePath::from_path(file)
            .with_context(|| format!("{} is not a relative path", file.display()))?;
        let root = self.templates.as_deref().unwrap_or(Path::new("."));
        Ok(io::write_template(relative, root, content)?)
    }

    fn load(&self, file: &Path) -> Result<Document> {
        Ok(parse_markup(&self.read(file)?))
    }
}

/// Outcome of `check`: a printable report and whether everything held.
fn check_report(doc: &Document, options: &MarkupOptions) -> (String, bool) {
    let mut lines = vec![];
    let invariants = check(doc);
    match &invariants {
        Ok(()) => lines.push("invariants: ok".to_string()),
        Err(violation) => lines.push(format!("invariants: {violation}")),
    }
    let first = serialize_with(doc, options);
    let second = serialize_with(&parse_markup(&first), options);
    let stable = first == second;
    lines.push(format!(
        "round-trip: {}",
        if stable { "stable" } else { "unstable" }
    ));
    (lines.join("\n"), invariants.is_ok() && stable)
}

fn run(cli: Cli) -> Result<bool> {
    let workspace = Workspace::new(cli.templates)?;
    match cli.command {
        Command::Normalize { file, write } => {
            let text = serialize_with(&workspace.load(&file)?, &workspace.options);
            if write {
                workspace.write(&file, &text)?;
                log::info!("normalized {}", file.display());
            } else {
                println!("{text}");
            }
        }
        Command::Check { file } => {
            let (report, ok) = check_report(&workspace.load(&file)?, &workspace.options);
            println!("{report}");
            return Ok(ok);
        }
        Command::Tree { file } => {
            println!("{}", serde_json::to_string_pretty(&workspace.load(&file)?)?);
        }
        Command::Html { file } => println!("{}", to_html(&workspace.load(&file)?)),
        Command::List => {
            let root = workspace
                .templates
                .as_deref()
                .context("no templates directory set; pass --templates or configure one")?;
            for template in io::scan_templates(root)? {
                println!("{}", template.relative_path());
            }
        }
    }
    Ok(true)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            log::error!("{err:#}");
            process::exit(2);
        }
    }
}
