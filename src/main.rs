use anyhow::{bail, Context, Result};
use astsel::config::{load_from_path, load_nearest, AstselConfig, OutputFormat};
use astsel::pool::with_parser;
use astsel::selector::{subjects, Selector};
use astsel::tree::json::JsonDocument;
use astsel::ts::{read_source, ParsedSource, TsSchema};
use astsel::{Query, SyntaxNode};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde_json::{json, Value as Json};
use std::env;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "astsel")]
#[command(about = "Run CSS-like selectors over syntax trees", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the nodes a selector reports in JSON ASTs or Rust sources
    Query {
        #[command(flatten)]
        selector: SelectorSource,

        /// Files or directories to search (directories are walked recursively)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Input dialect (auto picks by file extension)
        #[arg(short, long, value_enum, default_value_t = Lang::Auto)]
        lang: Lang,

        /// Config file (defaults to the nearest astsel.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format, overriding the config file
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// Only print the number of reported nodes per file
        #[arg(long)]
        count: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Print the subject fragments a selector reports
    Subjects {
        #[command(flatten)]
        selector: SelectorSource,
    },

    /// Validate a selector AST without running it
    Check {
        #[command(flatten)]
        selector: SelectorSource,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct SelectorSource {
    /// Selector AST as a JSON file ('-' reads stdin)
    #[arg(short, long)]
    selector: Option<PathBuf>,

    /// Selector AST as inline JSON
    #[arg(short, long)]
    inline: Option<String>,
}

impl SelectorSource {
    fn load(&self) -> Result<Selector> {
        if let Some(json) = &self.inline {
            return Selector::from_json(json).context("invalid inline selector");
        }
        match self.selector.as_deref() {
            Some(path) if path == Path::new("-") => {
                let mut input = String::new();
                io::stdin()
                    .read_to_string(&mut input)
                    .context("failed to read selector from stdin")?;
                Selector::from_json(&input).context("invalid selector on stdin")
            }
            Some(path) => Selector::from_path(path)
                .with_context(|| format!("invalid selector file {}", path.display())),
            None => bail!("either --selector or --inline is required"),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Lang {
    Auto,
    Json,
    Rust,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command {
        Commands::Query {
            selector,
            inputs,
            lang,
            config,
            format,
            count,
            no_color,
        } => cmd_query(&selector, &inputs, lang, config, format, count, no_color),

        Commands::Subjects { selector } => cmd_subjects(&selector),

        Commands::Check { selector } => cmd_check(&selector),
    }
}

/// One reported node, flattened for printing.
struct Hit {
    kind: String,
    range: Option<(usize, usize)>,
    line: Option<usize>,
    snippet: String,
    node: Option<Json>,
}

impl Hit {
    fn to_json(&self, file: &Path) -> Json {
        let mut obj = json!({
            "file": file.display().to_string(),
            "type": self.kind,
            "range": self.range.map(|(start, end)| json!([start, end])),
        });
        if let Some(line) = self.line {
            obj["line"] = json!(line);
        }
        match &self.node {
            Some(node) => obj["node"] = node.clone(),
            None => obj["text"] = json!(self.snippet),
        }
        obj
    }
}

/// Resolve config: explicit flag, then the nearest astsel.toml, then defaults.
fn resolve_config(explicit: Option<PathBuf>) -> Result<AstselConfig> {
    if let Some(path) = explicit {
        return Ok(load_from_path(&path)?);
    }
    let cwd = env::current_dir().context("cannot determine current directory")?;
    let (config, _) = load_nearest(&cwd)?;
    Ok(config)
}

fn dialect_of(path: &Path, lang: Lang) -> Option<Lang> {
    let ext = path.extension().and_then(|s| s.to_str());
    match (lang, ext) {
        (Lang::Auto, Some("json")) => Some(Lang::Json),
        (Lang::Auto, Some("rs")) => Some(Lang::Rust),
        (Lang::Auto, _) => None,
        (explicit, _) => Some(explicit),
    }
}

/// Expand directories into the files they contain that match the dialect.
fn collect_inputs(inputs: &[PathBuf], lang: Lang) -> Result<Vec<(PathBuf, Lang)>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found = Vec::new();
            for entry in WalkDir::new(input) {
                let entry = entry?;
                if !entry.file_type().is_file() {
                    continue;
                }
                // Inside directories the extension decides, even with an explicit --lang.
                let wanted = dialect_of(entry.path(), Lang::Auto)
                    .filter(|dialect| lang == Lang::Auto || *dialect == lang);
                if let Some(dialect) = wanted {
                    found.push((entry.path().to_path_buf(), dialect));
                }
            }
            found.sort_by(|a, b| a.0.cmp(&b.0));
            files.extend(found);
        } else {
            let dialect = dialect_of(input, lang).with_context(|| {
                format!(
                    "cannot infer dialect of {} (use --lang json|rust)",
                    input.display()
                )
            })?;
            files.push((input.clone(), dialect));
        }
    }
    Ok(files)
}

fn query_json_file(path: &Path, selector: &Selector, config: &AstselConfig) -> Result<Vec<Hit>> {
    let doc = JsonDocument::from_path(path)?;
    let schema = config.estree_schema();
    log::debug!(
        "{}: ESTree schema, {:?} fallback for unknown types",
        path.display(),
        schema.fallback()
    );
    let found = Query::new(&schema).match_tree(&doc.root(), Some(selector))?;

    Ok(found
        .iter()
        .map(|node| Hit {
            kind: node.kind().to_string(),
            range: node.span().map(|r| (r.start, r.end)),
            line: node
                .value()
                .pointer("/loc/start/line")
                .and_then(Json::as_u64)
                .map(|l| l as usize),
            snippet: describe_json(node.value()),
            node: Some(node.value().clone()),
        })
        .collect())
}

/// Short label for an ESTree node: its name, value or raw text.
fn describe_json(value: &Json) -> String {
    ["name", "raw", "value", "operator"]
        .iter()
        .find_map(|key| match value.get(*key) {
            Some(Json::String(s)) => Some(s.clone()),
            Some(Json::Number(n)) => Some(n.to_string()),
            Some(Json::Bool(b)) => Some(b.to_string()),
            _ => None,
        })
        .unwrap_or_default()
}

fn query_rust_file(path: &Path, selector: &Selector) -> Result<Vec<Hit>> {
    let source = read_source(path)?;
    let tree = with_parser(|parser| parser.parse(&source))??;
    let parsed = ParsedSource {
        source: &source,
        tree,
    };
    if parsed.has_errors() {
        log::warn!(
            "{}: {} syntax error node(s); results may be incomplete",
            path.display(),
            parsed.error_count()
        );
    }

    let schema = TsSchema::new();
    let found = Query::new(&schema).match_tree(&parsed.root(), Some(selector))?;

    Ok(found
        .iter()
        .map(|node| Hit {
            kind: node.kind().to_string(),
            range: node.span().map(|r| (r.start, r.end)),
            line: Some(node.inner().start_position().row + 1),
            snippet: first_line(node.text()),
            node: None,
        })
        .collect())
}

fn first_line(text: &str) -> String {
    const MAX: usize = 80;
    let line = text.lines().next().unwrap_or_default().trim_end();
    if line.chars().count() > MAX {
        let cut: String = line.chars().take(MAX).collect();
        format!("{cut}…")
    } else {
        line.to_string()
    }
}

fn cmd_query(
    source: &SelectorSource,
    inputs: &[PathBuf],
    lang: Lang,
    config: Option<PathBuf>,
    format: Option<FormatArg>,
    count_only: bool,
    no_color: bool,
) -> Result<()> {
    // 1. Config and selector
    let config = resolve_config(config)?;
    if no_color || !config.output.color {
        colored::control::set_override(false);
    }
    let format = format.map(OutputFormat::from).unwrap_or(config.output.format);
    let selector = source.load()?;

    // 2. Inputs
    let files = collect_inputs(inputs, lang)?;
    if files.is_empty() {
        bail!("no .json or .rs inputs found");
    }

    // 3. Run the selector over each file
    let mut json_hits = Vec::new();
    let mut total = 0usize;
    let mut failed = 0usize;

    for (path, dialect) in &files {
        let result = match dialect {
            Lang::Rust => query_rust_file(path, &selector),
            _ => query_json_file(path, &selector, &config),
        };

        let hits = match result {
            Ok(hits) => hits,
            Err(e) => {
                eprintln!("{} {}: {:#}", "✗".red(), path.display(), e);
                failed += 1;
                continue;
            }
        };
        total += hits.len();

        if count_only {
            if format == OutputFormat::Text {
                println!("{}: {}", path.display(), hits.len());
            } else {
                json_hits.push(json!({ "file": path.display().to_string(), "count": hits.len() }));
            }
            continue;
        }

        match format {
            OutputFormat::Json => json_hits.extend(hits.iter().map(|hit| hit.to_json(path))),
            OutputFormat::Text => {
                for hit in &hits {
                    print_hit(path, hit);
                }
            }
        }
    }

    // 4. Report
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&json_hits)?),
        OutputFormat::Text => {
            println!();
            println!(
                "{} {} in {} file(s)",
                format!("{total}").green(),
                if total == 1 { "match" } else { "matches" },
                files.len()
            );
            if failed > 0 {
                println!("{} file(s) failed", format!("{failed}").red());
            }
        }
    }

    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn print_hit(path: &Path, hit: &Hit) {
    let location = match (hit.line, hit.range) {
        (Some(line), _) => format!("{}:{}", path.display(), line),
        (None, Some((start, end))) => format!("{}@{}..{}", path.display(), start, end),
        (None, None) => path.display().to_string(),
    };
    if hit.snippet.is_empty() {
        println!("{}  {}", location.dimmed(), hit.kind.cyan());
    } else {
        println!("{}  {}  {}", location.dimmed(), hit.kind.cyan(), hit.snippet);
    }
}

fn cmd_subjects(source: &SelectorSource) -> Result<()> {
    let selector = source.load()?;
    let found = subjects(&selector);

    if found.is_empty() {
        println!(
            "{}",
            "No subject markers: the matched node itself is reported".dimmed()
        );
        return Ok(());
    }

    for (idx, fragment) in found.iter().enumerate() {
        println!(
            "{} {}",
            format!("[{}]", idx + 1).bold(),
            serde_json::to_string(&fragment.to_value())?
        );
    }
    Ok(())
}

fn cmd_check(source: &SelectorSource) -> Result<()> {
    let selector = source.load()?;
    println!(
        "{} valid '{}' selector ({} subject fragment(s))",
        "✓".green(),
        selector.kind.tag(),
        subjects(&selector).len()
    );
    Ok(())
}
