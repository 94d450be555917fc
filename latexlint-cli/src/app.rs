use anyhow::{Context, Result};
use clap::Parser;
use latexlint_core::sources::{default_rules_dir, discover_inputs, read_document, read_rule_lines};
use latexlint_core::{LintConfig, LintProcessor, ReportFormat, RuleCompiler, SourceDocument};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "latexlint")]
#[command(about = "Check LaTeX sources against your own grammar, style and spelling rules")]
pub struct Cli {
    /// LaTeX files or directories to check. Arguments without `.tex` in them are skipped
    pub inputs: Vec<String>,

    /// Rule-set directory, may be repeated (default: ~/.latex-rules)
    #[arg(short, long = "rules", value_name = "DIR")]
    pub rules: Vec<PathBuf>,

    /// Path to custom config file (YAML format)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Report format: text or json
    #[arg(short = 'f', long, default_value = "text")]
    pub format: ReportFormat,

    /// Log more (-v info, -vv debug, -vvv trace). LATEXLINT_LOG overrides this
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Rule directories to read: the ones given on the command line, otherwise
/// the configured directory under the home directory.
pub fn rule_dirs(cli: &Cli, config: &LintConfig) -> Result<Vec<PathBuf>> {
    if !cli.rules.is_empty() {
        return Ok(cli.rules.clone());
    }
    let home = dirs::home_dir().context("Could not determine the home directory, pass --rules")?;
    Ok(vec![default_rules_dir(&home, &config.rules_dir_name)])
}

/// Run one lint pass. The report goes to `out`; rule diagnostics and
/// rejected arguments go to `err`. Any returned error is fatal.
pub fn run<W: Write, E: Write>(cli: &Cli, out: &mut W, err: &mut E) -> Result<()> {
    let config = LintConfig::load_with_fallback(cli.config.as_deref());
    match &cli.config {
        Some(path) => tracing::info!("📋 Loaded config from: {path}"),
        None => tracing::debug!("📋 Using default config"),
    }

    let dirs = rule_dirs(cli, &config)?;
    let lines = read_rule_lines(&dirs).context("Failed to read rule sets")?;
    let compiled = RuleCompiler::from_config(&config).compile(&lines);
    for diagnostic in &compiled.diagnostics {
        writeln!(err, "{diagnostic}")?;
    }
    let processor = LintProcessor::from_compiled(compiled, &config)?;
    tracing::info!("📐 {} rules loaded", processor.rules().user_rule_count());

    let discovered = discover_inputs(cli.inputs.as_slice())?;
    for arg in &discovered.invalid {
        writeln!(err, "{arg} is an invalid argument")?;
    }

    let documents = discovered
        .files
        .iter()
        .map(|path| read_document(path))
        .collect::<Result<Vec<SourceDocument>, _>>()?;

    let report = processor.lint_documents(documents);
    tracing::info!(
        "✅ Checked {} files, {} violations",
        report.documents.len(),
        report.violation_count()
    );

    let rendered = report.render(cli.format)?;
    if !rendered.is_empty() {
        writeln!(out, "{rendered}")?;
    }
    Ok(())
}
