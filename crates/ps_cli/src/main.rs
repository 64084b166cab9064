use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use ps_ast::PipeSyntax;
use ps_codegen::emit_program;
use ps_desugar::desugar_program;
use ps_parser::{parse_source, ParseResult};

#[derive(Parser)]
#[command(name = "ps", about = "pipesugar: pipe chains desugared into plain calls")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse, desugar, and emit plain JavaScript.
    Desugar {
        /// Input .js file.
        input: PathBuf,
        /// Output file (stdout if omitted).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Generate a source map.
        #[arg(long)]
        source_map: bool,
        #[command(flatten)]
        syntax: SyntaxArgs,
    },
    /// Parse the file and report any syntax errors.
    Check { input: PathBuf },
    /// Parse and dump the tree.
    Parse {
        input: PathBuf,
        /// Dump as JSON instead of debug output.
        #[arg(long)]
        ast: bool,
    },
}

/// Overrides for the pipe operator and its identifiers.
#[derive(Args)]
struct SyntaxArgs {
    /// JSON file holding a `PipeSyntax`; flags below take precedence.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Binary operator symbol treated as the pipe (default `>>`).
    #[arg(long)]
    operator: Option<String>,
    /// Identifier standing for the piped value (default `_`).
    #[arg(long)]
    placeholder: Option<String>,
    /// Parameter name of synthesized lambdas (default `_pipe_x`).
    #[arg(long)]
    bound_variable: Option<String>,
}

impl SyntaxArgs {
    fn resolve(self) -> Result<PipeSyntax> {
        let mut syntax = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("invalid pipe syntax in {}", path.display()))?
            }
            None => PipeSyntax::default(),
        };
        if let Some(symbol) = &self.operator {
            syntax = syntax.with_operator_symbol(symbol)?;
        }
        if let Some(placeholder) = self.placeholder {
            syntax.placeholder = placeholder;
        }
        if let Some(bound_variable) = self.bound_variable {
            syntax.bound_variable = bound_variable;
        }
        Ok(syntax)
    }
}

fn read_and_parse(input: &Path) -> Result<(String, ParseResult)> {
    let source = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let filename = input.display().to_string();
    let parsed = parse_source(&source, &filename)?;
    Ok((filename, parsed))
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env().init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Desugar {
            input,
            output,
            source_map,
            syntax,
        } => {
            let syntax = syntax.resolve()?;
            log::debug!(
                "pipe operator `{}`, placeholder `{}`, bound variable `{}`",
                syntax.operator,
                syntax.placeholder,
                syntax.bound_variable
            );

            let (filename, parsed) = read_and_parse(&input)?;
            let program = desugar_program(parsed.program, &syntax)?;
            let emitted = emit_program(&program, parsed.source_map, source_map)
                .with_context(|| format!("failed to emit {filename}"))?;

            match &output {
                Some(path) => std::fs::write(path, &emitted.code)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => print!("{}", emitted.code),
            }

            if let Some(srcmap) = emitted.source_map {
                let map_path = match &output {
                    Some(path) => format!("{}.map", path.display()),
                    None => format!("{filename}.map"),
                };
                std::fs::write(&map_path, srcmap)
                    .with_context(|| format!("failed to write {map_path}"))?;
                eprintln!("Source map written to {map_path}");
            }
        }
        Commands::Check { input } => {
            let (filename, _) = read_and_parse(&input)?;
            eprintln!("OK: {filename}");
        }
        Commands::Parse { input, ast } => {
            let (_, parsed) = read_and_parse(&input)?;

            if ast {
                let json = serde_json::to_string_pretty(&parsed.program)?;
                println!("{json}");
            } else {
                println!("{:#?}", parsed.program);
            }
        }
    }

    Ok(())
}
