use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use frost_core::{Dimension, FrostConfig};
use frost_glsl::{Codegen, CodegenOptions};
use frost_ir::{validate_tree, Category, NodeTree, Registry};
use frost_lang::Formatter;

const DEFAULT_CONFIG: &str = "frost.toml";

#[derive(Parser)]
#[command(
    name = "frost",
    version,
    about = "Frost: compile SDF scene files to GLSL distance functions"
)]
struct Cli {
    /// Path to a frost.toml (default: ./frost.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and validate a scene file
    Check {
        #[arg()]
        file: PathBuf,
    },

    /// Generate GLSL for a scene file
    Build {
        #[arg()]
        file: PathBuf,

        /// Write the shader here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Dimensionality of the entry point (2 or 3)
        #[arg(long, value_parser = clap::value_parser!(u8).range(2..=3))]
        dimension: Option<u8>,

        /// Name of the generated entry point
        #[arg(long)]
        entry: Option<String>,
    },

    /// Rewrite a scene file in canonical form
    Fmt {
        #[arg()]
        file: PathBuf,

        /// Check mode: exit with error if input is not formatted (for CI)
        #[arg(long)]
        check: bool,
    },

    /// Print the parsed node tree
    Tree {
        #[arg()]
        file: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// List the built-in node kinds
    Nodes {
        /// Only this category (e.g. SDF3D)
        #[arg(long)]
        category: Option<Category>,
    },
}

fn load_config(explicit: Option<&Path>) -> Result<FrostConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let local = PathBuf::from(DEFAULT_CONFIG);
            if !local.exists() {
                return Ok(FrostConfig::default());
            }
            local
        }
    };
    FrostConfig::load_from_file(&path)
        .with_context(|| format!("failed to load config: {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.log.filter))
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let registry = Registry::builtin().context("failed to build the node catalog")?;

    match cli.command {
        Commands::Check { file } => cmd_check(&registry, &config, &file),
        Commands::Build {
            file,
            output,
            dimension,
            entry,
        } => {
            let mut options = CodegenOptions::from(&config.codegen);
            if let Some(dim) = dimension {
                options.dimension = Dimension::try_from(dim)?;
            }
            if let Some(entry) = entry {
                options.entry_point = entry;
            }
            cmd_build(&registry, options, &file, output.as_deref())
        }
        Commands::Fmt { file, check } => cmd_fmt(&registry, &file, check),
        Commands::Tree { file, json } => cmd_tree(&registry, &file, json),
        Commands::Nodes { category } => cmd_nodes(&registry, category),
    }
}

fn parse(registry: &Registry, file: &Path) -> Result<NodeTree> {
    frost_lang::parse_file(file, registry)
        .with_context(|| format!("failed to parse {}", file.display()))
}

fn cmd_check(registry: &Registry, config: &FrostConfig, file: &Path) -> Result<()> {
    println!("Checking {}", file.display());

    let tree = parse(registry, file)?;
    println!("   ✓ Parse OK ({} nodes)", tree.node_count());

    validate_tree(&tree, registry, config.codegen.dimension).map_err(|errors| {
        let msgs: Vec<String> = errors.into_iter().map(|e| e.to_string()).collect();
        anyhow::anyhow!("Validation errors:\n  {}", msgs.join("\n  "))
    })?;
    println!("   ✓ Validate OK");

    Ok(())
}

fn cmd_build(
    registry: &Registry,
    options: CodegenOptions,
    file: &Path,
    output: Option<&Path>,
) -> Result<()> {
    let tree = parse(registry, file)?;
    let generated = Codegen::new(registry, options)
        .generate(&tree)
        .with_context(|| format!("failed to generate GLSL for {}", file.display()))?;

    tracing::info!(
        "{}: {} functions, entry '{}' ({}), hash {}",
        file.display(),
        generated.function_count(),
        generated.entry_point,
        generated.dimension,
        generated.hash
    );

    match output {
        Some(out) => std::fs::write(out, &generated.source)
            .with_context(|| format!("failed to write shader: {}", out.display()))?,
        None => print!("{}", generated.source),
    }
    Ok(())
}

fn cmd_fmt(registry: &Registry, file: &Path, check: bool) -> Result<()> {
    let source = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read file: {}", file.display()))?;
    let tree = frost_lang::parse_str(&source, &file.display().to_string(), registry)?;
    let formatted = Formatter::format(&tree, registry);

    if check {
        if source != formatted {
            anyhow::bail!("File is not properly formatted: {}", file.display());
        }
        println!("{} is properly formatted", file.display());
    } else {
        std::fs::write(file, formatted)
            .with_context(|| format!("failed to write formatter output: {}", file.display()))?;
        println!("Formatted {}", file.display());
    }

    Ok(())
}

fn cmd_tree(registry: &Registry, file: &Path, json: bool) -> Result<()> {
    let tree = parse(registry, file)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tree.to_json(registry))?);
        return Ok(());
    }

    tree.root.walk(0, &mut |node, depth| {
        let mut line = "  ".repeat(depth);
        line.push_str(&node.kind.symbol(registry));
        if let Some(name) = &node.name {
            line.push_str(&format!(" \"{}\"", name));
        }
        for value in &node.args {
            line.push_str(&format!(" {:?}", value.components()));
        }
        if node.inline_child {
            line.push_str(" (inline)");
        }
        println!("{}", line);
    });
    Ok(())
}

fn cmd_nodes(registry: &Registry, category: Option<Category>) -> Result<()> {
    let categories = match category {
        Some(cat) => vec![cat],
        None => Category::ALL.to_vec(),
    };

    for cat in categories {
        println!("{}", cat);
        for def in registry.by_category(cat) {
            let args: Vec<String> = def
                .args
                .iter()
                .map(|slot| format!("{}: {}", slot.name, slot.ty.as_str()))
                .collect();
            println!("   {}({})", def.symbol(), args.join(", "));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_build_arguments() {
        let cli = Cli::try_parse_from([
            "frost", "build", "scene.frost", "-o", "out.glsl", "--dimension", "2", "--entry", "sdf",
        ])
        .unwrap();
        match cli.command {
            Commands::Build {
                output,
                dimension,
                entry,
                ..
            } => {
                assert_eq!(output, Some(PathBuf::from("out.glsl")));
                assert_eq!(dimension, Some(2));
                assert_eq!(entry.as_deref(), Some("sdf"));
            }
            _ => panic!("expected build"),
        }
    }

    #[test]
    fn test_dimension_out_of_range() {
        assert!(Cli::try_parse_from(["frost", "build", "scene.frost", "--dimension", "4"]).is_err());
    }

    #[test]
    fn test_category_filter_parses() {
        let cli = Cli::try_parse_from(["frost", "nodes", "--category", "VOLUMIZE"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Nodes {
                category: Some(Category::Volumize)
            }
        ));
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        assert!(load_config(Some(Path::new("/nonexistent/frost.toml"))).is_err());
    }
}
