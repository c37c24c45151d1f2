use std::path::Path;

use frost_core::FrostResult;
use frost_glsl::{Codegen, CodegenOptions, GeneratedSource};
use frost_ir::{NodeTree, Registry};

/// Hot-reload state: the last tree and shader that parsed and generated
/// cleanly. A failed reload returns the error and keeps both.
pub struct Session<'r> {
    registry: &'r Registry,
    codegen: Codegen<'r>,
    current: Option<(NodeTree, GeneratedSource)>,
    reloads: u64,
}

impl<'r> Session<'r> {
    pub fn new(registry: &'r Registry, options: CodegenOptions) -> Self {
        Self {
            registry,
            codegen: Codegen::new(registry, options),
            current: None,
            reloads: 0,
        }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn tree(&self) -> Option<&NodeTree> {
        self.current.as_ref().map(|(tree, _)| tree)
    }

    pub fn source(&self) -> Option<&GeneratedSource> {
        self.current.as_ref().map(|(_, source)| source)
    }

    /// Successful reloads so far.
    pub fn reloads(&self) -> u64 {
        self.reloads
    }

    pub fn reload_str(&mut self, source: &str, file: &str) -> FrostResult<&GeneratedSource> {
        let tree = crate::parse_str(source, file, self.registry)?;
        let generated = self.codegen.generate(&tree)?;

        if self.source().is_some_and(|prev| prev.hash == generated.hash) {
            tracing::debug!("{}: shader unchanged ({})", file, generated.hash);
        } else {
            tracing::debug!("{}: new shader {}", file, generated.hash);
        }
        self.reloads += 1;
        let (_, source) = self.current.insert((tree, generated));
        Ok(source)
    }

    pub fn reload_file(&mut self, path: &Path) -> FrostResult<&GeneratedSource> {
        let source = std::fs::read_to_string(path)?;
        self.reload_str(&source, &path.display().to_string())
    }
}
