use frost_core::{hash_source, CodegenConfig, Dimension, FrostError, FrostResult};
use frost_ir::{
    ArgValue, Category, DefIndex, FnRole, Node, NodeDef, NodeKind, NodeTree, Registry, SpecialRole,
};

use crate::source::{GeneratedSource, SourceWriter};

/// Distance returned by an entry point whose tree holds no geometry.
pub const EMPTY_DISTANCE: &str = "1e10";

/// Knobs for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodegenOptions {
    pub entry_point: String,
    pub dimension: Dimension,
    /// Fractional digits of emitted float literals.
    pub precision: usize,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            entry_point: "map".to_string(),
            dimension: Dimension::Three,
            precision: 6,
        }
    }
}

impl From<&CodegenConfig> for CodegenOptions {
    fn from(config: &CodegenConfig) -> Self {
        Self {
            entry_point: config.entry_point.clone(),
            dimension: config.dimension,
            precision: config.precision,
        }
    }
}

/// The entry point must be a GLSL identifier that cannot collide with a
/// generated variable (`p<N>`, `d<N>`) or a catalog function (`<CATEGORY>_`).
fn check_entry_point(name: &str) -> FrostResult<()> {
    let invalid = |why: &str| FrostError::InvalidArgument(format!("entry point '{}' {}", name, why));

    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(FrostError::InvalidArgument("entry point name is empty".into()));
    };
    if !(first.is_ascii_alphabetic() || first == '_')
        || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(invalid("is not an identifier"));
    }
    if let Some(digits) = name.strip_prefix('p').or_else(|| name.strip_prefix('d')) {
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("collides with a generated variable"));
        }
    }
    if let Some(cat) = Category::ALL
        .into_iter()
        .find(|c| name.strip_prefix(c.as_str()).is_some_and(|rest| rest.starts_with('_')))
    {
        return Err(invalid(&format!("uses the reserved {}_ prefix", cat.as_str())));
    }
    Ok(())
}

/// How the children of a composite are reduced to one distance.
#[derive(Clone, Copy)]
enum Fold<'a, 'r> {
    /// The registry's `D2:union`.
    Union,
    /// The node's own binary combinator.
    Own(&'a Node, &'r NodeDef),
}

/// Scene tree to GLSL generator.
///
/// Buffers are kept between runs; every run starts by resetting them along
/// with the variable counter, so the same tree always yields the same text.
pub struct Codegen<'r> {
    registry: &'r Registry,
    options: CodegenOptions,
    functions: String,
    names: Vec<String>,
    body: SourceWriter,
    emitted: Vec<bool>,
    serial: usize,
}

impl<'r> Codegen<'r> {
    pub fn new(registry: &'r Registry, options: CodegenOptions) -> Self {
        Self {
            registry,
            options,
            functions: String::new(),
            names: Vec::new(),
            body: SourceWriter::default(),
            emitted: Vec::new(),
            serial: 0,
        }
    }

    pub fn options(&self) -> &CodegenOptions {
        &self.options
    }

    pub fn generate(&mut self, tree: &NodeTree) -> FrostResult<GeneratedSource> {
        check_entry_point(&self.options.entry_point)?;
        self.reset();
        self.trace(&tree.root)?;

        let dim = self.options.dimension;
        let p0 = self.fresh("p");
        let result = self.evaluate(&tree.root, &p0, dim)?;

        let mut source = String::with_capacity(self.functions.len() + self.body.as_str().len() + 64);
        source.push_str(&self.functions);
        source.push_str(&format!(
            "float {}({} {})\n{{\n",
            self.options.entry_point,
            dim.glsl_point_type(),
            p0
        ));
        source.push_str(self.body.as_str());
        source.push_str(&format!(
            "\treturn {};\n}}\n",
            result.as_deref().unwrap_or(EMPTY_DISTANCE)
        ));

        tracing::debug!(
            "generated '{}': {} functions, {} variables, {} bytes",
            self.options.entry_point,
            self.names.len(),
            self.serial,
            source.len()
        );

        let hash = hash_source(&source);
        Ok(GeneratedSource {
            source,
            functions: self.names.clone(),
            entry_point: self.options.entry_point.clone(),
            dimension: dim,
            hash,
        })
    }

    fn reset(&mut self) {
        self.functions.clear();
        self.names.clear();
        self.body.clear(1);
        self.emitted.clear();
        self.emitted.resize(self.registry.len(), false);
        self.serial = 0;
    }

    fn def(&self, index: DefIndex) -> FrostResult<&'r NodeDef> {
        let registry: &'r Registry = self.registry;
        registry
            .get(index)
            .ok_or_else(|| FrostError::codegen(format!("unknown definition {}", index)))
    }

    /// Emit the function sources of every kind used in the tree, once each.
    fn trace(&mut self, node: &Node) -> FrostResult<()> {
        if let NodeKind::Def(idx) = node.kind {
            self.require(idx)?;
        }
        for child in &node.children {
            self.trace(child)?;
        }
        Ok(())
    }

    fn require(&mut self, index: DefIndex) -> FrostResult<()> {
        let def = self.def(index)?;
        let Some(done) = self.emitted.get_mut(index.as_usize()) else {
            return Err(FrostError::codegen(format!("unknown definition {}", index)));
        };
        if *done {
            return Ok(());
        }
        *done = true;
        for f in &def.fns {
            self.functions.push_str(&f.source);
            self.functions.push('\n');
            self.names.push(f.name.clone());
        }
        Ok(())
    }

    fn fresh(&mut self, prefix: &str) -> String {
        let name = format!("{}{}", prefix, self.serial);
        self.serial += 1;
        name
    }

    fn literal(&self, value: &ArgValue) -> String {
        let prec = self.options.precision;
        let parts: Vec<String> = value
            .components()
            .iter()
            .map(|c| format!("{:.*}", prec, c))
            .collect();
        match value {
            ArgValue::Scalar(_) => parts.join(""),
            ArgValue::Vec2(_) => format!("vec2({})", parts.join(", ")),
            ArgValue::Vec3(_) => format!("vec3({})", parts.join(", ")),
        }
    }

    /// `, a, b, ...` for the node's arguments in slot order.
    fn call_tail(&self, node: &Node, def: &NodeDef) -> FrostResult<String> {
        if node.args.len() != def.args.len()
            || node.args.iter().zip(&def.args).any(|(v, s)| !v.matches(s.ty))
        {
            return Err(FrostError::codegen(format!(
                "{} has arguments that do not match its definition",
                def.symbol()
            )));
        }
        if let Some(bad) = node
            .args
            .iter()
            .find(|v| v.components().iter().any(|c| !c.is_finite()))
        {
            return Err(FrostError::codegen(format!(
                "{} has a non-finite argument {:?}",
                def.symbol(),
                bad.components()
            )));
        }
        Ok(node
            .args
            .iter()
            .map(|v| format!(", {}", self.literal(v)))
            .collect())
    }

    fn role_fn(def: &'r NodeDef, role: FnRole) -> FrostResult<&'r str> {
        def.fn_name(role).ok_or_else(|| {
            FrostError::codegen(format!("{} has no {} function", def.symbol(), role.as_str()))
        })
    }

    /// Emit code for `node` evaluated at point `pvar`; returns the distance
    /// variable, or `None` when the subtree contributes no geometry.
    fn evaluate(&mut self, node: &Node, pvar: &str, dim: Dimension) -> FrostResult<Option<String>> {
        match node.kind {
            NodeKind::Root => self.fold_children(node, pvar, dim, Fold::Union),
            NodeKind::Special(kind) => match kind.role() {
                SpecialRole::Opaque => Ok(None),
                SpecialRole::Group => self.fold_children(node, pvar, dim, Fold::Union),
                SpecialRole::Bounded => self.bounded(node, pvar, dim),
            },
            NodeKind::Def(idx) => {
                let def = self.def(idx)?;
                if let Some(required) = def.category.input_dimension() {
                    if required != dim {
                        return Err(FrostError::codegen(format!(
                            "{} needs a {} context but is used in {}",
                            def.symbol(),
                            required,
                            dim
                        )));
                    }
                }
                match def.category {
                    Category::Sdf3d | Category::Sdf2d => self.leaf(node, def, pvar),
                    Category::Tx3d | Category::Tx2d | Category::Volumize => {
                        self.transform(node, def, pvar, dim)
                    }
                    Category::D1 => self.unary(node, def, pvar, dim),
                    Category::D2 => self.fold_children(node, pvar, dim, Fold::Own(node, def)),
                }
            }
        }
    }

    fn leaf(&mut self, node: &Node, def: &'r NodeDef, pvar: &str) -> FrostResult<Option<String>> {
        if !node.children.is_empty() {
            return Err(FrostError::codegen(format!(
                "{} is a primitive and cannot have children",
                def.symbol()
            )));
        }
        let f = Self::role_fn(def, FnRole::Sdf)?;
        let tail = self.call_tail(node, def)?;
        let d = self.fresh("d");
        self.body.line(&format!("float {} = {}({}{});", d, f, pvar, tail));
        Ok(Some(d))
    }

    fn transform(
        &mut self,
        node: &Node,
        def: &'r NodeDef,
        pvar: &str,
        dim: Dimension,
    ) -> FrostResult<Option<String>> {
        let tx = Self::role_fn(def, FnRole::Tx)?;
        let tail = self.call_tail(node, def)?;
        let child_dim = def.category.child_dimension(dim);
        let p = self.fresh("p");
        self.body.line(&format!(
            "{} {} = {}({}{});",
            child_dim.glsl_point_type(),
            p,
            tx,
            pvar,
            tail
        ));

        let folded = self.fold_children(node, &p, child_dim, Fold::Union)?;
        match (folded, def.fn_name(FnRole::D1)) {
            (Some(inner), Some(post)) => {
                let d = self.fresh("d");
                self.body
                    .line(&format!("float {} = {}({}, {}{});", d, post, pvar, inner, tail));
                Ok(Some(d))
            }
            (None, _) => {
                tracing::warn!("{} has no geometry below it; dropped", def.symbol());
                Ok(None)
            }
            (folded, None) => Ok(folded),
        }
    }

    fn unary(
        &mut self,
        node: &Node,
        def: &'r NodeDef,
        pvar: &str,
        dim: Dimension,
    ) -> FrostResult<Option<String>> {
        let f = Self::role_fn(def, FnRole::D1)?;
        let tail = self.call_tail(node, def)?;
        let Some(inner) = self.fold_children(node, pvar, dim, Fold::Union)? else {
            tracing::warn!("{} has no geometry below it; dropped", def.symbol());
            return Ok(None);
        };
        let d = self.fresh("d");
        self.body.line(&format!("float {} = {}({}{});", d, f, inner, tail));
        Ok(Some(d))
    }

    /// Left fold over the children that produce a distance.
    fn fold_children(
        &mut self,
        node: &Node,
        pvar: &str,
        dim: Dimension,
        fold: Fold<'_, 'r>,
    ) -> FrostResult<Option<String>> {
        let mut acc: Option<String> = None;
        for child in &node.children {
            let Some(d) = self.evaluate(child, pvar, dim)? else {
                continue;
            };
            let Some(prev) = acc.take() else {
                acc = Some(d);
                continue;
            };
            let (f, tail) = match fold {
                Fold::Union => {
                    let index = self.registry.union_index();
                    self.require(index)?;
                    let union = self.def(index)?;
                    (Self::role_fn(union, FnRole::D2)?, String::new())
                }
                Fold::Own(owner, def) => (Self::role_fn(def, FnRole::D2)?, self.call_tail(owner, def)?),
            };
            let out = self.fresh("d");
            self.body
                .line(&format!("float {} = {}({}, {}{});", out, f, prev, d, tail));
            acc = Some(out);
        }
        Ok(acc)
    }

    /// `optimize`: the subject is only evaluated where the bound is not
    /// positive.
    fn bounded(&mut self, node: &Node, pvar: &str, dim: Dimension) -> FrostResult<Option<String>> {
        let [subject, bound] = node.children.as_slice() else {
            return Err(FrostError::codegen(format!(
                "optimize needs exactly 2 children (subject, bound), found {}",
                node.children.len()
            )));
        };
        let Some(b) = self.evaluate(bound, pvar, dim)? else {
            return Err(FrostError::codegen("bound of optimize yields no geometry"));
        };
        let out = self.fresh("d");
        self.body.line(&format!("float {} = {};", out, b));
        self.body.line(&format!("if ({} <= 0.0) {{", b));
        self.body.indent();
        if let Some(s) = self.evaluate(subject, pvar, dim)? {
            self.body.line(&format!("{} = {};", out, s));
        }
        self.body.dedent();
        self.body.line("}");
        Ok(Some(out))
    }
}
