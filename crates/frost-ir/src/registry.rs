//! The node definition registry.
//!
//! Definitions are registered on a [`RegistryBuilder`] with an open/close
//! protocol (`node`, `arg`, `glsl`, `endnode`). [`RegistryBuilder::build`] is
//! the one-time finalize step: it sorts by `(category, name)` and hands back
//! an immutable [`Registry`] that supports binary-search lookup.

use frost_core::{FrostError, FrostResult};

use crate::nodedef::{
    unique_fn_name, ArgSlot, ArgType, Category, DefIndex, FnRole, GlslFn, NodeDef,
    MAX_NODEDEF_ARGS, PLACEHOLDER,
};

/// Name of the designated implicit-union combinator (`D2:union`).
pub const UNION_NAME: &str = "union";

/// A definition that is still open on the builder.
#[derive(Debug)]
struct Draft {
    category: Category,
    name: String,
    args: Vec<ArgSlot>,
    fns: Vec<GlslFn>,
}

/// Accumulates node definitions before finalization.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    defs: Vec<NodeDef>,
    open: Option<Draft>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of closed definitions.
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Open a new definition.
    pub fn node(&mut self, category: Category, name: impl Into<String>) -> FrostResult<&mut Self> {
        let name = name.into();
        if let Some(open) = &self.open {
            return Err(FrostError::registry(format!(
                "node '{}:{}' opened while '{}:{}' is still open",
                category, name, open.category, open.name
            )));
        }
        if !is_identifier(&name) {
            return Err(FrostError::registry(format!(
                "invalid node name '{}' in category {}",
                name, category
            )));
        }
        self.open = Some(Draft {
            category,
            name,
            args: Vec::new(),
            fns: Vec::new(),
        });
        Ok(self)
    }

    /// Append an argument slot to the open definition.
    pub fn arg(&mut self, name: &str, ty: ArgType) -> FrostResult<&mut Self> {
        let draft = self.draft_mut("arg")?;
        if draft.args.len() >= MAX_NODEDEF_ARGS {
            return Err(FrostError::registry(format!(
                "'{}:{}' exceeds {} argument slots",
                draft.category, draft.name, MAX_NODEDEF_ARGS
            )));
        }
        if !is_identifier(name) || draft.args.iter().any(|a| a.name == name) {
            return Err(FrostError::registry(format!(
                "invalid or duplicate argument '{}' on '{}:{}'",
                name, draft.category, draft.name
            )));
        }
        draft.args.push(ArgSlot {
            name: name.to_string(),
            ty,
        });
        Ok(self)
    }

    /// Attach a shader template to the open definition, binding its
    /// placeholder to the definition's unique function name.
    pub fn glsl(&mut self, role: FnRole, template: &str) -> FrostResult<&mut Self> {
        let draft = self.draft_mut("glsl")?;
        if !draft.category.allows_role(role) {
            return Err(FrostError::registry(format!(
                "'{}:{}' cannot carry a '{}' template",
                draft.category,
                draft.name,
                role.as_str()
            )));
        }
        if draft.fns.iter().any(|f| f.role == role) {
            return Err(FrostError::registry(format!(
                "'{}:{}' already has a '{}' template",
                draft.category,
                draft.name,
                role.as_str()
            )));
        }
        let markers = template.matches(PLACEHOLDER).count();
        if markers != 1 {
            return Err(FrostError::registry(format!(
                "'{}' template of '{}:{}' must contain exactly one {} marker, found {}",
                role.as_str(),
                draft.category,
                draft.name,
                PLACEHOLDER,
                markers
            )));
        }
        let name = unique_fn_name(draft.category, &draft.name, role);
        let source = template.replacen(PLACEHOLDER, &name, 1);
        draft.fns.push(GlslFn { role, name, source });
        Ok(self)
    }

    /// Close the open definition.
    pub fn endnode(&mut self) -> FrostResult<&mut Self> {
        let draft = self
            .open
            .take()
            .ok_or_else(|| FrostError::registry("endnode without node"))?;
        let primary = draft.category.primary_role();
        if !draft.fns.iter().any(|f| f.role == primary) {
            return Err(FrostError::registry(format!(
                "'{}:{}' is missing its '{}' template",
                draft.category,
                draft.name,
                primary.as_str()
            )));
        }
        self.defs.push(NodeDef {
            category: draft.category,
            name: draft.name,
            args: draft.args,
            fns: draft.fns,
        });
        Ok(self)
    }

    /// Register a complete definition in one call.
    pub fn register(
        &mut self,
        category: Category,
        name: &str,
        args: &[(&str, ArgType)],
        templates: &[(FnRole, &str)],
    ) -> FrostResult<&mut Self> {
        self.node(category, name)?;
        for (arg, ty) in args {
            self.arg(arg, *ty)?;
        }
        for (role, template) in templates {
            self.glsl(*role, template)?;
        }
        self.endnode()
    }

    /// Finalize: sort, reject duplicates, and resolve the union combinator.
    pub fn build(self) -> FrostResult<Registry> {
        if let Some(open) = self.open {
            return Err(FrostError::registry(format!(
                "'{}:{}' was never closed with endnode",
                open.category, open.name
            )));
        }

        let mut defs = self.defs;
        defs.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| a.name.cmp(&b.name))
        });

        if let Some(pair) = defs
            .windows(2)
            .find(|w| w[0].category == w[1].category && w[0].name == w[1].name)
        {
            return Err(FrostError::registry(format!(
                "duplicate definition '{}'",
                pair[0].symbol()
            )));
        }

        let union_index = search(&defs, Category::D2, UNION_NAME).ok_or_else(|| {
            FrostError::registry(format!("missing '{}:{}' definition", Category::D2, UNION_NAME))
        })?;
        if !defs[union_index.0].args.is_empty() {
            return Err(FrostError::registry(format!(
                "'{}:{}' must take no arguments",
                Category::D2,
                UNION_NAME
            )));
        }

        tracing::debug!("node registry finalized with {} definitions", defs.len());
        Ok(Registry { defs, union_index })
    }

    fn draft_mut(&mut self, what: &str) -> FrostResult<&mut Draft> {
        self.open
            .as_mut()
            .ok_or_else(|| FrostError::registry(format!("{} outside of node", what)))
    }
}

fn search(defs: &[NodeDef], category: Category, name: &str) -> Option<DefIndex> {
    defs.binary_search_by(|d| {
        d.category
            .cmp(&category)
            .then_with(|| d.name.as_str().cmp(name))
    })
    .ok()
    .map(DefIndex)
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Immutable, sorted catalog of node definitions.
#[derive(Debug, Clone)]
pub struct Registry {
    defs: Vec<NodeDef>,
    union_index: DefIndex,
}

impl Registry {
    /// Look up a definition by category and name in O(log n).
    pub fn find(&self, category: Category, name: &str) -> Option<DefIndex> {
        search(&self.defs, category, name)
    }

    /// Resolve a `<CATEGORY>:<name>` symbol.
    pub fn resolve_symbol(&self, symbol: &str) -> Option<DefIndex> {
        let (category, name) = symbol.split_once(':')?;
        self.find(Category::parse(category)?, name)
    }

    pub fn get(&self, index: DefIndex) -> Option<&NodeDef> {
        self.defs.get(index.0)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DefIndex, &NodeDef)> {
        self.defs.iter().enumerate().map(|(i, d)| (DefIndex(i), d))
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &NodeDef> {
        self.defs.iter().filter(move |d| d.category == category)
    }

    /// Index of the implicit-union combinator.
    pub fn union_index(&self) -> DefIndex {
        self.union_index
    }

    pub fn union_def(&self) -> &NodeDef {
        &self.defs[self.union_index.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNION_SRC: &str = "float $FN(float d0, float d1)\n{\n\treturn min(d0, d1);\n}\n";
    const SPHERE_SRC: &str = "float $FN(vec3 p, float r)\n{\n\treturn length(p) - r;\n}\n";

    fn minimal() -> RegistryBuilder {
        let mut b = RegistryBuilder::new();
        b.register(Category::D2, "union", &[], &[(FnRole::D2, UNION_SRC)])
            .unwrap();
        b
    }

    #[test]
    fn test_placeholder_is_bound_at_registration() {
        let mut b = minimal();
        b.register(
            Category::Sdf3d,
            "sphere",
            &[("radius", ArgType::Radius)],
            &[(FnRole::Sdf, SPHERE_SRC)],
        )
        .unwrap();
        let reg = b.build().unwrap();
        let def = reg.get(reg.find(Category::Sdf3d, "sphere").unwrap()).unwrap();
        let f = def.glsl_fn(FnRole::Sdf).unwrap();
        assert_eq!(f.name, "SDF3D_sphere");
        assert!(f.source.starts_with("float SDF3D_sphere(vec3 p, float r)"));
        assert!(!f.source.contains(PLACEHOLDER));
    }

    #[test]
    fn test_find_after_sort_resolves_every_definition() {
        let mut b = minimal();
        for name in ["zeta", "alpha", "mid"] {
            b.register(Category::Sdf3d, name, &[], &[(FnRole::Sdf, SPHERE_SRC)])
                .unwrap();
        }
        b.register(Category::Sdf2d, "alpha", &[], &[(FnRole::Sdf, SPHERE_SRC)])
            .unwrap();
        let reg = b.build().unwrap();

        for (cat, name) in [
            (Category::Sdf3d, "zeta"),
            (Category::Sdf3d, "alpha"),
            (Category::Sdf3d, "mid"),
            (Category::Sdf2d, "alpha"),
            (Category::D2, "union"),
        ] {
            let idx = reg.find(cat, name).unwrap();
            let def = reg.get(idx).unwrap();
            assert_eq!(def.category, cat);
            assert_eq!(def.name, name);
        }
        assert!(reg.find(Category::Sdf3d, "missing").is_none());
        assert!(reg.find(Category::D1, "alpha").is_none());

        let order: Vec<_> = reg.iter().map(|(_, d)| (d.category, d.name.clone())).collect();
        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(order, sorted);
    }

    #[test]
    fn test_resolve_symbol() {
        let reg = minimal().build().unwrap();
        assert_eq!(reg.resolve_symbol("D2:union"), Some(reg.union_index()));
        assert_eq!(reg.resolve_symbol("union"), None);
        assert_eq!(reg.resolve_symbol("D9:union"), None);
    }

    #[test]
    fn test_nested_node_rejected() {
        let mut b = RegistryBuilder::new();
        b.node(Category::Sdf3d, "a").unwrap();
        assert!(b.node(Category::Sdf3d, "b").is_err());
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut b = RegistryBuilder::new();
        assert!(b.node(Category::Sdf3d, "").is_err());
    }

    #[test]
    fn test_missing_placeholder_rejected() {
        let mut b = RegistryBuilder::new();
        b.node(Category::Sdf3d, "broken").unwrap();
        let err = b.glsl(FnRole::Sdf, "float f(vec3 p) { return 0.0; }").unwrap_err();
        assert!(err.to_string().contains("exactly one"));
    }

    #[test]
    fn test_wrong_role_rejected() {
        let mut b = RegistryBuilder::new();
        b.node(Category::Sdf3d, "sphere").unwrap();
        assert!(b.glsl(FnRole::D2, UNION_SRC).is_err());
    }

    #[test]
    fn test_missing_primary_template_rejected() {
        let mut b = RegistryBuilder::new();
        b.node(Category::Sdf3d, "empty").unwrap();
        assert!(b.endnode().is_err());
    }

    #[test]
    fn test_duplicate_definition_rejected() {
        let mut b = minimal();
        b.register(Category::Sdf3d, "sphere", &[], &[(FnRole::Sdf, SPHERE_SRC)])
            .unwrap();
        b.register(Category::Sdf3d, "sphere", &[], &[(FnRole::Sdf, SPHERE_SRC)])
            .unwrap();
        let err = b.build().unwrap_err();
        assert!(err.to_string().contains("duplicate definition 'SDF3D:sphere'"));
    }

    #[test]
    fn test_too_many_args_rejected() {
        let mut b = RegistryBuilder::new();
        b.node(Category::Sdf3d, "wide").unwrap();
        for name in ["a", "b", "c", "d"] {
            b.arg(name, ArgType::Scalar).unwrap();
        }
        assert!(b.arg("e", ArgType::Scalar).is_err());
    }

    #[test]
    fn test_missing_union_rejected() {
        let mut b = RegistryBuilder::new();
        b.register(Category::Sdf3d, "sphere", &[], &[(FnRole::Sdf, SPHERE_SRC)])
            .unwrap();
        assert!(b.build().is_err());
    }

    #[test]
    fn test_open_definition_rejected_at_build() {
        let mut b = minimal();
        b.node(Category::Sdf3d, "dangling").unwrap();
        assert!(b.build().is_err());
    }
}
