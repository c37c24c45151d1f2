//! Built-in node definitions.
//!
//! Distance formulas follow the usual closed-form SDF catalog. Every
//! template names its function `$FN`; the registry binds it to a unique name.

use frost_core::FrostResult;

use crate::nodedef::{ArgType, Category, FnRole};
use crate::registry::{Registry, RegistryBuilder};

impl Registry {
    /// The built-in catalog, finalized.
    pub fn builtin() -> FrostResult<Registry> {
        let mut b = RegistryBuilder::new();
        register_sdf3d(&mut b)?;
        register_sdf2d(&mut b)?;
        register_tx3d(&mut b)?;
        register_tx2d(&mut b)?;
        register_volumize(&mut b)?;
        register_d1(&mut b)?;
        register_d2(&mut b)?;
        b.build()
    }
}

fn register_sdf3d(b: &mut RegistryBuilder) -> FrostResult<()> {
    b.node(Category::Sdf3d, "sphere")?
        .arg("radius", ArgType::Radius)?
        .glsl(
            FnRole::Sdf,
            r#"float $FN(vec3 p, float r)
{
	return length(p) - r;
}
"#,
        )?
        .endnode()?;

    b.node(Category::Sdf3d, "box")?
        .arg("size", ArgType::Dim3)?
        .glsl(
            FnRole::Sdf,
            r#"float $FN(vec3 p, vec3 b)
{
	vec3 q = abs(p) - b;
	return length(max(q, 0.0)) + min(max(q.x, max(q.y, q.z)), 0.0);
}
"#,
        )?
        .endnode()?;

    b.node(Category::Sdf3d, "round_box")?
        .arg("size", ArgType::Dim3)?
        .arg("radius", ArgType::Radius)?
        .glsl(
            FnRole::Sdf,
            r#"float $FN(vec3 p, vec3 b, float r)
{
	vec3 q = abs(p) - b + r;
	return length(max(q, 0.0)) + min(max(q.x, max(q.y, q.z)), 0.0) - r;
}
"#,
        )?
        .endnode()?;

    b.node(Category::Sdf3d, "torus")?
        .arg("radii", ArgType::Dim2)?
        .glsl(
            FnRole::Sdf,
            r#"float $FN(vec3 p, vec2 t)
{
	vec2 q = vec2(length(p.xz) - t.x, p.y);
	return length(q) - t.y;
}
"#,
        )?
        .endnode()?;

    b.node(Category::Sdf3d, "capsule")?
        .arg("a", ArgType::Pos3)?
        .arg("b", ArgType::Pos3)?
        .arg("radius", ArgType::Radius)?
        .glsl(
            FnRole::Sdf,
            r#"float $FN(vec3 p, vec3 a, vec3 b, float r)
{
	vec3 pa = p - a;
	vec3 ba = b - a;
	float h = clamp(dot(pa, ba) / dot(ba, ba), 0.0, 1.0);
	return length(pa - ba * h) - r;
}
"#,
        )?
        .endnode()?;

    b.node(Category::Sdf3d, "cylinder")?
        .arg("radius", ArgType::Radius)?
        .arg("height", ArgType::Scalar)?
        .glsl(
            FnRole::Sdf,
            r#"float $FN(vec3 p, float r, float h)
{
	vec2 d = abs(vec2(length(p.xz), p.y)) - vec2(r, h);
	return min(max(d.x, d.y), 0.0) + length(max(d, 0.0));
}
"#,
        )?
        .endnode()?;

    b.node(Category::Sdf3d, "plane")?
        .arg("normal", ArgType::Pos3)?
        .arg("offset", ArgType::Scalar)?
        .glsl(
            FnRole::Sdf,
            r#"float $FN(vec3 p, vec3 n, float h)
{
	return dot(p, normalize(n)) + h;
}
"#,
        )?
        .endnode()?;

    b.node(Category::Sdf3d, "octahedron")?
        .arg("size", ArgType::Scalar)?
        .glsl(
            FnRole::Sdf,
            r#"float $FN(vec3 p, float s)
{
	p = abs(p);
	return (p.x + p.y + p.z - s) * 0.57735027;
}
"#,
        )?
        .endnode()?;

    Ok(())
}

fn register_sdf2d(b: &mut RegistryBuilder) -> FrostResult<()> {
    b.node(Category::Sdf2d, "circle")?
        .arg("radius", ArgType::Radius)?
        .glsl(
            FnRole::Sdf,
            r#"float $FN(vec2 p, float r)
{
	return length(p) - r;
}
"#,
        )?
        .endnode()?;

    b.node(Category::Sdf2d, "box")?
        .arg("size", ArgType::Dim2)?
        .glsl(
            FnRole::Sdf,
            r#"float $FN(vec2 p, vec2 b)
{
	vec2 d = abs(p) - b;
	return length(max(d, 0.0)) + min(max(d.x, d.y), 0.0);
}
"#,
        )?
        .endnode()?;

    b.node(Category::Sdf2d, "segment")?
        .arg("a", ArgType::Pos2)?
        .arg("b", ArgType::Pos2)?
        .glsl(
            FnRole::Sdf,
            r#"float $FN(vec2 p, vec2 a, vec2 b)
{
	vec2 pa = p - a;
	vec2 ba = b - a;
	float h = clamp(dot(pa, ba) / dot(ba, ba), 0.0, 1.0);
	return length(pa - ba * h);
}
"#,
        )?
        .endnode()?;

    b.node(Category::Sdf2d, "hexagon")?
        .arg("radius", ArgType::Radius)?
        .glsl(
            FnRole::Sdf,
            r#"float $FN(vec2 p, float r)
{
	const vec3 k = vec3(-0.866025404, 0.5, 0.577350269);
	p = abs(p);
	p -= 2.0 * min(dot(k.xy, p), 0.0) * k.xy;
	p -= vec2(clamp(p.x, -k.z * r, k.z * r), r);
	return length(p) * sign(p.y);
}
"#,
        )?
        .endnode()?;

    b.node(Category::Sdf2d, "triangle")?
        .arg("radius", ArgType::Radius)?
        .glsl(
            FnRole::Sdf,
            r#"float $FN(vec2 p, float r)
{
	const float k = 1.732050808;
	p.x = abs(p.x) - r;
	p.y = p.y + r / k;
	if (p.x + k * p.y > 0.0) p = vec2(p.x - k * p.y, -k * p.x - p.y) / 2.0;
	p.x -= clamp(p.x, -2.0 * r, 0.0);
	return -length(p) * sign(p.y);
}
"#,
        )?
        .endnode()?;

    Ok(())
}

fn register_tx3d(b: &mut RegistryBuilder) -> FrostResult<()> {
    b.node(Category::Tx3d, "translate")?
        .arg("translation", ArgType::Pos3)?
        .glsl(
            FnRole::Tx,
            r#"vec3 $FN(vec3 p, vec3 t)
{
	return p - t;
}
"#,
        )?
        .endnode()?;

    b.node(Category::Tx3d, "scale")?
        .arg("factor", ArgType::Scalar)?
        .glsl(
            FnRole::Tx,
            r#"vec3 $FN(vec3 p, float s)
{
	return p / s;
}
"#,
        )?
        .glsl(
            FnRole::D1,
            r#"float $FN(vec3 p, float d, float s)
{
	return d * s;
}
"#,
        )?
        .endnode()?;

    // angles in radians, applied X then Y then Z
    b.node(Category::Tx3d, "rotate")?
        .arg("angles", ArgType::Pos3)?
        .glsl(
            FnRole::Tx,
            r#"vec3 $FN(vec3 p, vec3 a)
{
	vec3 c = cos(a);
	vec3 s = sin(a);
	p = vec3(p.x, c.x * p.y + s.x * p.z, -s.x * p.y + c.x * p.z);
	p = vec3(c.y * p.x - s.y * p.z, p.y, s.y * p.x + c.y * p.z);
	return vec3(c.z * p.x + s.z * p.y, -s.z * p.x + c.z * p.y, p.z);
}
"#,
        )?
        .endnode()?;

    b.node(Category::Tx3d, "repeat")?
        .arg("period", ArgType::Dim3)?
        .glsl(
            FnRole::Tx,
            r#"vec3 $FN(vec3 p, vec3 c)
{
	return p - c * round(p / c);
}
"#,
        )?
        .endnode()?;

    b.node(Category::Tx3d, "twist")?
        .arg("rate", ArgType::Scalar)?
        .glsl(
            FnRole::Tx,
            r#"vec3 $FN(vec3 p, float k)
{
	float c = cos(k * p.y);
	float s = sin(k * p.y);
	return vec3(c * p.x - s * p.z, p.y, s * p.x + c * p.z);
}
"#,
        )?
        .endnode()?;

    b.node(Category::Tx3d, "elongate")?
        .arg("extent", ArgType::Dim3)?
        .glsl(
            FnRole::Tx,
            r#"vec3 $FN(vec3 p, vec3 h)
{
	return p - clamp(p, -h, h);
}
"#,
        )?
        .endnode()?;

    Ok(())
}

fn register_tx2d(b: &mut RegistryBuilder) -> FrostResult<()> {
    b.node(Category::Tx2d, "translate")?
        .arg("translation", ArgType::Pos2)?
        .glsl(
            FnRole::Tx,
            r#"vec2 $FN(vec2 p, vec2 t)
{
	return p - t;
}
"#,
        )?
        .endnode()?;

    b.node(Category::Tx2d, "scale")?
        .arg("factor", ArgType::Scalar)?
        .glsl(
            FnRole::Tx,
            r#"vec2 $FN(vec2 p, float s)
{
	return p / s;
}
"#,
        )?
        .glsl(
            FnRole::D1,
            r#"float $FN(vec2 p, float d, float s)
{
	return d * s;
}
"#,
        )?
        .endnode()?;

    b.node(Category::Tx2d, "rotate")?
        .arg("angle", ArgType::Scalar)?
        .glsl(
            FnRole::Tx,
            r#"vec2 $FN(vec2 p, float a)
{
	float c = cos(a);
	float s = sin(a);
	return vec2(c * p.x + s * p.y, -s * p.x + c * p.y);
}
"#,
        )?
        .endnode()?;

    b.node(Category::Tx2d, "repeat")?
        .arg("period", ArgType::Dim2)?
        .glsl(
            FnRole::Tx,
            r#"vec2 $FN(vec2 p, vec2 c)
{
	return p - c * round(p / c);
}
"#,
        )?
        .endnode()?;

    Ok(())
}

fn register_volumize(b: &mut RegistryBuilder) -> FrostResult<()> {
    b.node(Category::Volumize, "extrude")?
        .arg("height", ArgType::Scalar)?
        .glsl(
            FnRole::Tx,
            r#"vec2 $FN(vec3 p, float h)
{
	return p.xy;
}
"#,
        )?
        .glsl(
            FnRole::D1,
            r#"float $FN(vec3 p, float d, float h)
{
	vec2 w = vec2(d, abs(p.z) - h);
	return min(max(w.x, w.y), 0.0) + length(max(w, 0.0));
}
"#,
        )?
        .endnode()?;

    b.node(Category::Volumize, "revolve")?
        .arg("offset", ArgType::Scalar)?
        .glsl(
            FnRole::Tx,
            r#"vec2 $FN(vec3 p, float o)
{
	return vec2(length(p.xz) - o, p.y);
}
"#,
        )?
        .endnode()?;

    Ok(())
}

fn register_d1(b: &mut RegistryBuilder) -> FrostResult<()> {
    b.node(Category::D1, "round")?
        .arg("radius", ArgType::Radius)?
        .glsl(
            FnRole::D1,
            r#"float $FN(float d, float r)
{
	return d - r;
}
"#,
        )?
        .endnode()?;

    b.node(Category::D1, "onion")?
        .arg("thickness", ArgType::Scalar)?
        .glsl(
            FnRole::D1,
            r#"float $FN(float d, float t)
{
	return abs(d) - t;
}
"#,
        )?
        .endnode()?;

    Ok(())
}

fn register_d2(b: &mut RegistryBuilder) -> FrostResult<()> {
    b.node(Category::D2, "union")?
        .glsl(
            FnRole::D2,
            r#"float $FN(float d0, float d1)
{
	return min(d0, d1);
}
"#,
        )?
        .endnode()?;

    // removes d1 from d0, so a left fold keeps the first child
    b.node(Category::D2, "subtract")?
        .glsl(
            FnRole::D2,
            r#"float $FN(float d0, float d1)
{
	return max(d0, -d1);
}
"#,
        )?
        .endnode()?;

    b.node(Category::D2, "intersect")?
        .glsl(
            FnRole::D2,
            r#"float $FN(float d0, float d1)
{
	return max(d0, d1);
}
"#,
        )?
        .endnode()?;

    b.node(Category::D2, "smooth_union")?
        .arg("k", ArgType::Scalar)?
        .glsl(
            FnRole::D2,
            r#"float $FN(float d0, float d1, float k)
{
	float h = clamp(0.5 + 0.5 * (d1 - d0) / k, 0.0, 1.0);
	return mix(d1, d0, h) - k * h * (1.0 - h);
}
"#,
        )?
        .endnode()?;

    b.node(Category::D2, "smooth_subtract")?
        .arg("k", ArgType::Scalar)?
        .glsl(
            FnRole::D2,
            r#"float $FN(float d0, float d1, float k)
{
	float h = clamp(0.5 - 0.5 * (d0 + d1) / k, 0.0, 1.0);
	return mix(d0, -d1, h) + k * h * (1.0 - h);
}
"#,
        )?
        .endnode()?;

    b.node(Category::D2, "smooth_intersect")?
        .arg("k", ArgType::Scalar)?
        .glsl(
            FnRole::D2,
            r#"float $FN(float d0, float d1, float k)
{
	float h = clamp(0.5 - 0.5 * (d1 - d0) / k, 0.0, 1.0);
	return mix(d1, d0, h) + k * h * (1.0 - h);
}
"#,
        )?
        .endnode()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_builds() {
        let reg = Registry::builtin().unwrap();
        assert!(reg.len() >= 30);
        assert_eq!(reg.union_def().name, "union");
        assert_eq!(reg.union_def().fn_name(FnRole::D2), Some("D2_union"));
    }

    #[test]
    fn test_builtin_function_names_are_unique() {
        let reg = Registry::builtin().unwrap();
        let mut names: Vec<&str> = reg
            .iter()
            .flat_map(|(_, d)| d.fns.iter().map(|f| f.name.as_str()))
            .collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_same_name_in_two_categories() {
        let reg = Registry::builtin().unwrap();
        let b3 = reg.find(Category::Sdf3d, "box").unwrap();
        let b2 = reg.find(Category::Sdf2d, "box").unwrap();
        assert_ne!(b3, b2);
        assert_eq!(reg.get(b3).unwrap().fn_name(FnRole::Sdf), Some("SDF3D_box"));
        assert_eq!(reg.get(b2).unwrap().fn_name(FnRole::Sdf), Some("SDF2D_box"));
    }

    #[test]
    fn test_scale_has_post_processor() {
        let reg = Registry::builtin().unwrap();
        let scale = reg.get(reg.resolve_symbol("TX3D:scale").unwrap()).unwrap();
        assert_eq!(scale.fn_name(FnRole::D1), Some("TX3D_scale_d1"));
        let translate = reg.get(reg.resolve_symbol("TX3D:translate").unwrap()).unwrap();
        assert!(translate.glsl_fn(FnRole::D1).is_none());
    }

    #[test]
    fn test_every_category_is_populated() {
        let reg = Registry::builtin().unwrap();
        for cat in Category::ALL {
            assert!(reg.by_category(cat).next().is_some(), "no definitions for {}", cat);
        }
    }
}
