//! WGSL render path generated from the scene constants.
//!
//! [`fragment_source`] substitutes the constants from [`crate::scene`] into
//! a WGSL template, so the GPU path cannot drift from the CPU reference.
//! The uniform block here is mirrored field for field by the renderer's
//! uniform struct.

use glam::{Vec2, Vec3};

use crate::scene;

/// Formats an `f32` as a WGSL literal. Debug formatting always keeps a
/// decimal point, which WGSL needs to type the literal as f32.
fn lit(value: f32) -> String {
    format!("{value:?}")
}

fn lit2(value: Vec2) -> String {
    format!("vec2<f32>({}, {})", lit(value.x), lit(value.y))
}

fn lit3(value: Vec3) -> String {
    format!(
        "vec3<f32>({}, {}, {})",
        lit(value.x),
        lit(value.y),
        lit(value.z)
    )
}

/// Vertex stage: a single triangle large enough to cover clip space.
pub const VERTEX: &str = r#"@vertex
fn vs_main(@builtin(vertex_index) index: u32) -> @builtin(position) vec4<f32> {
    var positions = array<vec2<f32>, 3>(
        vec2<f32>(-1.0, -3.0),
        vec2<f32>(3.0, 1.0),
        vec2<f32>(-1.0, 1.0),
    );
    let pos = positions[index];
    return vec4<f32>(pos, 0.0, 1.0);
}
"#;

const FRAGMENT_TEMPLATE: &str = r#"struct SceneParams {
    resolution: vec2<f32>,
    time: f32,
    _pad0: f32,
    pointer: vec2<f32>,
    _pad1: vec2<f32>,
};

@group(0) @binding(0) var<uniform> params: SceneParams;

fn smooth_min(a: f32, b: f32, k: f32) -> f32 {
    let h = max(k - abs(a - b), 0.0) / k;
    return min(a, b) - h * h * k * 0.25;
}

fn sd_circle(p: vec2<f32>, c: vec2<f32>, r: f32) -> f32 {
    return length(p - c) - r;
}

fn soft_step(e0: f32, e1: f32, x: f32) -> f32 {
    let t = clamp((x - e0) / (e1 - e0), 0.0, 1.0);
    return t * t * (3.0 - 2.0 * t);
}

@fragment
fn fs_main(@builtin(position) position: vec4<f32>) -> @location(0) vec4<f32> {
    // The rasterizer hands us top-left-origin pixel coordinates; the field
    // works bottom-left like the CPU reference.
    let frag = vec2<f32>(position.x, params.resolution.y - position.y);
    let aspect = params.resolution.x / params.resolution.y;
    var uv = (frag / params.resolution) * 2.0 - vec2<f32>(1.0, 1.0);
    uv.x = uv.x * aspect;
    let p = uv;

    let t = params.time * @PHASE_RATE@;

    let c3 = vec2<f32>(
        sin(t * @OA_FREQ_X@ + @OA_PHASE_X@) * @OA_SWING_X@,
        cos(t * @OA_FREQ_Y@ + @OA_PHASE_Y@) * @OA_SWING_Y@,
    );
    let c4 = vec2<f32>(
        sin(t * @OB_FREQ_X@ + @OB_PHASE_X@) * @OB_SWING_X@,
        cos(t * @OB_FREQ_Y@ + @OB_PHASE_Y@) * @OB_SWING_Y@,
    );
    let m0 = params.pointer * 2.0 - vec2<f32>(1.0, 1.0);
    let m = vec2<f32>(m0.x * aspect, -m0.y);

    var d = @FIELD_SEED@;
    d = smooth_min(d, sd_circle(p, @ANCHOR_A@, @ANCHOR_A_RADIUS@), @ANCHOR_BLEND@);
    d = smooth_min(d, sd_circle(p, @ANCHOR_B@, @ANCHOR_B_RADIUS@), @ANCHOR_BLEND@);
    d = smooth_min(d, sd_circle(p, c3, @OA_RADIUS@), @MOBILE_BLEND@);
    d = smooth_min(d, sd_circle(p, c4, @OB_RADIUS@), @MOBILE_BLEND@);
    d = smooth_min(d, sd_circle(p, m, @POINTER_RADIUS@), @MOBILE_BLEND@);

    let mask = soft_step(@EDGE@, -@EDGE@, d);
    let glow = exp(-abs(d) * @GLOW_FALLOFF@) * @GLOW_STRENGTH@;

    let mix_v = clamp((p.y + 1.0) * 0.5, 0.0, 1.0);
    let interior = mix(@COLOR_LIME@, @COLOR_SEA@, mix_v) * @INTERIOR_BRIGHTNESS@;

    var color = mix(@BACKGROUND@, interior, mask);
    color = color + glow * mix(@COLOR_LIME@, @COLOR_SEA@, @GLOW_TINT_MIX@);
    return vec4<f32>(color, 1.0);
}
"#;

/// Produces the fragment shader consumed by the production pipeline.
pub fn fragment_source() -> String {
    FRAGMENT_TEMPLATE
        .replace("@PHASE_RATE@", &lit(scene::PHASE_RATE))
        .replace("@OA_FREQ_X@", &lit(scene::ORBITER_A_FREQ.x))
        .replace("@OA_FREQ_Y@", &lit(scene::ORBITER_A_FREQ.y))
        .replace("@OA_PHASE_X@", &lit(0.0))
        .replace("@OA_PHASE_Y@", &lit(0.0))
        .replace("@OA_SWING_X@", &lit(scene::ORBITER_A_SWING.x))
        .replace("@OA_SWING_Y@", &lit(scene::ORBITER_A_SWING.y))
        .replace("@OA_RADIUS@", &lit(scene::ORBITER_A_RADIUS))
        .replace("@OB_FREQ_X@", &lit(scene::ORBITER_B_FREQ.x))
        .replace("@OB_FREQ_Y@", &lit(scene::ORBITER_B_FREQ.y))
        .replace("@OB_PHASE_X@", &lit(scene::ORBITER_B_PHASE.x))
        .replace("@OB_PHASE_Y@", &lit(scene::ORBITER_B_PHASE.y))
        .replace("@OB_SWING_X@", &lit(scene::ORBITER_B_SWING.x))
        .replace("@OB_SWING_Y@", &lit(scene::ORBITER_B_SWING.y))
        .replace("@OB_RADIUS@", &lit(scene::ORBITER_B_RADIUS))
        .replace("@FIELD_SEED@", &lit(scene::FIELD_SEED))
        .replace("@ANCHOR_A@", &lit2(scene::ANCHOR_TOP_LEFT))
        .replace("@ANCHOR_A_RADIUS@", &lit(scene::ANCHOR_TOP_LEFT_RADIUS))
        .replace("@ANCHOR_B@", &lit2(scene::ANCHOR_BOTTOM_RIGHT))
        .replace("@ANCHOR_B_RADIUS@", &lit(scene::ANCHOR_BOTTOM_RIGHT_RADIUS))
        .replace("@ANCHOR_BLEND@", &lit(scene::ANCHOR_BLEND))
        .replace("@MOBILE_BLEND@", &lit(scene::MOBILE_BLEND))
        .replace("@POINTER_RADIUS@", &lit(scene::POINTER_RADIUS))
        .replace("@EDGE@", &lit(scene::EDGE))
        .replace("@GLOW_FALLOFF@", &lit(scene::GLOW_FALLOFF))
        .replace("@GLOW_STRENGTH@", &lit(scene::GLOW_STRENGTH))
        .replace("@COLOR_LIME@", &lit3(scene::COLOR_LIME))
        .replace("@COLOR_SEA@", &lit3(scene::COLOR_SEA))
        .replace("@BACKGROUND@", &lit3(scene::BACKGROUND))
        .replace("@INTERIOR_BRIGHTNESS@", &lit(scene::INTERIOR_BRIGHTNESS))
        .replace("@GLOW_TINT_MIX@", &lit(scene::GLOW_TINT_MIX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitution_leaves_no_placeholders_behind() {
        let source = fragment_source();
        // Attribute markers like `@fragment` survive; template markers are
        // always uppercase and bracketed by `@`.
        for token in source.split('@').skip(1) {
            assert!(
                !token.starts_with(|c: char| c.is_ascii_uppercase()),
                "unsubstituted placeholder near '@{token}'"
            );
        }
    }

    #[test]
    fn fragment_embeds_the_scene_constants() {
        let source = fragment_source();
        assert!(source.contains("0.6784"));
        assert!(source.contains("0.0157"));
        assert!(source.contains("var d = 10.0;"));
        assert!(source.contains("soft_step(0.003, -0.003, d)"));
        assert!(source.contains("* 11.0) * 0.6"));
    }

    #[test]
    fn generated_fragment_parses_and_validates() {
        let module = naga::front::wgsl::parse_str(&fragment_source()).expect("WGSL parse");
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::default(),
        )
        .validate(&module)
        .expect("WGSL validation");
    }

    #[test]
    fn vertex_stage_parses_and_validates() {
        let module = naga::front::wgsl::parse_str(VERTEX).expect("WGSL parse");
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::default(),
        )
        .validate(&module)
        .expect("WGSL validation");
    }
}
