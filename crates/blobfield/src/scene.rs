//! The metaball field and its shading.
//!
//! Five circles — two fixed anchors, two orbiters, one pointer tracker —
//! folded into a single signed distance with a smooth minimum, then shaded
//! as a soft interior gradient plus an exponential glow around the zero
//! level-set. `shade` is pure and total: every pixel of every frame is an
//! independent evaluation of it.

use glam::{vec2, Vec2, Vec3};

/// Scale from elapsed seconds to animation phase.
pub const PHASE_RATE: f32 = 0.35;

/// Seed of the smooth-minimum fold.
pub const FIELD_SEED: f32 = 10.0;
/// Blend radius used when folding in the two corner anchors.
pub const ANCHOR_BLEND: f32 = 0.7;
/// Blend radius used when folding in the orbiters and the pointer ball.
pub const MOBILE_BLEND: f32 = 0.6;

/// Half-width of the soft edge between blob interior and exterior.
pub const EDGE: f32 = 0.003;
/// Exponential falloff rate of the glow around the zero level-set.
pub const GLOW_FALLOFF: f32 = 11.0;
/// Overall glow strength.
pub const GLOW_STRENGTH: f32 = 0.6;

/// Anchor blob pinned near the top-left corner.
pub const ANCHOR_TOP_LEFT: Vec2 = Vec2::new(-1.0, 0.9);
pub const ANCHOR_TOP_LEFT_RADIUS: f32 = 0.45;
/// Anchor blob pinned near the bottom-right corner.
pub const ANCHOR_BOTTOM_RIGHT: Vec2 = Vec2::new(1.0, -0.9);
pub const ANCHOR_BOTTOM_RIGHT_RADIUS: f32 = 0.4;

/// First orbiter: frequency, swing, radius. Its phase offsets are zero.
pub const ORBITER_A_FREQ: Vec2 = Vec2::new(1.1, 1.3);
pub const ORBITER_A_SWING: Vec2 = Vec2::new(0.6, 0.5);
pub const ORBITER_A_RADIUS: f32 = 0.35;

/// Second orbiter runs slower on y and starts mid-swing.
pub const ORBITER_B_FREQ: Vec2 = Vec2::new(1.7, 0.9);
pub const ORBITER_B_PHASE: Vec2 = Vec2::new(1.0, 2.0);
pub const ORBITER_B_SWING: Vec2 = Vec2::new(0.8, 0.7);
pub const ORBITER_B_RADIUS: f32 = 0.3;

/// Radius of the blob that trails the pointer.
pub const POINTER_RADIUS: f32 = 0.1;

/// Near-black green backdrop.
pub const BACKGROUND: Vec3 = Vec3::new(0.01, 0.04, 0.02);
/// Gradient endpoint at the bottom of the viewport (#ADFD6F).
pub const COLOR_LIME: Vec3 = Vec3::new(0.6784, 0.9922, 0.4353);
/// Gradient endpoint at the top of the viewport (#04D28D).
pub const COLOR_SEA: Vec3 = Vec3::new(0.0157, 0.8235, 0.5529);
/// Brightness scale applied to the interior gradient.
pub const INTERIOR_BRIGHTNESS: f32 = 0.4;
/// Gradient mix used to tint the glow.
pub const GLOW_TINT_MIX: f32 = 0.3;

/// Smooth minimum: `min(a, b)` with a polynomial blend of radius `k`.
pub fn smooth_min(a: f32, b: f32, k: f32) -> f32 {
    let h = (k - (a - b).abs()).max(0.0) / k;
    a.min(b) - h * h * k * 0.25
}

/// Signed distance from `p` to a circle of radius `r` centered at `c`.
pub fn circle(p: Vec2, c: Vec2, r: f32) -> f32 {
    (p - c).length() - r
}

/// Hermite ramp between `e0` and `e1`; reversed edges flip the ramp, which
/// the interior mask relies on.
pub fn smoothstep(e0: f32, e1: f32, x: f32) -> f32 {
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn orbit(t: f32, freq: Vec2, phase: Vec2, swing: Vec2) -> Vec2 {
    vec2(
        (t * freq.x + phase.x).sin() * swing.x,
        (t * freq.y + phase.y).cos() * swing.y,
    )
}

/// Center of the first orbiter at animation phase `t`.
pub fn orbiter_a(t: f32) -> Vec2 {
    orbit(t, ORBITER_A_FREQ, Vec2::ZERO, ORBITER_A_SWING)
}

/// Center of the second orbiter at animation phase `t`.
pub fn orbiter_b(t: f32) -> Vec2 {
    orbit(t, ORBITER_B_FREQ, ORBITER_B_PHASE, ORBITER_B_SWING)
}

/// Maps the normalized pointer into the shader's aspect-corrected clip
/// space. The y axis flips because pointer coordinates grow downward while
/// uv grows upward.
pub fn pointer_center(pointer: Vec2, aspect: f32) -> Vec2 {
    let m = pointer * 2.0 - Vec2::ONE;
    vec2(m.x * aspect, -m.y)
}

/// Combined signed distance of all five blobs at `p`.
///
/// The fold is pairwise left to right, so its order is part of the field's
/// shape: anchors first with the wider blend radius, then the orbiters and
/// the pointer ball.
pub fn field_distance(p: Vec2, t: f32, pointer_ball: Vec2) -> f32 {
    let mut d = FIELD_SEED;
    d = smooth_min(
        d,
        circle(p, ANCHOR_TOP_LEFT, ANCHOR_TOP_LEFT_RADIUS),
        ANCHOR_BLEND,
    );
    d = smooth_min(
        d,
        circle(p, ANCHOR_BOTTOM_RIGHT, ANCHOR_BOTTOM_RIGHT_RADIUS),
        ANCHOR_BLEND,
    );
    d = smooth_min(d, circle(p, orbiter_a(t), ORBITER_A_RADIUS), MOBILE_BLEND);
    d = smooth_min(d, circle(p, orbiter_b(t), ORBITER_B_RADIUS), MOBILE_BLEND);
    d = smooth_min(d, circle(p, pointer_ball, POINTER_RADIUS), MOBILE_BLEND);
    d
}

/// Shades one pixel.
///
/// `frag_coord` is in device pixels with the origin at the bottom-left,
/// `resolution` is the effective device-pixel viewport, `time` the elapsed
/// seconds, and `pointer` the normalized (unclamped) pointer position.
pub fn shade(frag_coord: Vec2, resolution: Vec2, time: f32, pointer: Vec2) -> Vec3 {
    let aspect = resolution.x / resolution.y;
    let mut uv = (frag_coord / resolution) * 2.0 - Vec2::ONE;
    uv.x *= aspect;
    let p = uv;

    let t = time * PHASE_RATE;
    let d = field_distance(p, t, pointer_center(pointer, aspect));

    let mask = smoothstep(EDGE, -EDGE, d);
    let glow = (-d.abs() * GLOW_FALLOFF).exp() * GLOW_STRENGTH;

    let mix_v = ((p.y + 1.0) * 0.5).clamp(0.0, 1.0);
    let interior = COLOR_LIME.lerp(COLOR_SEA, mix_v) * INTERIOR_BRIGHTNESS;

    let mut color = BACKGROUND.lerp(interior, mask);
    color += glow * COLOR_LIME.lerp(COLOR_SEA, GLOW_TINT_MIX);
    color
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smooth_min_stays_at_or_below_the_hard_minimum() {
        let samples = [-2.0_f32, -0.45, -0.1, 0.0, 0.003, 0.5, 1.0, 2.0, 10.0];
        for &a in &samples {
            for &b in &samples {
                for k in [0.1_f32, MOBILE_BLEND, ANCHOR_BLEND, 1.5] {
                    let blended = smooth_min(a, b, k);
                    assert!(
                        blended <= a.min(b) + 1e-6,
                        "smin({a}, {b}, {k}) = {blended} exceeded min"
                    );
                }
            }
        }
    }

    #[test]
    fn smooth_min_approaches_the_hard_minimum_as_the_blend_shrinks() {
        for (a, b) in [(0.3_f32, 0.31_f32), (-0.2, -0.2), (1.0, -1.0)] {
            let blended = smooth_min(a, b, 1e-4);
            assert!((blended - a.min(b)).abs() < 1e-4);
        }
    }

    #[test]
    fn soft_edge_mask_ramps_across_the_boundary() {
        assert!((smoothstep(EDGE, -EDGE, -EDGE) - 1.0).abs() < 1e-6);
        assert!((smoothstep(EDGE, -EDGE, 0.0) - 0.5).abs() < 1e-6);
        assert!(smoothstep(EDGE, -EDGE, EDGE).abs() < 1e-6);
        assert!((smoothstep(EDGE, -EDGE, -1.0) - 1.0).abs() < 1e-6);
        assert!(smoothstep(EDGE, -EDGE, 1.0).abs() < 1e-6);
    }

    #[test]
    fn orbiters_start_from_their_seed_positions() {
        assert_eq!(orbiter_a(0.0), vec2(0.0, 0.5));
        let expected = vec2(1.0_f32.sin() * 0.8, 2.0_f32.cos() * 0.7);
        assert_eq!(orbiter_b(0.0), expected);
    }

    #[test]
    fn pointer_at_origin_lands_in_the_upper_left_of_clip_space() {
        let aspect = 1920.0 / 1080.0;
        assert_eq!(pointer_center(Vec2::ZERO, aspect), vec2(-aspect, 1.0));
        assert_eq!(pointer_center(vec2(1.0, 1.0), aspect), vec2(aspect, -1.0));
        assert_eq!(pointer_center(vec2(0.5, 0.5), aspect), vec2(0.0, -0.0));
    }

    #[test]
    fn anchor_interior_reads_the_anchor_depth() {
        // At t=0 with the pointer in the far corner, no other circle blends
        // into the top-left anchor, so its center reads exactly -radius.
        let pointer_ball = pointer_center(vec2(1.0, 1.0), 1.0);
        let d = field_distance(ANCHOR_TOP_LEFT, 0.0, pointer_ball);
        assert!((d + ANCHOR_TOP_LEFT_RADIUS).abs() < 1e-6);
    }

    #[test]
    fn deep_interior_shades_to_the_gradient_color() {
        let resolution = vec2(1000.0, 1000.0);
        // frag (0, 950) maps to p = (-1, 0.9), the top-left anchor center.
        let color = shade(vec2(0.0, 950.0), resolution, 0.0, vec2(1.0, 1.0));
        let mix_v = (0.9_f32 + 1.0) * 0.5;
        let expected = COLOR_LIME.lerp(COLOR_SEA, mix_v) * INTERIOR_BRIGHTNESS;
        for (got, want) in color.to_array().into_iter().zip(expected.to_array()) {
            assert!((got - want).abs() < 5e-3, "channel {got} vs {want}");
        }
    }

    #[test]
    fn far_field_shades_to_the_backdrop() {
        let resolution = vec2(1000.0, 1000.0);
        // The bottom-left corner sits more than a unit away from every blob
        // at t=0 with the pointer parked bottom-right.
        let color = shade(vec2(0.5, 0.5), resolution, 0.0, vec2(1.0, 1.0));
        for (got, want) in color.to_array().into_iter().zip(BACKGROUND.to_array()) {
            assert!((got - want).abs() < 1e-4, "channel {got} vs {want}");
        }
    }

    #[test]
    fn shading_is_deterministic_for_identical_inputs() {
        let resolution = vec2(1280.0, 720.0);
        let frag = vec2(613.5, 240.5);
        let pointer = vec2(0.37, 1.18);
        let first = shade(frag, resolution, 12.75, pointer);
        let second = shade(frag, resolution, 12.75, pointer);
        for (a, b) in first.to_array().into_iter().zip(second.to_array()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn proportional_resizes_leave_the_shaded_point_unchanged() {
        // Same physical point, same aspect ratio, doubled pixel density.
        let small = shade(vec2(240.0, 450.0), vec2(800.0, 600.0), 3.0, vec2(0.5, 0.5));
        let large = shade(vec2(480.0, 900.0), vec2(1600.0, 1200.0), 3.0, vec2(0.5, 0.5));
        for (a, b) in small.to_array().into_iter().zip(large.to_array()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }
}
