//! CPU rasterization of the reference shader.
//!
//! Still-frame export and snapshot tests run here so they do not need a GPU
//! adapter. Rows come out top-first (the usual image layout) while the
//! shader itself samples bottom-left-origin pixel centers, matching what
//! the hardware path rasterizes.

use glam::{vec2, Vec2};

use crate::scene;

/// Renders a full frame into tightly packed RGBA8, row-major, top row
/// first. Alpha is always opaque; transparency is a property of the surface
/// clear, not of shaded content.
pub fn render_frame(width: u32, height: u32, time: f32, pointer: Vec2) -> Vec<u8> {
    let resolution = vec2(width as f32, height as f32);
    let mut data = Vec::with_capacity(width as usize * height as usize * 4);
    for row in 0..height {
        let y = (height - 1 - row) as f32 + 0.5;
        for col in 0..width {
            let frag = vec2(col as f32 + 0.5, y);
            let color = scene::shade(frag, resolution, time, pointer);
            let [r, g, b] = color.to_array().map(quantize);
            data.extend_from_slice(&[r, g, b, u8::MAX]);
        }
    }
    data
}

fn quantize(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDTH: u32 = 256;
    const HEIGHT: u32 = 256;

    fn pixel(data: &[u8], col: u32, row: u32) -> [u8; 4] {
        let offset = ((row * WIDTH + col) * 4) as usize;
        data[offset..offset + 4].try_into().unwrap()
    }

    #[test]
    fn frame_buffer_has_the_expected_shape() {
        let data = render_frame(WIDTH, HEIGHT, 0.0, vec2(1.0, 1.0));
        assert_eq!(data.len(), (WIDTH * HEIGHT * 4) as usize);
        assert!(data.chunks_exact(4).all(|px| px[3] == u8::MAX));
    }

    #[test]
    fn rendering_the_same_frame_twice_is_bit_identical() {
        let first = render_frame(64, 48, 1.5, vec2(0.25, 0.75));
        let second = render_frame(64, 48, 1.5, vec2(0.25, 0.75));
        assert_eq!(first, second);
    }

    #[test]
    fn rows_are_flipped_into_image_order() {
        let data = render_frame(WIDTH, HEIGHT, 0.0, vec2(1.0, 1.0));
        // Row 20 of the image is shader row 235 (both counted from zero).
        let frag = vec2(10.5, (HEIGHT - 1 - 20) as f32 + 0.5);
        let expected = scene::shade(
            frag,
            vec2(WIDTH as f32, HEIGHT as f32),
            0.0,
            vec2(1.0, 1.0),
        );
        let expected = expected.to_array().map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        let got = pixel(&data, 10, 20);
        assert_eq!([got[0], got[1], got[2]], expected);
    }

    #[test]
    fn seed_frame_shows_backdrop_and_blob_where_expected() {
        // time=0, pointer parked bottom-right: the bottom-left corner is far
        // from every blob, while the first orbiter sits at (0, 0.5).
        let data = render_frame(WIDTH, HEIGHT, 0.0, vec2(1.0, 1.0));

        let corner = pixel(&data, 0, HEIGHT - 1);
        assert_eq!(corner, [3, 10, 5, 255]);

        // uv (0, 0.5) maps to column 128, image row 64.
        let orbiter = pixel(&data, WIDTH / 2, HEIGHT / 4);
        assert!(orbiter[1] > 50, "orbiter interior should be visibly green");
        assert!(orbiter[1] > corner[1]);
    }
}
