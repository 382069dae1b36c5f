//! Coverage bitmap to single-channel signed distance field.

/// Converts an 8-bit coverage bitmap into a signed distance field padded by
/// `spread` pixels on every side.
///
/// Output texels encode `0.5 + signed_distance / (2 * spread)`, clamped to
/// `0..=255`; 128 sits on the outline, higher values are inside.
/// Returns the padded bitmap and its dimensions.
pub(crate) fn coverage_to_sdf(
    coverage: &[u8],
    width: usize,
    height: usize,
    spread: usize,
) -> (Vec<u8>, usize, usize) {
    let out_w = width + spread * 2;
    let out_h = height + spread * 2;
    let mut out = vec![0u8; out_w * out_h];
    if spread == 0 {
        return (out, out_w, out_h);
    }

    let inside = |x: isize, y: isize| -> bool {
        if x < 0 || y < 0 || x >= width as isize || y >= height as isize {
            return false;
        }
        coverage[y as usize * width + x as usize] >= 128
    };

    let reach = spread as isize;
    let max_dist = spread as f32;

    for oy in 0..out_h {
        for ox in 0..out_w {
            let x = ox as isize - reach;
            let y = oy as isize - reach;
            let here = inside(x, y);

            let mut best = f32::MAX;
            for dy in -reach..=reach {
                for dx in -reach..=reach {
                    if inside(x + dx, y + dy) != here {
                        let d = ((dx * dx + dy * dy) as f32).sqrt();
                        best = best.min(d);
                    }
                }
            }

            // Edge lies halfway between the two differing texel centres.
            let dist = (best - 0.5).min(max_dist);
            let signed = if here { dist } else { -dist };
            let v = (0.5 + signed / (2.0 * max_dist)).clamp(0.0, 1.0);
            out[oy * out_w + ox] = (v * 255.0).round() as u8;
        }
    }

    (out, out_w, out_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_coverage_is_fully_outside() {
        let (sdf, w, h) = coverage_to_sdf(&[0; 4], 2, 2, 3);
        assert_eq!((w, h), (8, 8));
        assert!(sdf.iter().all(|&v| v == 0));
    }

    #[test]
    fn filled_square_is_inside_at_centre_and_outside_at_border() {
        let coverage = vec![255u8; 8 * 8];
        let (sdf, w, _) = coverage_to_sdf(&coverage, 8, 8, 4);

        let centre = sdf[8 * w + 8];
        let corner = sdf[0];
        assert!(centre > 128, "centre {centre}");
        assert!(corner < 128, "corner {corner}");
    }

    #[test]
    fn edge_texels_straddle_the_midpoint() {
        let coverage = vec![255u8; 4 * 4];
        let (sdf, w, _) = coverage_to_sdf(&coverage, 4, 4, 4);

        // Row through the middle: last outside texel vs first inside texel.
        let row = 6 * w;
        let outside = sdf[row + 3];
        let inside = sdf[row + 4];
        assert!(outside < 128 && inside >= 128, "{outside} {inside}");
    }
}
