//! Resizing of packed `width × height × channels` byte buffers.
//!
//! `resize_area` is a fractional box filter: every destination sample is the
//! coverage-weighted mean of the source samples under its footprint. When
//! enlarging it degrades gracefully to a nearest-like lookup with blended
//! seams. `resize_nearest` never mixes samples and is what gives pixelation
//! its hard block edges.

/// Source samples (index, weight) contributing to each destination sample.
fn area_weights(src_len: usize, dst_len: usize) -> Vec<Vec<(usize, f32)>> {
    let scale = src_len as f64 / dst_len as f64;
    (0..dst_len)
        .map(|d| {
            let start = d as f64 * scale;
            let end = ((d + 1) as f64 * scale).min(src_len as f64);
            let first = start.floor() as usize;
            let last = (end.ceil() as usize).min(src_len);
            (first..last)
                .filter_map(|s| {
                    let overlap = end.min(s as f64 + 1.0) - start.max(s as f64);
                    (overlap > 1e-9).then(|| (s, (overlap / scale) as f32))
                })
                .collect()
        })
        .collect()
}

/// Area-averaging resize. Zero-sized inputs or outputs produce an empty
/// (or zero-filled) buffer rather than panicking.
pub fn resize_area(
    src: &[u8],
    src_w: usize,
    src_h: usize,
    channels: usize,
    dst_w: usize,
    dst_h: usize,
) -> Vec<u8> {
    let mut out = vec![0u8; dst_w * dst_h * channels];
    if src_w == 0 || src_h == 0 || dst_w == 0 || dst_h == 0 || channels == 0 {
        return out;
    }
    if src_w == dst_w && src_h == dst_h {
        let n = out.len();
        out.copy_from_slice(&src[..n]);
        return out;
    }

    let x_weights = area_weights(src_w, dst_w);
    let y_weights = area_weights(src_h, dst_h);

    // Horizontal pass: src_h rows of dst_w samples
    let mut rows = vec![0.0f32; src_h * dst_w * channels];
    for y in 0..src_h {
        for (dx, taps) in x_weights.iter().enumerate() {
            for c in 0..channels {
                let mut sum = 0.0f32;
                for &(sx, w) in taps {
                    sum += src[(y * src_w + sx) * channels + c] as f32 * w;
                }
                rows[(y * dst_w + dx) * channels + c] = sum;
            }
        }
    }

    // Vertical pass
    for (dy, taps) in y_weights.iter().enumerate() {
        for dx in 0..dst_w {
            for c in 0..channels {
                let mut sum = 0.0f32;
                for &(sy, w) in taps {
                    sum += rows[(sy * dst_w + dx) * channels + c] * w;
                }
                out[(dy * dst_w + dx) * channels + c] = sum.round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    out
}

/// Nearest-neighbour resize: destination sample `d` reads source sample
/// `floor(d * src_len / dst_len)` on each axis.
pub fn resize_nearest(
    src: &[u8],
    src_w: usize,
    src_h: usize,
    channels: usize,
    dst_w: usize,
    dst_h: usize,
) -> Vec<u8> {
    let mut out = vec![0u8; dst_w * dst_h * channels];
    if src_w == 0 || src_h == 0 || channels == 0 {
        return out;
    }

    for dy in 0..dst_h {
        let sy = (dy * src_h / dst_h).min(src_h - 1);
        for dx in 0..dst_w {
            let sx = (dx * src_w / dst_w).min(src_w - 1);
            let s = (sy * src_w + sx) * channels;
            let d = (dy * dst_w + dx) * channels;
            out[d..d + channels].copy_from_slice(&src[s..s + channels]);
        }
    }

    out
}
