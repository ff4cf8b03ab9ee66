/// Fixed kernels used for the smallest sizes, matching OpenCV's
/// `getGaussianKernel` when sigma is derived from the size.
const SMALL_KERNELS: [&[f32]; 4] = [
    &[1.0],
    &[0.25, 0.5, 0.25],
    &[0.0625, 0.25, 0.375, 0.25, 0.0625],
    &[
        0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125,
    ],
];

/// Largest kernel edge the blur will use. Must be odd.
pub const MAX_KERNEL_SIZE: usize = 255;

/// Coerces a requested kernel size to a positive odd size no larger than
/// [`MAX_KERNEL_SIZE`].
///
/// Even sizes round up to the next odd size and zero becomes 1.
pub fn odd_kernel_size(kernel_size: usize) -> usize {
    kernel_size.clamp(1, MAX_KERNEL_SIZE) | 1
}

/// Sigma for a kernel of the given size when none is specified
/// (OpenCV's `sigma = 0` convention).
pub fn sigma_for_kernel_size(kernel_size: usize) -> f64 {
    0.3 * ((kernel_size as f64 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Precompute a normalised 1D Gaussian kernel. `kernel_size` must be odd.
pub fn gaussian_kernel_1d(kernel_size: usize) -> Vec<f32> {
    debug_assert!(kernel_size >= 1 && kernel_size % 2 == 1);
    if let Some(fixed) = SMALL_KERNELS.get(kernel_size / 2) {
        return fixed.to_vec();
    }

    let sigma = sigma_for_kernel_size(kernel_size);
    let half = (kernel_size / 2) as f64;
    let mut kernel_f64: Vec<f64> = (0..kernel_size)
        .map(|i| {
            let x = i as f64 - half;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f64 = kernel_f64.iter().sum();
    for v in &mut kernel_f64 {
        *v /= sum;
    }
    kernel_f64.iter().map(|&v| v as f32).collect()
}

/// Separable Gaussian blur over a packed `width × height × channels`
/// buffer, reusing `temp` between calls.
///
/// Samples past the buffer edge replicate the nearest edge sample, so only
/// the pixels inside the buffer influence the result.
pub fn separable_gaussian_blur_with_kernel(
    data: &mut [u8],
    width: usize,
    height: usize,
    channels: usize,
    kernel: &[f32],
    temp: &mut Vec<f32>,
) {
    let kernel_size = kernel.len();
    if kernel_size <= 1 || width == 0 || height == 0 {
        return;
    }
    let half = kernel_size / 2;

    temp.clear();
    temp.resize(width * height * channels, 0.0);

    // Horizontal pass: data → temp
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let mut sum = 0.0f32;
                for (k, &w) in kernel.iter().enumerate() {
                    let sx = (x as isize + k as isize - half as isize)
                        .clamp(0, (width - 1) as isize) as usize;
                    sum += data[(y * width + sx) * channels + c] as f32 * w;
                }
                temp[(y * width + x) * channels + c] = sum;
            }
        }
    }

    // Vertical pass: temp → data
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                let mut sum = 0.0f32;
                for (k, &w) in kernel.iter().enumerate() {
                    let sy = (y as isize + k as isize - half as isize)
                        .clamp(0, (height - 1) as isize) as usize;
                    sum += temp[(sy * width + x) * channels + c] * w;
                }
                data[(y * width + x) * channels + c] = sum.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn blur(data: &mut [u8], width: usize, height: usize, kernel_size: usize) {
        let kernel = gaussian_kernel_1d(kernel_size);
        let mut temp = Vec::new();
        separable_gaussian_blur_with_kernel(data, width, height, 3, &kernel, &mut temp);
    }

    #[rstest]
    #[case(0, 1)]
    #[case(1, 1)]
    #[case(2, 3)]
    #[case(4, 5)]
    #[case(35, 35)]
    #[case(200, 201)]
    #[case(254, 255)]
    #[case(255, 255)]
    #[case(256, 255)]
    #[case(100_001, 255)]
    #[case(usize::MAX, 255)]
    fn test_odd_kernel_size(#[case] requested: usize, #[case] expected: usize) {
        assert_eq!(odd_kernel_size(requested), expected);
    }

    #[rstest]
    #[case(1)]
    #[case(3)]
    #[case(7)]
    #[case(9)]
    #[case(35)]
    fn test_kernel_sums_to_one(#[case] size: usize) {
        let k = gaussian_kernel_1d(size);
        assert_eq!(k.len(), size);
        let sum: f32 = k.iter().sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_kernel_is_symmetric_with_peak_in_center() {
        let k = gaussian_kernel_1d(35);
        let mid = k.len() / 2;
        for i in 0..mid {
            assert_relative_eq!(k[i], k[k.len() - 1 - i], epsilon = 1e-7);
            assert!(k[i] <= k[mid]);
        }
    }

    #[test]
    fn test_small_kernel_uses_fixed_table() {
        assert_eq!(gaussian_kernel_1d(5), vec![0.0625, 0.25, 0.375, 0.25, 0.0625]);
    }

    #[test]
    fn test_sigma_matches_opencv_convention() {
        assert_relative_eq!(sigma_for_kernel_size(35), 5.6, epsilon = 1e-9);
        assert_relative_eq!(sigma_for_kernel_size(9), 1.7, epsilon = 1e-9);
    }

    #[test]
    fn test_blur_uniform_image_unchanged() {
        let mut data = vec![128u8; 10 * 10 * 3];
        blur(&mut data, 10, 10, 5);
        assert!(data.iter().all(|&v| v == 128));
    }

    #[test]
    fn test_blur_spreads_single_bright_pixel() {
        let mut data = vec![0u8; 10 * 10 * 3];
        let cx = (5 * 10 + 5) * 3;
        data[cx] = 255;

        blur(&mut data, 10, 10, 5);

        assert!(data[cx] < 255);
        assert!(data[(5 * 10 + 6) * 3] > 0);
        assert!(data[(4 * 10 + 5) * 3] > 0);
    }

    #[test]
    fn test_kernel_size_1_is_identity() {
        let mut data: Vec<u8> = (0..75).map(|v| v as u8).collect();
        let original = data.clone();
        blur(&mut data, 5, 5, 1);
        assert_eq!(data, original);
    }

    #[test]
    fn test_kernel_larger_than_buffer_replicates_edges() {
        // A 2x1 buffer blurred with a 35-wide kernel must stay finite and in range
        let mut data = vec![0, 0, 0, 255, 255, 255];
        blur(&mut data, 2, 1, 35);
        assert!(data[0] > 0 && data[0] < 255);
        assert!(data[3] > 0 && data[3] < 255);
    }
}
