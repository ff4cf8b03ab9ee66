use std::time::Instant;

use crate::compositing::domain::frame_compositor::FrameCompositor;
use crate::compositing::domain::occlusion_image::OcclusionImage;
use crate::compositing::domain::privacy_effect::{PrivacyEffect, PrivacyMode};
use crate::compositing::infrastructure::cpu_privacy_compositor::CpuPrivacyCompositor;
use crate::detection::domain::detection::Detection;
use crate::shared::constants::{
    DEFAULT_KERNEL_SIZE, DEFAULT_MIN_CONFIDENCE, DEFAULT_OCCLUSION_SCALE, DEFAULT_PIXEL_SIZE,
};
use crate::shared::frame::FrameView;

use super::annotator;
use super::key_command::KeyCommand;

/// Tunables shared by every effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectParams {
    pub kernel_size: usize,
    pub pixel_size: usize,
    /// Occlusion art covers the face box grown by this factor.
    pub occlusion_scale: f32,
    pub min_confidence: f32,
}

impl Default for EffectParams {
    fn default() -> Self {
        Self {
            kernel_size: DEFAULT_KERNEL_SIZE,
            pixel_size: DEFAULT_PIXEL_SIZE,
            occlusion_scale: DEFAULT_OCCLUSION_SCALE,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }
}

/// Applies the active privacy mode to every confident detection in a frame.
pub struct FrameProcessor {
    compositor: Box<dyn FrameCompositor>,
    mode: PrivacyMode,
    params: EffectParams,
    occlusion_image: Option<OcclusionImage>,
    annotate: bool,
}

impl FrameProcessor {
    pub fn new(
        compositor: Box<dyn FrameCompositor>,
        mode: PrivacyMode,
        params: EffectParams,
    ) -> Self {
        Self {
            compositor,
            mode,
            params,
            occlusion_image: None,
            annotate: false,
        }
    }

    /// Processor backed by the CPU compositor.
    pub fn cpu(mode: PrivacyMode, params: EffectParams) -> Self {
        Self::new(Box::new(CpuPrivacyCompositor::new()), mode, params)
    }

    pub fn with_occlusion_image(mut self, image: Option<OcclusionImage>) -> Self {
        self.occlusion_image = image;
        self
    }

    pub fn with_annotation(mut self, annotate: bool) -> Self {
        self.annotate = annotate;
        self
    }

    pub fn mode(&self) -> PrivacyMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: PrivacyMode) {
        if mode != self.mode {
            log::info!("Privacy mode: {} -> {}", self.mode, mode);
        }
        self.mode = mode;
    }

    /// Applies a key press. Mode keys take effect immediately; the command
    /// is returned so the caller can act on `Quit`.
    pub fn handle_key(&mut self, key: u8) -> Option<KeyCommand> {
        let command = KeyCommand::from_key(key)?;
        if let KeyCommand::SetMode(mode) = command {
            self.set_mode(mode);
        }
        Some(command)
    }

    /// The fully parameterised effect for the current mode.
    pub fn effect(&self) -> PrivacyEffect<'_> {
        match self.mode {
            PrivacyMode::None => PrivacyEffect::None,
            PrivacyMode::Blur => PrivacyEffect::Blur {
                kernel_size: self.params.kernel_size,
            },
            PrivacyMode::Pixelate => PrivacyEffect::Pixelate {
                pixel_size: self.params.pixel_size,
            },
            PrivacyMode::Occlude => PrivacyEffect::Occlude {
                image: self.occlusion_image.as_ref(),
            },
        }
    }

    /// Runs the active effect over each detection at or above the confidence
    /// threshold, in order, then draws the debug overlay if enabled.
    ///
    /// Returns the number of detections that were processed.
    pub fn process(&self, frame: &mut FrameView<'_>, detections: &[Detection]) -> usize {
        let start = Instant::now();
        let effect = self.effect();
        let bounds = frame.bounds();
        let mut processed = 0;

        for det in detections {
            if det.confidence < self.params.min_confidence {
                continue;
            }
            processed += 1;

            let face = det.to_rect();
            let target = match self.mode {
                PrivacyMode::Occlude => face
                    .scaled_about_center(self.params.occlusion_scale)
                    .intersect_bounds(bounds),
                _ => face,
            };
            self.compositor.apply(frame, target, &effect);

            if self.annotate {
                annotator::annotate_detection(frame, det);
            }
        }

        log::debug!(
            "{} mode: {processed}/{} detection(s) processed",
            self.mode,
            detections.len()
        );
        log::trace!("Frame processed in {:.2}ms", start.elapsed().as_secs_f64() * 1000.0);
        processed
    }
}
