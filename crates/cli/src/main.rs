mod settings;

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use face_privacy_core::compositing::domain::privacy_effect::PrivacyMode;
use face_privacy_core::detection::domain::face_detector::FaceDetector;
use face_privacy_core::detection::infrastructure::json_detection_source::JsonDetectionSource;
use face_privacy_core::detection::infrastructure::onnx_yunet_detector::{
    OnnxYunetDetector, YunetConfig,
};
use face_privacy_core::media::infrastructure::image_file_reader::ImageFileReader;
use face_privacy_core::media::infrastructure::image_file_writer::ImageFileWriter;
use face_privacy_core::media::infrastructure::occlusion_asset_loader::load_occlusion_image;
use face_privacy_core::pipeline::frame_processor::FrameProcessor;
use face_privacy_core::pipeline::mask_image_use_case::MaskImageUseCase;
use face_privacy_core::shared::constants::{IMAGE_EXTENSIONS, YUNET_MODEL_NAME};

use settings::Settings;

/// Blur, pixelate or occlude faces in an image.
#[derive(Parser, Debug)]
#[command(name = "face-privacy")]
struct Cli {
    /// Input image file.
    input: PathBuf,

    /// Output image file.
    output: PathBuf,

    /// JSON file of precomputed detections.
    #[arg(long)]
    detections: Option<PathBuf>,

    /// YuNet ONNX model used to detect faces.
    #[arg(long)]
    model: Option<PathBuf>,

    /// Privacy mode: none, blur, pixelate, occlude (or 0-3).
    #[arg(long)]
    mode: Option<PrivacyMode>,

    /// Gaussian blur kernel size (even sizes round up, capped at 255).
    #[arg(long)]
    kernel_size: Option<usize>,

    /// Mosaic block size in pixels.
    #[arg(long)]
    pixel_size: Option<usize>,

    /// Overlay image for occlude mode (PNG alpha is honoured).
    #[arg(long)]
    occlusion_image: Option<PathBuf>,

    /// Enlargement of the face box covered by the overlay.
    #[arg(long)]
    occlusion_scale: Option<f32>,

    /// Minimum detection confidence (0.0-1.0).
    #[arg(long)]
    min_confidence: Option<f32>,

    /// Draw detection boxes and landmarks.
    #[arg(long)]
    annotate: bool,

    /// Settings file to use instead of the user config.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Persist the effective settings.
    #[arg(long)]
    save_settings: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let settings_path = cli.settings.clone().or_else(Settings::config_path);
    let mut settings = settings_path
        .as_deref()
        .map(Settings::load_from)
        .unwrap_or_default();
    apply_overrides(&mut settings, &cli);
    validate(&cli, &settings)?;

    if cli.save_settings {
        let path = settings_path.ok_or("Could not determine config directory")?;
        settings.save_to(&path)?;
        log::info!("Settings saved to {}", path.display());
    }

    let detector = build_detector(&cli, &settings)?;
    let occlusion_image = match &settings.occlusion_image {
        Some(path) => Some(load_occlusion_image(path)?),
        None => None,
    };
    let processor = FrameProcessor::cpu(settings.mode, settings.effect_params())
        .with_occlusion_image(occlusion_image)
        .with_annotation(settings.annotate);

    let mut use_case = MaskImageUseCase::new(
        Box::new(ImageFileReader::new()),
        Box::new(ImageFileWriter::new()),
        detector,
        processor,
    );
    let processed = use_case.execute(&cli.input, &cli.output)?;
    log::info!(
        "{} mode applied to {processed} face(s); output written to {}",
        settings.mode,
        cli.output.display()
    );
    Ok(())
}

fn apply_overrides(settings: &mut Settings, cli: &Cli) {
    if let Some(mode) = cli.mode {
        settings.mode = mode;
    }
    if let Some(k) = cli.kernel_size {
        settings.kernel_size = k;
    }
    if let Some(p) = cli.pixel_size {
        settings.pixel_size = p;
    }
    if let Some(path) = &cli.occlusion_image {
        settings.occlusion_image = Some(path.clone());
    }
    if let Some(scale) = cli.occlusion_scale {
        settings.occlusion_scale = scale;
    }
    if let Some(c) = cli.min_confidence {
        settings.min_confidence = c;
    }
    if cli.annotate {
        settings.annotate = true;
    }
}

fn build_detector(
    cli: &Cli,
    settings: &Settings,
) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
    if let Some(path) = &cli.detections {
        log::info!("Reading detections from {}", path.display());
        return Ok(Box::new(JsonDetectionSource::open(path)?));
    }
    let model = cli.model.as_ref().ok_or_else(|| {
        format!("No detector given; pass --detections or --model <{YUNET_MODEL_NAME}>")
    })?;
    let config = YunetConfig {
        score_threshold: settings.min_confidence,
        ..YunetConfig::default()
    };
    Ok(Box::new(OnnxYunetDetector::new(model, config)?))
}

fn validate(cli: &Cli, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input file not found: {}", cli.input.display()).into());
    }
    if !is_image(&cli.output) {
        return Err(format!(
            "Output must be an image file ({}), got {}",
            IMAGE_EXTENSIONS.join(", "),
            cli.output.display()
        )
        .into());
    }
    match (&cli.detections, &cli.model) {
        (Some(_), Some(_)) => return Err("--detections and --model are mutually exclusive".into()),
        (None, None) => return Err("One of --detections or --model is required".into()),
        _ => {}
    }
    if !(0.0..=1.0).contains(&settings.min_confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            settings.min_confidence
        )
        .into());
    }
    if !(settings.occlusion_scale > 0.0 && settings.occlusion_scale.is_finite()) {
        return Err(format!(
            "Occlusion scale must be positive, got {}",
            settings.occlusion_scale
        )
        .into());
    }
    Ok(())
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
