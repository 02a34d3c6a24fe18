mod analysis;
mod app;
mod layout;
mod util;

use std::path::PathBuf;

use clap::Parser;

use crate::app::{EngineConfig, ZoomLimits};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Analysis result JSON produced by the detection service.
    #[arg(long)]
    input: Option<PathBuf>,
    /// Maximum number of accounts drawn. Flagged accounts are kept regardless.
    #[arg(long, default_value_t = 500)]
    cap: usize,
    #[arg(long, default_value_t = 0.05)]
    sample_fraction: f64,
    /// Labels are drawn only when at most this many accounts are shown.
    #[arg(long, default_value_t = 100)]
    label_threshold: usize,
    #[arg(long, default_value_t = 0.2)]
    min_zoom: f32,
    #[arg(long, default_value_t = 5.0)]
    max_zoom: f32,
    /// Relative zoom change per wheel notch.
    #[arg(long, default_value_t = 0.1)]
    zoom_step: f32,
    /// Seed for sampling and layout jitter.
    #[arg(long, default_value_t = 0x5eed)]
    seed: u64,
}

impl Args {
    fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            cap: self.cap,
            sample_fraction: self.sample_fraction,
            label_threshold: self.label_threshold,
            zoom: ZoomLimits {
                min_scale: self.min_zoom,
                max_scale: self.max_zoom,
                step: self.zoom_step,
            },
            seed: self.seed,
        }
    }
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = args.engine_config();
    tracing::debug!(?args, "starting");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "ring-lens",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::RingLensApp::new(
                cc,
                args.input.clone(),
                config,
            )))
        }),
    )
}
