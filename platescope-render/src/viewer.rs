//! Blocking display window for a rendered figure.

use crate::draw::render_to_rgb;
use crate::figure::Figure;
use crate::RenderError;
use log::debug;

/// Renders the figure and shows it in a native window. Returns once the
/// user closes the window.
pub fn show_figure(title: &str, figure: &Figure) -> Result<(), RenderError> {
    let (pixels, (width, height)) = render_to_rgb(figure)?;
    let image = egui::ColorImage::from_rgb([width as usize, height as usize], &pixels);
    debug!("showing {width}x{height} figure window");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width as f32, height as f32])
            .with_title(title),
        ..Default::default()
    };

    let title = title.to_string();
    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Box::new(FigureApp::new(image))),
    )
    .map_err(|err| RenderError::Window(err.to_string()))
}

struct FigureApp {
    pending: Option<egui::ColorImage>,
    texture: Option<egui::TextureHandle>,
}

impl FigureApp {
    fn new(image: egui::ColorImage) -> Self {
        Self {
            pending: Some(image),
            texture: None,
        }
    }
}

impl eframe::App for FigureApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(image) = self.pending.take() {
            self.texture = Some(ctx.load_texture("figure", image, egui::TextureOptions::LINEAR));
        }
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(egui::Color32::WHITE))
            .show(ctx, |ui| {
                if let Some(texture) = &self.texture {
                    ui.image(texture);
                }
            });
    }
}
