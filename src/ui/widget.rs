//! egui map widget: paints the map's draw queue and turns pointer input
//! into pans, zooms, popups and layer toggles.

use crate::{
    core::{config::TileLoadingConfig, geo::Point, map::Map},
    prelude::{HashMap, HashSet},
    rendering::context::{DrawCommand, RenderContext},
    tiles::{
        cache::TileCache,
        loader::{TileLoader, TileResponse},
    },
    ui::popup::Popup,
};
use crossbeam_channel::Receiver;
use egui::{
    Color32, ColorImage, CursorIcon, FontId, Pos2, Rect, Response, Sense, Shape, Stroke,
    TextureHandle, TextureOptions, Ui, Vec2,
};

#[derive(Debug, Clone)]
pub struct MapWidgetConfig {
    pub interactive: bool,
    pub show_attribution: bool,
    pub show_layer_control: bool,
    pub background_color: Color32,
    /// Zoom levels per scrolled point
    pub zoom_sensitivity: f64,
    pub preferred_size: Option<Vec2>,
}

impl Default for MapWidgetConfig {
    fn default() -> Self {
        Self {
            interactive: true,
            show_attribution: true,
            show_layer_control: true,
            background_color: Color32::from_rgb(200, 200, 200),
            zoom_sensitivity: 0.005,
            preferred_size: None,
        }
    }
}

/// Downloaded tile bytes and the textures made from them
struct TileStore {
    loader: TileLoader,
    responses: Receiver<TileResponse>,
    cache: TileCache,
    textures: HashMap<String, TextureHandle>,
    failed: HashSet<String>,
    max_textures: usize,
}

impl TileStore {
    fn new(config: TileLoadingConfig) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self {
            cache: TileCache::new(config.cache_size),
            max_textures: config.cache_size,
            loader: TileLoader::new(tx, config),
            responses: rx,
            textures: HashMap::default(),
            failed: HashSet::default(),
        }
    }

    /// Moves finished downloads into the cache. Returns true if anything arrived.
    fn drain(&mut self) -> bool {
        let mut received = false;
        for response in self.responses.try_iter() {
            received = true;
            match response.result {
                Ok(bytes) => self.cache.insert(response.url, bytes),
                Err(e) => {
                    log::debug!("tile {} failed: {}", response.url, e);
                    self.failed.insert(response.url);
                }
            }
        }
        received
    }

    fn texture(&mut self, ctx: &egui::Context, url: &str, coord: crate::TileCoord) -> Option<egui::TextureId> {
        if let Some(texture) = self.textures.get(url) {
            return Some(texture.id());
        }

        if let Some(bytes) = self.cache.get(url) {
            match decode_tile(&bytes) {
                Some(image) => {
                    if self.textures.len() >= self.max_textures {
                        self.textures.clear();
                    }
                    let texture = ctx.load_texture(url, image, TextureOptions::LINEAR);
                    let id = texture.id();
                    self.textures.insert(url.to_string(), texture);
                    return Some(id);
                }
                None => {
                    log::warn!("could not decode tile {}", url);
                    self.failed.insert(url.to_string());
                }
            }
        } else if !self.failed.contains(url) {
            self.loader.start_download(url.to_string(), coord);
        }
        None
    }
}

/// Decodes PNG/JPEG tile bytes into an egui image
pub fn decode_tile(bytes: &[u8]) -> Option<ColorImage> {
    let rgba = image::load_from_memory(bytes).ok()?.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Some(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

fn to_screen(rect: Rect, point: &Point) -> Pos2 {
    Pos2::new(rect.min.x + point.x as f32, rect.min.y + point.y as f32)
}

/// Interactive view of a [`Map`]
pub struct MapWidget {
    map: Map,
    tiles: TileStore,
    popup: Option<Popup>,
    config: MapWidgetConfig,
}

impl MapWidget {
    pub fn new(map: Map, tile_config: TileLoadingConfig) -> Self {
        Self {
            map,
            tiles: TileStore::new(tile_config),
            popup: None,
            config: MapWidgetConfig::default(),
        }
    }

    pub fn with_config(mut self, config: MapWidgetConfig) -> Self {
        self.config = config;
        self
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn replace_map(&mut self, map: Map) {
        self.map = map;
        self.popup = None;
    }

    pub fn show(&mut self, ui: &mut Ui) -> Response {
        let desired_size = self.config.preferred_size.unwrap_or_else(|| ui.available_size());
        let (rect, mut response) = ui.allocate_exact_size(desired_size, Sense::click_and_drag());
        self.map.set_size(Point::new(rect.width() as f64, rect.height() as f64));

        if self.config.interactive {
            self.handle_input(ui, rect, &mut response);
        }

        if self.tiles.drain() {
            ui.ctx().request_repaint();
        }

        ui.painter().rect_filled(rect, 0.0, self.config.background_color);
        self.paint_layers(ui, rect);
        self.paint_popup(ui, rect);

        if self.config.show_attribution {
            self.paint_attribution(ui, rect);
        }
        if self.config.show_layer_control {
            self.show_layer_control(ui, rect);
        }
        self.show_legend(ui, rect);

        response
    }

    fn handle_input(&mut self, ui: &Ui, rect: Rect, response: &mut Response) {
        if response.dragged() {
            let delta = response.drag_delta();
            if delta.length_sq() > 0.0 {
                self.map.pan(Point::new(delta.x as f64, delta.y as f64));
                response.mark_changed();
            }
            ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
        }

        if response.hovered() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll.abs() > 0.1 {
                let zoom = self.map.viewport().zoom + scroll as f64 * self.config.zoom_sensitivity;
                let focus = response
                    .hover_pos()
                    .map(|pos| Point::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64));
                self.map.zoom_to(zoom, focus);
                response.mark_changed();
            }
        }

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let pixel = Point::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64);
                self.popup = self.map.marker_at(&pixel).and_then(|marker| {
                    let content = marker.popup.clone()?;
                    Some(Popup::new(marker.id.clone(), marker.position, content))
                });
            }
        }
    }

    fn paint_layers(&mut self, ui: &Ui, rect: Rect) {
        let mut context = RenderContext::new(rect.width().max(1.0) as u32, rect.height().max(1.0) as u32);
        if let Err(e) = self.map.render(&mut context) {
            log::error!("map render failed: {}", e);
            return;
        }

        let painter = ui.painter_at(rect);
        let full_uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));

        for command in context.drawing_queue() {
            match command {
                DrawCommand::Tile {
                    coord,
                    url,
                    bounds,
                    opacity,
                    ..
                } => {
                    let tile_rect = Rect::from_two_pos(to_screen(rect, &bounds.0), to_screen(rect, &bounds.1));
                    match self.tiles.texture(ui.ctx(), url, *coord) {
                        Some(texture) => {
                            painter.image(texture, tile_rect, full_uv, Color32::WHITE.gamma_multiply(*opacity));
                        }
                        None => {
                            painter.rect_filled(tile_rect, 0.0, Color32::from_gray(225));
                        }
                    }
                }
                DrawCommand::Line { points, style, .. } => {
                    let points: Vec<Pos2> = points.iter().map(|p| to_screen(rect, p)).collect();
                    painter.add(Shape::line(points, Stroke::new(style.width, Color32::from(style.color))));
                }
                DrawCommand::Circle { center, style, .. } => {
                    painter.circle(
                        to_screen(rect, center),
                        style.radius,
                        Color32::from(style.fill_color),
                        Stroke::new(style.stroke_width, Color32::from(style.stroke_color)),
                    );
                }
            }
        }
    }

    fn paint_popup(&mut self, ui: &mut Ui, rect: Rect) {
        let Some(popup) = &self.popup else {
            return;
        };
        let anchor = to_screen(rect, &self.map.viewport().lat_lng_to_pixel(&popup.position));
        if !rect.contains(anchor) {
            return;
        }
        if popup.render_at_screen_pos(ui, anchor).clicked() {
            self.popup = None;
        }
    }

    fn paint_attribution(&self, ui: &Ui, rect: Rect) {
        let Some(attribution) = self
            .map
            .control()
            .active_base_layer()
            .and_then(|entry| self.map.layer_as::<crate::layers::tile::TileLayer>(&entry.layer_id))
            .map(|layer| layer.attribution().to_string())
        else {
            return;
        };

        let painter = ui.painter_at(rect);
        let pos = Pos2::new(rect.min.x + 4.0, rect.max.y - 4.0);
        let galley = painter.layout_no_wrap(attribution, FontId::proportional(10.0), Color32::from_gray(40));
        let text_rect = Rect::from_min_size(Pos2::new(pos.x, pos.y - galley.size().y), galley.size());
        painter.rect_filled(text_rect.expand(2.0), 2.0, Color32::from_white_alpha(200));
        painter.galley(text_rect.min, galley, Color32::from_gray(40));
    }

    fn show_layer_control(&mut self, ui: &Ui, rect: Rect) {
        let control = self.map.control();
        let rows = control.base_layers().len() + control.overlays().len();
        let size = Vec2::new(170.0, 34.0 + rows as f32 * 22.0);
        let panel = control.position.calculate_rect(rect, size, 10.0);

        let actions = egui::Area::new(egui::Id::new("quakemap_layer_control"))
            .fixed_pos(panel.min)
            .order(egui::Order::Foreground)
            .show(ui.ctx(), |ui| {
                egui::Frame::popup(ui.style())
                    .show(ui, |ui| self.map.control_mut().show(ui))
                    .inner
            })
            .inner;

        for action in actions {
            if let Err(e) = self.map.apply_control_action(action) {
                log::warn!("layer control: {}", e);
            }
        }
    }

    fn show_legend(&self, ui: &Ui, rect: Rect) {
        let Some(legend) = self.map.legend() else {
            return;
        };
        let size = Vec2::new(120.0, 30.0 + legend.len() as f32 * 20.0);
        let panel = legend.position.calculate_rect(rect, size, 10.0);

        egui::Area::new(egui::Id::new("quakemap_legend"))
            .fixed_pos(panel.min)
            .order(egui::Order::Foreground)
            .interactable(false)
            .show(ui.ctx(), |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| legend.show(ui));
            });
    }
}

pub trait MapWidgetExt {
    fn map_widget(&mut self, widget: &mut MapWidget) -> Response;
}

impl MapWidgetExt for Ui {
    fn map_widget(&mut self, widget: &mut MapWidget) -> Response {
        widget.show(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_tile() {
        let img = image::RgbaImage::from_pixel(4, 2, image::Rgba([255, 0, 0, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
            .unwrap();

        let decoded = decode_tile(&bytes).unwrap();
        assert_eq!(decoded.size, [4, 2]);
        assert_eq!(decoded.pixels[0], Color32::from_rgb(255, 0, 0));
        assert!(decode_tile(b"not an image").is_none());
    }

    #[test]
    fn test_to_screen_offsets_by_rect() {
        let rect = Rect::from_min_size(Pos2::new(10.0, 20.0), Vec2::new(100.0, 100.0));
        assert_eq!(to_screen(rect, &Point::new(5.0, 5.0)), Pos2::new(15.0, 25.0));
    }

    #[test]
    fn test_config_defaults() {
        let config = MapWidgetConfig::default();
        assert!(config.interactive);
        assert!(config.show_layer_control);
        assert!(config.preferred_size.is_none());
    }
}
