use crate::core::{
    constants::{MAX_ZOOM, MIN_ZOOM, TILE_SIZE},
    geo::{LatLng, LatLngBounds, Point, TileCoord},
};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// The visible window onto the map: center, zoom and pixel size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: f64,
    pub size: Point,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            center: Self::clamp_center(center),
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            size,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }

    /// Sets the center of the viewport
    pub fn set_center(&mut self, center: LatLng) {
        self.center = Self::clamp_center(center);
    }

    /// Sets the zoom level, clamping to valid range
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Sets the viewport size
    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    /// Projects a LatLng to world pixel coordinates (EPSG:3857) at the given zoom level
    pub fn project(&self, lat_lng: &LatLng, zoom: Option<f64>) -> Point {
        let z = zoom.unwrap_or(self.zoom);
        let world = TILE_SIZE as f64 * 2_f64.powf(z);

        let lat_rad = LatLng::clamp_lat(lat_lng.lat).to_radians();
        let x = (lat_lng.lng + 180.0) / 360.0 * world;
        let y = (1.0 - (PI / 4.0 + lat_rad / 2.0).tan().ln() / PI) / 2.0 * world;

        Point::new(x, y)
    }

    /// Unprojects world pixel coordinates back to LatLng at the given zoom level
    pub fn unproject(&self, pixel: &Point, zoom: Option<f64>) -> LatLng {
        let z = zoom.unwrap_or(self.zoom);
        let world = TILE_SIZE as f64 * 2_f64.powf(z);

        let lng = pixel.x / world * 360.0 - 180.0;
        let n = PI * (1.0 - 2.0 * pixel.y / world);
        let lat = n.sinh().atan().to_degrees();

        LatLng::new(lat, lng)
    }

    /// World pixel of the viewport's top-left corner
    pub fn pixel_origin(&self) -> Point {
        let center = self.project(&self.center, None);
        Point::new(center.x - self.size.x / 2.0, center.y - self.size.y / 2.0)
    }

    /// Converts a geographical coordinate to container-relative pixel coordinates
    pub fn lat_lng_to_pixel(&self, lat_lng: &LatLng) -> Point {
        self.project(lat_lng, None).subtract(&self.pixel_origin())
    }

    /// Converts container-relative pixel coordinates back to geographical coordinates
    pub fn pixel_to_lat_lng(&self, pixel: &Point) -> LatLng {
        self.unproject(&pixel.add(&self.pixel_origin()), None)
    }

    /// Pans the viewport by the given pixel offset. Dragging right moves the map right,
    /// so the center moves left.
    pub fn pan(&mut self, delta: Point) {
        let center = self.project(&self.center, None).subtract(&delta);
        let new_center = self.unproject(&center, None);
        self.set_center(LatLng::new(new_center.lat, LatLng::wrap_lng(new_center.lng)));
    }

    /// Zooms the viewport, keeping `focus_point` (container pixels) fixed on screen
    pub fn zoom_to(&mut self, zoom: f64, focus_point: Option<Point>) {
        let new_zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < 0.001 {
            return;
        }

        match focus_point {
            Some(focus) => {
                let focus_lat_lng = self.pixel_to_lat_lng(&focus);
                self.zoom = new_zoom;
                // Re-anchor so the focus coordinate stays under the cursor
                let drift = self.lat_lng_to_pixel(&focus_lat_lng).subtract(&focus);
                let center = self.project(&self.center, None).add(&drift);
                let new_center = self.unproject(&center, None);
                self.set_center(new_center);
            }
            None => self.zoom = new_zoom,
        }
    }

    /// Gets the current viewport bounds in geographical coordinates
    pub fn bounds(&self) -> LatLngBounds {
        let nw = self.pixel_to_lat_lng(&Point::new(0.0, 0.0));
        let se = self.pixel_to_lat_lng(&self.size);

        LatLngBounds::new(LatLng::new(se.lat, nw.lng), LatLng::new(nw.lat, se.lng))
    }

    /// Integer zoom used to pick tiles, limited to the tile source's range
    pub fn tile_zoom(&self, min_zoom: u8, max_zoom: u8) -> u8 {
        (self.zoom.round() as i64).clamp(min_zoom as i64, max_zoom as i64) as u8
    }

    /// Tiles covering the viewport at `tile_zoom`, with their container-pixel rectangles
    pub fn visible_tiles(&self, tile_zoom: u8) -> Vec<(TileCoord, (Point, Point))> {
        let tiles_per_axis = 2_u32.pow(tile_zoom as u32);
        let tile_px = TILE_SIZE as f64 * 2_f64.powf(self.zoom - tile_zoom as f64);
        let origin = self.pixel_origin();

        let min_x = (origin.x / tile_px).floor().max(0.0) as u32;
        let min_y = (origin.y / tile_px).floor().max(0.0) as u32;
        let max_x = (((origin.x + self.size.x) / tile_px).floor().max(0.0) as u32)
            .min(tiles_per_axis.saturating_sub(1));
        let max_y = (((origin.y + self.size.y) / tile_px).floor().max(0.0) as u32)
            .min(tiles_per_axis.saturating_sub(1));

        let mut tiles = Vec::new();
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let min = Point::new(x as f64 * tile_px - origin.x, y as f64 * tile_px - origin.y);
                let max = Point::new(min.x + tile_px, min.y + tile_px);
                tiles.push((TileCoord::new(x, y, tile_zoom), (min, max)));
            }
        }
        tiles
    }

    fn clamp_center(center: LatLng) -> LatLng {
        LatLng::new(LatLng::clamp_lat(center.lat), center.lng.clamp(-180.0, 180.0))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(LatLng::default(), 1.0, Point::new(800.0, 600.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_projects_to_middle() {
        let viewport = Viewport::new(LatLng::new(37.09, -95.71), 5.0, Point::new(800.0, 600.0));
        let pixel = viewport.lat_lng_to_pixel(&LatLng::new(37.09, -95.71));

        assert!((pixel.x - 400.0).abs() < 1e-6);
        assert!((pixel.y - 300.0).abs() < 1e-6);
    }

    #[test]
    fn test_project_round_trip() {
        let viewport = Viewport::default();
        let original = LatLng::new(-33.45, -70.66);
        let back = viewport.unproject(&viewport.project(&original, Some(7.0)), Some(7.0));

        assert!((back.lat - original.lat).abs() < 1e-9);
        assert!((back.lng - original.lng).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut viewport = Viewport::new(LatLng::default(), 42.0, Point::new(100.0, 100.0));
        assert_eq!(viewport.zoom, MAX_ZOOM);

        viewport.set_zoom(-3.0);
        assert_eq!(viewport.zoom, MIN_ZOOM);
    }

    #[test]
    fn test_pan_moves_center_opposite_to_drag() {
        let mut viewport = Viewport::new(LatLng::new(10.0, 10.0), 4.0, Point::new(400.0, 400.0));
        viewport.pan(Point::new(100.0, 0.0));

        assert!(viewport.center.lng < 10.0);
        assert!((viewport.center.lat - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_keeps_focus_point_fixed() {
        let mut viewport = Viewport::new(LatLng::new(20.0, 0.0), 4.0, Point::new(600.0, 400.0));
        let focus = Point::new(150.0, 120.0);
        let anchored = viewport.pixel_to_lat_lng(&focus);

        viewport.zoom_to(6.0, Some(focus));
        let after = viewport.lat_lng_to_pixel(&anchored);

        assert_eq!(viewport.zoom, 6.0);
        assert!((after.x - focus.x).abs() < 1e-6);
        assert!((after.y - focus.y).abs() < 1e-6);
    }

    #[test]
    fn test_visible_tiles_cover_viewport() {
        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 1.0, Point::new(512.0, 512.0));
        let tiles = viewport.visible_tiles(1);

        assert_eq!(tiles.len(), 4);
        let (first, (min, max)) = tiles[0];
        assert_eq!(first, TileCoord::new(0, 0, 1));
        assert!((max.x - min.x - 256.0).abs() < 1e-9);
    }
}
