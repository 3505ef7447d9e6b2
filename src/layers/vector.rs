use crate::{
    core::{
        geo::{LatLng, LatLngBounds, Point},
        viewport::Viewport,
    },
    impl_layer_trait,
    layers::base::{LayerProperties, LayerTrait, LayerType},
    rendering::context::{CircleRenderStyle, DrawCommand, LineRenderStyle, RenderContext},
    styling::Color,
    ui::popup::PopupContent,
    Result,
};
use serde::{Deserialize, Serialize};

/// Paint for a circle marker. `radius` is in screen pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub radius: f32,
    pub fill_color: Color,
    pub fill_opacity: f32,
    pub stroke_color: Color,
    pub stroke_width: f32,
    pub stroke_opacity: f32,
}

impl MarkerStyle {
    /// A radius that is NaN, infinite or not positive draws nothing
    pub fn is_drawable(&self) -> bool {
        self.radius.is_finite() && self.radius > 0.0
    }
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            radius: 5.0,
            fill_color: Color::rgb(0x33, 0x88, 0xFF),
            fill_opacity: 0.6,
            stroke_color: Color::BLACK,
            stroke_width: 1.0,
            stroke_opacity: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: Color,
    pub width: f32,
    pub opacity: f32,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Color::rgb(0x33, 0x88, 0xFF),
            width: 3.0,
            opacity: 1.0,
        }
    }
}

/// Fixed-pixel-radius circle anchored at a geographic position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleMarker {
    pub id: String,
    pub position: LatLng,
    pub style: MarkerStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popup: Option<PopupContent>,
}

impl CircleMarker {
    pub fn new(id: impl Into<String>, position: LatLng, style: MarkerStyle) -> Self {
        Self {
            id: id.into(),
            position,
            style,
            popup: None,
        }
    }

    pub fn with_popup(mut self, popup: PopupContent) -> Self {
        self.popup = Some(popup);
        self
    }

    /// Whether `pixel` (container coordinates) falls inside the drawn circle
    pub fn hit_test(&self, pixel: &Point, viewport: &Viewport) -> bool {
        if !self.style.is_drawable() {
            return false;
        }
        let center = viewport.lat_lng_to_pixel(&self.position);
        let reach = (self.style.radius + self.style.stroke_width / 2.0) as f64;
        center.distance_to(pixel) <= reach
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub id: String,
    pub points: Vec<LatLng>,
    pub style: LineStyle,
}

impl Polyline {
    pub fn new(id: impl Into<String>, points: Vec<LatLng>, style: LineStyle) -> Self {
        Self {
            id: id.into(),
            points,
            style,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VectorFeature {
    CircleMarker(CircleMarker),
    Polyline(Polyline),
}

impl VectorFeature {
    pub fn id(&self) -> &str {
        match self {
            VectorFeature::CircleMarker(marker) => &marker.id,
            VectorFeature::Polyline(line) => &line.id,
        }
    }

    pub fn bounds(&self) -> Option<LatLngBounds> {
        match self {
            VectorFeature::CircleMarker(marker) => {
                Some(LatLngBounds::new(marker.position, marker.position))
            }
            VectorFeature::Polyline(line) => LatLngBounds::from_points(&line.points),
        }
    }
}

/// Overlay of circle markers and polylines, drawn in insertion order
pub struct VectorLayer {
    properties: LayerProperties,
    features: Vec<VectorFeature>,
}

impl VectorLayer {
    pub fn new(id: String, name: String) -> Self {
        Self {
            properties: LayerProperties::new(id, name, LayerType::Vector),
            features: Vec::new(),
        }
    }

    /// Builds a marker layer from arbitrary items and a per-item marker callback.
    /// Items the callback rejects are left out.
    pub fn from_points<T, F>(id: String, name: String, items: &[T], mut point_to_marker: F) -> Self
    where
        F: FnMut(usize, &T) -> Option<CircleMarker>,
    {
        let mut layer = Self::new(id, name);
        for (index, item) in items.iter().enumerate() {
            if let Some(marker) = point_to_marker(index, item) {
                layer.add_circle_marker(marker);
            }
        }
        layer
    }

    pub fn add_circle_marker(&mut self, marker: CircleMarker) {
        self.features.push(VectorFeature::CircleMarker(marker));
    }

    pub fn add_polyline(&mut self, polyline: Polyline) {
        self.features.push(VectorFeature::Polyline(polyline));
    }

    pub fn features(&self) -> &[VectorFeature] {
        &self.features
    }

    pub fn get_feature(&self, id: &str) -> Option<&VectorFeature> {
        self.features.iter().find(|f| f.id() == id)
    }

    pub fn markers(&self) -> impl Iterator<Item = &CircleMarker> {
        self.features.iter().filter_map(|f| match f {
            VectorFeature::CircleMarker(marker) => Some(marker),
            VectorFeature::Polyline(_) => None,
        })
    }

    pub fn polylines(&self) -> impl Iterator<Item = &Polyline> {
        self.features.iter().filter_map(|f| match f {
            VectorFeature::Polyline(line) => Some(line),
            VectorFeature::CircleMarker(_) => None,
        })
    }

    pub fn marker_count(&self) -> usize {
        self.markers().count()
    }

    pub fn polyline_count(&self) -> usize {
        self.polylines().count()
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    pub fn clear(&mut self) {
        self.features.clear();
    }

    /// Topmost marker under `pixel`. Later markers are drawn above earlier ones.
    pub fn marker_at(&self, pixel: &Point, viewport: &Viewport) -> Option<&CircleMarker> {
        self.markers()
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .find(|marker| marker.hit_test(pixel, viewport))
    }

    fn render_feature(
        &self,
        context: &mut RenderContext,
        viewport: &Viewport,
        feature: &VectorFeature,
    ) {
        let opacity = self.properties.opacity;

        match feature {
            VectorFeature::CircleMarker(marker) => {
                if !marker.style.is_drawable() {
                    return;
                }
                let center = viewport.lat_lng_to_pixel(&marker.position);
                if !context.is_on_screen(&center, marker.style.radius as f64) {
                    return;
                }
                context.draw(DrawCommand::Circle {
                    layer_id: self.properties.id.clone(),
                    feature_id: marker.id.clone(),
                    center,
                    style: CircleRenderStyle {
                        radius: marker.style.radius,
                        fill_color: marker
                            .style
                            .fill_color
                            .with_opacity(marker.style.fill_opacity * opacity),
                        stroke_color: marker
                            .style
                            .stroke_color
                            .with_opacity(marker.style.stroke_opacity * opacity),
                        stroke_width: marker.style.stroke_width,
                    },
                });
            }
            VectorFeature::Polyline(line) => {
                let points: Vec<Point> = line
                    .points
                    .iter()
                    .map(|p| viewport.lat_lng_to_pixel(p))
                    .collect();
                context.draw(DrawCommand::Line {
                    layer_id: self.properties.id.clone(),
                    points,
                    style: LineRenderStyle {
                        color: line.style.color.with_opacity(line.style.opacity * opacity),
                        width: line.style.width,
                    },
                });
            }
        }
    }
}

impl LayerTrait for VectorLayer {
    impl_layer_trait!(VectorLayer, properties);

    fn bounds(&self) -> Option<LatLngBounds> {
        self.features
            .iter()
            .filter_map(VectorFeature::bounds)
            .reduce(|acc, b| acc.union(&b))
    }

    fn render(&self, context: &mut RenderContext, viewport: &Viewport) -> Result<()> {
        for feature in &self.features {
            self.render_feature(context, viewport, feature);
        }
        Ok(())
    }

    fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "marker_count": self.marker_count(),
            "polyline_count": self.polyline_count(),
            "features": self.features,
        })
    }
}
