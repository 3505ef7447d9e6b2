use crate::{core::geo::{Point, TileCoord}, styling::Color};

/// Resolved paint for a circle marker, opacity already folded into the colors
#[derive(Debug, Clone, PartialEq)]
pub struct CircleRenderStyle {
    pub radius: f32,
    pub fill_color: Color,
    pub stroke_color: Color,
    pub stroke_width: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineRenderStyle {
    pub color: Color,
    pub width: f32,
}

/// Commands that layers issue to the render context
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Circle {
        layer_id: String,
        feature_id: String,
        center: Point,
        style: CircleRenderStyle,
    },
    Line {
        layer_id: String,
        points: Vec<Point>,
        style: LineRenderStyle,
    },
    /// A raster tile; the painter resolves `url` to an image
    Tile {
        layer_id: String,
        coord: TileCoord,
        url: String,
        bounds: (Point, Point), // min, max screen coordinates
        opacity: f32,
    },
}

/// Frame-local queue of draw commands in paint order.
/// Coordinates are container pixels; nothing here knows about the UI toolkit.
pub struct RenderContext {
    pub width: u32,
    pub height: u32,
    drawing_queue: Vec<DrawCommand>,
}

impl RenderContext {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            drawing_queue: Vec::new(),
        }
    }

    /// Begin a frame
    pub fn begin_frame(&mut self) {
        self.drawing_queue.clear();
    }

    /// Whether a circle of `radius` around `center` touches the frame
    pub fn is_on_screen(&self, center: &Point, radius: f64) -> bool {
        center.x + radius >= 0.0
            && center.y + radius >= 0.0
            && center.x - radius <= self.width as f64
            && center.y - radius <= self.height as f64
    }

    pub fn draw(&mut self, command: DrawCommand) {
        self.drawing_queue.push(command);
    }

    /// Get the current drawing queue
    pub fn drawing_queue(&self) -> &[DrawCommand] {
        &self.drawing_queue
    }

    pub fn circle_count(&self) -> usize {
        self.drawing_queue
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::Circle { .. }))
            .count()
    }
}
