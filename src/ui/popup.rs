use crate::data::quake::Earthquake;
use serde::{Deserialize, Serialize};

/// Text shown when a marker is clicked: a title, a rule, then body lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopupContent {
    pub title: String,
    #[serde(default)]
    pub body: Vec<String>,
}

impl PopupContent {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: Vec::new(),
        }
    }

    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.body.push(line.into());
        self
    }

    /// Place name over the origin time in UTC
    pub fn for_earthquake(quake: &Earthquake) -> Self {
        let title = quake
            .place
            .clone()
            .unwrap_or_else(|| "Unknown location".to_string());
        let time = quake
            .time()
            .map(|t| t.format("%a %b %d %Y %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "Unknown time".to_string());

        Self::new(title).with_line(time)
    }

    /// Plain-text rendition, the rule drawn as a dashed line
    pub fn to_text(&self) -> String {
        let mut text = self.title.clone();
        if !self.body.is_empty() {
            text.push_str("\n---\n");
            text.push_str(&self.body.join("\n"));
        }
        text
    }
}

#[cfg(feature = "egui")]
pub use self::egui_popup::{Popup, PopupStyle};

#[cfg(feature = "egui")]
mod egui_popup {
    use super::PopupContent;
    use crate::core::geo::LatLng;
    use egui::{Align2, Color32, FontId, Pos2, Rect, Response, Sense, Stroke, Ui, Vec2};

    #[derive(Debug, Clone)]
    pub struct PopupStyle {
        pub background_color: Color32,
        pub border_color: Color32,
        pub border_width: f32,
        pub rounding: f32,
        pub padding: f32,
        pub title_font: FontId,
        pub body_font: FontId,
        pub text_color: Color32,
        pub max_width: f32,
        /// Gap between the anchor and the popup's bottom edge
        pub offset: f32,
    }

    impl Default for PopupStyle {
        fn default() -> Self {
            Self {
                background_color: Color32::WHITE,
                border_color: Color32::GRAY,
                border_width: 1.0,
                rounding: 4.0,
                padding: 8.0,
                title_font: FontId::proportional(14.0),
                body_font: FontId::proportional(12.0),
                text_color: Color32::BLACK,
                max_width: 300.0,
                offset: 12.0,
            }
        }
    }

    /// A popup anchored to a marker position
    #[derive(Debug, Clone)]
    pub struct Popup {
        pub marker_id: String,
        pub position: LatLng,
        pub content: PopupContent,
        pub style: PopupStyle,
    }

    impl Popup {
        pub fn new(marker_id: String, position: LatLng, content: PopupContent) -> Self {
            Self {
                marker_id,
                position,
                content,
                style: PopupStyle::default(),
            }
        }

        /// Paints the popup above `anchor`. A click on it reports `clicked()`.
        pub fn render_at_screen_pos(&self, ui: &mut Ui, anchor: Pos2) -> Response {
            let style = &self.style;
            let wrap = style.max_width - style.padding * 2.0;
            let title = ui.fonts(|f| {
                f.layout(
                    self.content.title.clone(),
                    style.title_font.clone(),
                    style.text_color,
                    wrap,
                )
            });
            let body = ui.fonts(|f| {
                f.layout(
                    self.content.body.join("\n"),
                    style.body_font.clone(),
                    style.text_color,
                    wrap,
                )
            });

            let rule_gap = if self.content.body.is_empty() { 0.0 } else { 9.0 };
            let inner = Vec2::new(
                title.size().x.max(body.size().x),
                title.size().y + rule_gap + body.size().y,
            );
            let size = inner + Vec2::splat(style.padding * 2.0);
            let min = Pos2::new(anchor.x - size.x / 2.0, anchor.y - style.offset - size.y);
            let popup_rect = Rect::from_min_size(min, size);

            let painter = ui.painter();
            painter.rect_filled(popup_rect, style.rounding, style.background_color);
            painter.rect_stroke(
                popup_rect,
                style.rounding,
                Stroke::new(style.border_width, style.border_color),
            );

            let text_min = popup_rect.min + Vec2::splat(style.padding);
            let title_height = title.size().y;
            painter.galley(text_min, title, style.text_color);
            if rule_gap > 0.0 {
                let y = text_min.y + title_height + rule_gap / 2.0;
                painter.hline(
                    text_min.x..=text_min.x + inner.x,
                    y,
                    Stroke::new(1.0, Color32::LIGHT_GRAY),
                );
                painter.galley(
                    Pos2::new(text_min.x, text_min.y + title_height + rule_gap),
                    body,
                    style.text_color,
                );
            }
            painter.text(
                Pos2::new(popup_rect.max.x - 4.0, popup_rect.min.y + 2.0),
                Align2::RIGHT_TOP,
                "×",
                FontId::proportional(12.0),
                Color32::DARK_GRAY,
            );

            ui.allocate_rect(popup_rect, Sense::click())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;

    fn quake(place: Option<&str>, time_ms: Option<i64>) -> Earthquake {
        Earthquake {
            id: Some("us6000abcd".to_string()),
            position: LatLng::new(38.8, -122.8),
            depth_km: 2.1,
            magnitude: 0.9,
            place: place.map(str::to_string),
            time_ms,
        }
    }

    #[test]
    fn test_earthquake_popup() {
        let popup = PopupContent::for_earthquake(&quake(Some("The Geysers, CA"), Some(0)));
        assert_eq!(popup.title, "The Geysers, CA");
        assert_eq!(popup.body, vec!["Thu Jan 01 1970 00:00:00 UTC".to_string()]);
        assert_eq!(
            popup.to_text(),
            "The Geysers, CA\n---\nThu Jan 01 1970 00:00:00 UTC"
        );
    }

    #[test]
    fn test_missing_place_and_time() {
        let popup = PopupContent::for_earthquake(&quake(None, None));
        assert_eq!(popup.title, "Unknown location");
        assert_eq!(popup.body, vec!["Unknown time".to_string()]);
    }

    #[test]
    fn test_title_only_text() {
        assert_eq!(PopupContent::new("Pacific").to_text(), "Pacific");
    }
}
