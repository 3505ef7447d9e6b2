pub mod controls;
pub mod legend;
pub mod popup;

#[cfg(feature = "egui")]
pub mod widget;

pub use controls::{ControlAction, ControlPosition, LayerControl};
pub use legend::{Legend, LegendEntry};
pub use popup::PopupContent;

#[cfg(feature = "egui")]
pub use widget::{MapWidget, MapWidgetConfig, MapWidgetExt};
