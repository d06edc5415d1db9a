//! The seam between the presenter and whatever draws the map.

use std::time::Duration;

use jobglobe_data::Coordinate;

use super::{clustering::Cluster, viewport::Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    #[default]
    EaseInOut,
    EaseOutCubic,
}

/// Camera animation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlyOptions {
    pub duration: Duration,
    pub easing: Easing,
}

impl Default for FlyOptions {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(1200),
            easing: Easing::EaseInOut,
        }
    }
}

/// What the widget needs to draw one marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerView {
    pub id: usize,
    pub name: String,
    pub coordinate: Coordinate,
    pub tooltip: String,
}

/// Visible message overlaid on the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapNotice {
    /// The query had no location in it
    EmptyPrompt,
    GeocodeFailed(String),
}

impl MapNotice {
    pub fn message(&self) -> String {
        match self {
            Self::EmptyPrompt => {
                "Add a city, district or PIN code to your search to see jobs on the map".to_string()
            }
            Self::GeocodeFailed(reason) => format!("Couldn't find that place on the map: {reason}"),
        }
    }
}

/// Imperative map API driven by the presenter.
///
/// The presenter is the only caller; implementations never need to be shared.
pub trait MapWidget: Send + 'static {
    fn mount(&mut self, center: Coordinate, zoom: u8);
    fn unmount(&mut self);
    fn fly_to(&mut self, center: Coordinate, zoom: u8, options: FlyOptions);
    fn fit_bounds(&mut self, viewport: &Viewport, options: FlyOptions);
    fn add_marker(&mut self, marker: MarkerView);
    fn set_clusters(&mut self, clusters: &[Cluster]);
    fn clear_markers(&mut self);
    fn set_loading(&mut self, loading: bool);
    fn show_notice(&mut self, notice: Option<MapNotice>);
}

/// One call made on a [`RecordingWidget`].
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetCommand {
    Mount { center: Coordinate, zoom: u8 },
    Unmount,
    FlyTo { center: Coordinate, zoom: u8, options: FlyOptions },
    FitBounds { viewport: Viewport, options: FlyOptions },
    AddMarker(MarkerView),
    SetClusters(Vec<Cluster>),
    ClearMarkers,
    SetLoading(bool),
    ShowNotice(Option<MapNotice>),
}

/// Headless widget that keeps a log of every command it receives.
///
/// Used by the demos and tests, and by hosts that render the log themselves.
#[derive(Debug, Clone, Default)]
pub struct RecordingWidget {
    commands: Vec<WidgetCommand>,
}

impl RecordingWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[WidgetCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<WidgetCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Zoom levels of every fly-to, in call order.
    pub fn fly_zooms(&self) -> Vec<u8> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                WidgetCommand::FlyTo { zoom, .. } => Some(*zoom),
                _ => None,
            })
            .collect()
    }

    pub fn marker_ids(&self) -> Vec<usize> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                WidgetCommand::AddMarker(marker) => Some(marker.id),
                _ => None,
            })
            .collect()
    }
}

impl MapWidget for RecordingWidget {
    fn mount(&mut self, center: Coordinate, zoom: u8) {
        self.commands.push(WidgetCommand::Mount { center, zoom });
    }

    fn unmount(&mut self) {
        self.commands.push(WidgetCommand::Unmount);
    }

    fn fly_to(&mut self, center: Coordinate, zoom: u8, options: FlyOptions) {
        self.commands.push(WidgetCommand::FlyTo {
            center,
            zoom,
            options,
        });
    }

    fn fit_bounds(&mut self, viewport: &Viewport, options: FlyOptions) {
        self.commands.push(WidgetCommand::FitBounds {
            viewport: *viewport,
            options,
        });
    }

    fn add_marker(&mut self, marker: MarkerView) {
        self.commands.push(WidgetCommand::AddMarker(marker));
    }

    fn set_clusters(&mut self, clusters: &[Cluster]) {
        self.commands.push(WidgetCommand::SetClusters(clusters.to_vec()));
    }

    fn clear_markers(&mut self) {
        self.commands.push(WidgetCommand::ClearMarkers);
    }

    fn set_loading(&mut self, loading: bool) {
        self.commands.push(WidgetCommand::SetLoading(loading));
    }

    fn show_notice(&mut self, notice: Option<MapNotice>) {
        self.commands.push(WidgetCommand::ShowNotice(notice));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_widget_keeps_call_order() {
        let mut widget = RecordingWidget::new();
        let kochi = Coordinate::new(9.9816, 76.2999);
        widget.mount(Coordinate::new(22.35, 78.66), 5);
        widget.fly_to(kochi, 8, FlyOptions::default());
        widget.fly_to(kochi, 14, FlyOptions::default());
        widget.add_marker(MarkerView {
            id: 4,
            name: "Org".to_string(),
            coordinate: kochi,
            tooltip: String::new(),
        });
        assert_eq!(widget.fly_zooms(), vec![8, 14]);
        assert_eq!(widget.marker_ids(), vec![4]);
        assert!(matches!(widget.commands()[0], WidgetCommand::Mount { zoom: 5, .. }));

        let taken = widget.take_commands();
        assert_eq!(taken.len(), 4);
        assert!(widget.commands().is_empty());
    }

    #[test]
    fn test_notice_messages() {
        assert!(MapNotice::EmptyPrompt.message().contains("PIN code"));
        assert!(
            MapNotice::GeocodeFailed("timed out".to_string())
                .message()
                .ends_with("timed out")
        );
    }
}
