use egui::{Color32, Visuals};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn visuals(&self) -> Visuals {
        match self {
            Theme::Dark => Visuals::dark(),
            Theme::Light => Visuals::light(),
        }
    }

    pub fn plot_bg(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgb(20, 20, 20),
            Theme::Light => Color32::from_rgb(229, 236, 246),
        }
    }

    pub fn grid_color(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgba_unmultiplied(100, 100, 100, 90),
            Theme::Light => Color32::from_rgb(255, 255, 255),
        }
    }

    /// Line color for the peak panel's signal trace.
    pub fn trace_color(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgb(120, 170, 255),
            Theme::Light => Color32::from_rgb(31, 119, 180),
        }
    }

    pub fn maximum_color(&self) -> Color32 {
        Color32::from_rgb(214, 39, 40)
    }

    pub fn minimum_color(&self) -> Color32 {
        Color32::from_rgb(44, 160, 44)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }
}
