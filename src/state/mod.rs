pub mod app_state;
pub mod palette;
pub mod panel_state;
pub mod plot_settings;
pub mod theme;
