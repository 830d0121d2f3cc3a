pub mod column_pickers;
pub mod ingest_controls;
pub mod peak_panel;
pub mod plot_canvas;
pub mod scatter_panel;
