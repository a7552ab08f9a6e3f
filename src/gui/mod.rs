//! GUI module - Interactive chart window

mod app;

pub use app::BoxPlotViewer;
