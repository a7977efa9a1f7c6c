mod actions;
mod app;
mod config;
mod dom;
mod export;
mod palette;
mod scene;
mod state;
mod surface;

pub use app::run;
pub use config::WidgetConfig;
