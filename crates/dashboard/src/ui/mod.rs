pub(crate) mod app;
pub(crate) mod format;
pub(crate) mod terminal;
mod theme;
mod input;
mod render;
mod text;

pub(crate) use app::{AboutInfo, AppState};
pub(crate) use input::{handle_key_event, KeyOutcome};
pub(crate) use render::draw_ui;
pub(crate) use terminal::{restore_terminal, setup_terminal};
