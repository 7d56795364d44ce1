//! UI components for PixelMark
//!
//! The top toolbar, the modal dialogs it opens (settings, skins, snippets,
//! AI assistant), and the shared overlay/toast/confirm plumbing.

mod ai_modal;
mod dialogs;
mod icons;
mod settings;
mod skins;
mod snippets_modal;
pub mod toolbar;
mod window;

pub use ai_modal::{AiModal, AiModalOutput};
pub use dialogs::{show_alert_dialog, show_confirm_dialog, show_toast, ConfirmChoice};
pub use icons::get_app_icon;
pub use settings::{SettingsModal, SettingsModalOutput};
pub use skins::{SkinsModal, SkinsModalOutput};
pub use snippets_modal::{SnippetsModal, SnippetsModalOutput};
pub use toolbar::{ToolbarAction, TOOLBAR_HEIGHT};
pub use window::{handle_window_resize, is_in_resize_zone, WindowResizeState};
