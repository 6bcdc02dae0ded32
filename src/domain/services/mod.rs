pub mod actions;
mod app_state;
mod catalog;
pub mod events;
mod notices;
pub mod renderer;
mod scroll;
mod transcript;
mod transcript_view;

pub use app_state::*;
pub use catalog::*;
pub use notices::*;
pub use scroll::*;
pub use transcript::*;
pub use transcript_view::*;
