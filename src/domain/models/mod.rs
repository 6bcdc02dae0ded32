mod action;
mod attachment;
mod author;
mod backend;
mod course;
mod event;
mod loading;
mod notice;
mod slash_command;
mod student;
mod study_group;
mod textarea;
mod turn;
mod view;

pub use action::*;
pub use attachment::*;
pub use author::*;
pub use backend::*;
pub use course::*;
pub use event::*;
pub use loading::*;
pub use notice::*;
pub use slash_command::*;
pub use student::*;
pub use study_group::*;
pub use textarea::*;
pub use turn::*;
pub use view::*;
