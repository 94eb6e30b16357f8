pub mod entry;
pub mod event;
pub mod scene;
pub mod selection;
pub mod state;
