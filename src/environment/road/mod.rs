pub mod assets;
pub mod car;
pub mod collision_field;
pub mod console_drawer;
pub mod console_presenter;
