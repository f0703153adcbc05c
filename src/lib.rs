pub mod common;
pub mod game_planning;
pub mod lane;
