pub mod battle;
pub mod board;
pub mod dice;
pub mod moves;
pub mod plugin;
pub mod types;
