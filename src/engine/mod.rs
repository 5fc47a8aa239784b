pub mod models;
pub mod evaluator;
pub mod bot_strategy;
pub mod lookahead;
pub mod simulator;
pub mod arena;
pub mod bot_profiles;
