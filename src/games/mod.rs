pub mod ninja_taisen;
