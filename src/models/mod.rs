// Data models
pub mod button;
pub mod guild;
