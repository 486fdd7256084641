// Role button workflows
pub mod publish;
pub mod role_button;
