pub mod assessment;
pub mod citation;
pub mod entity;
pub mod source;
pub mod state;
