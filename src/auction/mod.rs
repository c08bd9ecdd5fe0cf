pub mod clock;
pub mod status;
