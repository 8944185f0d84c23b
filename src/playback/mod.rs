pub mod clock;
pub mod options;
pub mod overlay;
pub mod track;
