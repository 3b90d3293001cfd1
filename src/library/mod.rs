pub mod mover;

pub use mover::FileMover;
