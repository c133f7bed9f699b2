//! Domain models shared by the repositories, the prerequisite graph and the HTTP layer.

pub mod course;
pub mod major;

pub use course::*;
pub use major::*;
