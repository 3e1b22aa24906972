pub mod course;

pub use course::{ClassLink, CourseId};
