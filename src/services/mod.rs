pub mod authenticator;
pub mod class_links;
pub mod course_discovery;
pub mod progress_store;

pub use authenticator::{Authenticator, Credentials};
pub use class_links::ClassLinkExtractor;
pub use course_discovery::CourseDiscovery;
pub use progress_store::ProgressStore;
