pub mod catalog;
pub mod feedback;
pub mod ranking;
pub mod recommendations;
pub mod similarity;
pub mod tfidf;

pub use catalog::Catalog;
pub use feedback::FeedbackSink;
pub use recommendations::{Backend, Recommender, Selection, Strategy};
