pub mod cv_data;

pub use cv_data::CvDocument;
