pub mod compose;
pub mod richtext;
