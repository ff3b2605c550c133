pub mod completion;
pub mod dispatcher;
