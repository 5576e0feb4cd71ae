pub mod decision;
pub mod project;
pub mod resource;
pub mod test_case;
pub mod user;
