pub mod leaves;
pub mod settings;
pub mod users;
