pub mod controller;
pub mod range_calculator;
pub mod snapper;
pub mod validator;
