pub mod config;
pub mod history;
pub mod interpreter;
pub mod logging;
pub mod parser;
pub mod shapes;
pub mod state;
pub mod surface;
pub mod tui;
pub mod validator;
