pub mod app;
pub mod catalog;
pub mod chain;
pub mod codegen;
pub mod commands;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod env;
pub mod info;
pub mod inputs;
pub mod output;
pub mod run;
pub mod runtime;
