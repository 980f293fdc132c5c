pub mod backend;
pub mod cli;
pub mod config;
pub mod event;
pub mod inference;
pub mod pipeline;
pub mod timeline;
pub mod web;
