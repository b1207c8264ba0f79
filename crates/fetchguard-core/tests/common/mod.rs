#![allow(dead_code)]

pub mod redirect_server;
pub mod scripted;
