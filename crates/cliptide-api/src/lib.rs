// Cliptide API library, shared by the server and export-openapi binaries

pub mod api;
pub mod auth;
pub mod media;
pub mod openapi;
pub mod services;
pub mod storage;
