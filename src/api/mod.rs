//! HTTP API - router and handlers

pub mod feed;
pub mod generate;
pub mod my_images;
pub mod publish;
pub mod routes;
