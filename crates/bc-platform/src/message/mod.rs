//! Message aggregate: entity, repository, save pipeline, HTTP surface.

pub mod api;
pub mod entity;
pub mod repository;
pub mod service;
mod view;
