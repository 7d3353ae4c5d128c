//! Backend de Leeterview: lista de categorías de artículos servida a través
//! de un cache read-through sobre Redis con PostgreSQL como fuente de verdad.

pub mod cache;
pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
