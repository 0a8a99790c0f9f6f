pub mod admin;
pub mod auth;
pub mod guard;
pub mod health;
pub mod kingdom;
pub mod news;
pub mod pages;
pub mod profile;
pub mod routes;
pub mod twitch;
