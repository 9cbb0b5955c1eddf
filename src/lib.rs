//! Content backend for the conference site: media, speakers and survey
//! responses kept in a relational store and an S3-compatible object store.

pub mod config;
pub mod db;
pub mod gateway;
pub mod local;
pub mod logging;
pub mod markup;
pub mod migration;
pub mod models;
pub mod s3;
pub mod site;
pub mod sync;
#[cfg(test)]
mod test_utils;
pub mod upload;
pub mod youtube;
