#![doc = "content-crew-core: core logic library for content-crew."]

//! This crate contains the data models, crews, provider clients and pipeline for content-crew.
//! The CLI crate only handles prompting, terminal output and wiring.
//!
//! # Usage
//! Build [`settings::Settings`], a [`crew_config::CrewDefinition`] and
//! [`pipeline::CrewModels`], then call [`pipeline::run_validation`] followed by
//! [`pipeline::run_content_generation`].

pub mod artifacts;
pub mod brief;
pub mod contract;
pub mod crew;
pub mod crew_config;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod reports;
pub mod search;
pub mod settings;
pub mod storage;
pub mod structured;
pub mod template;
