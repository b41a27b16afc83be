//! SwitchForge: a vendor-neutral switch configuration compiler and
//! delivery pipeline.
//!
//! The configuration model ([`models::Switch`]) is populated by the
//! operator-facing caller, compiled into vendor CLI text by
//! [`generator::generate_config`], and delivered out-of-band via
//! [`transport::tftp::TftpDelivery`] or
//! [`transport::serial::SerialConfigSender`].

pub mod config;
pub mod generator;
pub mod models;
pub mod profile;
pub mod templates;
pub mod transport;
