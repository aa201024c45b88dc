pub mod client;

pub use client::{HttpMailService, MailService};
