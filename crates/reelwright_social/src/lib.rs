//! Social platform publishing for Reelwright.
//!
//! [`PublishOrchestrator`] drives one [`VideoPublisher`] per platform and turns
//! every failure into an actionable message through [`classify_error`].
//!
//! # Platform Support
//!
//! - Facebook Reels: three-phase upload plus permalink polling
//! - YouTube Shorts: resumable upload session
//! - Instagram Reels: media container from a public URL, status poll, publish, permalink polling
//!
//! Manually posted links are checked with [`validate_manual_url`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod classify;
mod config;
mod facebook;
mod http;
mod instagram;
mod manual_link;
mod orchestrator;
mod permalink;
mod publisher;
mod youtube;

pub use classify::{PublishErrorCategory, classify_error, excerpt};
pub use config::PublishConfig;
pub use facebook::{FacebookPublisher, facebook_fallback_url};
pub use instagram::{InstagramPublisher, instagram_fallback_url};
pub use manual_link::validate_manual_url;
pub use orchestrator::PublishOrchestrator;
pub use permalink::resolve_permalink;
pub use publisher::{PublishRequest, PublishedPost, VideoPublisher, publish_error};
pub use youtube::{YoutubePublisher, youtube_shorts_url};
