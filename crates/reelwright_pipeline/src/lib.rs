//! Video lifecycle orchestration for Reelwright.
//!
//! [`LifecycleService`] owns every user-driven transition of a video (stop,
//! retry, assemble, image regeneration, publish, reset-posted, manual links)
//! plus series deletion and automation schedules. [`AutomationTrigger`]
//! starts new videos. Both plan worker jobs through [`JobPlanner`], which
//! resolves providers afresh each time.
//!
//! [`InMemoryStore`] and [`InMemoryJobQueue`] back the server when no
//! external store is configured, and every test.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod lifecycle;
mod media;
mod memory;
mod planner;
mod posting;
mod series;
mod settings;
mod trigger;

pub use catalog::StaticCatalog;
pub use lifecycle::{LifecycleService, MAX_WRITE_ATTEMPTS, Submission};
pub use media::MediaConfig;
pub use memory::{InMemoryJobQueue, InMemoryStore};
pub use planner::{JobInputs, JobPlanner};
pub use series::SeriesDeletion;
pub use settings::{CachedSettings, StaticSettings};
pub use trigger::{AutomationTrigger, TriggerOutcome};
