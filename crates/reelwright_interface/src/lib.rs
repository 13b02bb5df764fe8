//! Trait definitions for the collaborators Reelwright orchestrates but does not implement.
//!
//! - Persistence: one repository trait per record type, combined into [`Store`]
//! - The worker queue that runs generation jobs ([`JobQueue`])
//! - Generation vendors ([`ScriptGenerator`], [`VoiceSynthesizer`], [`ImageGenerator`]) selected by id through [`ProviderRegistry`]
//! - Static lookup tables ([`Catalog`])
//! - Admin settings ([`SettingsSource`])
//! - The authenticated [`Caller`]

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod caller;
mod catalog;
mod providers;
mod queue;
mod repository;
mod settings;

pub use caller::Caller;
pub use catalog::Catalog;
pub use providers::{
    GeneratedImages, GeneratedScript, ImageGenerator, ImageRequest, ImageRequestBuilder,
    ProviderRegistry, ScriptGenerator, ScriptParams, ScriptParamsBuilder, SynthesizedVoice,
    VoiceSynthesizer,
};
pub use queue::JobQueue;
pub use repository::{
    AutomationRepository, CharacterRepository, SeriesRepository, SocialAccountRepository, Store,
    UserRepository, VideoRepository,
};
pub use settings::SettingsSource;
