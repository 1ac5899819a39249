//! Prompt validation, placeholder URL derivation and the generation/listing services.

pub mod dimensions;
pub mod generate;
pub mod image_url;
pub mod list;
pub mod record;

pub use dimensions::{ImageSize, resolve_dimensions};
pub use generate::{GenerationService, MIN_PROMPT_CHARS};
pub use image_url::{DEFAULT_IMAGE_BASE_URL, ImageUrlError, ImageUrlTemplate, build_seed};
pub use list::{DEFAULT_LIST_LIMIT, ListingService};
pub use record::{GenerateRequest, GenerationRecord, NewGeneration};

/// Collection holding one document per successful generation.
pub const GENERATION_COLLECTION: &str = "generation";
