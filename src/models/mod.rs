pub mod media;
pub mod speaker;
pub mod survey;

pub use media::{MediaItem, MediaItemPatch, MediaSource, MediaStats, MediaType};
pub use speaker::{parse_canonical_uuid, Speaker, SpeakerPatch};
pub use survey::{
    export_csv, AiExperience, AiServices, MaterialUseful, MissingInfo, Obstacles, Recommendation,
    SurveyResponse,
};
