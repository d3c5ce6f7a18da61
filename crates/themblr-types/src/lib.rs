pub mod request;
pub mod types;
pub mod zones;

pub use request::{
    CardStyle, GenerateRequest, HeaderAlignment, Layout, NotesAvatarSize, PostWidth,
    RequestError, StructuredInput, Toggles,
};
pub use types::{
    ChangedZoneSummary, GenerateResponse, GenerationReport, Severity, ValidationCheck,
    ValidationResult,
};
pub use zones::{EditableZoneKey, EditableZones, LockedZoneKey, PartialEditableZones};
