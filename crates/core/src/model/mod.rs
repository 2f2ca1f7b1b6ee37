mod count;
mod object_kind;
mod settings;
mod task;
mod voice;

pub use count::{Count, CountError};
pub use object_kind::{Gender, Noun, ObjectKind, ParseObjectKindError};
pub use settings::{PlaySettings, PlaySettingsDraft, SettingsError, SpeechProfile};
pub use task::{AnswerOption, Feedback, Task, TaskError, TaskKind};
pub use voice::{FALLBACK_LANGUAGE, Utterance, VoiceInfo, default_voice};
