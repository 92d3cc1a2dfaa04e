pub mod at_home;
pub mod author;
pub mod chapter;
pub mod common;
pub mod locale;
pub mod manga;
pub mod statistics;
pub mod tracking;

pub use at_home::AtHome;
pub use author::{Author, Cover, ScanlationGroup};
pub use chapter::{Chapter, ChapterAttributes, MangaAggregate};
pub use common::{Entity, Paginated, Relationship, RelationshipKind, ResultEnvelope};
pub use locale::LocalizedText;
pub use manga::{ContentRating, Manga, MangaAttributes, MangaStatus, Tag};
pub use statistics::{ChapterStatistics, MangaStatistics};
pub use tracking::{HistoryEntry, ReadingStatus};
