use async_trait::async_trait;
use log::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::mangadex::Chapter;
use crate::mangadex_client::{ApiError, ChapterQuery, MangaDexClient};

/// Where the reader session gets its chapter list and page URLs from.
/// Implemented by `MangaDexClient`; tests substitute a fixture source.
#[async_trait]
pub trait ChapterSource {
    async fn chapter_list(&self, manga_id: Uuid) -> Result<Vec<Chapter>, ApiError>;
    async fn page_urls(&self, chapter_id: Uuid) -> Result<Vec<Url>, ApiError>;
}

#[async_trait]
impl ChapterSource for MangaDexClient {
    async fn chapter_list(&self, manga_id: Uuid) -> Result<Vec<Chapter>, ApiError> {
        // Default query: configured language, order[chapter]=desc, so the
        // returned list is newest first.
        Ok(self
            .manga_chapters(manga_id, &ChapterQuery::default())
            .await?
            .data)
    }

    async fn page_urls(&self, chapter_id: Uuid) -> Result<Vec<Url>, ApiError> {
        let at_home = self.chapter_pages(chapter_id).await?;
        Ok(at_home.page_urls()?)
    }
}

/// Tracks where the reader currently is within a manga's ordered chapter
/// sequence and resolves the renderable page list for the active chapter.
///
/// The chapter list is newest first (index 0 = most recent), so `next`
/// means "chronologically later chapter" and moves toward index 0, while
/// `previous` moves toward the end of the list. The held index is always
/// within `[0, chapters.len())`; a session without a located chapter admits
/// no transitions.
pub struct ReaderSession {
    manga_id: Uuid,
    chapters: Vec<Chapter>,
    current: Option<usize>,
    pages: Vec<Url>,
}

impl ReaderSession {
    /// Fetches the chapter list, locates `chapter_id` in it and resolves the
    /// page URLs for it. A `chapter_id` missing from the list yields a
    /// session with no current chapter and a guaranteed-empty page list; an
    /// empty chapter list is the terminal not-found state.
    pub async fn open<S: ChapterSource>(
        source: &S,
        manga_id: Uuid,
        chapter_id: Uuid,
    ) -> Result<Self, ApiError> {
        let chapters = source.chapter_list(manga_id).await?;
        let current = chapters.iter().position(|c| c.id == chapter_id);

        let pages = match current {
            Some(_) => source.page_urls(chapter_id).await?,
            None => {
                warn!("chapter {chapter_id} not in the feed of manga {manga_id}");
                Vec::new()
            }
        };

        debug!(
            "opened manga {manga_id}: {} chapters, current index {current:?}, {} pages",
            chapters.len(),
            pages.len()
        );
        Ok(Self {
            manga_id,
            chapters,
            current,
            pages,
        })
    }

    pub fn manga_id(&self) -> Uuid {
        self.manga_id
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn current_chapter(&self) -> Option<&Chapter> {
        self.current.map(|i| &self.chapters[i])
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Page URLs for the current chapter; empty when no chapter is located.
    pub fn pages(&self) -> &[Url] {
        &self.pages
    }

    /// Moves to the chronologically later chapter (one index toward 0).
    /// No-op at the newest chapter or when no chapter is located; returns
    /// the new current chapter only when a transition happened.
    pub fn next(&mut self) -> Option<&Chapter> {
        match self.current {
            Some(i) if i > 0 => self.transition(i - 1),
            _ => None,
        }
    }

    /// Moves to the chronologically earlier chapter (one index toward the
    /// end). No-op at the oldest chapter or when no chapter is located.
    pub fn previous(&mut self) -> Option<&Chapter> {
        match self.current {
            Some(i) if i + 1 < self.chapters.len() => self.transition(i + 1),
            _ => None,
        }
    }

    fn transition(&mut self, index: usize) -> Option<&Chapter> {
        self.current = Some(index);
        // The old page list belongs to the old chapter.
        self.pages.clear();
        Some(&self.chapters[index])
    }

    /// Re-resolves the page list after a transition. On failure the session
    /// keeps its prior state and the error goes back to the caller.
    pub async fn resolve_pages<S: ChapterSource>(
        &mut self,
        source: &S,
    ) -> Result<&[Url], ApiError> {
        let Some(chapter) = self.current_chapter() else {
            return Ok(&self.pages);
        };
        let pages = source.page_urls(chapter.id).await?;
        self.pages = pages;
        Ok(&self.pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    struct FixtureSource {
        chapters: Vec<Chapter>,
        pages: HashMap<Uuid, Vec<Url>>,
    }

    #[async_trait]
    impl ChapterSource for FixtureSource {
        async fn chapter_list(&self, _manga_id: Uuid) -> Result<Vec<Chapter>, ApiError> {
            Ok(self.chapters.clone())
        }

        async fn page_urls(&self, chapter_id: Uuid) -> Result<Vec<Url>, ApiError> {
            Ok(self.pages.get(&chapter_id).cloned().unwrap_or_default())
        }
    }

    fn chapter(id: Uuid, number: &str) -> Chapter {
        serde_json::from_value(json!({
            "id": id,
            "type": "chapter",
            "attributes": {
                "volume": "1",
                "chapter": number,
                "title": null,
                "translatedLanguage": "en",
                "pages": 10,
                "publishAt": "2021-05-24T17:02:37+00:00"
            },
            "relationships": []
        }))
        .unwrap()
    }

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n)
            .map(|i| format!("00000000-0000-4000-8000-{i:012}").parse().unwrap())
            .collect()
    }

    // Newest first: chapter "3" at index 0, "1" at the end.
    fn source(ids: &[Uuid]) -> FixtureSource {
        let numbers = ["3", "2", "1"];
        let chapters = ids
            .iter()
            .zip(numbers)
            .map(|(id, n)| chapter(*id, n))
            .collect();
        let mut pages = HashMap::new();
        for id in ids {
            let url = Url::parse(&format!("https://node.example/data/hash/{id}.png")).unwrap();
            pages.insert(*id, vec![url]);
        }
        FixtureSource { chapters, pages }
    }

    fn manga_id() -> Uuid {
        "69060a67-1d4e-4110-9d29-838bfd99917f".parse().unwrap()
    }

    #[tokio::test]
    async fn open_locates_the_chapter_and_resolves_pages() {
        let ids = ids(3);
        let session = ReaderSession::open(&source(&ids), manga_id(), ids[1])
            .await
            .unwrap();

        assert_eq!(session.current_index(), Some(1));
        assert_eq!(session.current_chapter().unwrap().id, ids[1]);
        assert_eq!(session.pages().len(), 1);
        assert!(session.pages()[0].as_str().contains(&ids[1].to_string()));
    }

    #[tokio::test]
    async fn open_with_an_absent_chapter_yields_no_current_and_no_pages() {
        let ids = ids(3);
        let missing: Uuid = "ffffffff-ffff-4fff-8fff-ffffffffffff".parse().unwrap();
        let session = ReaderSession::open(&source(&ids), manga_id(), missing)
            .await
            .unwrap();

        assert!(session.current_chapter().is_none());
        assert!(session.pages().is_empty());
    }

    #[tokio::test]
    async fn next_moves_toward_newer_chapters_and_stops_at_the_newest() {
        let ids = ids(3);
        let mut session = ReaderSession::open(&source(&ids), manga_id(), ids[2])
            .await
            .unwrap();

        // Oldest chapter ("1") is the last index; next walks up to "3".
        assert_eq!(session.next().unwrap().attributes.chapter.as_deref(), Some("2"));
        assert_eq!(session.next().unwrap().attributes.chapter.as_deref(), Some("3"));
        assert_eq!(session.current_index(), Some(0));
        assert!(session.next().is_none());
        assert_eq!(session.current_index(), Some(0));
    }

    #[tokio::test]
    async fn previous_moves_toward_older_chapters_and_stops_at_the_oldest() {
        let ids = ids(3);
        let mut session = ReaderSession::open(&source(&ids), manga_id(), ids[0])
            .await
            .unwrap();

        assert_eq!(
            session.previous().unwrap().attributes.chapter.as_deref(),
            Some("2")
        );
        assert_eq!(
            session.previous().unwrap().attributes.chapter.as_deref(),
            Some("1")
        );
        assert!(session.previous().is_none());
        assert_eq!(session.current_index(), Some(2));
    }

    #[tokio::test]
    async fn transitions_are_inadmissible_without_a_located_chapter() {
        let empty = FixtureSource {
            chapters: Vec::new(),
            pages: HashMap::new(),
        };
        let any: Uuid = "ffffffff-ffff-4fff-8fff-ffffffffffff".parse().unwrap();
        let mut session = ReaderSession::open(&empty, manga_id(), any).await.unwrap();

        assert!(session.chapters().is_empty());
        assert!(session.next().is_none());
        assert!(session.previous().is_none());
    }

    #[tokio::test]
    async fn resolve_pages_follows_a_transition() {
        let ids = ids(3);
        let source = source(&ids);
        let mut session = ReaderSession::open(&source, manga_id(), ids[1]).await.unwrap();

        session.next().unwrap();
        // The stale page list is dropped on transition.
        assert!(session.pages().is_empty());

        let pages = session.resolve_pages(&source).await.unwrap();
        assert!(pages[0].as_str().contains(&ids[0].to_string()));
    }
}
