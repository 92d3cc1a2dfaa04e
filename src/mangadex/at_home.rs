use serde::Deserialize;
use url::Url;

/// Page-serving node assignment from `GET /at-home/server/:chapterId`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtHome {
    pub result: String,
    pub base_url: Url,
    pub chapter: AtHomeChapter,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtHomeChapter {
    pub hash: String,
    pub data: Vec<String>,
    #[serde(default)]
    pub data_saver: Vec<String>,
}

impl AtHome {
    /// Full-quality page URLs, `{baseUrl}/data/{hash}/{filename}`, in reading
    /// order.
    pub fn page_urls(&self) -> Result<Vec<Url>, url::ParseError> {
        self.quality_urls("data", &self.chapter.data)
    }

    /// Compressed variants under `/data-saver/`.
    pub fn data_saver_urls(&self) -> Result<Vec<Url>, url::ParseError> {
        self.quality_urls("data-saver", &self.chapter.data_saver)
    }

    fn quality_urls(&self, quality: &str, files: &[String]) -> Result<Vec<Url>, url::ParseError> {
        files
            .iter()
            .map(|file| {
                self.base_url.join(&format!(
                    "/{quality}/{hash}/{file}",
                    hash = self.chapter.hash
                ))
            })
            .collect()
    }
}
