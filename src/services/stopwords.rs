//! French stopword list for the keyword analyzer.

use reqwest::Client;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{info, warn};

const FRENCH_STOPWORDS: &str = "\
au aux avec ce ces dans de des du elle en et eux il ils je la le les leur lui ma mais me \
même mes moi mon ne nos notre nous on ou par pas pour qu que qui sa se ses son sur ta te \
tes toi ton tu un une vos votre vous c d j l à m n s t y été étée étées étés étant étante \
étants étantes suis es est sommes êtes sont serai seras sera serons serez seront serais \
serait serions seriez seraient étais était étions étiez étaient fus fut fûmes fûtes furent \
sois soit soyons soyez soient fusse fusses fût fussions fussiez fussent ayant ayante \
ayantes ayants eu eue eues eus ai as avons avez ont aurai auras aura aurons aurez auront \
aurais aurait aurions auriez auraient avais avait avions aviez avaient eut eûmes eûtes \
eurent aie aies ait ayons ayez aient eusse eusses eût eussions eussiez eussent";

/// Set of lowercase words ignored by the keyword extractor.
#[derive(Debug, Clone)]
pub struct StopwordSet {
    words: HashSet<String>,
    source: String,
}

impl StopwordSet {
    /// The embedded French list.
    pub fn french() -> Self {
        Self::from_text(FRENCH_STOPWORDS, "embedded:french")
    }

    /// Parse whitespace-separated words.
    pub fn from_text(text: &str, source: &str) -> Self {
        Self {
            words: text
                .split_whitespace()
                .map(|w| w.trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
            source: source.to_string(),
        }
    }

    /// Fetch a list once from `url`, keeping the embedded list if that fails.
    pub async fn load(url: Option<&str>) -> Self {
        let Some(url) = url else {
            return Self::french();
        };

        match fetch(url).await {
            Ok(text) => {
                let set = Self::from_text(&text, url);
                if set.words.is_empty() {
                    warn!(url = %url, "Fetched stopword list is empty, using embedded list");
                    return Self::french();
                }
                info!(url = %url, words = set.words.len(), "Loaded stopword list");
                set
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Stopword fetch failed, using embedded list");
                Self::french()
            }
        }
    }

    pub fn words(&self) -> &HashSet<String> {
        &self.words
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

async fn fetch(url: &str) -> Result<String, reqwest::Error> {
    let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
    client.get(url).send().await?.error_for_status()?.text().await
}
