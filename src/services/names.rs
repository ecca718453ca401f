//! Random villager names.

use crate::errors::Result;
use async_trait::async_trait;
use rand::{Rng, seq::SliceRandom};
use tracing::warn;

const FALLBACK_NAMES: &[&str] = &[
    "Ada", "Bram", "Cora", "Dex", "Edda", "Finn", "Greta", "Hugo", "Iris", "Jonah", "Kira",
    "Lars", "Mira", "Nico", "Opal", "Pike", "Quinn", "Rosa", "Silas", "Tess", "Ulla", "Vik",
    "Wren", "Yara", "Zane",
];

/// Anything that can produce villager names.
#[async_trait]
pub trait NameSource: Send + Sync {
    /// Returns up to `count` names.
    async fn names(&self, count: usize) -> Result<Vec<String>>;
}

/// Names from a web API answering with a JSON array of strings.
#[derive(Debug, Clone)]
pub struct HttpNameSource {
    client: reqwest::Client,
    url_template: String,
}

impl HttpNameSource {
    /// `url_template` must contain `{count}`.
    #[must_use]
    pub const fn new(client: reqwest::Client, url_template: String) -> Self {
        Self {
            client,
            url_template,
        }
    }
}

#[async_trait]
impl NameSource for HttpNameSource {
    async fn names(&self, count: usize) -> Result<Vec<String>> {
        let url = self.url_template.replace("{count}", &count.to_string());
        let names: Vec<String> =
            super::get_json(&self.client, "Name generator", &url, &[] as &[(&str, &str)]).await?;
        Ok(clean_names(names, count))
    }
}

fn clean_names(names: Vec<String>, count: usize) -> Vec<String> {
    names
        .into_iter()
        .map(|name| name.replace('_', " ").trim().to_string())
        .filter(|name| !name.is_empty())
        .take(count)
        .collect()
}

/// `count` built-in names; repeats get a numeric suffix.
pub fn fallback_names<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<String> {
    let mut pool: Vec<&str> = FALLBACK_NAMES.to_vec();
    pool.shuffle(rng);
    (0..count)
        .map(|i| {
            let base = pool[i % pool.len()];
            match i / pool.len() {
                0 => base.to_string(),
                round => format!("{base} {}", round + 1),
            }
        })
        .collect()
}

/// Asks `source` for names and falls back to built-in ones when it fails or comes up short.
pub async fn names_or_fallback(source: &dyn NameSource, count: usize) -> Vec<String> {
    let mut names = match source.names(count).await {
        Ok(names) => names,
        Err(e) => {
            warn!("Name source failed, using built-in names: {e}");
            Vec::new()
        }
    };

    if names.len() < count {
        let missing = count - names.len();
        names.extend(fallback_names(&mut rand::thread_rng(), missing));
    }
    names
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::errors::Error;
    use rand::{SeedableRng, rngs::StdRng};
    use std::collections::HashSet;

    struct FailingSource;

    #[async_trait]
    impl NameSource for FailingSource {
        async fn names(&self, _count: usize) -> Result<Vec<String>> {
            Err(Error::ExternalService {
                service: "Name generator",
                message: "HTTP 503".to_string(),
            })
        }
    }

    struct ShortSource;

    #[async_trait]
    impl NameSource for ShortSource {
        async fn names(&self, _count: usize) -> Result<Vec<String>> {
            Ok(vec!["Marta Quill".to_string()])
        }
    }

    #[test]
    fn test_fallback_names_are_unique() {
        let mut rng = StdRng::seed_from_u64(8);
        let names = fallback_names(&mut rng, 60);
        assert_eq!(names.len(), 60);
        assert_eq!(names.iter().collect::<HashSet<_>>().len(), 60);
    }

    #[test]
    fn test_clean_names() {
        let raw = vec![
            "Tom_Baker".to_string(),
            "   ".to_string(),
            "Ann".to_string(),
            "Extra".to_string(),
        ];
        assert_eq!(clean_names(raw, 2), vec!["Tom Baker", "Ann"]);
    }

    #[tokio::test]
    async fn test_names_or_fallback() {
        assert_eq!(names_or_fallback(&FailingSource, 5).await.len(), 5);

        let topped_up = names_or_fallback(&ShortSource, 3).await;
        assert_eq!(topped_up.len(), 3);
        assert_eq!(topped_up[0], "Marta Quill");
    }
}
