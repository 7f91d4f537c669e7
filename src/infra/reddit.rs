use crate::common::error::{PipelineError, Result};
use crate::domain::{RawRecord, RecordKind};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{info, warn};

const BASE_URL: &str = "https://www.reddit.com";
const PAGE_SIZE: usize = 100;

/// Fetches newest submissions plus their top-level comments from the
/// public JSON listing endpoints and shapes them into raw records.
pub struct RedditClient {
    client: reqwest::Client,
    user_agent: String,
}

impl RedditClient {
    pub fn new(user_agent: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            user_agent,
        }
    }

    pub async fn fetch_posts_and_comments(
        &self,
        subreddits: &[String],
        post_limit: usize,
    ) -> Result<Vec<RawRecord>> {
        let mut records = Vec::new();
        for subreddit in subreddits {
            let posts = self.fetch_new_posts(subreddit, post_limit).await?;
            info!("Fetched {} posts from r/{subreddit}", posts.len());
            for post in posts {
                let record = self.post_record(subreddit, &post)?;
                let post_id = record.id.clone();
                let post_title = record.title.clone();
                records.push(record);

                // A failed comment fetch skips that post's comments and
                // keeps the run going, matching per-record degradation.
                match self.fetch_comments(subreddit, &post_id, &post_title, &post).await {
                    Ok(mut comments) => records.append(&mut comments),
                    Err(e) => warn!("Failed to load comments for {post_id}: {e}"),
                }
            }
        }
        Ok(records)
    }

    async fn fetch_new_posts(&self, subreddit: &str, post_limit: usize) -> Result<Vec<Value>> {
        let mut posts = Vec::new();
        let mut after: Option<String> = None;

        while posts.len() < post_limit {
            let limit = PAGE_SIZE.min(post_limit - posts.len());
            let mut url = format!("{BASE_URL}/r/{subreddit}/new.json?limit={limit}");
            if let Some(cursor) = &after {
                url.push_str(&format!("&after={cursor}"));
            }

            let listing = self.fetch_json(&url).await?;
            let children = listing["data"]["children"]
                .as_array()
                .ok_or_else(|| PipelineError::MissingField("data.children".into()))?;
            if children.is_empty() {
                break;
            }
            for child in children {
                posts.push(child["data"].clone());
            }

            after = listing["data"]["after"].as_str().map(String::from);
            if after.is_none() {
                break;
            }
        }
        Ok(posts)
    }

    async fn fetch_comments(
        &self,
        subreddit: &str,
        post_id: &str,
        post_title: &str,
        post: &Value,
    ) -> Result<Vec<RawRecord>> {
        let url = format!("{BASE_URL}/r/{subreddit}/comments/{post_id}.json");
        let thread = self.fetch_json(&url).await?;

        // The thread endpoint answers [post listing, comment listing].
        let children = thread[1]["data"]["children"]
            .as_array()
            .ok_or_else(|| PipelineError::MissingField("comment children".into()))?;

        let post_url = post["url"].as_str().unwrap_or_default().to_string();
        let mut comments = Vec::new();
        for child in children {
            if child["kind"].as_str() != Some("t1") {
                continue;
            }
            let data = &child["data"];
            comments.push(RawRecord {
                subreddit: subreddit.to_string(),
                kind: RecordKind::Comment,
                title: format!("Comment on: {post_title}"),
                body: data["body"].as_str().unwrap_or_default().to_string(),
                url: post_url.clone(),
                score: data["score"].as_i64(),
                created_utc: epoch_to_utc(data["created_utc"].as_f64()),
                id: data["id"]
                    .as_str()
                    .ok_or_else(|| PipelineError::MissingField("comment id".into()))?
                    .to_string(),
            });
        }
        Ok(comments)
    }

    fn post_record(&self, subreddit: &str, data: &Value) -> Result<RawRecord> {
        Ok(RawRecord {
            subreddit: subreddit.to_string(),
            kind: RecordKind::Post,
            title: data["title"]
                .as_str()
                .ok_or_else(|| PipelineError::MissingField("post title".into()))?
                .to_string(),
            body: data["selftext"].as_str().unwrap_or_default().to_string(),
            url: data["url"].as_str().unwrap_or_default().to_string(),
            score: data["score"].as_i64(),
            created_utc: epoch_to_utc(data["created_utc"].as_f64()),
            id: data["id"]
                .as_str()
                .ok_or_else(|| PipelineError::MissingField("post id".into()))?
                .to_string(),
        })
    }

    async fn fetch_json(&self, url: &str) -> Result<Value> {
        let resp = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(PipelineError::Api {
                message: format!("{url} returned {}", resp.status()),
            });
        }
        Ok(resp.json().await?)
    }
}

fn epoch_to_utc(secs: Option<f64>) -> DateTime<Utc> {
    secs.and_then(|s| DateTime::from_timestamp(s as i64, 0))
        .unwrap_or_else(Utc::now)
}
