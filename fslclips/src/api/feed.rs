// SPDX-License-Identifier: GPL-2.0-or-later
use fslclips_api_structs::{FeedEntry, QuizAttempt, RandomClips};
use tracing::instrument;

use super::Api;
use crate::Error;

impl Api {
    /// Fetch a batch of feed entries, asking the backend to leave out `exclude`.
    #[instrument(skip(self))]
    pub async fn random_clips(&self, exclude: &[String]) -> Result<Vec<FeedEntry>, Error> {
        let mut url = self.url("/randomClips")?;
        url.query_pairs_mut().append_pair("exclude", &exclusion(exclude)?);
        let response = self.send(|client| Ok(client.get(url.clone()))).await?;
        Ok(response.json::<RandomClips>().await?.clips)
    }

    /// Tell the backend how a quiz went.
    #[instrument(skip(self))]
    pub async fn quiz_attempt(&self, attempt: &QuizAttempt) -> Result<(), Error> {
        self.post_json("/quizAttempt", attempt).await
    }
}

/// Encode identifiers the way the backend issued them: numeric ids as JSON
/// numbers, anything else as strings.
fn exclusion(ids: &[String]) -> Result<String, Error> {
    let ids: Vec<serde_json::Value> = ids
        .iter()
        .map(|id| match id.parse::<u64>() {
            Ok(number) => serde_json::Value::from(number),
            Err(_) => serde_json::Value::from(id.as_str()),
        })
        .collect();
    Ok(serde_json::to_string(&ids)?)
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};

    use super::exclusion;

    use crate::api::tests::signed_in;

    #[tokio::test]
    async fn exclusion_is_a_json_array() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/randomClips")
            .match_query(Matcher::UrlEncoded("exclude".into(), "[4,9]".into()))
            .with_body(r#"{"clips": []}"#)
            .expect(1)
            .create_async()
            .await;

        let batch = signed_in(&server)
            .random_clips(&["4".to_string(), "9".to_string()])
            .await
            .unwrap();
        assert!(batch.is_empty());
        mock.assert_async().await;
    }

    #[test]
    fn exclusion_keeps_id_kinds() {
        let ids = ["12".to_string(), "a1b2".to_string()];
        assert_eq!(r#"[12,"a1b2"]"#, exclusion(&ids).unwrap());
        assert_eq!("[]", exclusion(&[]).unwrap());
    }
}
