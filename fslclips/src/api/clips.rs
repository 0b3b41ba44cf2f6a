// SPDX-License-Identifier: GPL-2.0-or-later
use std::path::PathBuf;

use fslclips_api_structs::{Clip, ClipEnvelope, Clips};
use reqwest::{multipart, Body};
use tokio_util::codec::{BytesCodec, FramedRead};
use tracing::instrument;

use super::Api;
use crate::Error;

/// A new clip: the video on disk and its two descriptions.
#[derive(Clone, Debug)]
pub struct ClipUpload {
    pub description_ph: String,
    pub description_en: String,
    pub file: PathBuf,
}

impl ClipUpload {
    fn mime_type(&self) -> &'static str {
        match self
            .file
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("mp4") | Some("m4v") => "video/mp4",
            Some("webm") => "video/webm",
            Some("mov") => "video/quicktime",
            Some("ogv") => "video/ogg",
            _ => "application/octet-stream",
        }
    }

    /// Build the multipart form, streaming the video from disk.
    fn form(&self) -> Result<multipart::Form, Error> {
        let file_name = self
            .file
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("clip")
            .to_owned();
        let clip = std::fs::File::open(&self.file)?;
        let clip_len = clip.metadata()?.len();
        let clip_stream = FramedRead::new(tokio::fs::File::from_std(clip), BytesCodec::new());
        let clip_part =
            multipart::Part::stream_with_length(Body::wrap_stream(clip_stream), clip_len)
                .file_name(file_name)
                .mime_str(self.mime_type())?;
        Ok(multipart::Form::new()
            .text("description_ph", self.description_ph.clone())
            .text("description_en", self.description_en.clone())
            .part("clip", clip_part))
    }
}

impl Api {
    /// List every clip.
    #[instrument(skip(self))]
    pub async fn clips(&self) -> Result<Vec<Clip>, Error> {
        Ok(self.get_json::<Clips>("/clips").await?.clips)
    }

    /// Get a single clip by ID.
    #[instrument(skip(self))]
    pub async fn clip(&self, clip_id: &str) -> Result<Clip, Error> {
        Ok(self
            .get_json::<ClipEnvelope>(&format!("/clip/{clip_id}"))
            .await?
            .clip)
    }

    /// Upload a new clip.
    #[instrument(skip(self))]
    pub async fn create_clip(&self, upload: &ClipUpload) -> Result<Clip, Error> {
        let url = self.url("/clip")?;
        let response = self
            .send(|client| Ok(client.post(url.clone()).multipart(upload.form()?)))
            .await?;
        Ok(response.json::<ClipEnvelope>().await?.clip)
    }

    /// Replace the descriptions of a clip; the video stays as it is.
    #[instrument(skip(self))]
    pub async fn update_clip(
        &self,
        clip_id: &str,
        description_ph: &str,
        description_en: &str,
    ) -> Result<Clip, Error> {
        let fields = [
            ("description_ph", description_ph.to_owned()),
            ("description_en", description_en.to_owned()),
        ];
        Ok(self
            .post_form::<ClipEnvelope>(&format!("/clip/{clip_id}"), &fields)
            .await?
            .clip)
    }

    #[instrument(skip(self))]
    pub async fn delete_clip(&self, clip_id: &str) -> Result<(), Error> {
        self.delete(&format!("/clip/{clip_id}")).await
    }
}
