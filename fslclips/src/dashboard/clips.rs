// SPDX-License-Identifier: GPL-2.0-or-later
use std::path::PathBuf;

use fslclips_api_structs::Clip;
use tracing::{error, info, warn};

use crate::{
    api::{Api, ClipUpload},
    modal::{Confirm, Info, Modal},
    screen::{LoadState, MountGuard, Outcome},
    Error,
};

/// Every clip, with the option to delete each.
#[derive(Debug)]
pub struct ClipList {
    api: Api,
    modal: Modal,
    mount: MountGuard,
    clips: LoadState<Vec<Clip>>,
}

impl ClipList {
    pub fn new(api: Api, modal: Modal) -> Self {
        ClipList {
            api,
            modal,
            mount: MountGuard::default(),
            clips: LoadState::Idle,
        }
    }

    pub fn clips(&self) -> &LoadState<Vec<Clip>> {
        &self.clips
    }

    pub async fn mount(&mut self) {
        if !self.mount.first() {
            return;
        }
        self.clips = LoadState::Loading;
        self.clips = match self.api.clips().await {
            Ok(clips) => LoadState::Loaded(clips),
            Err(err) => {
                error!(error = %err, "Error fetching clips");
                LoadState::Failed("Error fetching clips".into())
            }
        };
    }

    /// Delete a clip once the user confirms; the list drops it without a re-fetch.
    pub async fn delete(&mut self, clip_id: &str) -> Outcome {
        let question = Confirm::new(format!(
            "Clip {clip_id} will be removed for everyone. Do you want to delete it?"
        ))
        .title("Delete clip")
        .yes("Delete")
        .warning();
        if self.modal.confirm(question).await != Some(true) {
            return Outcome::Cancelled;
        }

        match self.api.delete_clip(clip_id).await {
            Ok(()) => {
                info!(clip_id, "Deleted clip");
                if let Some(clips) = self.clips.loaded_mut() {
                    clips.retain(|clip| clip.clip_id != clip_id);
                }
                Outcome::Completed
            }
            Err(err) => {
                warn!(clip_id, error = %err, "Delete failed");
                self.modal
                    .info(
                        Info::new()
                            .title("Delete failed")
                            .message(err.user_message()),
                    )
                    .await;
                Outcome::Failed
            }
        }
    }
}

/// The upload form.
#[derive(Debug)]
pub struct AddClip {
    api: Api,
    modal: Modal,
    pub description_ph: String,
    pub description_en: String,
    pub file: Option<PathBuf>,
}

impl AddClip {
    pub fn new(api: Api, modal: Modal) -> Self {
        AddClip {
            api,
            modal,
            description_ph: String::new(),
            description_en: String::new(),
            file: None,
        }
    }

    fn upload(&self) -> Result<ClipUpload, Error> {
        let Some(file) = &self.file else {
            return Err(Error::Validation("Please choose a video to upload.".into()));
        };
        if !file.is_file() {
            return Err(Error::Validation(format!(
                "{} is not a video file.",
                file.display()
            )));
        }
        if self.description_ph.trim().is_empty() || self.description_en.trim().is_empty() {
            return Err(Error::Validation(
                "Please fill in both descriptions.".into(),
            ));
        }
        Ok(ClipUpload {
            description_ph: self.description_ph.clone(),
            description_en: self.description_en.clone(),
            file: file.clone(),
        })
    }

    /// Upload the clip. The form is emptied once the backend has it.
    pub async fn submit(&mut self) -> (Outcome, Option<Clip>) {
        let upload = match self.upload() {
            Ok(upload) => upload,
            Err(err) => {
                self.modal
                    .info(Info::new().title("Upload failed").message(err.user_message()))
                    .await;
                return (Outcome::Invalid, None);
            }
        };

        match self.api.create_clip(&upload).await {
            Ok(clip) => {
                info!(clip_id = %clip.clip_id, "Upload success");
                self.description_ph.clear();
                self.description_en.clear();
                self.file = None;
                self.modal
                    .info(
                        Info::new()
                            .title("Upload success")
                            .message(format!("Clip {} has been added.", clip.clip_id)),
                    )
                    .await;
                (Outcome::Completed, Some(clip))
            }
            Err(err) => {
                error!(error = %err, "Upload error");
                self.modal
                    .info(Info::new().title("Upload failed").message(err.user_message()))
                    .await;
                (Outcome::Failed, None)
            }
        }
    }
}

/// Editing the descriptions of one clip.
#[derive(Debug)]
pub struct EditClip {
    api: Api,
    modal: Modal,
    mount: MountGuard,
    clip_id: String,
    clip: LoadState<Clip>,
    pub description_ph: String,
    pub description_en: String,
}

impl EditClip {
    pub fn new(api: Api, modal: Modal, clip_id: impl Into<String>) -> Self {
        EditClip {
            api,
            modal,
            mount: MountGuard::default(),
            clip_id: clip_id.into(),
            clip: LoadState::Idle,
            description_ph: String::new(),
            description_en: String::new(),
        }
    }

    pub fn clip_id(&self) -> &str {
        &self.clip_id
    }

    pub fn clip(&self) -> &LoadState<Clip> {
        &self.clip
    }

    pub async fn mount(&mut self) {
        if !self.mount.first() {
            return;
        }
        self.clip = LoadState::Loading;
        match self.api.clip(&self.clip_id).await {
            Ok(clip) => {
                self.description_ph = clip.description_ph.clone();
                self.description_en = clip.description_en.clone();
                self.clip = LoadState::Loaded(clip);
            }
            Err(err) => {
                error!(clip_id = %self.clip_id, error = %err, "Error fetching clip");
                self.clip = LoadState::Failed(format!("Error fetching clip {}", self.clip_id));
            }
        }
    }

    pub async fn submit(&mut self) -> Outcome {
        let Some(clip) = self.clip.loaded() else {
            return Outcome::Invalid;
        };
        if clip.description_ph == self.description_ph && clip.description_en == self.description_en
        {
            self.modal
                .info(
                    Info::new()
                        .title("Update clip failed")
                        .message("No changes to update."),
                )
                .await;
            return Outcome::NoChanges;
        }
        if self.description_ph.trim().is_empty() {
            self.modal
                .info(
                    Info::new()
                        .title("Update clip failed")
                        .message("The Filipino description can't be empty."),
                )
                .await;
            return Outcome::Invalid;
        }

        match self
            .api
            .update_clip(&self.clip_id, &self.description_ph, &self.description_en)
            .await
        {
            Ok(updated) => {
                info!(clip_id = %self.clip_id, "Updated clip");
                self.description_ph = updated.description_ph.clone();
                self.description_en = updated.description_en.clone();
                self.clip = LoadState::Loaded(updated);
                self.modal
                    .info(
                        Info::new()
                            .title("Success")
                            .message("Clip has been successfully updated."),
                    )
                    .await;
                Outcome::Completed
            }
            Err(err) => {
                warn!(clip_id = %self.clip_id, error = %err, "Update failed");
                self.modal
                    .info(Info::new().title("Update failed").message(err.user_message()))
                    .await;
                Outcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use mockito::{Matcher, Server};

    use super::*;
    use crate::api::tests::signed_in;
    use crate::modal::{Dialog, Input};

    const CLIPS: &str = r#"{"clips": [
        {"clip_id": 1, "description_ph": "Salamat", "description_en": "Thank you",
         "video_url": "videos/1.mp4", "thumbnail_url": "thumbnails/1.png",
         "added_by": 1, "date_added": "2025-03-10T08:30:00Z"},
        {"clip_id": 2, "description_ph": "Maligayang kaarawan", "description_en": "Happy birthday",
         "video_url": "videos/2.mp4", "thumbnail_url": "thumbnails/2.png",
         "added_by": 1, "date_added": "2025-03-11T08:30:00Z"},
        {"clip_id": 3, "description_ph": "Magandang umaga", "description_en": "Good morning",
         "video_url": "videos/3.mp4", "thumbnail_url": "thumbnails/3.png",
         "added_by": 1, "date_added": "2025-03-12T08:30:00Z"}
    ]}"#;

    const CLIP: &str = r#"{"clip": {"clip_id": 2, "description_ph": "Maligayang kaarawan",
        "description_en": "Happy birthday", "video_url": "videos/2.mp4",
        "thumbnail_url": "thumbnails/2.png", "date_added": "2025-03-11T08:30:00Z"}}"#;

    async fn answer(modal: &Modal, input: Input) -> Dialog {
        let dialog = modal.opened().await;
        assert!(modal.input(input));
        dialog
    }

    fn ids(list: &ClipList) -> Vec<&str> {
        list.clips()
            .loaded()
            .unwrap()
            .iter()
            .map(|clip| clip.clip_id.as_str())
            .collect()
    }

    #[tokio::test]
    async fn confirmed_delete_removes_only_that_clip() {
        let mut server = Server::new_async().await;
        let list_mock = server
            .mock("GET", "/clips")
            .with_body(CLIPS)
            .expect(1)
            .create_async()
            .await;
        let delete_mock = server
            .mock("DELETE", "/clip/2")
            .with_body("{}")
            .expect(1)
            .create_async()
            .await;

        let modal = Modal::new();
        let mut list = ClipList::new(signed_in(&server), modal.clone());
        list.mount().await;
        list.mount().await;
        assert_eq!(vec!["1", "2", "3"], ids(&list));

        let (outcome, dialog) = tokio::join!(list.delete("2"), answer(&modal, Input::Affirm));
        assert_eq!(Outcome::Completed, outcome);
        assert!(matches!(dialog, Dialog::Confirm(ref confirm) if confirm.warning));
        assert_eq!(vec!["1", "3"], ids(&list));
        list_mock.assert_async().await;
        delete_mock.assert_async().await;
    }

    #[tokio::test]
    async fn declined_delete_keeps_everything() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/clips")
            .with_body(CLIPS)
            .create_async()
            .await;
        let delete_mock = server
            .mock("DELETE", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let modal = Modal::new();
        let mut list = ClipList::new(signed_in(&server), modal.clone());
        list.mount().await;
        let (outcome, _) = tokio::join!(list.delete("2"), answer(&modal, Input::Deny));
        assert_eq!(Outcome::Cancelled, outcome);
        assert_eq!(3, ids(&list).len());
        delete_mock.assert_async().await;
    }

    #[tokio::test]
    async fn failed_list_shows_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/clips")
            .with_status(500)
            .create_async()
            .await;

        let mut list = ClipList::new(signed_in(&server), Modal::new());
        list.mount().await;
        assert_eq!(Some("Error fetching clips"), list.clips().error());
    }

    #[tokio::test]
    async fn upload_requires_a_file() {
        let mut server = Server::new_async().await;
        let upload_mock = server
            .mock("POST", "/clip")
            .expect(0)
            .create_async()
            .await;

        let modal = Modal::new();
        let mut form = AddClip::new(signed_in(&server), modal.clone());
        form.description_ph = "Salamat".into();
        form.description_en = "Thank you".into();
        let ((outcome, clip), dialog) =
            tokio::join!(form.submit(), answer(&modal, Input::Acknowledge));
        assert_eq!(Outcome::Invalid, outcome);
        assert!(clip.is_none());
        assert!(matches!(dialog, Dialog::Info(ref info)
            if info.message.as_deref() == Some("Please choose a video to upload.")));
        upload_mock.assert_async().await;
    }

    #[tokio::test]
    async fn upload_clears_the_form() {
        let mut video = tempfile::Builder::new().suffix(".mp4").tempfile().unwrap();
        video.write_all(b"frames").unwrap();
        video.flush().unwrap();

        let mut server = Server::new_async().await;
        let upload_mock = server
            .mock("POST", "/clip")
            .with_body(CLIP)
            .expect(1)
            .create_async()
            .await;

        let modal = Modal::new();
        let mut form = AddClip::new(signed_in(&server), modal.clone());
        form.description_ph = "Maligayang kaarawan".into();
        form.description_en = "Happy birthday".into();
        form.file = Some(video.path().to_owned());
        let ((outcome, clip), _) =
            tokio::join!(form.submit(), answer(&modal, Input::Acknowledge));
        assert_eq!(Outcome::Completed, outcome);
        assert_eq!("2", clip.unwrap().clip_id);
        assert!(form.file.is_none());
        assert!(form.description_ph.is_empty());
        upload_mock.assert_async().await;
    }

    #[tokio::test]
    async fn unchanged_clip_is_not_sent() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/clip/2")
            .with_body(CLIP)
            .create_async()
            .await;
        let update_mock = server
            .mock("POST", "/clip/2")
            .expect(0)
            .create_async()
            .await;

        let modal = Modal::new();
        let mut form = EditClip::new(signed_in(&server), modal.clone(), "2");
        form.mount().await;
        assert_eq!("Happy birthday", form.description_en);

        let (outcome, dialog) = tokio::join!(form.submit(), answer(&modal, Input::Acknowledge));
        assert_eq!(Outcome::NoChanges, outcome);
        assert!(matches!(dialog, Dialog::Info(ref info)
            if info.message.as_deref() == Some("No changes to update.")));
        update_mock.assert_async().await;
    }

    #[tokio::test]
    async fn edited_clip_is_replaced() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/clip/2")
            .with_body(CLIP)
            .create_async()
            .await;
        let update_mock = server
            .mock("POST", "/clip/2")
            .match_body(Matcher::Regex("Happy birthday to you".into()))
            .with_body(CLIP.replace("\"Happy birthday\"", "\"Happy birthday to you\""))
            .expect(1)
            .create_async()
            .await;

        let modal = Modal::new();
        let mut form = EditClip::new(signed_in(&server), modal.clone(), "2");
        form.mount().await;
        form.description_en = "Happy birthday to you".into();

        let (outcome, dialog) = tokio::join!(form.submit(), answer(&modal, Input::Acknowledge));
        assert_eq!(Outcome::Completed, outcome);
        assert!(matches!(dialog, Dialog::Info(ref info)
            if info.title.as_deref() == Some("Success")));
        assert_eq!(
            "Happy birthday to you",
            form.clip().loaded().unwrap().description_en
        );
        update_mock.assert_async().await;
    }

    #[tokio::test]
    async fn missing_clip_is_reported() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/clip/9")
            .with_status(404)
            .with_body(r#"{"error": "Clip not found"}"#)
            .create_async()
            .await;

        let mut form = EditClip::new(signed_in(&server), Modal::new(), "9");
        form.mount().await;
        assert_eq!(Some("Error fetching clip 9"), form.clip().error());
        assert_eq!(Outcome::Invalid, form.submit().await);
    }
}
