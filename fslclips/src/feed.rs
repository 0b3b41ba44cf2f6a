// SPDX-License-Identifier: GPL-2.0-or-later
//! The learner feed: clips one at a time, more fetched as the end comes into view,
//! and quizzes that hold the feed in place until they are answered.
//!
//! [`Feed`] is the bare state machine and knows nothing about the network;
//! [`FeedView`] drives it with the backend and the modal.
use fslclips_api_structs::{FeedEntry, QuizAttempt, QuizItem};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    api::Api,
    modal::{Info, Modal},
    screen::MountGuard,
    Error,
};

/// How close to the end of the loaded entries the feed asks for more.
const PREFETCH_DISTANCE: usize = 2;

/// Touch input the feed understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gesture {
    /// Next entry.
    SwipeUp,
    /// Previous entry.
    SwipeDown,
    /// Play or pause the current clip.
    Tap,
}

/// What an attempt to move through the feed did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Moved,
    /// Moved, and the end is close enough that another batch should be fetched.
    MovedNeedsMore,
    /// Already at the edge of what is loaded.
    Stay,
    /// A quiz is on screen.
    Blocked,
}

#[derive(Clone, Debug, Default)]
pub struct Feed {
    entries: Vec<FeedEntry>,
    index: Option<usize>,
    last_fetched: Vec<String>,
    playing: bool,
    fetch_in_flight: bool,
}

impl Feed {
    /// An empty feed that will ask the backend to skip `last_fetched`.
    pub fn new(last_fetched: Vec<String>) -> Self {
        Feed {
            last_fetched,
            ..Default::default()
        }
    }

    pub fn entries(&self) -> &[FeedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `None` until something has loaded.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn current(&self) -> Option<&FeedEntry> {
        self.index.and_then(|index| self.entries.get(index))
    }

    pub fn current_quiz(&self) -> Option<&QuizItem> {
        match self.current() {
            Some(FeedEntry::Quiz(quiz)) => Some(quiz),
            _ => None,
        }
    }

    pub fn quiz_blocking(&self) -> bool {
        self.current_quiz().is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn fetch_in_flight(&self) -> bool {
        self.fetch_in_flight
    }

    /// The identifiers to leave out of the next batch: those of the last batch.
    pub fn exclusion(&self) -> &[String] {
        &self.last_fetched
    }

    /// Record that a fetch was sent so no second one is triggered meanwhile.
    pub fn begin_fetch(&mut self) {
        self.fetch_in_flight = true;
    }

    /// Add a batch to the end of the feed without moving.
    pub fn append(&mut self, batch: Vec<FeedEntry>) {
        self.fetch_in_flight = false;
        self.last_fetched = batch
            .iter()
            .filter_map(FeedEntry::clip_id)
            .map(str::to_owned)
            .collect();
        self.entries.extend(batch);
        if self.index.is_none() && !self.entries.is_empty() {
            self.index = Some(0);
            self.playing = true;
        }
    }

    pub fn fetch_failed(&mut self) {
        self.fetch_in_flight = false;
    }

    pub fn advance(&mut self) -> Step {
        let Some(index) = self.index else {
            return Step::Stay;
        };
        if self.quiz_blocking() {
            return Step::Blocked;
        }
        if index + 1 >= self.entries.len() {
            return Step::Stay;
        }
        self.move_to(index + 1);
        if !self.fetch_in_flight && index + 1 + PREFETCH_DISTANCE >= self.entries.len() {
            self.fetch_in_flight = true;
            Step::MovedNeedsMore
        } else {
            Step::Moved
        }
    }

    pub fn retreat(&mut self) -> Step {
        let Some(index) = self.index else {
            return Step::Stay;
        };
        if self.quiz_blocking() {
            return Step::Blocked;
        }
        if index == 0 {
            return Step::Stay;
        }
        self.move_to(index - 1);
        Step::Moved
    }

    /// Play or pause the current clip; returns whether anything changed.
    pub fn toggle_play(&mut self) -> bool {
        match self.current() {
            Some(FeedEntry::Clip(_)) => {
                self.playing = !self.playing;
                true
            }
            _ => false,
        }
    }

    /// Drop everything loaded. The exclusion list survives so a reload doesn't
    /// start with what was just shown.
    pub fn reset(&mut self) {
        *self = Feed::new(std::mem::take(&mut self.last_fetched));
    }

    /// The newly current clip starts playing; the others are stopped.
    fn move_to(&mut self, index: usize) {
        self.index = Some(index);
        self.playing = true;
    }
}

/// The watch screen.
#[derive(Debug)]
pub struct FeedView {
    api: Api,
    modal: Modal,
    media: Url,
    mount: MountGuard,
    feed: Feed,
    /// The batch a swipe asked for, still on its way.
    prefetch: Option<JoinHandle<Result<Vec<FeedEntry>, Error>>>,
    loading: bool,
    error: Option<String>,
}

impl FeedView {
    pub fn new(api: Api, modal: Modal, media: Url) -> Self {
        let last_clips = api.session().get().last_clips;
        FeedView {
            api,
            modal,
            media,
            mount: MountGuard::default(),
            feed: Feed::new(last_clips),
            prefetch: None,
            loading: false,
            error: None,
        }
    }

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Set when the first batch couldn't be fetched.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Where a clip's video or thumbnail is served from.
    pub fn media_link(&self, path: &str) -> Result<Url, Error> {
        Ok(self.media.join(path.trim_start_matches('/'))?)
    }

    /// Fetch the first batch; later calls do nothing until [`FeedView::reload`].
    pub async fn mount(&mut self) {
        if !self.mount.first() {
            return;
        }
        self.loading = true;
        self.feed.begin_fetch();
        let result = self.api.random_clips(self.feed.exclusion()).await;
        self.land(result);
    }

    /// Move to the next entry. Landing near the end sends a request for another
    /// batch in the background; [`FeedView::prefetched`] adds it once it arrives.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn next(&mut self) -> Step {
        let step = self.feed.advance();
        if step == Step::MovedNeedsMore {
            let api = self.api.clone();
            let exclude = self.feed.exclusion().to_vec();
            debug!(?exclude, "Prefetching clips");
            self.prefetch = Some(tokio::spawn(async move {
                api.random_clips(&exclude).await
            }));
        }
        step
    }

    pub fn prefetching(&self) -> bool {
        self.prefetch.is_some()
    }

    /// Wait for the batch requested by [`FeedView::next`] and append it.
    ///
    /// Never resolves when nothing was requested, so it can sit in a `select!`
    /// beside user input. Cancelling it leaves the request running.
    pub async fn prefetched(&mut self) {
        let Some(task) = self.prefetch.as_mut() else {
            return std::future::pending().await;
        };
        let joined = task.await;
        self.prefetch = None;
        match joined {
            Ok(result) => self.land(result),
            Err(err) => {
                warn!(error = %err, "Prefetch task did not finish");
                self.feed.fetch_failed();
            }
        }
    }

    pub fn previous(&mut self) -> Step {
        self.feed.retreat()
    }

    pub fn tap(&mut self) -> bool {
        self.feed.toggle_play()
    }

    /// Swipes and taps are just other ways to call next, previous and tap.
    pub fn gesture(&mut self, gesture: Gesture) -> Step {
        match gesture {
            Gesture::SwipeUp => self.next(),
            Gesture::SwipeDown => self.previous(),
            Gesture::Tap if self.feed.quiz_blocking() => Step::Blocked,
            Gesture::Tap => {
                self.tap();
                Step::Stay
            }
        }
    }

    /// Answer the quiz on screen with option `choice`.
    ///
    /// The attempt is reported to the backend, the result shown, and once it's
    /// acknowledged the feed starts over. Returns whether the answer was right, or
    /// `None` if no quiz is showing or there is no such option.
    pub async fn choose(&mut self, choice: usize) -> Option<bool> {
        let quiz = self.feed.current_quiz()?.clone();
        let picked = quiz.options.get(choice)?;
        let attempt = QuizAttempt {
            clip_id: picked.clip.clip_id.clone(),
            correct: picked.correct,
        };
        if let Err(err) = self.api.quiz_attempt(&attempt).await {
            warn!(error = %err, "Unable to record the quiz attempt");
        }

        let result = if picked.correct {
            Info::new()
                .title("Correct!")
                .message(format!("That is the sign for \"{}\".", picked.clip.description_ph))
        } else {
            let answer = quiz
                .correct_option()
                .map(|option| format!("The right answer was \"{}\".", option.clip.description_ph))
                .unwrap_or_else(|| "That wasn't it.".to_string());
            Info::new().title("Not quite").message(answer)
        };
        info!(correct = picked.correct, "Quiz answered");
        self.modal.info(result.ok("Continue")).await;

        self.reload().await;
        Some(picked.correct)
    }

    /// Start over as if the screen had just been opened.
    pub async fn reload(&mut self) {
        self.abort_prefetch();
        self.feed.reset();
        self.error = None;
        self.mount.reset();
        self.mount().await;
    }

    fn abort_prefetch(&mut self) {
        if let Some(task) = self.prefetch.take() {
            task.abort();
        }
    }

    fn land(&mut self, result: Result<Vec<FeedEntry>, Error>) {
        match result {
            Ok(batch) => {
                debug!(count = batch.len(), "Fetched clips");
                self.feed.append(batch);
                let shown = self.feed.exclusion().to_vec();
                if let Err(err) = self.api.session().set_last_clips(shown) {
                    warn!(error = %err, "Unable to remember the fetched clips");
                }
                self.error = None;
            }
            Err(err) => {
                warn!(error = %err, "Error fetching clips");
                self.feed.fetch_failed();
                // Later batches failing leaves what's loaded watchable.
                if self.feed.is_empty() {
                    self.error = Some("Error fetching clips".into());
                }
            }
        }
        self.loading = false;
    }
}

impl Drop for FeedView {
    fn drop(&mut self) {
        self.abort_prefetch();
    }
}
