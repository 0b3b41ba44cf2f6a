// SPDX-License-Identifier: GPL-2.0-or-later
//! The dialog shown above every screen.
//!
//! A [`Modal`] is either closed or showing exactly one [`Dialog`]. Confirm and info
//! dialogs park a responder in a single slot; the screen that opened the dialog
//! awaits it while the front end renders the dialog and feeds user input back with
//! [`Modal::input`]. Opening another dialog or closing this one drops the responder,
//! and the abandoned caller sees `None`.
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{oneshot, watch};
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModalOptions {
    /// Dim the screen behind the dialog.
    pub overlay: bool,
    /// Dismiss the dialog when the overlay, not the dialog itself, is clicked.
    pub close_on_overlay_click: bool,
}

impl Default for ModalOptions {
    fn default() -> Self {
        ModalOptions {
            overlay: true,
            close_on_overlay_click: false,
        }
    }
}

/// A yes/no question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Confirm {
    pub title: Option<String>,
    pub message: String,
    pub yes: String,
    pub no: String,
    pub overlay: bool,
    pub close_on_overlay_click: bool,
    /// Style the affirmative button as destructive.
    pub warning: bool,
}

impl Confirm {
    pub fn new(message: impl Into<String>) -> Self {
        Confirm {
            title: None,
            message: message.into(),
            yes: "Confirm".into(),
            no: "Cancel".into(),
            overlay: true,
            close_on_overlay_click: false,
            warning: false,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn yes(mut self, label: impl Into<String>) -> Self {
        self.yes = label.into();
        self
    }

    pub fn no(mut self, label: impl Into<String>) -> Self {
        self.no = label.into();
        self
    }

    pub fn overlay(mut self, overlay: bool) -> Self {
        self.overlay = overlay;
        self
    }

    pub fn close_on_overlay_click(mut self, close: bool) -> Self {
        self.close_on_overlay_click = close;
        self
    }

    pub fn warning(mut self) -> Self {
        self.warning = true;
        self
    }
}

/// A notice with a single acknowledgement button.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Info {
    pub title: Option<String>,
    pub message: Option<String>,
    pub ok: String,
    pub overlay: bool,
    pub close_on_overlay_click: bool,
}

impl Info {
    pub fn new() -> Self {
        Info {
            title: None,
            message: None,
            ok: "Okay".into(),
            overlay: true,
            close_on_overlay_click: true,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn ok(mut self, label: impl Into<String>) -> Self {
        self.ok = label.into();
        self
    }

    pub fn overlay(mut self, overlay: bool) -> Self {
        self.overlay = overlay;
        self
    }

    pub fn close_on_overlay_click(mut self, close: bool) -> Self {
        self.close_on_overlay_click = close;
        self
    }
}

impl Default for Info {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dialog {
    /// Arbitrary content; nobody is waiting on an answer.
    Content { body: String, options: ModalOptions },
    Confirm(Confirm),
    Info(Info),
}

impl Dialog {
    pub fn options(&self) -> ModalOptions {
        match self {
            Dialog::Content { options, .. } => *options,
            Dialog::Confirm(confirm) => ModalOptions {
                overlay: confirm.overlay,
                close_on_overlay_click: confirm.close_on_overlay_click,
            },
            Dialog::Info(info) => ModalOptions {
                overlay: info.overlay,
                close_on_overlay_click: info.close_on_overlay_click,
            },
        }
    }
}

/// Things a user can do to an open dialog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    /// A click on the dimmed area around the dialog.
    OverlayClick,
    /// A click anywhere inside the dialog that isn't a button.
    BodyClick,
    /// The confirm dialog's "yes" button.
    Affirm,
    /// The confirm dialog's "no" button.
    Deny,
    /// The info dialog's "ok" button.
    Acknowledge,
}

#[derive(Debug)]
enum Responder {
    Confirm(oneshot::Sender<bool>),
    Info(oneshot::Sender<()>),
}

impl Responder {
    /// What dismissing the dialog through the overlay answers.
    fn dismiss(self) {
        match self {
            Responder::Confirm(tx) => {
                let _ = tx.send(false);
            }
            Responder::Info(tx) => {
                let _ = tx.send(());
            }
        }
    }
}

#[derive(Debug)]
struct Shared {
    shown: watch::Sender<Option<Dialog>>,
    /// Held whenever `shown` is written.
    responder: Mutex<Option<Responder>>,
}

/// Handle to the app-wide dialog; clones share the same dialog.
#[derive(Clone, Debug)]
pub struct Modal {
    shared: Arc<Shared>,
}

impl Modal {
    pub fn new() -> Self {
        let (shown, _) = watch::channel(None);
        Modal {
            shared: Arc::new(Shared {
                shown,
                responder: Mutex::new(None),
            }),
        }
    }

    /// Follow the dialog as it opens, changes and closes.
    pub fn subscribe(&self) -> watch::Receiver<Option<Dialog>> {
        self.shared.shown.subscribe()
    }

    pub fn current(&self) -> Option<Dialog> {
        self.shared.shown.borrow().clone()
    }

    pub fn is_open(&self) -> bool {
        self.shared.shown.borrow().is_some()
    }

    /// Wait until a dialog is showing and return it.
    pub async fn opened(&self) -> Dialog {
        let mut shown = self.subscribe();
        loop {
            if let Some(dialog) = shown.borrow_and_update().clone() {
                return dialog;
            }
            // The sender lives as long as `self`, so this can't fail.
            if shown.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }

    /// Show arbitrary content.
    pub fn open(&self, body: impl Into<String>, options: ModalOptions) {
        let dialog = Dialog::Content {
            body: body.into(),
            options,
        };
        self.show(dialog, None);
    }

    /// Ask a yes/no question.
    ///
    /// Resolves `Some(true)` for the affirmative button and `Some(false)` for the
    /// negative one or for an overlay dismissal (if the request allows it). `None`
    /// means the dialog was closed or replaced before the user answered.
    pub async fn confirm(&self, request: Confirm) -> Option<bool> {
        let (tx, rx) = oneshot::channel();
        self.show(Dialog::Confirm(request), Some(Responder::Confirm(tx)));
        rx.await.ok()
    }

    /// Show a notice and wait for it to be acknowledged or dismissed.
    ///
    /// `None` means the dialog was closed or replaced first.
    pub async fn info(&self, request: Info) -> Option<()> {
        let (tx, rx) = oneshot::channel();
        self.show(Dialog::Info(request), Some(Responder::Info(tx)));
        rx.await.ok()
    }

    /// Close whatever is showing without answering anyone.
    pub fn close(&self) {
        let mut responder = self.responder();
        responder.take();
        self.shared.shown.send_replace(None);
    }

    /// Apply user input to the dialog; returns whether anything happened.
    pub fn input(&self, input: Input) -> bool {
        // The shown dialog only changes under this lock, so it and the responder
        // taken below belong together.
        let mut responder = self.responder();
        let Some(dialog) = self.current() else {
            return false;
        };
        let answered = match (input, &dialog) {
            (Input::OverlayClick, dialog) if dialog.options().close_on_overlay_click => {
                if let Some(responder) = responder.take() {
                    responder.dismiss();
                }
                true
            }
            (Input::Affirm | Input::Deny, Dialog::Confirm(_)) => {
                if let Some(Responder::Confirm(tx)) = responder.take() {
                    let _ = tx.send(input == Input::Affirm);
                }
                true
            }
            (Input::Acknowledge, Dialog::Info(_)) => {
                if let Some(Responder::Info(tx)) = responder.take() {
                    let _ = tx.send(());
                }
                true
            }
            _ => false,
        };
        if answered {
            self.shared.shown.send_replace(None);
        }
        answered
    }

    fn show(&self, dialog: Dialog, responder: Option<Responder>) {
        debug!(?dialog, "Opening dialog");
        let mut slot = self.responder();
        // Replacing the slot drops any earlier responder unanswered.
        *slot = responder;
        self.shared.shown.send_replace(Some(dialog));
    }

    fn responder(&self) -> MutexGuard<'_, Option<Responder>> {
        self.shared
            .responder
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Modal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Run `op` while answering the first dialog it opens with `input`.
    async fn answering<T>(
        modal: &Modal,
        input: Input,
        op: impl std::future::Future<Output = T>,
    ) -> T {
        let (out, _) = tokio::join!(op, async {
            modal.opened().await;
            assert!(modal.input(input));
        });
        out
    }

    #[tokio::test]
    async fn confirm_affirm_resolves_true() {
        let modal = Modal::new();
        let answer = answering(&modal, Input::Affirm, modal.confirm(Confirm::new("Sure?"))).await;
        assert_eq!(Some(true), answer);
        assert!(!modal.is_open());
    }

    #[tokio::test]
    async fn confirm_deny_resolves_false() {
        let modal = Modal::new();
        let answer = answering(&modal, Input::Deny, modal.confirm(Confirm::new("Sure?"))).await;
        assert_eq!(Some(false), answer);
        assert!(!modal.is_open());
    }

    #[tokio::test]
    async fn confirm_overlay_dismissal_resolves_false() {
        let modal = Modal::new();
        let request = Confirm::new("Sure?").close_on_overlay_click(true);
        let answer = answering(&modal, Input::OverlayClick, modal.confirm(request)).await;
        assert_eq!(Some(false), answer);
    }

    #[tokio::test]
    async fn confirm_ignores_overlay_by_default() {
        let modal = Modal::new();
        let (answer, _) = tokio::join!(modal.confirm(Confirm::new("Sure?")), async {
            modal.opened().await;
            assert!(!modal.input(Input::OverlayClick));
            assert!(!modal.input(Input::BodyClick));
            assert!(!modal.input(Input::Acknowledge));
            assert!(modal.is_open());
            assert!(modal.input(Input::Affirm));
            // The slot is spent; nothing answers twice.
            assert!(!modal.input(Input::Deny));
        });
        assert_eq!(Some(true), answer);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn late_click_never_answers_a_replacement() {
        let modal = Modal::new();
        for _ in 0..200 {
            let confirm = tokio::spawn({
                let modal = modal.clone();
                async move { modal.confirm(Confirm::new("Sure?")).await }
            });
            modal.opened().await;
            let click = std::thread::spawn({
                let modal = modal.clone();
                move || modal.input(Input::Affirm)
            });
            let info = tokio::spawn({
                let modal = modal.clone();
                async move { modal.info(Info::new().message("Done")).await }
            });
            click.join().unwrap();

            // Whichever came first, the notice ends up showing and still answerable.
            loop {
                if let Some(Dialog::Info(_)) = modal.current() {
                    assert!(modal.input(Input::Acknowledge));
                    break;
                }
                assert!(!info.is_finished());
                tokio::task::yield_now().await;
            }
            assert_eq!(Some(()), info.await.unwrap());
            assert!(matches!(confirm.await.unwrap(), Some(true) | None));
        }
    }

    #[tokio::test]
    async fn info_acknowledged() {
        let modal = Modal::new();
        let request = Info::new().title("Done").message("Saved.");
        let answer = answering(&modal, Input::Acknowledge, modal.info(request)).await;
        assert_eq!(Some(()), answer);
        assert!(!modal.is_open());
    }

    #[tokio::test]
    async fn info_overlay_dismissal_resolves() {
        let modal = Modal::new();
        let answer = answering(&modal, Input::OverlayClick, modal.info(Info::new())).await;
        assert_eq!(Some(()), answer);
    }

    #[tokio::test]
    async fn body_clicks_never_dismiss() {
        let modal = Modal::new();
        let (answer, _) = tokio::join!(modal.info(Info::new().message("Hi")), async {
            modal.opened().await;
            assert!(!modal.input(Input::BodyClick));
            assert!(modal.is_open());
            assert!(!modal.input(Input::Affirm));
            assert!(modal.input(Input::Acknowledge));
        });
        assert_eq!(Some(()), answer);
    }

    #[tokio::test]
    async fn close_does_not_answer() {
        let modal = Modal::new();
        let (answer, _) = tokio::join!(modal.confirm(Confirm::new("Sure?")), async {
            modal.opened().await;
            modal.close();
        });
        assert_eq!(None, answer);
        assert!(!modal.is_open());
    }

    #[tokio::test]
    async fn newer_dialog_replaces_older() {
        let modal = Modal::new();
        let mut shown = modal.subscribe();
        let (first, second, _) = tokio::join!(
            modal.confirm(Confirm::new("First?")),
            async {
                modal.opened().await;
                modal.info(Info::new().message("Second")).await
            },
            async {
                loop {
                    shown.changed().await.unwrap();
                    let current = shown.borrow_and_update().clone();
                    if let Some(Dialog::Info(info)) = current {
                        assert_eq!(Some("Second".to_string()), info.message);
                        break;
                    }
                }
                assert!(modal.input(Input::Acknowledge));
            }
        );
        assert_eq!(None, first);
        assert_eq!(Some(()), second);
        assert!(!modal.is_open());
    }

    #[test]
    fn content_dialog_without_responder() {
        let modal = Modal::new();
        modal.open("Loading…", ModalOptions::default());
        assert_eq!(
            Some(Dialog::Content {
                body: "Loading…".into(),
                options: ModalOptions::default(),
            }),
            modal.current()
        );
        assert!(!modal.input(Input::OverlayClick));

        modal.open(
            "Tap outside to close",
            ModalOptions {
                overlay: false,
                close_on_overlay_click: true,
            },
        );
        assert!(modal.input(Input::OverlayClick));
        assert!(!modal.is_open());
    }

    #[test]
    fn confirm_defaults() {
        let confirm = Confirm::new("Sure?");
        assert_eq!("Confirm", confirm.yes);
        assert_eq!("Cancel", confirm.no);
        assert!(confirm.overlay);
        assert!(!confirm.close_on_overlay_click);
        assert!(!confirm.warning);

        let info = Info::new();
        assert_eq!("Okay", info.ok);
        assert!(info.close_on_overlay_click);
    }
}
