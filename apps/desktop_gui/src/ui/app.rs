use std::{
    cell::Cell,
    collections::{HashMap, HashSet},
    rc::Rc,
    sync::Arc,
    time::{Duration, Instant},
};

use client_core::{
    card::{AppliedJobRow, CardPresentation, ExplanationState, ExplanationView},
    chat::{prepare_message, ChatThread},
    config::ClientSettings,
    dashboard::DashboardSummary,
    deck::{CardQueue, DeckView, SessionCounters},
    dispatch::{Acknowledgement, Acknowledger, ActionDispatcher, DeckUpdate},
    feed::FeedSource,
    gesture::{DragFeedback, Point, PointerEvent, SwipeDirection},
    profile::{validate_resume_file, ProfileDraft},
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use serde::{Deserialize, Serialize};
use shared::{
    domain::{ChatSender, JobId},
    protocol::JobPosting,
};
use tracing::debug;

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::{
        events::{err_label, UiError, UiErrorContext, UiEvent},
        orchestration::{dispatch_backend_command, QueuedDecisionNotifier},
    },
    ui::card::{action_strip, paint_stack, FrontCard, CARD_SIZE},
};

pub const SETTINGS_STORAGE_KEY: &str = "jobswipe_desktop.settings";
const TOAST_DURATION: Duration = Duration::from_millis(2500);
const SENIORITY_LEVELS: [&str; 5] = ["Junior", "Mid-Level", "Senior", "Lead", "Principal"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedDesktopSettings {
    pub last_email: String,
    pub dark_mode: bool,
}

impl Default for PersistedDesktopSettings {
    fn default() -> Self {
        Self {
            last_email: String::new(),
            dark_mode: true,
        }
    }
}

/// Collects acknowledgement texts raised by the dispatcher until the frame
/// shows them.
#[derive(Debug, Default)]
pub struct ToastQueue {
    pending: Vec<String>,
}

impl ToastQueue {
    fn take_latest(&mut self) -> Option<String> {
        let latest = self.pending.pop();
        self.pending.clear();
        latest
    }
}

impl Acknowledger for ToastQueue {
    fn acknowledge(&mut self, acknowledgement: Acknowledgement) {
        if let Some(message) = acknowledgement.message() {
            self.pending.push(message);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AppView {
    Login,
    Deck,
    Applied,
    Chat,
    Profile,
    Dashboard,
}

#[derive(Debug, Default)]
struct LoginForm {
    email: String,
    password: String,
    name: String,
    register: bool,
    busy: bool,
}

struct ChatView {
    thread: ChatThread,
    title: String,
    draft: String,
    sending: bool,
}

pub struct DesktopGuiApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    view: AppView,
    login: LoginForm,
    signed_in_email: Option<String>,

    dispatcher: ActionDispatcher<JobPosting, ToastQueue>,
    action_strip: Rc<Cell<egui::Rect>>,
    drag: DragFeedback,
    feed_source: Option<FeedSource>,
    feed_loading: bool,
    explanations: HashMap<JobId, ExplanationView>,
    requested_explanations: HashSet<JobId>,
    toast: Option<(String, Instant)>,

    applied: Vec<AppliedJobRow>,
    chat: Option<ChatView>,
    profile: Option<ProfileDraft>,
    new_skill: String,
    resume_note: Option<String>,
    dashboard: Option<DashboardSummary>,

    status: String,
    status_banner: Option<UiError>,
    settings: PersistedDesktopSettings,
    applied_dark_mode: Option<bool>,
}

fn to_point(pos: egui::Pos2) -> Point {
    Point::new(pos.x, pos.y)
}

impl DesktopGuiApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        client_settings: &ClientSettings,
        persisted_settings: Option<PersistedDesktopSettings>,
    ) -> Self {
        let settings = persisted_settings.unwrap_or_default();
        let action_strip = Rc::new(Cell::new(egui::Rect::NOTHING));
        let exempt = Rc::clone(&action_strip);
        let deck = CardQueue::new(Arc::new(QueuedDecisionNotifier::new(cmd_tx.clone())))
            .with_window_size(client_settings.window_size)
            .with_gesture_config(client_settings.gesture)
            .with_exempt_region(Rc::new(move |point: Point| {
                exempt.get().contains(egui::pos2(point.x, point.y))
            }));

        let mut status = "Restoring session…".to_string();
        dispatch_backend_command(&cmd_tx, BackendCommand::RestoreSession, &mut status);

        Self {
            cmd_tx,
            ui_rx,
            view: AppView::Login,
            login: LoginForm {
                email: settings.last_email.clone(),
                ..LoginForm::default()
            },
            signed_in_email: None,
            dispatcher: ActionDispatcher::new(deck, ToastQueue::default()),
            action_strip,
            drag: DragFeedback::IDENTITY,
            feed_source: None,
            feed_loading: false,
            explanations: HashMap::new(),
            requested_explanations: HashSet::new(),
            toast: None,
            applied: Vec::new(),
            chat: None,
            profile: None,
            new_skill: String::new(),
            resume_note: None,
            dashboard: None,
            status,
            status_banner: None,
            settings,
            applied_dark_mode: None,
        }
    }

    fn queue(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status);
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => self.status = message,
                UiEvent::Error(err) => self.show_error(err),
                UiEvent::SignedIn { email } => {
                    self.login.busy = false;
                    self.login.password.clear();
                    if let Some(email) = &email {
                        self.settings.last_email = email.clone();
                    }
                    self.status = format!(
                        "Signed in as {}",
                        email.as_deref().unwrap_or("returning user")
                    );
                    self.signed_in_email = email;
                    self.status_banner = None;
                    self.view = AppView::Deck;
                    self.refresh_feed();
                }
                UiEvent::SignedOut => self.enter_login_view(),
                UiEvent::Feed(feed) => {
                    self.feed_loading = false;
                    self.feed_source = Some(feed.source);
                    self.drag = DragFeedback::IDENTITY;
                    self.dispatcher.deck_mut().load(feed.jobs);
                }
                UiEvent::Explanation { job_id, view } => {
                    self.explanations.insert(job_id, view);
                }
                UiEvent::Applied(jobs) => {
                    self.applied = jobs.iter().map(AppliedJobRow::from_posting).collect();
                }
                UiEvent::Dashboard(summary) => self.dashboard = Some(summary),
                UiEvent::ChatMessages { job_id, messages } => {
                    if let Some(chat) = self
                        .chat
                        .as_mut()
                        .filter(|chat| chat.thread.job_id() == job_id)
                    {
                        chat.thread.refresh(messages);
                        chat.sending = false;
                    }
                }
                UiEvent::ChatSendFailed {
                    job_id,
                    draft,
                    error,
                } => {
                    if let Some(chat) = self
                        .chat
                        .as_mut()
                        .filter(|chat| chat.thread.job_id() == job_id)
                    {
                        chat.sending = false;
                        if chat.draft.is_empty() {
                            chat.draft = draft;
                        }
                    }
                    self.show_error(error);
                }
                UiEvent::Profile(user) => {
                    self.profile = Some(ProfileDraft::from_user(&user));
                }
                UiEvent::ProfileSaved => {
                    self.status = "Profile updated successfully!".to_string();
                    self.toast = Some((self.status.clone(), Instant::now()));
                }
                UiEvent::ResumeParsed(parsed) => {
                    let merged = self
                        .profile
                        .as_mut()
                        .is_some_and(|draft| draft.merge_parsed_resume(&parsed));
                    self.resume_note = Some(if merged {
                        "Resume parsed successfully! Review the details and save.".to_string()
                    } else {
                        "No profile details found in the resume.".to_string()
                    });
                }
            }
        }
    }

    fn show_error(&mut self, err: UiError) {
        self.login.busy = false;
        self.status = format!("{}: {}", err_label(err.category()), err.message());
        if err.requires_reauth() {
            self.enter_login_view();
        }
        self.status_banner = Some(err);
    }

    fn enter_login_view(&mut self) {
        self.view = AppView::Login;
        self.signed_in_email = None;
        self.login.busy = false;
        self.chat = None;
        self.profile = None;
        self.dashboard = None;
        self.applied.clear();
        self.drag = DragFeedback::IDENTITY;
        self.dispatcher.deck_mut().reset();
        self.status = "Signed out".to_string();
    }

    fn refresh_feed(&mut self) {
        self.feed_loading = true;
        self.queue(BackendCommand::LoadFeed);
    }

    fn apply_update(&mut self, update: DeckUpdate<JobPosting>) {
        match update {
            DeckUpdate::Idle => {}
            DeckUpdate::Dragging(feedback) => self.drag = feedback,
            DeckUpdate::SnappedBack => self.drag = DragFeedback::IDENTITY,
            DeckUpdate::Resolved(resolution) => {
                debug!(job_id = %resolution.item.id, action = %resolution.action, "card resolved");
                self.drag = DragFeedback::IDENTITY;
                if let Some(message) = self.dispatcher.acknowledger_mut().take_latest() {
                    self.toast = Some((message, Instant::now()));
                }
            }
        }
    }

    fn on_pointer(&mut self, event: PointerEvent) {
        let update = self.dispatcher.on_pointer(event);
        self.apply_update(update);
    }

    fn trigger(&mut self, direction: SwipeDirection) {
        let update = self.dispatcher.trigger(direction);
        self.apply_update(update);
    }

    fn switch_view(&mut self, view: AppView) {
        if self.view == AppView::Chat && view != AppView::Chat {
            self.chat = None;
            self.queue(BackendCommand::CloseChat);
        }
        match view {
            AppView::Applied => self.queue(BackendCommand::LoadApplied),
            AppView::Dashboard => self.queue(BackendCommand::LoadDashboard),
            AppView::Profile => {
                self.resume_note = None;
                self.queue(BackendCommand::LoadProfile);
            }
            _ => {}
        }
        self.status_banner = None;
        self.view = view;
    }

    fn open_chat(&mut self, job_id: JobId, title: String) {
        self.chat = Some(ChatView {
            thread: ChatThread::new(job_id),
            title,
            draft: String::new(),
            sending: false,
        });
        self.view = AppView::Chat;
        self.queue(BackendCommand::OpenChat { job_id });
    }

    fn apply_visuals_if_needed(&mut self, ctx: &egui::Context) {
        if self.applied_dark_mode == Some(self.settings.dark_mode) {
            return;
        }
        ctx.set_visuals(if self.settings.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });
        self.applied_dark_mode = Some(self.settings.dark_mode);
    }

    fn show_status_banner(&self, ui: &mut egui::Ui) {
        if let Some(err) = &self.status_banner {
            ui.colored_label(
                ui.visuals().error_fg_color,
                format!("{}: {}", err_label(err.category()), err.message()),
            );
        }
    }

    fn show_login_screen(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space((ui.available_height() * 0.12).clamp(18.0, 90.0));
            ui.vertical_centered(|ui| {
                ui.set_max_width(420.0);
                ui.label(egui::RichText::new("💼").size(40.0));
                ui.heading("JobSwipe");
                ui.weak(if self.login.register {
                    "Create an account to start swiping."
                } else {
                    "Sign in to see your matches."
                });
                ui.add_space(10.0);
                self.show_status_banner(ui);

                if self.login.register {
                    ui.add(
                        egui::TextEdit::singleline(&mut self.login.name)
                            .hint_text("Full name (optional)")
                            .desired_width(f32::INFINITY),
                    );
                }
                ui.add(
                    egui::TextEdit::singleline(&mut self.login.email)
                        .hint_text("Email")
                        .desired_width(f32::INFINITY),
                );
                let password = ui.add(
                    egui::TextEdit::singleline(&mut self.login.password)
                        .password(true)
                        .hint_text("Password")
                        .desired_width(f32::INFINITY),
                );
                let submit_on_enter =
                    password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                ui.add_space(6.0);
                let label = if self.login.register {
                    "Create account"
                } else {
                    "Sign in"
                };
                let button = egui::Button::new(egui::RichText::new(label).strong().size(16.0))
                    .min_size(egui::vec2(ui.available_width(), 36.0));
                if ui.add_enabled(!self.login.busy, button).clicked() || submit_on_enter {
                    self.try_login();
                }

                let toggle = if self.login.register {
                    "Already have an account? Sign in"
                } else {
                    "Need an account? Register"
                };
                if ui.link(toggle).clicked() {
                    self.login.register = !self.login.register;
                    self.status_banner = None;
                }

                ui.add_space(8.0);
                ui.small(egui::RichText::new(&self.status).weak());
            });
        });
    }

    fn try_login(&mut self) {
        let email = self.login.email.trim().to_string();
        if email.is_empty() || self.login.password.is_empty() {
            self.status_banner = Some(UiError::from_message(
                UiErrorContext::Login,
                "Missing email or password",
            ));
            return;
        }
        self.login.busy = true;
        self.status = "Signing in…".to_string();
        let password = self.login.password.clone();
        let cmd = if self.login.register {
            let name = self.login.name.trim();
            BackendCommand::Register {
                email,
                password,
                name: (!name.is_empty()).then(|| name.to_string()),
            }
        } else {
            BackendCommand::Login { email, password }
        };
        self.queue(cmd);
    }

    fn show_nav(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("nav_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let tabs = [
                    (AppView::Deck, "🃏 Discover"),
                    (AppView::Applied, "📋 Applied"),
                    (AppView::Dashboard, "📊 Dashboard"),
                    (AppView::Profile, "👤 Profile"),
                ];
                for (view, label) in tabs {
                    if ui.selectable_label(self.view == view, label).clicked() {
                        self.switch_view(view);
                    }
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Sign out").clicked() {
                        self.queue(BackendCommand::Logout);
                    }
                    let theme_icon = if self.settings.dark_mode { "☀" } else { "🌙" };
                    if ui.button(theme_icon).clicked() {
                        self.settings.dark_mode = !self.settings.dark_mode;
                    }
                    if let Some(email) = &self.signed_in_email {
                        ui.weak(email);
                    }
                });
            });
        });
    }

    fn stats_row(ui: &mut egui::Ui, counters: SessionCounters) {
        ui.horizontal(|ui| {
            ui.label(format!("👀 Viewed {}", counters.viewed));
            ui.separator();
            ui.label(format!("✅ Applied {}", counters.applied));
            ui.separator();
            ui.label(format!("⭐ Saved {}", counters.saved));
            ui.separator();
            ui.label(format!("✖ Skipped {}", counters.skipped));
        });
    }

    fn handle_deck_keys(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let (left, right, down, escape) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::ArrowLeft),
                i.key_pressed(egui::Key::ArrowRight),
                i.key_pressed(egui::Key::ArrowDown),
                i.key_pressed(egui::Key::Escape),
            )
        });
        if escape {
            self.on_pointer(PointerEvent::Cancel);
        }
        if left {
            self.trigger(SwipeDirection::Left);
        } else if right {
            self.trigger(SwipeDirection::Right);
        } else if down {
            self.trigger(SwipeDirection::Up);
        }
    }

    /// Explanation shown on the front card, requesting it once when the
    /// posting arrived without one.
    fn explanation_for(&mut self, card: &CardPresentation) -> Option<ExplanationView> {
        if let ExplanationState::Ready(view) = &card.explanation {
            return Some(view.clone());
        }
        if let Some(view) = self.explanations.get(&card.job_id) {
            return Some(view.clone());
        }
        if self.requested_explanations.insert(card.job_id) {
            self.queue(BackendCommand::FetchExplanation {
                job_id: card.job_id,
            });
        }
        None
    }

    fn show_deck(&mut self, ctx: &egui::Context) {
        self.handle_deck_keys(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_status_banner(ui);
            if self.feed_source == Some(FeedSource::Fallback) {
                ui.weak("Job board unreachable: showing sample jobs.");
            }
            if self.feed_loading && self.dispatcher.deck().is_empty() {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.spinner();
                    ui.label("Finding your matches…");
                });
                return;
            }

            let snapshot = match self.dispatcher.deck().view() {
                DeckView::Cards { front, behind } => Some((front.clone(), behind.len())),
                DeckView::Exhausted => None,
            };
            let counters = self.dispatcher.deck().counters();
            let Some((front, behind)) = snapshot else {
                ui.vertical_centered(|ui| {
                    ui.add_space(100.0);
                    ui.label(egui::RichText::new("🎉").size(48.0));
                    ui.heading("No more jobs");
                    ui.label("Check back later for new matches!");
                    ui.add_space(12.0);
                    Self::stats_row(ui, counters);
                    ui.add_space(12.0);
                    if ui.button("🔄 Refresh feed").clicked() {
                        self.refresh_feed();
                    }
                });
                return;
            };

            let card = CardPresentation::from_posting(&front);
            let explanation = self.explanation_for(&card);
            ui.add_space(16.0);
            ui.vertical_centered(|ui| {
                let (rest, response) =
                    ui.allocate_exact_size(CARD_SIZE, egui::Sense::click_and_drag());
                let strip = action_strip(rest);
                self.action_strip.set(strip);

                if response.drag_started() {
                    if let Some(origin) = ui.input(|i| i.pointer.press_origin()) {
                        self.on_pointer(PointerEvent::Down(to_point(origin)));
                    }
                }
                if response.dragged() {
                    if let Some(pos) = response.interact_pointer_pos() {
                        self.on_pointer(PointerEvent::Move(to_point(pos)));
                    }
                }
                if response.drag_stopped() {
                    self.on_pointer(PointerEvent::Up);
                }

                let visuals = ui.visuals();
                let fill = visuals.extreme_bg_color;
                let text = visuals.strong_text_color();
                let painter = ui.painter();
                paint_stack(painter, rest, behind, visuals.faint_bg_color);
                FrontCard {
                    card: &card,
                    explanation: explanation.as_ref(),
                    feedback: self.drag,
                }
                .paint(painter, rest, fill, text);

                let third = strip.width() / 3.0;
                let buttons = [
                    (SwipeDirection::Left, "✖ Skip"),
                    (SwipeDirection::Up, "⭐ Save"),
                    (SwipeDirection::Right, "✔ Apply"),
                ];
                for (index, (direction, label)) in buttons.into_iter().enumerate() {
                    let slot = egui::Rect::from_min_size(
                        strip.min + egui::vec2(third * index as f32, 0.0),
                        egui::vec2(third, strip.height()),
                    )
                    .shrink(10.0);
                    if ui.put(slot, egui::Button::new(label)).clicked() {
                        self.trigger(direction);
                    }
                }

                ui.add_space(24.0);
                Self::stats_row(ui, counters);
                ui.weak("Drag the card, or use ← skip, → apply, ↓ save.");
            });
        });
    }

    fn show_applied(&mut self, ctx: &egui::Context) {
        let mut open: Option<(JobId, String)> = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_status_banner(ui);
            ui.heading("Applied jobs");
            if self.applied.is_empty() {
                ui.label("No applications yet. Swipe right on a job to apply.");
                return;
            }
            egui::ScrollArea::vertical().show(ui, |ui| {
                for row in &self.applied {
                    egui::Frame::group(ui.style()).show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.horizontal(|ui| {
                            ui.label(egui::RichText::new(&row.logo).size(28.0));
                            ui.vertical(|ui| {
                                ui.strong(&row.title);
                                ui.label(&row.company);
                                ui.weak(format!("📍 {}", row.location));
                            });
                        });
                        if !row.skills.is_empty() {
                            ui.weak(row.skills.join(" · "));
                        }
                        ui.horizontal(|ui| {
                            if row.has_posting_url() {
                                ui.hyperlink_to("View posting", &row.posting_url);
                            }
                            if ui.button("💬 Chat with Employer").clicked() {
                                open = Some((row.job_id, format!("{} @ {}", row.title, row.company)));
                            }
                        });
                    });
                    ui.add_space(6.0);
                }
            });
        });
        if let Some((job_id, title)) = open {
            self.open_chat(job_id, title);
        }
    }

    fn show_chat(&mut self, ctx: &egui::Context) {
        let mut back = false;
        let mut send: Option<(JobId, String)> = None;
        let Some(chat) = self.chat.as_mut() else {
            self.view = AppView::Applied;
            return;
        };

        egui::TopBottomPanel::bottom("chat_composer").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let input = ui.add_enabled(
                    !chat.sending,
                    egui::TextEdit::singleline(&mut chat.draft)
                        .hint_text("Type a message…")
                        .desired_width(ui.available_width() - 70.0),
                );
                let enter = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                let clicked = ui
                    .add_enabled(!chat.sending, egui::Button::new("Send"))
                    .clicked();
                if enter || clicked {
                    if let Some(text) = prepare_message(&chat.draft) {
                        chat.draft.clear();
                        chat.sending = true;
                        send = Some((chat.thread.job_id(), text));
                    }
                    input.request_focus();
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("← Back").clicked() {
                    back = true;
                }
                ui.heading(&chat.title);
            });
            ui.separator();
            egui::ScrollArea::vertical()
                .stick_to_bottom(true)
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    if chat.thread.messages().is_empty() {
                        ui.weak("No messages yet. Say hello to the employer!");
                    }
                    for message in chat.thread.messages() {
                        let mine = message.sender_type == ChatSender::User;
                        let layout = if mine {
                            egui::Layout::right_to_left(egui::Align::TOP)
                        } else {
                            egui::Layout::left_to_right(egui::Align::TOP)
                        };
                        ui.with_layout(layout, |ui| {
                            egui::Frame::group(ui.style()).show(ui, |ui| {
                                ui.set_max_width(360.0);
                                ui.label(&message.message);
                                if let Some(at) = message.sent_at() {
                                    ui.small(at.format("%H:%M").to_string());
                                }
                            });
                        });
                    }
                });
        });

        if let Some((job_id, text)) = send {
            self.queue(BackendCommand::SendChat { job_id, text });
        }
        if back {
            self.switch_view(AppView::Applied);
        }
    }

    fn show_profile(&mut self, ctx: &egui::Context) {
        let mut save = false;
        let mut upload = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_status_banner(ui);
            ui.heading("Your profile");
            let Some(draft) = self.profile.as_mut() else {
                ui.spinner();
                ui.label("Loading profile…");
                return;
            };

            egui::Grid::new("profile_fields")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Name");
                    ui.text_edit_singleline(&mut draft.name);
                    ui.end_row();
                    ui.label("Email");
                    ui.add_enabled(false, egui::TextEdit::singleline(&mut draft.email));
                    ui.end_row();
                    ui.label("Phone");
                    ui.text_edit_singleline(&mut draft.phone);
                    ui.end_row();
                    ui.label("Experience (years)");
                    ui.add(egui::DragValue::new(&mut draft.experience_years).range(0..=60));
                    ui.end_row();
                    ui.label("Preferred location");
                    ui.text_edit_singleline(&mut draft.preferred_location);
                    ui.end_row();
                    ui.label("Seniority");
                    egui::ComboBox::from_id_salt("seniority")
                        .selected_text(draft.preferred_seniority.clone())
                        .show_ui(ui, |ui| {
                            for level in SENIORITY_LEVELS {
                                ui.selectable_value(
                                    &mut draft.preferred_seniority,
                                    level.to_string(),
                                    level,
                                );
                            }
                        });
                    ui.end_row();
                });

            ui.add_space(8.0);
            ui.strong("Skills");
            let mut removed: Option<String> = None;
            ui.horizontal_wrapped(|ui| {
                for skill in draft.skills.iter() {
                    if ui.button(format!("{skill} ✖")).clicked() {
                        removed = Some(skill.to_string());
                    }
                }
            });
            if let Some(skill) = removed {
                draft.skills.remove(&skill);
            }
            ui.horizontal(|ui| {
                let input = ui.add(
                    egui::TextEdit::singleline(&mut self.new_skill).hint_text("Add a skill"),
                );
                let enter = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.button("Add").clicked() || enter {
                    draft.skills.insert(&self.new_skill);
                    self.new_skill.clear();
                }
            });

            ui.add_space(12.0);
            ui.horizontal(|ui| {
                upload = ui.button("📄 Upload Resume").clicked();
                save = ui.button("💾 Save Profile").clicked();
            });
            if let Some(note) = &self.resume_note {
                ui.label(note);
            }
        });

        if upload {
            self.pick_resume();
        }
        if save {
            if let Some(update) = self.profile.as_ref().map(ProfileDraft::to_update) {
                self.queue(BackendCommand::SaveProfile(update));
            }
        }
    }

    fn pick_resume(&mut self) {
        let mut dialog = rfd::FileDialog::new().add_filter("Resume", &["pdf", "docx"]);
        if let Some(dir) = dirs::document_dir() {
            dialog = dialog.set_directory(dir);
        }
        let Some(path) = dialog.pick_file() else {
            return;
        };
        match validate_resume_file(&path) {
            Ok(_) => {
                self.resume_note = Some("Parsing resume…".to_string());
                self.queue(BackendCommand::UploadResume { path });
            }
            Err(err) => {
                self.status_banner = Some(UiError::from_board(UiErrorContext::Profile, &err));
            }
        }
    }

    fn show_dashboard(&mut self, ctx: &egui::Context) {
        let mut refresh = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_status_banner(ui);
            ui.horizontal(|ui| {
                ui.heading("Dashboard");
                refresh = ui.button("🔄").clicked();
            });
            let Some(summary) = &self.dashboard else {
                ui.spinner();
                return;
            };
            ui.add_space(8.0);
            ui.columns(3, |columns| {
                let tiles = [
                    ("Applied", summary.applied.to_string()),
                    ("Saved", summary.saved.to_string()),
                    ("Viewed", summary.viewed.to_string()),
                ];
                for (column, (label, value)) in columns.iter_mut().zip(tiles) {
                    egui::Frame::group(column.style()).show(column, |ui| {
                        ui.set_width(ui.available_width());
                        ui.vertical_centered(|ui| {
                            ui.label(egui::RichText::new(value).size(32.0).strong());
                            ui.weak(label);
                        });
                    });
                }
            });
            ui.add_space(16.0);
            ui.strong("Profile strength");
            match &summary.strength {
                Some(strength) => {
                    ui.add(
                        egui::ProgressBar::new(f32::from(strength.score) / 100.0)
                            .text(format!("{}%", strength.score)),
                    );
                    ui.label(&strength.message);
                }
                None => {
                    ui.weak("Profile strength unavailable.");
                }
            }
        });
        if refresh {
            self.queue(BackendCommand::LoadDashboard);
        }
    }

    fn show_toast(&mut self, ctx: &egui::Context) {
        let Some((message, shown_at)) = &self.toast else {
            return;
        };
        if shown_at.elapsed() > TOAST_DURATION {
            self.toast = None;
            return;
        }
        egui::Area::new(egui::Id::new("toast"))
            .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -32.0))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.label(egui::RichText::new(message.as_str()).size(16.0));
                });
            });
    }

    fn is_animating(&self) -> bool {
        self.toast.is_some()
            || self
                .dispatcher
                .deck()
                .front_gesture()
                .is_some_and(|gesture| gesture.is_active())
    }
}

impl eframe::App for DesktopGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.apply_visuals_if_needed(ctx);

        if self.view == AppView::Login {
            self.show_login_screen(ctx);
        } else {
            self.show_nav(ctx);
            match self.view {
                AppView::Deck => self.show_deck(ctx),
                AppView::Applied => self.show_applied(ctx),
                AppView::Chat => self.show_chat(ctx),
                AppView::Profile => self.show_profile(ctx),
                AppView::Dashboard => self.show_dashboard(ctx),
                AppView::Login => {}
            }
        }
        self.show_toast(ctx);

        if self.is_animating() {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        if let Ok(serialized) = serde_json::to_string(&self.settings) {
            storage.set_string(SETTINGS_STORAGE_KEY, serialized);
        }
    }
}
