#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use std::collections::HashSet;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use ratatui::prelude::Rect;
use tokio::sync::mpsc;

use super::renderer;
use super::Catalog;
use super::ConnectOutcome;
use super::JoinOutcome;
use super::Notices;
use super::Scroll;
use super::Transcript;
use super::TranscriptView;
use crate::domain::models::Action;
use crate::domain::models::AssistantPrompt;
use crate::domain::models::AssistantResponse;
use crate::domain::models::Author;
use crate::domain::models::ContentPiece;
use crate::domain::models::Course;
use crate::domain::models::CourseDraft;
use crate::domain::models::GroupDraft;
use crate::domain::models::NoticeType;
use crate::domain::models::SlashCommand;
use crate::domain::models::StagedAttachment;
use crate::domain::models::StudyGroup;
use crate::domain::models::Turn;
use crate::domain::models::View;
use crate::domain::models::GROUP_CAPACITY_DEFAULT;

/// Which collections changed since the last save. Taken by the UI loop
/// after each event so writes only happen for data that actually moved.
#[derive(Default)]
pub struct Dirty {
    pub transcript: bool,
    pub courses: bool,
    pub groups: bool,
    pub partners: bool,
}

impl Dirty {
    pub fn any(&self) -> bool {
        return self.transcript || self.courses || self.groups || self.partners;
    }
}

pub struct AppState {
    pub view: View,
    pub transcript: Transcript,
    pub catalog: Catalog,
    pub notices: Notices,
    pub staged_attachment: Option<StagedAttachment>,
    pub search_term: String,
    pub waiting_for_backend: bool,
    pub show_help: bool,
    pub exit: bool,
    pub scroll: Scroll,
    pub transcript_view: TranscriptView,
    pub last_known_width: u16,
    pub last_known_height: u16,
    /// Ids of groups and partners with a request still in flight, so a
    /// repeated command doesn't queue the same request twice.
    pending: HashSet<String>,
    stream_buffer: String,
    assistant_disabled: Option<String>,
    assistant_notice_shown: bool,
    dirty: Dirty,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl AppState {
    pub fn new(
        action_tx: mpsc::UnboundedSender<Action>,
        transcript: Transcript,
        catalog: Catalog,
        assistant_disabled: Option<String>,
    ) -> AppState {
        let mut app_state = AppState {
            view: View::Courses,
            transcript,
            catalog,
            notices: Notices::default(),
            staged_attachment: None,
            search_term: "".to_string(),
            waiting_for_backend: false,
            show_help: false,
            exit: false,
            scroll: Scroll::default(),
            transcript_view: TranscriptView::default(),
            last_known_width: 0,
            last_known_height: 0,
            pending: HashSet::new(),
            stream_buffer: "".to_string(),
            assistant_disabled,
            assistant_notice_shown: false,
            dirty: Dirty::default(),
            action_tx,
        };

        app_state.sync_dependants();
        return app_state;
    }

    pub fn is_pending(&self, id: &str) -> bool {
        return self.pending.contains(id);
    }

    pub fn take_dirty(&mut self) -> Dirty {
        return std::mem::take(&mut self.dirty);
    }

    /// Called once before the final save. An exit mid-stream drops the
    /// placeholder reply but keeps the user turn that prompted it, and
    /// re-marks the transcript so the save is not skipped.
    pub fn prepare_shutdown(&mut self) {
        if self.transcript.in_progress() {
            self.transcript.discard_pending();
            self.waiting_for_backend = false;
            self.dirty.transcript = true;
        }
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.last_known_width = rect.width;
        self.last_known_height = rect.height;
        self.sync_dependants();
    }

    fn sync_dependants(&mut self) {
        self.transcript_view
            .set_turns(self.transcript.turns(), usize::from(self.last_known_width));

        self.scroll
            .set_state(self.transcript_view.len() as u16, self.last_known_height);

        if self.waiting_for_backend {
            self.scroll.last();
        }
    }

    pub fn next_view(&mut self) {
        self.view = self.view.next();
    }

    pub fn tick(&mut self) {
        self.notices.prune(Instant::now());
    }

    pub fn handle_esc(&mut self) {
        if self.show_help {
            self.show_help = false;
            return;
        }

        self.notices.dismiss_newest();
    }

    pub async fn handle_input(&mut self, input_str: &str) -> Result<()> {
        let input_str = input_str.trim();
        // A staged attachment makes an otherwise empty compose sendable.
        if input_str.is_empty() && self.staged_attachment.is_none() {
            return Ok(());
        }

        if let Some(command) = SlashCommand::parse(input_str) {
            return self.handle_command(&command).await;
        }

        return self.send_to_assistant(input_str);
    }

    async fn handle_command(&mut self, command: &SlashCommand) -> Result<()> {
        if command.is_quit() {
            self.exit = true;
        } else if command.is_view_courses() {
            self.view = View::Courses;
        } else if command.is_view_groups() {
            self.view = View::Groups;
        } else if command.is_view_partners() {
            self.view = View::Partners;
        } else if command.is_view_assistant() {
            self.view = View::Assistant;
        } else if command.is_help() {
            self.show_help = true;
        } else if command.is_upload() {
            self.upload_course(&command.arg_line())?;
        } else if command.is_download() {
            self.download_course(&command.arg_line());
        } else if command.is_join() {
            self.join_group(&command.arg_line())?;
        } else if command.is_new_group() {
            self.create_group(&command.arg_line())?;
        } else if command.is_connect() {
            self.connect_partner(&command.arg_line())?;
        } else if command.is_find() {
            self.search_term = command.arg_line();
            self.view = View::Partners;
        } else if command.is_attach() {
            self.attach_file(&command.arg_line()).await;
        } else if command.is_detach() {
            self.staged_attachment = None;
            self.notices.push(NoticeType::Info, "Attachment removed.");
        } else if command.is_clear() {
            self.view = View::Assistant;
            self.transcript.reset();
            self.dirty.transcript = true;
            self.notices
                .push(NoticeType::Info, "Chat history has been cleared.");
            self.sync_dependants();
        } else if command.is_export() {
            self.export_transcript()?;
        } else if command.is_reset() {
            self.reset_section(&command.arg_line());
        }

        return Ok(());
    }

    fn send_to_assistant(&mut self, text: &str) -> Result<()> {
        self.view = View::Assistant;

        if let Some(reason) = &self.assistant_disabled {
            if !self.assistant_notice_shown {
                self.assistant_notice_shown = true;
                self.notices.push(NoticeType::Error, &reason.to_string());
            }
            return Ok(());
        }

        if self.waiting_for_backend || self.transcript.in_progress() {
            return Ok(());
        }

        // The prompt history is everything up to, but not including, the
        // turn being composed.
        let history = self.transcript.turns().to_vec();

        let mut pieces: Vec<ContentPiece> = vec![];
        let user_turn = match self.staged_attachment.take() {
            Some(attachment) => {
                pieces.push(attachment.piece());
                Turn::new_with_attachment(Author::User, text, attachment.tag())
            }
            None => Turn::new(Author::User, text),
        };
        if !user_turn.text().is_empty() {
            pieces.push(ContentPiece::Text(user_turn.text()));
        }

        self.transcript.append(user_turn);
        self.transcript.begin_reply();

        self.waiting_for_backend = true;
        self.stream_buffer.clear();
        self.dirty.transcript = true;
        self.sync_dependants();
        self.scroll.last();

        self.action_tx
            .send(Action::AssistantRequest(AssistantPrompt { history, pieces }))?;

        return Ok(());
    }

    fn upload_course(&mut self, args: &str) -> Result<()> {
        let fields = args.split(';').map(|e| return e.trim()).collect::<Vec<_>>();
        if fields.len() != 4 || fields.iter().any(|e| return e.is_empty()) {
            self.notices
                .push(NoticeType::Error, "Please fill all fields and select a file.");
            return Ok(());
        }

        self.view = View::Courses;
        self.action_tx.send(Action::UploadCourse(CourseDraft {
            code: fields[0].to_string(),
            name: fields[1].to_string(),
            instructor: fields[2].to_string(),
            file_name: fields[3].to_string(),
        }))?;

        return Ok(());
    }

    fn download_course(&mut self, args: &str) {
        let course = args
            .parse::<usize>()
            .ok()
            .and_then(|idx| return self.catalog.course_at(idx));

        match course {
            Some(course) => {
                let text = format!("Downloading materials for {}...", course.name);
                self.notices.push(NoticeType::Info, &text);
            }
            None => {
                self.notices
                    .push(NoticeType::Error, "No course at that position.");
            }
        }
    }

    fn join_group(&mut self, args: &str) -> Result<()> {
        let group = args
            .parse::<usize>()
            .ok()
            .and_then(|idx| return self.catalog.group_at(idx));

        let group = match group {
            Some(group) => group,
            None => {
                self.notices
                    .push(NoticeType::Error, "No study group at that position.");
                return Ok(());
            }
        };

        let id = group.id.to_string();
        if self.pending.contains(&id) {
            return Ok(());
        }
        if group.is_full() {
            self.notices.push(NoticeType::Info, "This group is now full.");
            return Ok(());
        }

        self.view = View::Groups;
        self.pending.insert(id.to_string());
        self.action_tx.send(Action::JoinGroup(id))?;

        return Ok(());
    }

    fn create_group(&mut self, args: &str) -> Result<()> {
        let fields = args.split(';').map(|e| return e.trim()).collect::<Vec<_>>();
        if fields.len() < 2 || fields[0].is_empty() || fields[1].is_empty() {
            self.notices
                .push(NoticeType::Error, "Please provide a group name and course code.");
            return Ok(());
        }

        let capacity = fields
            .get(2)
            .and_then(|e| return e.parse::<u32>().ok())
            .unwrap_or(GROUP_CAPACITY_DEFAULT);

        self.view = View::Groups;
        self.action_tx.send(Action::CreateGroup(GroupDraft {
            name: fields[0].to_string(),
            course_code: fields[1].to_string(),
            capacity,
        }))?;

        return Ok(());
    }

    fn connect_partner(&mut self, args: &str) -> Result<()> {
        let student = args.parse::<usize>().ok().and_then(|idx| {
            if idx == 0 {
                return None;
            }
            return self
                .catalog
                .filter_students(&self.search_term)
                .get(idx - 1)
                .map(|e| return (*e).to_owned());
        });

        let student = match student {
            Some(student) => student,
            None => {
                self.notices
                    .push(NoticeType::Error, "No partner at that position.");
                return Ok(());
            }
        };

        if student.connected || self.pending.contains(&student.id) {
            return Ok(());
        }

        self.view = View::Partners;
        self.pending.insert(student.id.to_string());
        self.action_tx.send(Action::ConnectPartner(student.id))?;

        return Ok(());
    }

    async fn attach_file(&mut self, args: &str) {
        if args.is_empty() {
            self.notices.push(NoticeType::Error, "Usage: /attach PATH");
            return;
        }

        match StagedAttachment::from_path(Path::new(args)).await {
            Ok(attachment) => {
                let text = format!("Attached {}.", attachment.name);
                self.staged_attachment = Some(attachment);
                self.notices.push(NoticeType::Success, &text);
            }
            Err(err) => {
                self.notices.push(NoticeType::Error, &err.to_string());
            }
        }
    }

    fn export_transcript(&mut self) -> Result<()> {
        let markup = self
            .transcript
            .turns()
            .iter()
            .map(|turn| {
                let author = renderer::escape(&turn.author.to_string());
                let body = renderer::to_markup(&turn.text());
                return format!("<p><strong>{author}</strong></p>{body}");
            })
            .collect::<Vec<String>>()
            .join("");

        self.action_tx.send(Action::CopyTranscript(markup))?;
        return Ok(());
    }

    fn reset_section(&mut self, args: &str) {
        let section = if args.is_empty() {
            match self.view {
                View::Courses => "courses",
                View::Groups => "groups",
                View::Partners => "partners",
                View::Assistant => "chat",
            }
        } else {
            args
        };

        match section {
            "courses" => {
                self.catalog.reset_courses();
                self.dirty.courses = true;
                self.notices
                    .push(NoticeType::Info, "Course data has been reset.");
            }
            "groups" => {
                self.catalog.reset_groups();
                self.dirty.groups = true;
                self.notices
                    .push(NoticeType::Info, "Study group data has been reset.");
            }
            "partners" => {
                self.catalog.reset_students();
                self.dirty.partners = true;
                self.notices
                    .push(NoticeType::Info, "Partner data has been reset.");
            }
            "chat" => {
                self.transcript.reset();
                self.dirty.transcript = true;
                self.notices
                    .push(NoticeType::Info, "Chat history has been cleared.");
                self.sync_dependants();
            }
            _ => {
                self.notices.push(
                    NoticeType::Error,
                    "Usage: /reset [courses|groups|partners|chat]",
                );
            }
        }
    }

    pub fn handle_assistant_response(&mut self, res: AssistantResponse) {
        self.stream_buffer.push_str(&res.text);
        self.transcript.replace_last(&self.stream_buffer);

        if res.done {
            self.transcript.finish_reply();
            self.waiting_for_backend = false;
            self.stream_buffer.clear();
            self.dirty.transcript = true;
        }

        self.sync_dependants();
        self.scroll.last();
    }

    pub fn handle_assistant_error(&mut self, err: &str) {
        tracing::error!(error = err, "assistant request failed");

        self.transcript.discard_pending();
        self.waiting_for_backend = false;
        self.stream_buffer.clear();
        self.dirty.transcript = true;
        self.notices.push(
            NoticeType::Error,
            "Sorry, something went wrong. The AI may be unavailable.",
        );
        self.sync_dependants();
    }

    pub fn handle_course_uploaded(&mut self, course: Course) {
        let text = format!("Material for \"{}\" uploaded successfully!", course.name);
        self.catalog.insert_course(course);
        self.dirty.courses = true;
        self.notices.push(NoticeType::Success, &text);
    }

    pub fn handle_group_created(&mut self, group: StudyGroup) {
        self.catalog.insert_group(group);
        self.dirty.groups = true;
        self.notices
            .push(NoticeType::Success, "New study group created!");
    }

    pub fn handle_group_joined(&mut self, id: &str) {
        self.pending.remove(id);

        match self.catalog.join_group(id) {
            JoinOutcome::Joined(_) => {
                self.dirty.groups = true;
                self.notices
                    .push(NoticeType::Success, "Successfully joined the group!");
            }
            JoinOutcome::Full(_) => {
                self.notices.push(NoticeType::Info, "This group is now full.");
            }
            JoinOutcome::NotFound => (),
        }
    }

    pub fn handle_partner_connected(&mut self, id: &str) {
        self.pending.remove(id);

        match self.catalog.connect_partner(id) {
            ConnectOutcome::Connected(name) => {
                self.dirty.partners = true;
                let text = format!("Connection request sent to {name}!");
                self.notices.push(NoticeType::Success, &text);
            }
            ConnectOutcome::AlreadyConnected(_) => (),
            ConnectOutcome::NotFound => (),
        }
    }

    pub fn handle_transcript_copied(&mut self) {
        self.notices
            .push(NoticeType::Success, "Copied chat log to clipboard.");
    }
}
