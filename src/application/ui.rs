use std::io;
use std::time::Instant;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Clear;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Scrollbar;
use ratatui::widgets::ScrollbarOrientation;
use ratatui::widgets::Wrap;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::domain::models::Action;
use crate::domain::models::Course;
use crate::domain::models::Event;
use crate::domain::models::Loading;
use crate::domain::models::NoticeType;
use crate::domain::models::Student;
use crate::domain::models::StudyGroup;
use crate::domain::models::TextArea;
use crate::domain::models::Turn;
use crate::domain::models::View;
use crate::domain::services::actions::help_text;
use crate::domain::services::events::EventsService;
use crate::domain::services::AppState;
use crate::domain::services::Catalog;
use crate::domain::services::Transcript;
use crate::infrastructure::storage;
use crate::infrastructure::storage::Store;

fn notice_style(ntype: NoticeType, exiting: bool) -> Style {
    let mut style = match ntype {
        NoticeType::Success => Style::default().fg(Color::Green),
        NoticeType::Error => Style::default().fg(Color::Red),
        NoticeType::Info => Style::default().fg(Color::Blue),
    };

    if exiting {
        style = style.add_modifier(Modifier::DIM);
    }

    return style;
}

fn render_tabs<B: Backend>(frame: &mut Frame<B>, app_state: &AppState, rect: Rect) {
    let mut spans: Vec<Span> = vec![];
    for view in [View::Courses, View::Groups, View::Partners, View::Assistant] {
        let mut style = Style::default().fg(Color::DarkGray);
        if view == app_state.view {
            style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
        }

        spans.push(Span::styled(format!(" {} ", view.title()), style));
        spans.push(Span::styled("|", Style::default().fg(Color::DarkGray)));
    }
    spans.pop();

    if let Some(attachment) = &app_state.staged_attachment {
        spans.push(Span::styled(
            format!("  Attached: {}", attachment.name),
            Style::default().fg(Color::Yellow),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), rect);
}

fn course_lines(courses: &[Course]) -> Vec<Line<'static>> {
    return courses
        .iter()
        .enumerate()
        .map(|(idx, course)| {
            return Line::from(vec![
                Span::styled(
                    format!("{}. ", idx + 1),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    course.code.to_string(),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(" {} - {}", course.name, course.instructor)),
                Span::styled(
                    format!(" [{}]", course.file_name),
                    Style::default().fg(Color::DarkGray),
                ),
            ]);
        })
        .collect();
}

fn group_lines(groups: &[StudyGroup], app_state: &AppState) -> Vec<Line<'static>> {
    return groups
        .iter()
        .enumerate()
        .map(|(idx, group)| {
            let mut spans = vec![
                Span::styled(
                    format!("{}. ", idx + 1),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    group.name.to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(
                    " - {} ({}/{})",
                    group.course_code, group.members, group.capacity
                )),
            ];

            if group.is_full() {
                spans.push(Span::styled(
                    " full",
                    Style::default().fg(Color::Red),
                ));
            } else if app_state.is_pending(&group.id) {
                spans.push(Span::styled(
                    " joining...",
                    Style::default().fg(Color::Yellow),
                ));
            }

            return Line::from(spans);
        })
        .collect();
}

fn partner_lines(students: &[&Student], app_state: &AppState) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = vec![];

    if !app_state.search_term.is_empty() {
        lines.push(Line::from(Span::styled(
            format!(
                "Filter: \"{}\" ({} matches)",
                app_state.search_term,
                students.len()
            ),
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::from(""));
    }

    for (idx, student) in students.iter().enumerate() {
        let mut spans = vec![
            Span::styled(
                format!("{}. ", idx + 1),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                student.name.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" - {}", student.major)),
            Span::styled(
                format!(" [{}]", student.courses.join(", ")),
                Style::default().fg(Color::DarkGray),
            ),
        ];

        if student.connected {
            spans.push(Span::styled(
                " connected",
                Style::default().fg(Color::Green),
            ));
        } else if app_state.is_pending(&student.id) {
            spans.push(Span::styled(
                " requested...",
                Style::default().fg(Color::Yellow),
            ));
        }

        lines.push(Line::from(spans));
    }

    return lines;
}

fn render_body<B: Backend>(frame: &mut Frame<B>, app_state: &mut AppState, rect: Rect) {
    match app_state.view {
        View::Courses => {
            let lines = course_lines(&app_state.catalog.courses);
            frame.render_widget(Paragraph::new(lines), rect);
        }
        View::Groups => {
            let lines = group_lines(&app_state.catalog.groups, app_state);
            frame.render_widget(Paragraph::new(lines), rect);
        }
        View::Partners => {
            let students = app_state.catalog.filter_students(&app_state.search_term);
            let lines = partner_lines(&students, app_state);
            frame.render_widget(Paragraph::new(lines), rect);
        }
        View::Assistant => {
            app_state
                .transcript_view
                .render(frame, rect, app_state.scroll.position);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                rect.inner(&Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut app_state.scroll.scrollbar_state,
            );
        }
    }
}

fn render_notices<B: Backend>(frame: &mut Frame<B>, app_state: &AppState, rect: Rect) {
    let now = Instant::now();
    let width = rect.width.min(60);

    for (idx, (notice, exiting)) in app_state.notices.visible(now).into_iter().enumerate() {
        let area = Rect::new(
            rect.x + rect.width - width,
            rect.y + idx as u16,
            width,
            1,
        );
        if area.y >= rect.y + rect.height {
            break;
        }

        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(notice.text.to_string())
                .style(notice_style(notice.ntype, exiting))
                .alignment(Alignment::Right),
            area,
        );
    }
}

fn render_help<B: Backend>(frame: &mut Frame<B>, rect: Rect) {
    let area = Rect::new(
        rect.x + 2,
        rect.y + 1,
        rect.width.saturating_sub(4),
        rect.height.saturating_sub(2),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(help_text())
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Help (Esc to close)"),
            ),
        area,
    );
}

async fn flush(app_state: &mut AppState, store: &Store) -> Result<()> {
    let dirty = app_state.take_dirty();
    if !dirty.any() {
        return Ok(());
    }

    // A transcript mid-stream is skipped; finishing or discarding the
    // reply marks it dirty again.
    if dirty.transcript && !app_state.transcript.in_progress() {
        store
            .write(storage::TRANSCRIPT, &app_state.transcript.turns().to_vec())
            .await?;
    }
    if dirty.courses {
        store.write(storage::COURSES, &app_state.catalog.courses).await?;
    }
    if dirty.groups {
        store.write(storage::GROUPS, &app_state.catalog.groups).await?;
    }
    if dirty.partners {
        store
            .write(storage::PARTNERS, &app_state.catalog.students)
            .await?;
    }

    return Ok(());
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState,
    store: &Store,
    events: &mut EventsService,
) -> Result<()> {
    let mut textarea = TextArea::default();
    let loading = Loading::default();

    loop {
        terminal.draw(|frame| {
            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints(vec![
                    Constraint::Max(1),
                    Constraint::Min(1),
                    Constraint::Max(4),
                ])
                .split(frame.size());

            if layout[1].width != app_state.last_known_width
                || layout[1].height != app_state.last_known_height
            {
                app_state.set_rect(layout[1]);
            }

            render_tabs(frame, app_state, layout[0]);
            render_body(frame, app_state, layout[1]);

            if app_state.waiting_for_backend && app_state.view == View::Assistant {
                loading.render(frame, layout[2]);
            } else {
                frame.render_widget(textarea.widget(), layout[2]);
            }

            render_notices(frame, app_state, layout[1]);
            if app_state.show_help {
                render_help(frame, layout[1]);
            }
        })?;

        match events.next().await? {
            Event::AssistantPromptResponse(res) => {
                app_state.handle_assistant_response(res);
            }
            Event::AssistantError(err) => {
                app_state.handle_assistant_error(&err);
            }
            Event::CourseUploaded(course) => {
                app_state.handle_course_uploaded(course);
            }
            Event::GroupCreated(group) => {
                app_state.handle_group_created(group);
            }
            Event::GroupJoined(id) => {
                app_state.handle_group_joined(&id);
            }
            Event::PartnerConnected(id) => {
                app_state.handle_partner_connected(&id);
            }
            Event::TranscriptCopied() => {
                app_state.handle_transcript_copied();
            }
            Event::KeyboardCTRLC() => {
                break;
            }
            Event::KeyboardEsc() => {
                app_state.handle_esc();
            }
            Event::KeyboardTab() => {
                app_state.next_view();
            }
            Event::KeyboardPaste(text) => {
                let text = text.replace('\r', "\n");
                let mut pasted_lines = text.split('\n');
                if let Some(first) = pasted_lines.next() {
                    textarea.insert_str(first);
                }
                for line in pasted_lines {
                    textarea.insert_newline();
                    textarea.insert_str(line);
                }
            }
            Event::KeyboardCharInput(input) => {
                if !app_state.waiting_for_backend {
                    textarea.input(input);
                }
            }
            Event::KeyboardEnter() => {
                if app_state.waiting_for_backend {
                    continue;
                }

                let input_str = textarea.lines().join("\n");
                if input_str.trim().is_empty() && app_state.staged_attachment.is_none() {
                    continue;
                }

                textarea = TextArea::default();
                app_state.handle_input(&input_str).await?;
                if app_state.exit {
                    break;
                }
            }
            Event::UIScrollDown() => {
                app_state.scroll.down();
            }
            Event::UIScrollUp() => {
                app_state.scroll.up();
            }
            Event::UIScrollPageDown() => {
                app_state.scroll.down_page();
            }
            Event::UIScrollPageUp() => {
                app_state.scroll.up_page();
            }
            Event::UITick() => {
                app_state.tick();
            }
        }

        flush(app_state, store).await?;
    }

    app_state.prepare_shutdown();
    flush(app_state, store).await?;
    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    disable_raw_mode().unwrap();
    crossterm::execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture).unwrap();
    crossterm::execute!(io::stdout(), cursor::Show).unwrap();
}

pub async fn start(
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
    assistant_unavailable: Option<String>,
) -> Result<()> {
    let store = Store::default();

    let transcript = store
        .read::<Vec<Turn>>(storage::TRANSCRIPT)
        .await
        .map(Transcript::from_turns)
        .unwrap_or_default();

    let courses = store
        .read::<Vec<Course>>(storage::COURSES)
        .await
        .unwrap_or_else(Course::seed);
    let groups = store
        .read::<Vec<StudyGroup>>(storage::GROUPS)
        .await
        .unwrap_or_else(StudyGroup::seed);
    let students = store
        .read::<Vec<Student>>(storage::PARTNERS)
        .await
        .unwrap_or_else(Student::seed);

    let mut app_state = AppState::new(
        tx,
        transcript,
        Catalog::new(courses, groups, students),
        assistant_unavailable,
    );
    let mut events = EventsService::new(rx);

    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    start_loop(&mut terminal, &mut app_state, &store, &mut events).await?;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    return Ok(());
}
