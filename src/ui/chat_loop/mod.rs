//! Studio event loop.
//!
//! The loop owns the [`App`]. Terminal input arrives from a blocking reader
//! task; page results arrive from spawned [`PageController`] tasks tagged with
//! the render id they were issued under.

mod keybindings;
pub mod lifecycle;

use std::{error::Error, sync::Arc, time::Duration};

use ratatui::crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::mpsc;
use tracing::{debug, info};
use tui_textarea::Input;

use self::keybindings::{map_key, KeyAction, KeyContext};
use self::lifecycle::{restore_terminal, setup_terminal, StudioTerminal};
use crate::core::app::{App, AppInitConfig, PendingRequest};
use crate::core::client::GenerationService;
use crate::core::page::{Page, PageController, PageEvent, PageSink};
use crate::ui::renderer::{max_output_scroll, ui};

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const PULSE_INTERVAL: Duration = Duration::from_millis(120);

type PageChannel = mpsc::UnboundedSender<(PageEvent, u64)>;

pub async fn run_studio(
    init: AppInitConfig,
    service: Arc<dyn GenerationService>,
) -> Result<(), Box<dyn Error>> {
    let mut app = App::new(init)?;
    let controller = PageController::new(service);

    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut app, controller).await;
    restore_terminal(&mut terminal)?;
    result
}

/// Forward terminal events until the receiver goes away.
fn spawn_event_reader(tx: mpsc::UnboundedSender<Event>) {
    tokio::task::spawn_blocking(move || loop {
        match event::poll(POLL_INTERVAL) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break;
                    }
                }
                Err(_) => continue,
            },
            Ok(false) => {
                if tx.is_closed() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

async fn event_loop(
    terminal: &mut StudioTerminal,
    app: &mut App,
    controller: PageController,
) -> Result<(), Box<dyn Error>> {
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<Event>();
    spawn_event_reader(input_tx);

    let (page_tx, mut page_rx) = mpsc::unbounded_channel::<(PageEvent, u64)>();
    let mut pulse = tokio::time::interval(PULSE_INTERVAL);

    loop {
        terminal.draw(|f| ui(f, app))?;
        if app.exit_requested {
            return Ok(());
        }

        tokio::select! {
            Some(ev) = input_rx.recv() => {
                handle_terminal_event(app, &controller, &page_tx, ev);
                // Drain queued input before the next frame
                while let Ok(ev) = input_rx.try_recv() {
                    handle_terminal_event(app, &controller, &page_tx, ev);
                }
            }
            Some((event, render_id)) = page_rx.recv() => {
                app.apply_event(event, render_id);
                while let Ok((event, render_id)) = page_rx.try_recv() {
                    app.apply_event(event, render_id);
                }
            }
            _ = pulse.tick(), if app.busy => {}
            else => return Ok(()),
        }
    }
}

fn handle_terminal_event(
    app: &mut App,
    controller: &PageController,
    page_tx: &PageChannel,
    ev: Event,
) {
    match ev {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            let context = KeyContext {
                mode: app.mode(),
                multiline: app.page.active_field_is_multiline(),
            };
            apply_key_action(app, controller, page_tx, map_key(key, context));
        }
        Event::Paste(text) => {
            let text = if app.page.active_field_is_multiline() {
                text
            } else {
                text.replace(['\r', '\n'], " ")
            };
            app.page.active_textarea().insert_str(text);
        }
        _ => {}
    }
}

fn apply_key_action(
    app: &mut App,
    controller: &PageController,
    page_tx: &PageChannel,
    action: KeyAction,
) {
    let (width, height) = app.output_viewport;
    match action {
        KeyAction::Quit => app.exit_requested = true,
        KeyAction::SelectMode(mode) => app.select_mode(mode),
        KeyAction::NextMode => app.select_mode(app.mode().next()),
        KeyAction::PreviousMode => app.select_mode(app.mode().previous()),
        KeyAction::Submit => {
            if let Some(pending) = app.prepare_submit() {
                spawn_request(controller, page_tx, pending);
            }
        }
        KeyAction::AttachImage => app.attach_image(),
        KeyAction::ToggleLogging => app.toggle_logging(),
        KeyAction::NextField | KeyAction::PreviousField => {
            if let Page::VisionGenerate(form) = &mut app.page {
                form.cycle_focus(action == KeyAction::NextField);
            }
        }
        KeyAction::ScrollUp(lines) => {
            let max = max_output_scroll(app, width, height);
            app.scroll_up(lines, max);
        }
        KeyAction::ScrollDown(lines) => {
            let max = max_output_scroll(app, width, height);
            app.scroll_down(lines, max);
        }
        KeyAction::Edit(key) => {
            app.status = None;
            app.page.active_textarea().input(Input::from(key));
        }
    }
}

fn spawn_request(controller: &PageController, page_tx: &PageChannel, pending: PendingRequest) {
    let PendingRequest {
        request,
        session,
        render_id,
    } = pending;
    info!(mode = ?request.mode(), render_id, "submitting request");

    let controller = controller.clone();
    let sink = PageSink::new(page_tx.clone(), render_id);
    tokio::spawn(async move {
        controller.handle(request, session, &sink).await;
        debug!(render_id, "request finished");
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::page::{Mode, OutputBlock};
    use crate::ui::theme::Theme;
    use crate::utils::test_utils::FakeService;
    use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn app(mode: Mode) -> App {
        App::new(AppInitConfig {
            mode,
            text_model: "text".to_string(),
            vision_model: "vision".to_string(),
            theme: Theme::dark_default(),
            markdown_enabled: true,
            log_file: None,
        })
        .expect("app")
    }

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    async fn drain_until_finished(
        app: &mut App,
        rx: &mut mpsc::UnboundedReceiver<(PageEvent, u64)>,
    ) {
        while let Some((event, render_id)) = rx.recv().await {
            let finished = event == PageEvent::Finished;
            app.apply_event(event, render_id);
            if finished {
                break;
            }
        }
    }

    #[tokio::test]
    async fn typing_and_enter_runs_the_generate_request() {
        let service = Arc::new(FakeService::replying("Why did the chicken"));
        let controller = PageController::new(service.clone());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = app(Mode::Generate);

        for c in "joke".chars() {
            handle_terminal_event(&mut app, &controller, &tx, press(KeyCode::Char(c)));
        }
        handle_terminal_event(&mut app, &controller, &tx, press(KeyCode::Enter));
        assert!(app.busy);

        drain_until_finished(&mut app, &mut rx).await;
        assert!(!app.busy);
        assert_eq!(
            app.output,
            vec![
                OutputBlock::Heading("Generated Content:".to_string()),
                OutputBlock::Quote("> Why did the chicken".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn chat_history_grows_across_submits() {
        let service = Arc::new(FakeService::streaming(&["Hi", " there"]));
        let controller = PageController::new(service);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = app(Mode::Chat);

        app.page.active_textarea().insert_str("hello");
        handle_terminal_event(&mut app, &controller, &tx, press(KeyCode::Enter));
        drain_until_finished(&mut app, &mut rx).await;

        handle_terminal_event(&mut app, &controller, &tx, press(KeyCode::Enter));
        drain_until_finished(&mut app, &mut rx).await;

        let session = app.page.chat_session().expect("chat page");
        assert_eq!(session.history().len(), 4);
        assert!(app
            .output
            .contains(&OutputBlock::Line("User: hello".to_string())));
        assert!(app
            .output
            .contains(&OutputBlock::Streamed("Hi there".to_string())));
    }

    #[test]
    fn paste_into_single_line_field_flattens_newlines() {
        let controller = PageController::new(Arc::new(FakeService::replying("")));
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = app(Mode::Generate);
        handle_terminal_event(
            &mut app,
            &controller,
            &tx,
            Event::Paste("one\ntwo".to_string()),
        );
        assert_eq!(app.page.active_textarea().lines(), ["one two"]);
    }

    #[test]
    fn function_key_switches_page_and_ctrl_c_quits() {
        let controller = PageController::new(Arc::new(FakeService::replying("")));
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = app(Mode::Generate);

        handle_terminal_event(&mut app, &controller, &tx, press(KeyCode::F(3)));
        assert_eq!(app.mode(), Mode::VisionGenerate);

        handle_terminal_event(
            &mut app,
            &controller,
            &tx,
            Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
        );
        assert!(app.exit_requested);
    }
}
