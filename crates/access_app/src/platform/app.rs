use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use access_core::{update, AppState, AppViewModel, Msg};
use access_engine::{load_document, EngineHandle, ReqwestServiceClient};
use anyhow::{anyhow, bail, Context};
use clap::Parser;
use client_logging::{client_error, client_info};
use url::Url;

use super::cli::{Cli, OneShotInput};
use super::effects::{EffectRunner, Inbox, Notice};
use super::logging;
use super::settings::{Settings, SETTINGS_FILENAME};
use super::ui::commands::{parse_command, UserCommand, HELP};
use super::ui::render::render;

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(destination) = cli.log_to.destination() {
        let level = client_logging::parse_level(&cli.log_level)
            .ok_or_else(|| anyhow!("unknown log level '{}'", cli.log_level))?;
        logging::initialize(destination, level);
    }

    let mut settings = Settings::load(cli.config.as_deref())?;
    settings.apply_overrides(&cli);

    if cli.save_config {
        let path = cli
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILENAME));
        let written = settings.save(&path)?;
        println!("Saved settings to {}", written.display());
        return Ok(());
    }

    let mode = settings.accessibility_mode()?;
    let lookup = settings.sign_lookup()?;
    let client = ReqwestServiceClient::new(settings.service_settings()?)?;
    client_info!("Processing endpoint {}", client.endpoint());
    let link_base = client.endpoint().clone();

    let (engine, events) = EngineHandle::new(Arc::new(client), settings.bundle_dir.clone())
        .context("failed to start the request engine")?;
    let (inbox_tx, inbox_rx) = mpsc::channel();
    let runner = EffectRunner::new(engine, events, inbox_tx.clone());

    let interactive = cli.one_shot_input().is_none() && !cli.check;
    let mut session = Session {
        state: AppState::with_sign_lookup(lookup),
        runner,
        inbox: inbox_rx,
        color: !cli.no_color && io::stdout().is_terminal(),
        link_base,
        interactive,
        failed: false,
    };
    session.dispatch(Msg::ModeSelected(mode));

    if cli.check {
        return session.check();
    }
    match cli.one_shot_input() {
        Some(input) => session.run_once(input, cli.download),
        None => {
            spawn_input_reader(inbox_tx);
            session.run_interactive()
        }
    }
}

struct Session {
    state: AppState,
    runner: EffectRunner,
    inbox: mpsc::Receiver<Inbox>,
    color: bool,
    /// Service-relative result references are shown resolved against this.
    link_base: Url,
    interactive: bool,
    failed: bool,
}

impl Session {
    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        let view = state.view();
        let mut state = state;
        let was_dirty = state.consume_dirty();
        self.state = state;

        if was_dirty {
            self.show(&view);
        }
        for notice in self.runner.enqueue(effects) {
            self.failed = true;
            eprintln!("{notice}");
        }
    }

    fn show(&self, view: &AppViewModel) {
        if self.interactive {
            println!("{}", render(view, self.color, &self.link_base));
        } else if view.busy {
            eprintln!("{}", view.stage_label);
        } else if view.panels.is_some() {
            print!("{}", render(view, self.color, &self.link_base));
        }
    }

    fn next(&self) -> anyhow::Result<Inbox> {
        self.inbox
            .recv()
            .map_err(|_| anyhow!("request engine stopped unexpectedly"))
    }

    fn wait_until_idle(&mut self) -> anyhow::Result<()> {
        while self.state.stage().is_busy() {
            match self.next()? {
                Inbox::Core(msg) => self.dispatch(msg),
                Inbox::Notice(notice) => self.show_notice(notice),
                Inbox::Line(_) | Inbox::InputClosed => {}
            }
        }
        Ok(())
    }

    fn show_notice(&mut self, notice: Notice) {
        match notice {
            Notice::BundleSaved(path) => println!("Saved bundle to {}", path.display()),
            Notice::BundleFailed(message) => eprintln!("Bundle download failed: {message}"),
            Notice::Ping(Ok(())) => println!("Processing service is reachable."),
            Notice::Ping(Err(message)) => eprintln!("Processing service unreachable: {message}"),
        }
    }

    fn check(mut self) -> anyhow::Result<()> {
        self.runner.ping();
        loop {
            if let Inbox::Notice(Notice::Ping(result)) = self.next()? {
                let outcome = result
                    .as_ref()
                    .map_err(|message| anyhow!("processing service unreachable: {message}"))
                    .map(|_| ());
                self.show_notice(Notice::Ping(result));
                return outcome;
            }
        }
    }

    fn run_once(mut self, input: OneShotInput, download: bool) -> anyhow::Result<()> {
        let msg = match input {
            OneShotInput::File(path) => Msg::DocumentSelected(load_document(&path)?),
            OneShotInput::Url(url) => Msg::SourceUrlChanged(url),
        };
        self.dispatch(msg);
        if !self.state.view().submit_enabled {
            bail!("nothing to submit: the url is blank");
        }

        self.dispatch(Msg::SubmitClicked);
        self.wait_until_idle()?;
        if self.failed {
            bail!("processing request failed");
        }

        if download {
            let has_bundle = self
                .state
                .result()
                .is_some_and(|result| result.zip_url.is_some());
            if !has_bundle {
                eprintln!("The service returned no bundle to download.");
                return Ok(());
            }
            self.dispatch(Msg::DownloadClicked);
            loop {
                match self.next()? {
                    Inbox::Notice(Notice::BundleSaved(path)) => {
                        self.show_notice(Notice::BundleSaved(path));
                        break;
                    }
                    Inbox::Notice(Notice::BundleFailed(message)) => {
                        bail!("bundle download failed: {message}");
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn run_interactive(mut self) -> anyhow::Result<()> {
        println!("{HELP}\n");
        println!("{}", render(&self.state.view(), self.color, &self.link_base));

        loop {
            match self.next()? {
                Inbox::Core(msg) => self.dispatch(msg),
                Inbox::Notice(notice) => self.show_notice(notice),
                Inbox::Line(line) => match parse_command(&line) {
                    Ok(Some(UserCommand::Quit)) => break,
                    Ok(Some(command)) => self.handle_command(command),
                    Ok(None) => {}
                    Err(message) => eprintln!("{message}"),
                },
                Inbox::InputClosed => {
                    self.wait_until_idle()?;
                    break;
                }
            }
        }
        Ok(())
    }

    fn handle_command(&mut self, command: UserCommand) {
        match command {
            UserCommand::SelectFile(path) => match load_document(&path) {
                Ok(document) => self.dispatch(Msg::DocumentSelected(document)),
                Err(err) => {
                    client_error!("{}", err);
                    eprintln!("{err}");
                }
            },
            UserCommand::EnterUrl(url) => self.dispatch(Msg::SourceUrlChanged(url)),
            UserCommand::SelectMode(mode) => self.dispatch(Msg::ModeSelected(mode)),
            UserCommand::Submit => {
                let view = self.state.view();
                if view.busy {
                    eprintln!("A request is already in progress.");
                } else if !view.submit_enabled {
                    eprintln!("Choose a file or enter a url first.");
                }
                self.dispatch(Msg::SubmitClicked);
            }
            UserCommand::Download => {
                if self.state.result().and_then(|r| r.zip_url.as_ref()).is_none() {
                    eprintln!("No bundle to download.");
                    return;
                }
                self.dispatch(Msg::DownloadClicked);
            }
            UserCommand::Ping => self.runner.ping(),
            UserCommand::Help => println!("{HELP}"),
            UserCommand::Quit => {}
        }
    }
}

fn spawn_input_reader(inbox: mpsc::Sender<Inbox>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if inbox.send(Inbox::Line(line)).is_err() {
                return;
            }
        }
        let _ = inbox.send(Inbox::InputClosed);
    });
}
