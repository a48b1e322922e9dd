use crate::config::{RunConfig, ValidationError, DEFAULT_DURATION_MIN, DEFAULT_INTERVAL_SEC, DEFAULT_MICKEYS};
use crate::injector::InputInjector;
use crate::mover::{Clock, MoveJob, MovementLoop, Status};
use std::sync::Arc;
use tracing::{info, warn};

// -------------- UI State --------------
pub struct AppState {
    pub(crate) duration_input: String,
    pub(crate) interval_input: String,
    pub(crate) mickeys_input: String,
    pub(crate) status: String,

    job: Option<MoveJob>,
    injector: Arc<dyn InputInjector>,
    clock: Arc<dyn Clock>,
    repaint: Option<egui::Context>,
}

impl AppState {
    pub fn new(injector: Arc<dyn InputInjector>, clock: Arc<dyn Clock>) -> Self {
        Self {
            duration_input: DEFAULT_DURATION_MIN.to_owned(),
            interval_input: DEFAULT_INTERVAL_SEC.to_owned(),
            mickeys_input: DEFAULT_MICKEYS.to_owned(),
            status: Status::Idle.to_string(),

            job: None,
            injector,
            clock,
            repaint: None,
        }
    }

    /// Wake this context whenever the mover reports.
    pub fn with_repaint(mut self, ctx: egui::Context) -> Self {
        self.repaint = Some(ctx);
        self
    }

    pub fn start_enabled(&self) -> bool { self.job.is_none() }

    pub fn start(&mut self) {
        if self.job.is_some() { return; }

        let config = match RunConfig::from_inputs(&self.duration_input, &mut self.interval_input, &self.mickeys_input) {
            Ok(config) => config,
            Err(err) => {
                warn!(%err, "rejected run settings");
                self.status = ValidationError::USER_MESSAGE.to_owned();
                return;
            }
        };

        let mover = MovementLoop::new(config, Arc::clone(&self.injector), Arc::clone(&self.clock));
        let repaint = self.repaint.clone();
        self.job = Some(MoveJob::spawn(mover, move || {
            if let Some(ctx) = &repaint { ctx.request_repaint(); }
        }));
    }

    /// Blocks until the active run, if any, has fully exited, then shows its
    /// final status. With no active run this only leaves Start enabled.
    pub fn stop(&mut self) {
        if let Some(mut job) = self.job.take() {
            info!("stop requested");
            job.stop();
            let statuses = job.poll();
            self.show(statuses);
        }
    }

    /// Applies queued mover reports; a terminal one retires the job.
    pub fn pump_status(&mut self) {
        let Some(job) = self.job.as_mut() else { return };
        let statuses = job.poll();
        let done = statuses.iter().any(Status::is_terminal);
        self.show(statuses);
        if done {
            if let Some(mut job) = self.job.take() { job.join(); }
        }
    }

    fn show(&mut self, statuses: Vec<Status>) {
        if let Some(last) = statuses.last() {
            self.status = last.to_string();
        }
    }
}

impl eframe::App for AppState {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.pump_status();

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::Grid::new("run_form").num_columns(2).spacing([12.0, 8.0]).show(ui, |ui| {
                ui.label("Duration (min):");
                ui.text_edit_singleline(&mut self.duration_input);
                ui.end_row();

                ui.label("Interval (sec):");
                ui.text_edit_singleline(&mut self.interval_input);
                ui.end_row();

                ui.label("Mickeys (pixels):");
                ui.text_edit_singleline(&mut self.mickeys_input);
                ui.end_row();

                ui.label("Status:");
                ui.label(self.status.as_str());
                ui.end_row();
            });

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.add_enabled(self.start_enabled(), egui::Button::new("Start")).clicked() { self.start(); }
                if ui.button("Stop").clicked() { self.stop(); }
            });
        });
    }
}
